//! # wase-query — Command-Line Interface
//!
//! Query captured web traffic stored in Elasticsearch for structural gaps.
//!
//! - `wase-query missingheader <header>` — URLs whose responses lack a header.
//! - `wase-query missingparameter <parameter>` — URLs whose requests lack a parameter.
//! - `wase-query headervalues <header>` — values of a header and where they occur.
//! - `wase-query search [terms...]` — arbitrary query-string search.

use std::io::Write;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wase_core::filters::FilterArgs;
use wase_io::ElasticClient;

mod config;
mod dispatch;
mod output;

use config::Config;
use dispatch::{Intent, Outcome, RunOptions};

// =============================================================================
// CLI
// =============================================================================

/// WASE Query Tool
#[derive(Parser, Debug)]
#[command(name = "wase-query", version, about, long_about = None)]
struct Cli {
    /// Elasticsearch server (repeatable; later servers are fallbacks)
    #[arg(long, short = 's')]
    server: Vec<String>,

    /// Index pattern to query [default: wase-*]
    #[arg(long, short = 'i')]
    index: Option<String>,

    /// Add fields to output. Prints full documents instead of aggregated URLs.
    #[arg(long, short = 'f')]
    fields: Vec<String>,

    /// Debugging output on stderr
    #[arg(long, short = 'd')]
    debug: bool,

    /// Path to config file
    #[arg(long, default_value = "wase-query.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for URLs whose responses are missing a header
    #[command(name = "missingheader")]
    MissingHeader {
        /// Name of the header
        header: String,
        #[command(flatten)]
        restrict: Restrictions,
    },

    /// Search for URLs whose requests are missing a parameter
    #[command(name = "missingparameter")]
    MissingParameter {
        /// Name of the parameter
        parameter: String,
        #[command(flatten)]
        restrict: Restrictions,
    },

    /// Show all values of a response header and the URLs where each was set
    #[command(name = "headervalues")]
    HeaderValues {
        /// Name of the response header
        header: String,

        /// List URLs where the header value is set
        #[arg(long, short = 'u')]
        urls: bool,

        /// Maximum number of listed URLs (0 or less = all)
        #[arg(long = "max-urls", short = 'n', default_value_t = 0, allow_negative_numbers = true)]
        max_urls: i64,
    },

    /// Make arbitrary query-string searches
    Search {
        /// Query string terms, joined with spaces [default: *]
        query: Vec<String>,
    },
}

#[derive(clap::Args, Debug)]
struct Restrictions {
    /// Invert result: list URLs where the name IS present
    #[arg(long, short = 'n')]
    invert: bool,

    /// Restrict search to the given request methods
    #[arg(long, short = 'm')]
    method: Vec<String>,

    /// Restrict to response codes: single (200), range (200-299) or
    /// wildcard (2*). Repeated codes must ALL match.
    #[arg(long = "responsecode", short = 'c')]
    responsecode: Vec<String>,
}

impl Restrictions {
    fn into_parts(self) -> (FilterArgs, bool) {
        let filters = FilterArgs {
            methods: self.method,
            response_codes: self.responsecode,
        };
        (filters, self.invert)
    }
}

impl From<Commands> for Intent {
    fn from(command: Commands) -> Self {
        match command {
            Commands::MissingHeader { header, restrict } => {
                let (filters, invert) = restrict.into_parts();
                Intent::MissingHeader {
                    header,
                    filters,
                    invert,
                }
            }
            Commands::MissingParameter {
                parameter,
                restrict,
            } => {
                let (filters, invert) = restrict.into_parts();
                Intent::MissingParameter {
                    parameter,
                    filters,
                    invert,
                }
            }
            Commands::HeaderValues {
                header,
                urls,
                max_urls,
            } => Intent::HeaderValues {
                header,
                list_urls: urls,
                max_urls: usize::try_from(max_urls).unwrap_or(0),
            },
            Commands::Search { query } => {
                let query = if query.is_empty() {
                    "*".to_string()
                } else {
                    query.join(" ")
                };
                Intent::Search { query }
            }
        }
    }
}

// =============================================================================
// Main
// =============================================================================

fn init_tracing(debug: bool) {
    let filter = if debug {
        "wase_query=debug,wase_io=debug,wase_core=debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "wase_query=warn,wase_io=warn".into())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    tracing::debug!("{:?}", cli);

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        std::process::exit(1);
    };

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let engine_config = config.engine_with_overrides(&cli.server, cli.index.as_deref());
    let client = match ElasticClient::new(engine_config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let intent = Intent::from(command);
    let options = RunOptions { fields: cli.fields };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = dispatch::run(&client, &intent, &options, &mut out);
    let _ = out.flush();

    match result {
        Ok(Outcome::Rows(n)) => tracing::debug!("{} rows written", n),
        Ok(Outcome::NoMatches) => tracing::debug!("Query matched no documents"),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wase-query").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_missingheader_with_restrictions() {
        let cli = parse(&[
            "-s", "es1", "-s", "es2", "-f", "response.status", "missingheader", "X-Frame-Options",
            "-n", "-m", "GET", "-m", "POST", "-c", "200-299", "-c", "404",
        ]);
        assert_eq!(cli.server, vec!["es1", "es2"]);
        assert_eq!(cli.fields, vec!["response.status"]);

        let intent = Intent::from(cli.command.unwrap());
        assert_eq!(
            intent,
            Intent::MissingHeader {
                header: "X-Frame-Options".into(),
                filters: FilterArgs {
                    methods: vec!["GET".into(), "POST".into()],
                    response_codes: vec!["200-299".into(), "404".into()],
                },
                invert: true,
            }
        );
    }

    #[test]
    fn test_missingparameter() {
        let cli = parse(&["missingparameter", "csrf_token", "--responsecode", "2*"]);
        assert_eq!(
            Intent::from(cli.command.unwrap()),
            Intent::MissingParameter {
                parameter: "csrf_token".into(),
                filters: FilterArgs {
                    methods: vec![],
                    response_codes: vec!["2*".into()],
                },
                invert: false,
            }
        );
    }

    #[test]
    fn test_headervalues() {
        let cli = parse(&["headervalues", "--urls", "--max-urls", "3", "Server"]);
        assert_eq!(
            Intent::from(cli.command.unwrap()),
            Intent::HeaderValues {
                header: "Server".into(),
                list_urls: true,
                max_urls: 3,
            }
        );
    }

    #[test]
    fn test_negative_max_urls_lists_all() {
        for value in ["-1", "0"] {
            let cli = parse(&["headervalues", "-u", "-n", value, "Server"]);
            assert_eq!(
                Intent::from(cli.command.unwrap()),
                Intent::HeaderValues {
                    header: "Server".into(),
                    list_urls: true,
                    max_urls: 0,
                }
            );
        }
    }

    #[test]
    fn test_search_terms_joined() {
        let cli = parse(&["search", "response.status:500", "AND", "request.method:GET"]);
        assert_eq!(
            Intent::from(cli.command.unwrap()),
            Intent::Search {
                query: "response.status:500 AND request.method:GET".into()
            }
        );

        let cli = parse(&["search"]);
        assert_eq!(Intent::from(cli.command.unwrap()), Intent::Search { query: "*".into() });
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-i", "traffic-*", "search"]);
        assert_eq!(cli.index.as_deref(), Some("traffic-*"));
        assert!(cli.server.is_empty());
        assert_eq!(cli.config, PathBuf::from("wase-query.toml"));
        assert!(!cli.debug);
    }
}
