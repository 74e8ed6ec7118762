//! Line rendering of flattened result rows.

use std::io::{self, Write};
use wase_core::ResultRow;

pub const NO_MATCHES: &str = "No matches!";

/// Write one row. `list_urls` adds the URL lines and a separating blank
/// line after a header value.
pub fn write_row<W: Write>(out: &mut W, row: &ResultRow, list_urls: bool) -> io::Result<()> {
    match row {
        ResultRow::Url(url) => writeln!(out, "{}", url),
        ResultRow::Document { url, fields } => {
            writeln!(out, "{}", url)?;
            for (path, value) in fields {
                writeln!(out, "{}: {}", path, value)?;
            }
            writeln!(out)
        }
        ResultRow::HeaderValue { value, urls } => {
            writeln!(out, "{}", value)?;
            if list_urls {
                for url in urls {
                    writeln!(out, "{}", url)?;
                }
                writeln!(out)?;
            }
            Ok(())
        }
    }
}
