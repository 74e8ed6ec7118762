//! # Aggregation Planner
//!
//! Builds the [`AggregationNode`] trees attached to a [`crate::QuerySpec`].
//!
//! Bucket names are a contract with [`crate::flatten`]: the flattener
//! addresses engine results by exactly these names.
//!
//! ```text
//! urls                         terms(request.url)
//!
//! response_headers             nested(response.headers)
//! └── header                   filter(response.headers.name = <header>)
//!     └── values               terms(response.headers.value)
//!         └── main             reverse_nested
//!             └── urls         terms(request.url)
//! ```

use crate::{fields, Predicate};

/// Bucket names shared with the result flattener.
pub mod names {
    pub const URLS: &str = "urls";
    pub const RESPONSE_HEADERS: &str = "response_headers";
    pub const HEADER: &str = "header";
    pub const VALUES: &str = "values";
    pub const MAIN: &str = "main";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationKind {
    /// Group by every distinct value of `field`. The engine client picks
    /// the concrete bucket ceiling.
    Terms { field: String },
    /// Descend into a nested sub-document array.
    Nested { path: String },
    /// Keep only the (nested) documents matching the predicate.
    Filter(Predicate),
    /// Ascend from a nested scope back to the root document.
    ReverseNested,
}

/// One named step of an aggregation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationNode {
    pub name: String,
    pub kind: AggregationKind,
    pub children: Vec<AggregationNode>,
}

impl AggregationNode {
    pub fn new(name: impl Into<String>, kind: AggregationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: AggregationNode) -> Self {
        self.children.push(child);
        self
    }
}

fn terms(name: &str, field: &str) -> AggregationNode {
    AggregationNode::new(
        name,
        AggregationKind::Terms {
            field: field.to_string(),
        },
    )
}

/// Default rollup: distinct URLs of all matching documents.
pub fn url_rollup() -> AggregationNode {
    terms(names::URLS, fields::REQUEST_URL)
}

/// Values of one response header, each with the URLs it was seen on.
pub fn header_value_rollup(header: &str) -> AggregationNode {
    let urls = url_rollup();
    let main = AggregationNode::new(names::MAIN, AggregationKind::ReverseNested).with_child(urls);
    let values = terms(names::VALUES, fields::RESPONSE_HEADER_VALUE).with_child(main);
    let filter = AggregationNode::new(
        names::HEADER,
        AggregationKind::Filter(Predicate::match_field(fields::RESPONSE_HEADER_NAME, header)),
    )
    .with_child(values);

    AggregationNode::new(
        names::RESPONSE_HEADERS,
        AggregationKind::Nested {
            path: fields::RESPONSE_HEADERS.to_string(),
        },
    )
    .with_child(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Nodes from `root` down its first-child chain.
    fn path_of(root: &AggregationNode) -> Vec<&AggregationNode> {
        let mut path = Vec::new();
        let mut node = Some(root);
        while let Some(n) = node {
            assert!(n.children.len() <= 1, "tree must be a path");
            path.push(n);
            node = n.children.first();
        }
        path
    }

    #[test]
    fn test_url_rollup_is_flat() {
        let node = url_rollup();
        assert_eq!(node.name, "urls");
        assert!(node.children.is_empty());
        assert_eq!(
            node.kind,
            AggregationKind::Terms {
                field: "request.url".into(),
            }
        );
    }

    #[test]
    fn test_header_value_rollup_path() {
        let root = header_value_rollup("X-Frame-Options");
        let path = path_of(&root);
        assert_eq!(path.len(), 5);

        let names: Vec<&str> = path.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["response_headers", "header", "values", "main", "urls"]);

        assert_eq!(
            path[0].kind,
            AggregationKind::Nested {
                path: "response.headers".into()
            }
        );
        assert_eq!(
            path[1].kind,
            AggregationKind::Filter(Predicate::match_field("response.headers.name", "X-Frame-Options"))
        );
        assert!(matches!(&path[2].kind, AggregationKind::Terms { field, .. } if field == "response.headers.value"));
        assert_eq!(path[3].kind, AggregationKind::ReverseNested);
        assert!(matches!(&path[4].kind, AggregationKind::Terms { field, .. } if field == "request.url"));
    }

    #[test]
    fn test_header_value_rollup_shape_independent_of_input() {
        let a = header_value_rollup("");
        let b = header_value_rollup("Content-Security-Policy");
        let names = |root: &AggregationNode| -> Vec<String> { path_of(root).iter().map(|n| n.name.clone()).collect() };
        assert_eq!(names(&a), names(&b));
    }
}
