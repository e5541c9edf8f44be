//! Query-string forwarding onto ancestor addresses.
//!
//! Each wrapped view declares which of the current request's query parameters
//! are carried over onto its own address when it appears as an ancestor:
//!
//! | Entry | Meaning |
//! |-------|---------|
//! | `name` | forward `name` |
//! | `*` | forward every parameter of the current request |
//! | `-name` | never forward `name`, even under `*` |
//!
//! Pairs come out in request order, repeated keys as repeated pairs, empty
//! values dropped, keys and values escaped.
//!
//! ```
//! use view_breadcrumbs::{forwarded_query, QueryParams};
//!
//! let query = QueryParams::from_query_string("a=1&b=2&c=3");
//! assert_eq!(forwarded_query(&query, &["*", "-b"]), "a=1&c=3");
//! ```

use crate::dispatch::ViewCall;
use crate::params::{quote_query_component, QueryParams};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Wildcard entry: every current parameter.
pub const ALL_PARAMS: &str = "*";

/// Prefix marking an excluded parameter.
pub const EXCLUDE_PREFIX: char = '-';

/// Provider computing the forwarded parameter names per request.
pub type QueryNamesFn = Arc<dyn Fn(&ViewCall<'_>) -> Vec<String> + Send + Sync>;

/// Which query parameters a level forwards.
#[derive(Clone, Default)]
pub enum QueryForwarding {
    /// Forward nothing.
    #[default]
    None,
    /// A fixed list of entries.
    Fixed(Vec<String>),
    /// Entries computed from the current call.
    Computed(QueryNamesFn),
}

impl QueryForwarding {
    /// Entries in effect for `call`.
    pub fn names(&self, call: &ViewCall<'_>) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::Fixed(names) => names.clone(),
            Self::Computed(provider) => provider(call),
        }
    }

    /// Escaped query string for `call`; empty when nothing is forwarded.
    pub fn query_string(&self, call: &ViewCall<'_>) -> String {
        match self {
            Self::None => String::new(),
            _ => forwarded_query(call.request.query(), &self.names(call)),
        }
    }
}

impl fmt::Debug for QueryForwarding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Fixed(names) => f.debug_tuple("Fixed").field(names).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Build the forwarded query string from `query` according to `names`.
pub fn forwarded_query<S: AsRef<str>>(query: &QueryParams, names: &[S]) -> String {
    let entries: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();
    let include_all = entries.contains(ALL_PARAMS);

    let mut pairs = Vec::new();
    for (key, values) in query.lists() {
        if !include_all && !entries.contains(key) {
            continue;
        }
        if entries.contains(format!("{EXCLUDE_PREFIX}{key}").as_str()) {
            continue;
        }
        let key = quote_query_component(key);
        pairs.extend(
            values
                .iter()
                .filter(|value| !value.is_empty())
                .map(|value| format!("{}={}", key, quote_query_component(value))),
        );
    }

    pairs.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(raw: &str) -> QueryParams {
        QueryParams::from_query_string(raw)
    }

    #[test]
    fn test_fixed_names_keep_request_order() {
        let q = query("b=2&a=1&c=3");
        assert_eq!(forwarded_query(&q, &["a", "b"]), "b=2&a=1");
    }

    #[test]
    fn test_wildcard_with_exclusion() {
        let q = query("a=1&b=2&c=3");
        let forwarded = forwarded_query(&q, &["*", "-b"]);
        assert_eq!(forwarded, "a=1&c=3");
        assert!(!forwarded.contains("b="));
    }

    #[test]
    fn test_exclusion_wins_over_explicit_inclusion() {
        let q = query("a=1&b=2");
        assert_eq!(forwarded_query(&q, &["a", "b", "-b"]), "a=1");
    }

    #[test]
    fn test_multi_values_and_empty_values() {
        let q = query("tag=x&tag=&tag=y&page=");
        assert_eq!(forwarded_query(&q, &["tag", "page"]), "tag=x&tag=y");
    }

    #[test]
    fn test_keys_are_escaped() {
        let q = query("a%26b=1&x%3Dy=2&first+name=Ann");
        assert_eq!(forwarded_query(&q, &["*"]), "a%26b=1&x%3Dy=2&first%20name=Ann");
        assert_eq!(forwarded_query(&q, &["first name"]), "first%20name=Ann");
    }

    #[test]
    fn test_values_are_escaped() {
        let q = query("q=hello+world&path=a%2Fb");
        assert_eq!(forwarded_query(&q, &["*"]), "q=hello%20world&path=a/b");
    }

    #[test]
    fn test_nothing_selected() {
        let q = query("a=1");
        assert_eq!(forwarded_query::<&str>(&q, &[]), "");
        assert_eq!(forwarded_query(&q, &["z"]), "");
    }
}
