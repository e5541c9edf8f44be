//! View arguments and query string parameters.
//!
//! This module provides the two value types every dispatch passes around:
//!
//! - [`ViewArgs`]: positional and keyword arguments captured from a URL
//!   pattern (e.g. `:id` in `/orders/:id/`) or computed for a parent view.
//!   Supports typed access via [`get_as`](ViewArgs::get_as).
//! - [`QueryParams`]: the current request's query string, kept in request
//!   order and multi-valued (e.g. `?tag=a&tag=b`), which the forwarding policy
//!   filters onto ancestor addresses.
//!
//! # Example
//!
//! ```
//! use view_breadcrumbs::{QueryParams, ViewArgs};
//!
//! let args = ViewArgs::keyword([("id", "42")]);
//! assert_eq!(args.get_as::<u32>("id"), Some(42));
//!
//! let query = QueryParams::from_query_string("sort=date&limit=50");
//! assert_eq!(query.get_as::<u32>("limit"), Some(50));
//! assert_eq!(query.get("sort"), Some("date"));
//! ```

use indexmap::IndexMap;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

/// Characters left unescaped in forwarded query keys and values (`/` stays readable).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Characters left unescaped in a reversed path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b':')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// Same as [`PATH_SEGMENT`] but keeps `/`, for catch-all parameters.
const PATH_TAIL: &AsciiSet = &PATH_SEGMENT.remove(b'/');

// ============================================================================
// View Arguments
// ============================================================================

/// Positional and keyword arguments of one view invocation.
///
/// Keyword arguments keep insertion order so reversed URLs, log lines and error
/// messages are deterministic.
///
/// # Example
///
/// ```
/// use view_breadcrumbs::ViewArgs;
///
/// let mut args = ViewArgs::new();
/// args.insert("customer", "7");
/// args.push("extra");
///
/// assert_eq!(args.get("customer"), Some("7"));
/// assert_eq!(args.args(), ["extra".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewArgs {
    args: Vec<String>,
    kwargs: IndexMap<String, String>,
}

impl ViewArgs {
    /// Create empty arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build positional-only arguments.
    pub fn positional<I, V>(args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            kwargs: IndexMap::new(),
        }
    }

    /// Build keyword-only arguments.
    pub fn keyword<I, K, V>(kwargs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            args: Vec::new(),
            kwargs: kwargs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Positional arguments in call order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Keyword arguments in insertion order.
    pub fn kwargs(&self) -> &IndexMap<String, String> {
        &self.kwargs
    }

    /// Get a keyword argument by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.kwargs.get(key).map(String::as_str)
    }

    /// Get a keyword argument and parse it as a specific type.
    ///
    /// Returns `None` if the argument doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.kwargs.get(key)?.parse().ok()
    }

    /// Get a positional argument by index.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Insert or overwrite a keyword argument.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.kwargs.insert(key.into(), value.into());
    }

    /// Append a positional argument.
    pub fn push(&mut self, value: impl Into<String>) {
        self.args.push(value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Return `true` if there are neither positional nor keyword arguments.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }
}

impl fmt::Display for ViewArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "args:{:?}, kwargs:{{", self.args)?;
        for (i, (key, value)) in self.kwargs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}: {:?}", key, value)?;
        }
        f.write_str("}")
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters parsed from a request's query string.
///
/// Keys keep the order of their first appearance and every key can carry
/// several values.
///
/// # Example
///
/// ```
/// use view_breadcrumbs::QueryParams;
///
/// let query = QueryParams::from_query_string("sort=date&status=open&status=paid");
///
/// assert_eq!(query.get("sort"), Some("date"));
/// assert_eq!(query.get_all("status").unwrap(), ["open", "paid"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: IndexMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create empty query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a raw (still escaped) query string.
    ///
    /// Pairs without `=` are kept with an empty value; `+` decodes to a space.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = Self::new();

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.insert(decode_component(key), decode_component(value));
        }

        params
    }

    /// Get the first value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key)?.first().map(String::as_str)
    }

    /// Get all values for a key, in request order.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.params.get(key).map(Vec::as_slice)
    }

    /// Get the first value for a key, parsed as type `T`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Append a value for the given key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.entry(key.into()).or_default().push(value.into());
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over keys in request order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// Iterate over `(key, values)` in request order.
    pub fn lists(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of unique keys.
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

/// Escape a forwarded query key or value.
pub(crate) fn quote_query_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

/// Escape a value substituted into a URL pattern.
///
/// `keep_slashes` is set for catch-all parameters that may span segments.
pub(crate) fn quote_path_value(value: &str, keep_slashes: bool) -> String {
    let set = if keep_slashes { PATH_TAIL } else { PATH_SEGMENT };
    utf8_percent_encode(value, set).to_string()
}

/// Undo percent-escaping; invalid UTF-8 is replaced rather than rejected.
pub(crate) fn decode_component(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Undo percent-escaping in a captured path value (`+` is literal in paths).
pub(crate) fn decode_path_value(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

// ============================================================================
// Tests
// ============================================================================
