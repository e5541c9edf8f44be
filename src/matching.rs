//! URL pattern compilation for forward and reverse resolution.
//!
//! Patterns are written segment by segment:
//!
//! - `literal`: must match exactly
//! - `:param`: one segment captured as `param` (constraint suffixes such as
//!   `:id<i32>` are accepted and ignored)
//! - `*rest`: the remainder of the path, only as the last segment
//!
//! A trailing slash on the pattern is significant: `/orders/:id/` matches
//! `/orders/42/` but not `/orders/42`.
//!
//! Forward matching is delegated to [`matchit`]; this module only converts a
//! pattern into matchit's syntax and rebuilds a concrete path from arguments
//! for reverse resolution.

use crate::error::{BreadcrumbError, Result};
use crate::params::{quote_path_value, ViewArgs};
use std::borrow::Cow;

/// One segment of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly.
    Literal(String),
    /// Captures one segment.
    Param(String),
    /// Captures the remainder of the path.
    CatchAll(String),
}

/// A compiled URL pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl RoutePattern {
    /// Compile `pattern`, rejecting duplicate parameter names and misplaced
    /// catch-all segments.
    ///
    /// ```
    /// use view_breadcrumbs::matching::RoutePattern;
    ///
    /// let pattern = RoutePattern::parse("/orders/:id/").unwrap();
    /// assert_eq!(pattern.param_names(), ["id"]);
    /// assert_eq!(pattern.matchit_path(), "/orders/{id}/");
    /// ```
    pub fn parse(pattern: &str) -> Result<Self> {
        let raw = split_path(pattern);
        let mut segments = Vec::with_capacity(raw.len());

        for (i, seg) in raw.iter().enumerate() {
            let segment = if is_param_segment(seg) {
                Segment::Param(extract_param_name(seg).into_owned())
            } else if is_wildcard_segment(seg) {
                if i + 1 != raw.len() {
                    return Err(invalid(pattern, "catch-all segment must be last"));
                }
                Segment::CatchAll(seg.trim_start_matches('*').to_string())
            } else {
                if seg.contains(['{', '}']) {
                    return Err(invalid(pattern, "braces are not allowed in literal segments"));
                }
                Segment::Literal((*seg).to_string())
            };
            segments.push(segment);
        }

        let compiled = Self {
            source: pattern.to_string(),
            trailing_slash: pattern.len() > 1 && pattern.ends_with('/'),
            segments,
        };

        let names = compiled.param_names();
        if names.iter().any(|name| name.is_empty()) {
            return Err(invalid(pattern, "parameter without a name"));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(invalid(pattern, &format!("duplicate parameter '{name}'")));
            }
        }

        Ok(compiled)
    }

    /// The pattern as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parameter names in pattern order.
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|seg| match seg {
                Segment::Param(name) | Segment::CatchAll(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Path in matchit syntax (`{param}` / `{*rest}`).
    pub fn matchit_path(&self) -> String {
        self.render(|seg| match seg {
            Segment::Literal(text) => Cow::Borrowed(text.as_str()),
            Segment::Param(name) => Cow::Owned(format!("{{{name}}}")),
            Segment::CatchAll(name) => Cow::Owned(format!("{{*{name}}}")),
        })
    }

    /// Build a concrete path from `args`.
    ///
    /// Positional arguments fill parameters in pattern order; keyword arguments
    /// fill them by name. Mixing the two, leaving a parameter unfilled, giving
    /// an unknown keyword, or passing an empty value yields `None`.
    ///
    /// ```
    /// use view_breadcrumbs::matching::RoutePattern;
    /// use view_breadcrumbs::ViewArgs;
    ///
    /// let pattern = RoutePattern::parse("/customers/:customer/orders/:id/").unwrap();
    /// let by_name = ViewArgs::keyword([("id", "42"), ("customer", "7")]);
    /// assert_eq!(pattern.reverse(&by_name).as_deref(), Some("/customers/7/orders/42/"));
    /// assert_eq!(pattern.reverse(&ViewArgs::positional(["7"])), None);
    /// ```
    pub fn reverse(&self, args: &ViewArgs) -> Option<String> {
        let names = self.param_names();
        let positional = args.args();
        let keyword = args.kwargs();

        if !positional.is_empty() && !keyword.is_empty() {
            return None;
        }

        let values: Vec<&str> = if keyword.is_empty() {
            if positional.len() != names.len() {
                return None;
            }
            positional.iter().map(String::as_str).collect()
        } else {
            if keyword.len() != names.len() {
                return None;
            }
            names
                .iter()
                .map(|name| keyword.get(*name).map(String::as_str))
                .collect::<Option<Vec<_>>>()?
        };

        if values.iter().any(|value| value.is_empty()) {
            return None;
        }

        let mut values = values.into_iter();
        let mut missing = false;
        let path = self.render(|seg| match seg {
            Segment::Literal(text) => Cow::Borrowed(text.as_str()),
            Segment::Param(_) | Segment::CatchAll(_) => {
                let keep_slashes = matches!(seg, Segment::CatchAll(_));
                values.next().map_or_else(
                    || {
                        missing = true;
                        Cow::Borrowed("")
                    },
                    |value| Cow::Owned(quote_path_value(value, keep_slashes)),
                )
            }
        });

        (!missing).then_some(path)
    }

    fn render<'a>(&'a self, mut segment: impl FnMut(&'a Segment) -> Cow<'a, str>) -> String {
        let mut path = String::from("/");
        let parts: Vec<Cow<'a, str>> = self.segments.iter().map(&mut segment).collect();
        path.push_str(&parts.join("/"));
        if self.trailing_slash && !self.segments.is_empty() {
            path.push('/');
        }
        path
    }
}

fn invalid(pattern: &str, message: &str) -> BreadcrumbError {
    BreadcrumbError::InvalidRoute {
        pattern: pattern.to_string(),
        message: message.to_string(),
    }
}

/// Non-empty segments of a route pattern or request path.
///
/// ```
/// use view_breadcrumbs::matching::split_path;
///
/// assert_eq!(split_path("/customers/:pk/orders/"), ["customers", ":pk", "orders"]);
/// assert!(split_path("/").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Parameter name of a `:param` segment, without any `<constraint>` suffix.
pub fn extract_param_name(segment: &str) -> Cow<'_, str> {
    let without_colon = segment.trim_start_matches(':');
    without_colon.find('<').map_or_else(
        || Cow::Borrowed(without_colon),
        |pos| Cow::Owned(without_colon[..pos].to_string()),
    )
}

/// `true` for a `:param` segment.
pub fn is_param_segment(segment: &str) -> bool {
    segment.starts_with(':')
}

/// `true` for a `*rest` segment.
pub fn is_wildcard_segment(segment: &str) -> bool {
    segment.starts_with('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/users/123"), vec!["users", "123"]);
        assert_eq!(split_path("/"), Vec::<&str>::new());
        assert_eq!(split_path(""), Vec::<&str>::new());
        assert_eq!(split_path("/users/"), vec!["users"]);
    }

    #[test]
    fn test_extract_param_name() {
        assert_eq!(extract_param_name(":id"), "id");
        assert_eq!(extract_param_name(":id<i32>"), "id");
        assert!(is_param_segment(":id"));
        assert!(!is_param_segment("users"));
        assert!(is_wildcard_segment("*rest"));
    }

    #[test]
    fn test_matchit_path() {
        let root = RoutePattern::parse("/").unwrap();
        assert_eq!(root.matchit_path(), "/");

        let pattern = RoutePattern::parse("/files/:bucket/*path").unwrap();
        assert_eq!(pattern.matchit_path(), "/files/{bucket}/{*path}");
        assert_eq!(pattern.param_names(), ["bucket", "path"]);

        let no_slash = RoutePattern::parse("/about").unwrap();
        assert_eq!(no_slash.matchit_path(), "/about");
    }

    #[test]
    fn test_parse_rejects_bad_patterns() {
        assert!(RoutePattern::parse("/a/*rest/b").is_err());
        assert!(RoutePattern::parse("/a/:id/:id").is_err());
        assert!(RoutePattern::parse("/a/:/").is_err());
        assert!(RoutePattern::parse("/a/{x}/").is_err());
    }

    #[test]
    fn test_reverse_positional_and_keyword() {
        let pattern = RoutePattern::parse("/orders/:id/").unwrap();
        assert_eq!(
            pattern.reverse(&ViewArgs::positional(["42"])).as_deref(),
            Some("/orders/42/")
        );
        assert_eq!(
            pattern.reverse(&ViewArgs::keyword([("id", "42")])).as_deref(),
            Some("/orders/42/")
        );
    }

    #[test]
    fn test_reverse_rejects_mismatched_args() {
        let pattern = RoutePattern::parse("/orders/:id/").unwrap();
        assert_eq!(pattern.reverse(&ViewArgs::new()), None);
        assert_eq!(pattern.reverse(&ViewArgs::keyword([("pk", "1")])), None);
        assert_eq!(pattern.reverse(&ViewArgs::positional(["1", "2"])), None);
        assert_eq!(pattern.reverse(&ViewArgs::positional([""])), None);

        let mixed = ViewArgs::positional(["1"]).with("id", "1");
        assert_eq!(pattern.reverse(&mixed), None);

        let literal = RoutePattern::parse("/customers/").unwrap();
        assert_eq!(literal.reverse(&ViewArgs::new()).as_deref(), Some("/customers/"));
        assert_eq!(literal.reverse(&ViewArgs::positional(["1"])), None);
    }

    #[test]
    fn test_reverse_escapes_values() {
        let pattern = RoutePattern::parse("/tags/:name/").unwrap();
        assert_eq!(
            pattern.reverse(&ViewArgs::positional(["a b/c"])).as_deref(),
            Some("/tags/a%20b%2Fc/")
        );

        let tail = RoutePattern::parse("/docs/*path").unwrap();
        assert_eq!(
            tail.reverse(&ViewArgs::positional(["guide/intro"])).as_deref(),
            Some("/docs/guide/intro")
        );
    }
}
