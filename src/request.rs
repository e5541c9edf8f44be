//! Request and response types seen by wrapped views.
//!
//! These are deliberately small: the HTTP layer that parses real requests and
//! writes real responses lives outside this crate. What the dispatch engine
//! needs is:
//!
//! - [`Request`]: method, path, and the query string (raw for the current
//!   address, parsed for query forwarding).
//! - [`Response`]: status, redirect location, an optional [`RenderContext`]
//!   (present for template responses), and the list of views executed while
//!   producing it.
//! - [`RenderContext`]: the insertion-ordered template context the trail is
//!   attached to.

use crate::params::QueryParams;
use crate::trail::Breadcrumbs;
use crate::view::ViewId;
use http::{Method, StatusCode};
use indexmap::IndexMap;
use serde_json::Value;

// ============================================================================
// Request
// ============================================================================

/// Incoming request.
///
/// # Example
///
/// ```
/// use view_breadcrumbs::Request;
///
/// let request = Request::get("/orders/42/").with_query("page=2&sort=date");
/// assert_eq!(request.full_path(), "/orders/42/?page=2&sort=date");
/// assert_eq!(request.query().get("page"), Some("2"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query_string: String,
    query: QueryParams,
}

impl Request {
    /// Create a request with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query_string: String::new(),
            query: QueryParams::new(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Attach a raw, still escaped query string (without the leading `?`).
    #[must_use]
    pub fn with_query(mut self, query_string: impl Into<String>) -> Self {
        let query_string = query_string.into();
        let query_string = query_string.trim_start_matches('?').to_string();
        self.query = QueryParams::from_query_string(&query_string);
        self.query_string = query_string;
        self
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parsed query parameters.
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Path plus the original query string, as the browser requested it.
    pub fn full_path(&self) -> String {
        if self.query_string.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string)
        }
    }
}

// ============================================================================
// Render Context
// ============================================================================

/// A value stored in a [`RenderContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    /// Arbitrary template data.
    Json(Value),
    /// A breadcrumb trail.
    Breadcrumbs(Breadcrumbs),
}

impl From<Value> for ContextValue {
    fn from(value: Value) -> Self {
        ContextValue::Json(value)
    }
}

impl From<Breadcrumbs> for ContextValue {
    fn from(trail: Breadcrumbs) -> Self {
        ContextValue::Breadcrumbs(trail)
    }
}

/// Template context of a response, keys in insertion order.
///
/// ```
/// use serde_json::json;
/// use view_breadcrumbs::RenderContext;
///
/// let context = RenderContext::new().with("customer", json!({"name": "ACME"}));
/// assert_eq!(context.get_json("customer").unwrap()["name"], "ACME");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    values: IndexMap<String, ContextValue>,
}

impl RenderContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Raw access to a value.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }

    /// Access a JSON value; `None` if missing or holding a trail.
    pub fn get_json(&self, key: &str) -> Option<&Value> {
        match self.values.get(key)? {
            ContextValue::Json(value) => Some(value),
            ContextValue::Breadcrumbs(_) => None,
        }
    }

    /// Access a trail; `None` if missing or holding other data.
    pub fn breadcrumbs(&self, key: &str) -> Option<&Breadcrumbs> {
        match self.values.get(key)? {
            ContextValue::Breadcrumbs(trail) => Some(trail),
            ContextValue::Json(_) => None,
        }
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Return `true` if the context holds nothing.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

// ============================================================================
// Response
// ============================================================================

/// Outgoing response.
///
/// Template responses carry a [`RenderContext`]; plain responses, redirects
/// and error responses don't, and therefore never receive a trail.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    location: Option<String>,
    context: Option<RenderContext>,
    /// Number of times a wrapped view body ran to produce this response.
    pub view_dispatch_count: usize,
    /// Views executed while servicing the request, in execution order.
    pub dispatched_views: Vec<ViewId>,
}

impl Response {
    /// Plain response without a render context.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            location: None,
            context: None,
            view_dispatch_count: 0,
            dispatched_views: Vec::new(),
        }
    }

    /// `200 OK` plain response.
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// `200 OK` template response with the given context.
    pub fn template(context: RenderContext) -> Self {
        Self {
            context: Some(context),
            ..Self::ok()
        }
    }

    /// `302 Found` redirect.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::new(StatusCode::FOUND)
        }
    }

    /// `301 Moved Permanently` redirect.
    pub fn permanent_redirect(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::new(StatusCode::MOVED_PERMANENTLY)
        }
    }

    /// `405 Method Not Allowed`.
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED)
    }

    /// Stand-in result for an ancestor whose body was not executed.
    pub(crate) fn placeholder(context: RenderContext) -> Self {
        Self::template(context)
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Redirect target, if any.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Render context, present for template responses.
    pub fn context(&self) -> Option<&RenderContext> {
        self.context.as_ref()
    }

    /// Mutable render context.
    pub fn context_mut(&mut self) -> Option<&mut RenderContext> {
        self.context.as_mut()
    }

    /// Return `true` for redirects (3xx carrying a location).
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection() && self.location.is_some()
    }

    /// Return `true` for `405 Method Not Allowed`.
    pub fn is_method_not_allowed(&self) -> bool {
        self.status == StatusCode::METHOD_NOT_ALLOWED
    }

    /// Trail attached under `key`, if this response carries one.
    pub fn breadcrumbs(&self, key: &str) -> Option<&Breadcrumbs> {
        self.context.as_ref()?.breadcrumbs(key)
    }
}
