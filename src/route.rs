//! Route declarations.
//!
//! ```
//! use view_breadcrumbs::{Response, Route, ViewTarget};
//!
//! let route = Route::new(
//!     "/customers/",
//!     ViewTarget::function("shop.views.customer_list", |_, _| Response::ok()),
//! )
//! .name("customer_list");
//!
//! assert_eq!(route.path(), "/customers/");
//! assert_eq!(route.route_name(), Some("customer_list"));
//! ```

use crate::view::Handler;

/// A URL pattern bound to a handler, optionally named for reverse lookups.
#[derive(Debug, Clone)]
pub struct Route {
    path: String,
    name: Option<String>,
    handler: Handler,
}

impl Route {
    /// Bind `handler` to the pattern `path`.
    pub fn new(path: impl Into<String>, handler: impl Into<Handler>) -> Self {
        Self {
            path: path.into(),
            name: None,
            handler: handler.into(),
        }
    }

    /// Name the route so views can reverse it.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The pattern as declared.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Route name, if any.
    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Handler bound to the route.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}
