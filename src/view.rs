//! View targets and route handlers.
//!
//! A view is registered in one of two shapes, fixed at registration time:
//!
//! | Shape | Type | Typical use |
//! |-------|------|-------------|
//! | class-style | [`ClassView`] behind [`ViewTarget::Class`] | views with configuration state |
//! | function | closure behind [`ViewTarget::Function`] | small one-off views |
//!
//! A route points at a [`Handler`], which says how the view takes part in
//! breadcrumb trails: wrapped with the dispatch protocol, legacy (a statically
//! attached subject), or not at all.
//!
//! # Example
//!
//! ```
//! use view_breadcrumbs::{ClassView, Request, Response, ViewArgs, ViewTarget};
//!
//! struct CustomerList;
//!
//! impl ClassView for CustomerList {
//!     fn dispatch(&self, _request: &Request, _args: &ViewArgs) -> Response {
//!         Response::ok()
//!     }
//!
//!     fn name(&self) -> String {
//!         "shop.views.CustomerList".into()
//!     }
//! }
//!
//! let target = ViewTarget::class(CustomerList);
//! assert_eq!(target.id().as_str(), "shop.views.CustomerList");
//!
//! let target = ViewTarget::function("shop.views.home", |_req, _args| Response::ok());
//! assert_eq!(target.id().as_str(), "shop.views.home");
//! ```

use crate::dispatch::BreadcrumbView;
use crate::legacy::LegacyView;
use crate::params::ViewArgs;
use crate::request::{Request, Response};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// ViewId
// ============================================================================

/// Identifier of a view, conventionally its dotted import path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(Arc<str>);

impl ViewId {
    /// Create an identifier.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ViewId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl PartialEq<&str> for ViewId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Serialize for ViewId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

// ============================================================================
// ClassView
// ============================================================================

/// A class-style view: an object whose `dispatch` handles the request.
pub trait ClassView: Send + Sync + 'static {
    /// Handle the request.
    fn dispatch(&self, request: &Request, args: &ViewArgs) -> Response;

    /// Identifier used in diagnostics and for import-path lookups.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Signature of a function view.
pub type ViewFn = Arc<dyn Fn(&Request, &ViewArgs) -> Response + Send + Sync>;

// ============================================================================
// ViewTarget
// ============================================================================

/// A callable view body, either class-style or a plain function.
#[derive(Clone)]
pub enum ViewTarget {
    /// Class-style view.
    Class {
        /// Identifier captured at registration.
        id: ViewId,
        /// The view object.
        view: Arc<dyn ClassView>,
    },
    /// Plain function view.
    Function {
        /// Identifier given at registration.
        id: ViewId,
        /// The function body.
        func: ViewFn,
    },
}

impl ViewTarget {
    /// Register a class-style view.
    pub fn class<V: ClassView>(view: V) -> Self {
        let id = ViewId::new(view.name());
        Self::Class {
            id,
            view: Arc::new(view),
        }
    }

    /// Register a function view under `id`.
    pub fn function<F>(id: impl Into<ViewId>, func: F) -> Self
    where
        F: Fn(&Request, &ViewArgs) -> Response + Send + Sync + 'static,
    {
        Self::Function {
            id: id.into(),
            func: Arc::new(func),
        }
    }

    /// Identifier of the view.
    pub fn id(&self) -> &ViewId {
        match self {
            Self::Class { id, .. } | Self::Function { id, .. } => id,
        }
    }

    /// Run the view body.
    pub fn call(&self, request: &Request, args: &ViewArgs) -> Response {
        match self {
            Self::Class { view, .. } => view.dispatch(request, args),
            Self::Function { func, .. } => func(request, args),
        }
    }
}

impl fmt::Debug for ViewTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class { id, .. } => f.debug_tuple("Class").field(id).finish(),
            Self::Function { id, .. } => f.debug_tuple("Function").field(id).finish(),
        }
    }
}

// ============================================================================
// Handler
// ============================================================================

/// What a route dispatches to.
#[derive(Clone)]
pub enum Handler {
    /// Wrapped with the breadcrumb dispatch protocol.
    Breadcrumb(Arc<BreadcrumbView>),
    /// Older convention: a statically attached subject, no nested dispatch.
    Legacy(Arc<LegacyView>),
    /// Not taking part in breadcrumbs.
    Plain(ViewTarget),
}

impl Handler {
    /// Identifier of the underlying view.
    pub fn id(&self) -> &ViewId {
        match self {
            Self::Breadcrumb(view) => view.target().id(),
            Self::Legacy(view) => view.target().id(),
            Self::Plain(target) => target.id(),
        }
    }

    /// Short label of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Breadcrumb(_) => "breadcrumb",
            Self::Legacy(_) => "legacy",
            Self::Plain(_) => "plain",
        }
    }
}

impl From<ViewTarget> for Handler {
    fn from(target: ViewTarget) -> Self {
        Self::Plain(target)
    }
}

impl From<LegacyView> for Handler {
    fn from(view: LegacyView) -> Self {
        Self::Legacy(Arc::new(view))
    }
}

impl From<BreadcrumbView> for Handler {
    fn from(view: BreadcrumbView) -> Self {
        Self::Breadcrumb(Arc::new(view))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("kind", &self.kind())
            .field("id", self.id())
            .finish()
    }
}
