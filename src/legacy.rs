//! Bridge for views written before the dispatch protocol existed.
//!
//! A legacy view has no nested dispatch at all. It only carries a statically
//! attached subject, so the adapter can turn it into a single trail entry
//! without running anything. A legacy view without a subject cannot take part
//! in a trail and reports that to the caller, which treats the parent as not
//! dispatched.
//!
//! Legacy views are found either through a route (the URL is known) or by
//! their dotted import path in a [`LegacyRegistry`] (no URL).
//!
//! ```
//! use view_breadcrumbs::{LegacyView, Response, ViewTarget};
//!
//! let view = LegacyView::new(ViewTarget::function("shop.views.catalog", |_, _| Response::ok()))
//!     .subject("Catalog");
//!
//! let entry = view.adapt(None).unwrap();
//! assert_eq!(entry.title(), "Catalog");
//! assert_eq!(entry.url(), None);
//! ```

use crate::trail::{Breadcrumb, Subject};
use crate::view::{ViewId, ViewTarget};
use crate::{debug_log, trace_log};
use indexmap::IndexMap;
use std::sync::Arc;

/// A view using the static-subject convention.
#[derive(Debug, Clone)]
pub struct LegacyView {
    target: ViewTarget,
    subject: Option<Subject>,
}

impl LegacyView {
    /// Wrap a view body; attach a subject with [`subject`](Self::subject).
    pub fn new(target: ViewTarget) -> Self {
        Self {
            target,
            subject: None,
        }
    }

    /// Attach the static subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<Subject>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// The view body, run only when this view is requested directly.
    pub fn target(&self) -> &ViewTarget {
        &self.target
    }

    /// The attached subject, if any.
    pub fn static_subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    /// Turn this view into one trail entry without invoking it.
    ///
    /// `url` is the address the view was reached at, when known. Returns
    /// `None` when no subject is attached.
    pub fn adapt(&self, url: Option<String>) -> Option<Breadcrumb> {
        match &self.subject {
            Some(subject) => {
                trace_log!(
                    "Legacy view '{}' adapted with subject '{}'",
                    self.target.id(),
                    subject
                );
                Some(Breadcrumb::new(subject.clone(), url))
            }
            None => {
                debug_log!(
                    "Legacy view '{}' has no static subject attached",
                    self.target.id()
                );
                None
            }
        }
    }
}

/// Legacy views addressable by dotted import path.
#[derive(Debug, Clone, Default)]
pub struct LegacyRegistry {
    views: IndexMap<ViewId, Arc<LegacyView>>,
}

impl LegacyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view under its identifier, replacing any previous one.
    pub fn register(&mut self, view: Arc<LegacyView>) {
        self.views.insert(view.target().id().clone(), view);
    }

    /// Look a view up by import path.
    pub fn lookup(&self, path: &str) -> Option<&Arc<LegacyView>> {
        self.views.get(&ViewId::new(path))
    }

    /// Number of registered views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Return `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
