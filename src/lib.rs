//! # view-breadcrumbs
//!
//! Breadcrumb trails built by re-dispatching the parent views of the current
//! page instead of configuring a static page tree.
//!
//! A view is wrapped with [`BreadcrumbOptions`]: a subject (what the entry
//! shows), an optional parent (the view one level up), and a few knobs for
//! forwarded arguments and query parameters. When the view handles a request,
//! it dispatches its parent as a *nested* invocation, the parent dispatches
//! its own parent, and so on up to a root. Each level reports its entries and
//! the merged trail, root first, is attached to the response's render context.
//!
//! ## Modules
//!
//! - [`dispatch`]: the wrapping declaration and the dispatch protocol
//! - [`parent`]: parent resolution strategies and the cycle/depth guard
//! - [`resolve`]: the [`RouteResolver`] trait and the bundled [`UrlConf`]
//! - [`legacy`]: views with a statically attached subject
//! - [`trail`]: [`Breadcrumb`] / [`Breadcrumbs`]
//! - [`query`]: query-string forwarding onto ancestor addresses
//! - [`router`]: [`BreadcrumbRouter`], the request entry point
//!
//! ## Features
//!
//! | Feature | Default | Purpose |
//! |---------|---------|---------|
//! | `log` | yes | log through the `log` crate |
//! | `tracing` | no | log through the `tracing` crate instead |
//! | `cache` | yes | LRU cache for reverse resolution |
//! | `middleware` | yes | response middleware, dispatch-count warning |
//!
//! ## Example
//!
//! ```
//! use view_breadcrumbs::{
//!     BreadcrumbOptions, BreadcrumbRouter, RenderContext, Request, Response, Route, ViewTarget,
//! };
//!
//! let mut router = BreadcrumbRouter::new();
//!
//! router
//!     .add_route(
//!         Route::new(
//!             "/customers/",
//!             BreadcrumbOptions::new()
//!                 .subject("Customers")
//!                 .wrap(ViewTarget::function("shop.customer_list", |_, _| {
//!                     Response::template(RenderContext::new())
//!                 }))
//!                 .unwrap(),
//!         )
//!         .name("customer_list"),
//!     )
//!     .unwrap();
//!
//! router
//!     .add_route(
//!         Route::new(
//!             "/customers/:pk/",
//!             BreadcrumbOptions::new()
//!                 .subject_fn(|call| format!("Customer {}", call.args.get("pk").unwrap_or("?")).into())
//!                 .parent("customer_list")
//!                 .wrap(ViewTarget::function("shop.customer_detail", |_, _| {
//!                     Response::template(RenderContext::new())
//!                 }))
//!                 .unwrap(),
//!         )
//!         .name("customer_detail"),
//!     )
//!     .unwrap();
//!
//! let response = router.handle(&Request::get("/customers/7/")).unwrap();
//! let trail = response.breadcrumbs("breadcrumbs").unwrap();
//! assert_eq!(trail.titles(), ["Customers", "Customer 7"]);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;

#[cfg(feature = "cache")]
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod legacy;
pub mod matching;
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod params;
pub mod parent;
pub mod query;
pub mod request;
pub mod resolve;
pub mod route;
pub mod router;
pub mod trail;
pub mod view;

pub use config::BreadcrumbConfig;
pub use dispatch::{
    BreadcrumbOptions, BreadcrumbView, ChainLink, Contribution, Dispatched, Dispatcher, Invocation,
    NestedInvocation, ParentArgs, ParentRef, ViewCall,
};
pub use error::{BreadcrumbError, Result};
pub use legacy::{LegacyRegistry, LegacyView};
#[cfg(feature = "middleware")]
pub use middleware::{middleware_fn, DispatchCountWarning, DispatchMiddleware};
pub use params::{QueryParams, ViewArgs};
pub use parent::{
    AncestorContributor, LegacyPathStrategy, ParentCall, ParentStrategy, RouteStrategy,
    StrategyOutcome,
};
pub use query::{forwarded_query, QueryForwarding};
pub use request::{ContextValue, RenderContext, Request, Response};
pub use resolve::{ResolverMatch, RouteResolver, UrlConf};
pub use route::Route;
pub use router::BreadcrumbRouter;
pub use trail::{Breadcrumb, Breadcrumbs, Subject, SubjectValue};
pub use view::{ClassView, Handler, ViewId, ViewTarget};
