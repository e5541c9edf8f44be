//! Request entry point.
//!
//! [`BreadcrumbRouter`] ties the pieces together: the route table, the legacy
//! views addressable by import path, the settings, and the response
//! middleware. [`handle`](BreadcrumbRouter::handle) runs the whole pipeline
//! for one request (resolve → first dispatch → middleware).

use crate::config::BreadcrumbConfig;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::legacy::{LegacyRegistry, LegacyView};
#[cfg(feature = "middleware")]
use crate::middleware::{DispatchCountWarning, DispatchMiddleware};
use crate::request::{Request, Response};
use crate::resolve::{RouteResolver, UrlConf};
use crate::route::Route;
use crate::view::Handler;
use crate::{debug_log, info_log, trace_log};
use http::StatusCode;
use std::sync::Arc;

/// Routes requests to views and assembles their breadcrumb trails.
pub struct BreadcrumbRouter {
    urls: UrlConf,
    legacy: LegacyRegistry,
    config: BreadcrumbConfig,
    #[cfg(feature = "middleware")]
    middleware: Vec<Box<dyn DispatchMiddleware>>,
}

impl BreadcrumbRouter {
    /// Router with default settings.
    pub fn new() -> Self {
        Self::with_config(BreadcrumbConfig::default())
    }

    /// Router with the given settings.
    ///
    /// With the `middleware` feature, a [`DispatchCountWarning`] using the
    /// configured threshold is installed.
    pub fn with_config(config: BreadcrumbConfig) -> Self {
        Self {
            urls: UrlConf::new(),
            legacy: LegacyRegistry::new(),
            #[cfg(feature = "middleware")]
            middleware: vec![Box::new(DispatchCountWarning::new(
                config.warning_threshold(),
            ))],
            config,
        }
    }

    /// Register a route. Legacy views become addressable by import path too.
    pub fn add_route(&mut self, route: Route) -> Result<()> {
        let legacy = match route.handler() {
            Handler::Legacy(view) => Some(Arc::clone(view)),
            _ => None,
        };
        self.urls.add(route)?;
        if let Some(view) = legacy {
            self.legacy.register(view);
        }
        Ok(())
    }

    /// Make a legacy view addressable by import path without routing it.
    pub fn register_legacy(&mut self, view: LegacyView) {
        info_log!("Registered legacy view '{}'", view.target().id());
        self.legacy.register(Arc::new(view));
    }

    /// Attach response middleware.
    #[cfg(feature = "middleware")]
    pub fn add_middleware(&mut self, middleware: impl DispatchMiddleware) {
        self.middleware.push(Box::new(middleware));
    }

    /// The route table.
    pub fn urls(&self) -> &UrlConf {
        &self.urls
    }

    /// Legacy views addressable by import path.
    pub fn legacy(&self) -> &LegacyRegistry {
        &self.legacy
    }

    /// Settings in use.
    pub fn config(&self) -> &BreadcrumbConfig {
        &self.config
    }

    /// Dispatcher over this router's collaborators.
    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(&self.urls, &self.legacy, &self.config)
    }

    /// Handle one request.
    ///
    /// Unmatched paths get a plain `404 Not Found`. A broken ancestry chain
    /// fails the whole request.
    pub fn handle(&self, request: &Request) -> Result<Response> {
        let Some(found) = self.urls.resolve(request.path()) else {
            debug_log!("No route for '{}'", request.path());
            return Ok(Response::new(StatusCode::NOT_FOUND));
        };

        trace_log!(
            "'{}' resolved to {} view '{}'",
            request.path(),
            found.handler.kind(),
            found.handler.id()
        );
        let response = self
            .dispatcher()
            .dispatch_first(&found.handler, request, &found.args)?;

        #[cfg(feature = "middleware")]
        self.run_middleware(request, &response);

        Ok(response)
    }

    #[cfg(feature = "middleware")]
    fn run_middleware(&self, request: &Request, response: &Response) {
        let mut middleware: Vec<&dyn DispatchMiddleware> =
            self.middleware.iter().map(AsRef::as_ref).collect();

        // Higher priority first
        middleware.sort_by_key(|mw| std::cmp::Reverse(mw.priority()));

        for mw in middleware {
            trace_log!(
                "Middleware '{}' process_response for '{}'",
                mw.name(),
                request.path()
            );
            mw.process_response(request, response);
        }
    }
}

impl Default for BreadcrumbRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BreadcrumbRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreadcrumbRouter")
            .field("routes", &self.urls.len())
            .field("legacy", &self.legacy.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
