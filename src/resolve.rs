//! Route resolution in both directions.
//!
//! The dispatch engine only ever talks to the [`RouteResolver`] trait:
//!
//! - `reverse(name, args)`: symbolic name (or dotted view path) plus
//!   arguments to a concrete address;
//! - `resolve(path)`: address back to the route name, the handler bound to
//!   it, and the captured arguments.
//!
//! [`UrlConf`] is the bundled implementation. Forward matching runs on a
//! [`matchit`] radix tree; reverse matching rebuilds the path from the
//! compiled pattern, trying every route registered under the name in
//! registration order. With the `cache` feature, reverse results are memoized
//! in a [`ReverseCache`](crate::cache::ReverseCache).
//!
//! # Example
//!
//! ```
//! use view_breadcrumbs::{Response, Route, RouteResolver, UrlConf, ViewArgs, ViewTarget};
//!
//! let mut urls = UrlConf::new();
//! urls.add(
//!     Route::new("/orders/:id/", ViewTarget::function("shop.views.order", |_, _| Response::ok()))
//!         .name("order_detail"),
//! )
//! .unwrap();
//!
//! let url = urls.reverse("order_detail", &ViewArgs::positional(["42"])).unwrap();
//! assert_eq!(url, "/orders/42/");
//!
//! let found = urls.resolve(&url).unwrap();
//! assert_eq!(found.url_name.as_deref(), Some("order_detail"));
//! assert_eq!(found.args.get("id"), Some("42"));
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, ReverseCache};
use crate::error::{BreadcrumbError, Result};
use crate::matching::RoutePattern;
use crate::params::{decode_path_value, ViewArgs};
use crate::route::Route;
use crate::view::Handler;
use crate::{info_log, trace_log};
use indexmap::IndexMap;
#[cfg(feature = "cache")]
use std::sync::Mutex;

/// Result of resolving an address.
#[derive(Debug, Clone)]
pub struct ResolverMatch {
    /// Name of the matched route, if it has one.
    pub url_name: Option<String>,
    /// Handler bound to the route.
    pub handler: Handler,
    /// Arguments captured from the address (always keyword arguments).
    pub args: ViewArgs,
}

/// Maps symbolic names to addresses and back.
pub trait RouteResolver: Send + Sync {
    /// Address for `name` with `args`, or `None` when no route fits.
    fn reverse(&self, name: &str, args: &ViewArgs) -> Option<String>;

    /// Route matching `path`, or `None`.
    fn resolve(&self, path: &str) -> Option<ResolverMatch>;
}

#[derive(Debug)]
struct Entry {
    pattern: RoutePattern,
    route: Route,
}

/// Route table implementing [`RouteResolver`].
#[derive(Debug, Default)]
pub struct UrlConf {
    entries: Vec<Entry>,
    matcher: matchit::Router<usize>,
    by_name: IndexMap<String, Vec<usize>>,
    by_view: IndexMap<String, Vec<usize>>,
    #[cfg(feature = "cache")]
    cache: Mutex<ReverseCache>,
}

impl UrlConf {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route.
    ///
    /// Fails with [`BreadcrumbError::InvalidRoute`] when the pattern is
    /// malformed or conflicts with an already registered one.
    pub fn add(&mut self, route: Route) -> Result<()> {
        let pattern = RoutePattern::parse(route.path())?;
        let index = self.entries.len();

        self.matcher
            .insert(pattern.matchit_path(), index)
            .map_err(|err| BreadcrumbError::InvalidRoute {
                pattern: route.path().to_string(),
                message: err.to_string(),
            })?;

        if let Some(name) = route.route_name() {
            info_log!("Registered route '{}' (name: '{}')", route.path(), name);
            self.by_name.entry(name.to_string()).or_default().push(index);
        } else {
            info_log!("Registered route '{}'", route.path());
        }
        self.by_view
            .entry(route.handler().id().to_string())
            .or_default()
            .push(index);

        self.entries.push(Entry { pattern, route });

        #[cfg(feature = "cache")]
        self.clear_cache();

        Ok(())
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.entries.iter().map(|entry| &entry.route)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the reverse cache statistics.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache
            .lock()
            .map(|cache| cache.stats().clone())
            .unwrap_or_default()
    }

    #[cfg(feature = "cache")]
    fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    #[cfg(feature = "cache")]
    fn remember(&self, name: &str, args: &ViewArgs, url: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(name, args, url.to_string());
        }
    }

    fn reverse_uncached(&self, name: &str, args: &ViewArgs) -> Option<String> {
        let candidates = self
            .by_name
            .get(name)
            .or_else(|| self.by_view.get(name))?;

        candidates
            .iter()
            .find_map(|&index| self.entries[index].pattern.reverse(args))
    }
}

impl RouteResolver for UrlConf {
    fn reverse(&self, name: &str, args: &ViewArgs) -> Option<String> {
        #[cfg(feature = "cache")]
        {
            let cached = self
                .cache
                .lock()
                .ok()
                .and_then(|mut cache| cache.get(name, args));
            if cached.is_some() {
                return cached;
            }
        }

        let url = self.reverse_uncached(name, args);
        match &url {
            Some(url) => {
                trace_log!("Reversed '{}' ({}) to '{}'", name, args, url);
                #[cfg(feature = "cache")]
                self.remember(name, args, url);
            }
            None => trace_log!("No reverse match for '{}' ({})", name, args),
        }
        url
    }

    fn resolve(&self, path: &str) -> Option<ResolverMatch> {
        let matched = match self.matcher.at(path) {
            Ok(matched) => matched,
            Err(_) => {
                trace_log!("No route matches '{}'", path);
                return None;
            }
        };
        let entry = self.entries.get(*matched.value)?;

        let mut args = ViewArgs::new();
        for (key, value) in matched.params.iter() {
            args.insert(key, decode_path_value(value));
        }

        Some(ResolverMatch {
            url_name: entry.route.route_name().map(str::to_string),
            handler: entry.route.handler().clone(),
            args,
        })
    }
}
