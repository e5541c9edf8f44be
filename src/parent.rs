//! Parent dispatch and the resolution strategies behind it.
//!
//! A declared parent is resolved by an ordered list of [`ParentStrategy`]
//! values. Each one either produces the parent's contribution or reports
//! [`StrategyOutcome::NotFound`], in which case the next one is tried. The
//! first result other than `NotFound` wins.
//!
//! | Strategy | Finds the parent by | Entry address |
//! |----------|---------------------|---------------|
//! | [`RouteStrategy`] | reversing the name, then resolving the address | reversed |
//! | [`LegacyPathStrategy`] | dotted import path in the [`LegacyRegistry`](crate::LegacyRegistry) | none |
//!
//! When every strategy misses, the request fails with
//! [`BreadcrumbError::ChainBroken`]. A partial trail is never returned.
//!
//! Before any strategy runs, the parent is checked against the chain of views
//! already dispatched for this request. The same name with the same arguments
//! fails with [`BreadcrumbError::CyclicParent`]; the same name with other
//! arguments is a regular ancestor. A chain longer than
//! [`BreadcrumbConfig::depth_limit`](crate::BreadcrumbConfig::depth_limit)
//! fails with [`BreadcrumbError::DepthExceeded`].
//!
//! Both kinds of ancestor, wrapped and legacy, take part through the
//! [`AncestorContributor`] capability, so the strategies never look at how a
//! handler is built.

use crate::dispatch::{
    BreadcrumbOptions, BreadcrumbView, ChainLink, Contribution, Dispatcher, Invocation,
    NestedInvocation, ParentArgs, ViewCall,
};
use crate::error::{BreadcrumbError, Result};
use crate::legacy::LegacyView;
use crate::params::ViewArgs;
use crate::request::{RenderContext, Request};
use crate::trail::Breadcrumb;
use crate::view::Handler;
use crate::{debug_log, error_log, trace_log};

/// Strategies used by [`Dispatcher::new`], in order.
pub const DEFAULT_STRATEGIES: &[&dyn ParentStrategy] = &[&RouteStrategy, &LegacyPathStrategy];

// ============================================================================
// ParentCall
// ============================================================================

/// A parent about to be dispatched.
#[derive(Debug, Clone, Copy)]
pub struct ParentCall<'a> {
    /// Name the child declared.
    pub name: &'a str,
    /// Handler given with the declaration, if any.
    pub handler: Option<&'a Handler>,
    /// Arguments for the parent.
    pub args: &'a ViewArgs,
    /// Context forwarded to the parent; empty when nothing is forwarded.
    pub context: &'a RenderContext,
    /// Views dispatched so far, the parent included.
    pub chain: &'a [ChainLink],
}

// ============================================================================
// AncestorContributor
// ============================================================================

/// Something that can add entries to a child's trail.
pub trait AncestorContributor {
    /// Contribute to the trail, or `None` when this ancestor cannot take part.
    ///
    /// `url` is the address the ancestor was reached at, when known.
    fn contribute(
        &self,
        dispatcher: &Dispatcher<'_>,
        request: &Request,
        call: &ParentCall<'_>,
        url: Option<&str>,
    ) -> Result<Option<Contribution>>;
}

impl AncestorContributor for BreadcrumbView {
    fn contribute(
        &self,
        dispatcher: &Dispatcher<'_>,
        request: &Request,
        call: &ParentCall<'_>,
        _url: Option<&str>,
    ) -> Result<Option<Contribution>> {
        let invocation = Invocation::Nested(NestedInvocation {
            view_name: call.name.to_string(),
            context: (!call.context.is_empty()).then(|| call.context.clone()),
            chain: call.chain.to_vec(),
        });
        let dispatched = self.dispatch(dispatcher, request, call.args, invocation)?;

        if dispatched.short_circuited {
            return Ok(Some(Contribution::default()));
        }
        Ok(Some(Contribution {
            trail: dispatched.trail,
            dispatched_views: dispatched.response.dispatched_views,
        }))
    }
}

impl AncestorContributor for LegacyView {
    fn contribute(
        &self,
        _dispatcher: &Dispatcher<'_>,
        _request: &Request,
        _call: &ParentCall<'_>,
        url: Option<&str>,
    ) -> Result<Option<Contribution>> {
        Ok(self.adapt(url.map(str::to_string)).map(Contribution::entry))
    }
}

impl AncestorContributor for Handler {
    fn contribute(
        &self,
        dispatcher: &Dispatcher<'_>,
        request: &Request,
        call: &ParentCall<'_>,
        url: Option<&str>,
    ) -> Result<Option<Contribution>> {
        match self {
            Handler::Breadcrumb(view) => view.contribute(dispatcher, request, call, url),
            Handler::Legacy(view) => view.contribute(dispatcher, request, call, url),
            Handler::Plain(target) => {
                trace_log!("Parent '{}' is a plain view ({})", call.name, target.id());
                Ok(None)
            }
        }
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// Result of one resolution attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    /// The parent became a single entry without anything being executed.
    Entry(Breadcrumb),
    /// The parent was dispatched and contributed its trail.
    Trail(Contribution),
    /// This strategy cannot handle the parent.
    NotFound,
}

impl From<Option<Contribution>> for StrategyOutcome {
    fn from(contribution: Option<Contribution>) -> Self {
        contribution.map_or(Self::NotFound, Self::Trail)
    }
}

/// One way of turning a parent reference into a contribution.
pub trait ParentStrategy: Send + Sync {
    /// Try to dispatch the parent.
    fn attempt(
        &self,
        dispatcher: &Dispatcher<'_>,
        request: &Request,
        call: &ParentCall<'_>,
    ) -> Result<StrategyOutcome>;

    /// Strategy name for diagnostics.
    fn name(&self) -> &'static str {
        "ParentStrategy"
    }
}

/// Reverse the parent name, resolve the address back to a handler and let the
/// handler contribute. A handler declared together with the name is used
/// directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteStrategy;

impl ParentStrategy for RouteStrategy {
    fn attempt(
        &self,
        dispatcher: &Dispatcher<'_>,
        request: &Request,
        call: &ParentCall<'_>,
    ) -> Result<StrategyOutcome> {
        let url = dispatcher.resolver().reverse(call.name, call.args);

        if let Some(handler) = call.handler {
            return Ok(handler
                .contribute(dispatcher, request, call, url.as_deref())?
                .into());
        }

        let Some(url) = url else {
            trace_log!("Parent '{}' ({}) has no reverse match", call.name, call.args);
            return Ok(StrategyOutcome::NotFound);
        };
        let Some(found) = dispatcher.resolver().resolve(&url) else {
            trace_log!("Reversed parent address '{}' does not resolve", url);
            return Ok(StrategyOutcome::NotFound);
        };

        Ok(found
            .handler
            .contribute(dispatcher, request, call, Some(&url))?
            .into())
    }

    fn name(&self) -> &'static str {
        "route"
    }
}

/// Look the parent up as a dotted import path among legacy views.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyPathStrategy;

impl ParentStrategy for LegacyPathStrategy {
    fn attempt(
        &self,
        dispatcher: &Dispatcher<'_>,
        _request: &Request,
        call: &ParentCall<'_>,
    ) -> Result<StrategyOutcome> {
        let Some(view) = dispatcher.legacy().lookup(call.name) else {
            trace_log!("No legacy view at import path '{}'", call.name);
            return Ok(StrategyOutcome::NotFound);
        };
        Ok(view
            .adapt(None)
            .map_or(StrategyOutcome::NotFound, StrategyOutcome::Entry))
    }

    fn name(&self) -> &'static str {
        "legacy-path"
    }
}

// ============================================================================
// Parent dispatch
// ============================================================================

impl Dispatcher<'_> {
    /// Dispatch the parent declared in `options` for the level described by
    /// `call`. `chain` holds the views dispatched so far, that level included.
    ///
    /// A level without a parent yields an empty contribution.
    pub fn dispatch_parent(
        &self,
        options: &BreadcrumbOptions,
        call: &ViewCall<'_>,
        chain: &[ChainLink],
    ) -> Result<Contribution> {
        let Some(parent) = options.parent.resolve(call) else {
            return Ok(Contribution::default());
        };
        let name = parent.name();
        let parent_args = options
            .parent_args
            .as_ref()
            .map(|provider| provider(call))
            .unwrap_or_default();

        let ParentArgs { args, context } = &parent_args;
        if chain.iter().any(|link| link.name == name && link.args == *args) {
            let names: Vec<String> = chain.iter().map(|link| link.name.clone()).collect();
            error_log!("Parent '{}' ({}) points back into [{}]", name, args, names.join(" -> "));
            return Err(BreadcrumbError::CyclicParent {
                parent: name.to_string(),
                chain: names,
            });
        }
        if chain.len() >= self.config().depth_limit() {
            error_log!(
                "Parent '{}' exceeds the maximum breadcrumb depth ({})",
                name,
                self.config().depth_limit()
            );
            return Err(BreadcrumbError::DepthExceeded {
                parent: name.to_string(),
                max_depth: self.config().depth_limit(),
            });
        }

        let mut next_chain = chain.to_vec();
        next_chain.push(ChainLink::new(name, args.clone()));
        let parent_call = ParentCall {
            name,
            handler: parent.handler(),
            args,
            context,
            chain: &next_chain,
        };

        debug_log!("Dispatching parent '{}' ({})", name, args);
        for strategy in self.strategies {
            match strategy.attempt(self, call.request, &parent_call)? {
                StrategyOutcome::Entry(entry) => {
                    trace_log!("Parent '{}' adapted by '{}'", name, strategy.name());
                    return Ok(Contribution::entry(entry));
                }
                StrategyOutcome::Trail(contribution) => {
                    trace_log!("Parent '{}' dispatched by '{}'", name, strategy.name());
                    return Ok(contribution);
                }
                StrategyOutcome::NotFound => {
                    trace_log!("Strategy '{}' missed parent '{}'", strategy.name(), name);
                }
            }
        }

        let err = BreadcrumbError::ChainBroken {
            parent: name.to_string(),
            args: args.clone(),
        };
        error_log!("Breadcrumb chain broken: {}", err);
        Err(err)
    }
}

// ============================================================================
// Tests
// ============================================================================
