//! The breadcrumb dispatch protocol.
//!
//! A view wrapped with [`BreadcrumbOptions::wrap`] builds its part of the trail
//! every time it is dispatched:
//!
//! 1. On a **first** dispatch (the view is the requested page) the body always
//!    runs. On a **nested** dispatch (the view is an ancestor of the requested
//!    page) the body only runs when its subject cannot be derived otherwise; a
//!    placeholder result carrying the forwarded context stands in for it.
//! 2. Redirects, `405` responses and `OPTIONS` requests leave the body's
//!    response untouched and skip trail assembly.
//! 3. The level computes its subject(s) and its own address: the requested
//!    path on a first dispatch, the reverse-resolved address (plus forwarded
//!    query parameters) on a nested one.
//! 4. The declared parent is dispatched recursively and its trail is extended
//!    with this level's entries.
//! 5. The merged trail is attached to the response's render context and the
//!    executed views are reported on the response.
//!
//! Nested invocations are an ordinary [`Invocation`] value passed down the call
//! chain; view bodies never see it.
//!
//! # Example
//!
//! ```
//! use view_breadcrumbs::{
//!     BreadcrumbOptions, BreadcrumbRouter, RenderContext, Request, Response, Route, ViewTarget,
//! };
//!
//! let customers = BreadcrumbOptions::new()
//!     .subject("Customers")
//!     .wrap(ViewTarget::function("shop.views.customer_list", |_, _| {
//!         Response::template(RenderContext::new())
//!     }))
//!     .unwrap();
//!
//! let order = BreadcrumbOptions::new()
//!     .subject_fn(|call| format!("Order #{}", call.args.get("id").unwrap_or("?")).into())
//!     .parent("customer_list")
//!     .wrap(ViewTarget::function("shop.views.order_detail", |_, _| {
//!         Response::template(RenderContext::new())
//!     }))
//!     .unwrap();
//!
//! let mut router = BreadcrumbRouter::new();
//! router.add_route(Route::new("/customers/", customers).name("customer_list")).unwrap();
//! router.add_route(Route::new("/orders/:id/", order).name("order_detail")).unwrap();
//!
//! let response = router.handle(&Request::get("/orders/42/")).unwrap();
//! let trail = response.breadcrumbs("breadcrumbs").unwrap();
//! assert_eq!(trail.titles(), ["Customers", "Order #42"]);
//! assert_eq!(trail.urls(), [Some("/customers/"), Some("/orders/42/")]);
//! ```

use crate::config::BreadcrumbConfig;
use crate::error::{BreadcrumbError, Result};
use crate::legacy::LegacyRegistry;
use crate::params::ViewArgs;
use crate::parent::{ParentStrategy, DEFAULT_STRATEGIES};
use crate::query::QueryForwarding;
use crate::request::{RenderContext, Request, Response};
use crate::resolve::RouteResolver;
use crate::trail::{Breadcrumb, Breadcrumbs, SubjectValue};
use crate::view::{Handler, ViewId, ViewTarget};
use crate::{debug_log, trace_log, warn_log};
use http::Method;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// ViewCall
// ============================================================================

/// Everything a provider may look at for one dispatch of one level.
#[derive(Debug, Clone, Copy)]
pub struct ViewCall<'a> {
    /// The live request.
    pub request: &'a Request,
    /// Arguments this level was dispatched with.
    pub args: &'a ViewArgs,
    /// Render context of the level: the body's context when it ran, otherwise
    /// the context forwarded by the child.
    pub context: Option<&'a RenderContext>,
}

impl<'a> ViewCall<'a> {
    /// Look up a JSON value in the context.
    pub fn context_value(&self, key: &str) -> Option<&'a serde_json::Value> {
        self.context?.get_json(key)
    }
}

// ============================================================================
// Declaration types
// ============================================================================

/// Computes a level's subject(s).
pub type SubjectFn = Arc<dyn Fn(&ViewCall<'_>) -> SubjectValue + Send + Sync>;

/// Decides whether a level's subject is known without running its body.
pub type StaticFn = Arc<dyn Fn(&ViewCall<'_>) -> bool + Send + Sync>;

/// Computes the parent reference.
pub type ParentFn = Arc<dyn Fn(&ViewCall<'_>) -> Option<ParentRef> + Send + Sync>;

/// Computes the arguments the parent is dispatched with.
pub type ParentArgsFn = Arc<dyn Fn(&ViewCall<'_>) -> ParentArgs + Send + Sync>;

/// Where a level's subject comes from.
#[derive(Clone)]
pub enum SubjectSource {
    /// Fixed value. Ancestors with a fixed subject never run their body.
    Const(SubjectValue),
    /// Computed per dispatch.
    Provider(SubjectFn),
}

impl SubjectSource {
    fn evaluate(&self, call: &ViewCall<'_>) -> SubjectValue {
        match self {
            Self::Const(value) => value.clone(),
            Self::Provider(provider) => provider(call),
        }
    }
}

impl Default for SubjectSource {
    fn default() -> Self {
        Self::Const(SubjectValue::Empty)
    }
}

/// Whether a level's subject can be computed without running its body.
#[derive(Clone)]
pub enum StaticSubject {
    /// Fixed answer.
    Const(bool),
    /// Decided per dispatch, from the forwarded context.
    Predicate(StaticFn),
}

impl StaticSubject {
    fn evaluate(&self, call: &ViewCall<'_>) -> bool {
        match self {
            Self::Const(value) => *value,
            Self::Predicate(predicate) => predicate(call),
        }
    }
}

impl Default for StaticSubject {
    fn default() -> Self {
        Self::Const(false)
    }
}

/// A declared parent.
#[derive(Debug, Clone)]
pub enum ParentRef {
    /// A route name, or the dotted import path of a view.
    Name(String),
    /// A name together with the handler to invoke, skipping resolution.
    View {
        /// Name the parent reverses its own address with.
        name: String,
        /// Handler invoked directly.
        handler: Handler,
    },
}

impl ParentRef {
    /// Name of the parent.
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::View { name, .. } => name,
        }
    }

    /// Handler bound to the reference, when given explicitly.
    pub fn handler(&self) -> Option<&Handler> {
        match self {
            Self::Name(_) => None,
            Self::View { handler, .. } => Some(handler),
        }
    }
}

impl From<&str> for ParentRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ParentRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// How the parent of a level is found.
#[derive(Clone, Default)]
pub enum ParentSource {
    /// The level is a root.
    #[default]
    None,
    /// Always the same parent.
    Fixed(ParentRef),
    /// Computed per dispatch; `None` makes the level a root.
    Provider(ParentFn),
}

impl ParentSource {
    pub(crate) fn resolve(&self, call: &ViewCall<'_>) -> Option<ParentRef> {
        match self {
            Self::None => None,
            Self::Fixed(parent) => Some(parent.clone()),
            Self::Provider(provider) => provider(call),
        }
    }
}

/// Arguments for dispatching a parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParentArgs {
    /// Arguments the parent is reversed and invoked with.
    pub args: ViewArgs,
    /// Context forwarded to the parent. An empty context forwards nothing.
    pub context: RenderContext,
}

impl ParentArgs {
    /// Parent arguments without forwarded context.
    pub fn new(args: ViewArgs) -> Self {
        Self {
            args,
            context: RenderContext::new(),
        }
    }

    /// Forward `context` to the parent.
    #[must_use]
    pub fn context(mut self, context: RenderContext) -> Self {
        self.context = context;
        self
    }
}

// ============================================================================
// BreadcrumbOptions
// ============================================================================

/// Declaration of how a view takes part in breadcrumb trails.
#[derive(Clone, Default)]
pub struct BreadcrumbOptions {
    subject: SubjectSource,
    view_name: Option<String>,
    pub(crate) parent: ParentSource,
    pub(crate) parent_args: Option<ParentArgsFn>,
    get_params: QueryForwarding,
    static_subject: StaticSubject,
}

impl BreadcrumbOptions {
    /// Options for a root level without a subject.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<SubjectValue>) -> Self {
        self.subject = SubjectSource::Const(subject.into());
        self
    }

    /// Subject computed per dispatch.
    #[must_use]
    pub fn subject_fn<F>(mut self, provider: F) -> Self
    where
        F: Fn(&ViewCall<'_>) -> SubjectValue + Send + Sync + 'static,
    {
        self.subject = SubjectSource::Provider(Arc::new(provider));
        self
    }

    /// Override the name used to reverse this level's address.
    #[must_use]
    pub fn view_name(mut self, name: impl Into<String>) -> Self {
        self.view_name = Some(name.into());
        self
    }

    /// Parent identified by route name or dotted import path.
    #[must_use]
    pub fn parent(mut self, name: impl Into<String>) -> Self {
        self.parent = ParentSource::Fixed(ParentRef::Name(name.into()));
        self
    }

    /// Parent given as a name plus the handler to invoke.
    #[must_use]
    pub fn parent_view(mut self, name: impl Into<String>, handler: impl Into<Handler>) -> Self {
        self.parent = ParentSource::Fixed(ParentRef::View {
            name: name.into(),
            handler: handler.into(),
        });
        self
    }

    /// Parent computed per dispatch.
    #[must_use]
    pub fn parent_fn<F>(mut self, provider: F) -> Self
    where
        F: Fn(&ViewCall<'_>) -> Option<ParentRef> + Send + Sync + 'static,
    {
        self.parent = ParentSource::Provider(Arc::new(provider));
        self
    }

    /// Arguments and forwarded context for the parent. Without a provider the
    /// parent gets no arguments and no context.
    #[must_use]
    pub fn parent_args<F>(mut self, provider: F) -> Self
    where
        F: Fn(&ViewCall<'_>) -> ParentArgs + Send + Sync + 'static,
    {
        self.parent_args = Some(Arc::new(provider));
        self
    }

    /// Query parameters carried onto this level's address as an ancestor.
    /// See [`forwarded_query`](crate::forwarded_query) for the entry syntax.
    #[must_use]
    pub fn get_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.get_params = QueryForwarding::Fixed(names.into_iter().map(Into::into).collect());
        self
    }

    /// Forwarded query parameter names computed per dispatch.
    #[must_use]
    pub fn get_params_fn<F>(mut self, provider: F) -> Self
    where
        F: Fn(&ViewCall<'_>) -> Vec<String> + Send + Sync + 'static,
    {
        self.get_params = QueryForwarding::Computed(Arc::new(provider));
        self
    }

    /// Declare the subject derivable without running the body.
    #[must_use]
    pub fn static_subject(mut self, is_static: bool) -> Self {
        self.static_subject = StaticSubject::Const(is_static);
        self
    }

    /// Decide per dispatch whether the body can be skipped.
    #[must_use]
    pub fn static_subject_fn<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ViewCall<'_>) -> bool + Send + Sync + 'static,
    {
        self.static_subject = StaticSubject::Predicate(Arc::new(predicate));
        self
    }

    /// Wrap a plain view.
    ///
    /// Views that already take part in trails, wrapped or legacy, are rejected
    /// with [`BreadcrumbError::UnsupportedTarget`].
    pub fn wrap(self, handler: impl Into<Handler>) -> Result<Handler> {
        match handler.into() {
            Handler::Plain(target) => {
                debug_log!("Wrapped view '{}' for breadcrumbs", target.id());
                Ok(Handler::Breadcrumb(Arc::new(BreadcrumbView::new(target, self))))
            }
            Handler::Breadcrumb(view) => Err(BreadcrumbError::UnsupportedTarget {
                target: view.target().id().to_string(),
                reason: "view is already wrapped".to_string(),
            }),
            Handler::Legacy(view) => Err(BreadcrumbError::UnsupportedTarget {
                target: view.target().id().to_string(),
                reason: "legacy views cannot carry the dispatch protocol".to_string(),
            }),
        }
    }
}

impl fmt::Debug for BreadcrumbOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreadcrumbOptions")
            .field("view_name", &self.view_name)
            .field("has_parent", &!matches!(self.parent, ParentSource::None))
            .field("get_params", &self.get_params)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Invocation
// ============================================================================

/// How a wrapped view is being dispatched.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Invocation {
    /// The view is the requested page.
    #[default]
    First,
    /// The view is dispatched as an ancestor.
    Nested(NestedInvocation),
}

/// State carried into an ancestor dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedInvocation {
    /// Name the child referred to this view by.
    pub view_name: String,
    /// Context forwarded by the child, if any.
    pub context: Option<RenderContext>,
    /// Views dispatched in this request so far, this view included.
    pub chain: Vec<ChainLink>,
}

/// One view in the chain being dispatched, with the arguments it got.
///
/// The same view may appear several times with different arguments, as in a
/// category nested under its own parent category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    /// Name the view was dispatched under.
    pub name: String,
    /// Arguments it was dispatched with.
    pub args: ViewArgs,
}

impl ChainLink {
    /// Link for `name` dispatched with `args`.
    pub fn new(name: impl Into<String>, args: ViewArgs) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Outcome of dispatching a wrapped view.
#[derive(Debug, Clone)]
pub struct Dispatched {
    /// The response, with the trail attached when it carries a context.
    pub response: Response,
    /// The merged trail, root first.
    pub trail: Breadcrumbs,
    /// `true` when the response bypassed trail assembly.
    pub short_circuited: bool,
}

/// What an ancestor adds to its child's trail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contribution {
    /// Entries of the ancestor and everything above it, root first.
    pub trail: Breadcrumbs,
    /// Views executed while producing them.
    pub dispatched_views: Vec<ViewId>,
}

impl Contribution {
    /// Contribution of a single entry that executed nothing.
    pub fn entry(entry: Breadcrumb) -> Self {
        Self {
            trail: std::iter::once(entry).collect(),
            dispatched_views: Vec::new(),
        }
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Collaborators shared by every level of one request.
#[derive(Clone, Copy)]
pub struct Dispatcher<'a> {
    pub(crate) resolver: &'a dyn RouteResolver,
    pub(crate) legacy: &'a LegacyRegistry,
    pub(crate) config: &'a BreadcrumbConfig,
    pub(crate) strategies: &'a [&'a dyn ParentStrategy],
}

impl<'a> Dispatcher<'a> {
    /// Dispatcher using the default parent resolution strategies.
    pub fn new(
        resolver: &'a dyn RouteResolver,
        legacy: &'a LegacyRegistry,
        config: &'a BreadcrumbConfig,
    ) -> Self {
        Self {
            resolver,
            legacy,
            config,
            strategies: DEFAULT_STRATEGIES,
        }
    }

    /// Replace the parent resolution strategies, tried in the given order.
    #[must_use]
    pub fn with_strategies(mut self, strategies: &'a [&'a dyn ParentStrategy]) -> Self {
        self.strategies = strategies;
        self
    }

    /// Route resolver in use.
    pub fn resolver(&self) -> &'a dyn RouteResolver {
        self.resolver
    }

    /// Legacy views addressable by import path.
    pub fn legacy(&self) -> &'a LegacyRegistry {
        self.legacy
    }

    /// Settings in use.
    pub fn config(&self) -> &'a BreadcrumbConfig {
        self.config
    }

    /// Dispatch `handler` as the requested page.
    pub fn dispatch_first(
        &self,
        handler: &Handler,
        request: &Request,
        args: &ViewArgs,
    ) -> Result<Response> {
        match handler {
            Handler::Breadcrumb(view) => {
                let dispatched = view.dispatch(self, request, args, Invocation::First)?;
                Ok(dispatched.response)
            }
            Handler::Legacy(view) => Ok(view.target().call(request, args)),
            Handler::Plain(target) => Ok(target.call(request, args)),
        }
    }
}

impl fmt::Debug for Dispatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", self.config)
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

// ============================================================================
// BreadcrumbView
// ============================================================================

/// A view wrapped with the dispatch protocol.
pub struct BreadcrumbView {
    target: ViewTarget,
    options: BreadcrumbOptions,
}

impl BreadcrumbView {
    /// Wrap `target` with `options`.
    pub fn new(target: ViewTarget, options: BreadcrumbOptions) -> Self {
        Self { target, options }
    }

    /// The wrapped view body.
    pub fn target(&self) -> &ViewTarget {
        &self.target
    }

    /// The declaration.
    pub fn options(&self) -> &BreadcrumbOptions {
        &self.options
    }

    /// Dispatch the view and assemble its trail.
    pub fn dispatch(
        &self,
        dispatcher: &Dispatcher<'_>,
        request: &Request,
        args: &ViewArgs,
        invocation: Invocation,
    ) -> Result<Dispatched> {
        let id = self.target.id();
        let (nested_name, forwarded, chain) = match invocation {
            Invocation::First => (None, None, None),
            Invocation::Nested(nested) => (
                Some(nested.view_name),
                nested.context.filter(|context| !context.is_empty()),
                Some(nested.chain),
            ),
        };
        let first = nested_name.is_none();

        let view_name = match (&self.options.view_name, nested_name) {
            (Some(name), _) => name.clone(),
            (None, Some(name)) => name,
            (None, None) => {
                let found = dispatcher.resolver.resolve(request.path()).ok_or_else(|| {
                    BreadcrumbError::UnresolvedViewName {
                        path: request.path().to_string(),
                    }
                })?;
                found.url_name.unwrap_or_else(|| id.to_string())
            }
        };
        let chain =
            chain.unwrap_or_else(|| vec![ChainLink::new(view_name.clone(), args.clone())]);

        let mut response = match self.placeholder(request, args, first, forwarded.as_ref()) {
            Some(placeholder) => {
                trace_log!("Ancestor '{}' resolved without running its body", view_name);
                placeholder
            }
            None => {
                let mut response = self.target.call(request, args);
                if bypasses_trail(request, &response) {
                    debug_log!(
                        "View '{}' returned {}; trail assembly skipped",
                        id,
                        response.status()
                    );
                    if !first {
                        warn_log!(
                            "Ancestor '{}' short-circuited with {} and contributes nothing",
                            view_name,
                            response.status()
                        );
                    }
                    return Ok(Dispatched {
                        response,
                        trail: Breadcrumbs::new(),
                        short_circuited: true,
                    });
                }
                response.view_dispatch_count = 1;
                response.dispatched_views.push(id.clone());
                response
            }
        };

        let (trail, executed) = {
            let call = ViewCall {
                request,
                args,
                context: response.context().or(forwarded.as_ref()),
            };

            let url = if first {
                request.full_path()
            } else {
                self.nested_url(dispatcher, &view_name, &call)?
            };

            let own: Vec<Breadcrumb> = self
                .options
                .subject
                .evaluate(&call)
                .into_subjects()
                .into_iter()
                .map(|subject| Breadcrumb::new(subject, Some(url.clone())))
                .collect();

            let mut contribution = dispatcher.dispatch_parent(&self.options, &call, &chain)?;
            contribution.trail.append(own.into_iter().collect());
            (contribution.trail, contribution.dispatched_views)
        };

        if let Some(context) = response.context_mut() {
            context.insert(dispatcher.config.view_context_key(), trail.clone());
        }
        response.dispatched_views.extend(executed);

        debug_log!(
            "Dispatched '{}' ({}) with {} breadcrumb(s)",
            view_name,
            if first { "first" } else { "nested" },
            trail.len()
        );

        Ok(Dispatched {
            response,
            trail,
            short_circuited: false,
        })
    }

    fn placeholder(
        &self,
        request: &Request,
        args: &ViewArgs,
        first: bool,
        forwarded: Option<&RenderContext>,
    ) -> Option<Response> {
        if first {
            return None;
        }
        let context = forwarded.cloned().unwrap_or_default();
        let skip = !context.is_empty()
            || matches!(self.options.subject, SubjectSource::Const(_))
            || self.options.static_subject.evaluate(&ViewCall {
                request,
                args,
                context: Some(&context),
            });
        skip.then(|| Response::placeholder(context))
    }

    fn nested_url(
        &self,
        dispatcher: &Dispatcher<'_>,
        view_name: &str,
        call: &ViewCall<'_>,
    ) -> Result<String> {
        let mut url = dispatcher
            .resolver
            .reverse(view_name, call.args)
            .ok_or_else(|| BreadcrumbError::NoReverseMatch {
                name: view_name.to_string(),
                args: call.args.clone(),
            })?;

        let query = self.options.get_params.query_string(call);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }
}

impl fmt::Debug for BreadcrumbView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreadcrumbView")
            .field("target", &self.target)
            .field("options", &self.options)
            .finish()
    }
}

fn bypasses_trail(request: &Request, response: &Response) -> bool {
    response.is_redirect()
        || response.is_method_not_allowed()
        || *request.method() == Method::OPTIONS
}

// ============================================================================
// Tests
// ============================================================================
