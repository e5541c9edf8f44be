//! Process-wide breadcrumb settings.
//!
//! Built once, handed to [`BreadcrumbRouter`](crate::BreadcrumbRouter), and
//! read-only from then on. Nothing here changes per request.
//!
//! ```
//! use view_breadcrumbs::BreadcrumbConfig;
//!
//! let config = BreadcrumbConfig::new()
//!     .view_context_name("trail")
//!     .max_depth(8);
//!
//! assert_eq!(config.view_context_key(), "trail");
//! assert_eq!(config.template_context_key(), "breadcrumbs");
//! ```

/// Default key for both the view context and the template context.
pub const DEFAULT_CONTEXT_NAME: &str = "breadcrumbs";

/// Default limit on ancestry depth.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Breadcrumb settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbConfig {
    view_context_name: String,
    template_context_name: String,
    max_depth: usize,
    dispatch_warning_threshold: usize,
}

impl BreadcrumbConfig {
    /// Settings with every default applied.
    pub fn new() -> Self {
        Self {
            view_context_name: DEFAULT_CONTEXT_NAME.to_string(),
            template_context_name: DEFAULT_CONTEXT_NAME.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            dispatch_warning_threshold: 1,
        }
    }

    /// Key the merged trail is stored under in a response's render context.
    pub fn view_context_name(mut self, name: impl Into<String>) -> Self {
        self.view_context_name = name.into();
        self
    }

    /// Key used by [`Breadcrumbs::inclusion_context`](crate::Breadcrumbs::inclusion_context).
    pub fn template_context_name(mut self, name: impl Into<String>) -> Self {
        self.template_context_name = name.into();
        self
    }

    /// Maximum number of views in one ancestry chain.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Number of executed views per request above which a warning is logged.
    pub fn dispatch_warning_threshold(mut self, threshold: usize) -> Self {
        self.dispatch_warning_threshold = threshold;
        self
    }

    /// Current render-context key.
    pub fn view_context_key(&self) -> &str {
        &self.view_context_name
    }

    /// Current template-context key.
    pub fn template_context_key(&self) -> &str {
        &self.template_context_name
    }

    /// Current depth limit.
    pub const fn depth_limit(&self) -> usize {
        self.max_depth
    }

    /// Current warning threshold.
    pub const fn warning_threshold(&self) -> usize {
        self.dispatch_warning_threshold
    }
}

impl Default for BreadcrumbConfig {
    fn default() -> Self {
        Self::new()
    }
}
