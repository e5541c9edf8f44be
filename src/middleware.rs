//! Response middleware for cross-cutting dispatch concerns.
//!
//! Middleware sees every response after the requested view and its ancestors
//! have been dispatched. It observes; it does not decide whether a view runs
//! or change the trail.
//!
//! # Execution order
//!
//! When multiple middleware are attached, they run in **priority order**
//! (higher [`priority`](DispatchMiddleware::priority) first).
//!
//! # Creating middleware
//!
//! | Approach | When to use |
//! |----------|-------------|
//! | Implement [`DispatchMiddleware`] | Full control, named, with custom priority |
//! | [`middleware_fn`] | Quick one-off from a closure |
//! | [`DispatchCountWarning`] | Warn when one request executes too many views |
//!
//! # Example
//!
//! ```
//! use view_breadcrumbs::{DispatchMiddleware, Request, Response};
//!
//! struct AuditMiddleware;
//!
//! impl DispatchMiddleware for AuditMiddleware {
//!     fn process_response(&self, request: &Request, response: &Response) {
//!         println!("{} executed {} view(s)", request.path(), response.dispatched_views.len());
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "AuditMiddleware"
//!     }
//! }
//! ```

use crate::request::{Request, Response};
use crate::warn_log;

// ============================================================================
// DispatchMiddleware trait
// ============================================================================

/// Middleware that inspects dispatched responses.
pub trait DispatchMiddleware: Send + Sync + 'static {
    /// Called once per request with the final response.
    fn process_response(&self, request: &Request, response: &Response);

    /// Middleware name for debugging.
    fn name(&self) -> &'static str {
        "DispatchMiddleware"
    }

    /// Middleware priority (higher runs first).
    fn priority(&self) -> i32 {
        0
    }
}

// ============================================================================
// middleware_fn helper
// ============================================================================

/// Create middleware from a closure.
///
/// # Example
///
/// ```
/// use view_breadcrumbs::middleware_fn;
///
/// let mw = middleware_fn(|request, response| {
///     println!("{} -> {}", request.path(), response.status());
/// });
/// ```
pub const fn middleware_fn<F>(process: F) -> FnMiddleware<F>
where
    F: Fn(&Request, &Response) + Send + Sync + 'static,
{
    FnMiddleware { process }
}

/// Middleware created from a closure via [`middleware_fn`].
pub struct FnMiddleware<F> {
    process: F,
}

impl<F> DispatchMiddleware for FnMiddleware<F>
where
    F: Fn(&Request, &Response) + Send + Sync + 'static,
{
    fn process_response(&self, request: &Request, response: &Response) {
        (self.process)(request, response);
    }

    fn name(&self) -> &'static str {
        "FnMiddleware"
    }
}

// ============================================================================
// DispatchCountWarning
// ============================================================================

/// Logs a warning when one request executed more views than the threshold.
///
/// Ancestors whose subject cannot be derived from forwarded context run their
/// body again on every request below them; this makes that visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchCountWarning {
    threshold: usize,
}

impl DispatchCountWarning {
    /// Warn when more than `threshold` views ran.
    pub const fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Current threshold.
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// Return `true` if `response` is over the threshold.
    pub fn exceeds(&self, response: &Response) -> bool {
        response.dispatched_views.len() > self.threshold
    }
}

impl Default for DispatchCountWarning {
    fn default() -> Self {
        Self::new(1)
    }
}

impl DispatchMiddleware for DispatchCountWarning {
    fn process_response(&self, request: &Request, response: &Response) {
        if self.exceeds(response) {
            let views: Vec<&str> = response.dispatched_views.iter().map(|id| id.as_str()).collect();
            warn_log!(
                "Breadcrumbs call view dispatch count too much: {} (request: {}, views: [{}])",
                views.len(),
                request.full_path(),
                views.join(", ")
            );
        }
    }

    fn name(&self) -> &'static str {
        "DispatchCountWarning"
    }

    fn priority(&self) -> i32 {
        -100
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewId;
    use std::sync::{Arc, Mutex};

    struct TestMiddleware {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl DispatchMiddleware for TestMiddleware {
        fn process_response(&self, request: &Request, response: &Response) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}:{}", request.path(), response.status().as_u16()));
        }
    }

    fn response_with(views: &[&str]) -> Response {
        let mut response = Response::ok();
        response.dispatched_views = views.iter().map(|id| ViewId::new(id)).collect();
        response
    }

    #[test]
    fn test_middleware_process_response() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let middleware = TestMiddleware {
            calls: calls.clone(),
        };

        middleware.process_response(&Request::get("/test/"), &Response::ok());

        let log = calls.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0], "/test/:200");
        drop(log);
    }

    #[test]
    fn test_middleware_defaults() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let middleware = TestMiddleware { calls };
        assert_eq!(middleware.name(), "DispatchMiddleware");
        assert_eq!(middleware.priority(), 0);
    }

    #[test]
    fn test_middleware_fn() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let calls_clone = calls.clone();

        let mw = middleware_fn(move |req, resp| {
            calls_clone
                .lock()
                .unwrap()
                .push(format!("{}:{}", req.path(), resp.dispatched_views.len()));
        });

        mw.process_response(&Request::get("/page/"), &response_with(&["a", "b"]));
        assert_eq!(*calls.lock().unwrap(), vec!["/page/:2"]);
        assert_eq!(mw.name(), "FnMiddleware");
    }

    #[test]
    fn test_dispatch_count_threshold() {
        let warning = DispatchCountWarning::default();
        assert_eq!(warning.threshold(), 1);
        assert!(!warning.exceeds(&response_with(&[])));
        assert!(!warning.exceeds(&response_with(&["a"])));
        assert!(warning.exceeds(&response_with(&["a", "b"])));

        let lenient = DispatchCountWarning::new(3);
        assert!(!lenient.exceeds(&response_with(&["a", "b", "c"])));
        lenient.process_response(&Request::get("/"), &response_with(&["a", "b", "c", "d"]));
    }
}
