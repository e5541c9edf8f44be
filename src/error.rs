//! Error handling for breadcrumb dispatch.
//!
//! Everything that can go wrong while wrapping a view, registering a route, or
//! assembling a trail is reported through [`BreadcrumbError`]:
//!
//! - **Configuration errors** surface as soon as the bad declaration is made:
//!   [`UnsupportedTarget`](BreadcrumbError::UnsupportedTarget) at wrap time,
//!   [`InvalidRoute`](BreadcrumbError::InvalidRoute) at registration time.
//! - **Chain-break errors** fail the request: a declared parent that no
//!   resolution strategy can dispatch
//!   ([`ChainBroken`](BreadcrumbError::ChainBroken)), a parent that points back
//!   into the chain ([`CyclicParent`](BreadcrumbError::CyclicParent)), or an
//!   ancestry deeper than the configured limit
//!   ([`DepthExceeded`](BreadcrumbError::DepthExceeded)).
//!
//! Resolution misses inside a single strategy are *not* errors; they move on to
//! the next strategy and never reach the caller.
//!
//! # Examples
//!
//! ```
//! use view_breadcrumbs::{BreadcrumbError, ViewArgs};
//!
//! let err = BreadcrumbError::ChainBroken {
//!     parent: "customer_list".into(),
//!     args: ViewArgs::new(),
//! };
//! assert!(err.is_chain_break());
//! assert!(err.to_string().contains("customer_list"));
//! ```

use crate::params::ViewArgs;
use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T, E = BreadcrumbError> = std::result::Result<T, E>;

/// Detailed error variants raised by the dispatch engine.
#[derive(Debug, Clone, PartialEq)]
pub enum BreadcrumbError {
    /// Wrapping something that cannot carry the dispatch protocol
    UnsupportedTarget { target: String, reason: String },

    /// Route pattern rejected at registration
    InvalidRoute { pattern: String, message: String },

    /// First dispatch whose symbolic name could not be determined
    UnresolvedViewName { path: String },

    /// A nested level could not reverse its own address
    NoReverseMatch { name: String, args: ViewArgs },

    /// Declared parent resolved by no strategy
    ChainBroken { parent: String, args: ViewArgs },

    /// Declared parent already present in the chain being dispatched
    CyclicParent { parent: String, chain: Vec<String> },

    /// Ancestry deeper than the configured limit
    DepthExceeded { parent: String, max_depth: usize },
}

impl fmt::Display for BreadcrumbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreadcrumbError::UnsupportedTarget { target, reason } => {
                write!(f, "Wrong decorated view {}: {}", target, reason)
            }
            BreadcrumbError::InvalidRoute { pattern, message } => {
                write!(f, "Invalid route '{}': {}", pattern, message)
            }
            BreadcrumbError::UnresolvedViewName { path } => {
                write!(f, "Cannot determine view name for path '{}'", path)
            }
            BreadcrumbError::NoReverseMatch { name, args } => {
                write!(f, "Reverse for '{}' with {} not found", name, args)
            }
            BreadcrumbError::ChainBroken { parent, args } => {
                write!(f, "Parent not dispatched {}, {}", parent, args)
            }
            BreadcrumbError::CyclicParent { parent, chain } => {
                write!(
                    f,
                    "Parent '{}' is already part of the breadcrumb chain [{}]",
                    parent,
                    chain.join(" -> ")
                )
            }
            BreadcrumbError::DepthExceeded { parent, max_depth } => {
                write!(
                    f,
                    "Dispatching parent '{}' exceeds the maximum breadcrumb depth ({})",
                    parent, max_depth
                )
            }
        }
    }
}

impl std::error::Error for BreadcrumbError {}

impl BreadcrumbError {
    /// Check if this error comes from a bad declaration rather than a request.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BreadcrumbError::UnsupportedTarget { .. } | BreadcrumbError::InvalidRoute { .. }
        )
    }

    /// Check if this error means the ancestry chain could not be completed.
    pub fn is_chain_break(&self) -> bool {
        matches!(
            self,
            BreadcrumbError::ChainBroken { .. }
                | BreadcrumbError::CyclicParent { .. }
                | BreadcrumbError::DepthExceeded { .. }
        )
    }

    /// Name of the parent reference that broke the chain, if any.
    pub fn broken_parent(&self) -> Option<&str> {
        match self {
            BreadcrumbError::ChainBroken { parent, .. }
            | BreadcrumbError::CyclicParent { parent, .. }
            | BreadcrumbError::DepthExceeded { parent, .. } => Some(parent),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
