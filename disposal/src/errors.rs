//! Error types for the teardown lifecycle.
//!
//! The error design follows two rules from the lifecycle contract:
//!
//! - **Use-after-release is the only synchronous error** raised by guarded
//!   operations. Once a resource is disposed, every guarded access fails with
//!   [`DisposeError::AlreadyReleased`] naming the resource type.
//! - **Teardown-hook failures never block the state transition.** A hook
//!   error surfaces to the caller of an explicit release only after the
//!   disposed flag has been set; on the fallback path there is no caller, so
//!   hook failures are contained and reported through the diagnostic sink.

use thiserror::Error;

/// Failure raised by a teardown hook.
///
/// Hooks return this rather than a bare string so the handle can attribute
/// the failure to the managed or unmanaged phase when propagating it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TeardownError {
    message: String,
}

impl TeardownError {
    /// Create a teardown error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised by the teardown lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisposeError {
    /// A guarded operation was invoked after the resource was released.
    #[error("{resource} has already been released")]
    AlreadyReleased {
        /// Type name of the resource that was accessed after release.
        resource: &'static str,
    },

    /// The managed-resource teardown hook failed during an explicit release.
    #[error("managed teardown failed for {resource}: {source}")]
    ManagedTeardown {
        /// Type name of the resource being torn down.
        resource: &'static str,
        /// The hook failure.
        source: TeardownError,
    },

    /// The unmanaged-resource teardown hook failed during an explicit release.
    #[error("unmanaged teardown failed for {resource}: {source}")]
    UnmanagedTeardown {
        /// Type name of the resource being torn down.
        resource: &'static str,
        /// The hook failure.
        source: TeardownError,
    },
}

impl DisposeError {
    /// Returns `true` for the use-after-release variant.
    pub const fn is_already_released(&self) -> bool {
        matches!(self, Self::AlreadyReleased { .. })
    }
}

/// Type alias for lifecycle operation results.
pub type DisposeResult<T> = Result<T, DisposeError>;
