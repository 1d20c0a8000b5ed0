//! `disposal` - Deterministic resource teardown with drop-based fallback
//!
//! This library provides the teardown half of resource management: a handle
//! type and hook trait that guarantee cleanup logic for a scarce resource (a
//! file handle, a connection, an unmanaged buffer) runs at most once, with
//! protection against double release, reentrancy, and silent leaks.
//!
//! - [`Dispose`] is implemented by the resource-owning type: a managed-
//!   teardown hook, an unmanaged-teardown hook, and advisory leak hooks.
//! - [`Disposable`] owns the resource and the lifecycle state. Explicit
//!   [`Disposable::release`] is the supported path; dropping the handle
//!   without releasing triggers a best-effort fallback that skips the
//!   managed hook and can report a leak diagnostic.
//! - [`AsyncRelease`] is the asynchronous variant, delegating to the same
//!   state machine.
//!
//! Acquisition, pooling, and cleanup scheduling are out of scope; the crate
//! manages single-object, single-resource teardown discipline only.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod async_dispose;
pub mod diagnostics;
pub mod dispose;
pub mod errors;
pub mod state;
pub mod testing;

pub use async_dispose::AsyncRelease;
pub use diagnostics::{install_leak_sink, leak_sink, LeakLevel, LeakSink, TracingLeakSink};
pub use dispose::{Disposable, Dispose, LeakHandled};
pub use errors::{DisposeError, DisposeResult, TeardownError};
pub use state::{BeginTeardown, DisposeState, LifecycleCell};
