//! The resource lifecycle core.
//!
//! [`Dispose`] is the surface a resource-owning type implements: two teardown
//! hooks plus a handful of advisory accessors. [`Disposable`] is the owning
//! handle that drives the teardown state machine around those hooks.
//!
//! Two paths converge on the same state machine:
//!
//! - **Explicit release** ([`Disposable::release`]): the primary supported
//!   path. Runs the managed hook, then the unmanaged hook, exactly once.
//! - **Fallback teardown** ([`Disposable::finalize`], normally driven by
//!   `Drop`): best-effort cleanup when the owner forgot to release. Skips
//!   the managed hook (peer objects may already be gone), optionally reports
//!   a leak diagnostic, and swallows hook failures.
//!
//! Completing either path suppresses the other: the state cell reaches
//! `Disposed` and every later entry is a no-op.

use std::sync::Arc;

use crate::diagnostics::{leak_sink, LeakLevel, LeakSink};
use crate::errors::{DisposeError, DisposeResult, TeardownError};
use crate::state::{BeginTeardown, DisposeState, LifecycleCell};

/// Whether the owning type claims to have handled a leak notification.
///
/// Purely advisory: it softens the diagnostic from `Assertion` to `Warning`
/// and never prevents the fallback teardown itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeakHandled {
    /// The owner emitted its own notification; report a softer warning.
    Handled,
    /// Nobody handled the leak; escalate to an assertion-level diagnostic.
    Unhandled,
}

/// Teardown hooks for a resource-owning type.
///
/// All methods have no-op defaults; implement only what the resource needs.
///
/// # Example
///
/// ```rust
/// use disposal::{Dispose, Disposable, TeardownError};
///
/// struct Connection { open: bool }
///
/// impl Dispose for Connection {
///     fn on_dispose_unmanaged(&mut self) -> Result<(), TeardownError> {
///         self.open = false;
///         Ok(())
///     }
/// }
///
/// let mut conn = Disposable::new(Connection { open: true });
/// conn.release().unwrap();
/// assert!(conn.is_disposed());
/// ```
pub trait Dispose {
    /// Tear down managed resources: anything whose cleanup calls into other
    /// still-valid objects. Runs only on the explicit path, at most once.
    fn on_dispose_managed(&mut self) -> Result<(), TeardownError> {
        Ok(())
    }

    /// Tear down unmanaged resources: handles safe to release without
    /// cooperation from other objects. Runs on whichever path reaches the
    /// state machine first, at most once.
    fn on_dispose_unmanaged(&mut self) -> Result<(), TeardownError> {
        Ok(())
    }

    /// Whether the fallback path should report a missed explicit release.
    ///
    /// Off by default; read once when the fallback path runs.
    fn leak_diagnostics_enabled(&self) -> bool {
        false
    }

    /// Advisory leak-notification hook, consulted only when
    /// [`Self::leak_diagnostics_enabled`] is true. See [`LeakHandled`].
    fn on_leak(&self) -> LeakHandled {
        LeakHandled::Unhandled
    }

    /// Name used in diagnostics and use-after-release errors.
    fn resource_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Sets `Disposed` when dropped, so the flag update survives hook failures
/// and unwinds. Holding it keeps the `Disposing` window exactly as wide as
/// the hook invocations.
struct CompletionGuard<'a> {
    cell: &'a LifecycleCell,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.cell.complete();
    }
}

/// Owning handle that runs teardown for a [`Dispose`] resource exactly once.
///
/// The handle owns the resource and the lifecycle state. Dropping the handle
/// without calling [`Self::release`] triggers the fallback teardown path, the
/// scope-bound stand-in for a finalizer.
pub struct Disposable<T: Dispose> {
    inner: T,
    state: LifecycleCell,
    sink: Option<Arc<dyn LeakSink>>,
}

impl<T: Dispose + std::fmt::Debug> std::fmt::Debug for Disposable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposable")
            .field("inner", &self.inner)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T: Dispose> Disposable<T> {
    /// Wrap a resource, reporting leaks through the process-wide sink.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            state: LifecycleCell::new(),
            sink: None,
        }
    }

    /// Wrap a resource with a dedicated diagnostic sink.
    pub fn with_sink(inner: T, sink: Arc<dyn LeakSink>) -> Self {
        Self {
            inner,
            state: LifecycleCell::new(),
            sink: Some(sink),
        }
    }

    /// Explicitly release the resource.
    ///
    /// Idempotent: the first call runs the managed hook then the unmanaged
    /// hook; every later call (including reentrant ones) is a pure no-op
    /// returning `Ok(())`. A hook failure propagates to the caller, but only
    /// after the handle has been marked disposed, so a failed release still
    /// suppresses the fallback path.
    pub fn release(&mut self) -> DisposeResult<()> {
        match self.state.try_begin() {
            BeginTeardown::Started => {}
            BeginTeardown::Reentrant | BeginTeardown::AlreadyDisposed => return Ok(()),
        }

        let resource = self.inner.resource_name();
        let Self { inner, state, .. } = self;
        let _complete = CompletionGuard { cell: state };

        inner
            .on_dispose_managed()
            .map_err(|source| DisposeError::ManagedTeardown { resource, source })?;
        inner
            .on_dispose_unmanaged()
            .map_err(|source| DisposeError::UnmanagedTeardown { resource, source })?;
        Ok(())
    }

    /// Fallback teardown entry point, normally driven by `Drop`.
    ///
    /// If the resource was already released this does nothing and reports
    /// nothing. Otherwise it reports at most one leak diagnostic (when the
    /// resource enabled them), then runs the unmanaged hook only; the managed
    /// hook is skipped because peer objects may no longer be valid. There is
    /// no caller to propagate to, so hook failures are contained and routed
    /// to the diagnostic sink.
    pub fn finalize(&mut self) {
        match self.state.try_begin() {
            BeginTeardown::Started => {}
            BeginTeardown::Reentrant | BeginTeardown::AlreadyDisposed => return,
        }

        let resource = self.inner.resource_name();
        tracing::debug!(target: "disposal", resource, "fallback teardown invoked");

        let sink = self.sink_handle();
        if self.inner.leak_diagnostics_enabled() {
            let level = match self.inner.on_leak() {
                LeakHandled::Handled => LeakLevel::Warning,
                LeakHandled::Unhandled => LeakLevel::Assertion,
            };
            sink.report(level, &format!("{resource} was not disposed properly"));
        }

        let Self { inner, state, .. } = self;
        let _complete = CompletionGuard { cell: state };
        if let Err(err) = inner.on_dispose_unmanaged() {
            sink.report(
                LeakLevel::Warning,
                &format!("unmanaged teardown failed for {resource} during fallback: {err}"),
            );
        }
    }

    /// Access-guard precondition: fails with use-after-release once disposed.
    ///
    /// Every operation that touches the resource should call this first.
    pub fn guard(&self) -> DisposeResult<()> {
        if self.state.is_disposed() {
            Err(DisposeError::AlreadyReleased {
                resource: self.inner.resource_name(),
            })
        } else {
            Ok(())
        }
    }

    /// Guarded shared access to the resource.
    pub fn get(&self) -> DisposeResult<&T> {
        self.guard()?;
        Ok(&self.inner)
    }

    /// Guarded exclusive access to the resource.
    pub fn get_mut(&mut self) -> DisposeResult<&mut T> {
        self.guard()?;
        Ok(&mut self.inner)
    }

    /// Run a closure against the resource after the access guard passes.
    pub fn with<F, R>(&self, f: F) -> DisposeResult<R>
    where
        F: FnOnce(&T) -> R,
    {
        self.guard()?;
        Ok(f(&self.inner))
    }

    /// Returns `true` once teardown has fully completed.
    pub fn is_disposed(&self) -> bool {
        self.state.is_disposed()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DisposeState {
        self.state.state()
    }

    fn sink_handle(&self) -> Arc<dyn LeakSink> {
        self.sink.clone().unwrap_or_else(leak_sink)
    }
}

impl<T: Dispose> Drop for Disposable<T> {
    fn drop(&mut self) {
        self.finalize();
    }
}
