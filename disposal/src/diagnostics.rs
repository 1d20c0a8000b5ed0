//! Leak-diagnostic reporting.
//!
//! The fallback teardown path reports missed explicit releases through a
//! process-wide sink. The sink is write-only and fire-and-forget: the
//! lifecycle core never consumes a return value from it and a sink must not
//! panic. The default sink forwards to `tracing`.

use std::sync::{Arc, OnceLock};

/// Severity of a leak diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeakLevel {
    /// A missed release that the owner acknowledged handling.
    Warning,
    /// A missed release nobody claimed to handle; indicates a bug in the
    /// owning code.
    Assertion,
}

/// Destination for leak diagnostics.
///
/// Implementations must be infallible: `report` has no return value and must
/// not panic, since it runs on the fallback path where there is no caller to
/// propagate to.
pub trait LeakSink: Send + Sync {
    /// Report a leak diagnostic.
    fn report(&self, level: LeakLevel, message: &str);
}

/// Default sink forwarding diagnostics to `tracing`.
///
/// `Warning` maps to `tracing::warn!`, `Assertion` to `tracing::error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLeakSink;

impl LeakSink for TracingLeakSink {
    fn report(&self, level: LeakLevel, message: &str) {
        match level {
            LeakLevel::Warning => tracing::warn!(target: "disposal", "{message}"),
            LeakLevel::Assertion => tracing::error!(target: "disposal", "{message}"),
        }
    }
}

static GLOBAL_LEAK_SINK: OnceLock<Arc<dyn LeakSink>> = OnceLock::new();

/// Install the process-wide leak sink.
///
/// The first installation wins; later calls return the rejected sink so the
/// caller can tell the install did not take effect. Handles created with
/// [`crate::Disposable::with_sink`] bypass the global sink entirely.
pub fn install_leak_sink(sink: Arc<dyn LeakSink>) -> Result<(), Arc<dyn LeakSink>> {
    GLOBAL_LEAK_SINK.set(sink)
}

/// The process-wide leak sink, defaulting to [`TracingLeakSink`].
pub fn leak_sink() -> Arc<dyn LeakSink> {
    GLOBAL_LEAK_SINK
        .get_or_init(|| Arc::new(TracingLeakSink))
        .clone()
}
