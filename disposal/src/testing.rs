//! Test support: counting resource doubles and a recording sink.
//!
//! These exist so the unit and property suites can observe exactly how many
//! times each teardown hook ran and what the fallback path reported.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::diagnostics::{LeakLevel, LeakSink};
use crate::dispose::{Dispose, LeakHandled};
use crate::errors::TeardownError;

/// Shared hook-invocation counters, cloneable across a test and its resource.
#[derive(Debug, Default, Clone)]
pub struct Counters {
    managed: Arc<AtomicUsize>,
    unmanaged: Arc<AtomicUsize>,
    leak_checks: Arc<AtomicUsize>,
}

impl Counters {
    /// Times the managed teardown hook ran.
    pub fn managed(&self) -> usize {
        self.managed.load(Ordering::SeqCst)
    }

    /// Times the unmanaged teardown hook ran.
    pub fn unmanaged(&self) -> usize {
        self.unmanaged.load(Ordering::SeqCst)
    }

    /// Times the advisory leak hook was consulted.
    pub fn leak_checks(&self) -> usize {
        self.leak_checks.load(Ordering::SeqCst)
    }
}

/// Resource double that counts hook invocations and can be configured to
/// fail either hook or to enable leak diagnostics.
#[derive(Debug)]
pub struct TestResource {
    counters: Counters,
    diagnostics: bool,
    leak_handled: bool,
    fail_managed: Option<String>,
    fail_unmanaged: Option<String>,
}

impl TestResource {
    /// Create a resource reporting into the given counters.
    pub fn new(counters: &Counters) -> Self {
        Self {
            counters: counters.clone(),
            diagnostics: false,
            leak_handled: false,
            fail_managed: None,
            fail_unmanaged: None,
        }
    }

    /// Enable leak diagnostics on the fallback path.
    #[must_use]
    pub fn diagnostics_enabled(mut self) -> Self {
        self.diagnostics = true;
        self
    }

    /// Claim leak notifications as handled (softens the diagnostic).
    #[must_use]
    pub fn leak_handled(mut self) -> Self {
        self.leak_handled = true;
        self
    }

    /// Make the managed hook fail with the given message.
    #[must_use]
    pub fn fail_managed(mut self, message: &str) -> Self {
        self.fail_managed = Some(message.to_string());
        self
    }

    /// Make the unmanaged hook fail with the given message.
    #[must_use]
    pub fn fail_unmanaged(mut self, message: &str) -> Self {
        self.fail_unmanaged = Some(message.to_string());
        self
    }
}

impl Dispose for TestResource {
    fn on_dispose_managed(&mut self) -> Result<(), TeardownError> {
        self.counters.managed.fetch_add(1, Ordering::SeqCst);
        match &self.fail_managed {
            Some(message) => Err(TeardownError::new(message.clone())),
            None => Ok(()),
        }
    }

    fn on_dispose_unmanaged(&mut self) -> Result<(), TeardownError> {
        self.counters.unmanaged.fetch_add(1, Ordering::SeqCst);
        match &self.fail_unmanaged {
            Some(message) => Err(TeardownError::new(message.clone())),
            None => Ok(()),
        }
    }

    fn leak_diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    fn on_leak(&self) -> LeakHandled {
        self.counters.leak_checks.fetch_add(1, Ordering::SeqCst);
        if self.leak_handled {
            LeakHandled::Handled
        } else {
            LeakHandled::Unhandled
        }
    }

    fn resource_name(&self) -> &'static str {
        "TestResource"
    }
}

/// Sink that records every diagnostic for later assertion.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<(LeakLevel, String)>>,
}

impl RecordingSink {
    /// Everything reported so far, in order.
    pub fn reports(&self) -> Vec<(LeakLevel, String)> {
        self.reports.lock().map_or_else(|_| Vec::new(), |r| r.clone())
    }
}

impl LeakSink for RecordingSink {
    fn report(&self, level: LeakLevel, message: &str) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push((level, message.to_string()));
        }
    }
}
