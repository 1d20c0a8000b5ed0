//! The teardown state machine.
//!
//! Every resource-owning handle is driven by a single tri-state cell:
//!
//! ```text
//! Live --try_begin--> Disposing --complete--> Disposed (terminal)
//! ```
//!
//! The transition out of `Live` is a compare-and-swap, so only one caller
//! ever wins the right to run teardown regardless of how the explicit and
//! fallback paths interleave. `Disposing` exists solely to turn reentrant
//! begin attempts (a nested release fired from inside a teardown hook) into
//! guarded no-ops; it never transitions back to `Live`.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of a resource-owning handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisposeState {
    /// The resource is usable; no teardown has started.
    Live,
    /// Teardown is executing on some call stack right now.
    Disposing,
    /// Teardown has completed; the resource is unusable. Terminal.
    Disposed,
}

const LIVE: u8 = 0;
const DISPOSING: u8 = 1;
const DISPOSED: u8 = 2;

/// Outcome of attempting to begin teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginTeardown {
    /// The caller won the `Live -> Disposing` transition and must run
    /// teardown, then call [`LifecycleCell::complete`].
    Started,
    /// Teardown is already running on another call stack (or further up this
    /// one). The caller must do nothing.
    Reentrant,
    /// Teardown already completed. The caller must do nothing.
    AlreadyDisposed,
}

/// Atomic tri-state cell guarding the teardown transition.
///
/// Collapsing the disposed and disposing-in-progress flags into one atomic
/// word makes the `Live -> Disposing` hand-off race-free: concurrent release
/// calls contend on a single compare-and-swap instead of two independent
/// booleans.
#[derive(Debug)]
pub struct LifecycleCell {
    state: AtomicU8,
}

impl LifecycleCell {
    /// Create a cell in the [`DisposeState::Live`] state.
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(LIVE),
        }
    }

    /// Attempt the `Live -> Disposing` transition.
    pub fn try_begin(&self) -> BeginTeardown {
        match self
            .state
            .compare_exchange(LIVE, DISPOSING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => BeginTeardown::Started,
            Err(DISPOSING) => BeginTeardown::Reentrant,
            Err(_) => BeginTeardown::AlreadyDisposed,
        }
    }

    /// Mark teardown complete.
    ///
    /// Callers that won [`Self::try_begin`] must invoke this exactly once,
    /// on every exit path including unwind. `Disposed` is monotonic; the
    /// cell never returns to `Live`.
    pub fn complete(&self) {
        self.state.store(DISPOSED, Ordering::Release);
    }

    /// Current state of the cell.
    pub fn state(&self) -> DisposeState {
        match self.state.load(Ordering::Acquire) {
            LIVE => DisposeState::Live,
            DISPOSING => DisposeState::Disposing,
            _ => DisposeState::Disposed,
        }
    }

    /// Returns `true` once teardown has fully completed.
    pub fn is_disposed(&self) -> bool {
        self.state.load(Ordering::Acquire) == DISPOSED
    }
}

impl Default for LifecycleCell {
    fn default() -> Self {
        Self::new()
    }
}
