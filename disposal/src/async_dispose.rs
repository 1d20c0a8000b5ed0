//! Asynchronous release, layered on the synchronous lifecycle core.
//!
//! [`AsyncRelease`] mirrors [`Disposable::release`] for async call sites.
//! The blanket implementation fully delegates to the synchronous path and
//! completes immediately; it re-implements no state transitions and
//! duplicates no side effects, so it participates in the same
//! fallback-suppression behavior. Handle types with genuinely asynchronous
//! teardown (awaiting a network close, say) implement this trait themselves;
//! the state machine stays where it is.

use async_trait::async_trait;

use crate::dispose::{Disposable, Dispose};
use crate::errors::DisposeResult;

/// Asynchronous counterpart of [`Disposable::release`].
#[async_trait]
pub trait AsyncRelease {
    /// Release the resource, performing exactly the work a synchronous
    /// release would, exactly once across both variants.
    async fn release_async(&mut self) -> DisposeResult<()>;
}

#[async_trait]
impl<T> AsyncRelease for Disposable<T>
where
    T: Dispose + Send,
{
    async fn release_async(&mut self) -> DisposeResult<()> {
        self.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Counters, TestResource};

    #[tokio::test]
    async fn release_async_runs_hooks_once() {
        let counters = Counters::default();
        let mut handle = Disposable::new(TestResource::new(&counters));

        handle.release_async().await.unwrap();

        assert!(handle.is_disposed());
        assert_eq!(counters.managed(), 1);
        assert_eq!(counters.unmanaged(), 1);
    }

    #[tokio::test]
    async fn release_async_then_release_runs_hooks_once_total() {
        let counters = Counters::default();
        let mut handle = Disposable::new(TestResource::new(&counters));

        handle.release_async().await.unwrap();
        handle.release().unwrap();

        assert_eq!(counters.managed(), 1);
        assert_eq!(counters.unmanaged(), 1);
    }

    #[tokio::test]
    async fn release_then_release_async_is_a_noop() {
        let counters = Counters::default();
        let mut handle = Disposable::new(TestResource::new(&counters));

        handle.release().unwrap();
        handle.release_async().await.unwrap();

        assert_eq!(counters.managed(), 1);
        assert_eq!(counters.unmanaged(), 1);
    }

    #[tokio::test]
    async fn release_async_suppresses_fallback() {
        let counters = Counters::default();
        {
            let resource = TestResource::new(&counters).diagnostics_enabled();
            let mut handle = Disposable::new(resource);
            handle.release_async().await.unwrap();
        }

        // Drop after an async release must not rerun teardown.
        assert_eq!(counters.managed(), 1);
        assert_eq!(counters.unmanaged(), 1);
        assert_eq!(counters.leak_checks(), 0);
    }
}
