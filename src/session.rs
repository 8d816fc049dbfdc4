//! Last-request-wins guard for the presentation layer.
//!
//! Report parameters can change while a previous request for the same view
//! is still in flight. The stale result must be discarded rather than
//! overwrite newer state. `LatestOnly` tracks a generation per input key;
//! a finished request only yields its value if no newer request started
//! meanwhile.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct LatestOnly {
    generation: AtomicU64,
}

impl LatestOnly {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `fut` as the newest request. Returns `None` if a newer call to
    /// `run` was issued before `fut` completed.
    ///
    /// The generation is claimed when `run` is called, not when the
    /// returned future is first polled, so issuing order decides which
    /// request is newest. Callers wanting in-flight cancellation can
    /// additionally race the returned future against the newer one and
    /// drop the loser; the guard only promises that a superseded result is
    /// never surfaced.
    pub fn run<'a, F, T>(&'a self, fut: F) -> impl Future<Output = Option<T>> + 'a
    where
        F: Future<Output = T> + 'a,
    {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        async move {
            let value = fut.await;

            if self.generation.load(Ordering::SeqCst) == mine {
                Some(value)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sole_request_yields_its_value() {
        let guard = LatestOnly::new();
        let result = guard.run(async { 42 }).await;
        assert_eq!(result, Some(42));
    }

    #[tokio::test]
    async fn test_superseded_request_is_discarded() {
        let guard = LatestOnly::new();
        let (tx, rx) = tokio::sync::oneshot::channel::<i32>();

        let slow = guard.run(async move { rx.await.unwrap() });

        // A newer request starts and finishes while the first is parked.
        let fresh = guard.run(async { 2 }).await;
        assert_eq!(fresh, Some(2));

        tx.send(1).unwrap();
        assert_eq!(slow.await, None);
    }

    #[tokio::test]
    async fn test_sequential_requests_all_yield() {
        let guard = LatestOnly::new();
        for i in 0..3 {
            assert_eq!(guard.run(async move { i }).await, Some(i));
        }
    }
}
