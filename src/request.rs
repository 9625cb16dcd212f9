//! Request contexts for actions that update the display.
//!
//! Starting a request cancels the one before it, and only the latest
//! generation may write its result.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::DashboardError;

#[derive(Debug)]
pub struct RequestTracker {
    generation: AtomicU64,
    token: Mutex<CancellationToken>,
    timeout: Option<Duration>,
}

impl RequestTracker {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            generation: AtomicU64::new(0),
            token: Mutex::new(CancellationToken::new()),
            timeout,
        }
    }

    /// Start a new request, cancelling whatever was in flight.
    pub fn begin(&self) -> RequestContext {
        let token = CancellationToken::new();
        let mut slot = self.token.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = std::mem::replace(&mut *slot, token.clone());
        drop(slot);
        previous.cancel();
        tracing::debug!(generation, "request started");

        RequestContext {
            generation,
            token,
            deadline: self.timeout.map(|t| Instant::now() + t),
        }
    }

    /// Whether `ctx` is still the newest request.
    pub fn is_current(&self, ctx: &RequestContext) -> bool {
        self.generation.load(Ordering::SeqCst) == ctx.generation
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    generation: u64,
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive one step of the request, stopping early if it is superseded or
    /// its deadline passes.
    pub async fn run<T, E, F>(&self, step: F) -> Result<T, DashboardError>
    where
        F: Future<Output = Result<T, E>>,
        DashboardError: From<E>,
    {
        let guarded = async {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(DashboardError::Superseded),
                out = step => out.map_err(DashboardError::from),
            }
        };
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or_else(|_| Err(DashboardError::TimedOut)),
            None => guarded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeatherError;

    #[tokio::test]
    async fn newer_request_cancels_older() {
        let tracker = RequestTracker::new(None);
        let first = tracker.begin();
        let second = tracker.begin();

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));

        let out = first
            .run(std::future::pending::<Result<(), WeatherError>>())
            .await;
        assert!(matches!(out, Err(DashboardError::Superseded)));
    }

    #[tokio::test]
    async fn deadline_turns_into_timed_out() {
        let tracker = RequestTracker::new(Some(Duration::from_millis(20)));
        let ctx = tracker.begin();
        let out = ctx
            .run(std::future::pending::<Result<(), WeatherError>>())
            .await;
        assert!(matches!(out, Err(DashboardError::TimedOut)));
    }

    #[tokio::test]
    async fn completed_step_passes_through() {
        let tracker = RequestTracker::new(None);
        let ctx = tracker.begin();
        let out = ctx.run(async { Ok::<_, WeatherError>(7) }).await;
        assert_eq!(out.ok(), Some(7));
    }
}
