//! Suspension primitive for simulated latency

use std::time::Duration;

/// Source of simulated delay
///
/// Each fetch suspends once on its clock and resumes after the given
/// duration. There is no cancellation: a started sleep always completes.
#[async_trait::async_trait]
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Suspend the calling task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Timer-backed clock
///
/// Under a paused tokio runtime the timer auto-advances, which turns this
/// into a deterministic virtual clock for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait::async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock that never suspends
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateClock;

#[async_trait::async_trait]
impl Clock for ImmediateClock {
    async fn sleep(&self, _duration: Duration) {}
}
