//! Self-imposed pacing for sequential LLM calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Fixed-delay pacer shared by every inference stage in one pipeline run.
///
/// The delay is inserted between calls, not before the first one; the
/// comparator uses a separate longer delay. This is crude, non-adaptive
/// rate-limit avoidance — an ordering discipline, not a correctness
/// requirement — so both delays are configurable down to zero for tests.
pub struct Pacer {
    call_delay: Duration,
    compare_delay: Duration,
    called: AtomicBool,
}

impl Pacer {
    #[must_use]
    pub fn new(call_delay_ms: u64, compare_delay_ms: u64) -> Self {
        Self {
            call_delay: Duration::from_millis(call_delay_ms),
            compare_delay: Duration::from_millis(compare_delay_ms),
            called: AtomicBool::new(false),
        }
    }

    /// Waits the standard inter-call delay, except before the first call.
    pub async fn pace(&self) {
        if self.called.swap(true, Ordering::Relaxed) && !self.call_delay.is_zero() {
            tokio::time::sleep(self.call_delay).await;
        }
    }

    /// Waits the longer pre-comparison delay.
    pub async fn pace_compare(&self) {
        self.called.store(true, Ordering::Relaxed);
        if !self.compare_delay.is_zero() {
            tokio::time::sleep(self.compare_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_call_does_not_sleep() {
        let pacer = Pacer::new(500, 1000);
        let before = tokio::time::Instant::now();
        pacer.pace().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn subsequent_calls_wait_the_inter_call_delay() {
        let pacer = Pacer::new(500, 1000);
        pacer.pace().await;
        let before = tokio::time::Instant::now();
        pacer.pace().await;
        assert_eq!(before.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn compare_uses_the_longer_delay() {
        let pacer = Pacer::new(500, 1000);
        pacer.pace().await;
        let before = tokio::time::Instant::now();
        pacer.pace_compare().await;
        assert_eq!(before.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn zero_delays_never_sleep() {
        let pacer = Pacer::new(0, 0);
        pacer.pace().await;
        pacer.pace().await;
        pacer.pace_compare().await;
    }
}
