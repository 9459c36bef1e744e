//! The dual limiter: a start-rate gate and a concurrency gate.
//!
//! Both gates must grant before a command may launch. The rate gate is a
//! token bucket refilled in batches by a background ticker; the concurrency
//! gate is a counting semaphore whose permit is held for a task's whole run.
//!
//! The limiter is a plain owned value handed to the driver; there is no
//! ambient global state, so it can be exercised in isolation by tests.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::trace;

/// Token-bucket admission gate for command starts.
///
/// The bucket's capacity equals the in-flight limit and starts full, so the
/// first `capacity` commands launch with no rate delay (an intentional
/// initial burst). A background ticker fires every `1s / rate` and tops the
/// bucket back up to capacity: a batch refill of up to `capacity` tokens,
/// never more than the bucket holds. The visible steady-state throughput is
/// therefore up to `rate x capacity` token grants per second, granted in
/// batches rather than one token per `1/rate` interval.
pub(crate) struct RateGate {
    tokens: Arc<Semaphore>,
    ticker: JoinHandle<()>,
}

impl RateGate {
    /// Start a rate gate granting up to `capacity` tokens per tick,
    /// ticking `rate` times per second.
    fn start(rate: u32, capacity: usize) -> Self {
        let tokens = Arc::new(Semaphore::new(capacity));
        // rates above 1e9/s would round the period down to zero, which
        // `interval` rejects
        let period = (Duration::from_secs(1) / rate).max(Duration::from_nanos(1));

        let bucket = Arc::clone(&tokens);
        let ticker = tokio::spawn(async move {
            let mut tick = time::interval(period);
            // a late tick must not cause a burst of catch-up refills
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick completes immediately; the bucket is already full
            tick.tick().await;

            loop {
                tick.tick().await;
                // top up to capacity only; tokens held by an admission in
                // progress are not counted, so a cancelled admission may
                // briefly return one token above the waterline we saw here
                let missing = capacity.saturating_sub(bucket.available_permits());
                if missing > 0 {
                    bucket.add_permits(missing);
                    trace!(target: "cmdpace::limiter", refilled = missing, "rate bucket topped up");
                }
            }
        });

        Self { tokens, ticker }
    }

    /// Acquire one rate token, waiting for the next refill if the bucket
    /// is empty. The token is returned to the bucket unless consumed.
    async fn acquire(&self) -> RateToken<'_> {
        let permit = self
            .tokens
            .acquire()
            .await
            .expect("rate bucket semaphore is never closed");
        RateToken { permit }
    }
}

impl Drop for RateGate {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

/// A rate token held between the two admission gates.
///
/// Dropping the token puts it back in the bucket, so a caller cancelled
/// while waiting for a concurrency slot does not burn its token.
struct RateToken<'a> {
    permit: tokio::sync::SemaphorePermit<'a>,
}

impl RateToken<'_> {
    /// Spend the token for good.
    fn consume(self) {
        self.permit.forget();
    }
}

/// Permission for one command to run, returned by [`DualLimiter::admit`].
///
/// Holds the concurrency slot; dropping it (on task completion, success or
/// failure) releases the slot back to the pool.
pub(crate) struct Admission {
    _slot: OwnedSemaphorePermit,
}

/// The two admission gates a command must pass before launching.
pub(crate) struct DualLimiter {
    rate_gate: RateGate,
    slots: Arc<Semaphore>,
}

impl DualLimiter {
    /// Build a limiter for the given start-rate and in-flight limit.
    ///
    /// Callers validate both values as nonzero beforehand.
    pub(crate) fn new(rate: u32, inflight: usize) -> Self {
        Self {
            rate_gate: RateGate::start(rate, inflight),
            slots: Arc::new(Semaphore::new(inflight)),
        }
    }

    /// Wait until a command may start: one rate token AND one concurrency
    /// slot, in that fixed order. Reversing the order would let slot
    /// contention starve the rate gate's fairness, so it never is.
    ///
    /// Cancel-safe: cancelling between the gates returns the rate token.
    pub(crate) async fn admit(&self) -> Admission {
        let token = self.rate_gate.acquire().await;
        let slot = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .expect("concurrency semaphore is never closed");
        token.consume();
        Admission { _slot: slot }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use tokio::time::Instant;

    /// Admissions that would not complete without waiting.
    fn try_admit(limiter: &DualLimiter) -> Option<Admission> {
        limiter.admit().now_or_never()
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_burst_matches_inflight() {
        let limiter = DualLimiter::new(1, 3);

        // all three preloaded tokens (and slots) grant immediately
        let a = try_admit(&limiter).expect("first admission should be immediate");
        let b = try_admit(&limiter).expect("second admission should be immediate");
        let c = try_admit(&limiter).expect("third admission should be immediate");

        // bucket and slots are both empty now
        assert!(try_admit(&limiter).is_none());
        drop((a, b, c));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_acquire_resumes_on_next_tick() {
        let limiter = DualLimiter::new(4, 1); // one tick every 250ms
        let start = Instant::now();

        // burn the single preloaded token, then release its slot so only
        // the rate gate can block the next admission
        drop(limiter.admit().await);
        assert_eq!(start.elapsed(), Duration::ZERO);

        // the paused clock auto-advances to the ticker's next deadline
        drop(limiter.admit().await);
        assert_eq!(start.elapsed(), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_never_exceeds_capacity() {
        let limiter = DualLimiter::new(10, 2);

        // sit idle across many refill periods
        time::sleep(Duration::from_secs(2)).await;

        // still only `inflight` tokens in the bucket
        let a = try_admit(&limiter).expect("bucket should hold a token");
        let b = try_admit(&limiter).expect("bucket should hold a second token");
        assert!(try_admit(&limiter).is_none());
        drop((a, b));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_gate_blocks_until_release() {
        let limiter = DualLimiter::new(1000, 1);

        let held = limiter.admit().await;
        // rate tokens refill almost instantly at this rate, so after a tick
        // only the occupied slot can be blocking admission
        time::sleep(Duration::from_millis(5)).await;
        assert!(try_admit(&limiter).is_none());

        drop(held);
        assert!(try_admit(&limiter).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_is_batched_up_to_capacity() {
        let limiter = DualLimiter::new(1, 3);

        // drain the initial burst, dropping slots as we go
        for _ in 0..3 {
            drop(limiter.admit().await);
        }
        assert!(try_admit(&limiter).is_none());

        // sleep past the tick (not exactly onto it, so the refill task is
        // guaranteed to have run when we wake)
        time::sleep(Duration::from_millis(1100)).await;
        let a = try_admit(&limiter).expect("batch refill should grant");
        let b = try_admit(&limiter).expect("batch refill should grant");
        let c = try_admit(&limiter).expect("batch refill should grant");
        drop((a, b, c));
    }
}
