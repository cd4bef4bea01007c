//! Injectable time source shared by the pacing gate and expiry checks.
//!
//! One clock instance serves an entire request cycle, so pacing and refresh
//! decisions never mix time sources within a single call.

// self
use crate::_prelude::*;

/// Boxed future returned by [`Clock::sleep`].
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a + Send>>;

/// Wall-clock capability owned by one client.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Current instant.
	fn now(&self) -> OffsetDateTime;

	/// Suspends the caller for the provided duration; non-positive durations return
	/// immediately.
	fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}

/// UTC wall clock backed by the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}

	fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
		// Negative durations fail the conversion and collapse to a no-op wait.
		let delay = std::time::Duration::try_from(duration).unwrap_or_default();

		Box::pin(async move {
			if !delay.is_zero() {
				tokio::time::sleep(delay).await;
			}
		})
	}
}

/// Deterministic clock for tests and demos.
///
/// `sleep` never suspends; it advances the reported instant instead and records the
/// requested duration so pacing behavior can be asserted without real waiting.
#[derive(Clone, Debug)]
pub struct ManualClock {
	now: Arc<Mutex<OffsetDateTime>>,
	slept: Arc<Mutex<Vec<Duration>>>,
}
impl ManualClock {
	/// Creates a clock frozen at the provided instant.
	pub fn starting_at(instant: OffsetDateTime) -> Self {
		Self { now: Arc::new(Mutex::new(instant)), slept: Arc::new(Mutex::new(Vec::new())) }
	}

	/// Moves the clock forward, or backward with a negative delta.
	pub fn advance(&self, delta: Duration) {
		*self.now.lock() += delta;
	}

	/// Pins the clock to an absolute instant.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.now.lock() = instant;
	}

	/// Durations passed to [`Clock::sleep`] so far, in call order.
	pub fn slept(&self) -> Vec<Duration> {
		self.slept.lock().clone()
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.now.lock()
	}

	fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
		Box::pin(async move {
			if duration.is_positive() {
				self.advance(duration);
			}

			self.slept.lock().push(duration);
		})
	}
}
