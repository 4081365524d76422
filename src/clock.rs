//! Time source for the reveal.
//!
//! Every suspension point in the engine is either a fixed timer or a wait
//! for the next display frame. Both come from a [`Clock`], so the core runs
//! the same against a browser's animation frames, a tokio runtime, or
//! tokio's paused virtual time in tests.

use std::future::Future;
use std::time::Duration;

/// Timers and display-frame ticks.
pub trait Clock: Send + Sync {
    /// Milliseconds since the clock's origin.
    fn now(&self) -> f64;

    /// Resolve after `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Resolve on the next display frame with its timestamp in milliseconds
    /// (same time base as [`now`](Clock::now)).
    fn next_frame(&self) -> impl Future<Output = f64> + Send;
}

impl<C: Clock> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        (**self).sleep(duration)
    }

    fn next_frame(&self) -> impl Future<Output = f64> + Send {
        (**self).next_frame()
    }
}

#[cfg(feature = "tokio")]
pub use tokio_clock::TokioClock;

#[cfg(feature = "tokio")]
mod tokio_clock {
    use std::future::Future;
    use std::time::Duration;

    use tokio::time::Instant;

    use super::Clock;

    /// Default frame interval (one tick per 16 ms, roughly 60 Hz).
    const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

    /// [`Clock`] backed by `tokio::time`.
    ///
    /// Frames fire on a fixed grid measured from the clock's origin, like a
    /// display refresh. Works with `tokio::time::pause` for deterministic
    /// tests.
    #[derive(Debug, Clone, Copy)]
    pub struct TokioClock {
        origin: Instant,
        frame_interval: Duration,
    }

    impl TokioClock {
        /// Clock whose origin is now, ticking every 16 ms.
        pub fn new() -> Self {
            Self::with_frame_interval(DEFAULT_FRAME_INTERVAL)
        }

        /// Clock whose origin is now, ticking every `frame_interval`.
        ///
        /// A zero interval is treated as 1 ms.
        pub fn with_frame_interval(frame_interval: Duration) -> Self {
            Self {
                origin: Instant::now(),
                frame_interval: frame_interval.max(Duration::from_millis(1)),
            }
        }

        /// The frame interval.
        pub fn frame_interval(&self) -> Duration {
            self.frame_interval
        }

        fn millis(d: Duration) -> f64 {
            d.as_nanos() as f64 / 1_000_000.0
        }
    }

    impl Default for TokioClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for TokioClock {
        fn now(&self) -> f64 {
            Self::millis(self.origin.elapsed())
        }

        fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
            tokio::time::sleep(duration)
        }

        fn next_frame(&self) -> impl Future<Output = f64> + Send {
            let elapsed = self.origin.elapsed().as_nanos();
            let interval = self.frame_interval.as_nanos();
            let next = (elapsed / interval + 1) * interval;
            let offset = Duration::from_nanos(next as u64);
            let deadline = self.origin + offset;
            async move {
                tokio::time::sleep_until(deadline).await;
                Self::millis(offset)
            }
        }
    }
}
