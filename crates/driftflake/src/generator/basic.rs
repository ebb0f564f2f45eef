use core::{cell::Cell, cmp::Ordering};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    generator::{Error, Result, spin_past},
    id::Flake,
    time::TimeSource,
};

/// A non-concurrent identifier generator for single-threaded environments.
///
/// This generator is lightweight and fast, but **not thread-safe**: its state
/// lives in a [`Cell`]. For shared use across threads, see
/// [`LockFlakeGenerator`].
///
/// [`LockFlakeGenerator`]: crate::LockFlakeGenerator
pub struct BasicFlakeGenerator<T: TimeSource> {
    state: Cell<Flake>,
    time: T,
}

impl<T: TimeSource> BasicFlakeGenerator<T> {
    /// Creates a new generator for the given worker ID.
    ///
    /// The worker ID is encoded into every identifier this generator issues.
    /// Single-node deployments pass 0; the field exists so that multiple
    /// concurrent generator processes can be told apart if that ever becomes
    /// necessary.
    ///
    /// # Example
    ///
    /// ```
    /// use driftflake::{BasicFlakeGenerator, WallClock};
    ///
    /// let generator = BasicFlakeGenerator::new(0, WallClock::default());
    /// let id = generator.next_id().unwrap();
    /// assert_eq!(id.worker_id(), 0);
    /// ```
    pub fn new(worker_id: u64, time: T) -> Self {
        Self::from_parts(0, worker_id, 0, time)
    }

    /// Creates a generator preloaded with explicit state.
    ///
    /// Useful for tests and for controlling the starting point manually. In
    /// typical use, prefer [`Self::new`]: a zero timestamp can never collide
    /// with a live wall-clock reading, so the fresh generator always takes
    /// the rollover path on its first call.
    pub fn from_parts(timestamp: u64, worker_id: u64, sequence: u64, time: T) -> Self {
        Self {
            state: Cell::new(Flake::from_parts(timestamp, worker_id, sequence)),
            time,
        }
    }

    /// Issues the next identifier.
    ///
    /// Each returned identifier is strictly greater than every identifier
    /// previously returned by this instance. If the 12-bit sequence space
    /// for the current millisecond is exhausted, this call busy-waits
    /// (sub-millisecond in practice) until the clock advances; that latency
    /// is the only externally visible effect of exhaustion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if the clock reads earlier than
    /// the last issuance. This is fatal: the error is never retried
    /// internally, and no identifier is issued for the regressed reading.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<Flake> {
        let now = self.time.current_millis();
        let state = self.state.get();
        let last = state.timestamp();

        let next = match now.cmp(&last) {
            Ordering::Equal => {
                if state.has_sequence_room() {
                    state.increment_sequence()
                } else {
                    state.rollover_to_timestamp(spin_past(&self.time, last))
                }
            }
            Ordering::Greater => state.rollover_to_timestamp(now),
            Ordering::Less => return Err(Self::cold_clock_behind(last, now)),
        };
        self.state.set(next);
        Ok(next)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last: u64, now: u64) -> Error {
        Error::ClockRegression {
            last_ms: last,
            observed_ms: now,
        }
    }
}
