use core::cmp::Ordering;
use std::sync::{Arc, Mutex};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    generator::{Error, Result, spin_past},
    id::Flake,
    time::TimeSource,
};

/// A lock-based identifier generator for multi-threaded environments.
///
/// The state lives behind an [`Arc<Mutex<_>>`], so clones of the generator
/// are cheap handles onto the same sequence of identifiers. The entire
/// issuance step, including the busy-wait taken when a millisecond's
/// sequence space is exhausted, runs inside the critical section: two
/// threads can never observe the same `(timestamp, sequence)` pair.
///
/// For single-threaded use, [`BasicFlakeGenerator`] avoids the lock.
///
/// [`BasicFlakeGenerator`]: crate::BasicFlakeGenerator
pub struct LockFlakeGenerator<T: TimeSource> {
    state: Arc<Mutex<Flake>>,
    time: T,
}

impl<T: TimeSource + Clone> Clone for LockFlakeGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            time: self.time.clone(),
        }
    }
}

impl<T: TimeSource> LockFlakeGenerator<T> {
    /// Creates a new generator for the given worker ID.
    ///
    /// # Example
    ///
    /// ```
    /// use driftflake::{LockFlakeGenerator, WallClock};
    ///
    /// let generator = LockFlakeGenerator::new(0, WallClock::default());
    /// let a = generator.next_id().unwrap();
    /// let b = generator.next_id().unwrap();
    /// assert!(b > a);
    /// ```
    pub fn new(worker_id: u64, time: T) -> Self {
        Self::from_parts(0, worker_id, 0, time)
    }

    /// Creates a generator preloaded with explicit state.
    ///
    /// In typical use, prefer [`Self::new`]; see
    /// [`BasicFlakeGenerator::from_parts`] for when explicit state helps.
    ///
    /// [`BasicFlakeGenerator::from_parts`]: crate::BasicFlakeGenerator::from_parts
    pub fn from_parts(timestamp: u64, worker_id: u64, sequence: u64, time: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(Flake::from_parts(timestamp, worker_id, sequence))),
            time,
        }
    }

    /// Issues the next identifier.
    ///
    /// Identifiers are strictly increasing across all clones of this
    /// generator. Sequence exhaustion within a millisecond busy-waits while
    /// holding the lock; other callers simply queue behind the wait, which
    /// resolves as soon as the clock ticks.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   issuance; fatal, never retried internally.
    /// - [`Error::LockPoisoned`] if another thread panicked while holding
    ///   the state lock.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<Flake> {
        let mut state = self.state.lock()?;
        // The clock must be read under the lock: a reading taken before
        // acquisition could be older than a timestamp committed by a thread
        // that raced ahead, which would look like a regression.
        let now = self.time.current_millis();
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
        *state = next;
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
