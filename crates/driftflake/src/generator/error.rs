use crate::id::MalformedIdError;
use std::sync::{MutexGuard, PoisonError};

/// A specialized result type for identifier generation and decoding.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `driftflake` can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The wall clock moved backwards relative to the last issuance.
    ///
    /// This is fatal for the generator: it signals an unreliable clock
    /// source (e.g. an NTP step backwards), and identifiers issued after it
    /// could not be trusted to be monotonic. The generator never retries on
    /// its own; the condition should be investigated, not papered over.
    #[error("clock moved backwards: last issuance at {last_ms}ms, clock reads {observed_ms}ms")]
    ClockRegression {
        /// Epoch-relative millisecond of the last successful issuance.
        last_ms: u64,
        /// Epoch-relative millisecond the clock reported now.
        observed_ms: u64,
    },

    /// The generator state lock was poisoned by a thread that panicked
    /// while holding it.
    #[error("generator state lock poisoned")]
    LockPoisoned,

    /// An identifier string failed to parse.
    #[error("malformed identifier: {0}")]
    MalformedId(#[from] MalformedIdError),
}

// Collapse poisoned lock errors; the guard carries no useful payload.
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
