mod basic;
mod error;
mod lock;

pub use basic::*;
pub use error::*;
pub use lock::*;

use crate::time::TimeSource;

/// Spins until the time source reads strictly past `last`, returning the new
/// reading.
///
/// A true spin, not a sleep or yield: the wait is bounded by the remainder
/// of the current millisecond, and yielding mid-issuance would open the
/// state to interleaving in cooperative runtimes.
pub(crate) fn spin_past<T: TimeSource>(time: &T, last: u64) -> u64 {
    loop {
        let now = time.current_millis();
        if now > last {
            return now;
        }
        core::hint::spin_loop();
    }
}
