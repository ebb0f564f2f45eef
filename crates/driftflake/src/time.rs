use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Flake epoch in milliseconds since the Unix epoch: Wednesday, January 1,
/// 2020 00:00:00 UTC.
///
/// Every timestamp field in a [`Flake`] is measured from this instant. It is
/// part of the external contract: changing it would break decoding for every
/// identifier already in storage.
///
/// [`Flake`]: crate::Flake
pub const FLAKE_EPOCH_MS: u64 = 1_577_836_800_000;

/// [`FLAKE_EPOCH_MS`] as a [`Duration`] since the Unix epoch.
pub const FLAKE_EPOCH: Duration = Duration::from_millis(FLAKE_EPOCH_MS);

/// A source of the current time, in milliseconds since [`FLAKE_EPOCH`].
///
/// This abstraction exists so tests can substitute fixed, stepping or frozen
/// clocks for the real one.
///
/// # Example
///
/// ```
/// use driftflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since [`FLAKE_EPOCH`].
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// The production time source: the system wall clock, offset to
/// [`FLAKE_EPOCH`].
///
/// Each call reads [`SystemTime::now`]. This is deliberate: a wall clock that
/// steps backwards (an NTP correction, a manual adjustment) must be
/// *observable* so the generator can refuse to issue identifiers that would
/// break monotonicity. A monotonic timer would paper over exactly the
/// condition the generator treats as fatal.
///
/// Readings earlier than the epoch saturate to zero, which the generator then
/// reports as a clock regression.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        let since_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        since_unix.saturating_sub(FLAKE_EPOCH).as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_is_past_epoch() {
        // Any machine running this test is well past 2020-01-01.
        let now = WallClock.current_millis();
        assert!(now > 0);
    }

    #[test]
    fn wall_clock_tracks_unix_time() {
        let unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let now = WallClock.current_millis();
        let diff = (unix_ms - FLAKE_EPOCH_MS).abs_diff(now);
        assert!(diff < 1_000, "clock readings drifted by {diff}ms");
    }
}
