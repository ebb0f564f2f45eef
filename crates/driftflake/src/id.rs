use crate::time::FLAKE_EPOCH_MS;
use core::fmt;
use core::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A 64-bit time-ordered unique identifier.
///
/// - 42 bits timestamp (ms since [`FLAKE_EPOCH`])
/// - 10 bits worker ID (fixed to 0 in single-node deployments)
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63             22 21            12 11             0
///              +----------------+----------------+---------------+
///  Field:      | timestamp (42) | worker ID (10) | sequence (12) |
///              +----------------+----------------+---------------+
///              |<----- MSB ---------- 64 bits --------- LSB ---->|
/// ```
///
/// Numeric order, chronological order and (zero-padded) lexicographic order
/// all agree, so a `Flake` can serve directly as a primary key in a text
/// column. The canonical external form is the base-10 digit string produced
/// by [`Display`], with no leading zeros.
///
/// [`FLAKE_EPOCH`]: crate::FLAKE_EPOCH
/// [`Display`]: core::fmt::Display
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flake {
    id: u64,
}

impl Flake {
    /// Bitmask for the 42-bit timestamp field. Occupies bits 22 through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 42) - 1;

    /// Bitmask for the 10-bit worker ID field. Occupies bits 12 through 21.
    pub const WORKER_ID_MASK: u64 = (1 << 10) - 1;

    /// Bitmask for the 12-bit sequence field. Occupies bits 0 through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the worker ID to its position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = 12;

    /// Maximum representable timestamp, in milliseconds since the epoch
    /// (reaches into the year 2159).
    pub const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;

    /// Maximum representable worker ID (1023).
    pub const MAX_WORKER_ID: u64 = Self::WORKER_ID_MASK;

    /// Maximum representable sequence value (4095), i.e. 4096 identifiers
    /// per worker per millisecond.
    pub const MAX_SEQUENCE: u64 = Self::SEQUENCE_MASK;

    /// Packs an identifier from its three fields.
    ///
    /// In debug builds, out-of-range fields panic; in release builds they
    /// are masked to their bit widths.
    ///
    /// # Example
    ///
    /// ```
    /// use driftflake::Flake;
    ///
    /// let id = Flake::from_parts(122_163_200_000, 0, 0);
    /// assert_eq!(id.to_raw(), 512_389_598_412_800_000);
    /// ```
    pub const fn from_parts(timestamp: u64, worker_id: u64, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(worker_id <= Self::WORKER_ID_MASK, "worker_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = sequence & Self::SEQUENCE_MASK;
        Self {
            id: timestamp | worker_id | sequence,
        }
    }

    /// Extracts the timestamp field: milliseconds since [`FLAKE_EPOCH`].
    ///
    /// [`FLAKE_EPOCH`]: crate::FLAKE_EPOCH
    pub const fn timestamp(&self) -> u64 {
        self.id >> Self::TIMESTAMP_SHIFT
    }

    /// Extracts the worker ID field.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence field.
    pub const fn sequence(&self) -> u64 {
        self.id & Self::SEQUENCE_MASK
    }

    /// Returns the creation instant as milliseconds since the Unix epoch.
    ///
    /// This is the exact wall-clock millisecond captured when the identifier
    /// was generated; the worker and sequence bits live entirely below the
    /// timestamp field and cannot perturb it.
    ///
    /// # Example
    ///
    /// ```
    /// use driftflake::Flake;
    ///
    /// let id: Flake = "512389598412800000".parse().unwrap();
    /// assert_eq!(id.unix_millis(), 1_700_000_000_000);
    /// ```
    pub const fn unix_millis(&self) -> u64 {
        FLAKE_EPOCH_MS + self.timestamp()
    }

    /// Returns the creation instant as a [`SystemTime`].
    pub fn created_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.unix_millis())
    }

    /// Returns the packed 64-bit representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Reinterprets a packed 64-bit value as an identifier.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the identifier as a zero-padded 20-digit string.
    ///
    /// Unlike the plain [`Display`] form, the padded form sorts
    /// lexicographically in text columns regardless of magnitude.
    ///
    /// [`Display`]: core::fmt::Display
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }

    /// Returns true if the sequence field can still be incremented within
    /// the current millisecond.
    pub(crate) const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::MAX_SEQUENCE
    }

    /// Returns a new identifier with the sequence incremented.
    pub(crate) const fn increment_sequence(&self) -> Self {
        Self::from_parts(self.timestamp(), self.worker_id(), self.sequence() + 1)
    }

    /// Returns a new identifier for a newer timestamp, sequence reset to 0.
    pub(crate) const fn rollover_to_timestamp(&self, ts: u64) -> Self {
        Self::from_parts(ts, self.worker_id(), 0)
    }
}

impl fmt::Display for Flake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for Flake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flake")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

/// The reasons a digit string can fail to parse as a [`Flake`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MalformedIdError {
    /// The input was empty.
    #[error("empty identifier string")]
    Empty,

    /// The input contained something other than an ASCII digit. Signs and
    /// whitespace are rejected: the canonical form is digits only.
    #[error("invalid byte in identifier: {byte:#04x}")]
    InvalidDigit {
        /// The offending byte.
        byte: u8,
    },

    /// The value does not fit in 64 bits.
    #[error("identifier exceeds 64 bits")]
    Overflow,
}

impl FromStr for Flake {
    type Err = MalformedIdError;

    /// Parses the canonical base-10 digit string form.
    ///
    /// Accepts any decimal integer string that fits in 64 bits, including
    /// leading zeros (as produced by [`Flake::to_padded_string`]).
    ///
    /// # Example
    ///
    /// ```
    /// use driftflake::{Flake, MalformedIdError};
    ///
    /// let id: Flake = "512389598412800000".parse().unwrap();
    /// assert_eq!(id.sequence(), 0);
    ///
    /// assert_eq!("".parse::<Flake>(), Err(MalformedIdError::Empty));
    /// assert_eq!(
    ///     "-1".parse::<Flake>(),
    ///     Err(MalformedIdError::InvalidDigit { byte: b'-' })
    /// );
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.is_empty() {
            return Err(MalformedIdError::Empty);
        }
        let mut value: u64 = 0;
        for &byte in bytes {
            if !byte.is_ascii_digit() {
                return Err(MalformedIdError::InvalidDigit { byte });
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(byte - b'0')))
                .ok_or(MalformedIdError::Overflow)?;
        }
        Ok(Self::from_raw(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_roundtrip_at_bounds() {
        let ts = Flake::MAX_TIMESTAMP;
        let wid = Flake::MAX_WORKER_ID;
        let seq = Flake::MAX_SEQUENCE;

        let id = Flake::from_parts(ts, wid, seq);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.worker_id(), wid);
        assert_eq!(id.sequence(), seq);
        assert_eq!(id.to_raw(), u64::MAX);
        assert_eq!(Flake::from_raw(id.to_raw()), id);
    }

    #[test]
    fn fields_do_not_bleed() {
        // A maxed-out sequence must not leak into the worker or timestamp
        // fields, and vice versa.
        let id = Flake::from_parts(0, 0, Flake::MAX_SEQUENCE);
        assert_eq!(id.timestamp(), 0);
        assert_eq!(id.worker_id(), 0);

        let id = Flake::from_parts(0, Flake::MAX_WORKER_ID, 0);
        assert_eq!(id.timestamp(), 0);
        assert_eq!(id.sequence(), 0);
    }

    #[test]
    #[should_panic(expected = "timestamp overflow")]
    fn timestamp_overflow_panics() {
        Flake::from_parts(Flake::MAX_TIMESTAMP + 1, 0, 0);
    }

    #[test]
    #[should_panic(expected = "worker_id overflow")]
    fn worker_id_overflow_panics() {
        Flake::from_parts(0, Flake::MAX_WORKER_ID + 1, 0);
    }

    #[test]
    #[should_panic(expected = "sequence overflow")]
    fn sequence_overflow_panics() {
        Flake::from_parts(0, 0, Flake::MAX_SEQUENCE + 1);
    }

    #[test]
    fn display_has_no_leading_zeros() {
        let id = Flake::from_parts(122_163_200_000, 0, 0);
        assert_eq!(id.to_string(), "512389598412800000");
        assert_eq!(id.to_padded_string(), "00512389598412800000");
    }

    #[test]
    fn padded_string_sorts_lexicographically() {
        let small = Flake::from_parts(2, 0, 0);
        let large = Flake::from_parts(122_163_200_000, 0, 0);
        // Plain decimal would compare "8388608" > "51238..." as strings.
        assert!(small.to_string() > large.to_string());
        assert!(small.to_padded_string() < large.to_padded_string());
    }

    #[test]
    fn parse_roundtrip() {
        let id = Flake::from_parts(122_163_200_000, 3, 4095);
        let parsed: Flake = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        let parsed_padded: Flake = id.to_padded_string().parse().unwrap();
        assert_eq!(parsed_padded, id);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("".parse::<Flake>(), Err(MalformedIdError::Empty));
        assert_eq!(
            "12a4".parse::<Flake>(),
            Err(MalformedIdError::InvalidDigit { byte: b'a' })
        );
        assert_eq!(
            "+512".parse::<Flake>(),
            Err(MalformedIdError::InvalidDigit { byte: b'+' })
        );
        assert_eq!(
            " 512".parse::<Flake>(),
            Err(MalformedIdError::InvalidDigit { byte: b' ' })
        );
        // u64::MAX is 18446744073709551615; one more must overflow.
        assert_eq!(
            "18446744073709551616".parse::<Flake>(),
            Err(MalformedIdError::Overflow)
        );
        assert_eq!(
            "18446744073709551615".parse::<Flake>(),
            Ok(Flake::from_raw(u64::MAX))
        );
    }

    #[test]
    fn decode_recovers_unix_millis() {
        let id = Flake::from_parts(122_163_200_000, 0, 17);
        assert_eq!(id.unix_millis(), 1_700_000_000_000);
        assert_eq!(
            id.created_at(),
            UNIX_EPOCH + Duration::from_millis(1_700_000_000_000)
        );
    }

    #[test]
    fn decode_is_exact_beyond_f64_precision() {
        // 2100-01-01T00:00:00Z is 4102444800000 Unix ms, 2524608000000 ms
        // past the flake epoch. Shifted left 22 bits with sequence 4095 the
        // raw value is far above 2^53, where f64 arithmetic would corrupt
        // the low bits.
        let id: Flake = "10588973432832004095".parse().unwrap();
        assert_eq!(id.timestamp(), 2_524_608_000_000);
        assert_eq!(id.sequence(), 4095);
        assert_eq!(id.unix_millis(), 4_102_444_800_000);
    }

    #[test]
    fn ordering_matches_raw_value() {
        let a = Flake::from_parts(41, 0, 4095);
        let b = Flake::from_parts(42, 0, 0);
        let c = Flake::from_parts(42, 0, 1);
        assert!(a < b && b < c);
    }
}
