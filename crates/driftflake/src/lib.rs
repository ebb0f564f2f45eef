//! Time-ordered, collision-resistant unique identifiers.
//!
//! `driftflake` issues Snowflake-style IDs packed into a `u64`: a 42-bit
//! millisecond timestamp (measured from [`FLAKE_EPOCH`]), a 10-bit worker ID
//! and a 12-bit per-millisecond sequence. IDs from one generator instance are
//! strictly increasing, sort the same way numerically and chronologically,
//! and render as plain base-10 digit strings safe for text columns, JSON and
//! URLs. The creation instant can always be recovered from an ID alone.
//!
//! Two generator flavors are provided:
//!
//! - [`BasicFlakeGenerator`]: single-threaded, no locking
//! - [`LockFlakeGenerator`]: thread-safe behind a mutex, cheaply cloneable
//!
//! # Example
//!
//! ```
//! use driftflake::{BasicFlakeGenerator, Flake, WallClock};
//!
//! let generator = BasicFlakeGenerator::new(0, WallClock::default());
//!
//! let id = generator.next_id().expect("wall clock went backwards");
//! let key = id.to_string(); // decimal digit string, e.g. "512389598412800000"
//!
//! let parsed: Flake = key.parse().expect("we just rendered it");
//! assert_eq!(parsed, id);
//! assert_eq!(parsed.unix_millis(), id.unix_millis());
//! ```

mod id;
mod time;

mod generator;
#[cfg(feature = "serde")]
mod serde;

pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
