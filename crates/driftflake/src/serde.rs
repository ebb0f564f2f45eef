//! Serde support for [`Flake`].
//!
//! Identifiers serialize as their canonical base-10 digit string, the same
//! form used for text-column storage and URLs. JSON numbers are deliberately
//! not used: a 64-bit identifier does not survive a round-trip through
//! consumers that read JSON numbers as doubles.

use crate::id::Flake;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

impl Serialize for Flake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Flake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FlakeVisitor;

        impl de::Visitor<'_> for FlakeVisitor {
            type Value = Flake;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a base-10 identifier string")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(FlakeVisitor)
    }
}
