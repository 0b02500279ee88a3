//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of different ID types (e.g., using a
//! StatusId where a SiteId is expected) and make the code more self-documenting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ring member's store-assigned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct SiteId(pub i64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SiteId {
    fn from(n: i64) -> Self {
        SiteId(n)
    }
}

/// A status post's store-assigned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct StatusId(pub i64);

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StatusId {
    fn from(n: i64) -> Self {
        StatusId(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod site_id {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn serde_roundtrip(n: i64) {
                let id = SiteId(n);
                let json = serde_json::to_string(&id).unwrap();
                let parsed: SiteId = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(id, parsed);
            }

            #[test]
            fn display_matches_underlying(n: i64) {
                prop_assert_eq!(format!("{}", SiteId(n)), format!("{}", n));
            }

            #[test]
            fn comparison_matches_underlying(a: i64, b: i64) {
                prop_assert_eq!(SiteId(a) == SiteId(b), a == b);
            }
        }
    }

    mod status_id {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn serde_roundtrip(n: i64) {
                let id = StatusId(n);
                let json = serde_json::to_string(&id).unwrap();
                let parsed: StatusId = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(id, parsed);
            }
        }
    }
}
