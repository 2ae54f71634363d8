//! Numeric identifier newtypes
//!
//! Server identifiers are numeric; route segments carrying them are
//! validated at the routing boundary before the synchronization layer is
//! engaged.

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                s.parse::<u64>().map(Self)
            }
        }
    };
}

numeric_id! {
    /// Identifier of the primary entity shown on the detail page
    EntityId
}

numeric_id! {
    /// Identifier of one published version of an entity
    VersionId
}

numeric_id! {
    /// Identifier of a review record
    ReviewId
}

numeric_id! {
    /// Identifier of a user account
    UserId
}
