//! Identity types for roster entities.
//!
//! Identifiers are assigned by the server and never change afterwards, so
//! each one is a distinct newtype that cannot be confused with another
//! family's id at a call site.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Common behavior for server-assigned identifiers.
pub trait EntityIdType: Copy + Eq + std::hash::Hash + fmt::Display {
    fn new(raw: u64) -> Self;
    fn get(self) -> u64;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl EntityIdType for $name {
            fn new(raw: u64) -> Self {
                Self(raw)
            }

            fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

entity_id!(
    /// Identifier of a team member.
    TeamMemberId
);
entity_id!(
    /// Identifier of a custom field definition.
    FieldId
);
entity_id!(
    /// Identifier of a lookup registry.
    RegistryId
);
entity_id!(
    /// Identifier of an entry inside a registry.
    EntryId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let id = RegistryId::new(2);
        assert_eq!(serde_json::to_string(&id).unwrap(), "2");
        let parsed: RegistryId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed.get(), 7);
    }
}
