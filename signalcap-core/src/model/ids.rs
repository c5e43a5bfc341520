//! Stable identifiers for entities of an intersection snapshot

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

entity_id!(
    /// Logical scenario identity shared by every version of a scenario
    ScenarioId
);
entity_id!(
    /// Intersection node identifier
    NodeId
);
entity_id!(
    /// Approach identifier, unique within a node
    ApproachId
);
entity_id!(
    /// Lane group identifier, unique within its approach
    LaneGroupId
);
entity_id!(
    /// Signal phase identifier, unique within a timing plan
    PhaseId
);
