use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a transparent UUID-backed identifier type.
///
/// Every identifier in the system is a v4 UUID behind its own newtype so
/// that a task id can never be passed where a session id is expected.
/// The types are `Ord` so collections keyed by them iterate
/// deterministically.
macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID
            pub fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Tenant (organization) scope identifier
    TenantId
);

uuid_id!(
    /// Acting user identifier within a tenant
    ActorId
);

uuid_id!(
    /// Work session identifier
    SessionId
);

uuid_id!(
    /// Session event identifier
    EventId
);

uuid_id!(
    /// Task identifier (owned by the task/project collaborator)
    TaskId
);

uuid_id!(
    /// Project identifier (owned by the task/project collaborator)
    ProjectId
);
