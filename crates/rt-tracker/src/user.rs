//! User identities and roles.

use serde::{Deserialize, Serialize};

/// Host-assigned identity of a user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a host identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Permission category of a user in the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regular player.
    #[default]
    Player,
    /// The game master, the host's privileged role.
    Gm,
}

/// A user together with their role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// The user's identity.
    pub id: UserId,
    /// The user's role.
    pub role: Role,
}

impl User {
    /// A user with the player role.
    pub fn player(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            role: Role::Player,
        }
    }

    /// A user with the GM role.
    pub fn gm(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            role: Role::Gm,
        }
    }

    /// Whether this user holds the privileged role.
    pub fn is_gm(&self) -> bool {
        self.role == Role::Gm
    }
}
