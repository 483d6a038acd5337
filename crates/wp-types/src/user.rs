//! User Identity
//!
//! The identity provider lives outside this codebase; we only carry the
//! opaque user id and the resolved role it hands us.

use crate::role::{Role, SignOffLevel};
use serde::{Deserialize, Serialize};

/// Opaque user identifier from the identity collaborator (e.g. "user-42")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The acting user for the current editing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub role: Role,
}

impl CurrentUser {
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Whether this user may sign off (or unsign) a section at the given level
    pub fn can_sign_off(&self, level: SignOffLevel) -> bool {
        self.role.satisfies(level)
    }
}
