//! Engagement Team Roles
//!
//! Ordered role ranking for sign-off authorization:
//! staff < in_charge < manager < partner < lead_developer.
//! Higher ranks satisfy lower-rank requirements.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role of a member of the engagement team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Staff,
    InCharge,
    Manager,
    Partner,
    LeadDeveloper,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::InCharge => "in_charge",
            Self::Manager => "manager",
            Self::Partner => "partner",
            Self::LeadDeveloper => "lead_developer",
        }
    }

    /// Order value for rank comparison
    fn order(&self) -> u8 {
        match self {
            Self::Staff => 0,
            Self::InCharge => 1,
            Self::Manager => 2,
            Self::Partner => 3,
            Self::LeadDeveloper => 4,
        }
    }

    /// Check whether this role meets or exceeds a section's required level.
    /// This is the authorization predicate for both sign-off and unsign.
    pub fn satisfies(&self, level: SignOffLevel) -> bool {
        self.order() >= level.minimum_role().order()
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff" => Ok(Self::Staff),
            "in_charge" => Ok(Self::InCharge),
            "manager" => Ok(Self::Manager),
            "partner" => Ok(Self::Partner),
            "lead_developer" => Ok(Self::LeadDeveloper),
            _ => Err(RoleParseError::UnknownRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimum role a section demands for sign-off.
///
/// Sections only ever require in_charge or manager; the full role ladder
/// still applies when checking who satisfies the requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignOffLevel {
    InCharge,
    Manager,
}

impl SignOffLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InCharge => "in_charge",
            Self::Manager => "manager",
        }
    }

    /// The lowest role that satisfies this level
    pub fn minimum_role(&self) -> Role {
        match self {
            Self::InCharge => Role::InCharge,
            Self::Manager => Role::Manager,
        }
    }
}

impl FromStr for SignOffLevel {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_charge" => Ok(Self::InCharge),
            "manager" => Ok(Self::Manager),
            _ => Err(RoleParseError::UnknownLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for SignOffLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RoleParseError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown sign-off level: {0}")]
    UnknownLevel(String),
}
