//! Sign-Off Record Types
//!
//! One record per section, living inside the workpaper document's
//! `signoffs` map. A record is never deleted, only reset to pending.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wp_types::UserId;

/// Derived two-state view of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignOffState {
    Pending,
    Signed,
}

impl SignOffState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Signed => "signed",
        }
    }
}

impl std::fmt::Display for SignOffState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sign-off state of one section.
///
/// Invariant: `signed == false` implies both `signed_by` and `signed_at`
/// are `None`; `signed == true` implies both are `Some`. Only the engine's
/// transitions construct non-pending records, so the invariant holds for
/// every record that stays inside the document.
///
/// Field names serialize camelCase to match the persisted form-data shape
/// (`signedBy`, `signedAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOffRecord {
    pub signed: bool,
    pub signed_by: Option<UserId>,
    pub signed_at: Option<DateTime<Utc>>,
}

impl SignOffRecord {
    /// The implicit initial state of every section
    pub fn pending() -> Self {
        Self {
            signed: false,
            signed_by: None,
            signed_at: None,
        }
    }

    pub fn state(&self) -> SignOffState {
        if self.signed {
            SignOffState::Signed
        } else {
            SignOffState::Pending
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Apply the pending -> signed transition
    pub(crate) fn sign(&mut self, by: UserId, at: DateTime<Utc>) {
        self.signed = true;
        self.signed_by = Some(by);
        self.signed_at = Some(at);
    }

    /// Apply the signed -> pending transition
    pub(crate) fn clear(&mut self) {
        self.signed = false;
        self.signed_by = None;
        self.signed_at = None;
    }
}

impl Default for SignOffRecord {
    fn default() -> Self {
        Self::pending()
    }
}

/// Direction of an applied transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignOffAction {
    Signed,
    Unsigned,
}

/// Audit-trail entry, appended for every applied transition.
/// No-ops and denied attempts leave no trace here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignOffEvent {
    pub section_id: String,
    pub action: SignOffAction,
    pub actor: UserId,
    pub occurred_at: DateTime<Utc>,
}
