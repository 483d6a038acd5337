//! Section Sign-Off Engine
//!
//! Two-state lock per section (pending / signed) with role-gated
//! transitions. The engine is the only mutator of a document's `signoffs`
//! map; everything else reads through `is_locked` or the records directly.
//!
//! All transitions are synchronous in-memory mutations. Persistence is
//! the document-store collaborator's concern and happens after the fact;
//! a failed save leaves the optimistic in-memory state standing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use wp_types::{CurrentUser, Role, SignOffLevel, UserId};

use crate::document::WorkpaperDocument;
use crate::profile::SectionProfile;
use crate::record::{SignOffAction, SignOffEvent, SignOffRecord, SignOffState};

/// Error type for sign-off operations
#[derive(Debug, thiserror::Error)]
pub enum SignOffError {
    #[error("User {user} ({role}) is not authorized: section requires {required}")]
    NotAuthorized {
        user: UserId,
        role: Role,
        required: SignOffLevel,
    },

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Section {0} is signed off and read-only")]
    SectionLocked(String),
}

/// The sign-off engine for one engagement profile.
///
/// Stateless service over the section configuration; every operation takes
/// the workpaper document it acts on, so one engine instance serves any
/// number of documents built from the same profile.
pub struct SignOffEngine {
    profile: Arc<SectionProfile>,
}

impl SignOffEngine {
    pub fn new(profile: Arc<SectionProfile>) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &SectionProfile {
        &self.profile
    }

    /// Sign off a section, locking its fields.
    ///
    /// The acting user's role must meet the section's required level.
    /// A record absent from the document is treated as implicitly pending
    /// before the transition applies. Signing an already-signed section is
    /// a no-op: the existing record (and its timestamp) is returned
    /// unchanged.
    pub fn sign_off(
        &self,
        doc: &mut WorkpaperDocument,
        section_id: &str,
        user: &CurrentUser,
    ) -> Result<SignOffRecord, SignOffError> {
        let required = self.authorize(section_id, user)?;

        let record = doc
            .signoffs
            .entry(section_id.to_string())
            .or_insert_with(SignOffRecord::pending);

        if record.is_signed() {
            tracing::debug!(section_id, "sign-off no-op: already signed");
            return Ok(record.clone());
        }

        let now = Utc::now();
        record.sign(user.id.clone(), now);
        let snapshot = record.clone();

        doc.history.push(SignOffEvent {
            section_id: section_id.to_string(),
            action: SignOffAction::Signed,
            actor: user.id.clone(),
            occurred_at: now,
        });
        doc.touch();

        tracing::info!(section_id, user = %user.id, required = %required, "section signed off");
        Ok(snapshot)
    }

    /// Reopen a signed section, clearing signer and timestamp.
    ///
    /// Same role check as `sign_off`. Unsigning a pending section is a
    /// no-op.
    pub fn unsign(
        &self,
        doc: &mut WorkpaperDocument,
        section_id: &str,
        user: &CurrentUser,
    ) -> Result<SignOffRecord, SignOffError> {
        self.authorize(section_id, user)?;

        let record = doc
            .signoffs
            .entry(section_id.to_string())
            .or_insert_with(SignOffRecord::pending);

        if !record.is_signed() {
            tracing::debug!(section_id, "unsign no-op: already pending");
            return Ok(record.clone());
        }

        record.clear();
        let snapshot = record.clone();
        let now = Utc::now();

        doc.history.push(SignOffEvent {
            section_id: section_id.to_string(),
            action: SignOffAction::Unsigned,
            actor: user.id.clone(),
            occurred_at: now,
        });
        doc.touch();

        tracing::info!(section_id, user = %user.id, "section reopened");
        Ok(snapshot)
    }

    /// Whether a section is currently signed off (read-only).
    /// Unknown or untouched sections are not locked.
    pub fn is_locked(&self, doc: &WorkpaperDocument, section_id: &str) -> bool {
        doc.signoffs
            .get(section_id)
            .map(|r| r.is_signed())
            .unwrap_or(false)
    }

    /// Write a form field, refusing when its section is locked.
    ///
    /// A locked section stays visible but inert: reads still work, the
    /// write path reports `SectionLocked` instead of mutating.
    pub fn update_field(
        &self,
        doc: &mut WorkpaperDocument,
        section_id: &str,
        field_id: &str,
        value: serde_json::Value,
    ) -> Result<(), SignOffError> {
        if !self.profile.contains(section_id) {
            return Err(SignOffError::UnknownSection(section_id.to_string()));
        }
        if self.is_locked(doc, section_id) {
            tracing::warn!(section_id, field_id, "field write refused: section locked");
            return Err(SignOffError::SectionLocked(section_id.to_string()));
        }

        doc.fields.insert(field_id.to_string(), value);
        doc.touch();
        Ok(())
    }

    /// Full per-section lock status plus progress, in sidebar order
    pub fn status(&self, doc: &WorkpaperDocument) -> WorkpaperStatus {
        let sections: Vec<SectionSignOffStatus> = self
            .profile
            .iter()
            .map(|meta| {
                let record = doc.signoffs.get(&meta.id);
                SectionSignOffStatus {
                    section_id: meta.id.clone(),
                    title: meta.title.clone(),
                    required_level: meta.required_level,
                    state: record.map(|r| r.state()).unwrap_or(SignOffState::Pending),
                    signed_by: record.and_then(|r| r.signed_by.clone()),
                    signed_at: record.and_then(|r| r.signed_at),
                }
            })
            .collect();

        let total = sections.len();
        let signed = sections
            .iter()
            .filter(|s| s.state == SignOffState::Signed)
            .count();
        let progress = if total > 0 {
            (signed as f32 / total as f32) * 100.0
        } else {
            0.0
        };

        WorkpaperStatus {
            engagement_id: doc.engagement_id,
            sections,
            signed,
            total,
            progress,
        }
    }

    /// Role check shared by both transitions; returns the required level
    fn authorize(
        &self,
        section_id: &str,
        user: &CurrentUser,
    ) -> Result<SignOffLevel, SignOffError> {
        let meta = self
            .profile
            .get(section_id)
            .ok_or_else(|| SignOffError::UnknownSection(section_id.to_string()))?;

        if !user.role.satisfies(meta.required_level) {
            tracing::warn!(
                section_id,
                user = %user.id,
                role = %user.role,
                required = %meta.required_level,
                "sign-off transition denied"
            );
            return Err(SignOffError::NotAuthorized {
                user: user.id.clone(),
                role: user.role,
                required: meta.required_level,
            });
        }
        Ok(meta.required_level)
    }
}

/// Sidebar-order view of every section's lock state
#[derive(Debug, Clone, Serialize)]
pub struct WorkpaperStatus {
    pub engagement_id: uuid::Uuid,
    pub sections: Vec<SectionSignOffStatus>,
    pub signed: usize,
    pub total: usize,
    pub progress: f32,
}

/// Lock state of one section, for the sidebar badge
#[derive(Debug, Clone, Serialize)]
pub struct SectionSignOffStatus {
    pub section_id: String,
    pub title: String,
    pub required_level: SignOffLevel,
    pub state: SignOffState,
    pub signed_by: Option<UserId>,
    pub signed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const PROFILE_YAML: &str = r#"
sections:
  - id: independence-section
    title: Independence
    required_level: in_charge
  - id: entity-wide-procedures
    title: Entity-Wide Procedures
    required_level: manager
  - id: ceramic
    title: CERAMIC Evaluation
    required_level: in_charge
"#;

    fn engine() -> SignOffEngine {
        SignOffEngine::new(Arc::new(SectionProfile::from_yaml(PROFILE_YAML).unwrap()))
    }

    fn doc() -> WorkpaperDocument {
        WorkpaperDocument::new(Uuid::new_v4(), None)
    }

    #[test]
    fn test_staff_cannot_sign_in_charge_section() {
        let engine = engine();
        let mut doc = doc();
        let staff = CurrentUser::new("user-7", Role::Staff);

        let err = engine
            .sign_off(&mut doc, "independence-section", &staff)
            .unwrap_err();
        assert!(matches!(err, SignOffError::NotAuthorized { .. }));

        // Denied transition leaves state unchanged: no record, no history
        assert!(!engine.is_locked(&doc, "independence-section"));
        assert!(doc.signoff("independence-section").is_none());
        assert!(doc.history.is_empty());
    }

    #[test]
    fn test_in_charge_signs_off_section() {
        let engine = engine();
        let mut doc = doc();
        let user = CurrentUser::new("user-42", Role::InCharge);

        let before = Utc::now();
        let record = engine
            .sign_off(&mut doc, "independence-section", &user)
            .unwrap();
        let after = Utc::now();

        assert!(record.signed);
        assert_eq!(record.signed_by, Some(UserId::new("user-42")));
        let at = record.signed_at.unwrap();
        assert!(at >= before && at <= after);

        assert!(engine.is_locked(&doc, "independence-section"));
        assert_eq!(doc.history.len(), 1);
        assert_eq!(doc.history[0].action, SignOffAction::Signed);
    }

    #[test]
    fn test_in_charge_cannot_sign_manager_section() {
        let engine = engine();
        let mut doc = doc();
        let user = CurrentUser::new("user-42", Role::InCharge);

        let err = engine
            .sign_off(&mut doc, "entity-wide-procedures", &user)
            .unwrap_err();
        assert!(matches!(
            err,
            SignOffError::NotAuthorized {
                required: SignOffLevel::Manager,
                ..
            }
        ));
        assert!(!engine.is_locked(&doc, "entity-wide-procedures"));
    }

    #[test]
    fn test_repeat_sign_off_is_noop_with_unchanged_timestamp() {
        let engine = engine();
        let mut doc = doc();
        let user = CurrentUser::new("user-42", Role::Manager);

        let first = engine.sign_off(&mut doc, "ceramic", &user).unwrap();
        let second = engine.sign_off(&mut doc, "ceramic", &user).unwrap();

        assert_eq!(first.signed_at, second.signed_at);
        assert_eq!(first, second);
        // No-op leaves no extra history entry
        assert_eq!(doc.history.len(), 1);
    }

    #[test]
    fn test_sign_unsign_round_trip() {
        let engine = engine();
        let mut doc = doc();
        let user = CurrentUser::new("user-42", Role::InCharge);

        engine
            .sign_off(&mut doc, "independence-section", &user)
            .unwrap();
        let record = engine
            .unsign(&mut doc, "independence-section", &user)
            .unwrap();

        assert_eq!(record, SignOffRecord::pending());
        assert!(!engine.is_locked(&doc, "independence-section"));
        assert_eq!(doc.history.len(), 2);
        assert_eq!(doc.history[1].action, SignOffAction::Unsigned);
    }

    #[test]
    fn test_unsign_pending_is_noop() {
        let engine = engine();
        let mut doc = doc();
        let user = CurrentUser::new("user-42", Role::InCharge);

        let record = engine.unsign(&mut doc, "ceramic", &user).unwrap();
        assert_eq!(record, SignOffRecord::pending());
        assert!(doc.history.is_empty());
    }

    #[test]
    fn test_unknown_section_is_an_error() {
        let engine = engine();
        let mut doc = doc();
        let user = CurrentUser::new("user-42", Role::Partner);

        let err = engine.sign_off(&mut doc, "no-such-section", &user).unwrap_err();
        assert!(matches!(err, SignOffError::UnknownSection(_)));
    }

    #[test]
    fn test_locked_section_refuses_field_writes() {
        let engine = engine();
        let mut doc = doc();
        let user = CurrentUser::new("user-42", Role::InCharge);

        engine
            .update_field(
                &mut doc,
                "ceramic",
                "ceramic_governance_separate",
                serde_json::json!("yes"),
            )
            .unwrap();
        engine.sign_off(&mut doc, "ceramic", &user).unwrap();

        let err = engine
            .update_field(
                &mut doc,
                "ceramic",
                "ceramic_governance_separate",
                serde_json::json!("no"),
            )
            .unwrap_err();
        assert!(matches!(err, SignOffError::SectionLocked(_)));

        // Visible but inert: the value is still readable, unchanged
        assert_eq!(
            doc.field("ceramic_governance_separate"),
            Some(&serde_json::json!("yes"))
        );

        // Unlock re-enables writes
        engine.unsign(&mut doc, "ceramic", &user).unwrap();
        engine
            .update_field(
                &mut doc,
                "ceramic",
                "ceramic_governance_separate",
                serde_json::json!("no"),
            )
            .unwrap();
        assert_eq!(
            doc.field("ceramic_governance_separate"),
            Some(&serde_json::json!("no"))
        );
    }

    #[test]
    fn test_status_reports_progress_in_sidebar_order() {
        let engine = engine();
        let mut doc = doc();
        let user = CurrentUser::new("user-42", Role::Manager);

        engine.sign_off(&mut doc, "ceramic", &user).unwrap();

        let status = engine.status(&doc);
        assert_eq!(status.total, 3);
        assert_eq!(status.signed, 1);
        assert!((status.progress - 100.0 / 3.0).abs() < 0.01);

        let ids: Vec<&str> = status.sections.iter().map(|s| s.section_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["independence-section", "entity-wide-procedures", "ceramic"]
        );
        assert_eq!(status.sections[2].state, SignOffState::Signed);
        assert_eq!(status.sections[0].state, SignOffState::Pending);
    }
}
