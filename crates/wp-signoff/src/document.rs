//! Workpaper Document Aggregate
//!
//! The full questionnaire for one engagement, persisted wholesale by the
//! document-store collaborator. The aggregate owns every section's
//! sign-off record; sections never own their record independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::record::{SignOffEvent, SignOffRecord};

/// One engagement's workpaper: form field values, per-section sign-off
/// records, and the applied-transition audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkpaperDocument {
    /// Engagement this workpaper belongs to
    pub engagement_id: Uuid,

    /// Flat form-data map, keyed by field id. Values are opaque to the
    /// engine; only write access is gated by the section lock.
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,

    /// Per-section sign-off records, keyed by section id. Records are
    /// created lazily (pending) and only ever mutated by the engine.
    #[serde(default)]
    pub signoffs: HashMap<String, SignOffRecord>,

    /// Append-only history of applied sign-off transitions
    #[serde(default)]
    pub history: Vec<SignOffEvent>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

impl WorkpaperDocument {
    /// Create an empty workpaper for an engagement
    pub fn new(engagement_id: Uuid, created_by: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            engagement_id,
            fields: HashMap::new(),
            signoffs: HashMap::new(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
            created_by,
        }
    }

    /// Current sign-off record for a section; absent means implicitly pending
    pub fn signoff(&self, section_id: &str) -> Option<&SignOffRecord> {
        self.signoffs.get(section_id)
    }

    /// Read a form field value
    pub fn field(&self, field_id: &str) -> Option<&serde_json::Value> {
        self.fields.get(field_id)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_is_empty() {
        let doc = WorkpaperDocument::new(Uuid::new_v4(), Some("user-1".to_string()));
        assert!(doc.fields.is_empty());
        assert!(doc.signoffs.is_empty());
        assert!(doc.history.is_empty());
        assert_eq!(doc.created_at, doc.updated_at);
    }

    #[test]
    fn test_document_serde_roundtrip() {
        let mut doc = WorkpaperDocument::new(Uuid::new_v4(), None);
        doc.fields.insert(
            "ceramic_governance_separate".to_string(),
            serde_json::json!("yes"),
        );
        doc.signoffs
            .insert("ceramic".to_string(), SignOffRecord::pending());

        let json = serde_json::to_string(&doc).unwrap();
        let back: WorkpaperDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(back.engagement_id, doc.engagement_id);
        assert_eq!(back.field("ceramic_governance_separate"), doc.field("ceramic_governance_separate"));
        assert_eq!(back.signoff("ceramic"), Some(&SignOffRecord::pending()));
    }

    #[test]
    fn test_missing_collections_default_on_deserialize() {
        // Older persisted documents may predate the signoffs/history fields
        let json = format!(
            r#"{{"engagement_id":"{}","created_at":"2026-08-24T10:00:00Z","updated_at":"2026-08-24T10:00:00Z","created_by":null}}"#,
            Uuid::new_v4()
        );
        let doc: WorkpaperDocument = serde_json::from_str(&json).unwrap();
        assert!(doc.signoffs.is_empty());
        assert!(doc.history.is_empty());
    }
}
