//! Document Store Abstraction
//!
//! Abstract interface for persisting workpaper documents wholesale.
//! Implementations can target the local filesystem (POC) or a hosted
//! document store (production). The engine mutates in memory first; a
//! failed save surfaces here and the in-memory state stands.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use uuid::Uuid;

use crate::document::WorkpaperDocument;

/// Error type for document store operations
#[derive(Debug, thiserror::Error)]
pub enum SnapshotStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Workpaper not found for engagement: {0}")]
    NotFound(Uuid),
}

/// Reference to a persisted snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRef {
    /// Backend-specific URI (file://... for the local store)
    pub uri: String,
    /// Hex sha256 of the serialized document
    pub digest: String,
}

/// Abstract wholesale persistence for workpaper documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist the full document, returning a content-addressed reference
    async fn save(&self, doc: &WorkpaperDocument) -> Result<SnapshotRef, SnapshotStoreError>;

    /// Load the latest snapshot for an engagement
    async fn load(&self, engagement_id: Uuid) -> Result<WorkpaperDocument, SnapshotStoreError>;

    /// Check whether a snapshot exists for an engagement
    async fn exists(&self, engagement_id: Uuid) -> Result<bool, SnapshotStoreError>;

    /// Delete an engagement's snapshot
    async fn delete(&self, engagement_id: Uuid) -> Result<(), SnapshotStoreError>;
}

fn digest_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Local filesystem implementation (one JSON file per engagement)
pub struct LocalDocumentStore {
    base_path: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn path_for(&self, engagement_id: Uuid) -> PathBuf {
        self.base_path.join(format!("{engagement_id}.json"))
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn save(&self, doc: &WorkpaperDocument) -> Result<SnapshotRef, SnapshotStoreError> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        let path = self.path_for(doc.engagement_id);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!(engagement_id = %doc.engagement_id, path = %path.display(), "workpaper saved");
        Ok(SnapshotRef {
            uri: format!("file://{}", path.display()),
            digest: digest_hex(&bytes),
        })
    }

    async fn load(&self, engagement_id: Uuid) -> Result<WorkpaperDocument, SnapshotStoreError> {
        let path = self.path_for(engagement_id);
        if !path.exists() {
            return Err(SnapshotStoreError::NotFound(engagement_id));
        }

        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn exists(&self, engagement_id: Uuid) -> Result<bool, SnapshotStoreError> {
        Ok(self.path_for(engagement_id).exists())
    }

    async fn delete(&self, engagement_id: Uuid) -> Result<(), SnapshotStoreError> {
        let path = self.path_for(engagement_id);
        if path.exists() {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }
}

/// In-memory document store (POC and tests)
pub struct InMemoryDocumentStore {
    docs: std::sync::Arc<tokio::sync::RwLock<std::collections::HashMap<Uuid, Vec<u8>>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            docs: std::sync::Arc::new(tokio::sync::RwLock::new(std::collections::HashMap::new())),
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn save(&self, doc: &WorkpaperDocument) -> Result<SnapshotRef, SnapshotStoreError> {
        let bytes = serde_json::to_vec(doc)?;
        let digest = digest_hex(&bytes);
        let mut docs = self.docs.write().await;
        docs.insert(doc.engagement_id, bytes);
        Ok(SnapshotRef {
            uri: format!("memory://{}", doc.engagement_id),
            digest,
        })
    }

    async fn load(&self, engagement_id: Uuid) -> Result<WorkpaperDocument, SnapshotStoreError> {
        let docs = self.docs.read().await;
        let bytes = docs
            .get(&engagement_id)
            .ok_or(SnapshotStoreError::NotFound(engagement_id))?;
        Ok(serde_json::from_slice(bytes)?)
    }

    async fn exists(&self, engagement_id: Uuid) -> Result<bool, SnapshotStoreError> {
        let docs = self.docs.read().await;
        Ok(docs.contains_key(&engagement_id))
    }

    async fn delete(&self, engagement_id: Uuid) -> Result<(), SnapshotStoreError> {
        let mut docs = self.docs.write().await;
        docs.remove(&engagement_id);
        Ok(())
    }
}
