//! Field Comment Registry
//!
//! Abstract interface to the commenting collaborator. The engine only
//! needs a derived count per (section, field) and a fire-and-forget
//! create call; comment threads themselves live elsewhere.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Error type for comment registry operations
#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("Comment backend error: {0}")]
    Backend(String),
}

/// Abstract per-field comment collaborator
#[async_trait]
pub trait FieldCommentRegistry: Send + Sync {
    /// Number of comments attached to a (section, field) pair
    async fn field_comment_count(
        &self,
        section_id: &str,
        field_id: &str,
    ) -> Result<u32, CommentError>;

    /// Request a comment on a field. When comments already exist the
    /// collaborator treats this as opening the existing thread, so the
    /// caller never consumes a return value.
    async fn create_comment(
        &self,
        field_id: &str,
        section_id: &str,
        label: &str,
    ) -> Result<(), CommentError>;
}

/// What the commentable-field wrapper should render next to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAffordance {
    /// No comments yet: offer a "create comment" menu entry
    CreateEntry,
    /// Existing comments: show the count badge (clicking re-invokes
    /// `create_comment`, which opens the thread)
    CountBadge(u32),
}

/// Decide the affordance for one field from the registry's derived count
pub async fn comment_affordance(
    registry: &dyn FieldCommentRegistry,
    section_id: &str,
    field_id: &str,
) -> Result<CommentAffordance, CommentError> {
    let count = registry.field_comment_count(section_id, field_id).await?;
    if count > 0 {
        Ok(CommentAffordance::CountBadge(count))
    } else {
        Ok(CommentAffordance::CreateEntry)
    }
}

/// In-memory registry (POC and tests)
pub struct InMemoryCommentRegistry {
    comments: Arc<RwLock<HashMap<(String, String), Vec<String>>>>,
}

impl InMemoryCommentRegistry {
    pub fn new() -> Self {
        Self {
            comments: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryCommentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FieldCommentRegistry for InMemoryCommentRegistry {
    async fn field_comment_count(
        &self,
        section_id: &str,
        field_id: &str,
    ) -> Result<u32, CommentError> {
        let comments = self.comments.read().await;
        Ok(comments
            .get(&(section_id.to_string(), field_id.to_string()))
            .map(|c| c.len() as u32)
            .unwrap_or(0))
    }

    async fn create_comment(
        &self,
        field_id: &str,
        section_id: &str,
        label: &str,
    ) -> Result<(), CommentError> {
        let mut comments = self.comments.write().await;
        comments
            .entry((section_id.to_string(), field_id.to_string()))
            .or_default()
            .push(label.to_string());
        Ok(())
    }
}
