//! Workpaper Sign-Off Core
//!
//! Backend core for the audit-engagement workpaper editor: a per-section
//! sign-off lock with role-based authorization, the workpaper document
//! aggregate it mutates, and the collaborator seams around it (field
//! comments, wholesale document persistence).
//!
//! The engine itself is synchronous and in-memory; only the collaborator
//! traits (`DocumentStore`, `FieldCommentRegistry`) are async.

pub mod comments;
pub mod document;
pub mod engine;
pub mod profile;
pub mod record;
pub mod rows;
pub mod store;

pub use comments::{
    comment_affordance, CommentAffordance, CommentError, FieldCommentRegistry,
    InMemoryCommentRegistry,
};
pub use document::WorkpaperDocument;
pub use engine::{SectionSignOffStatus, SignOffEngine, SignOffError, WorkpaperStatus};
pub use profile::{ProfileError, SectionMeta, SectionNode, SectionProfile};
pub use record::{SignOffAction, SignOffEvent, SignOffRecord, SignOffState};
pub use rows::{KeyedRow, RowSet};
pub use store::{
    DocumentStore, InMemoryDocumentStore, LocalDocumentStore, SnapshotRef, SnapshotStoreError,
};
