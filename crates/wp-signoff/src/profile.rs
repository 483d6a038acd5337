//! Section Profile
//!
//! The questionnaire's sidebar configuration: a tree of named sections,
//! each carrying the minimum role required to sign it off. Loaded once
//! from YAML and flattened into an arena with a `section_id -> index`
//! map, so per-event lookups are O(1) instead of a recursive tree walk.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wp_types::SignOffLevel;

/// Error type for profile loading and validation
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Duplicate section id: {0}")]
    DuplicateSection(String),

    #[error("Profile defines no sections")]
    Empty,
}

/// One node of the configured section tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionNode {
    pub id: String,
    pub title: String,
    pub required_level: SignOffLevel,
    #[serde(default)]
    pub children: Vec<SectionNode>,
}

/// Flattened arena entry for one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMeta {
    pub id: String,
    pub title: String,
    pub required_level: SignOffLevel,
    /// Arena index of the parent section, None for roots
    pub parent: Option<usize>,
    pub depth: usize,
}

#[derive(Debug, Deserialize)]
struct ProfileDoc {
    sections: Vec<SectionNode>,
}

/// Validated, indexed section configuration for one engagement profile.
///
/// Built once at startup; immutable afterwards. Arena order is the
/// depth-first order of the configured tree, which is also the sidebar's
/// display order.
#[derive(Debug, Clone)]
pub struct SectionProfile {
    arena: Vec<SectionMeta>,
    index: HashMap<String, usize>,
}

impl SectionProfile {
    /// Build a profile from the parsed section tree
    pub fn from_nodes(nodes: Vec<SectionNode>) -> Result<Self, ProfileError> {
        if nodes.is_empty() {
            return Err(ProfileError::Empty);
        }

        let mut arena = Vec::new();
        let mut index = HashMap::new();
        for node in &nodes {
            Self::flatten(node, None, 0, &mut arena, &mut index)?;
        }

        tracing::debug!(sections = arena.len(), "section profile indexed");
        Ok(Self { arena, index })
    }

    /// Parse a YAML profile document (`sections:` at the top level)
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        let doc: ProfileDoc = serde_yaml::from_str(yaml)?;
        Self::from_nodes(doc.sections)
    }

    fn flatten(
        node: &SectionNode,
        parent: Option<usize>,
        depth: usize,
        arena: &mut Vec<SectionMeta>,
        index: &mut HashMap<String, usize>,
    ) -> Result<(), ProfileError> {
        let idx = arena.len();
        if index.insert(node.id.clone(), idx).is_some() {
            return Err(ProfileError::DuplicateSection(node.id.clone()));
        }
        arena.push(SectionMeta {
            id: node.id.clone(),
            title: node.title.clone(),
            required_level: node.required_level,
            parent,
            depth,
        });

        for child in &node.children {
            Self::flatten(child, Some(idx), depth + 1, arena, index)?;
        }
        Ok(())
    }

    /// O(1) lookup by section id
    pub fn get(&self, section_id: &str) -> Option<&SectionMeta> {
        self.index.get(section_id).map(|&i| &self.arena[i])
    }

    /// Required sign-off level for a section, if the section is configured
    pub fn required_level(&self, section_id: &str) -> Option<SignOffLevel> {
        self.get(section_id).map(|m| m.required_level)
    }

    pub fn contains(&self, section_id: &str) -> bool {
        self.index.contains_key(section_id)
    }

    /// All sections in depth-first (display) order
    pub fn iter(&self) -> impl Iterator<Item = &SectionMeta> {
        self.arena.iter()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
