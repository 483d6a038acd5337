//! Keyed Row Collections
//!
//! One generic list editor for every repeated-row questionnaire field
//! (related parties, team members, identified risks, ...). Writes replace
//! whole rows rather than mutating them in place, so a stored row is only
//! ever swapped for a new value.

use serde::{Deserialize, Serialize};

/// A row addressable by a stable string id
pub trait KeyedRow {
    fn row_id(&self) -> &str;
}

/// Ordered collection of keyed rows.
///
/// Serializes transparently as a plain JSON array, so it drops into the
/// form-data shape unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowSet<T> {
    rows: Vec<T>,
}

impl<T> Default for RowSet<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: KeyedRow> RowSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<T>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.rows.iter().find(|r| r.row_id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.iter()
    }

    /// Insert a row, replacing any existing row with the same id.
    /// Returns true when a row was replaced.
    pub fn upsert(&mut self, row: T) -> bool {
        match self.position(row.row_id()) {
            Some(pos) => {
                self.rows[pos] = row;
                true
            }
            None => {
                self.rows.push(row);
                false
            }
        }
    }

    /// Replace the row with the given id by a new value derived from it.
    /// Returns false when no such row exists.
    pub fn update(&mut self, id: &str, f: impl FnOnce(&T) -> T) -> bool {
        match self.position(id) {
            Some(pos) => {
                let replacement = f(&self.rows[pos]);
                self.rows[pos] = replacement;
                true
            }
            None => false,
        }
    }

    /// Remove and return the row with the given id
    pub fn remove(&mut self, id: &str) -> Option<T> {
        self.position(id).map(|pos| self.rows.remove(pos))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.row_id() == id)
    }
}
