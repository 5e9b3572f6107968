//! In-memory note set and session display types.
//!
//! # Invariants
//! - A `NoteSet` is immutable once built; reloads replace it wholesale.
//! - Every note in a `NoteSet` is non-empty after trimming.

use crate::model::category::Category;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Ordered notes loaded for one category.
///
/// Cloning is cheap: the backing slice is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSet {
    category: Category,
    notes: Arc<[String]>,
}

impl NoteSet {
    /// Builds a set from already-normalized lines, dropping blank entries.
    pub fn new(category: Category, notes: impl IntoIterator<Item = String>) -> Self {
        let notes = notes
            .into_iter()
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty())
            .collect::<Vec<_>>();
        Self {
            category,
            notes: notes.into(),
        }
    }

    /// Empty set used when storage is unavailable.
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            notes: Vec::<String>::new().into(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.notes.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.notes.iter().map(String::as_str)
    }

    /// Number of entries equal to `note`.
    pub fn count_of(&self, note: &str) -> usize {
        self.iter().filter(|candidate| *candidate == note).count()
    }
}

/// Light/dark presentation flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Label shown on the theme toggle.
    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Mode Zen",
            Self::Dark => "Mode Samurai",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteSet, Theme};
    use crate::model::category::Category;

    #[test]
    fn note_set_drops_blank_lines_and_keeps_order() {
        let set = NoteSet::new(
            Category::Zen,
            ["  a ", "", "   ", "b", "a"].into_iter().map(String::from),
        );
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "b", "a"]);
        assert_eq!(set.count_of("a"), 2);
        assert_eq!(set.category(), Category::Zen);
    }

    #[test]
    fn theme_toggle_round_trips() {
        assert!(Theme::Light.toggled().is_dark());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
