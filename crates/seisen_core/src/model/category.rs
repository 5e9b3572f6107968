//! Note category model.
//!
//! # Responsibility
//! - Define the fixed set of note categories and their stable ids.
//! - Own built-in sample content used to seed a fresh notes folder.
//!
//! # Invariants
//! - Every category maps 1:1 to exactly one backing file `<id>.txt`.
//! - Category ids are stable; they double as file stems on disk.
//! - Sample texts are non-empty and newline-separated without trailing newline.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One of the fixed note categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "sensei_notes")]
    Sensei,
    #[serde(rename = "samurai")]
    Samurai,
    #[serde(rename = "zen")]
    Zen,
    #[serde(rename = "42")]
    FortyTwo,
    #[serde(rename = "life")]
    Life,
    #[serde(rename = "custom")]
    Custom,
}

const ALL_CATEGORIES: [Category; 6] = [
    Category::Sensei,
    Category::Samurai,
    Category::Zen,
    Category::FortyTwo,
    Category::Life,
    Category::Custom,
];

impl Category {
    /// Category shown on first launch.
    pub const DEFAULT: Category = Category::Sensei;

    /// All categories in display order.
    pub fn all() -> &'static [Category] {
        &ALL_CATEGORIES
    }

    /// Stable id used as file stem and wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sensei => "sensei_notes",
            Self::Samurai => "samurai",
            Self::Zen => "zen",
            Self::FortyTwo => "42",
            Self::Life => "life",
            Self::Custom => "custom",
        }
    }

    /// User-facing short label.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Sensei => "Sensei",
            Self::Samurai => "Samurai",
            Self::Zen => "Zen",
            Self::FortyTwo => "42",
            Self::Life => "Vie",
            Self::Custom => "Perso",
        }
    }

    /// Backing file name inside the notes folder.
    pub fn file_name(self) -> String {
        format!("{}.txt", self.as_str())
    }

    /// Built-in content written when the backing file does not exist yet.
    pub fn sample_text(self) -> &'static str {
        match self {
            Self::Sensei => "Respire profondément.\nContinue.\nTu vas réussir.",
            Self::Samurai => {
                "La maîtrise vient de la discipline.\nAvance même blessé.\nLe doute est l'ennemi du sabre."
            }
            Self::Zen => "Respire.\nReviens au présent.\nLe calme est une force.",
            Self::FortyTwo => "Lis le man.\nApprivoise la mémoire.\nLe code vrai est humble.",
            Self::Life => "Bois de l'eau.\nAppelle quelqu’un que tu aimes.\nRange ton esprit.",
            Self::Custom => "Écris ta propre voie.",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// Identifier is outside the fixed category set.
    UnknownCategory(String),
}

impl Display for CategoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCategory(value) => write!(f, "unknown category: `{value}`"),
        }
    }
}

impl Error for CategoryError {}

/// Parses one category from its stable id.
///
/// Surrounding whitespace is ignored; matching is exact otherwise.
pub fn parse_category(value: &str) -> Result<Category, CategoryError> {
    let normalized = value.trim();
    ALL_CATEGORIES
        .iter()
        .copied()
        .find(|category| category.as_str() == normalized)
        .ok_or_else(|| CategoryError::UnknownCategory(normalized.to_string()))
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category(s)
    }
}
