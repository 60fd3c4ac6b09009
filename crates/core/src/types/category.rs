//! Grocery item categories.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the known categories.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown item category: {0}")]
pub struct CategoryError(pub String);

/// The fixed set of categories a grocery item can belong to.
///
/// Stored and submitted as the lowercase [`as_str`](Self::as_str) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Produce,
    Deli,
    Bakery,
    Pantry,
    Frozen,
    Dairy,
    #[default]
    Other,
}

impl ItemCategory {
    /// Every category, in the order they are offered in forms.
    pub const ALL: [Self; 7] = [
        Self::Produce,
        Self::Deli,
        Self::Bakery,
        Self::Pantry,
        Self::Frozen,
        Self::Dairy,
        Self::Other,
    ];

    /// The stored/submitted value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Produce => "produce",
            Self::Deli => "deli",
            Self::Bakery => "bakery",
            Self::Pantry => "pantry",
            Self::Frozen => "frozen",
            Self::Dairy => "dairy",
            Self::Other => "other",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Produce => "Produce",
            Self::Deli => "Deli",
            Self::Bakery => "Bakery",
            Self::Pantry => "Pantry",
            Self::Frozen => "Frozen",
            Self::Dairy => "Dairy",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ItemCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CategoryError(needle.to_owned()))
    }
}
