//! Waste categories, their bins, and the display tokens items are drawn from.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Plastic,
    Paper,
    Glass,
    Organic,
    Electronic,
    Metal,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Plastic,
        Self::Paper,
        Self::Glass,
        Self::Organic,
        Self::Electronic,
        Self::Metal,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plastic => "plastic",
            Self::Paper => "paper",
            Self::Glass => "glass",
            Self::Organic => "organic",
            Self::Electronic => "electronic",
            Self::Metal => "metal",
        }
    }

    /// Human-facing bin label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Plastic => "Plastic",
            Self::Paper => "Paper",
            Self::Glass => "Glass",
            Self::Organic => "Organic",
            Self::Electronic => "Electronic",
            Self::Metal => "Metal",
        }
    }

    /// Icon shown on the bin for this category.
    #[must_use]
    pub const fn bin_icon(self) -> &'static str {
        match self {
            Self::Plastic => "🥤",
            Self::Paper => "📰",
            Self::Glass => "🍺",
            Self::Organic => "🍎",
            Self::Electronic => "📱",
            Self::Metal => "🔧",
        }
    }

    /// Display tokens an item of this category may be rendered with.
    #[must_use]
    pub const fn tokens(self) -> &'static [&'static str; 10] {
        match self {
            Self::Plastic => &["🥤", "🍼", "🧴", "🛍️", "🥃", "🪣", "💳", "🎈", "🧸", "⚽"],
            Self::Paper => &["📰", "📄", "📦", "📃", "🗞️", "📚", "📝", "🎟️", "💌", "🏷️"],
            Self::Glass => &["🍺", "🍷", "🏺", "⚗️", "🔬", "💡", "🪟", "🍯", "🧪", "🔍"],
            Self::Organic => &["🍎", "🍌", "🥕", "🥬", "🍃", "🌰", "🥥", "🍊", "🥑", "🍇"],
            Self::Electronic => &["📱", "💻", "🔋", "💾", "📀", "🖥️", "⌚", "🎮", "📷", "🔌"],
            Self::Metal => &["🔧", "🔩", "🥤", "⚙️", "🔑", "💰", "🪙", "📎", "🧷", "⚖️"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}
