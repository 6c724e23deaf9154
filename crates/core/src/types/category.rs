//! Product category type.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown category name.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// Product category.
///
/// The catalog uses a closed set of categories; anything else is rejected at
/// the edge rather than stored as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Home,
    Furniture,
    Sports,
    Fashion,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 5] = [
        Self::Electronics,
        Self::Home,
        Self::Furniture,
        Self::Sports,
        Self::Fashion,
    ];

    /// The category name as stored and served.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Home => "Home",
            Self::Furniture => "Furniture",
            Self::Sports => "Sports",
            Self::Fashion => "Fashion",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Electronics" => Ok(Self::Electronics),
            "Home" => Ok(Self::Home),
            "Furniture" => Ok(Self::Furniture),
            "Sports" => Ok(Self::Sports),
            "Fashion" => Ok(Self::Fashion),
            other => Err(CategoryError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_unknown_rejected() {
        assert!("Groceries".parse::<Category>().is_err());
        // Case matters: the closed set is stored capitalized.
        assert!("electronics".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&Category::Electronics).unwrap();
        assert_eq!(json, "\"Electronics\"");
    }
}
