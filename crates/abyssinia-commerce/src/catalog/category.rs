//! Product categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Clothes,
    Art,
    #[serde(rename = "Miscellaneous Products")]
    Miscellaneous,
    Accessories,
}

impl Category {
    /// All categories in navigation order.
    pub const ALL: [Category; 4] = [
        Category::Clothes,
        Category::Art,
        Category::Miscellaneous,
        Category::Accessories,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Clothes => "Clothes",
            Category::Art => "Art",
            Category::Miscellaneous => "Miscellaneous Products",
            Category::Accessories => "Accessories",
        }
    }

    /// Parse a category from a slug or display name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "clothes" => Some(Category::Clothes),
            "art" => Some(Category::Art),
            "misc" | "miscellaneous" | "miscellaneous products" => Some(Category::Miscellaneous),
            "accessories" => Some(Category::Accessories),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("Art"), Some(Category::Art));
        assert_eq!(Category::parse("misc"), Some(Category::Miscellaneous));
        assert_eq!(
            Category::parse("Miscellaneous Products"),
            Some(Category::Miscellaneous)
        );
        assert_eq!(Category::parse("all"), None);
    }

    #[test]
    fn test_category_serializes_display_name() {
        let json = serde_json::to_string(&Category::Miscellaneous).unwrap();
        assert_eq!(json, "\"Miscellaneous Products\"");
    }
}
