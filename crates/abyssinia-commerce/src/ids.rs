//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing an OrderId where a ProductId is expected.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every order reference.
pub const ORDER_REFERENCE_PREFIX: &str = "ETH-";

/// Upper bound (inclusive) of the numeric part of an order reference.
pub const ORDER_REFERENCE_MAX: u32 = 99_999;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);

impl OrderId {
    /// Generate a fresh order reference in the `ETH-<0..=99999>` format.
    pub fn generate() -> Self {
        let n = rand::thread_rng().gen_range(0..=ORDER_REFERENCE_MAX);
        Self(format!("{ORDER_REFERENCE_PREFIX}{n}"))
    }

    /// The numeric part of the reference (shown as the order badge).
    pub fn number(&self) -> Option<u32> {
        self.0.strip_prefix(ORDER_REFERENCE_PREFIX)?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("jebena-02");
        assert_eq!(id.as_str(), "jebena-02");
    }

    #[test]
    fn test_id_from_string() {
        let id: ProductId = "kemis-01".into();
        assert_eq!(id.as_str(), "kemis-01");
        assert_eq!(format!("{}", id), "kemis-01");
    }

    #[test]
    fn test_order_reference_format() {
        for _ in 0..200 {
            let id = OrderId::generate();
            assert!(id.as_str().starts_with("ETH-"));
            let n = id.number().unwrap();
            assert!(n <= ORDER_REFERENCE_MAX);
        }
    }

    #[test]
    fn test_order_reference_number_rejects_foreign_ids() {
        assert_eq!(OrderId::new("ORD-12").number(), None);
        assert_eq!(OrderId::new("ETH-abc").number(), None);
        assert_eq!(OrderId::new("ETH-4521").number(), Some(4521));
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&OrderId::new("ETH-7")).unwrap();
        assert_eq!(json, "\"ETH-7\"");
    }
}
