//! Shipping details form.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Contact and delivery details collected in the first checkout step.
///
/// Every field is required. Values are only checked for being non-blank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Street address.
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingDetails {
    /// Field names in form order, as used in validation errors.
    pub const FIELD_NAMES: [&'static str; 8] = [
        "firstName",
        "lastName",
        "email",
        "phone",
        "address",
        "city",
        "postalCode",
        "country",
    ];

    fn values(&self) -> [&str; 8] {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.address,
            &self.city,
            &self.postal_code,
            &self.country,
        ]
    }

    /// Names of the fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        Self::FIELD_NAMES
            .iter()
            .zip(self.values())
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Check that every field is filled in.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::Validation(missing))
        }
    }

    /// Get full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Single-line delivery address.
    pub fn one_line_address(&self) -> String {
        format!(
            "{}, {} {}, {}",
            self.address, self.postal_code, self.city, self.country
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::fixtures::shipping_details as complete;

    #[test]
    fn test_complete_details_validate() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn test_blank_fields_reported_in_form_order() {
        let mut details = complete();
        details.email = "   ".into();
        details.country.clear();

        assert_eq!(details.missing_fields(), vec!["email", "country"]);
        match details.validate() {
            Err(CommerceError::Validation(fields)) => assert_eq!(fields, vec!["email", "country"]),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(complete()).unwrap();
        assert_eq!(json["firstName"], "Abebe");
        assert_eq!(json["postalCode"], "1000");
    }
}
