//! Payment methods.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instructions shown when the customer pays by bank transfer.
pub const BANK_TRANSFER_INSTRUCTIONS: &str = "Transfer the order total to Commercial Bank of \
Ethiopia, account 1000-2345-6789 (Abyssinia Direct PLC), SWIFT CBETETAA. Use your order \
reference as the payment reference. Orders ship once the transfer clears.";

/// How the customer intends to pay. No payment data is collected or kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    BankTransfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Card, PaymentMethod::BankTransfer];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit / Debit Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }

    /// Extra text to show for this method, if any.
    pub fn instructions(&self) -> Option<&'static str> {
        match self {
            PaymentMethod::Card => None,
            PaymentMethod::BankTransfer => Some(BANK_TRANSFER_INSTRUCTIONS),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Card).unwrap(), "\"card\"");
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"bank_transfer\""
        );
    }

    #[test]
    fn test_only_bank_transfer_has_instructions() {
        assert!(PaymentMethod::Card.instructions().is_none());
        assert_eq!(
            PaymentMethod::BankTransfer.instructions(),
            Some(BANK_TRANSFER_INSTRUCTIONS)
        );
    }
}
