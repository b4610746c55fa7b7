//! Shared-secret gate for the merchant area.
//!
//! This is a UI convenience, not a security boundary: there is no lockout,
//! no backoff and the secret is held in plain text.

use crate::AuthError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// PIN used when none is configured.
pub const DEFAULT_MERCHANT_PIN: &str = "1234";

/// Whether the merchant area is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GateState {
    #[default]
    Locked,
    Unlocked,
}

/// A PIN gate that stays open for the rest of the session once unlocked.
#[derive(Debug, Clone)]
pub struct AccessGate {
    secret: String,
    state: GateState,
    last_attempt_incorrect: bool,
}

impl AccessGate {
    /// Create a locked gate for the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            state: GateState::Locked,
            last_attempt_incorrect: false,
        }
    }

    /// Try to unlock with `attempt`.
    ///
    /// A correct secret unlocks the gate and clears the incorrect flag. A
    /// wrong one leaves the state as it was and raises the flag. Once
    /// unlocked, later attempts never lock the gate again.
    pub fn authorize(&mut self, attempt: &str) -> bool {
        if constant_time_compare(attempt.as_bytes(), self.secret.as_bytes()) {
            if self.state == GateState::Locked {
                info!("merchant area unlocked");
            }
            self.state = GateState::Unlocked;
            self.last_attempt_incorrect = false;
            true
        } else {
            debug!("incorrect merchant PIN");
            self.last_attempt_incorrect = true;
            false
        }
    }

    /// Like [`authorize`](Self::authorize), as a `Result`.
    pub fn unlock(&mut self, attempt: &str) -> Result<(), AuthError> {
        if self.authorize(attempt) {
            Ok(())
        } else {
            Err(AuthError::IncorrectSecret)
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    /// Whether the most recent attempt was wrong, for the error hint.
    pub fn last_attempt_incorrect(&self) -> bool {
        self.last_attempt_incorrect
    }

    /// Fail with [`AuthError::Locked`] unless unlocked.
    pub fn require_unlocked(&self) -> Result<(), AuthError> {
        if self.is_unlocked() {
            Ok(())
        } else {
            Err(AuthError::Locked)
        }
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(DEFAULT_MERCHANT_PIN)
    }
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
