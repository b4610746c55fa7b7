//! Access errors.

use abyssinia_commerce::error::PersistenceError;
use thiserror::Error;

/// Access error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The entered PIN was wrong.
    #[error("incorrect PIN")]
    IncorrectSecret,

    /// The merchant area was used before unlocking.
    #[error("merchant area is locked")]
    Locked,

    /// Reading or clearing the order history failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AuthError::IncorrectSecret | AuthError::Locked)
    }
}
