//! Error types for the banking engine

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any state mutation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Username already taken
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// No user with this username
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Password verification failed
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Caller is not logged in or holds the wrong role
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Transfer recipient does not exist
    #[error("Recipient not found: {0}")]
    RecipientNotFound(String),

    /// Teller operation target does not exist
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// User exists but holds no account
    #[error("No account for user: {0}")]
    NoAccount(String),

    /// Balance check failed before mutation
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount the caller asked to move
        requested: Decimal,
        /// Balance actually available
        available: Decimal,
    },

    /// Transaction kind string is not one of the defined kinds
    #[error("Invalid transaction kind: {0}")]
    InvalidTransactionKind(String),

    /// Key derivation or narrative cipher failure
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Durability checkpoint failure; the triggering mutation was rolled back
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InsufficientFunds {
            requested: Decimal::new(10000, 2),
            available: Decimal::new(500, 2),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: requested 100.00, available 5.00"
        );

        let err = Error::Unauthorized("not logged in".to_string());
        assert_eq!(err.to_string(), "Unauthorized: not logged in");
    }
}
