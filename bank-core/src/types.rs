//! Core types for the banking ledger
//!
//! All types are designed for:
//! - Exact arithmetic (Decimal for money, recorded at two decimal places)
//! - Append-only transaction histories (records are immutable once appended)
//! - Closed role and kind enumerations, matched exhaustively at every guard

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{Error, Result};

/// Account identifier
///
/// Ordered so that two accounts can always be locked in a total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh account ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User role
///
/// Closed enumeration: guard sites match on it exhaustively, there is no
/// free-form role string anywhere past the parse boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Holds a monetary account; may transfer to other clients
    Client,
    /// Posts deposits and withdrawals on behalf of customers
    Employee,
    /// Manages roles and sees the user list
    Admin,
}

impl Role {
    /// Role name as stored and displayed
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Employee => "employee",
            Role::Admin => "admin",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "client" => Some(Role::Client),
            "employee" => Some(Role::Employee),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique, immutable key
    pub username: String,

    /// Credential secret derived from the password and salt
    #[serde(with = "b64")]
    pub secret: Vec<u8>,

    /// Salt the secret was derived with
    #[serde(with = "b64")]
    pub salt: Vec<u8>,

    /// Current role (mutable by admin action)
    pub role: Role,

    /// Paired account; present iff the user registered as a client.
    /// A later role change never retracts it.
    pub account_id: Option<AccountId>,
}

/// Signed direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Adds to the balance
    Credit,
    /// Subtracts from the balance
    Debit,
}

impl TransactionKind {
    /// Kind name as stored and displayed
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Teller-side operation posted by an employee for a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TellerOperation {
    /// Credits the customer's account
    Deposit,
    /// Debits the customer's account (sufficiency checked first)
    Withdrawal,
}

impl TellerOperation {
    /// Parse from string; anything outside the two defined kinds is rejected
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(TellerOperation::Deposit),
            "withdrawal" => Ok(TellerOperation::Withdrawal),
            other => Err(Error::InvalidTransactionKind(other.to_string())),
        }
    }

    /// Ledger entry direction this operation maps to
    pub fn kind(&self) -> TransactionKind {
        match self {
            TellerOperation::Deposit => TransactionKind::Credit,
            TellerOperation::Withdrawal => TransactionKind::Debit,
        }
    }

    /// Operation name used to prefix the narrative
    pub fn as_str(&self) -> &'static str {
        match self {
            TellerOperation::Deposit => "deposit",
            TellerOperation::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for TellerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Free-text transaction description, kept in both plain and obscured form
///
/// The plaintext copy is the record of truth for display; the obscured copy
/// is a supplementary field sealed with the session-held cipher key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Narrative {
    /// Plaintext description
    pub plain: String,
    /// Base64-encoded sealed copy (nonce || ciphertext)
    pub obscured: String,
}

impl Narrative {
    /// Pair a plaintext description with its sealed copy
    pub fn new(plain: impl Into<String>, obscured: String) -> Self {
        Self {
            plain: plain.into().trim().to_string(),
            obscured,
        }
    }
}

/// A ledger entry, immutable once appended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique entry ID
    pub id: Uuid,

    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,

    /// Positive amount, rounded to two decimal places
    pub amount: Decimal,

    /// Signed direction
    pub kind: TransactionKind,

    /// Description in plain and obscured form
    pub narrative: Narrative,
}

/// Outcome of the low-level append primitive
#[derive(Debug, Clone, Copy)]
pub struct Applied {
    /// ID of the appended transaction
    pub transaction_id: Uuid,

    /// Balance after the entry was applied
    pub balance: Decimal,

    /// A debit drove the balance negative. The entry is still recorded;
    /// callers that must enforce sufficiency check before applying.
    pub overdrawn: bool,
}

/// A monetary account with its append-only transaction history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique account ID
    pub id: AccountId,

    /// Username of the owning user
    pub owner: String,

    /// Sum of signed transaction amounts applied since creation
    pub balance: Decimal,

    /// Append-only history
    pub transactions: Vec<Transaction>,
}

impl Account {
    /// Create a zero-balance account for `owner`
    pub fn new(id: AccountId, owner: impl Into<String>) -> Self {
        Self {
            id,
            owner: owner.into(),
            balance: Decimal::ZERO,
            transactions: Vec::new(),
        }
    }

    /// Append a ledger entry and update the balance
    ///
    /// This is the low-level, non-validating building block: a debit that
    /// drives the balance negative is recorded and signalled through
    /// [`Applied::overdrawn`], never rejected here. Business validation
    /// (transfer sufficiency, withdrawal sufficiency) lives with the caller.
    pub fn apply(&mut self, amount: Decimal, kind: TransactionKind, narrative: Narrative) -> Applied {
        let amount = amount.round_dp(2);
        let transaction = Transaction {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            amount,
            kind,
            narrative,
        };
        let transaction_id = transaction.id;
        self.transactions.push(transaction);

        match kind {
            TransactionKind::Credit => self.balance += amount,
            TransactionKind::Debit => self.balance -= amount,
        }

        Applied {
            transaction_id,
            balance: self.balance,
            overdrawn: kind == TransactionKind::Debit && self.balance < Decimal::ZERO,
        }
    }

    /// Remove a previously applied entry and reverse its balance effect
    ///
    /// Used only to undo an in-memory mutation whose durability checkpoint
    /// failed. Returns false if the entry is not present.
    pub(crate) fn revert(&mut self, transaction_id: Uuid) -> bool {
        let Some(pos) = self
            .transactions
            .iter()
            .rposition(|t| t.id == transaction_id)
        else {
            return false;
        };
        let transaction = self.transactions.remove(pos);
        match transaction.kind {
            TransactionKind::Credit => self.balance -= transaction.amount,
            TransactionKind::Debit => self.balance += transaction.amount,
        }
        true
    }
}

/// Read-only projection of a user, returned by the admin listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// Username
    pub username: String,
    /// Current role
    pub role: Role,
    /// Whether the user holds an account
    pub has_account: bool,
}

/// Base64 serde helper for opaque byte fields
pub(crate) mod b64 {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narrative(text: &str) -> Narrative {
        Narrative::new(text, String::new())
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("client"), Some(Role::Client));
        assert_eq!(Role::parse(" Employee "), Some(Role::Employee));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn test_teller_operation_parse() {
        assert_eq!(TellerOperation::parse("deposit").unwrap(), TellerOperation::Deposit);
        assert_eq!(
            TellerOperation::parse("Withdrawal").unwrap(),
            TellerOperation::Withdrawal
        );
        assert!(matches!(
            TellerOperation::parse("loan"),
            Err(Error::InvalidTransactionKind(_))
        ));
    }

    #[test]
    fn test_apply_credit_and_debit() {
        let mut account = Account::new(AccountId::generate(), "alice");

        let applied = account.apply(Decimal::new(10000, 2), TransactionKind::Credit, narrative("pay"));
        assert_eq!(applied.balance, Decimal::new(10000, 2));
        assert!(!applied.overdrawn);

        let applied = account.apply(Decimal::new(4000, 2), TransactionKind::Debit, narrative("rent"));
        assert_eq!(applied.balance, Decimal::new(6000, 2));
        assert!(!applied.overdrawn);
        assert_eq!(account.transactions.len(), 2);
    }

    #[test]
    fn test_apply_rounds_to_two_decimals() {
        let mut account = Account::new(AccountId::generate(), "alice");
        let applied = account.apply(
            Decimal::new(10005, 3), // 10.005
            TransactionKind::Credit,
            narrative("x"),
        );
        assert_eq!(applied.balance, Decimal::new(1000, 2)); // banker's rounding: 10.00
        assert_eq!(account.transactions[0].amount, Decimal::new(1000, 2));
    }

    #[test]
    fn test_overdraft_recorded_and_signalled() {
        let mut account = Account::new(AccountId::generate(), "alice");
        let applied = account.apply(Decimal::new(500, 2), TransactionKind::Debit, narrative("x"));

        // The permissive primitive records the entry and signals the overdraft
        assert!(applied.overdrawn);
        assert_eq!(applied.balance, Decimal::new(-500, 2));
        assert_eq!(account.transactions.len(), 1);
    }

    #[test]
    fn test_revert_restores_balance_and_history() {
        let mut account = Account::new(AccountId::generate(), "alice");
        account.apply(Decimal::new(10000, 2), TransactionKind::Credit, narrative("a"));
        let applied = account.apply(Decimal::new(3000, 2), TransactionKind::Debit, narrative("b"));

        assert!(account.revert(applied.transaction_id));
        assert_eq!(account.balance, Decimal::new(10000, 2));
        assert_eq!(account.transactions.len(), 1);

        // Unknown ID is a no-op
        assert!(!account.revert(Uuid::new_v4()));
    }
}
