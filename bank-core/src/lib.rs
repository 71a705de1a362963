//! Arinola Bank Core
//!
//! Multi-role banking ledger and authorization engine.
//!
//! # Architecture
//!
//! - **Ledger Store**: in-memory single source of truth for users, accounts,
//!   and append-only transaction histories
//! - **Authorization Guard**: explicit sessions, role-gated operations,
//!   closed role enumeration matched exhaustively
//! - **Credential Verifier**: Argon2id password secrets, AES-256-GCM
//!   narrative obscuring
//! - **Checkpointing**: every successful mutation is followed by a full-state
//!   durability checkpoint; a failed checkpoint rolls the mutation back
//!
//! # Invariants
//!
//! - Balance equals the sum of signed transaction amounts since creation
//! - A transfer appends exactly one debit and one credit, atomically
//! - Transaction records are immutable once appended
//! - Accounts and users are never deleted

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod guard;
pub mod persistence;
pub mod store;
pub mod types;

// Re-exports
pub use config::Config;
pub use engine::{BankEngine, TransferReceipt};
pub use error::{Error, Result};
pub use guard::Session;
pub use types::{
    Account, AccountId, Applied, Narrative, Role, TellerOperation, Transaction, TransactionKind,
    User, UserSummary,
};
