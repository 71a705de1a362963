//! Banking engine orchestration layer
//!
//! Composes the ledger store, credential verifier, narrative cipher, and
//! snapshot store into the role-gated operations: register, login, transfer,
//! teller processing, and role administration.
//!
//! Every successful mutation is followed by a durability checkpoint. When the
//! checkpoint fails the in-memory effect is rolled back, so callers never
//! observe state the snapshot store has not accepted.
//!
//! # Example
//!
//! ```no_run
//! use bank_core::{BankEngine, Config, Role};
//!
//! fn main() -> bank_core::Result<()> {
//!     let engine = BankEngine::open(Config::default())?;
//!     engine.register("alice", "pw1", Role::Client)?;
//!     let session = engine.login("alice", "pw1")?;
//!     println!("balance: {}", engine.balance(Some(&session))?);
//!     Ok(())
//! }
//! ```

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    crypto::{CredentialVerifier, NarrativeCipher},
    guard::{self, Session},
    persistence::{JsonSnapshotStore, SnapshotStore},
    store::{AccountHandle, LedgerStore},
    types::{
        AccountId, Applied, Narrative, Role, TellerOperation, Transaction, TransactionKind, User,
        UserSummary,
    },
    Config, Error, Result,
};

/// Outcome of a successful transfer
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    /// Debit entry appended to the sender's account
    pub debit_id: Uuid,

    /// Credit entry appended to the recipient's account
    pub credit_id: Uuid,

    /// Sender balance after the transfer
    pub sender_balance: Decimal,
}

/// Main engine interface
pub struct BankEngine {
    store: LedgerStore,
    verifier: CredentialVerifier,
    cipher: NarrativeCipher,
    snapshots: Arc<dyn SnapshotStore>,
}

impl BankEngine {
    /// Build an engine over an explicit snapshot store, loading any prior
    /// snapshot it holds
    pub fn new(config: &Config, snapshots: Arc<dyn SnapshotStore>) -> Result<Self> {
        let store = match snapshots.load()? {
            Some(snapshot) => LedgerStore::from_snapshot(snapshot),
            None => LedgerStore::new(),
        };

        Ok(Self {
            store,
            verifier: CredentialVerifier::new(&config.kdf)?,
            cipher: NarrativeCipher::new(),
            snapshots,
        })
    }

    /// Open an engine backed by the JSON snapshot file from `config`
    pub fn open(config: Config) -> Result<Self> {
        let snapshots = Arc::new(JsonSnapshotStore::new(&config.snapshot_path));
        Self::new(&config, snapshots)
    }

    // Authentication

    /// Register a new user
    ///
    /// A client registration also creates a paired zero-balance account;
    /// employee and admin registrations do not.
    pub fn register(&self, username: &str, password: &str, role: Role) -> Result<()> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput(
                "username and password are required".to_string(),
            ));
        }
        if self.store.get_user(username).is_some() {
            warn!(operation = "register", actor = username, outcome = "duplicate username");
            return Err(Error::DuplicateUsername(username.to_string()));
        }

        let (secret, salt) = self.verifier.derive_secret(password, None)?;

        let account_id = match role {
            Role::Client => Some(self.store.create_account(username)),
            Role::Employee | Role::Admin => None,
        };

        let user = User {
            username: username.to_string(),
            secret,
            salt,
            role,
            account_id,
        };

        if let Err(e) = self.store.create_user(user) {
            // Lost a race with a concurrent registration of the same name
            if let Some(id) = account_id {
                self.store.remove_account(id);
            }
            return Err(e);
        }

        if let Err(e) = self.checkpoint() {
            self.store.remove_user(username);
            if let Some(id) = account_id {
                self.store.remove_account(id);
            }
            warn!(operation = "register", actor = username, outcome = "checkpoint failed, rolled back");
            return Err(e);
        }

        info!(operation = "register", actor = username, role = %role, outcome = "ok");
        Ok(())
    }

    /// Authenticate and create a session
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        let user = self
            .store
            .get_user(username)
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;

        if !self.verifier.verify(password, &user.salt, &user.secret)? {
            warn!(operation = "login", actor = username, outcome = "invalid credentials");
            return Err(Error::InvalidCredentials);
        }

        info!(operation = "login", actor = username, role = %user.role, outcome = "ok");
        Ok(Session::new(user.username, user.role))
    }

    /// End a session
    pub fn logout(&self, session: Session) {
        info!(operation = "logout", actor = session.username(), outcome = "ok");
    }

    // Client operations

    /// Current balance of the logged-in client's account
    pub fn balance(&self, session: Option<&Session>) -> Result<Decimal> {
        let session = guard::require_role(session, Role::Client)?;
        let (_, account) = self.account_of(session.username())?;
        let balance = account.lock().balance;
        Ok(balance)
    }

    /// Transaction history of the logged-in client's account
    pub fn transactions(&self, session: Option<&Session>) -> Result<Vec<Transaction>> {
        let session = guard::require_role(session, Role::Client)?;
        let (_, account) = self.account_of(session.username())?;
        let transactions = account.lock().transactions.clone();
        Ok(transactions)
    }

    /// Transfer money from the logged-in client to another client
    ///
    /// The sufficiency check and both ledger appends happen while holding the
    /// locks of both accounts, acquired in account-ID order, so concurrent
    /// readers never observe the debit without the credit and reciprocal
    /// transfers cannot deadlock.
    pub fn transfer(
        &self,
        session: Option<&Session>,
        recipient: &str,
        amount: Decimal,
        narrative: &str,
    ) -> Result<TransferReceipt> {
        let session = guard::require_role(session, Role::Client)?;
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidInput("transfer amount must be positive".to_string()));
        }

        let recipient_user = self
            .store
            .get_user(recipient)
            .ok_or_else(|| Error::RecipientNotFound(recipient.to_string()))?;
        let (sender_id, sender_account) = self.account_of(session.username())?;
        let recipient_id = recipient_user
            .account_id
            .ok_or_else(|| Error::NoAccount(recipient.to_string()))?;
        let recipient_account = self
            .store
            .get_account(recipient_id)
            .ok_or_else(|| Error::NoAccount(recipient.to_string()))?;

        // Obscured once; both entries carry the identical narrative pair
        let narrative = Narrative::new(narrative, self.cipher.obscure(narrative)?);

        let (debit, credit) = self.apply_pair(
            sender_id,
            &sender_account,
            recipient_id,
            &recipient_account,
            amount,
            narrative,
        )?;

        if let Err(e) = self.checkpoint() {
            self.revert_pair(
                (&sender_account, debit.transaction_id),
                (&recipient_account, credit.transaction_id),
            );
            warn!(
                operation = "transfer",
                actor = session.username(),
                recipient = recipient,
                outcome = "checkpoint failed, rolled back"
            );
            return Err(e);
        }

        info!(
            operation = "transfer",
            actor = session.username(),
            recipient = recipient,
            amount = %amount,
            outcome = "ok"
        );

        Ok(TransferReceipt {
            debit_id: debit.transaction_id,
            credit_id: credit.transaction_id,
            sender_balance: debit.balance,
        })
    }

    // Employee operations

    /// Post a deposit or withdrawal on behalf of a customer
    pub fn process_transaction(
        &self,
        session: Option<&Session>,
        customer: &str,
        amount: Decimal,
        operation: TellerOperation,
        narrative: &str,
    ) -> Result<Applied> {
        let session = guard::require_role(session, Role::Employee)?;
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidInput("amount must be positive".to_string()));
        }

        let customer_user = self
            .store
            .get_user(customer)
            .ok_or_else(|| Error::CustomerNotFound(customer.to_string()))?;
        let account_id = customer_user
            .account_id
            .ok_or_else(|| Error::NoAccount(customer.to_string()))?;
        let account = self
            .store
            .get_account(account_id)
            .ok_or_else(|| Error::NoAccount(customer.to_string()))?;

        let text = format!("{}: {}", operation, narrative.trim());
        let narrative = Narrative::new(&text, self.cipher.obscure(&text)?);

        let applied = {
            let mut account = account.lock();
            if operation == TellerOperation::Withdrawal && account.balance < amount {
                warn!(
                    operation = "process_transaction",
                    actor = session.username(),
                    customer = customer,
                    outcome = "insufficient funds"
                );
                return Err(Error::InsufficientFunds {
                    requested: amount,
                    available: account.balance,
                });
            }
            account.apply(amount, operation.kind(), narrative)
        };

        if let Err(e) = self.checkpoint() {
            account.lock().revert(applied.transaction_id);
            warn!(
                operation = "process_transaction",
                actor = session.username(),
                customer = customer,
                outcome = "checkpoint failed, rolled back"
            );
            return Err(e);
        }

        info!(
            operation = "process_transaction",
            actor = session.username(),
            customer = customer,
            kind = %operation,
            amount = %amount,
            outcome = "ok"
        );
        Ok(applied)
    }

    // Admin operations

    /// Change a user's role in place
    ///
    /// An account created at registration persists regardless of later role
    /// changes; this never creates or removes one.
    pub fn change_user_role(
        &self,
        session: Option<&Session>,
        target: &str,
        new_role: Role,
    ) -> Result<()> {
        let session = guard::require_role(session, Role::Admin)?;

        let previous = self.store.set_role(target, new_role)?;

        if let Err(e) = self.checkpoint() {
            // Restore; the user cannot have vanished since users are never deleted
            let _ = self.store.set_role(target, previous);
            warn!(
                operation = "change_user_role",
                actor = session.username(),
                target = target,
                outcome = "checkpoint failed, rolled back"
            );
            return Err(e);
        }

        info!(
            operation = "change_user_role",
            actor = session.username(),
            target = target,
            from = %previous,
            to = %new_role,
            outcome = "ok"
        );
        Ok(())
    }

    /// Read-only projection of every user
    pub fn list_users(&self, session: Option<&Session>) -> Result<Vec<UserSummary>> {
        let session = guard::require_role(session, Role::Admin)?;
        let summaries = self.store.list_users();
        info!(operation = "list_users", actor = session.username(), count = summaries.len());
        Ok(summaries)
    }

    // Internals

    /// Resolve the account paired with `username`
    fn account_of(&self, username: &str) -> Result<(AccountId, AccountHandle)> {
        let user = self
            .store
            .get_user(username)
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;
        let id = user
            .account_id
            .ok_or_else(|| Error::NoAccount(username.to_string()))?;
        let account = self
            .store
            .get_account(id)
            .ok_or_else(|| Error::NoAccount(username.to_string()))?;
        Ok((id, account))
    }

    /// Debit sender and credit recipient as one critical section
    ///
    /// Locks are taken in account-ID order; both appends complete before
    /// either lock is released. Sufficiency is checked under the sender lock,
    /// strictly before any mutation.
    fn apply_pair(
        &self,
        sender_id: AccountId,
        sender: &AccountHandle,
        recipient_id: AccountId,
        recipient: &AccountHandle,
        amount: Decimal,
        narrative: Narrative,
    ) -> Result<(Applied, Applied)> {
        if sender_id == recipient_id {
            // Self-transfer: one lock, debit then credit on the same log
            let mut account = sender.lock();
            if account.balance < amount {
                return Err(Error::InsufficientFunds {
                    requested: amount,
                    available: account.balance,
                });
            }
            let debit = account.apply(amount, TransactionKind::Debit, narrative.clone());
            let credit = account.apply(amount, TransactionKind::Credit, narrative);
            return Ok((debit, credit));
        }

        let (mut sender_guard, mut recipient_guard) = if sender_id < recipient_id {
            let s = sender.lock();
            let r = recipient.lock();
            (s, r)
        } else {
            let r = recipient.lock();
            let s = sender.lock();
            (s, r)
        };

        if sender_guard.balance < amount {
            warn!(
                operation = "transfer",
                actor = %sender_guard.owner,
                outcome = "insufficient funds"
            );
            return Err(Error::InsufficientFunds {
                requested: amount,
                available: sender_guard.balance,
            });
        }

        let debit = sender_guard.apply(amount, TransactionKind::Debit, narrative.clone());
        let credit = recipient_guard.apply(amount, TransactionKind::Credit, narrative);
        Ok((debit, credit))
    }

    /// Undo both halves of a transfer whose checkpoint failed
    fn revert_pair(&self, debit: (&AccountHandle, Uuid), credit: (&AccountHandle, Uuid)) {
        let (sender, debit_id) = debit;
        let (recipient, credit_id) = credit;
        sender.lock().revert(debit_id);
        if !Arc::ptr_eq(sender, recipient) {
            recipient.lock().revert(credit_id);
        } else {
            sender.lock().revert(credit_id);
        }
    }

    /// Durability checkpoint: clone the full state and hand it to the store
    fn checkpoint(&self) -> Result<()> {
        let snapshot = self.store.snapshot();
        self.snapshots.save(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KdfConfig;
    use crate::persistence::MemorySnapshotStore;

    fn test_config() -> Config {
        Config {
            kdf: KdfConfig {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            },
            ..Config::default()
        }
    }

    fn test_engine() -> (BankEngine, Arc<MemorySnapshotStore>) {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let engine = BankEngine::new(&test_config(), snapshots.clone()).unwrap();
        (engine, snapshots)
    }

    #[test]
    fn test_register_client_creates_account() {
        let (engine, snapshots) = test_engine();
        engine.register("alice", "pw1", Role::Client).unwrap();

        let snapshot = snapshots.last().unwrap();
        let alice = &snapshot.users["alice"];
        assert_eq!(alice.role, Role::Client);
        let account_id = alice.account_id.unwrap();
        assert_eq!(snapshot.accounts[&account_id].balance, Decimal::ZERO);
    }

    #[test]
    fn test_register_employee_has_no_account() {
        let (engine, snapshots) = test_engine();
        engine.register("carol", "pw", Role::Employee).unwrap();

        let snapshot = snapshots.last().unwrap();
        assert!(snapshot.users["carol"].account_id.is_none());
        assert!(snapshot.accounts.is_empty());
    }

    #[test]
    fn test_register_rejects_empty_input() {
        let (engine, _) = test_engine();
        assert!(matches!(
            engine.register("", "pw", Role::Client),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            engine.register("alice", "", Role::Client),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let (engine, _) = test_engine();
        engine.register("alice", "pw1", Role::Client).unwrap();
        assert!(matches!(
            engine.register("alice", "pw2", Role::Client),
            Err(Error::DuplicateUsername(_))
        ));
    }

    #[test]
    fn test_login() {
        let (engine, _) = test_engine();
        engine.register("alice", "pw1", Role::Client).unwrap();

        let session = engine.login("alice", "pw1").unwrap();
        assert_eq!(session.username(), "alice");
        assert_eq!(session.role(), Role::Client);

        assert!(matches!(
            engine.login("alice", "wrong"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            engine.login("nobody", "pw"),
            Err(Error::UserNotFound(_))
        ));
    }

    #[test]
    fn test_balance_requires_client_role() {
        let (engine, _) = test_engine();
        engine.register("carol", "pw", Role::Employee).unwrap();
        let session = engine.login("carol", "pw").unwrap();

        assert!(matches!(
            engine.balance(Some(&session)),
            Err(Error::Unauthorized(_))
        ));
        assert!(matches!(engine.balance(None), Err(Error::Unauthorized(_))));
    }

    #[test]
    fn test_deposit_then_transfer() {
        let (engine, _) = test_engine();
        engine.register("alice", "pw1", Role::Client).unwrap();
        engine.register("bob", "pw2", Role::Client).unwrap();
        engine.register("carol", "pw3", Role::Employee).unwrap();

        let teller = engine.login("carol", "pw3").unwrap();
        engine
            .process_transaction(
                Some(&teller),
                "alice",
                Decimal::new(10000, 2),
                TellerOperation::Deposit,
                "opening",
            )
            .unwrap();

        let alice = engine.login("alice", "pw1").unwrap();
        let receipt = engine
            .transfer(Some(&alice), "bob", Decimal::new(4000, 2), "rent")
            .unwrap();
        assert_eq!(receipt.sender_balance, Decimal::new(6000, 2));

        let bob = engine.login("bob", "pw2").unwrap();
        assert_eq!(engine.balance(Some(&bob)).unwrap(), Decimal::new(4000, 2));

        // Both entries carry the identical plaintext narrative
        let alice_log = engine.transactions(Some(&alice)).unwrap();
        let bob_log = engine.transactions(Some(&bob)).unwrap();
        assert_eq!(alice_log.last().unwrap().narrative.plain, "rent");
        assert_eq!(bob_log.last().unwrap().narrative.plain, "rent");
        assert_eq!(
            alice_log.last().unwrap().narrative.obscured,
            bob_log.last().unwrap().narrative.obscured
        );
    }

    #[test]
    fn test_transfer_insufficient_funds_mutates_nothing() {
        let (engine, _) = test_engine();
        engine.register("alice", "pw1", Role::Client).unwrap();
        engine.register("bob", "pw2", Role::Client).unwrap();

        let alice = engine.login("alice", "pw1").unwrap();
        assert!(matches!(
            engine.transfer(Some(&alice), "bob", Decimal::new(1000, 2), "x"),
            Err(Error::InsufficientFunds { .. })
        ));

        assert!(engine.transactions(Some(&alice)).unwrap().is_empty());
        let bob = engine.login("bob", "pw2").unwrap();
        assert!(engine.transactions(Some(&bob)).unwrap().is_empty());
    }

    #[test]
    fn test_transfer_to_unknown_recipient() {
        let (engine, _) = test_engine();
        engine.register("alice", "pw1", Role::Client).unwrap();
        let alice = engine.login("alice", "pw1").unwrap();

        assert!(matches!(
            engine.transfer(Some(&alice), "ghost", Decimal::ONE, "x"),
            Err(Error::RecipientNotFound(_))
        ));
        assert!(engine.transactions(Some(&alice)).unwrap().is_empty());
    }

    #[test]
    fn test_withdrawal_sufficiency_enforced() {
        let (engine, _) = test_engine();
        engine.register("alice", "pw1", Role::Client).unwrap();
        engine.register("carol", "pw3", Role::Employee).unwrap();
        let teller = engine.login("carol", "pw3").unwrap();

        assert!(matches!(
            engine.process_transaction(
                Some(&teller),
                "alice",
                Decimal::ONE,
                TellerOperation::Withdrawal,
                "x"
            ),
            Err(Error::InsufficientFunds { .. })
        ));

        let alice = engine.login("alice", "pw1").unwrap();
        assert!(engine.transactions(Some(&alice)).unwrap().is_empty());
    }

    #[test]
    fn test_process_transaction_prefixes_narrative() {
        let (engine, _) = test_engine();
        engine.register("alice", "pw1", Role::Client).unwrap();
        engine.register("carol", "pw3", Role::Employee).unwrap();
        let teller = engine.login("carol", "pw3").unwrap();

        engine
            .process_transaction(
                Some(&teller),
                "alice",
                Decimal::new(500, 2),
                TellerOperation::Deposit,
                "counter deposit",
            )
            .unwrap();

        let alice = engine.login("alice", "pw1").unwrap();
        let log = engine.transactions(Some(&alice)).unwrap();
        assert_eq!(log[0].narrative.plain, "deposit: counter deposit");
        assert_eq!(log[0].kind, TransactionKind::Credit);
    }

    #[test]
    fn test_process_transaction_unknown_customer() {
        let (engine, _) = test_engine();
        engine.register("carol", "pw3", Role::Employee).unwrap();
        let teller = engine.login("carol", "pw3").unwrap();

        assert!(matches!(
            engine.process_transaction(
                Some(&teller),
                "ghost",
                Decimal::ONE,
                TellerOperation::Deposit,
                "x"
            ),
            Err(Error::CustomerNotFound(_))
        ));

        // An employee target with no account is distinguishable
        engine.register("dave", "pw", Role::Employee).unwrap();
        assert!(matches!(
            engine.process_transaction(
                Some(&teller),
                "dave",
                Decimal::ONE,
                TellerOperation::Deposit,
                "x"
            ),
            Err(Error::NoAccount(_))
        ));
    }

    #[test]
    fn test_change_user_role_keeps_account() {
        let (engine, snapshots) = test_engine();
        engine.register("alice", "pw1", Role::Client).unwrap();
        engine.register("adam", "pw", Role::Admin).unwrap();
        let admin = engine.login("adam", "pw").unwrap();

        engine
            .change_user_role(Some(&admin), "alice", Role::Employee)
            .unwrap();

        let snapshot = snapshots.last().unwrap();
        let alice = &snapshot.users["alice"];
        assert_eq!(alice.role, Role::Employee);
        // The account created at registration persists
        assert!(alice.account_id.is_some());
        assert_eq!(snapshot.accounts.len(), 1);
    }

    #[test]
    fn test_list_users_is_admin_only() {
        let (engine, _) = test_engine();
        engine.register("alice", "pw1", Role::Client).unwrap();
        engine.register("adam", "pw", Role::Admin).unwrap();

        let alice = engine.login("alice", "pw1").unwrap();
        assert!(matches!(
            engine.list_users(Some(&alice)),
            Err(Error::Unauthorized(_))
        ));

        let admin = engine.login("adam", "pw").unwrap();
        let summaries = engine.list_users(Some(&admin)).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].username, "adam");
        assert!(!summaries[0].has_account);
        assert!(summaries[1].has_account);
    }

    #[test]
    fn test_checkpoint_failure_rolls_back_transfer() {
        let (engine, snapshots) = test_engine();
        engine.register("alice", "pw1", Role::Client).unwrap();
        engine.register("bob", "pw2", Role::Client).unwrap();
        engine.register("carol", "pw3", Role::Employee).unwrap();
        let teller = engine.login("carol", "pw3").unwrap();
        engine
            .process_transaction(
                Some(&teller),
                "alice",
                Decimal::new(10000, 2),
                TellerOperation::Deposit,
                "opening",
            )
            .unwrap();

        let alice = engine.login("alice", "pw1").unwrap();
        snapshots.fail_next_save();
        assert!(matches!(
            engine.transfer(Some(&alice), "bob", Decimal::new(4000, 2), "rent"),
            Err(Error::Persistence(_))
        ));

        // In-memory state rolled back to match the last accepted snapshot
        assert_eq!(engine.balance(Some(&alice)).unwrap(), Decimal::new(10000, 2));
        let bob = engine.login("bob", "pw2").unwrap();
        assert_eq!(engine.balance(Some(&bob)).unwrap(), Decimal::ZERO);
        assert_eq!(engine.transactions(Some(&alice)).unwrap().len(), 1);
        assert!(engine.transactions(Some(&bob)).unwrap().is_empty());
    }

    #[test]
    fn test_checkpoint_failure_rolls_back_register() {
        let (engine, snapshots) = test_engine();
        snapshots.fail_next_save();
        assert!(matches!(
            engine.register("alice", "pw1", Role::Client),
            Err(Error::Persistence(_))
        ));

        // Registration left no trace; the name is free again
        engine.register("alice", "pw1", Role::Client).unwrap();
    }

    #[test]
    fn test_reload_from_snapshot() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let config = test_config();

        {
            let engine = BankEngine::new(&config, snapshots.clone()).unwrap();
            engine.register("alice", "pw1", Role::Client).unwrap();
            engine.register("carol", "pw3", Role::Employee).unwrap();
            let teller = engine.login("carol", "pw3").unwrap();
            engine
                .process_transaction(
                    Some(&teller),
                    "alice",
                    Decimal::new(2500, 2),
                    TellerOperation::Deposit,
                    "opening",
                )
                .unwrap();
        }

        // A new engine over the same store sees the persisted state
        let engine = BankEngine::new(&config, snapshots).unwrap();
        let alice = engine.login("alice", "pw1").unwrap();
        assert_eq!(engine.balance(Some(&alice)).unwrap(), Decimal::new(2500, 2));
    }

    #[test]
    fn test_self_transfer_nets_to_zero() {
        let (engine, _) = test_engine();
        engine.register("alice", "pw1", Role::Client).unwrap();
        engine.register("carol", "pw3", Role::Employee).unwrap();
        let teller = engine.login("carol", "pw3").unwrap();
        engine
            .process_transaction(
                Some(&teller),
                "alice",
                Decimal::new(5000, 2),
                TellerOperation::Deposit,
                "opening",
            )
            .unwrap();

        let alice = engine.login("alice", "pw1").unwrap();
        engine
            .transfer(Some(&alice), "alice", Decimal::new(1000, 2), "note to self")
            .unwrap();

        assert_eq!(engine.balance(Some(&alice)).unwrap(), Decimal::new(5000, 2));
        assert_eq!(engine.transactions(Some(&alice)).unwrap().len(), 3);
    }
}
