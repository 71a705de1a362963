//! In-memory ledger store
//!
//! Single source of truth for users and accounts. The store owns storage and
//! retrieval only; it never evaluates balances or roles, and it performs no
//! I/O. Accounts are held behind per-account mutexes so balance mutations run
//! in exclusive critical sections (see the engine for lock ordering).

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    persistence::LedgerSnapshot,
    types::{Account, AccountId, Role, User, UserSummary},
    Error, Result,
};

/// Shared handle to an account and its transaction log
pub type AccountHandle = Arc<Mutex<Account>>;

/// Authoritative in-memory collections of users and accounts
#[derive(Debug, Default)]
pub struct LedgerStore {
    users: RwLock<HashMap<String, User>>,
    accounts: RwLock<HashMap<AccountId, AccountHandle>>,
}

impl LedgerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        let accounts = snapshot
            .accounts
            .into_iter()
            .map(|(id, account)| (id, Arc::new(Mutex::new(account))))
            .collect();

        Self {
            users: RwLock::new(snapshot.users),
            accounts: RwLock::new(accounts),
        }
    }

    /// Insert a new user; fails if the username is taken
    pub fn create_user(&self, user: User) -> Result<()> {
        let mut users = self.users.write();
        if users.contains_key(&user.username) {
            return Err(Error::DuplicateUsername(user.username));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    /// Look up a user by username
    pub fn get_user(&self, username: &str) -> Option<User> {
        self.users.read().get(username).cloned()
    }

    /// Update a user's role in place, returning the previous role
    pub fn set_role(&self, username: &str, role: Role) -> Result<Role> {
        let mut users = self.users.write();
        let user = users
            .get_mut(username)
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;
        let previous = user.role;
        user.role = role;
        Ok(previous)
    }

    /// Remove a user. Only used to undo a registration whose checkpoint failed.
    pub(crate) fn remove_user(&self, username: &str) {
        self.users.write().remove(username);
    }

    /// Create a fresh zero-balance account owned by `owner`
    pub fn create_account(&self, owner: &str) -> AccountId {
        let id = AccountId::generate();
        let account = Account::new(id, owner);
        self.accounts.write().insert(id, Arc::new(Mutex::new(account)));
        id
    }

    /// Look up an account handle by ID
    pub fn get_account(&self, id: AccountId) -> Option<AccountHandle> {
        self.accounts.read().get(&id).cloned()
    }

    /// Remove an account. Only used to undo a registration whose checkpoint failed.
    pub(crate) fn remove_account(&self, id: AccountId) {
        self.accounts.write().remove(&id);
    }

    /// Read-only projection of every user
    pub fn list_users(&self) -> Vec<UserSummary> {
        let mut summaries: Vec<UserSummary> = self
            .users
            .read()
            .values()
            .map(|user| UserSummary {
                username: user.username.clone(),
                role: user.role,
                has_account: user.account_id.is_some(),
            })
            .collect();
        summaries.sort_by(|a, b| a.username.cmp(&b.username));
        summaries
    }

    /// Clone the full state for a durability checkpoint
    pub fn snapshot(&self) -> LedgerSnapshot {
        let users = self.users.read().clone();
        let accounts = self
            .accounts
            .read()
            .iter()
            .map(|(id, handle)| (*id, handle.lock().clone()))
            .collect();

        LedgerSnapshot { users, accounts }
    }
}
