//! Durability checkpoint boundary
//!
//! The engine calls [`SnapshotStore::save`] after every successful mutating
//! operation and [`SnapshotStore::load`] once at startup. A save either
//! replaces the full snapshot or leaves the prior one valid; there is no
//! partial write.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    types::{Account, AccountId, User},
    Error, Result,
};

/// Full state of the ledger at a point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Users keyed by username
    pub users: HashMap<String, User>,

    /// Accounts keyed by account ID
    pub accounts: HashMap<AccountId, Account>,
}

/// Persistence collaborator for the engine
pub trait SnapshotStore: Send + Sync {
    /// Load the latest snapshot, if one exists
    fn load(&self) -> Result<Option<LedgerSnapshot>>;

    /// Replace the stored snapshot. Idempotent; never partially written.
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<()>;
}

/// Snapshot store backed by a single JSON file
#[derive(Debug)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    /// Create a store writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self) -> Result<Option<LedgerSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::Persistence(format!("Failed to read snapshot: {}", e)))?;
        let snapshot = serde_json::from_str(&content)
            .map_err(|e| Error::Persistence(format!("Failed to parse snapshot: {}", e)))?;

        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Persistence(format!("Failed to create data dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|e| Error::Persistence(format!("Failed to serialize snapshot: {}", e)))?;

        // Write to a sibling temp file, then rename over the target: a
        // failure at any point leaves the previous snapshot intact.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content)
            .map_err(|e| Error::Persistence(format!("Failed to write snapshot: {}", e)))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| Error::Persistence(format!("Failed to commit snapshot: {}", e)))?;

        Ok(())
    }
}

/// In-memory snapshot store with save-failure injection
///
/// Lets tests observe checkpoints and exercise the engine's rollback path.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshot: Mutex<Option<LedgerSnapshot>>,
    fail_next_save: AtomicBool,
}

impl MemorySnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next save fail with a persistence error
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    /// The most recently saved snapshot
    pub fn last(&self) -> Option<LedgerSnapshot> {
        self.snapshot.lock().clone()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<LedgerSnapshot>> {
        Ok(self.snapshot.lock().clone())
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(Error::Persistence("Injected save failure".to_string()));
        }
        *self.snapshot.lock() = Some(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn sample_snapshot() -> LedgerSnapshot {
        let account_id = AccountId::generate();
        let mut snapshot = LedgerSnapshot::default();
        snapshot.users.insert(
            "alice".to_string(),
            User {
                username: "alice".to_string(),
                secret: vec![1, 2, 3],
                salt: vec![4, 5, 6],
                role: Role::Client,
                account_id: Some(account_id),
            },
        );
        snapshot
            .accounts
            .insert(account_id, Account::new(account_id, "alice"));
        snapshot
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("ledger.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("ledger.json"));

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.users.len(), 1);
        assert_eq!(loaded.accounts.len(), 1);
        let alice = &loaded.users["alice"];
        assert_eq!(alice.role, Role::Client);
        assert_eq!(alice.secret, vec![1, 2, 3]);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("nested/dir/ledger.json"));
        store.save(&sample_snapshot()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("ledger.json"));

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();
        store.save(&snapshot).unwrap();

        assert_eq!(store.load().unwrap().unwrap().users.len(), 1);
    }

    #[test]
    fn test_memory_store_failure_injection() {
        let store = MemorySnapshotStore::new();
        store.save(&sample_snapshot()).unwrap();

        store.fail_next_save();
        assert!(matches!(
            store.save(&LedgerSnapshot::default()),
            Err(Error::Persistence(_))
        ));

        // Prior snapshot still valid, and the failure was one-shot
        assert_eq!(store.last().unwrap().users.len(), 1);
        store.save(&LedgerSnapshot::default()).unwrap();
        assert!(store.last().unwrap().users.is_empty());
    }
}
