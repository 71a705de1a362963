//! Configuration for the banking engine

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the JSON snapshot file
    pub snapshot_path: PathBuf,

    /// Service name
    pub service_name: String,

    /// Key derivation configuration
    pub kdf: KdfConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("./data/ledger.json"),
            service_name: "bank-core".to_string(),
            kdf: KdfConfig::default(),
        }
    }
}

/// Argon2id parameters for credential derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfConfig {
    /// Memory cost (KiB)
    pub memory_kib: u32,

    /// Iteration count
    pub iterations: u32,

    /// Lane count
    pub parallelism: u32,
}

impl Default for KdfConfig {
    fn default() -> Self {
        // OWASP-recommended Argon2id cost, at or above the strength of the
        // classic 100k-iteration PBKDF2 baseline
        Self {
            memory_kib: 19_456, // 19 MiB
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(path) = std::env::var("BANK_SNAPSHOT_PATH") {
            config.snapshot_path = PathBuf::from(path);
        }

        if let Ok(name) = std::env::var("BANK_SERVICE_NAME") {
            config.service_name = name;
        }

        Ok(config)
    }
}
