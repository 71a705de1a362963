//! Credential derivation and narrative obscuring
//!
//! This module provides:
//! - Argon2id derivation of a verifiable secret from a password plus salt
//! - AES-256-GCM sealing of transaction narratives under a session-held key
//!
//! The cipher key is generated lazily on first use and held for the process
//! lifetime; there is no rotation.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::sync::OnceLock;

use crate::{config::KdfConfig, Error, Result};

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// Derived secret length in bytes
pub const SECRET_LEN: usize = 32;

/// AES-GCM nonce length in bytes
const NONCE_LEN: usize = 12;

/// Derives and verifies credential secrets
pub struct CredentialVerifier {
    argon2: Argon2<'static>,
}

impl CredentialVerifier {
    /// Build a verifier with the given Argon2id cost
    pub fn new(kdf: &KdfConfig) -> Result<Self> {
        let params = Params::new(
            kdf.memory_kib,
            kdf.iterations,
            kdf.parallelism,
            Some(SECRET_LEN),
        )
        .map_err(|e| Error::Crypto(format!("Invalid KDF parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Derive a credential secret from a password
    ///
    /// A fresh random salt is generated when none is supplied. The same
    /// password and salt always re-derive the same secret.
    pub fn derive_secret(
        &self,
        password: &str,
        salt: Option<&[u8]>,
    ) -> Result<(Vec<u8>, Vec<u8>)> {
        let salt: Vec<u8> = match salt {
            Some(salt) => salt.to_vec(),
            None => rand::random::<[u8; SALT_LEN]>().to_vec(),
        };

        let mut secret = vec![0u8; SECRET_LEN];
        self.argon2
            .hash_password_into(password.as_bytes(), &salt, &mut secret)
            .map_err(|e| Error::Crypto(format!("Key derivation failed: {}", e)))?;

        Ok((secret, salt))
    }

    /// Check a password against a stored secret by re-deriving with its salt
    pub fn verify(&self, password: &str, salt: &[u8], expected: &[u8]) -> Result<bool> {
        let (derived, _) = self.derive_secret(password, Some(salt))?;
        Ok(derived == expected)
    }
}

/// Reversible obscuring of transaction narratives
///
/// Seals free text under a lazily generated process-lifetime key. Output is
/// base64(nonce || ciphertext). This is a supplementary field: the plaintext
/// narrative is always retained alongside it.
#[derive(Debug, Default)]
pub struct NarrativeCipher {
    key: OnceLock<[u8; 32]>,
}

impl NarrativeCipher {
    /// Create a cipher with no key material yet
    pub fn new() -> Self {
        Self::default()
    }

    fn cipher(&self) -> Aes256Gcm {
        let key = self.key.get_or_init(rand::random);
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key))
    }

    /// Seal a narrative
    pub fn obscure(&self, text: &str) -> Result<String> {
        let nonce_bytes: [u8; NONCE_LEN] = rand::random();
        let nonce = Nonce::from_slice(&nonce_bytes);

        let sealed = self
            .cipher()
            .encrypt(nonce, text.as_bytes())
            .map_err(|e| Error::Crypto(format!("Narrative encryption failed: {}", e)))?;

        let mut out = nonce_bytes.to_vec();
        out.extend_from_slice(&sealed);
        Ok(BASE64.encode(out))
    }

    /// Recover the plaintext of a sealed narrative
    pub fn reveal(&self, obscured: &str) -> Result<String> {
        let raw = BASE64
            .decode(obscured)
            .map_err(|e| Error::Crypto(format!("Invalid obscured narrative: {}", e)))?;

        if raw.len() < NONCE_LEN {
            return Err(Error::Crypto("Obscured narrative too short".to_string()));
        }
        let (nonce_bytes, sealed) = raw.split_at(NONCE_LEN);

        let plain = self
            .cipher()
            .decrypt(Nonce::from_slice(nonce_bytes), sealed)
            .map_err(|e| Error::Crypto(format!("Narrative decryption failed: {}", e)))?;

        String::from_utf8(plain)
            .map_err(|e| Error::Crypto(format!("Narrative is not valid UTF-8: {}", e)))
    }
}
