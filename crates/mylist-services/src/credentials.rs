//! AES-GCM credential codec.
//!
//! Payload layout: `base64(nonce[12] || ciphertext || tag[16])`. The shared key
//! is itself base64 and selects AES-128, AES-192 or AES-256 by its length.

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use mylist_config::CredentialsConfig;
use mylist_protocols::{CredentialCodec, DecryptionError};
use tracing::warn;

const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

type Aes192Gcm = AesGcm<Aes192, U12>;

enum Cipher {
    Aes128(Box<Aes128Gcm>),
    Aes192(Box<Aes192Gcm>),
    Aes256(Box<Aes256Gcm>),
    /// No usable key; every call fails with the stored reason.
    Unavailable(DecryptionError),
}

/// Decrypts (and, for tooling, encrypts) boundary password payloads.
pub struct AesGcmCredentialCodec {
    cipher: Cipher,
}

impl AesGcmCredentialCodec {
    /// Build from a base64-encoded key.
    pub fn from_base64_key(key_b64: &str) -> Result<Self, DecryptionError> {
        let key = BASE64
            .decode(key_b64.trim())
            .map_err(|e| DecryptionError::InvalidKey(e.to_string()))?;
        Self::from_key(&key)
    }

    /// Build from raw key bytes (16, 24 or 32 bytes).
    pub fn from_key(key: &[u8]) -> Result<Self, DecryptionError> {
        let invalid = |_| DecryptionError::InvalidKey(format!("length {}", key.len()));
        let cipher = match key.len() {
            16 => Cipher::Aes128(Box::new(Aes128Gcm::new_from_slice(key).map_err(invalid)?)),
            24 => Cipher::Aes192(Box::new(Aes192Gcm::new_from_slice(key).map_err(invalid)?)),
            32 => Cipher::Aes256(Box::new(Aes256Gcm::new_from_slice(key).map_err(invalid)?)),
            other => return Err(DecryptionError::InvalidKey(format!("length {}", other))),
        };
        Ok(Self { cipher })
    }

    /// Read the key from the environment variable named in the config.
    ///
    /// A missing or malformed key does not fail construction: the codec
    /// reports the problem on every decrypt so the boundary can answer 400.
    pub fn from_config(config: &CredentialsConfig) -> Self {
        let result = match std::env::var(&config.secret_env) {
            Ok(key) => Self::from_base64_key(&key),
            Err(_) => Err(DecryptionError::MissingKey(config.secret_env.clone())),
        };
        result.unwrap_or_else(|e| {
            warn!("Credential codec unavailable: {}", e);
            Self::unavailable(e)
        })
    }

    /// A codec that fails every call with `reason`.
    pub fn unavailable(reason: DecryptionError) -> Self {
        Self {
            cipher: Cipher::Unavailable(reason),
        }
    }

    /// Encrypt a plaintext into the boundary payload format.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, DecryptionError> {
        let (nonce, ciphertext) = match &self.cipher {
            Cipher::Aes128(c) => {
                let nonce = Aes128Gcm::generate_nonce(&mut OsRng);
                let ct = c.encrypt(&nonce, plaintext.as_bytes());
                (nonce.to_vec(), ct)
            }
            Cipher::Aes192(c) => {
                let nonce = Aes192Gcm::generate_nonce(&mut OsRng);
                let ct = c.encrypt(&nonce, plaintext.as_bytes());
                (nonce.to_vec(), ct)
            }
            Cipher::Aes256(c) => {
                let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
                let ct = c.encrypt(&nonce, plaintext.as_bytes());
                (nonce.to_vec(), ct)
            }
            Cipher::Unavailable(reason) => return Err(reason.clone()),
        };
        let ciphertext = ciphertext.map_err(|_| DecryptionError::AuthenticationFailed)?;

        let mut payload = nonce;
        payload.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(payload))
    }
}

impl CredentialCodec for AesGcmCredentialCodec {
    fn decrypt(&self, encrypted: &str) -> Result<String, DecryptionError> {
        if let Cipher::Unavailable(reason) = &self.cipher {
            return Err(reason.clone());
        }

        let bytes = BASE64
            .decode(encrypted.trim())
            .map_err(|e| DecryptionError::InvalidEncoding(e.to_string()))?;
        if bytes.len() < NONCE_SIZE + TAG_SIZE {
            return Err(DecryptionError::Truncated(bytes.len()));
        }

        let (nonce, ct_and_tag) = bytes.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce);
        let plaintext = match &self.cipher {
            Cipher::Aes128(c) => c.decrypt(nonce, ct_and_tag),
            Cipher::Aes192(c) => c.decrypt(nonce, ct_and_tag),
            Cipher::Aes256(c) => c.decrypt(nonce, ct_and_tag),
            Cipher::Unavailable(reason) => return Err(reason.clone()),
        }
        .map_err(|_| DecryptionError::AuthenticationFailed)?;

        String::from_utf8(plaintext).map_err(|_| DecryptionError::InvalidUtf8)
    }
}
