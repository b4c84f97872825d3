//! Identity-document vault: encryption at rest, lookup hashing and masking.
//!
//! Documents are stored as AES-256-GCM envelopes (`nonce || ciphertext ||
//! tag`) alongside a SHA-256 digest used for the system-wide uniqueness
//! check. Only the last four digits are ever returned to clients.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use sha2::{Digest, Sha256};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// AES-256 key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// GCM nonce length in bytes.
pub const NONCE_LENGTH: usize = 12;

/// Number of trailing characters kept visible when masking.
pub const VISIBLE_SUFFIX_LENGTH: usize = 4;

const MASK_PREFIX: &str = "XXXX-XXXX-";

// ---------------------------------------------------------------------------
// Vault
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct IdentityVault {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for IdentityVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVault").finish_non_exhaustive()
    }
}

impl IdentityVault {
    pub fn new(key: &[u8]) -> Result<Self, CoreError> {
        if key.len() != KEY_LENGTH {
            return Err(CoreError::Validation(format!(
                "Identity key must be {KEY_LENGTH} bytes, got {}",
                key.len()
            )));
        }
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| CoreError::Internal(format!("Failed to initialise cipher: {e}")))?;
        Ok(Self { cipher })
    }

    /// Build a vault from a 64-character hex key.
    pub fn from_hex_key(hex_key: &str) -> Result<Self, CoreError> {
        let key = hex::decode(hex_key.trim())
            .ok_or_else(|| CoreError::Validation("Identity key is not valid hex".to_string()))?;
        Self::new(&key)
    }

    pub fn encrypt(&self, document: &str) -> Result<Vec<u8>, CoreError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, document.as_bytes())
            .map_err(|e| CoreError::Internal(format!("Encryption failed: {e}")))?;

        let mut envelope = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&ciphertext);
        Ok(envelope)
    }

    pub fn decrypt(&self, envelope: &[u8]) -> Result<String, CoreError> {
        if envelope.len() <= NONCE_LENGTH {
            return Err(CoreError::Internal("Encrypted document is truncated".to_string()));
        }
        let (nonce, ciphertext) = envelope.split_at(NONCE_LENGTH);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| CoreError::Internal(format!("Decryption failed: {e}")))?;
        String::from_utf8(plaintext)
            .map_err(|e| CoreError::Internal(format!("Decrypted document is not UTF-8: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Hashing and masking
// ---------------------------------------------------------------------------

/// SHA-256 digest of the document, used for the global duplicate check.
pub fn document_hash(document: &str) -> Vec<u8> {
    Sha256::digest(document.as_bytes()).to_vec()
}

/// Trailing digits shown to operators. Shorter documents yield what they have.
pub fn last4(document: &str) -> String {
    let chars: Vec<char> = document.chars().collect();
    let start = chars.len().saturating_sub(VISIBLE_SUFFIX_LENGTH);
    chars[start..].iter().collect()
}

/// Mask a document as `XXXX-XXXX-1234`.
pub fn mask(document: &str) -> String {
    if document.chars().count() < VISIBLE_SUFFIX_LENGTH {
        return format!("{MASK_PREFIX}XXXX");
    }
    format!("{MASK_PREFIX}{}", last4(document))
}

/// Mask from stored last-four digits, as kept on occupant rows.
pub fn mask_last4(last4: &str) -> String {
    if last4.chars().count() < VISIBLE_SUFFIX_LENGTH {
        return format!("{MASK_PREFIX}XXXX");
    }
    format!("{MASK_PREFIX}{last4}")
}

// hex decoding
mod hex {
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn encrypt_then_decrypt_returns_document() {
        let vault = IdentityVault::from_hex_key(KEY_HEX).unwrap();
        let envelope = vault.encrypt("123456789012").unwrap();
        assert_ne!(&envelope[NONCE_LENGTH..], b"123456789012");
        assert_eq!(vault.decrypt(&envelope).unwrap(), "123456789012");
    }

    #[test]
    fn encryption_uses_fresh_nonce() {
        let vault = IdentityVault::from_hex_key(KEY_HEX).unwrap();
        let a = vault.encrypt("123456789012").unwrap();
        let b = vault.encrypt("123456789012").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tampered_envelope_fails() {
        let vault = IdentityVault::from_hex_key(KEY_HEX).unwrap();
        let mut envelope = vault.encrypt("123456789012").unwrap();
        let last = envelope.len() - 1;
        envelope[last] ^= 0xff;
        assert_matches!(vault.decrypt(&envelope), Err(CoreError::Internal(_)));
        assert_matches!(vault.decrypt(&[0u8; 4]), Err(CoreError::Internal(_)));
    }

    #[test]
    fn bad_keys_rejected() {
        assert_matches!(IdentityVault::from_hex_key("zz"), Err(CoreError::Validation(_)));
        assert_matches!(IdentityVault::from_hex_key("abc"), Err(CoreError::Validation(_)));
        assert_matches!(IdentityVault::from_hex_key("00ff"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn hash_is_deterministic_sha256() {
        assert_eq!(document_hash("123456789012"), document_hash("123456789012"));
        assert_ne!(document_hash("123456789012"), document_hash("123456789013"));
        assert_eq!(document_hash("").len(), 32);
    }

    #[test]
    fn masking() {
        assert_eq!(mask("123456789012"), "XXXX-XXXX-9012");
        assert_eq!(mask("12"), "XXXX-XXXX-XXXX");
        assert_eq!(mask_last4("9012"), "XXXX-XXXX-9012");
        assert_eq!(last4("123456789012"), "9012");
        assert_eq!(last4("12"), "12");
    }
}
