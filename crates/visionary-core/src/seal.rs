//! Sealing of private notes at rest.
//!
//! Format: `v1:` || base64( NONCE (12) || CIPHERTEXT (N + 16 tag) )
//!
//! The ChaCha20-Poly1305 key is SHA-256 over a fixed label and the
//! configured secret, so one secret string seals and opens every capsule.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{Result, VisionaryError};

const PREFIX: &str = "v1:";
const NONCE_LEN: usize = 12;
const KEY_LABEL: &[u8] = b"visionary-note-key";

pub struct NoteCipher {
    cipher: ChaCha20Poly1305,
}

impl std::fmt::Debug for NoteCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NoteCipher(..)")
    }
}

impl NoteCipher {
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(VisionaryError::Crypto("secret key must not be empty".into()));
        }
        let mut hasher = Sha256::new();
        hasher.update(KEY_LABEL);
        hasher.update(secret.as_bytes());
        let digest = hasher.finalize();
        let cipher = ChaCha20Poly1305::new(Key::from_slice(digest.as_slice()));
        Ok(Self { cipher })
    }

    pub fn seal(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| VisionaryError::Crypto(format!("encryption failed: {e}")))?;

        let mut packed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        packed.extend_from_slice(&nonce_bytes);
        packed.extend_from_slice(&ciphertext);
        Ok(format!("{PREFIX}{}", STANDARD.encode(packed)))
    }

    pub fn open(&self, sealed: &str) -> Result<String> {
        let encoded = sealed
            .strip_prefix(PREFIX)
            .ok_or_else(|| VisionaryError::Crypto("unrecognized sealed note format".into()))?;
        let packed = STANDARD
            .decode(encoded)
            .map_err(|e| VisionaryError::Crypto(format!("invalid base64: {e}")))?;
        if packed.len() < NONCE_LEN {
            return Err(VisionaryError::Crypto("sealed note too short".into()));
        }
        let (nonce_bytes, ciphertext) = packed.split_at(NONCE_LEN);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| VisionaryError::Crypto("decryption failed (wrong key?)".into()))?;
        String::from_utf8(plaintext)
            .map_err(|e| VisionaryError::Crypto(format!("note is not UTF-8: {e}")))
    }
}
