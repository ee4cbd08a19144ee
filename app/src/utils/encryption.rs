use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::Rng;

const NONCE_SIZE: usize = 12;

/// AES-256-GCM cipher for OAuth tokens stored in the accounts table.
///
/// Sealed values are `base64(nonce):base64(ciphertext)`.
#[derive(Clone)]
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenCipher(..)")
    }
}

impl TokenCipher {
    pub fn new(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(anyhow!("Encryption key must not be empty"));
        }

        let cipher = Aes256Gcm::new_from_slice(&derive_key(key))
            .map_err(|e| anyhow!("Failed to create cipher: {}", e))?;

        Ok(Self { cipher })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| anyhow!("Encryption failed: {}", e))?;

        Ok(format!(
            "{}:{}",
            BASE64.encode(nonce_bytes),
            BASE64.encode(&ciphertext)
        ))
    }

    pub fn decrypt(&self, sealed: &str) -> Result<String> {
        let (nonce_part, ciphertext_part) = sealed
            .split_once(':')
            .ok_or_else(|| anyhow!("Invalid encrypted format"))?;

        let nonce_bytes = BASE64
            .decode(nonce_part)
            .map_err(|e| anyhow!("Failed to decode nonce: {}", e))?;
        let ciphertext = BASE64
            .decode(ciphertext_part)
            .map_err(|e| anyhow!("Failed to decode ciphertext: {}", e))?;

        if nonce_bytes.len() != NONCE_SIZE {
            return Err(anyhow!("Invalid nonce size"));
        }

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
            .map_err(|e| anyhow!("Decryption failed: {}", e))?;

        String::from_utf8(plaintext)
            .map_err(|e| anyhow!("Failed to convert decrypted bytes to string: {}", e))
    }
}

/// Stretch or truncate the configured key to 32 bytes.
fn derive_key(key: &str) -> [u8; 32] {
    let mut key_bytes = [0u8; 32];
    let key_data = key.as_bytes();

    for (i, byte) in key_bytes.iter_mut().enumerate() {
        *byte = key_data[i % key_data.len()];
    }

    key_bytes
}
