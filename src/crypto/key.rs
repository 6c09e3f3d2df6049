use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The size of the secretbox key in bytes.
pub const KEY_SIZE: usize = 32;

/// A secure key wrapper that ensures the key is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecureKey([u8; KEY_SIZE]);

impl SecureKey {
    /// Creates a new `SecureKey` from a byte array.
    ///
    /// # Arguments
    ///
    /// * `key` - A 32-byte array representing the key.
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }

    /// Returns a reference to the key as a byte array.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for SecureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecureKey(..)")
    }
}

/// Derives the cookie encryption key from a shared secret.
///
/// The key is the SHA-256 digest of the secret's UTF-8 bytes, so every
/// process configured with the same secret reads the same cookies.
///
/// # Arguments
///
/// * `secret` - The configured secret string.
///
/// # Returns
///
/// A `SecureKey` containing the derived key.
pub fn derive_key(secret: &str) -> SecureKey {
    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&Sha256::digest(secret.as_bytes()));
    SecureKey::new(key)
}
