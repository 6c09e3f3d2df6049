use crypto_secretbox::{
    Key, Nonce, XSalsa20Poly1305,
    aead::{Aead, KeyInit},
};

use crate::crypto::entropy::EntropySource;
use crate::crypto::key::SecureKey;
use crate::error::EnvelopeError;

/// The size of the XSalsa20 nonce in bytes.
pub const NONCE_SIZE: usize = 24;
/// The size of the Poly1305 tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Generates a new random nonce.
///
/// # Arguments
///
/// * `entropy` - The random source to draw from.
///
/// # Returns
///
/// A 24-byte array, or the source's error if it could not be filled.
pub fn generate_nonce(entropy: &dyn EntropySource) -> Result<[u8; NONCE_SIZE], rand::Error> {
    let mut nonce = [0u8; NONCE_SIZE];
    entropy.fill(&mut nonce)?;
    Ok(nonce)
}

/// Encrypts and authenticates a plaintext with XSalsa20-Poly1305.
///
/// # Arguments
///
/// * `key` - The secretbox key.
/// * `nonce` - A nonce never used before with this key.
/// * `plaintext` - The data to seal.
///
/// # Returns
///
/// `nonce || tag || ciphertext`, the layout NaCl's `secretbox` produces
/// with the nonce prepended.
pub fn seal(
    key: &SecureKey,
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> Result<Vec<u8>, crypto_secretbox::aead::Error> {
    let cipher = XSalsa20Poly1305::new(Key::from_slice(&key.as_bytes()[..]));
    let boxed = cipher.encrypt(Nonce::from_slice(&nonce[..]), plaintext)?;

    let mut sealed = Vec::with_capacity(NONCE_SIZE + boxed.len());
    sealed.extend_from_slice(nonce);
    sealed.extend_from_slice(&boxed);
    Ok(sealed)
}

/// Opens a payload produced by [`seal`].
///
/// # Arguments
///
/// * `key` - The secretbox key.
/// * `sealed` - `nonce || tag || ciphertext`.
///
/// # Returns
///
/// The plaintext, `EnvelopeError::Truncated` if there is no room for a nonce,
/// or `EnvelopeError::Forged` if authentication fails.
pub fn open(key: &SecureKey, sealed: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    if sealed.len() < NONCE_SIZE {
        return Err(EnvelopeError::Truncated { len: sealed.len() });
    }

    let (nonce, boxed) = sealed.split_at(NONCE_SIZE);
    let cipher = XSalsa20Poly1305::new(Key::from_slice(&key.as_bytes()[..]));

    cipher
        .decrypt(Nonce::from_slice(nonce), boxed)
        .map_err(|_| EnvelopeError::Forged)
}
