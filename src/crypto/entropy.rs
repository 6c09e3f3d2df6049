use rand::RngCore;
use rand::rngs::OsRng;

/// A cryptographically secure source of random bytes.
///
/// Filling may fail; callers must treat a failure as fatal rather than fall
/// back to a weaker source.
pub trait EntropySource: Send + Sync {
    /// Fills `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// The operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        OsRng.try_fill_bytes(dest)
    }
}
