use uuid::Uuid;

/// Width in bytes of every identifier carried by a session.
pub const ID_SIZE: usize = 16;

/// The 128-bit identifier scheme used for session and user ids.
///
/// The codec and the store only ever go through this trait, so a deployment
/// can swap UUIDv4 for another 128-bit scheme without touching either.
pub trait IdScheme: Send + Sync {
    /// Produces a fresh, unique identifier.
    fn generate(&self) -> Uuid;

    /// Parses exactly [`ID_SIZE`] bytes into an identifier.
    fn parse(&self, bytes: &[u8]) -> Result<Uuid, uuid::Error>;
}

/// Random (version 4) UUIDs drawn from the OS random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4;

impl IdScheme for UuidV4 {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }

    fn parse(&self, bytes: &[u8]) -> Result<Uuid, uuid::Error> {
        Uuid::from_slice(bytes)
    }
}
