use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents a user session carried entirely inside the session cookie.
///
/// ⚠️ IMPORTANT: `uid` and `real_uid` are only meaningful when `valid` is
/// `true`. An invalid session is anonymous whatever its fields contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Set only when the session was decoded from a verified, unexpired cookie.
    pub valid: bool,
    /// The time of the last save. Drives TTL expiry on the next read.
    pub time: DateTime<Utc>,
    /// The session ID, stable for the life of the session.
    pub sid: Uuid,
    /// The ID of the user this session acts as. Nil until login.
    pub uid: Uuid,
    /// The ID of the user actually behind the session when `uid` is an
    /// impersonation target. Independent of `uid`.
    pub real_uid: Uuid,
    /// Application-defined payload.
    pub state: Vec<u8>,
}

impl Session {
    /// Creates an anonymous session with the given session ID.
    pub fn fresh(sid: Uuid) -> Self {
        Self {
            valid: false,
            time: DateTime::<Utc>::default(),
            sid,
            uid: Uuid::nil(),
            real_uid: Uuid::nil(),
            state: Vec::new(),
        }
    }

    /// Returns `true` if the session is trusted and carries a user.
    pub fn is_authenticated(&self) -> bool {
        self.valid && !self.uid.is_nil()
    }

    /// Returns `true` if an authenticated session is acting as someone else.
    pub fn is_impersonating(&self) -> bool {
        self.is_authenticated() && !self.real_uid.is_nil() && self.real_uid != self.uid
    }
}
