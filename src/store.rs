use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Duration, Utc};
use tower_cookies::cookie::time::OffsetDateTime;
use tower_cookies::cookie::{Cookie, time};

use crate::codec;
use crate::cookies::{CookieSink, CookieSource};
use crate::crypto::entropy::{EntropySource, OsEntropy};
use crate::crypto::key::{SecureKey, derive_key};
use crate::crypto::secretbox;
use crate::error::{Rejection, SessionError};
use crate::models::id::{IdScheme, UuidV4};
use crate::models::session::Session;

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Turns session cookies into [`Session`]s and back.
///
/// Built once at start-up and shared read-only between requests.
pub struct SessionStore {
    name: String,
    ttl: Duration,
    http_only: bool,
    secure: bool,
    key: SecureKey,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdScheme>,
    entropy: Arc<dyn EntropySource>,
}

impl SessionStore {
    /// Creates a new `SessionStore`.
    ///
    /// # Arguments
    ///
    /// * `name` - The cookie name.
    /// * `secret` - The shared secret the encryption key is derived from.
    ///   Only the derived key is kept.
    /// * `ttl` - How long a saved session stays trusted.
    pub fn new(name: impl Into<String>, secret: &str, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            ttl,
            http_only: false,
            secure: false,
            key: derive_key(secret),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidV4),
            entropy: Arc::new(OsEntropy),
        }
    }

    /// Sets the `HttpOnly` attribute on issued cookies.
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Sets the `Secure` attribute on issued cookies.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Replaces the clock used for stamping and expiry.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the identifier scheme.
    pub fn with_ids(mut self, ids: Arc<dyn IdScheme>) -> Self {
        self.ids = ids;
        self
    }

    /// Replaces the nonce entropy source.
    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = entropy;
        self
    }

    /// The cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The session time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the request's session, or a fresh anonymous one.
    ///
    /// Never fails: a missing, malformed, forged or expired cookie all give
    /// the same anonymous result with a newly generated session ID.
    pub fn get(&self, cookies: &impl CookieSource) -> Session {
        self.load(cookies).unwrap_or_else(|rejection| {
            tracing::debug!("Session cookie not accepted: {}", rejection);
            Session::fresh(self.ids.generate())
        })
    }

    /// Like [`get`](Self::get), but reports why the cookie was not accepted.
    pub fn load(&self, cookies: &impl CookieSource) -> Result<Session, Rejection> {
        let value = cookies
            .cookie_value(&self.name)
            .ok_or(Rejection::Missing)?;
        self.open(&value)
    }

    /// Verifies and decodes a raw cookie value.
    pub fn open(&self, value: &str) -> Result<Session, Rejection> {
        let sealed = general_purpose::STANDARD.decode(value)?;
        let plaintext = secretbox::open(&self.key, &sealed)?;
        let session = codec::decode_with(&plaintext, self.ids.as_ref())?;

        let age = self.clock.now().signed_duration_since(session.time);
        if age > self.ttl {
            return Err(Rejection::Expired {
                age_secs: age.num_seconds(),
            });
        }

        Ok(session)
    }

    /// Stamps, encrypts and sets the session cookie.
    ///
    /// `session.time` is overwritten with the current time. On error no
    /// cookie is set.
    pub fn save(
        &self,
        cookies: &mut impl CookieSink,
        session: &mut Session,
    ) -> Result<(), SessionError> {
        let nonce = secretbox::generate_nonce(self.entropy.as_ref())?;

        let now = self.clock.now();
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| SessionError::Expiry("expiry overflows".to_string()))?;
        let expires = OffsetDateTime::from_unix_timestamp(expires.timestamp())
            .map_err(|e| SessionError::Expiry(e.to_string()))?;

        session.time = now;
        let plaintext = codec::encode(session);
        let sealed = secretbox::seal(&self.key, &nonce, &plaintext)
            .map_err(|e| SessionError::Encryption(e.to_string()))?;

        let mut cookie = self.cookie(general_purpose::STANDARD.encode(sealed));
        cookie.set_expires(expires);
        cookie.set_max_age(time::Duration::seconds(self.ttl.num_seconds()));
        cookies.set_cookie(cookie);

        tracing::debug!("Session saved: sid={}", session.sid);
        Ok(())
    }

    /// Tells the client to delete the session cookie.
    pub fn clear(&self, cookies: &mut impl CookieSink) {
        let mut cookie = self.cookie(String::new());
        cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
        cookie.set_max_age(time::Duration::seconds(-1));
        cookies.set_cookie(cookie);
    }

    fn cookie(&self, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.name.clone(), value);
        cookie.set_path("/");
        cookie.set_http_only(self.http_only);
        cookie.set_secure(self.secure);
        cookie
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .field("http_only", &self.http_only)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}
