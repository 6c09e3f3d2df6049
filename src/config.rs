use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use zeroize::Zeroizing;

use crate::store::SessionStore;

/// The default TTL: seven days.
pub const DEFAULT_TTL_SECONDS: i64 = 7 * 86400;

/// The application's configuration.
///
/// Consumed by [`Config::store`], which drops the secret once the key is
/// derived.
pub struct Config {
    /// The address the server binds to.
    pub bind_addr: SocketAddr,
    /// The name of the session cookie.
    pub cookie_name: String,
    /// The secret the session key is derived from.
    pub session_secret: Zeroizing<String>,
    /// The session time-to-live in seconds.
    pub session_ttl_seconds: i64,
    /// Whether session cookies carry `HttpOnly`.
    pub cookie_http_only: bool,
    /// Whether session cookies carry `Secure`.
    pub cookie_secure: bool,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a new `Config` from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let session_secret = Zeroizing::new(
            lookup("SESSION_SECRET")
                .context("SESSION_SECRET must be set (generate with: openssl rand -hex 32)")?,
        );
        if session_secret.is_empty() {
            anyhow::bail!("SESSION_SECRET must not be empty");
        }

        let is_production =
            lookup("APP_ENV").unwrap_or_else(|| "development".to_string()) == "production";

        let session_ttl_seconds: i64 = lookup("SESSION_TTL_SECONDS")
            .unwrap_or_else(|| DEFAULT_TTL_SECONDS.to_string())
            .parse()
            .context("Invalid SESSION_TTL_SECONDS")?;
        if session_ttl_seconds <= 0 {
            anyhow::bail!("SESSION_TTL_SECONDS must be positive");
        }

        Ok(Self {
            bind_addr: lookup("BIND_ADDR")
                .unwrap_or_else(|| "127.0.0.1:3000".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            cookie_name: lookup("SESSION_COOKIE_NAME").unwrap_or_else(|| "session".to_string()),
            session_secret,
            session_ttl_seconds,
            cookie_http_only: parse_flag(lookup("COOKIE_HTTP_ONLY"), true)
                .context("Invalid COOKIE_HTTP_ONLY")?,
            cookie_secure: parse_flag(lookup("COOKIE_SECURE"), is_production)
                .context("Invalid COOKIE_SECURE")?,
        })
    }

    /// Builds the session store described by this configuration.
    pub fn store(self) -> SessionStore {
        SessionStore::new(
            self.cookie_name,
            &self.session_secret,
            chrono::Duration::seconds(self.session_ttl_seconds),
        )
        .with_http_only(self.cookie_http_only)
        .with_secure(self.cookie_secure)
    }
}

fn parse_flag(value: Option<String>, default: bool) -> Result<bool> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("no") => Ok(false),
        Some(other) => anyhow::bail!("expected a boolean, got {:?}", other),
    }
}
