use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// An error produced while decoding a session record.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The record is smaller than the fixed header.
    #[error("encoded session data is too short: {len} bytes")]
    TooShort { len: usize },

    /// One of the three identifiers failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] uuid::Error),

    /// The timestamp does not fit in a `DateTime<Utc>`.
    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(u64),
}

/// An error produced while opening a sealed cookie payload.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The payload cannot even hold a nonce.
    #[error("sealed payload is too short: {len} bytes")]
    Truncated { len: usize },

    /// Authentication of the payload failed.
    #[error("sealed payload failed authentication")]
    Forged,
}

/// Why an incoming cookie was not trusted.
///
/// Every variant degrades to a fresh anonymous session in
/// [`SessionStore::get`](crate::store::SessionStore::get); callers never see it.
#[derive(Error, Debug)]
pub enum Rejection {
    /// No cookie with the configured name.
    #[error("cookie not present")]
    Missing,

    /// The cookie value is not valid standard base64.
    #[error("cookie is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The envelope is truncated or forged.
    #[error("cookie envelope rejected: {0}")]
    Envelope(#[from] EnvelopeError),

    /// The decrypted record is malformed.
    #[error("cookie payload malformed: {0}")]
    Malformed(#[from] CodecError),

    /// The session is older than the store's TTL.
    #[error("session expired {age_secs}s after issue")]
    Expired { age_secs: i64 },
}

/// An error produced while saving a session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The secure random source could not produce a nonce.
    #[error("couldn't get random nonce: {0}")]
    Entropy(#[from] rand::Error),

    /// The cipher refused to seal the payload.
    #[error("couldn't encrypt session: {0}")]
    Encryption(String),

    /// `time + ttl` is not a representable cookie expiry.
    #[error("couldn't compute cookie expiry: {0}")]
    Expiry(String),
}

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A session could not be persisted.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The request conflicts with the session's current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An authorization error.
    #[error("Authorization failed")]
    Unauthorized,

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Session(ref e) => {
                tracing::error!("Session error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Session error".to_string())
            }

            AppError::Conflict(ref msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, msg.clone())
            }

            AppError::Unauthorized => {
                tracing::warn!("Authorization failed");
                (StatusCode::FORBIDDEN, "Forbidden".to_string())
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, [(http::header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}
