//! Stateless encrypted cookie sessions.
//!
//! A [`Session`](models::session::Session) lives entirely in one cookie:
//! `base64(nonce || secretbox(record))`, where the record is the fixed layout
//! produced by [`codec`]. [`SessionStore`](store::SessionStore) derives the
//! key from a shared secret and turns cookies into sessions and back.

pub mod codec;
pub mod config;
pub mod cookies;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

pub mod crypto {
    pub mod entropy;
    pub mod key;
    pub mod secretbox;
}

pub mod models {
    pub mod id;
    pub mod session;
}

pub mod handlers {
    pub mod session;
}

pub mod middleware_layer {
    pub mod session;
}

pub use error::{CodecError, EnvelopeError, Rejection, SessionError};
pub use models::session::Session;
pub use store::{Clock, SessionStore, SystemClock};
