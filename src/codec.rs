//! Fixed-layout binary form of a [`Session`].
//!
//! ```text
//! 0        8        24       40       56
//! | time   | sid    | uid    | real   | state ...
//! ```
//!
//! `time` is big-endian Unix seconds. `state` has no length prefix and runs to
//! the end of the buffer, so the record must always be delimited externally
//! (here, by the authenticated-encryption envelope).

use chrono::DateTime;

use crate::error::CodecError;
use crate::models::id::{ID_SIZE, IdScheme, UuidV4};
use crate::models::session::Session;

/// The size of the big-endian timestamp.
pub const TIME_SIZE: usize = 8;
/// Bytes preceding `state`.
pub const HEADER_SIZE: usize = TIME_SIZE + 3 * ID_SIZE;

const SID_AT: usize = TIME_SIZE;
const UID_AT: usize = SID_AT + ID_SIZE;
const REAL_UID_AT: usize = UID_AT + ID_SIZE;

/// Encodes a session. `valid` is not serialized and `time` loses its
/// sub-second part.
pub fn encode(session: &Session) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + session.state.len());

    buf.extend_from_slice(&(session.time.timestamp() as u64).to_be_bytes());
    buf.extend_from_slice(session.sid.as_bytes());
    buf.extend_from_slice(session.uid.as_bytes());
    buf.extend_from_slice(session.real_uid.as_bytes());
    buf.extend_from_slice(&session.state);

    buf
}

/// Decodes a session using UUIDv4 identifiers.
pub fn decode(data: &[u8]) -> Result<Session, CodecError> {
    decode_with(data, &UuidV4)
}

/// Decodes a session, parsing identifiers through `ids`.
///
/// The result is always marked `valid`; whether it deserves trust is for the
/// caller to decide.
pub fn decode_with(data: &[u8], ids: &dyn IdScheme) -> Result<Session, CodecError> {
    if data.len() < HEADER_SIZE {
        return Err(CodecError::TooShort { len: data.len() });
    }

    let mut raw_time = [0u8; TIME_SIZE];
    raw_time.copy_from_slice(&data[..TIME_SIZE]);
    let secs = u64::from_be_bytes(raw_time);

    let sid = ids.parse(&data[SID_AT..UID_AT])?;
    let uid = ids.parse(&data[UID_AT..REAL_UID_AT])?;
    let real_uid = ids.parse(&data[REAL_UID_AT..HEADER_SIZE])?;

    let time =
        DateTime::from_timestamp(secs as i64, 0).ok_or(CodecError::InvalidTimestamp(secs))?;

    Ok(Session {
        valid: true,
        time,
        sid,
        uid,
        real_uid,
        state: data[HEADER_SIZE..].to_vec(),
    })
}
