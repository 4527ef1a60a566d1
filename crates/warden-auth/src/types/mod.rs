//! Typed records for every persisted entity kind.
//!
//! Each record owns its wire form: the exact hash field names written to the
//! backend (`userID`, `clientID`, `expirationDate`, ...) are fixed here and
//! nowhere else.

mod access_token;
mod authorization_code;
mod client;
mod refresh_token;
mod user;

pub use access_token::AccessTokenRecord;
pub use authorization_code::AuthorizationCodeRecord;
pub use client::ClientRecord;
pub use refresh_token::RefreshTokenRecord;
pub use user::UserRecord;

use time::OffsetDateTime;
use warden_kv::HashRecord;

use crate::error::AuthError;
use crate::AuthResult;

/// Scope recorded when an issuance does not name one.
pub const DEFAULT_SCOPE: &str = "offline_access";

/// Current wall-clock time as epoch milliseconds.
pub(crate) fn now_unix_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Reads a required field out of a stored hash.
pub(crate) fn require_field(record: &HashRecord, name: &str) -> AuthResult<String> {
    record
        .get(name)
        .map(str::to_string)
        .ok_or_else(|| AuthError::serialization(format!("stored record is missing field '{name}'")))
}
