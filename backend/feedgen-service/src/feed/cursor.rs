//! Opaque pagination cursor: base64 of an RFC 3339 timestamp.
//!
//! Encoding must round-trip exactly for any cursor this service emitted.
//! Anything that fails to decode is treated as "no lower bound".

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};

pub fn encode(boundary: DateTime<Utc>) -> String {
    general_purpose::STANDARD.encode(boundary.to_rfc3339())
}

/// Decode a client-supplied cursor. Malformed input yields `None`.
pub fn decode(cursor: &str) -> Option<DateTime<Utc>> {
    let bytes = general_purpose::STANDARD.decode(cursor).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    DateTime::parse_from_rfc3339(&text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
