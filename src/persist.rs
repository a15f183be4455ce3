//! Wire format of the persisted cycle duration.
//!
//! The value is stored as decimal ASCII with no schema or version marker:
//! `"50000"`.  Reading tolerates surrounding whitespace (a trailing newline
//! from a hand-edited file) and an explicit sign.  Anything that does not
//! parse to a positive `u32` is reported as a typed [`PersistenceError`];
//! callers map that to the default duration.

use core::fmt::Write as _;

use crate::error::PersistenceError;

/// Longest encoding: `u32::MAX` is ten digits.
pub const MAX_ENCODED_LEN: usize = 10;

/// Encode a duration as decimal ASCII.
pub fn encode_duration(duration_ms: u32) -> heapless::String<MAX_ENCODED_LEN> {
    let mut s = heapless::String::new();
    let written = write!(s, "{}", duration_ms);
    debug_assert!(written.is_ok(), "u32 exceeds {MAX_ENCODED_LEN} digits");
    s
}

/// Decode a persisted duration.
pub fn decode_duration(raw: &[u8]) -> Result<u32, PersistenceError> {
    let text = core::str::from_utf8(raw).map_err(|_| PersistenceError::Corrupted)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(PersistenceError::Corrupted);
    }
    let value: i64 = text.parse().map_err(|_| PersistenceError::Corrupted)?;
    if value <= 0 {
        return Err(PersistenceError::NonPositive);
    }
    u32::try_from(value).map_err(|_| PersistenceError::OutOfRange)
}
