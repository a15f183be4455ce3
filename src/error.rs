//! Unified error types for the filter timer firmware.
//!
//! Nothing here is fatal.  Persistence and duration errors are recovered
//! locally and surface only as an indicator flash pattern; the controller
//! can always reach Idle.  All variants are `Copy` so they can be handed
//! to the event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Reading or writing the persisted duration failed.
    Persistence(PersistenceError),
    /// A captured or stored duration is unusable.
    Duration(DurationError),
    /// Timing configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persistence(e) => write!(f, "persistence: {e}"),
            Self::Duration(e) => write!(f, "duration: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Persistence errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceError {
    /// Nothing stored yet.
    NotFound,
    /// The storage medium reported a read or write failure.
    Io,
    /// Stored bytes are not a decimal integer.
    Corrupted,
    /// Stored or requested value is zero or negative.
    NonPositive,
    /// Stored value does not fit the duration type.
    OutOfRange,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no stored duration"),
            Self::Io => write!(f, "I/O error"),
            Self::Corrupted => write!(f, "stored duration is not an integer"),
            Self::NonPositive => write!(f, "duration must be > 0"),
            Self::OutOfRange => write!(f, "duration out of range"),
        }
    }
}

impl core::error::Error for PersistenceError {}

impl From<PersistenceError> for Error {
    fn from(e: PersistenceError) -> Self {
        Self::Persistence(e)
    }
}

// ---------------------------------------------------------------------------
// Duration errors
// ---------------------------------------------------------------------------

/// Why a Training capture was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationError {
    /// Captured hold was zero (or the press start was never seen).
    NonPositive,
    /// Captured hold does not fit in a `u32` of milliseconds.
    TooLong,
}

impl fmt::Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive => write!(f, "captured duration must be > 0"),
            Self::TooLong => write!(f, "captured duration too long"),
        }
    }
}

impl core::error::Error for DurationError {}

impl From<DurationError> for Error {
    fn from(e: DurationError) -> Self {
        Self::Duration(e)
    }
}

/// Validate a captured hold (in ms) as a new cycle duration.
pub fn validate_captured(captured_ms: u64) -> core::result::Result<u32, DurationError> {
    if captured_ms == 0 {
        return Err(DurationError::NonPositive);
    }
    u32::try_from(captured_ms).map_err(|_| DurationError::TooLong)
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
