//! Conversion from display units to base units.

use crate::errors::ValueRangeError;
use crate::types::BASE_UNITS_PER_DISPLAY_UNIT;

/// How a send request is carried to the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendMode {
    /// Attach data only, no value moves
    Indexation,
    /// Move this many base units
    Transfer(u64),
}

/// Converts a display amount into base units.
pub fn to_base_units(display: u64) -> Result<u64, ValueRangeError> {
    display
        .checked_mul(BASE_UNITS_PER_DISPLAY_UNIT)
        .ok_or(ValueRangeError(display))
}

/// Selects the send path for a display amount.
///
/// Zero is not an empty transfer: it switches to an indexation-only message.
pub fn send_mode(display: u64) -> Result<SendMode, ValueRangeError> {
    if display == 0 {
        return Ok(SendMode::Indexation);
    }
    to_base_units(display).map(SendMode::Transfer)
}
