//! Inclusive ranges of address indices.

use crate::errors::RangeError;
use std::ops::RangeInclusive;

/// A validated, inclusive range of address indices.
///
/// The range is `Copy` and every call to [`AddressRange::indices`] starts a new
/// pass, so a listing can be restarted at will.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressRange {
    start: u32,
    end: u32,
}

impl AddressRange {
    /// Creates a range, failing if `end` precedes `start`.
    pub fn new(start: u32, end: u32) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the first index.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Returns the last index.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Returns the number of indices, `end - start + 1`.
    pub fn len(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }

    /// A valid range always holds at least one index.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the indices in ascending order.
    pub fn indices(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl IntoIterator for AddressRange {
    type Item = u32;
    type IntoIter = RangeInclusive<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices()
    }
}
