use std::ops::Range;

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SortableError {
    #[error("{keys} keys but {values} values")]
    LengthMismatch { keys: usize, values: usize },

    #[error("key {key} is outside the key domain [0, {key_max})")]
    KeyOutOfRange { key: usize, key_max: usize },

    #[error("key {key} is already held by another position")]
    DuplicateKey { key: usize },

    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("range {start}..{end} is invalid for length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("node capacity {capacity} is below the required {required}")]
    CapacityTooSmall { capacity: usize, required: usize },

    #[error("node capacity {capacity} exceeds the addressable maximum {max}")]
    CapacityOverflow { capacity: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, SortableError>;

pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(SortableError::IndexOutOfRange { index, len })
    }
}

pub(crate) fn check_key(key: usize, key_max: usize) -> Result<()> {
    if key < key_max {
        Ok(())
    } else {
        Err(SortableError::KeyOutOfRange { key, key_max })
    }
}

pub(crate) fn check_range(range: &Range<usize>, len: usize) -> Result<()> {
    if range.start <= range.end && range.end <= len {
        Ok(())
    } else {
        Err(SortableError::InvalidRange {
            start: range.start,
            end: range.end,
            len,
        })
    }
}
