//! Ordered index error types

use rust_decimal::Decimal;
use std::fmt;

/// Errors that can occur within an ordered index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The index holds no keys
    Empty,
    /// No node carries the requested key
    KeyNotFound(Decimal),
    /// A rank outside `[0, size)` was requested
    RankOutOfRange {
        /// The requested rank
        rank: usize,
        /// Current number of keys
        size: usize,
    },
    /// A key range extending outside `[min, max]` was requested
    RangeOutOfBounds {
        /// Lower bound of the rejected range
        lo: Decimal,
        /// Upper bound of the rejected range
        hi: Decimal,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Empty => write!(f, "the tree is empty"),
            TreeError::KeyNotFound(key) => write!(f, "key {} does not exist", key),
            TreeError::RankOutOfRange { rank, size } => {
                write!(f, "rank {} is out of range for size {}", rank, size)
            }
            TreeError::RangeOutOfBounds { lo, hi } => {
                write!(f, "key range [{}, {}] extends outside the tree", lo, hi)
            }
        }
    }
}

impl std::error::Error for TreeError {}
