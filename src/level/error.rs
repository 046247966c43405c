//! Price level error types

use rust_decimal::Decimal;
use std::fmt;

/// Errors that can occur within a price level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelError {
    /// The order does not rest on this price level
    OrderNotOwned {
        /// Id of the offending order
        id: u64,
        /// Price of the level that rejected it
        price: Decimal,
    },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::OrderNotOwned { id, price } => {
                write!(f, "order {} does not belong to the limit at {}", id, price)
            }
        }
    }
}

impl std::error::Error for LevelError {}
