//! Order book error types

use rust_decimal::Decimal;
use std::fmt;

use crate::level::{LevelError, Side};
use crate::tree::TreeError;

/// Errors that can occur within the OrderBook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBookError {
    /// Error from the underlying ordered index
    Index(TreeError),

    /// Error from a price level operation
    Level(LevelError),

    /// No orders are resting on the side
    EmptySide(Side),

    /// No level is resting at the price
    NoSuchLevel {
        /// The named price
        price: Decimal,
        /// Side that was searched
        side: Side,
    },

    /// Order id is unknown to the book
    OrderNotFound(u64),

    /// Order id is already resting in the book
    DuplicateOrder(u64),

    /// Order volume is negative
    InvalidVolume {
        /// Id of the rejected order
        id: u64,
        /// The offending volume
        volume: Decimal,
    },
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::Index(err) => write!(f, "index error: {}", err),
            OrderBookError::Level(err) => write!(f, "price level error: {}", err),
            OrderBookError::EmptySide(side) => write!(f, "no {} orders are resting", side),
            OrderBookError::NoSuchLevel { price, side } => {
                write!(f, "there is no {} limit at price {}", side, price)
            }
            OrderBookError::OrderNotFound(id) => write!(f, "order not found: {}", id),
            OrderBookError::DuplicateOrder(id) => {
                write!(f, "order {} is already in the book", id)
            }
            OrderBookError::InvalidVolume { id, volume } => {
                write!(f, "order {} has invalid volume {}", id, volume)
            }
        }
    }
}

impl std::error::Error for OrderBookError {}

impl From<TreeError> for OrderBookError {
    fn from(err: TreeError) -> Self {
        OrderBookError::Index(err)
    }
}

impl From<LevelError> for OrderBookError {
    fn from(err: LevelError) -> Self {
        OrderBookError::Level(err)
    }
}
