//! Order book depth snapshots

use std::time::{SystemTime, UNIX_EPOCH};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::book::OrderBook;
use crate::level::LimitOrder;

/// Aggregate view of one price level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// Price of the level
    pub price: Decimal,

    /// Number of resting orders
    pub order_count: usize,

    /// Sum of the resting volume
    pub total_volume: Decimal,
}

/// A snapshot of the order book state at a specific point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// Timestamp when the snapshot was created (milliseconds since epoch)
    pub timestamp: u64,

    /// Bid levels, best (highest) price first
    pub bids: Vec<LevelSnapshot>,

    /// Ask levels, best (lowest) price first
    pub asks: Vec<LevelSnapshot>,
}

impl OrderBookSnapshot {
    /// Best bid price and volume
    pub fn best_bid(&self) -> Option<(Decimal, Decimal)> {
        self.bids.first().map(|level| (level.price, level.total_volume))
    }

    /// Best ask price and volume
    pub fn best_ask(&self) -> Option<(Decimal, Decimal)> {
        self.asks.first().map(|level| (level.price, level.total_volume))
    }

    /// Spread between the best quotes
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask - bid),
            _ => None,
        }
    }

    /// Midpoint of the best quotes
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// Total volume across the captured bid levels
    pub fn total_bid_volume(&self) -> Decimal {
        self.bids.iter().map(|level| level.total_volume).sum()
    }

    /// Total volume across the captured ask levels
    pub fn total_ask_volume(&self) -> Decimal {
        self.asks.iter().map(|level| level.total_volume).sum()
    }
}

impl OrderBook {
    /// Captures the top `depth` levels of each side, walking the ladders
    /// through the indexes' threaded links.
    pub fn snapshot(&self, depth: usize) -> OrderBookSnapshot {
        OrderBookSnapshot {
            timestamp: current_time_millis(),
            bids: self.bid_ladder().take(depth).map(level_snapshot).collect(),
            asks: self.ask_ladder().take(depth).map(level_snapshot).collect(),
        }
    }
}

fn level_snapshot(level: &LimitOrder) -> LevelSnapshot {
    LevelSnapshot {
        price: level.price(),
        order_count: level.size(),
        total_volume: level.total_volume(),
    }
}

/// Returns the current time in milliseconds since UNIX epoch
fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
