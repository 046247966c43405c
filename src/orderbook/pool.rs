//! Reusable price level storage.

use rust_decimal::Decimal;
use slab::Slab;

use crate::level::LimitOrder;

/// Slab-backed pool of price levels.
///
/// Levels are addressed by their slot key; released slots are recycled by
/// later acquisitions, so a busy book settles into a stable working set
/// instead of allocating a level per insertion.
#[derive(Debug, Default)]
pub struct LevelPool {
    levels: Slab<LimitOrder>,
}

impl LevelPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self { levels: Slab::new() }
    }

    /// Creates an empty pool with room for `capacity` levels.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            levels: Slab::with_capacity(capacity),
        }
    }

    /// Number of levels currently seated.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Seats an empty level at the price and returns its key.
    pub fn acquire(&mut self, price: Decimal) -> usize {
        self.levels.insert(LimitOrder::new(price))
    }

    /// Clears the level and frees its slot for reuse.
    pub fn release(&mut self, key: usize) {
        self.levels[key].clear();
        self.levels.remove(key);
    }

    pub fn get(&self, key: usize) -> &LimitOrder {
        &self.levels[key]
    }

    pub fn get_mut(&mut self, key: usize) -> &mut LimitOrder {
        &mut self.levels[key]
    }
}
