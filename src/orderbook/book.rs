//! Core OrderBook implementation for managing price levels and orders

use std::collections::HashMap;

use rust_decimal::Decimal;
use slab::Slab;

use super::error::OrderBookError;
use super::pool::LevelPool;
use crate::level::{LimitOrder, Order, Side};
use crate::tree::{OrderedIndex, RedBlackTree};

/// Suggested maximum number of price levels per side; the price caches
/// preallocate to this.
pub const MAX_PRICE_LEVELS: usize = 10_000;

/// The OrderBook manages two opposing sets of price levels and answers
/// top-of-book and per-level volume queries.
///
/// Each side is a red–black ordered index over the level prices, so the
/// best quote is O(1) and level insertion and removal are O(log N). A
/// price→level cache resolves an exact price without touching the tree,
/// and emptied levels are recycled through a pool.
///
/// The book is a single-writer structure: every mutation takes
/// `&mut self` and there is no internal locking. Multi-reader setups are
/// expected to wrap the book in an external reader-writer lock whose
/// write section spans the whole mutation.
#[derive(Debug)]
pub struct OrderBook {
    /// Bid side price levels; values key into the level pool
    pub(super) bids: RedBlackTree<usize>,

    /// Ask side price levels; values key into the level pool
    pub(super) asks: RedBlackTree<usize>,

    /// Normalized price -> level pool key, bid side
    pub(super) bid_levels: HashMap<Decimal, usize>,

    /// Normalized price -> level pool key, ask side
    pub(super) ask_levels: HashMap<Decimal, usize>,

    /// Reusable level storage shared by both sides
    pub(super) pool: LevelPool,

    /// Arena holding every resting order
    pub(super) orders: Slab<Order>,

    /// Order id -> arena key, for O(1) cancellation
    pub(super) order_locations: HashMap<u64, usize>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Creates an empty book with cache capacity preallocated for
    /// [`MAX_PRICE_LEVELS`] levels per side.
    pub fn new() -> Self {
        Self {
            bids: RedBlackTree::new(),
            asks: RedBlackTree::new(),
            bid_levels: HashMap::with_capacity(MAX_PRICE_LEVELS),
            ask_levels: HashMap::with_capacity(MAX_PRICE_LEVELS),
            pool: LevelPool::with_capacity(MAX_PRICE_LEVELS),
            orders: Slab::new(),
            order_locations: HashMap::new(),
        }
    }

    /// Canonical cache key for a price: `1.0` and `1.00` address the same
    /// level, whatever their internal representation.
    pub(super) fn cache_key(price: Decimal) -> Decimal {
        price.normalize()
    }

    pub(super) fn level_key(&self, side: Side, price: Decimal) -> Option<usize> {
        let cache = match side {
            Side::Bid => &self.bid_levels,
            Side::Ask => &self.ask_levels,
        };
        cache.get(&Self::cache_key(price)).copied()
    }

    /// Highest resting bid price.
    pub fn best_bid(&self) -> Result<Decimal, OrderBookError> {
        self.bids
            .max()
            .map_err(|_| OrderBookError::EmptySide(Side::Bid))
    }

    /// Lowest resting ask price.
    pub fn best_offer(&self) -> Result<Decimal, OrderBookError> {
        self.asks
            .min()
            .map_err(|_| OrderBookError::EmptySide(Side::Ask))
    }

    /// `best_offer - best_bid`, when both sides are quoted.
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_offer()) {
            (Ok(bid), Ok(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Midpoint of the best quotes, when both sides are quoted.
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_offer()) {
            (Ok(bid), Ok(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// Total resting volume at the bid level, zero when no such level.
    pub fn volume_at_bid_limit(&self, price: Decimal) -> Decimal {
        self.volume_at_limit(Side::Bid, price)
    }

    /// Total resting volume at the ask level, zero when no such level.
    pub fn volume_at_ask_limit(&self, price: Decimal) -> Decimal {
        self.volume_at_limit(Side::Ask, price)
    }

    fn volume_at_limit(&self, side: Side, price: Decimal) -> Decimal {
        match self.level_key(side, price) {
            Some(key) => self.pool.get(key).total_volume(),
            None => Decimal::ZERO,
        }
    }

    /// The bid level resting at the price, if any.
    pub fn bid_limit(&self, price: Decimal) -> Option<&LimitOrder> {
        self.level_key(Side::Bid, price).map(|key| self.pool.get(key))
    }

    /// The ask level resting at the price, if any.
    pub fn ask_limit(&self, price: Decimal) -> Option<&LimitOrder> {
        self.level_key(Side::Ask, price).map(|key| self.pool.get(key))
    }

    /// Number of distinct bid levels.
    pub fn bid_level_count(&self) -> usize {
        self.bid_levels.len()
    }

    /// Number of distinct ask levels.
    pub fn ask_level_count(&self) -> usize {
        self.ask_levels.len()
    }

    /// Number of resting orders across both sides.
    pub fn order_count(&self) -> usize {
        self.order_locations.len()
    }

    /// Resting order by id.
    pub fn get_order(&self, id: u64) -> Option<&Order> {
        self.order_locations.get(&id).map(|&key| &self.orders[key])
    }

    pub fn contains_order(&self, id: u64) -> bool {
        self.order_locations.contains_key(&id)
    }

    /// Ids of the orders resting at the bid level, oldest first.
    pub fn orders_at_bid_limit(&self, price: Decimal) -> Vec<u64> {
        self.orders_at_limit(Side::Bid, price)
    }

    /// Ids of the orders resting at the ask level, oldest first.
    pub fn orders_at_ask_limit(&self, price: Decimal) -> Vec<u64> {
        self.orders_at_limit(Side::Ask, price)
    }

    fn orders_at_limit(&self, side: Side, price: Decimal) -> Vec<u64> {
        match self.level_key(side, price) {
            Some(key) => self
                .pool
                .get(key)
                .queue()
                .iter(&self.orders)
                .map(|order_key| self.orders[order_key].id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Bid levels from the best (highest) price downward, walking the
    /// index's threaded links.
    pub fn bid_ladder(&self) -> impl Iterator<Item = &LimitOrder> + '_ {
        let tree = &self.bids;
        std::iter::successors(tree.max_id(), move |&id| tree.prev_id(id))
            .map(move |id| self.pool.get(*tree.value_at(id)))
    }

    /// Ask levels from the best (lowest) price upward, walking the
    /// index's threaded links.
    pub fn ask_ladder(&self) -> impl Iterator<Item = &LimitOrder> + '_ {
        let tree = &self.asks;
        std::iter::successors(tree.min_id(), move |&id| tree.next_id(id))
            .map(move |id| self.pool.get(*tree.value_at(id)))
    }

    /// Direct read access to the bid-side ordered index.
    pub fn bid_index(&self) -> &RedBlackTree<usize> {
        &self.bids
    }

    /// Direct read access to the ask-side ordered index.
    pub fn ask_index(&self) -> &RedBlackTree<usize> {
        &self.asks
    }
}
