//! Order book mutation verbs: adding, cancelling and level maintenance

use rust_decimal::Decimal;
use tracing::trace;

use super::book::OrderBook;
use super::error::OrderBookError;
use crate::level::{Order, Side};
use crate::tree::OrderedIndex;

impl OrderBook {
    /// Rests an order at the price on its side.
    ///
    /// On the first order at a price, a level is drawn from the pool and
    /// installed in the side's index and cache; later orders at the same
    /// price join the existing FIFO.
    pub fn add(&mut self, price: Decimal, order: Order) -> Result<(), OrderBookError> {
        if order.volume.is_sign_negative() {
            return Err(OrderBookError::InvalidVolume {
                id: order.id,
                volume: order.volume,
            });
        }
        if self.order_locations.contains_key(&order.id) {
            return Err(OrderBookError::DuplicateOrder(order.id));
        }

        let side = order.side;
        let key = Self::cache_key(price);
        trace!("adding order {} at {} on the {} side", order.id, price, side);

        let level_key = match self.level_key(side, key) {
            Some(level_key) => level_key,
            None => {
                let level_key = self.pool.acquire(key);
                match side {
                    Side::Bid => {
                        self.bids.put(key, level_key);
                        self.bid_levels.insert(key, level_key);
                    }
                    Side::Ask => {
                        self.asks.put(key, level_key);
                        self.ask_levels.insert(key, level_key);
                    }
                }
                level_key
            }
        };

        let id = order.id;
        let order_key = self.orders.insert(order);
        self.order_locations.insert(id, order_key);
        self.pool
            .get_mut(level_key)
            .enqueue(order_key, &mut self.orders);
        Ok(())
    }

    /// Cancels a resting order and hands it back.
    ///
    /// When the cancelled order was the last one at its price, the level
    /// is deleted from the index and the cache and returned to the pool.
    pub fn cancel(&mut self, order_id: u64) -> Result<Order, OrderBookError> {
        let order_key = self
            .order_locations
            .remove(&order_id)
            .ok_or(OrderBookError::OrderNotFound(order_id))?;
        let (side, price) = {
            let order = &self.orders[order_key];
            let price = order.limit().expect("resting orders carry their level price");
            (order.side, price)
        };
        let key = Self::cache_key(price);
        let level_key = self
            .level_key(side, key)
            .expect("resting orders rest on a cached level");
        trace!("cancelling order {} at {} on the {} side", order_id, price, side);

        if let Err(err) = self
            .pool
            .get_mut(level_key)
            .delete(order_key, &mut self.orders)
        {
            self.order_locations.insert(order_id, order_key);
            return Err(err.into());
        }
        let order = self.orders.remove(order_key);

        if self.pool.get(level_key).is_empty() {
            match side {
                Side::Bid => {
                    self.bids
                        .delete(key)
                        .expect("a side holding a level is not empty");
                    self.bid_levels.remove(&key);
                }
                Side::Ask => {
                    self.asks
                        .delete(key)
                        .expect("a side holding a level is not empty");
                    self.ask_levels.remove(&key);
                }
            }
            self.pool.release(level_key);
        }
        Ok(order)
    }

    /// Empties the bid level at the price; the level itself stays quoted.
    pub fn clear_bid_limit(&mut self, price: Decimal) -> Result<(), OrderBookError> {
        self.clear_limit(Side::Bid, price)
    }

    /// Empties the ask level at the price; the level itself stays quoted.
    pub fn clear_ask_limit(&mut self, price: Decimal) -> Result<(), OrderBookError> {
        self.clear_limit(Side::Ask, price)
    }

    fn clear_limit(&mut self, side: Side, price: Decimal) -> Result<(), OrderBookError> {
        let level_key = self
            .level_key(side, price)
            .ok_or(OrderBookError::NoSuchLevel { price, side })?;
        trace!("clearing the {} limit at {}", side, price);
        self.drop_level_orders(level_key);
        self.pool.get_mut(level_key).clear();
        Ok(())
    }

    /// Removes the bid level at the price entirely; a missing level is a
    /// no-op.
    pub fn delete_bid_limit(&mut self, price: Decimal) {
        self.delete_limit(Side::Bid, price);
    }

    /// Removes the ask level at the price entirely; a missing level is a
    /// no-op.
    pub fn delete_ask_limit(&mut self, price: Decimal) {
        self.delete_limit(Side::Ask, price);
    }

    fn delete_limit(&mut self, side: Side, price: Decimal) {
        let key = Self::cache_key(price);
        let Some(level_key) = self.level_key(side, key) else {
            return;
        };
        trace!("deleting the {} limit at {}", side, price);
        self.drop_level_orders(level_key);
        match side {
            Side::Bid => {
                self.bids
                    .delete(key)
                    .expect("a side holding a level is not empty");
                self.bid_levels.remove(&key);
            }
            Side::Ask => {
                self.asks
                    .delete(key)
                    .expect("a side holding a level is not empty");
                self.ask_levels.remove(&key);
            }
        }
        self.pool.release(level_key);
    }

    /// Frees the arena slots and id index entries of every order queued
    /// at the level; the orders become non-resting.
    fn drop_level_orders(&mut self, level_key: usize) {
        let keys: Vec<usize> = self.pool.get(level_key).queue().iter(&self.orders).collect();
        for key in keys {
            let order = self.orders.remove(key);
            self.order_locations.remove(&order.id);
        }
    }
}
