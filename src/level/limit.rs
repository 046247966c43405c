use rust_decimal::Decimal;
use slab::Slab;

use super::error::LevelError;
use super::order::Order;
use super::queue::OrdersQueue;

/// All resting orders at one price on one side, queued in arrival order.
///
/// The level keeps a running sum of its resting volume, so per-level
/// volume queries are O(1).
#[derive(Debug, Clone)]
pub struct LimitOrder {
    price: Decimal,
    orders: OrdersQueue,
    total_volume: Decimal,
}

impl LimitOrder {
    /// Creates an empty level at the price.
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            orders: OrdersQueue::new(),
            total_volume: Decimal::ZERO,
        }
    }

    /// Price shared by every order on this level.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Sum of the resting volume over the queue (cached, O(1)).
    pub fn total_volume(&self) -> Decimal {
        self.total_volume
    }

    /// Number of resting orders.
    pub fn size(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// The underlying FIFO queue.
    pub fn queue(&self) -> &OrdersQueue {
        &self.orders
    }

    /// Arena key of the oldest resting order, `None` when empty.
    pub fn front(&self) -> Option<usize> {
        self.orders.head()
    }

    /// Appends an order at the tail and marks it resting here.
    pub fn enqueue(&mut self, key: usize, arena: &mut Slab<Order>) {
        self.orders.enqueue(key, arena);
        let order = &mut arena[key];
        order.limit = Some(self.price);
        self.total_volume += order.volume;
    }

    /// Removes and returns the oldest order key, or `None` when empty.
    pub fn dequeue(&mut self, arena: &mut Slab<Order>) -> Option<usize> {
        let key = self.orders.dequeue(arena)?;
        let order = &mut arena[key];
        order.limit = None;
        self.total_volume -= order.volume;
        Some(key)
    }

    /// Removes an arbitrary resting order in O(1).
    pub fn delete(&mut self, key: usize, arena: &mut Slab<Order>) -> Result<(), LevelError> {
        if arena[key].limit != Some(self.price) {
            return Err(LevelError::OrderNotOwned {
                id: arena[key].id,
                price: self.price,
            });
        }
        self.orders.delete(key, arena);
        let order = &mut arena[key];
        order.limit = None;
        self.total_volume -= order.volume;
        Ok(())
    }

    /// Drops the queue wholesale and zeroes the volume.
    ///
    /// The queued orders become non-resting from the book's point of view;
    /// the caller is responsible for releasing their arena slots first.
    pub fn clear(&mut self) {
        self.orders = OrdersQueue::new();
        self.total_volume = Decimal::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Side;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn insert_order(arena: &mut Slab<Order>, id: u64, volume: Decimal) -> usize {
        arena.insert(Order::new(id, Side::Bid, volume))
    }

    #[test]
    fn new_level_is_empty() {
        let level = LimitOrder::new(dec!(3.141593));
        assert_eq!(level.price(), dec!(3.141593));
        assert_eq!(level.total_volume(), Decimal::ZERO);
        assert_eq!(level.size(), 0);
        assert!(level.is_empty());
    }

    #[test]
    fn enqueue_tracks_volume_and_back_reference() {
        let mut arena = Slab::new();
        let mut level = LimitOrder::new(dec!(3.141593));
        let key = insert_order(&mut arena, 1, dec!(25.0));

        level.enqueue(key, &mut arena);

        assert_eq!(level.total_volume(), dec!(25.0));
        assert_eq!(level.size(), 1);
        assert_eq!(arena[key].limit(), Some(dec!(3.141593)));
    }

    #[test]
    fn enqueue_many_sums_volume_exactly() {
        let mut arena = Slab::new();
        let mut level = LimitOrder::new(dec!(3.141593));
        let mut volume = Decimal::ZERO;
        for id in 0..100u64 {
            let v = Decimal::from(id) * dec!(0.013);
            volume += v;
            let key = insert_order(&mut arena, id, v);
            level.enqueue(key, &mut arena);
        }
        assert_eq!(level.total_volume(), volume);
        assert_eq!(level.size(), 100);

        let key = level.dequeue(&mut arena).unwrap();
        assert_eq!(level.total_volume(), volume - arena[key].volume);
        assert_eq!(level.size(), 99);
        assert!(!arena[key].is_resting());
    }

    #[test]
    fn dequeue_empty_returns_none() {
        let mut arena = Slab::new();
        let mut level = LimitOrder::new(dec!(1));
        assert_eq!(level.dequeue(&mut arena), None);
    }

    #[test]
    fn volume_adds_exactly_in_decimal() {
        let mut arena = Slab::new();
        let mut level = LimitOrder::new(dec!(1.0));
        let a = insert_order(&mut arena, 1, dec!(0.1));
        let b = insert_order(&mut arena, 2, dec!(0.2));
        level.enqueue(a, &mut arena);
        level.enqueue(b, &mut arena);
        assert_eq!(level.total_volume(), dec!(0.3));
    }

    #[test]
    fn delete_unlinks_and_clears_back_reference() {
        let mut arena = Slab::new();
        let mut level = LimitOrder::new(dec!(2.5));
        let a = insert_order(&mut arena, 1, dec!(1));
        let b = insert_order(&mut arena, 2, dec!(2));
        let c = insert_order(&mut arena, 3, dec!(3));
        for &key in &[a, b, c] {
            level.enqueue(key, &mut arena);
        }

        level.delete(b, &mut arena).unwrap();

        assert_eq!(level.size(), 2);
        assert_eq!(level.total_volume(), dec!(4));
        assert_eq!(arena[b].limit(), None);
        assert!(arena[b].is_unlinked());
        let walked: Vec<usize> = level.queue().iter(&arena).collect();
        assert_eq!(walked, vec![a, c]);
    }

    #[test]
    fn delete_foreign_order_fails() {
        let mut arena = Slab::new();
        let mut here = LimitOrder::new(dec!(2.5));
        let mut elsewhere = LimitOrder::new(dec!(7.5));
        let key = insert_order(&mut arena, 9, dec!(1));
        elsewhere.enqueue(key, &mut arena);

        let err = here.delete(key, &mut arena).unwrap_err();
        assert_eq!(
            err,
            LevelError::OrderNotOwned {
                id: 9,
                price: dec!(2.5)
            }
        );
        assert_eq!(elsewhere.size(), 1);
    }

    #[test]
    fn clear_resets_queue_and_volume() {
        let mut arena = Slab::new();
        let mut level = LimitOrder::new(dec!(4));
        for id in 0..10u64 {
            let key = insert_order(&mut arena, id, dec!(1.5));
            level.enqueue(key, &mut arena);
        }

        level.clear();

        assert!(level.is_empty());
        assert_eq!(level.total_volume(), Decimal::ZERO);
        assert_eq!(level.front(), None);
    }
}
