use slab::Slab;

use super::order::Order;

/// Intrusive doubly-linked FIFO of orders within one price level.
///
/// The order nodes live in a shared arena; the queue only holds the head
/// and tail keys plus a length counter, so cloning a level is cheap and
/// every queue operation is O(1).
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdersQueue {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl OrdersQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued orders.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Arena key of the oldest order, `None` when empty.
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    /// Arena key of the newest order, `None` when empty.
    pub fn tail(&self) -> Option<usize> {
        self.tail
    }

    /// Appends the order at the tail. The order must be unlinked.
    pub fn enqueue(&mut self, key: usize, arena: &mut Slab<Order>) {
        debug_assert!(arena[key].is_unlinked());
        arena[key].prev = self.tail;
        arena[key].next = None;
        match self.tail {
            Some(tail) => arena[tail].next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
        self.len += 1;
    }

    /// Removes and returns the head, or `None` when the queue is empty.
    pub fn dequeue(&mut self, arena: &mut Slab<Order>) -> Option<usize> {
        let head = self.head?;
        self.delete(head, arena);
        Some(head)
    }

    /// Unlinks an arbitrary queued order in O(1).
    ///
    /// The order must currently rest in this queue; the level enforces
    /// that through the order's back-reference.
    pub fn delete(&mut self, key: usize, arena: &mut Slab<Order>) {
        let (prev, next) = {
            let node = &arena[key];
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => arena[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => arena[next].prev = prev,
            None => self.tail = prev,
        }
        arena[key].prev = None;
        arena[key].next = None;
        self.len -= 1;
    }

    /// Arena keys of the queued orders, head to tail.
    pub fn iter<'a>(&self, arena: &'a Slab<Order>) -> impl Iterator<Item = usize> + 'a {
        std::iter::successors(self.head, move |&key| arena[key].next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Side;
    use rust_decimal_macros::dec;

    fn insert_order(arena: &mut Slab<Order>, id: u64) -> usize {
        arena.insert(Order::new(id, Side::Bid, dec!(1)))
    }

    #[test]
    fn enqueue_single() {
        let mut arena = Slab::new();
        let mut queue = OrdersQueue::new();
        let key = insert_order(&mut arena, 1);

        queue.enqueue(key, &mut arena);

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.head(), Some(key));
        assert_eq!(queue.tail(), Some(key));
        assert!(arena[key].is_unlinked());
    }

    #[test]
    fn enqueue_keeps_arrival_order() {
        let mut arena = Slab::new();
        let mut queue = OrdersQueue::new();
        let keys: Vec<usize> = (0..5).map(|id| insert_order(&mut arena, id)).collect();
        for &key in &keys {
            queue.enqueue(key, &mut arena);
        }

        assert_eq!(queue.len(), 5);
        let walked: Vec<usize> = queue.iter(&arena).collect();
        assert_eq!(walked, keys);
        assert_eq!(arena[keys[0]].prev, None);
        assert_eq!(arena[keys[0]].next, Some(keys[1]));
        assert_eq!(arena[keys[4]].next, None);
        assert_eq!(arena[keys[4]].prev, Some(keys[3]));
    }

    #[test]
    fn dequeue_returns_fifo_order() {
        let mut arena = Slab::new();
        let mut queue = OrdersQueue::new();
        let keys: Vec<usize> = (0..3).map(|id| insert_order(&mut arena, id)).collect();
        for &key in &keys {
            queue.enqueue(key, &mut arena);
        }

        assert_eq!(queue.dequeue(&mut arena), Some(keys[0]));
        assert_eq!(queue.dequeue(&mut arena), Some(keys[1]));
        assert_eq!(queue.dequeue(&mut arena), Some(keys[2]));
        assert_eq!(queue.dequeue(&mut arena), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn delete_middle_relinks_neighbors() {
        let mut arena = Slab::new();
        let mut queue = OrdersQueue::new();
        let keys: Vec<usize> = (0..3).map(|id| insert_order(&mut arena, id)).collect();
        for &key in &keys {
            queue.enqueue(key, &mut arena);
        }

        queue.delete(keys[1], &mut arena);

        assert_eq!(queue.len(), 2);
        assert_eq!(arena[keys[0]].next, Some(keys[2]));
        assert_eq!(arena[keys[2]].prev, Some(keys[0]));
        assert!(arena[keys[1]].is_unlinked());
    }

    #[test]
    fn delete_head_and_tail() {
        let mut arena = Slab::new();
        let mut queue = OrdersQueue::new();
        let keys: Vec<usize> = (0..3).map(|id| insert_order(&mut arena, id)).collect();
        for &key in &keys {
            queue.enqueue(key, &mut arena);
        }

        queue.delete(keys[0], &mut arena);
        assert_eq!(queue.head(), Some(keys[1]));

        queue.delete(keys[2], &mut arena);
        assert_eq!(queue.tail(), Some(keys[1]));
        assert_eq!(queue.len(), 1);

        queue.delete(keys[1], &mut arena);
        assert!(queue.is_empty());
        assert_eq!(queue.head(), None);
        assert_eq!(queue.tail(), None);
    }

    #[test]
    fn removed_order_can_be_requeued() {
        let mut arena = Slab::new();
        let mut queue = OrdersQueue::new();
        let a = insert_order(&mut arena, 1);
        let b = insert_order(&mut arena, 2);
        queue.enqueue(a, &mut arena);
        queue.enqueue(b, &mut arena);

        queue.delete(a, &mut arena);
        queue.enqueue(a, &mut arena);

        let walked: Vec<usize> = queue.iter(&arena).collect();
        assert_eq!(walked, vec![b, a]);
    }
}
