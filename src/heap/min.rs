use rust_decimal::Decimal;

use super::error::HeapError;

/// Minimum-oriented priority queue over decimal keys.
///
/// Fixed capacity; keys live in a 1-indexed array so a node at position
/// `k` has its children at `2k` and `2k + 1`.
#[derive(Debug, Clone)]
pub struct MinHeap {
    keys: Vec<Decimal>,
    n: usize,
}

impl MinHeap {
    /// Creates a heap able to hold `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            keys: vec![Decimal::ZERO; capacity + 1],
            n: 0,
        }
    }

    /// Number of keys currently held.
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Number of keys the heap can hold.
    pub fn capacity(&self) -> usize {
        self.keys.len() - 1
    }

    /// Adds a key, restoring heap order in O(log N).
    pub fn insert(&mut self, key: Decimal) -> Result<(), HeapError> {
        if self.n == self.capacity() {
            return Err(HeapError::Full {
                capacity: self.capacity(),
            });
        }
        self.n += 1;
        self.keys[self.n] = key;
        self.swim(self.n);
        Ok(())
    }

    /// The minimum key.
    pub fn top(&self) -> Result<Decimal, HeapError> {
        if self.is_empty() {
            return Err(HeapError::Empty);
        }
        Ok(self.keys[1])
    }

    /// Removes and returns the minimum key.
    pub fn del_top(&mut self) -> Result<Decimal, HeapError> {
        if self.is_empty() {
            return Err(HeapError::Empty);
        }
        let top = self.keys[1];
        self.keys[1] = self.keys[self.n];
        self.n -= 1;
        self.sink(1);
        Ok(top)
    }

    fn swim(&mut self, mut k: usize) {
        while k > 1 && self.keys[k] < self.keys[k / 2] {
            self.keys.swap(k, k / 2);
            k /= 2;
        }
    }

    fn sink(&mut self, mut k: usize) {
        while 2 * k <= self.n {
            let mut child = 2 * k;
            if child < self.n && self.keys[child + 1] < self.keys[child] {
                child += 1;
            }
            if self.keys[child] >= self.keys[k] {
                break;
            }
            self.keys.swap(k, child);
            k = child;
        }
    }
}
