use rust_decimal::Decimal;

use super::error::HeapError;

/// Minimum-oriented priority queue with slot indexing.
///
/// Caller-chosen slots in `[0, capacity)` identify keys; a bijection
/// between slots and heap positions lets a key be re-keyed or removed by
/// slot in O(log N). Keys live in a 1-indexed array.
#[derive(Debug, Clone)]
pub struct IndexedMinHeap {
    /// Key at each heap position, `keys[1..=n]`
    keys: Vec<Decimal>,
    /// Heap position -> slot
    pos_to_slot: Vec<usize>,
    /// Slot -> heap position, `None` while the slot holds no key
    slot_to_pos: Vec<Option<usize>>,
    n: usize,
}

impl IndexedMinHeap {
    /// Creates a heap with slots `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            keys: vec![Decimal::ZERO; capacity + 1],
            pos_to_slot: vec![0; capacity + 1],
            slot_to_pos: vec![None; capacity],
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

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slot_to_pos.len()
    }

    /// Whether the slot holds a key.
    pub fn contains(&self, slot: usize) -> Result<bool, HeapError> {
        self.check_slot(slot)?;
        Ok(self.slot_to_pos[slot].is_some())
    }

    /// Associates the key with the slot, restoring heap order in O(log N).
    pub fn insert(&mut self, slot: usize, key: Decimal) -> Result<(), HeapError> {
        self.check_slot(slot)?;
        if self.slot_to_pos[slot].is_some() {
            return Err(HeapError::SlotOccupied(slot));
        }
        if self.n == self.capacity() {
            return Err(HeapError::Full {
                capacity: self.capacity(),
            });
        }
        self.n += 1;
        self.keys[self.n] = key;
        self.pos_to_slot[self.n] = slot;
        self.slot_to_pos[slot] = Some(self.n);
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

    /// Slot of the minimum key.
    pub fn top_slot(&self) -> Result<usize, HeapError> {
        if self.is_empty() {
            return Err(HeapError::Empty);
        }
        Ok(self.pos_to_slot[1])
    }

    /// Removes the minimum key and returns the slot it vacated.
    pub fn del_top(&mut self) -> Result<usize, HeapError> {
        if self.is_empty() {
            return Err(HeapError::Empty);
        }
        let slot = self.pos_to_slot[1];
        self.exchange(1, self.n);
        self.n -= 1;
        self.sink(1);
        self.slot_to_pos[slot] = None;
        Ok(slot)
    }

    /// Re-keys the slot and restores heap order in both directions.
    pub fn change(&mut self, slot: usize, key: Decimal) -> Result<(), HeapError> {
        self.check_slot(slot)?;
        let pos = self.slot_to_pos[slot].ok_or(HeapError::SlotMissing(slot))?;
        self.keys[pos] = key;
        self.swim(pos);
        let pos = self.slot_to_pos[slot].expect("slot stays present across a re-key");
        self.sink(pos);
        Ok(())
    }

    /// Removes the key held by the slot.
    pub fn delete(&mut self, slot: usize) -> Result<(), HeapError> {
        self.check_slot(slot)?;
        let pos = self.slot_to_pos[slot].ok_or(HeapError::SlotMissing(slot))?;
        self.exchange(pos, self.n);
        self.n -= 1;
        if pos <= self.n {
            self.swim(pos);
            self.sink(pos);
        }
        self.slot_to_pos[slot] = None;
        Ok(())
    }

    fn check_slot(&self, slot: usize) -> Result<(), HeapError> {
        if slot >= self.capacity() {
            return Err(HeapError::SlotOutOfRange {
                slot,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    fn exchange(&mut self, a: usize, b: usize) {
        self.keys.swap(a, b);
        self.pos_to_slot.swap(a, b);
        self.slot_to_pos[self.pos_to_slot[a]] = Some(a);
        self.slot_to_pos[self.pos_to_slot[b]] = Some(b);
    }

    fn swim(&mut self, mut k: usize) {
        while k > 1 && self.keys[k] < self.keys[k / 2] {
            self.exchange(k, k / 2);
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
            self.exchange(k, child);
            k = child;
        }
    }
}
