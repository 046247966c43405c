//! Heap error types

use std::fmt;

/// Errors that can occur within a heap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The heap already holds `capacity` keys
    Full {
        /// Fixed capacity of the heap
        capacity: usize,
    },
    /// The heap holds no keys
    Empty,
    /// A slot outside `[0, capacity)` was named
    SlotOutOfRange {
        /// The offending slot
        slot: usize,
        /// Fixed capacity of the heap
        capacity: usize,
    },
    /// The slot already holds a key
    SlotOccupied(usize),
    /// The slot holds no key
    SlotMissing(usize),
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::Full { capacity } => write!(f, "the heap is full (capacity {})", capacity),
            HeapError::Empty => write!(f, "the heap is empty"),
            HeapError::SlotOutOfRange { slot, capacity } => {
                write!(f, "slot {} is out of range for capacity {}", slot, capacity)
            }
            HeapError::SlotOccupied(slot) => write!(f, "slot {} already holds a key", slot),
            HeapError::SlotMissing(slot) => write!(f, "slot {} holds no key", slot),
        }
    }
}

impl std::error::Error for HeapError {}
