//! Minimum-oriented binary heaps over decimal keys.
//!
//! [`MinHeap`] is the plain fixed-capacity variant; [`IndexedMinHeap`]
//! adds a bijection between caller-chosen slots and heap positions, so a
//! key can be re-keyed or removed by slot in O(log N). Both use 1-indexed
//! array storage.

mod error;
mod indexed;
mod min;

pub use error::HeapError;
pub use indexed::IndexedMinHeap;
pub use min::MinHeap;
