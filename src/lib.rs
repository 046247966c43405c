//! # Price-Time-Priority Order Book Core
//!
//! An in-memory limit order book core for a single trading instrument. The
//! book keeps two opposing sides of price levels, each level a FIFO queue
//! of resting orders, and answers top-of-book and per-level volume queries
//! in constant time.
//!
//! ## Key Features
//!
//! - **Threaded ordered indexes**: price levels live in a binary search
//!   tree whose nodes also form a doubly-linked list in key order, so the
//!   price ladder can be walked in either direction at O(1) per step. The
//!   contract ships twice: a plain BST baseline and the production
//!   left-leaning red–black tree with O(log N) worst-case bounds.
//!
//! - **O(1) best quote**: both indexes cache their extrema, so the best
//!   bid and best offer never touch the tree.
//!
//! - **Price-time priority**: orders at one price rest in an intrusive
//!   FIFO with O(1) enqueue, dequeue and arbitrary cancellation; better
//!   prices are reached through the ordered index.
//!
//! - **Order statistics**: rank, select, floor, ceiling and range scans
//!   over the resting prices in O(log N).
//!
//! - **Recycled levels**: emptied price levels return to a pool and are
//!   re-seated on the next insertion at a fresh price.
//!
//! - **Exact decimal arithmetic**: prices and volumes are
//!   [`rust_decimal::Decimal`]; volume sums are exact, and equal prices
//!   address the same level whatever their representation.
//!
//! ## Concurrency Model
//!
//! The book is single-writer by design: every mutation takes `&mut self`
//! and no internal locks are held. Readers that need consistent snapshots
//! while another thread writes should wrap the book in a reader-writer
//! lock whose write section spans the whole mutation.
//!
//! ## Example
//!
//! ```
//! use orderbook_core::{Order, OrderBook, Side};
//! use rust_decimal_macros::dec;
//!
//! let mut book = OrderBook::new();
//! book.add(dec!(100.5), Order::new(1, Side::Bid, dec!(0.1))).unwrap();
//! book.add(dec!(100.5), Order::new(2, Side::Bid, dec!(0.2))).unwrap();
//! book.add(dec!(101.0), Order::new(3, Side::Ask, dec!(1.0))).unwrap();
//!
//! assert_eq!(book.best_bid().unwrap(), dec!(100.5));
//! assert_eq!(book.best_offer().unwrap(), dec!(101.0));
//! assert_eq!(book.volume_at_bid_limit(dec!(100.5)), dec!(0.3));
//!
//! book.cancel(1).unwrap();
//! assert_eq!(book.volume_at_bid_limit(dec!(100.5)), dec!(0.2));
//! ```

pub mod heap;
pub mod level;
pub mod orderbook;
pub mod tree;

pub use heap::{HeapError, IndexedMinHeap, MinHeap};
pub use level::{LevelError, LimitOrder, Order, OrdersQueue, Side};
pub use orderbook::{LevelPool, OrderBook, OrderBookError, OrderBookSnapshot, MAX_PRICE_LEVELS};
pub use tree::{Bst, NodeId, OrderedIndex, RedBlackTree, TreeError};

// Re-export the decimal scalar the whole API is keyed by
pub use rust_decimal::Decimal;
