use rust_decimal::Decimal;
use slab::Slab;

use super::error::TreeError;
use super::{NodeId, OrderedIndex};

#[derive(Debug)]
struct Node<V> {
    key: Decimal,
    value: V,
    left: Option<usize>,
    right: Option<usize>,
    prev: Option<usize>,
    next: Option<usize>,
    size: usize,
}

/// Plain binary search tree, not self-balancing.
///
/// Adequate for randomly ordered input; the baseline against which the
/// red–black variant is measured. Shares the threaded-list and cached
/// extrema behavior of [`super::RedBlackTree`].
#[derive(Debug)]
pub struct Bst<V> {
    arena: Slab<Node<V>>,
    root: Option<usize>,
    cached_min: Option<usize>,
    cached_max: Option<usize>,
}

impl<V> Default for Bst<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Bst<V> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            arena: Slab::new(),
            root: None,
            cached_min: None,
            cached_max: None,
        }
    }

    /// Creates an empty tree with preallocated node storage.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Slab::with_capacity(capacity),
            root: None,
            cached_min: None,
            cached_max: None,
        }
    }

    fn size_of(&self, id: Option<usize>) -> usize {
        id.map_or(0, |id| self.arena[id].size)
    }

    fn update_size(&mut self, id: usize) {
        let size = self.size_of(self.arena[id].left) + 1 + self.size_of(self.arena[id].right);
        self.arena[id].size = size;
    }

    fn new_node(&mut self, key: Decimal, value: V) -> usize {
        let id = self.arena.insert(Node {
            key,
            value,
            left: None,
            right: None,
            prev: None,
            next: None,
            size: 1,
        });
        if self.cached_min.is_none_or(|min| key < self.arena[min].key) {
            self.cached_min = Some(id);
        }
        if self.cached_max.is_none_or(|max| key > self.arena[max].key) {
            self.cached_max = Some(id);
        }
        id
    }

    /// Links a freshly attached left child between its parent's
    /// predecessor and the parent.
    fn thread_before(&mut self, id: usize, parent: usize) {
        let prev = self.arena[parent].prev;
        if let Some(prev) = prev {
            self.arena[prev].next = Some(id);
        }
        self.arena[id].prev = prev;
        self.arena[id].next = Some(parent);
        self.arena[parent].prev = Some(id);
    }

    /// Links a freshly attached right child between the parent and its
    /// successor.
    fn thread_after(&mut self, id: usize, parent: usize) {
        let next = self.arena[parent].next;
        if let Some(next) = next {
            self.arena[next].prev = Some(id);
        }
        self.arena[id].next = next;
        self.arena[id].prev = Some(parent);
        self.arena[parent].next = Some(id);
    }

    /// Splices the node out of the threaded list and moves the cached
    /// extrema inward when an extremum is leaving.
    fn unthread(&mut self, id: usize) {
        let prev = self.arena[id].prev;
        let next = self.arena[id].next;
        if let Some(prev) = prev {
            self.arena[prev].next = next;
        }
        if let Some(next) = next {
            self.arena[next].prev = prev;
        }
        if self.cached_min == Some(id) {
            self.cached_min = next;
        }
        if self.cached_max == Some(id) {
            self.cached_max = prev;
        }
        self.arena[id].prev = None;
        self.arena[id].next = None;
    }

    fn find(&self, key: Decimal) -> Option<usize> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.arena[id];
            if key == node.key {
                return Some(id);
            }
            cursor = if key < node.key { node.left } else { node.right };
        }
        None
    }

    fn put_rec(&mut self, h: Option<usize>, key: Decimal, value: V) -> usize {
        let Some(h) = h else {
            return self.new_node(key, value);
        };
        let hkey = self.arena[h].key;
        if key == hkey {
            self.arena[h].value = value;
            return h;
        }
        if key < hkey {
            let left = self.arena[h].left;
            let child = self.put_rec(left, key, value);
            self.arena[h].left = Some(child);
            if left.is_none() {
                self.thread_before(child, h);
            }
        } else {
            let right = self.arena[h].right;
            let child = self.put_rec(right, key, value);
            self.arena[h].right = Some(child);
            if right.is_none() {
                self.thread_after(child, h);
            }
        }
        self.update_size(h);
        h
    }

    fn height_rec(&self, h: Option<usize>) -> usize {
        let Some(h) = h else { return 0 };
        let left = self.height_rec(self.arena[h].left);
        let right = self.height_rec(self.arena[h].right);
        left.max(right) + 1
    }

    fn floor_rec(&self, h: Option<usize>, key: Decimal) -> Option<usize> {
        let h = h?;
        let hkey = self.arena[h].key;
        if key == hkey {
            return Some(h);
        }
        if hkey > key {
            // the floor can only sit in the left subtree
            return self.floor_rec(self.arena[h].left, key);
        }
        // the floor may sit in the right subtree; this node otherwise
        self.floor_rec(self.arena[h].right, key).or(Some(h))
    }

    fn ceiling_rec(&self, h: Option<usize>, key: Decimal) -> Option<usize> {
        let h = h?;
        let hkey = self.arena[h].key;
        if key == hkey {
            return Some(h);
        }
        if hkey < key {
            // the ceiling can only sit in the right subtree
            return self.ceiling_rec(self.arena[h].right, key);
        }
        // the ceiling may sit in the left subtree; this node otherwise
        self.ceiling_rec(self.arena[h].left, key).or(Some(h))
    }

    fn select_rec(&self, h: usize, rank: usize) -> usize {
        let left = self.size_of(self.arena[h].left);
        if left == rank {
            h
        } else if left > rank {
            let child = self.arena[h].left.expect("rank lies in the left subtree");
            self.select_rec(child, rank)
        } else {
            let child = self.arena[h].right.expect("rank lies in the right subtree");
            self.select_rec(child, rank - left - 1)
        }
    }

    fn rank_rec(&self, h: Option<usize>, key: Decimal) -> usize {
        let Some(h) = h else { return 0 };
        let node = &self.arena[h];
        if key == node.key {
            self.size_of(node.left)
        } else if key < node.key {
            self.rank_rec(node.left, key)
        } else {
            self.size_of(node.left) + 1 + self.rank_rec(node.right, key)
        }
    }

    fn keys_rec(&self, h: Option<usize>, lo: Decimal, hi: Decimal, out: &mut Vec<Decimal>) {
        let Some(h) = h else { return };
        let node = &self.arena[h];
        if node.key < lo {
            return self.keys_rec(node.right, lo, hi, out);
        }
        if node.key > hi {
            return self.keys_rec(node.left, lo, hi, out);
        }
        let (key, left, right) = (node.key, node.left, node.right);
        self.keys_rec(left, lo, hi, out);
        out.push(key);
        self.keys_rec(right, lo, hi, out);
    }

    fn leftmost(&self, h: usize) -> usize {
        match self.arena[h].left {
            Some(left) => self.leftmost(left),
            None => h,
        }
    }

    /// Detaches the minimum of the subtree structurally. The thread links
    /// of the detached node are left alone: the node keeps its place in
    /// the key order when it is lifted into the deleted slot.
    fn detach_min(&mut self, h: usize) -> Option<usize> {
        let Some(left) = self.arena[h].left else {
            return self.arena[h].right;
        };
        let rest = self.detach_min(left);
        self.arena[h].left = rest;
        self.update_size(h);
        Some(h)
    }

    fn delete_rec(&mut self, h: Option<usize>, key: Decimal) -> Option<usize> {
        let h = h?;
        let hkey = self.arena[h].key;
        if key == hkey {
            self.unthread(h);
            let left = self.arena[h].left;
            let right = self.arena[h].right;
            return match (left, right) {
                (None, right) => {
                    self.arena.remove(h);
                    right
                }
                (left, None) => {
                    self.arena.remove(h);
                    left
                }
                (Some(left), Some(right)) => {
                    // replace by the in-order successor
                    let successor = self.leftmost(right);
                    let rest = self.detach_min(right);
                    self.arena[successor].right = rest;
                    self.arena[successor].left = Some(left);
                    self.update_size(successor);
                    self.arena.remove(h);
                    Some(successor)
                }
            };
        }
        if key < hkey {
            let left = self.arena[h].left;
            self.arena[h].left = self.delete_rec(left, key);
        } else {
            let right = self.arena[h].right;
            self.arena[h].right = self.delete_rec(right, key);
        }
        self.update_size(h);
        Some(h)
    }
}

impl<V> OrderedIndex<V> for Bst<V> {
    fn size(&self) -> usize {
        self.size_of(self.root)
    }

    fn height(&self) -> usize {
        self.height_rec(self.root)
    }

    fn contains(&self, key: Decimal) -> bool {
        self.find(key).is_some()
    }

    fn get(&self, key: Decimal) -> Result<&V, TreeError> {
        if self.is_empty() {
            return Err(TreeError::Empty);
        }
        let id = self.find(key).ok_or(TreeError::KeyNotFound(key))?;
        Ok(&self.arena[id].value)
    }

    fn put(&mut self, key: Decimal, value: V) {
        self.root = Some(self.put_rec(self.root, key, value));
    }

    fn delete(&mut self, key: Decimal) -> Result<(), TreeError> {
        if self.is_empty() {
            return Err(TreeError::Empty);
        }
        self.root = self.delete_rec(self.root, key);
        Ok(())
    }

    fn min(&self) -> Result<Decimal, TreeError> {
        self.cached_min
            .map(|id| self.arena[id].key)
            .ok_or(TreeError::Empty)
    }

    fn max(&self) -> Result<Decimal, TreeError> {
        self.cached_max
            .map(|id| self.arena[id].key)
            .ok_or(TreeError::Empty)
    }

    fn min_value(&self) -> Result<&V, TreeError> {
        match self.cached_min {
            Some(id) => Ok(&self.arena[id].value),
            None => Err(TreeError::Empty),
        }
    }

    fn max_value(&self) -> Result<&V, TreeError> {
        match self.cached_max {
            Some(id) => Ok(&self.arena[id].value),
            None => Err(TreeError::Empty),
        }
    }

    fn min_id(&self) -> Option<NodeId> {
        self.cached_min.map(NodeId)
    }

    fn max_id(&self) -> Option<NodeId> {
        self.cached_max.map(NodeId)
    }

    fn next_id(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id.0].next.map(NodeId)
    }

    fn prev_id(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id.0].prev.map(NodeId)
    }

    fn key_at(&self, id: NodeId) -> Decimal {
        self.arena[id.0].key
    }

    fn value_at(&self, id: NodeId) -> &V {
        &self.arena[id.0].value
    }

    fn floor(&self, key: Decimal) -> Result<Decimal, TreeError> {
        if self.is_empty() {
            return Err(TreeError::Empty);
        }
        self.floor_rec(self.root, key)
            .map(|id| self.arena[id].key)
            .ok_or(TreeError::KeyNotFound(key))
    }

    fn ceiling(&self, key: Decimal) -> Result<Decimal, TreeError> {
        if self.is_empty() {
            return Err(TreeError::Empty);
        }
        self.ceiling_rec(self.root, key)
            .map(|id| self.arena[id].key)
            .ok_or(TreeError::KeyNotFound(key))
    }

    fn select(&self, rank: usize) -> Result<Decimal, TreeError> {
        if rank >= self.size() {
            return Err(TreeError::RankOutOfRange {
                rank,
                size: self.size(),
            });
        }
        let root = self.root.expect("a tree with keys has a root");
        Ok(self.arena[self.select_rec(root, rank)].key)
    }

    fn rank(&self, key: Decimal) -> usize {
        self.rank_rec(self.root, key)
    }

    fn keys(&self, lo: Decimal, hi: Decimal) -> Result<Vec<Decimal>, TreeError> {
        let min = self.min()?;
        let max = self.max()?;
        if lo < min || hi > max {
            return Err(TreeError::RangeOutOfBounds { lo, hi });
        }
        let mut out = Vec::new();
        self.keys_rec(self.root, lo, hi, &mut out);
        Ok(out)
    }
}
