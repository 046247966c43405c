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
    /// Color of the incoming edge
    red: bool,
}

/// Left-leaning red–black binary search tree.
///
/// The production ordered index: every operation is O(log N) worst case.
/// Red edges always lean left, no node has two red child edges, and every
/// root-to-null path crosses the same number of black edges; the root edge
/// counts as black.
///
/// The in-order threading and the cached extrema are maintained across
/// every mutation. Rotations and color flips never reorder keys, so they
/// leave the threaded list alone; splicing happens only where a node
/// enters or leaves the tree.
#[derive(Debug)]
pub struct RedBlackTree<V> {
    arena: Slab<Node<V>>,
    root: Option<usize>,
    cached_min: Option<usize>,
    cached_max: Option<usize>,
}

impl<V> Default for RedBlackTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RedBlackTree<V> {
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

    /// Removes the smallest key.
    pub fn delete_min(&mut self) -> Result<(), TreeError> {
        let root = self.root.ok_or(TreeError::Empty)?;
        if !self.is_red(self.arena[root].left) && !self.is_red(self.arena[root].right) {
            self.arena[root].red = true;
        }
        self.root = self.delete_min_rec(root);
        if let Some(root) = self.root {
            self.arena[root].red = false;
        }
        Ok(())
    }

    /// Removes the largest key.
    pub fn delete_max(&mut self) -> Result<(), TreeError> {
        let root = self.root.ok_or(TreeError::Empty)?;
        if !self.is_red(self.arena[root].left) && !self.is_red(self.arena[root].right) {
            self.arena[root].red = true;
        }
        self.root = self.delete_max_rec(root);
        if let Some(root) = self.root {
            self.arena[root].red = false;
        }
        Ok(())
    }

    /// Certifies the red–black invariants: key order, subtree sizes, no
    /// right-leaning or doubled red edges, uniform black height, and a
    /// consistent threaded list with correct cached extrema.
    pub fn is_red_black(&self) -> bool {
        self.is_bst()
            && self.is_size_consistent()
            && self.is_23()
            && self.is_balanced()
            && self.is_threaded()
    }

    fn size_of(&self, id: Option<usize>) -> usize {
        id.map_or(0, |id| self.arena[id].size)
    }

    fn update_size(&mut self, id: usize) {
        let size = self.size_of(self.arena[id].left) + 1 + self.size_of(self.arena[id].right);
        self.arena[id].size = size;
    }

    fn is_red(&self, id: Option<usize>) -> bool {
        id.is_some_and(|id| self.arena[id].red)
    }

    fn left_of(&self, id: Option<usize>) -> Option<usize> {
        id.and_then(|id| self.arena[id].left)
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
            red: true,
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

    fn rotate_left(&mut self, h: usize) -> usize {
        let x = self.arena[h].right.expect("rotate_left needs a right child");
        self.arena[h].right = self.arena[x].left;
        self.arena[x].left = Some(h);
        self.arena[x].red = self.arena[h].red;
        self.arena[h].red = true;
        self.arena[x].size = self.arena[h].size;
        self.update_size(h);
        x
    }

    fn rotate_right(&mut self, h: usize) -> usize {
        let x = self.arena[h].left.expect("rotate_right needs a left child");
        self.arena[h].left = self.arena[x].right;
        self.arena[x].right = Some(h);
        self.arena[x].red = self.arena[h].red;
        self.arena[h].red = true;
        self.arena[x].size = self.arena[h].size;
        self.update_size(h);
        x
    }

    fn flip_colors(&mut self, h: usize) {
        self.arena[h].red = !self.arena[h].red;
        if let Some(left) = self.arena[h].left {
            self.arena[left].red = !self.arena[left].red;
        }
        if let Some(right) = self.arena[h].right {
            self.arena[right].red = !self.arena[right].red;
        }
    }

    /// The three upward rebalance transformations plus the size update,
    /// shared by insertion and the deletion walks.
    fn restore(&mut self, mut h: usize) -> usize {
        if self.is_red(self.arena[h].right) && !self.is_red(self.arena[h].left) {
            h = self.rotate_left(h);
        }
        if self.is_red(self.arena[h].left) && self.is_red(self.left_of(self.arena[h].left)) {
            h = self.rotate_right(h);
        }
        if self.is_red(self.arena[h].left) && self.is_red(self.arena[h].right) {
            self.flip_colors(h);
        }
        self.update_size(h);
        h
    }

    /// Borrows a red link so the left spine keeps a red on the way down.
    fn move_red_left(&mut self, mut h: usize) -> usize {
        self.flip_colors(h);
        if self.is_red(self.left_of(self.arena[h].right)) {
            let right = self.arena[h].right.expect("move_red_left needs a right child");
            let right = self.rotate_right(right);
            self.arena[h].right = Some(right);
            h = self.rotate_left(h);
            self.flip_colors(h);
        }
        h
    }

    /// Borrows a red link so the right spine keeps a red on the way down.
    fn move_red_right(&mut self, mut h: usize) -> usize {
        self.flip_colors(h);
        if self.is_red(self.left_of(self.arena[h].left)) {
            h = self.rotate_right(h);
            self.flip_colors(h);
        }
        h
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
        self.restore(h)
    }

    fn delete_min_rec(&mut self, mut h: usize) -> Option<usize> {
        if self.arena[h].left.is_none() {
            self.unthread(h);
            self.arena.remove(h);
            return None;
        }
        if !self.is_red(self.arena[h].left) && !self.is_red(self.left_of(self.arena[h].left)) {
            h = self.move_red_left(h);
        }
        let left = self.arena[h].left.expect("the left spine continues");
        self.arena[h].left = self.delete_min_rec(left);
        Some(self.restore(h))
    }

    fn delete_max_rec(&mut self, mut h: usize) -> Option<usize> {
        if self.is_red(self.arena[h].left) {
            h = self.rotate_right(h);
        }
        if self.arena[h].right.is_none() {
            self.unthread(h);
            self.arena.remove(h);
            return None;
        }
        if !self.is_red(self.arena[h].right) && !self.is_red(self.left_of(self.arena[h].right)) {
            h = self.move_red_right(h);
        }
        let right = self.arena[h].right.expect("the right spine continues");
        self.arena[h].right = self.delete_max_rec(right);
        Some(self.restore(h))
    }

    /// Swaps the key/value payloads of two nodes; structure, colors and
    /// thread links stay put.
    fn swap_entry(&mut self, a: usize, b: usize) {
        let (a, b) = self.arena.get2_mut(a, b).expect("distinct live nodes");
        std::mem::swap(&mut a.key, &mut b.key);
        std::mem::swap(&mut a.value, &mut b.value);
    }

    fn delete_rec(&mut self, mut h: usize, key: Decimal) -> Option<usize> {
        if key < self.arena[h].key {
            if !self.is_red(self.arena[h].left) && !self.is_red(self.left_of(self.arena[h].left)) {
                h = self.move_red_left(h);
            }
            let left = self.arena[h].left.expect("the search path continues left");
            self.arena[h].left = self.delete_rec(left, key);
        } else {
            if self.is_red(self.arena[h].left) {
                h = self.rotate_right(h);
            }
            if key == self.arena[h].key && self.arena[h].right.is_none() {
                self.unthread(h);
                self.arena.remove(h);
                return None;
            }
            if !self.is_red(self.arena[h].right) && !self.is_red(self.left_of(self.arena[h].right)) {
                h = self.move_red_right(h);
            }
            if key == self.arena[h].key {
                // Swap payloads with the in-order successor, then drop the
                // vacated node; its thread predecessor is this very node,
                // so the splice in delete_min_rec reconnects the list.
                let right = self.arena[h].right.expect("an interior key has a successor");
                let successor = self.leftmost(right);
                self.swap_entry(h, successor);
                self.arena[h].right = self.delete_min_rec(right);
            } else {
                let right = self.arena[h].right.expect("the search path continues right");
                self.arena[h].right = self.delete_rec(right, key);
            }
        }
        Some(self.restore(h))
    }

    fn leftmost(&self, h: usize) -> usize {
        match self.arena[h].left {
            Some(left) => self.leftmost(left),
            None => h,
        }
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
            return self.floor_rec(self.arena[h].left, key);
        }
        self.floor_rec(self.arena[h].right, key).or(Some(h))
    }

    fn ceiling_rec(&self, h: Option<usize>, key: Decimal) -> Option<usize> {
        let h = h?;
        let hkey = self.arena[h].key;
        if key == hkey {
            return Some(h);
        }
        if hkey < key {
            return self.ceiling_rec(self.arena[h].right, key);
        }
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

    fn is_bst(&self) -> bool {
        self.is_bst_rec(self.root, None, None)
    }

    fn is_bst_rec(&self, h: Option<usize>, lo: Option<Decimal>, hi: Option<Decimal>) -> bool {
        let Some(h) = h else { return true };
        let key = self.arena[h].key;
        if lo.is_some_and(|lo| key <= lo) || hi.is_some_and(|hi| key >= hi) {
            return false;
        }
        self.is_bst_rec(self.arena[h].left, lo, Some(key))
            && self.is_bst_rec(self.arena[h].right, Some(key), hi)
    }

    fn is_size_consistent(&self) -> bool {
        self.is_size_consistent_rec(self.root)
    }

    fn is_size_consistent_rec(&self, h: Option<usize>) -> bool {
        let Some(h) = h else { return true };
        let node = &self.arena[h];
        node.size == self.size_of(node.left) + 1 + self.size_of(node.right)
            && self.is_size_consistent_rec(node.left)
            && self.is_size_consistent_rec(node.right)
    }

    /// No right-leaning red edge, no node with two consecutive red edges.
    fn is_23(&self) -> bool {
        self.is_23_rec(self.root)
    }

    fn is_23_rec(&self, h: Option<usize>) -> bool {
        let Some(h) = h else { return true };
        let node = &self.arena[h];
        if self.is_red(node.right) {
            return false;
        }
        if Some(h) != self.root && node.red && self.is_red(node.left) {
            return false;
        }
        self.is_23_rec(node.left) && self.is_23_rec(node.right)
    }

    /// Every root-to-null path crosses the same number of black edges.
    fn is_balanced(&self) -> bool {
        let mut black = 0;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            if !self.arena[id].red {
                black += 1;
            }
            cursor = self.arena[id].left;
        }
        self.is_balanced_rec(self.root, black)
    }

    fn is_balanced_rec(&self, h: Option<usize>, black: i64) -> bool {
        let Some(h) = h else { return black == 0 };
        let node = &self.arena[h];
        let black = if node.red { black } else { black - 1 };
        self.is_balanced_rec(node.left, black) && self.is_balanced_rec(node.right, black)
    }

    /// The threaded list visits every node exactly once in strictly
    /// ascending key order, starting at the cached minimum and ending at
    /// the cached maximum.
    fn is_threaded(&self) -> bool {
        let Some(start) = self.cached_min else {
            return self.root.is_none() && self.cached_max.is_none();
        };
        if self.arena[start].prev.is_some() {
            return false;
        }
        let mut cursor = start;
        let mut visited = 1;
        while let Some(next) = self.arena[cursor].next {
            if self.arena[next].key <= self.arena[cursor].key {
                return false;
            }
            if self.arena[next].prev != Some(cursor) {
                return false;
            }
            cursor = next;
            visited += 1;
        }
        visited == self.size() && Some(cursor) == self.cached_max
    }
}

impl<V> OrderedIndex<V> for RedBlackTree<V> {
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
        let root = self.put_rec(self.root, key, value);
        self.arena[root].red = false;
        self.root = Some(root);
    }

    fn delete(&mut self, key: Decimal) -> Result<(), TreeError> {
        let root = self.root.ok_or(TreeError::Empty)?;
        if !self.contains(key) {
            return Ok(());
        }
        if !self.is_red(self.arena[root].left) && !self.is_red(self.arena[root].right) {
            self.arena[root].red = true;
        }
        self.root = self.delete_rec(root, key);
        if let Some(root) = self.root {
            self.arena[root].red = false;
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rust_decimal_macros::dec;

    fn random_key(rng: &mut impl Rng) -> Decimal {
        Decimal::try_from(rng.gen::<f64>()).unwrap()
    }

    fn assert_ascending(tree: &RedBlackTree<()>) {
        let keys: Vec<Decimal> = tree.iter().map(|(key, _)| key).collect();
        assert_eq!(keys.len(), tree.size());
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(keys.first().copied(), tree.min().ok());
        assert_eq!(keys.last().copied(), tree.max().ok());
    }

    #[test]
    fn empty_tree() {
        let mut tree: RedBlackTree<()> = RedBlackTree::new();
        assert_eq!(tree.size(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.min(), Err(TreeError::Empty));
        assert_eq!(tree.max(), Err(TreeError::Empty));
        assert_eq!(tree.delete_min(), Err(TreeError::Empty));
        assert_eq!(tree.delete_max(), Err(TreeError::Empty));
        assert!(tree.is_red_black());
    }

    #[test]
    fn put_and_contains_random_keys() {
        let mut rng = rand::thread_rng();
        let mut tree = RedBlackTree::new();
        let mut keys = Vec::new();
        while keys.len() < 10 {
            let key = random_key(&mut rng);
            if !tree.contains(key) {
                keys.push(key);
                tree.put(key, ());
            }
        }

        assert_eq!(tree.size(), 10);
        for key in keys {
            assert!(tree.contains(key));
        }
        assert!(tree.is_red_black());
    }

    #[test]
    fn height_stays_within_red_black_bounds() {
        let mut rng = rand::thread_rng();
        let mut tree = RedBlackTree::new();
        let n = 100_000;
        for _ in 0..n {
            tree.put(random_key(&mut rng), ());
        }

        assert_eq!(tree.size(), n);
        let height = tree.height();
        assert!(
            (17..=34).contains(&height),
            "height {} outside [lg N, 2 lg N] for N = {}",
            height,
            n
        );
    }

    #[test]
    fn min_max_after_descending_inserts() {
        let mut tree = RedBlackTree::new();
        for i in 0..10i64 {
            tree.put(Decimal::from(10 - i), ());
        }
        assert_eq!(tree.min(), Ok(dec!(1)));
        assert_eq!(tree.max(), Ok(dec!(10)));
    }

    #[test]
    fn extrema_stay_cached_through_delete_churn() {
        let mut tree = RedBlackTree::new();
        for i in 0..100i64 {
            tree.put(Decimal::from(100 - i), ());
        }
        assert_eq!(tree.min(), Ok(dec!(1)));
        assert_eq!(tree.max(), Ok(dec!(100)));

        tree.delete_min().unwrap();
        tree.delete_min().unwrap();
        for i in 3..20i64 {
            tree.delete(Decimal::from(i)).unwrap();
        }
        tree.delete_max().unwrap();
        tree.delete_max().unwrap();
        for i in (71..=98i64).rev() {
            tree.delete(Decimal::from(i)).unwrap();
        }

        assert_eq!(tree.min(), Ok(dec!(20)));
        assert_eq!(tree.max(), Ok(dec!(70)));
        assert!(tree.is_red_black());
    }

    #[test]
    fn scenario_descending_ten_keys() {
        let mut tree = RedBlackTree::new();
        for i in (1..=10i64).rev() {
            tree.put(Decimal::from(i), ());
        }
        assert_eq!(tree.size(), 10);
        assert_eq!(tree.min(), Ok(dec!(1)));
        assert_eq!(tree.max(), Ok(dec!(10)));
        assert_eq!(tree.select(2), Ok(dec!(3)));
        assert_eq!(tree.rank(dec!(5)), 4);
        assert_eq!(
            tree.keys(dec!(3), dec!(6)),
            Ok(vec![dec!(3), dec!(4), dec!(5), dec!(6)])
        );
    }

    #[test]
    fn floor_and_ceiling_between_even_keys() {
        let mut tree = RedBlackTree::new();
        for key in [20, 18, 16, 14, 12, 10, 8, 6, 4, 2] {
            tree.put(Decimal::from(key), ());
        }
        assert_eq!(tree.floor(dec!(3)), Ok(dec!(2)));
        assert_eq!(tree.ceiling(dec!(3)), Ok(dec!(4)));
        assert_eq!(tree.floor(dec!(10)), Ok(dec!(10)));
        assert_eq!(tree.ceiling(dec!(10)), Ok(dec!(10)));
        assert_eq!(tree.floor(dec!(1)), Err(TreeError::KeyNotFound(dec!(1))));
        assert_eq!(tree.ceiling(dec!(21)), Err(TreeError::KeyNotFound(dec!(21))));
    }

    #[test]
    fn select_and_rank_are_dual() {
        let mut rng = rand::thread_rng();
        let mut tree = RedBlackTree::new();
        for _ in 0..200 {
            tree.put(random_key(&mut rng), ());
        }
        for rank in 0..tree.size() {
            let key = tree.select(rank).unwrap();
            assert_eq!(tree.rank(key), rank);
        }
        let size = tree.size();
        assert_eq!(
            tree.select(size),
            Err(TreeError::RankOutOfRange { rank: size, size })
        );
    }

    #[test]
    fn keys_rejects_ranges_outside_the_tree() {
        let mut tree = RedBlackTree::new();
        for i in 1..=10i64 {
            tree.put(Decimal::from(i), ());
        }
        assert_eq!(
            tree.keys(dec!(0.5), dec!(6)),
            Err(TreeError::RangeOutOfBounds {
                lo: dec!(0.5),
                hi: dec!(6)
            })
        );
        assert_eq!(
            tree.keys(dec!(2), dec!(10.5)),
            Err(TreeError::RangeOutOfBounds {
                lo: dec!(2),
                hi: dec!(10.5)
            })
        );
        let empty: RedBlackTree<()> = RedBlackTree::new();
        assert_eq!(empty.keys(dec!(1), dec!(2)), Err(TreeError::Empty));
    }

    #[test]
    fn delete_min_keeps_invariants() {
        let mut rng = rand::thread_rng();
        let mut tree = RedBlackTree::new();
        for _ in 0..100 {
            tree.put(random_key(&mut rng), ());
        }
        while tree.size() > 1 {
            let old_min = tree.min().unwrap();
            tree.delete_min().unwrap();
            assert!(tree.min().unwrap() > old_min);
            assert!(tree.is_red_black());
        }
        tree.delete_min().unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.min_id(), None);
        assert_eq!(tree.max_id(), None);
    }

    #[test]
    fn delete_max_keeps_invariants() {
        let mut rng = rand::thread_rng();
        let mut tree = RedBlackTree::new();
        for _ in 0..100 {
            tree.put(random_key(&mut rng), ());
        }
        while tree.size() > 1 {
            let old_max = tree.max().unwrap();
            tree.delete_max().unwrap();
            assert!(tree.max().unwrap() < old_max);
            assert!(tree.is_red_black());
        }
        tree.delete_max().unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn delete_each_key_in_random_order() {
        let mut rng = rand::thread_rng();
        let mut tree = RedBlackTree::new();
        let mut keys = Vec::new();
        while keys.len() < 50 {
            let key = random_key(&mut rng);
            if !tree.contains(key) {
                keys.push(key);
                tree.put(key, ());
            }
        }

        while !keys.is_empty() {
            let key = keys.swap_remove(rng.gen_range(0..keys.len()));
            tree.delete(key).unwrap();
            assert!(!tree.contains(key));
            assert!(tree.is_red_black());
            assert_eq!(tree.size(), keys.len());
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn delete_missing_key_is_a_no_op() {
        let mut tree = RedBlackTree::new();
        for i in 1..=8i64 {
            tree.put(Decimal::from(i), ());
        }
        tree.delete(dec!(42)).unwrap();
        assert_eq!(tree.size(), 8);
        assert!(tree.is_red_black());
    }

    #[test]
    fn threaded_list_ascends_after_random_puts() {
        let mut rng = rand::thread_rng();
        let mut tree = RedBlackTree::new();
        for _ in 0..100 {
            tree.put(random_key(&mut rng), ());
        }
        assert_ascending(&tree);
    }

    #[test]
    fn threaded_list_survives_delete_churn() {
        let mut rng = rand::thread_rng();
        let mut tree = RedBlackTree::new();
        let n = 1_000;
        for _ in 0..n {
            tree.put(random_key(&mut rng), ());
        }
        let rounds = 300;
        for _ in 0..rounds {
            tree.delete_min().unwrap();
            let key = tree.select(rng.gen_range(0..tree.size())).unwrap();
            tree.delete(key).unwrap();
            tree.delete_max().unwrap();
        }

        assert_eq!(tree.size(), n - 3 * rounds);
        assert_ascending(&tree);
        assert!(tree.is_red_black());
    }

    #[test]
    fn certification_holds_after_every_operation() {
        let mut rng = rand::thread_rng();
        let mut tree = RedBlackTree::new();
        let mut present: Vec<Decimal> = Vec::new();
        for step in 0..400 {
            if present.is_empty() || step % 3 != 0 {
                let key = random_key(&mut rng);
                tree.put(key, ());
                if !present.contains(&key) {
                    present.push(key);
                }
            } else {
                let key = present.swap_remove(rng.gen_range(0..present.len()));
                tree.delete(key).unwrap();
            }
            assert!(tree.is_red_black(), "invariants broken at step {}", step);
            assert_eq!(tree.size(), present.len());
        }
    }

    #[test]
    fn values_survive_interior_deletes() {
        let mut tree = RedBlackTree::new();
        for i in 1..=9i64 {
            tree.put(Decimal::from(i), i * 100);
        }
        tree.delete(dec!(5)).unwrap();
        tree.delete(dec!(1)).unwrap();
        tree.delete(dec!(9)).unwrap();

        for i in [2i64, 3, 4, 6, 7, 8] {
            assert_eq!(tree.get(Decimal::from(i)), Ok(&(i * 100)));
        }
        assert_eq!(tree.get(dec!(5)), Err(TreeError::KeyNotFound(dec!(5))));
    }

    #[test]
    fn ladder_handles_walk_both_directions() {
        let mut tree = RedBlackTree::new();
        for i in 1..=6i64 {
            tree.put(Decimal::from(i), ());
        }

        let mut up = Vec::new();
        let mut cursor = tree.min_id();
        while let Some(id) = cursor {
            up.push(tree.key_at(id));
            cursor = tree.next_id(id);
        }
        assert_eq!(up, (1..=6i64).map(Decimal::from).collect::<Vec<_>>());

        let mut down = Vec::new();
        let mut cursor = tree.max_id();
        while let Some(id) = cursor {
            down.push(tree.key_at(id));
            cursor = tree.prev_id(id);
        }
        assert_eq!(down, (1..=6i64).rev().map(Decimal::from).collect::<Vec<_>>());
    }
}
