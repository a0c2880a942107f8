//! Self-balancing ordered map (§4.4): wraps [`Bst`] and re-applies the four
//! rotation cases on the path back to the root after every insert/delete,
//! mirroring how the teacher's own AVL tree rebalances on the way back up
//! the recursive call stack after `insert`/`remove` — only here the walk
//! back up is explicit, over parent links in the arena, rather than implicit
//! in the call stack.

use crate::arena::NodeId;
use crate::comparator::Comparator;
use crate::core::{DeleteOutcome, TreeCore};
use crate::iteration::{DfsOrder, IterationType, TraversalOptions};
use crate::node::{FamilyPosition, Node};
use crate::options::OrderedOptions;
use crate::bst::Bst;

/// A height-balanced ordered map: invariant 6 (`|bf(n)| <= 1` for every
/// node) holds after every `add`/`delete`, guaranteeing `O(log n)` height.
#[derive(Clone)]
pub struct AvlTree<K, V> {
    inner: Bst<K, V>,
}

impl<K: Ord + Clone + 'static, V: Clone> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + 'static, V: Clone> AvlTree<K, V> {
    pub fn new() -> Self {
        AvlTree { inner: Bst::new() }
    }

    pub fn with_comparator(comparator: Comparator<K>) -> Self {
        AvlTree { inner: Bst::with_comparator(comparator) }
    }

    pub fn with_options(opts: OrderedOptions<K>) -> Self {
        AvlTree { inner: Bst::with_options(opts) }
    }

    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear()
    }

    pub fn root(&self) -> Option<&Node<K, V>> {
        self.inner.root()
    }

    fn core(&self) -> &TreeCore<K, V> {
        &self.inner.core
    }

    fn core_mut(&mut self) -> &mut TreeCore<K, V> {
        &mut self.inner.core
    }

    fn balance_factor(&self, id: NodeId) -> i32 {
        self.core().node_height(self.core().left_id(id)) - self.core().node_height(self.core().right_id(id))
    }

    /// Left rotation plus the height fixups the bare [`TreeCore::rotate_left`]
    /// primitive leaves for its caller (§4.4 item 3).
    fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let y = self.core_mut().rotate_left(x);
        self.core_mut().recompute_height(x);
        self.core_mut().recompute_height(y);
        self.core().debug_assert_well_formed(x);
        self.core().debug_assert_well_formed(y);
        y
    }

    fn rotate_right(&mut self, x: NodeId) -> NodeId {
        let y = self.core_mut().rotate_right(x);
        self.core_mut().recompute_height(x);
        self.core_mut().recompute_height(y);
        self.core().debug_assert_well_formed(x);
        self.core().debug_assert_well_formed(y);
        y
    }

    /// Left-left case: a single right rotation around `id`.
    fn rotate_left_left(&mut self, id: NodeId) -> NodeId {
        self.rotate_right(id)
    }

    /// Right-right case: a single left rotation around `id`.
    fn rotate_right_right(&mut self, id: NodeId) -> NodeId {
        self.rotate_left(id)
    }

    /// Left-right case: rotate the left child left, then rotate `id` right.
    fn rotate_left_right(&mut self, id: NodeId) -> NodeId {
        let left = self.core().left_id(id).expect("bf > 1 implies a left child");
        self.rotate_left(left);
        self.rotate_right(id)
    }

    /// Right-left case: rotate the right child right, then rotate `id` left.
    fn rotate_right_left(&mut self, id: NodeId) -> NodeId {
        let right = self.core().right_id(id).expect("bf < -1 implies a right child");
        self.rotate_right(right);
        self.rotate_left(id)
    }

    /// Walks from `start` up to the root, recomputing heights and applying
    /// the rotation whose case matches the sign of the balance factor and
    /// of the heavier child's own balance factor — the four LL/LR/RR/RL
    /// cases from the textbook AVL rebalance.
    fn rebalance_path(&mut self, start: Option<NodeId>) {
        let mut cur = start;
        while let Some(id) = cur {
            self.core_mut().recompute_height(id);
            let bf = self.balance_factor(id);
            let new_sub_root = if bf > 1 {
                let bf_l = self.balance_factor(self.core().left_id(id).unwrap());
                if bf_l >= 0 {
                    self.rotate_left_left(id)
                } else {
                    self.rotate_left_right(id)
                }
            } else if bf < -1 {
                let bf_r = self.balance_factor(self.core().right_id(id).unwrap());
                if bf_r <= 0 {
                    self.rotate_right_right(id)
                } else {
                    self.rotate_right_left(id)
                }
            } else {
                id
            };
            cur = self.core().parent_id(new_sub_root);
        }
    }

    /// Ordered insert (delegates to [`Bst::add`]) followed by a rebalance
    /// walk from the new leaf to the root. A key that already existed is
    /// replaced in place (size unchanged) and needs no rebalance, since no
    /// subtree shape changed.
    pub fn add(&mut self, key: K, value: V) -> bool {
        let before = self.inner.size();
        let (ok, id) = self.inner.add_with_id(key, value);
        if self.inner.size() != before {
            self.rebalance_path(Some(id));
        }
        ok
    }

    pub fn add_many<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        items.into_iter().filter(|(k, v)| self.add(k.clone(), v.clone())).count()
    }

    /// CLRS-style transplant delete (via [`Bst::delete`]) followed by a
    /// rebalance walk from the splice point each deletion reports.
    pub fn delete(&mut self, key: &K) -> Vec<DeleteOutcome<K, V>> {
        let outcomes = self.inner.delete(key);
        for outcome in &outcomes {
            self.rebalance_path(outcome.need_balanced);
        }
        outcomes
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    pub fn has(&self, key: &K) -> bool {
        self.inner.has(key)
    }

    pub fn get_node(&self, key: &K) -> Option<&Node<K, V>> {
        self.inner.get_node(key)
    }

    pub fn get_nodes<F>(&self, predicate: F, only_one: bool) -> Vec<&Node<K, V>>
    where
        F: FnMut(&Node<K, V>) -> bool,
    {
        self.inner.get_nodes(predicate, only_one)
    }

    pub fn get_depth(&self, target: &K, start: &K) -> Option<i32> {
        self.inner.get_depth(target, start)
    }

    pub fn get_path_to_root(&self, key: &K, reverse: bool) -> Option<Vec<&Node<K, V>>> {
        self.inner.get_path_to_root(key, reverse)
    }

    pub fn range_search(&self, low: &K, high: &K, low_inclusive: bool, high_inclusive: bool) -> Vec<&Node<K, V>> {
        self.inner.range_search(low, high, low_inclusive, high_inclusive)
    }

    pub fn ceiling(&self, target: &K) -> Option<&Node<K, V>> {
        self.inner.ceiling(target)
    }

    pub fn higher(&self, target: &K) -> Option<&Node<K, V>> {
        self.inner.higher(target)
    }

    pub fn floor(&self, target: &K) -> Option<&Node<K, V>> {
        self.inner.floor(target)
    }

    pub fn lower(&self, target: &K) -> Option<&Node<K, V>> {
        self.inner.lower(target)
    }

    /// Validates invariant 6 directly off the maintained `height` field,
    /// rather than recomputing heights from scratch the way
    /// [`Bst::is_avl_balanced`] does — a cross-check that rebalancing kept
    /// the cached heights accurate.
    pub fn is_avl_balanced(&self) -> bool {
        self.is_avl_balanced_rec(self.core().root_id())
    }

    fn is_avl_balanced_rec(&self, start: Option<NodeId>) -> bool {
        let Some(id) = start else { return true };
        if self.balance_factor(id).abs() > 1 {
            return false;
        }
        self.is_avl_balanced_rec(self.core().left_id(id)) && self.is_avl_balanced_rec(self.core().right_id(id))
    }

    pub fn dfs(&self, order: DfsOrder, opts: TraversalOptions) -> Vec<&Node<K, V>> {
        self.inner.dfs(order, opts)
    }

    pub fn bfs(&self, opts: TraversalOptions) -> Vec<&Node<K, V>> {
        self.inner.bfs(opts)
    }

    pub fn morris(&mut self, order: DfsOrder) -> Vec<&Node<K, V>> {
        self.inner.morris(order)
    }

    pub fn list_levels(&self, opts: TraversalOptions) -> Vec<Vec<&Node<K, V>>> {
        self.inner.list_levels(opts)
    }

    pub fn leaves(&self) -> Vec<&Node<K, V>> {
        self.inner.leaves()
    }

    pub fn get_height(&self, iteration_type: IterationType) -> i32 {
        self.inner.get_height(iteration_type)
    }

    pub fn get_min_height(&self) -> i32 {
        self.inner.get_min_height()
    }

    pub fn is_perfectly_balanced(&self) -> bool {
        self.inner.is_perfectly_balanced()
    }

    pub fn is_bst(&self) -> bool {
        self.inner.is_bst()
    }

    pub fn get_leftmost(&self) -> Option<&Node<K, V>> {
        self.inner.get_leftmost()
    }

    pub fn get_rightmost(&self) -> Option<&Node<K, V>> {
        self.inner.get_rightmost()
    }

    pub fn get_predecessor(&self, key: &K) -> Option<&Node<K, V>> {
        self.inner.get_predecessor(key)
    }

    pub fn get_successor(&self, key: &K) -> Option<&Node<K, V>> {
        self.inner.get_successor(key)
    }

    pub fn family_position(&self, key: &K) -> Option<FamilyPosition> {
        self.inner.family_position(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.inner.iter()
    }

    /// Rebuilds through [`Self::add`] rather than delegating to
    /// [`Bst::filter`]: the latter reinserts via plain unbalanced `add` in
    /// sorted iteration order, which would leave `inner` a degenerate chain
    /// wearing an `AvlTree` label.
    pub fn filter<F>(&self, mut predicate: F) -> AvlTree<K, V>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut out = AvlTree::with_options(OrderedOptions {
            is_map_mode: self.core().store.is_map_mode(),
            iteration_type: self.core().iteration_type,
            comparator: Some(self.inner.comparator.clone()),
            is_reverse: false,
        });
        for (k, v) in self.iter() {
            if predicate(k, v) {
                out.add(k.clone(), v.clone());
            }
        }
        out
    }

    pub fn map<K2, V2, F>(&self, mut f: F) -> AvlTree<K2, V2>
    where
        K2: Ord + Clone + 'static,
        V2: Clone,
        F: FnMut(&K, &V) -> (K2, V2),
    {
        let mut out = AvlTree::new();
        for (k, v) in self.iter() {
            let (k2, v2) = f(k, v);
            out.add(k2, v2);
        }
        out
    }
}

impl<K: Ord + Clone + std::fmt::Display + 'static, V: Clone> AvlTree<K, V> {
    pub fn to_visual(&self) -> String {
        self.inner.to_visual()
    }

    pub fn to_visual_with_options(&self, opts: crate::visual::VisualOptions) -> String {
        self.inner.to_visual_with_options(opts)
    }

    pub fn print(&self) {
        self.inner.print()
    }
}

impl<K: Ord + Clone + 'static, V: Clone> FromIterator<(K, V)> for AvlTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        for (k, v) in iter {
            tree.add(k, v);
        }
        tree
    }
}

impl<'a, K: Ord + Clone + 'static, V: Clone> IntoIterator for &'a AvlTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = std::vec::IntoIter<(&'a K, &'a V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter().collect::<Vec<_>>().into_iter()
    }
}

impl<K: Ord + Clone + 'static, V: Clone> std::ops::Index<&K> for AvlTree<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not present in tree")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_insert_stays_balanced() {
        let mut t = AvlTree::new();
        for i in 0..1000 {
            t.add(i, i.to_string());
        }
        assert!(t.is_avl_balanced());
        let h = t.get_height(IterationType::Iterative);
        assert!((h as f64) < 1.45 * ((t.size() as f64 + 2.0).log2()));
    }

    #[test]
    fn reverse_insert_stays_balanced() {
        let mut t = AvlTree::new();
        for i in (0..500).rev() {
            t.add(i, i);
        }
        assert!(t.is_avl_balanced());
        assert_eq!(t.size(), 500);
    }

    #[test]
    fn delete_keeps_tree_balanced() {
        let mut t: AvlTree<i32, i32> = (0..200).map(|i| (i, i)).collect();
        for i in (0..200).step_by(2) {
            t.delete(&i);
        }
        assert!(t.is_avl_balanced());
        assert_eq!(t.size(), 100);
        for i in (1..200).step_by(2) {
            assert_eq!(t.get(&i), Some(&i));
        }
    }

    #[test]
    fn rotation_cases_all_trigger() {
        // LL
        let mut ll = AvlTree::new();
        for k in [3, 2, 1] {
            ll.add(k, ());
        }
        assert!(ll.is_avl_balanced());
        assert_eq!(ll.root().unwrap().key(), &2);

        // RR
        let mut rr = AvlTree::new();
        for k in [1, 2, 3] {
            rr.add(k, ());
        }
        assert!(rr.is_avl_balanced());
        assert_eq!(rr.root().unwrap().key(), &2);

        // LR
        let mut lr = AvlTree::new();
        for k in [3, 1, 2] {
            lr.add(k, ());
        }
        assert!(lr.is_avl_balanced());
        assert_eq!(lr.root().unwrap().key(), &2);

        // RL
        let mut rl = AvlTree::new();
        for k in [1, 3, 2] {
            rl.add(k, ());
        }
        assert!(rl.is_avl_balanced());
        assert_eq!(rl.root().unwrap().key(), &2);
    }

    #[test]
    fn replacing_existing_key_does_not_change_size() {
        let mut t = AvlTree::new();
        t.add(1, "a");
        t.add(1, "b");
        assert_eq!(t.size(), 1);
        assert_eq!(t.get(&1), Some(&"b"));
    }

    #[test]
    fn filter_result_stays_balanced() {
        let t: AvlTree<i32, i32> = (0..200).map(|i| (i, i)).collect();
        let evens = t.filter(|k, _| k % 2 == 0);
        assert_eq!(evens.size(), 100);
        assert!(evens.is_avl_balanced());
        let h = evens.get_height(IterationType::Iterative);
        assert!((h as f64) < 1.45 * ((evens.size() as f64 + 2.0).log2()));
    }

    #[test]
    fn map_transforms_keys_and_stays_balanced() {
        let t: AvlTree<i32, i32> = (0..100).map(|i| (i, i)).collect();
        let doubled = t.map(|k, v| (k * 2, *v));
        assert_eq!(doubled.size(), 100);
        assert!(doubled.is_avl_balanced());
        assert_eq!(doubled.get(&0), Some(&0));
        assert_eq!(doubled.get(&198), Some(&99));
    }

    #[test]
    fn morris_matches_iter_order() {
        let mut t: AvlTree<i32, i32> = [5, 3, 8, 1, 4, 7, 9].into_iter().map(|k| (k, k)).collect();
        let morris_keys: Vec<i32> = t.morris(DfsOrder::In).into_iter().map(|n| *n.key()).collect();
        let iter_keys: Vec<i32> = t.iter().map(|(k, _)| *k).collect();
        assert_eq!(morris_keys, iter_keys);
        assert_eq!(morris_keys, vec![1, 3, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn get_depth_and_path_to_root() {
        let t: AvlTree<i32, i32> = [5, 3, 8, 1, 4].into_iter().map(|k| (k, k)).collect();
        assert_eq!(t.get_depth(&1, &5), Some(2));
        let path: Vec<i32> = t.get_path_to_root(&1, false).unwrap().into_iter().map(|n| *n.key()).collect();
        assert_eq!(path.last(), Some(&5));
        assert_eq!(path.first(), Some(&1));
    }

    #[test]
    fn get_nodes_collects_matches() {
        let t: AvlTree<i32, i32> = (0..20).map(|i| (i, i)).collect();
        let found = t.get_nodes(|n| n.key() % 5 == 0, false);
        assert_eq!(found.len(), 4);
    }
}
