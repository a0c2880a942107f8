//! Ordered insertion/lookup, pruning range search, balanced bulk-load, and
//! order-predicate navigation (§4.3).

use std::cmp::Ordering;

use crate::arena::NodeId;
use crate::comparator::Comparator;
use crate::core::{DeleteOutcome, Side, TreeCore, Visited};
use crate::iteration::{DfsOrder, IterationType, TraversalOptions};
use crate::node::{ChildSlot, FamilyPosition, Node};
use crate::options::OrderedOptions;

/// An ordered binary search tree: unbalanced by construction (callers who
/// need a height guarantee want [`crate::avl::AvlTree`] or
/// [`crate::redblack::RedBlackTree`] instead), but with the full BST
/// navigation surface — range search, ceiling/floor/higher/lower, bulk
/// balanced load, perfect rebalance.
#[derive(Clone)]
pub struct Bst<K, V> {
    pub(crate) core: TreeCore<K, V>,
    pub(crate) comparator: Comparator<K>,
}

impl<K: Ord + Clone + 'static, V: Clone> Default for Bst<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + 'static, V: Clone> Bst<K, V> {
    pub fn new() -> Self {
        Self::with_options(OrderedOptions::default())
    }

    pub fn with_comparator(comparator: Comparator<K>) -> Self {
        Self::with_options(OrderedOptions {
            comparator: Some(comparator),
            ..OrderedOptions::default()
        })
    }

    pub fn with_options(opts: OrderedOptions<K>) -> Self {
        let comparator = opts.resolved_comparator();
        Bst {
            core: TreeCore::new(opts.is_map_mode, opts.iteration_type),
            comparator,
        }
    }

    pub(crate) fn compare(&self, a: &K, b: &K) -> Ordering {
        self.comparator.compare(a, b)
    }

    // -- size / emptiness -----------------------------------------------------

    pub fn size(&self) -> usize {
        self.core.size()
    }

    pub fn len(&self) -> usize {
        self.core.size()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    pub fn clear(&mut self) {
        self.core.clear();
    }

    pub fn root(&self) -> Option<&Node<K, V>> {
        self.core.root_id().map(|id| self.core.node(id))
    }

    // -- add ----------------------------------------------------------------------

    /// Ordered insertion (§4.3): walks from root comparing keys; replaces
    /// in place on equality (invariant P7 — size unchanged), otherwise
    /// descends left/right and inserts into the first empty slot found.
    /// `O(h)`.
    pub fn add(&mut self, key: K, value: V) -> bool {
        self.add_with_id(key, value).0
    }

    /// Same as [`Self::add`] but additionally returns the id of the node
    /// that was inserted or replaced — the anchor `AvlTree`/`RedBlackTree`
    /// need to walk the path to root from after a mutation.
    pub(crate) fn add_with_id(&mut self, key: K, value: V) -> (bool, NodeId) {
        let Some(root) = self.core.root_id() else {
            let id = self.core.alloc(key, value);
            self.core.set_root(Some(id));
            self.core.size = 1;
            return (true, id);
        };

        let mut cur = root;
        loop {
            match self.compare(&key, self.core.node(cur).key()) {
                Ordering::Equal => {
                    self.replace_value(cur, key, value);
                    return (true, cur);
                }
                Ordering::Less => match self.core.left_id(cur) {
                    Some(l) => cur = l,
                    None => {
                        let id = self.core.alloc(key, value);
                        self.core.set_child(cur, Side::Left, ChildSlot::Present(id));
                        self.core.size += 1;
                        self.core.debug_assert_well_formed(id);
                        self.core.debug_assert_well_formed(cur);
                        return (true, id);
                    }
                },
                Ordering::Greater => match self.core.right_id(cur) {
                    Some(r) => cur = r,
                    None => {
                        let id = self.core.alloc(key, value);
                        self.core.set_child(cur, Side::Right, ChildSlot::Present(id));
                        self.core.size += 1;
                        self.core.debug_assert_well_formed(id);
                        self.core.debug_assert_well_formed(cur);
                        return (true, id);
                    }
                },
            }
        }
    }

    fn replace_value(&mut self, id: NodeId, key: K, value: V) {
        if self.core.store.is_map_mode() {
            self.core.store.put(key, value);
        } else {
            self.core.node_mut(id).value = Some(value);
        }
    }

    /// Bulk add (§4.3 `addMany`). Balanced (default): sort by key, then
    /// recursively insert the median of each subarray, producing a
    /// height-balanced tree in `O(n log n)` total. Unbalanced: insert in
    /// iteration order, `O(n·h)`. Idempotent-safe per spec's Open
    /// Question: calling it again on an already-populated tree just adds
    /// (or replaces) each item exactly as a second `addMany` call would be
    /// expected to, with no hidden state between invocations.
    pub fn add_many<I>(&mut self, items: I, balanced: bool) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        if !balanced {
            return items.into_iter().filter(|(k, v)| self.add(k.clone(), v.clone())).count();
        }
        let mut sorted: Vec<(K, V)> = items.into_iter().collect();
        sorted.sort_by(|a, b| self.compare(&a.0, &b.0));
        let n = sorted.len();
        self.add_median_range(&sorted, 0, n);
        n
    }

    fn add_median_range(&mut self, items: &[(K, V)], l: usize, r: usize) {
        if l >= r {
            return;
        }
        let mid = l + (r - l) / 2;
        let (k, v) = items[mid].clone();
        self.add(k, v);
        self.add_median_range(items, l, mid);
        self.add_median_range(items, mid + 1, r);
    }

    // -- delete ---------------------------------------------------------------------

    /// Three-case BST delete (§4.3) via a transplant helper: no left
    /// child, no right child, or the two-children case (successor
    /// splice).
    pub fn delete(&mut self, key: &K) -> Vec<DeleteOutcome<K, V>> {
        let Some(target) = self.find_by_key(key) else {
            return Vec::new();
        };
        vec![self.delete_node(target)]
    }

    /// Runs `search` to collect matching nodes (all or first), then
    /// deletes each one, aggregating per-deletion results (§4.3
    /// `deleteWhere`).
    pub fn delete_where<F>(&mut self, predicate: F, only_first: bool) -> Vec<DeleteOutcome<K, V>>
    where
        F: FnMut(&Node<K, V>) -> bool,
    {
        let matches = self.core.search(self.core.root_id(), predicate, TraversalOptions::new(), only_first);
        matches.into_iter().map(|id| self.delete_node(id)).collect()
    }

    fn delete_node(&mut self, target: NodeId) -> DeleteOutcome<K, V> {
        let left = self.core.left_id(target);
        let right = self.core.right_id(target);

        let need_balanced = match (left, right) {
            (None, _) => self.transplant_onto_parent_slot(target, right),
            (Some(_), None) => self.transplant_onto_parent_slot(target, left),
            (Some(l), Some(r)) => {
                let succ = self.core.get_leftmost(r);
                let succ_parent = self.core.parent_id(succ);
                let rebalance_from = if succ_parent != Some(target) {
                    let succ_right = self.core.right_id(succ);
                    self.transplant(succ, succ_right);
                    self.core.set_child(succ, Side::Right, ChildSlot::Present(r));
                    succ_parent
                } else {
                    Some(succ)
                };
                self.transplant(target, Some(succ));
                self.core.set_child(succ, Side::Left, ChildSlot::Present(l));
                rebalance_from
            }
        };

        if let Some(anchor) = need_balanced {
            self.core.debug_assert_well_formed(anchor);
        }
        let node = self.core.dealloc(target);
        self.core.size -= 1;
        DeleteOutcome {
            deleted_key: node.key,
            deleted_value: node.value,
            need_balanced,
        }
    }

    /// Replaces `old`'s position (root or a parent's child slot) with
    /// `new_subtree`, without touching `old`'s own child links — the
    /// CLRS-style "transplant" primitive the two/three-case delete is
    /// built from.
    fn transplant(&mut self, old: NodeId, new_subtree: Option<NodeId>) {
        match self.core.parent_id(old) {
            None => self.core.set_root(new_subtree),
            Some(parent) => {
                let side = self.core.side_of(old).unwrap();
                match new_subtree {
                    Some(id) => self.core.set_child(parent, side, ChildSlot::Present(id)),
                    None => self.core.set_child(parent, side, ChildSlot::Empty),
                }
            }
        }
    }

    fn transplant_onto_parent_slot(&mut self, target: NodeId, only_child: Option<NodeId>) -> Option<NodeId> {
        let parent = self.core.parent_id(target);
        self.transplant(target, only_child);
        parent
    }

    fn find_by_key(&self, key: &K) -> Option<NodeId> {
        self.find_node_id(key)
    }

    /// Same lookup as `find_by_key`, exposed crate-wide for adapters (the
    /// multi-map/multi-set layer) that need the node id itself rather
    /// than just a borrowed `&Node`.
    pub(crate) fn find_node_id(&self, key: &K) -> Option<NodeId> {
        let mut cur = self.core.root_id()?;
        loop {
            match self.compare(key, self.core.node(cur).key()) {
                Ordering::Equal => return Some(cur),
                Ordering::Less => cur = self.core.left_id(cur)?,
                Ordering::Greater => cur = self.core.right_id(cur)?,
            }
        }
    }

    // -- lookup -----------------------------------------------------------------

    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.find_by_key(key)?;
        self.core.get_value(id, key)
    }

    pub fn has(&self, key: &K) -> bool {
        self.find_by_key(key).is_some()
    }

    pub fn get_node(&self, key: &K) -> Option<&Node<K, V>> {
        self.find_by_key(key).map(|id| self.core.node(id))
    }

    pub fn get_nodes<F>(&self, predicate: F, only_one: bool) -> Vec<&Node<K, V>>
    where
        F: FnMut(&Node<K, V>) -> bool,
    {
        self.core
            .search(self.core.root_id(), predicate, TraversalOptions::new(), only_one)
            .into_iter()
            .map(|id| self.core.node(id))
            .collect()
    }

    // -- pruning range search ---------------------------------------------------------

    /// Range search (§4.3): the in-order DFS is guided by
    /// `should_visit_left`/`should_visit_right`, reducing the walk to
    /// `O(h + m)` where `m` is the match count, instead of a full `O(n)`
    /// scan.
    pub fn range_search(&self, low: &K, high: &K, low_inclusive: bool, high_inclusive: bool) -> Vec<&Node<K, V>> {
        let mut out = Vec::new();
        if let Some(root) = self.core.root_id() {
            self.range_search_rec(root, low, high, low_inclusive, high_inclusive, &mut out);
        }
        out.into_iter().map(|id| self.core.node(id)).collect()
    }

    fn range_search_rec(
        &self,
        id: NodeId,
        low: &K,
        high: &K,
        low_inclusive: bool,
        high_inclusive: bool,
        out: &mut Vec<NodeId>,
    ) {
        let key = self.core.node(id).key();
        let cmp_low = self.compare(key, low);
        let cmp_high = self.compare(key, high);

        let above_low = cmp_low == Ordering::Greater || (cmp_low == Ordering::Equal && low_inclusive);
        let below_high = cmp_high == Ordering::Less || (cmp_high == Ordering::Equal && high_inclusive);

        if above_low {
            if let Some(l) = self.core.left_id(id) {
                self.range_search_rec(l, low, high, low_inclusive, high_inclusive, out);
            }
        }
        if above_low && below_high {
            out.push(id);
        }
        if below_high {
            if let Some(r) = self.core.right_id(id) {
                self.range_search_rec(r, low, high, low_inclusive, high_inclusive, out);
            }
        }
    }

    // -- order-predicate navigation ---------------------------------------------------

    /// Smallest key >= target. `O(h)`.
    pub fn ceiling(&self, target: &K) -> Option<&Node<K, V>> {
        self.guided_descent(target, true, true)
    }

    /// Smallest key > target. `O(h)`.
    pub fn higher(&self, target: &K) -> Option<&Node<K, V>> {
        self.guided_descent(target, true, false)
    }

    /// Largest key <= target. `O(h)`.
    pub fn floor(&self, target: &K) -> Option<&Node<K, V>> {
        self.guided_descent(target, false, true)
    }

    /// Largest key < target. `O(h)`.
    pub fn lower(&self, target: &K) -> Option<&Node<K, V>> {
        self.guided_descent(target, false, false)
    }

    /// Single guided descent maintaining a running "best so far"
    /// candidate (§4.3's order-predicate navigation). `want_greater`
    /// selects ceiling/higher vs floor/lower; `inclusive` allows the
    /// target's own key to satisfy the query.
    fn guided_descent(&self, target: &K, want_greater: bool, inclusive: bool) -> Option<&Node<K, V>> {
        let mut cur = self.core.root_id();
        let mut best: Option<NodeId> = None;
        while let Some(id) = cur {
            let cmp = self.compare(self.core.node(id).key(), target);
            let satisfies = match (want_greater, inclusive, cmp) {
                (_, true, Ordering::Equal) => true,
                (true, _, Ordering::Greater) => true,
                (false, _, Ordering::Less) => true,
                _ => false,
            };
            if satisfies {
                best = Some(id);
                cur = if want_greater { self.core.left_id(id) } else { self.core.right_id(id) };
            } else {
                cur = if want_greater { self.core.right_id(id) } else { self.core.left_id(id) };
            }
        }
        best.map(|id| self.core.node(id))
    }

    // -- lesser/greater traversal -------------------------------------------------------

    /// Emits every node whose key compares against `pivot` in the
    /// requested direction: `-1` strictly less, `0` equal, `+1` strictly
    /// greater. `O(n)`.
    pub fn lesser_or_greater_traverse(&self, pivot: &K, direction: i32) -> Vec<&Node<K, V>> {
        self.core
            .dfs(self.core.root_id(), DfsOrder::In, TraversalOptions::new())
            .into_iter()
            .filter_map(Visited::real)
            .filter(|&id| {
                let ord = self.compare(self.core.node(id).key(), pivot);
                match direction {
                    d if d < 0 => ord == Ordering::Less,
                    0 => ord == Ordering::Equal,
                    _ => ord == Ordering::Greater,
                }
            })
            .map(|id| self.core.node(id))
            .collect()
    }

    // -- perfect rebalance --------------------------------------------------------------

    /// Enumerates all entries via in-order DFS, clears the tree, then
    /// rebuilds bottom-up from the sorted array by repeatedly selecting
    /// the mid element as subtree root (§4.3). `O(n)`.
    pub fn perfectly_balance(&mut self) {
        let entries: Vec<(K, V)> = self
            .core
            .dfs(self.core.root_id(), DfsOrder::In, TraversalOptions::new())
            .into_iter()
            .filter_map(Visited::real)
            .map(|id| {
                let node = self.core.node(id);
                let key = node.key().clone();
                let value = self.core.get_value(id, &key).cloned().expect("every key has a value");
                (key, value)
            })
            .collect();
        self.core.clear();
        self.add_median_range(&entries, 0, entries.len());
    }

    /// Validates invariant 6 (`|bf(n)| <= 1` for all n) via post-order
    /// height computation with early exit on imbalance.
    pub fn is_avl_balanced(&self) -> bool {
        self.is_avl_balanced_rec(self.core.root_id()).is_some()
    }

    fn is_avl_balanced_rec(&self, start: Option<NodeId>) -> Option<i32> {
        let Some(id) = start else { return Some(-1) };
        let left = self.is_avl_balanced_rec(self.core.left_id(id))?;
        let right = self.is_avl_balanced_rec(self.core.right_id(id))?;
        if (left - right).abs() > 1 {
            return None;
        }
        Some(1 + left.max(right))
    }

    // -- traversal / structural query passthroughs (mirrors BinaryTree) ----------------

    pub fn dfs(&self, order: DfsOrder, opts: TraversalOptions) -> Vec<&Node<K, V>> {
        self.core
            .dfs(self.core.root_id(), order, opts)
            .into_iter()
            .filter_map(Visited::real)
            .map(|id| self.core.node(id))
            .collect()
    }

    pub fn bfs(&self, opts: TraversalOptions) -> Vec<&Node<K, V>> {
        self.core
            .bfs(self.core.root_id(), opts)
            .into_iter()
            .filter_map(Visited::real)
            .map(|id| self.core.node(id))
            .collect()
    }

    pub fn list_levels(&self, opts: TraversalOptions) -> Vec<Vec<&Node<K, V>>> {
        self.core
            .list_levels(self.core.root_id(), opts)
            .into_iter()
            .map(|row| row.into_iter().filter_map(Visited::real).map(|id| self.core.node(id)).collect())
            .collect()
    }

    pub fn morris(&mut self, order: DfsOrder) -> Vec<&Node<K, V>> {
        let ids = self.core.morris(self.core.root_id(), order);
        ids.into_iter().map(|id| self.core.node(id)).collect()
    }

    pub fn leaves(&self) -> Vec<&Node<K, V>> {
        self.core.leaves(self.core.root_id()).into_iter().map(|id| self.core.node(id)).collect()
    }

    pub fn get_height(&self, iteration_type: IterationType) -> i32 {
        match iteration_type {
            IterationType::Recursive => self.core.get_height(self.core.root_id()),
            IterationType::Iterative => self.core.get_height_iterative(self.core.root_id()),
        }
    }

    pub fn get_min_height(&self) -> i32 {
        self.core.get_min_height(self.core.root_id())
    }

    pub fn is_perfectly_balanced(&self) -> bool {
        self.core.is_perfectly_balanced(self.core.root_id())
    }

    pub fn is_bst(&self) -> bool {
        self.core.is_bst(self.core.root_id())
    }

    pub fn get_depth(&self, target: &K, start: &K) -> Option<i32> {
        let target_id = self.find_by_key(target)?;
        let start_id = self.find_by_key(start)?;
        Some(self.core.get_depth(target_id, start_id))
    }

    pub fn get_path_to_root(&self, key: &K, reverse: bool) -> Option<Vec<&Node<K, V>>> {
        let id = self.find_by_key(key)?;
        Some(self.core.get_path_to_root(id, reverse).into_iter().map(|id| self.core.node(id)).collect())
    }

    pub fn get_leftmost(&self) -> Option<&Node<K, V>> {
        self.core.root_id().map(|r| self.core.node(self.core.get_leftmost(r)))
    }

    pub fn get_rightmost(&self) -> Option<&Node<K, V>> {
        self.core.root_id().map(|r| self.core.node(self.core.get_rightmost(r)))
    }

    pub fn get_predecessor(&self, key: &K) -> Option<&Node<K, V>> {
        let id = self.find_by_key(key)?;
        self.core.get_predecessor(id).map(|id| self.core.node(id))
    }

    pub fn get_successor(&self, key: &K) -> Option<&Node<K, V>> {
        let id = self.find_by_key(key)?;
        self.core.get_successor(id).map(|id| self.core.node(id))
    }

    pub fn family_position(&self, key: &K) -> Option<FamilyPosition> {
        let id = self.find_by_key(key)?;
        Some(self.core.family_position(id))
    }

    /// In-order entries, the iteration order spec §6 requires for BST and
    /// above.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.core
            .dfs(self.core.root_id(), DfsOrder::In, TraversalOptions::new())
            .into_iter()
            .filter_map(Visited::real)
            .map(move |id| {
                let node = self.core.node(id);
                let value = self.core.get_value(id, node.key()).expect("every key has a value");
                (node.key(), value)
            })
            .collect::<Vec<_>>()
            .into_iter()
    }

    pub fn filter<F>(&self, mut predicate: F) -> Bst<K, V>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut out = Bst::with_options(OrderedOptions {
            is_map_mode: self.core.store.is_map_mode(),
            iteration_type: self.core.iteration_type,
            comparator: Some(self.comparator.clone()),
            is_reverse: false,
        });
        for (k, v) in self.iter() {
            if predicate(k, v) {
                out.add(k.clone(), v.clone());
            }
        }
        out
    }

    pub fn map<K2, V2, F>(&self, mut f: F) -> Bst<K2, V2>
    where
        K2: Ord + Clone + 'static,
        V2: Clone,
        F: FnMut(&K, &V) -> (K2, V2),
    {
        let mut out = Bst::new();
        for (k, v) in self.iter() {
            let (k2, v2) = f(k, v);
            out.add(k2, v2);
        }
        out
    }
}

impl<K: Ord + Clone + std::fmt::Display + 'static, V: Clone> Bst<K, V> {
    pub fn to_visual(&self) -> String {
        crate::visual::render(&self.core)
    }

    pub fn to_visual_with_options(&self, opts: crate::visual::VisualOptions) -> String {
        crate::visual::render_with_options(&self.core, opts)
    }

    pub fn print(&self) {
        println!("{}", self.to_visual());
    }
}

impl<K: Ord + Clone + 'static, V: Clone> FromIterator<(K, V)> for Bst<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Bst::new();
        tree.add_many(iter, true);
        tree
    }
}

impl<'a, K: Ord + Clone + 'static, V: Clone> IntoIterator for &'a Bst<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = std::vec::IntoIter<(&'a K, &'a V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter().collect::<Vec<_>>().into_iter()
    }
}

impl<K: Ord + Clone + 'static, V: Clone> std::ops::Index<&K> for Bst<K, V> {
    type Output = V;

    /// Mirrors the teacher's `Index` impl on `Tree<K, V>`: square-bracket
    /// indexing by key, panicking on a missing one.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not present in tree")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_many_balanced_keeps_height_logarithmic() {
        let mut t = Bst::new();
        let n = t.add_many((0..255).map(|i| (i, i)), true);
        assert_eq!(n, 255);
        assert_eq!(t.size(), 255);
        assert!(t.get_height(IterationType::Iterative) <= 9);
    }

    #[test]
    fn perfectly_balance_preserves_entries() {
        let mut t: Bst<i32, i32> = (0..50).rev().map(|i| (i, i)).collect();
        t.perfectly_balance();
        assert!(t.is_perfectly_balanced());
        let keys: Vec<i32> = t.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn with_reverse_comparator_reverses_order_and_navigation() {
        let mut t: Bst<i32, i32> = Bst::with_options(OrderedOptions {
            is_reverse: true,
            ..OrderedOptions::default()
        });
        for k in [5, 1, 3, 8, 2] {
            t.add(k, k);
        }
        let keys: Vec<i32> = t.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![8, 5, 3, 2, 1]);
        assert_eq!(t.ceiling(&4).map(|n| *n.key()), Some(3));
    }

    #[test]
    fn index_returns_stored_values() {
        let t: Bst<i32, i32> = [(1, 10), (2, 20)].into_iter().collect();
        assert_eq!(t[&1], 10);
        assert_eq!(t[&2], 20);
    }

    #[test]
    #[should_panic(expected = "key not present")]
    fn index_panics_when_key_absent() {
        let t: Bst<i32, i32> = [(1, 10)].into_iter().collect();
        let _ = t[&99];
    }

    #[test]
    fn to_visual_with_options_shows_undefined_slots() {
        let mut t = Bst::new();
        t.add(5, 5);
        t.add(3, 3);
        let plain = t.to_visual();
        let with_u = t.to_visual_with_options(crate::visual::VisualOptions {
            show_undefined: true,
            ..Default::default()
        });
        assert!(with_u.len() >= plain.len());
        assert!(with_u.contains('U'));
    }
}
