//! Red-Black ordered map (§4.5): CLRS insertion/deletion fixup reusing the
//! same [`crate::core::TreeCore::rotate_left`]/[`crate::core::TreeCore::rotate_right`]
//! primitives AVL rotates with, layering color fixups instead of height
//! fixups on top. There is no physical NIL sentinel node in the arena —
//! `Color::Black` is simply the color an absent child (`None`) is treated
//! as everywhere a color read happens, so "NIL is black" falls out of
//! `color_of` without needing a dedicated allocation.

use std::cmp::Ordering;

use crate::arena::NodeId;
use crate::comparator::Comparator;
use crate::core::{DeleteOutcome, Side, TreeCore, Visited};
use crate::iteration::{DfsOrder, IterationType, TraversalOptions};
use crate::node::{ChildSlot, Color, FamilyPosition, Node};
use crate::options::OrderedOptions;

/// A red-black ordered map: invariants (no two consecutive red nodes on
/// any root-to-leaf path; every root-to-NIL path carries the same black
/// count) hold after every `add`/`delete`, guaranteeing `O(log n)` height.
#[derive(Clone)]
pub struct RedBlackTree<K, V> {
    core: TreeCore<K, V>,
    comparator: Comparator<K>,
}

impl<K: Ord + Clone + 'static, V: Clone> Default for RedBlackTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + 'static, V: Clone> RedBlackTree<K, V> {
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
        RedBlackTree {
            core: TreeCore::new(opts.is_map_mode, opts.iteration_type),
            comparator,
        }
    }

    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.comparator.compare(a, b)
    }

    pub fn size(&self) -> usize {
        self.core.size()
    }

    pub fn len(&self) -> usize {
        self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    pub fn clear(&mut self) {
        self.core.clear()
    }

    pub fn root(&self) -> Option<&Node<K, V>> {
        self.core.root_id().map(|id| self.core.node(id))
    }

    fn color_of(&self, id: Option<NodeId>) -> Color {
        match id {
            Some(id) => self.core.node(id).color(),
            None => Color::Black,
        }
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.core.node_mut(id).color = color;
    }

    // -- insertion ----------------------------------------------------------------

    /// Ordinary BST insert (replaces in place on equality, invariant P7),
    /// coloring a freshly-inserted node red and running insertion fixup
    /// from it. `O(log n)`.
    pub fn add(&mut self, key: K, value: V) -> bool {
        let Some(root) = self.core.root_id() else {
            let id = self.core.alloc(key, value);
            self.core.set_root(Some(id));
            self.core.size = 1;
            self.set_color(id, Color::Black);
            return true;
        };

        let mut cur = root;
        let new_id = loop {
            match self.compare(&key, self.core.node(cur).key()) {
                Ordering::Equal => {
                    self.replace_value(cur, key, value);
                    return true;
                }
                Ordering::Less => match self.core.left_id(cur) {
                    Some(l) => cur = l,
                    None => {
                        let id = self.core.alloc(key, value);
                        self.core.set_child(cur, Side::Left, ChildSlot::Present(id));
                        self.core.size += 1;
                        break id;
                    }
                },
                Ordering::Greater => match self.core.right_id(cur) {
                    Some(r) => cur = r,
                    None => {
                        let id = self.core.alloc(key, value);
                        self.core.set_child(cur, Side::Right, ChildSlot::Present(id));
                        self.core.size += 1;
                        break id;
                    }
                },
            }
        };

        self.set_color(new_id, Color::Red);
        self.fix_insert(new_id);
        self.core.debug_assert_well_formed(new_id);
        true
    }

    pub fn add_many<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        items.into_iter().filter(|(k, v)| self.add(k.clone(), v.clone())).count()
    }

    fn replace_value(&mut self, id: NodeId, key: K, value: V) {
        if self.core.store.is_map_mode() {
            self.core.store.put(key, value);
        } else {
            self.core.node_mut(id).value = Some(value);
        }
    }

    /// RB-INSERT-FIXUP (CLRS 13.3): walks up recoloring through red
    /// uncles, or rotating at the grandparent once an uncle is black,
    /// terminating in the standard two rotation shapes (LL/RR directly,
    /// LR/RL via an extra rotation at the parent first).
    fn fix_insert(&mut self, mut node: NodeId) {
        while let Some(parent) = self.core.parent_id(node) {
            if self.color_of(Some(parent)) != Color::Red {
                break;
            }
            let Some(grandparent) = self.core.parent_id(parent) else { break };
            let dir = self.core.side_of(parent).expect("parent occupies a known slot");
            let uncle = match dir {
                Side::Left => self.core.right_id(grandparent),
                Side::Right => self.core.left_id(grandparent),
            };
            if self.color_of(uncle) == Color::Red {
                self.set_color(parent, Color::Black);
                self.set_color(uncle.unwrap(), Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
            } else {
                let mut parent = parent;
                if self.core.side_of(node) != Some(dir) {
                    match dir {
                        Side::Left => {
                            self.core.rotate_left(parent);
                        }
                        Side::Right => {
                            self.core.rotate_right(parent);
                        }
                    }
                    parent = node;
                }
                let grandparent = self.core.parent_id(parent).expect("parent is still non-root");
                self.set_color(parent, Color::Black);
                self.set_color(grandparent, Color::Red);
                match dir {
                    Side::Left => {
                        self.core.rotate_right(grandparent);
                    }
                    Side::Right => {
                        self.core.rotate_left(grandparent);
                    }
                }
                break;
            }
        }
        if let Some(root) = self.core.root_id() {
            self.set_color(root, Color::Black);
        }
    }

    // -- deletion -------------------------------------------------------------------

    pub fn delete(&mut self, key: &K) -> Vec<DeleteOutcome<K, V>> {
        let Some(target) = self.find_by_key(key) else {
            return Vec::new();
        };
        vec![self.delete_node(target)]
    }

    pub fn delete_where<F>(&mut self, predicate: F, only_first: bool) -> Vec<DeleteOutcome<K, V>>
    where
        F: FnMut(&Node<K, V>) -> bool,
    {
        let matches = self.core.search(self.core.root_id(), predicate, TraversalOptions::new(), only_first);
        matches.into_iter().map(|id| self.delete_node(id)).collect()
    }

    /// CLRS RB-DELETE (13.4): the same transplant-based splice as the
    /// plain BST delete, but additionally records the color of the node
    /// that physically leaves its position and, if it was black, repairs
    /// the black-height invariant with [`Self::fix_remove`] before the
    /// node is deallocated.
    fn delete_node(&mut self, target: NodeId) -> DeleteOutcome<K, V> {
        let left = self.core.left_id(target);
        let right = self.core.right_id(target);
        let target_color = self.color_of(Some(target));

        let (pivot, pivot_parent, removed_color) = match (left, right) {
            (None, _) => {
                let parent = self.core.parent_id(target);
                self.transplant(target, right);
                (right, parent, target_color)
            }
            (Some(_), None) => {
                let parent = self.core.parent_id(target);
                self.transplant(target, left);
                (left, parent, target_color)
            }
            (Some(l), Some(r)) => {
                let succ = self.core.get_leftmost(r);
                let succ_color = self.color_of(Some(succ));
                let succ_right = self.core.right_id(succ);
                let (pivot, pivot_parent) = if self.core.parent_id(succ) == Some(target) {
                    (succ_right, Some(succ))
                } else {
                    let succ_parent = self.core.parent_id(succ);
                    self.transplant(succ, succ_right);
                    self.core.set_child(succ, Side::Right, ChildSlot::Present(r));
                    (succ_right, succ_parent)
                };
                self.transplant(target, Some(succ));
                self.core.set_child(succ, Side::Left, ChildSlot::Present(l));
                self.set_color(succ, target_color);
                (pivot, pivot_parent, succ_color)
            }
        };

        if removed_color == Color::Black {
            self.fix_remove(pivot, pivot_parent);
        }
        if let Some(p) = pivot {
            self.core.debug_assert_well_formed(p);
        }

        let node = self.core.dealloc(target);
        self.core.size -= 1;
        DeleteOutcome {
            deleted_key: node.key,
            deleted_value: node.value,
            need_balanced: None,
        }
    }

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

    /// RB-DELETE-FIXUP (CLRS 13.4), adapted to an `Option<NodeId>` "node"
    /// that can itself be the conceptual NIL — since there's no sentinel
    /// node here to carry a parent pointer while absent, the splice point's
    /// parent is threaded through explicitly instead.
    fn fix_remove(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        while node != self.core.root_id() && self.color_of(node) == Color::Black {
            let Some(p) = parent else { break };
            let dir = if self.core.left_id(p) == node { Side::Left } else { Side::Right };
            let mut sibling = match dir {
                Side::Left => self.core.right_id(p),
                Side::Right => self.core.left_id(p),
            };

            if self.color_of(sibling) == Color::Red {
                self.set_color(sibling.unwrap(), Color::Black);
                self.set_color(p, Color::Red);
                match dir {
                    Side::Left => {
                        self.core.rotate_left(p);
                    }
                    Side::Right => {
                        self.core.rotate_right(p);
                    }
                }
                sibling = match dir {
                    Side::Left => self.core.right_id(p),
                    Side::Right => self.core.left_id(p),
                };
            }

            let (sib_left, sib_right) = match sibling {
                Some(s) => (self.core.left_id(s), self.core.right_id(s)),
                None => (None, None),
            };

            if self.color_of(sib_left) == Color::Black && self.color_of(sib_right) == Color::Black {
                if let Some(s) = sibling {
                    self.set_color(s, Color::Red);
                }
                node = parent;
                parent = parent.and_then(|pp| self.core.parent_id(pp));
            } else {
                let near = match dir {
                    Side::Left => sib_right,
                    Side::Right => sib_left,
                };
                if self.color_of(near) == Color::Black {
                    let far = match dir {
                        Side::Left => sib_left,
                        Side::Right => sib_right,
                    };
                    if let Some(f) = far {
                        self.set_color(f, Color::Black);
                    }
                    if let Some(s) = sibling {
                        self.set_color(s, Color::Red);
                        match dir {
                            Side::Left => {
                                self.core.rotate_right(s);
                            }
                            Side::Right => {
                                self.core.rotate_left(s);
                            }
                        }
                    }
                    sibling = match dir {
                        Side::Left => self.core.right_id(p),
                        Side::Right => self.core.left_id(p),
                    };
                }

                let p_color = self.color_of(Some(p));
                if let Some(s) = sibling {
                    self.set_color(s, p_color);
                }
                self.set_color(p, Color::Black);
                let far_after = match dir {
                    Side::Left => sibling.and_then(|s| self.core.right_id(s)),
                    Side::Right => sibling.and_then(|s| self.core.left_id(s)),
                };
                if let Some(f) = far_after {
                    self.set_color(f, Color::Black);
                }
                match dir {
                    Side::Left => {
                        self.core.rotate_left(p);
                    }
                    Side::Right => {
                        self.core.rotate_right(p);
                    }
                }
                node = self.core.root_id();
                parent = None;
            }
        }
        if let Some(n) = node {
            self.set_color(n, Color::Black);
        }
    }

    fn find_by_key(&self, key: &K) -> Option<NodeId> {
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

    pub fn get_depth(&self, target: &K, start: &K) -> Option<i32> {
        let target_id = self.find_by_key(target)?;
        let start_id = self.find_by_key(start)?;
        Some(self.core.get_depth(target_id, start_id))
    }

    pub fn get_path_to_root(&self, key: &K, reverse: bool) -> Option<Vec<&Node<K, V>>> {
        let id = self.find_by_key(key)?;
        Some(self.core.get_path_to_root(id, reverse).into_iter().map(|id| self.core.node(id)).collect())
    }

    // -- pruning range search / order-predicate navigation (mirrors Bst) -------------

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

    pub fn ceiling(&self, target: &K) -> Option<&Node<K, V>> {
        self.guided_descent(target, true, true)
    }

    pub fn higher(&self, target: &K) -> Option<&Node<K, V>> {
        self.guided_descent(target, true, false)
    }

    pub fn floor(&self, target: &K) -> Option<&Node<K, V>> {
        self.guided_descent(target, false, true)
    }

    pub fn lower(&self, target: &K) -> Option<&Node<K, V>> {
        self.guided_descent(target, false, false)
    }

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

    /// Validates the two RB color invariants directly (no two consecutive
    /// reds, equal black-height on every path) rather than through the
    /// generic `isBST`-style recursive scan, since neither invariant is
    /// otherwise exercised by the shared substrate.
    pub fn is_red_black_valid(&self) -> bool {
        self.core.root_id().map(|r| self.color_of(Some(r)) == Color::Black).unwrap_or(true)
            && self.check_rb_rec(self.core.root_id()).is_some()
    }

    fn check_rb_rec(&self, start: Option<NodeId>) -> Option<i32> {
        let Some(id) = start else { return Some(0) };
        if self.color_of(Some(id)) == Color::Red {
            let l_red = self.core.left_id(id).map(|l| self.color_of(Some(l)) == Color::Red).unwrap_or(false);
            let r_red = self.core.right_id(id).map(|r| self.color_of(Some(r)) == Color::Red).unwrap_or(false);
            if l_red || r_red {
                return None;
            }
        }
        let left = self.check_rb_rec(self.core.left_id(id))?;
        let right = self.check_rb_rec(self.core.right_id(id))?;
        if left != right {
            return None;
        }
        let add = if self.color_of(Some(id)) == Color::Black { 1 } else { 0 };
        Some(left + add)
    }

    // -- traversal / structural query passthroughs (mirrors Bst) ----------------

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

    pub fn morris(&mut self, order: DfsOrder) -> Vec<&Node<K, V>> {
        let ids = self.core.morris(self.core.root_id(), order);
        ids.into_iter().map(|id| self.core.node(id)).collect()
    }

    pub fn list_levels(&self, opts: TraversalOptions) -> Vec<Vec<&Node<K, V>>> {
        self.core
            .list_levels(self.core.root_id(), opts)
            .into_iter()
            .map(|row| row.into_iter().filter_map(Visited::real).map(|id| self.core.node(id)).collect())
            .collect()
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

    pub fn filter<F>(&self, mut predicate: F) -> RedBlackTree<K, V>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut out = RedBlackTree::with_options(OrderedOptions {
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

    pub fn map<K2, V2, F>(&self, mut f: F) -> RedBlackTree<K2, V2>
    where
        K2: Ord + Clone + 'static,
        V2: Clone,
        F: FnMut(&K, &V) -> (K2, V2),
    {
        let mut out = RedBlackTree::new();
        for (k, v) in self.iter() {
            let (k2, v2) = f(k, v);
            out.add(k2, v2);
        }
        out
    }
}

impl<K: Ord + Clone + std::fmt::Display + 'static, V: Clone> RedBlackTree<K, V> {
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

impl<K: Ord + Clone + 'static, V: Clone> FromIterator<(K, V)> for RedBlackTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = RedBlackTree::new();
        tree.add_many(iter);
        tree
    }
}

impl<'a, K: Ord + Clone + 'static, V: Clone> IntoIterator for &'a RedBlackTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = std::vec::IntoIter<(&'a K, &'a V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter().collect::<Vec<_>>().into_iter()
    }
}

impl<K: Ord + Clone + 'static, V: Clone> std::ops::Index<&K> for RedBlackTree<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not present in tree")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_insert_stays_valid_and_balanced() {
        let mut t = RedBlackTree::new();
        for i in 0..1000 {
            t.add(i, i.to_string());
        }
        assert!(t.is_red_black_valid());
        let h = t.get_height(IterationType::Iterative);
        assert!((h as f64) < 2.0 * ((t.size() as f64 + 1.0).log2()));
    }

    #[test]
    fn reverse_insert_stays_valid() {
        let mut t = RedBlackTree::new();
        for i in (0..500).rev() {
            t.add(i, i);
        }
        assert!(t.is_red_black_valid());
        assert_eq!(t.size(), 500);
    }

    #[test]
    fn delete_keeps_tree_valid() {
        let mut t: RedBlackTree<i32, i32> = (0..300).map(|i| (i, i)).collect();
        for i in (0..300).step_by(3) {
            t.delete(&i);
        }
        assert!(t.is_red_black_valid());
        assert_eq!(t.size(), 200);
        for i in 0..300 {
            if i % 3 == 0 {
                assert_eq!(t.get(&i), None);
            } else {
                assert_eq!(t.get(&i), Some(&i));
            }
        }
    }

    #[test]
    fn replacing_existing_key_does_not_change_size() {
        let mut t = RedBlackTree::new();
        t.add(1, "a");
        t.add(1, "b");
        assert_eq!(t.size(), 1);
        assert_eq!(t.get(&1), Some(&"b"));
    }

    #[test]
    fn range_search_matches_bounds() {
        let t: RedBlackTree<i32, i32> = (0..50).map(|i| (i, i)).collect();
        let got = t.range_search(&10, &20, true, false);
        let keys: Vec<i32> = got.into_iter().map(|n| *n.key()).collect();
        assert_eq!(keys, (10..20).collect::<Vec<_>>());
    }

    #[test]
    fn delete_on_empty_tree_is_a_noop_not_an_error() {
        let mut t: RedBlackTree<i32, i32> = RedBlackTree::new();
        assert!(t.delete(&1).is_empty());
    }

    #[test]
    fn filter_result_stays_valid() {
        let t: RedBlackTree<i32, i32> = (0..200).map(|i| (i, i)).collect();
        let evens = t.filter(|k, _| k % 2 == 0);
        assert_eq!(evens.size(), 100);
        assert!(evens.is_red_black_valid());
    }

    #[test]
    fn map_transforms_keys_and_stays_valid() {
        let t: RedBlackTree<i32, i32> = (0..100).map(|i| (i, i)).collect();
        let doubled = t.map(|k, v| (k * 2, *v));
        assert_eq!(doubled.size(), 100);
        assert!(doubled.is_red_black_valid());
        assert_eq!(doubled.get(&0), Some(&0));
        assert_eq!(doubled.get(&198), Some(&99));
    }

    #[test]
    fn morris_matches_iter_order() {
        let mut t: RedBlackTree<i32, i32> = [5, 3, 8, 1, 4, 7, 9].into_iter().map(|k| (k, k)).collect();
        let morris_keys: Vec<i32> = t.morris(DfsOrder::In).into_iter().map(|n| *n.key()).collect();
        let iter_keys: Vec<i32> = t.iter().map(|(k, _)| *k).collect();
        assert_eq!(morris_keys, iter_keys);
        assert_eq!(morris_keys, vec![1, 3, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn get_depth_and_path_to_root() {
        let t: RedBlackTree<i32, i32> = [5, 3, 8, 1, 4].into_iter().map(|k| (k, k)).collect();
        let path: Vec<i32> = t.get_path_to_root(&1, false).unwrap().into_iter().map(|n| *n.key()).collect();
        assert_eq!(path.first(), Some(&1));
        let root_key = *t.root().unwrap().key();
        assert_eq!(path.last(), Some(&root_key));
        let depth = t.get_depth(&1, &root_key);
        assert_eq!(depth, Some((path.len() - 1) as i32));
    }

    #[test]
    fn get_nodes_collects_matches() {
        let t: RedBlackTree<i32, i32> = (0..20).map(|i| (i, i)).collect();
        let found = t.get_nodes(|n| n.key() % 5 == 0, false);
        assert_eq!(found.len(), 4);
    }
}
