//! The structural base tree (§4.2): level-order "bag" insert, structural
//! delete, the shared traversal/query surface, clone, filter/map, and
//! visual rendering. Ordered variants (`Bst` and above) wrap the same
//! [`TreeCore`] substrate but replace `add`/`delete` with comparator-driven
//! logic instead of inheriting this type directly — Rust has no
//! inheritance, and spec's own framing ("ordered variants override `add`")
//! maps naturally onto "a sibling type built on the same substrate".

use std::collections::VecDeque;

use crate::arena::NodeId;
use crate::core::{DeleteOutcome, Side, TreeCore, Visited};
use crate::iteration::{DfsOrder, IterationType, TraversalOptions};
use crate::node::{ChildSlot, FamilyPosition, Node};
use crate::options::TreeOptions;

/// A binary tree with level-order ("bag") insertion semantics: no
/// ordering invariant is maintained among keys, only a compact,
/// heap-like shape.
#[derive(Clone)]
pub struct BinaryTree<K, V> {
    pub(crate) core: TreeCore<K, V>,
}

impl<K: Ord + Clone, V: Clone> Default for BinaryTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Clone> BinaryTree<K, V> {
    pub fn new() -> Self {
        Self::with_options(TreeOptions::default())
    }

    pub fn with_options(opts: TreeOptions) -> Self {
        BinaryTree {
            core: TreeCore::new(opts.is_map_mode, opts.iteration_type),
        }
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

    // -- add / delete -----------------------------------------------------------

    /// Level-order bag insert (§4.2). If a node with an equal key already
    /// exists it is replaced in place (its value updated); otherwise the
    /// new node fills the first node's empty left-or-right slot
    /// encountered in breadth-first order. Explicit-null placeholders are
    /// never treated as insertion targets — only a true-empty slot is
    /// (see SPEC_FULL.md's Open Question resolution).
    pub fn add(&mut self, key: K, value: V) -> bool {
        let Some(root) = self.core.root_id() else {
            let id = self.core.alloc(key, value);
            self.core.set_root(Some(id));
            self.core.size = 1;
            return true;
        };

        let mut queue = VecDeque::new();
        queue.push_back(root);
        let mut candidate: Option<(NodeId, Side)> = None;

        while let Some(id) = queue.pop_front() {
            if *self.core.node(id).key() == key {
                self.replace_value(id, key, value);
                return true;
            }
            for side in [Side::Left, Side::Right] {
                match self.core.child_slot(id, side) {
                    ChildSlot::Present(child) => queue.push_back(child),
                    ChildSlot::Empty => {
                        if candidate.is_none() {
                            candidate = Some((id, side));
                        }
                    }
                    ChildSlot::ExplicitNull => {}
                }
            }
        }

        match candidate {
            Some((parent, side)) => {
                let id = self.core.alloc(key, value);
                self.core.set_child(parent, side, ChildSlot::Present(id));
                self.core.size += 1;
                self.core.debug_assert_well_formed(id);
                self.core.debug_assert_well_formed(parent);
                true
            }
            // Unreachable for a well-formed finite binary tree: a tree
            // with at least one node always has an empty child slot
            // somewhere. Kept as an explicit `false` per spec's "failure
            // only when input resolves to empty" contract rather than
            // panicking on an invariant we believe always holds.
            None => false,
        }
    }

    fn replace_value(&mut self, id: NodeId, key: K, value: V) {
        if self.core.store.is_map_mode() {
            self.core.store.put(key, value);
        } else {
            self.core.node_mut(id).value = Some(value);
        }
    }

    /// Bulk insert in iteration order (unbalanced — §4.3 calls the
    /// balanced variant out as a BST-and-above addition). Returns the
    /// number of items successfully added.
    pub fn add_many<I: IntoIterator<Item = (K, V)>>(&mut self, items: I) -> usize {
        items.into_iter().filter(|(k, v)| self.add(k.clone(), v.clone())).count()
    }

    fn find_by_key(&self, key: &K) -> Option<NodeId> {
        self.core
            .search(self.core.root_id(), |n| n.key() == key, TraversalOptions::new(), true)
            .into_iter()
            .next()
    }

    /// Structural delete (§4.2). Returns zero or one [`DeleteOutcome`] —
    /// wrapped in a `Vec` to match spec's "list of `{deleted,
    /// needBalanced}`" contract, which other operations (`deleteWhere`)
    /// extend to multiple deletions.
    pub fn delete(&mut self, key: &K) -> Vec<DeleteOutcome<K, V>> {
        let Some(target) = self.find_by_key(key) else {
            return Vec::new();
        };
        vec![self.delete_node(target)]
    }

    pub(crate) fn delete_node(&mut self, target: NodeId) -> DeleteOutcome<K, V> {
        let left = self.core.left_id(target);
        let right = self.core.right_id(target);

        // If no parent and no children, `splice_out` reduces to "tree
        // becomes empty" on its own (parent lookup is `None`, only_child
        // is `None`) — no separate case needed for that combination.
        let need_balanced = match left {
            Some(l) => {
                // Swap the rightmost descendant of the left subtree into
                // the target slot, then detach that descendant.
                let rightmost = self.core.get_rightmost(l);
                self.swap_key_value(target, rightmost);
                self.detach_leafish(rightmost)
            }
            None => {
                // Rewire target's right child (if any) into target's own
                // slot — handles both "non-root, right exists", "leaf with
                // a parent", and "root with only a right child" (§4.2).
                self.splice_out(target, right)
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

    /// Copies `from`'s key/value into `into`'s slot in place (used when
    /// deletion swaps the rightmost-of-left-subtree into the target).
    fn swap_key_value(&mut self, into: NodeId, from: NodeId) {
        let from_key = self.core.node(from).key().clone();
        let from_value = self.core.node(from).value().cloned();
        if self.core.store.is_map_mode() {
            // Map-mode values are keyed by K; swapping the node's key
            // means the store entry already belongs to the new key, no
            // copy needed — only the node's own key field moves.
        } else {
            self.core.node_mut(into).value = from_value;
        }
        self.core.node_mut(into).key = from_key;
    }

    /// Detaches a node known to have at most a left child (true for the
    /// rightmost descendant used by delete's two-children case) from its
    /// parent, rewiring that child up. Returns the parent as the
    /// rebalance candidate.
    fn detach_leafish(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.core.parent_id(id).expect("rightmost descendant always has a parent within its subtree");
        let child = self.core.left_id(id);
        let side = self.core.side_of(id).unwrap();
        match child {
            Some(c) => self.core.set_child(parent, side, ChildSlot::Present(c)),
            None => self.core.set_child(parent, side, ChildSlot::Empty),
        }
        Some(parent)
    }

    /// Rewires `target`'s single child into `target`'s own slot (root or
    /// non-root), per §4.2's "rewire target's right child into target's
    /// slot" / "promote right child to root" cases. Returns the node that
    /// SHOULD be re-examined by balanced variants.
    fn splice_out(&mut self, target: NodeId, only_child: Option<NodeId>) -> Option<NodeId> {
        match self.core.parent_id(target) {
            Some(parent) => {
                let side = self.core.side_of(target).unwrap();
                match only_child {
                    Some(c) => self.core.set_child(parent, side, ChildSlot::Present(c)),
                    None => self.core.set_child(parent, side, ChildSlot::Empty),
                }
                Some(parent)
            }
            None => {
                self.core.set_root(only_child);
                only_child
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

    // -- traversal passthroughs ---------------------------------------------------

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

    // -- structural queries -------------------------------------------------------

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

    // -- filter / map -------------------------------------------------------------

    /// In-order iteration; builds a new tree preserving entries that pass
    /// the predicate.
    pub fn filter<F>(&self, mut predicate: F) -> BinaryTree<K, V>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut out = BinaryTree::with_options(TreeOptions {
            is_map_mode: self.core.store.is_map_mode(),
            iteration_type: self.core.iteration_type,
        });
        for (k, v) in self.entries() {
            if predicate(k, v) {
                out.add(k.clone(), v.clone());
            }
        }
        out
    }

    /// In-order iteration; builds a new tree (possibly of different
    /// key/value types) from transformed entries.
    pub fn map<K2, V2, F>(&self, mut f: F) -> BinaryTree<K2, V2>
    where
        K2: Ord + Clone,
        V2: Clone,
        F: FnMut(&K, &V) -> (K2, V2),
    {
        let mut out = BinaryTree::with_options(TreeOptions {
            is_map_mode: self.core.store.is_map_mode(),
            iteration_type: self.core.iteration_type,
        });
        for (k, v) in self.entries() {
            let (k2, v2) = f(k, v);
            out.add(k2, v2);
        }
        out
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        self.core
            .dfs(self.core.root_id(), DfsOrder::In, TraversalOptions::new())
            .into_iter()
            .filter_map(Visited::real)
            .map(|id| {
                let node = self.core.node(id);
                let value = self
                    .core
                    .get_value(id, node.key())
                    .expect("every tree key has a value (§3.5 invariant 3)");
                (node.key(), value)
            })
            .collect()
    }

}

impl<K: Ord + Clone + std::fmt::Display, V: Clone> BinaryTree<K, V> {
    /// Multi-line ASCII-art rendering of the tree shape (§4.2).
    pub fn to_visual(&self) -> String {
        crate::visual::render(&self.core)
    }

    /// Same as [`Self::to_visual`] but with `N`/`U`/`S` markers for
    /// explicit-null, undefined, and NIL-sentinel slots toggled per
    /// [`crate::visual::VisualOptions`].
    pub fn to_visual_with_options(&self, opts: crate::visual::VisualOptions) -> String {
        crate::visual::render_with_options(&self.core, opts)
    }

    pub fn print(&self) {
        println!("{}", self.to_visual());
    }
}
