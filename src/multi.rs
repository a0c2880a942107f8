//! Multi-key/multi-set adapters (§4.5): compose [`Bst`] with the
//! per-node `count` field the substrate already carries for exactly this
//! purpose. Adding an existing key bumps `count`; deleting decrements it
//! and only removes the node once `count` reaches zero.

use crate::bst::Bst;
use crate::comparator::Comparator;
use crate::node::Node;
use crate::options::OrderedOptions;

/// An ordered map that tracks how many times each key was added.
#[derive(Clone)]
pub struct TreeMultiMap<K, V> {
    inner: Bst<K, V>,
}

impl<K: Ord + Clone + 'static, V: Clone> Default for TreeMultiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + 'static, V: Clone> TreeMultiMap<K, V> {
    pub fn new() -> Self {
        TreeMultiMap { inner: Bst::new() }
    }

    pub fn with_comparator(comparator: Comparator<K>) -> Self {
        TreeMultiMap { inner: Bst::with_comparator(comparator) }
    }

    pub fn with_options(opts: OrderedOptions<K>) -> Self {
        TreeMultiMap { inner: Bst::with_options(opts) }
    }

    /// Distinct key count, not the sum of multiplicities (use
    /// [`Self::total_count`] for that).
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear()
    }

    /// Sum of every key's multiplicity — the total number of logical
    /// entries, as opposed to [`Self::size`]'s distinct-key count.
    pub fn total_count(&self) -> usize {
        self.inner.dfs(crate::iteration::DfsOrder::In, crate::iteration::TraversalOptions::new())
            .into_iter()
            .map(|n| n.count())
            .sum()
    }

    /// Adds one occurrence of `key`. A key seen for the first time starts
    /// at multiplicity 1; every subsequent `add` for the same key bumps
    /// the counter and replaces the stored value, mirroring the value
    /// semantics a plain `add` would have.
    pub fn add(&mut self, key: K, value: V) -> bool {
        if let Some(id) = self.inner.find_node_id(&key) {
            self.inner.add(key, value);
            self.inner.core.node_mut(id).count += 1;
            true
        } else {
            self.inner.add(key, value)
        }
    }

    pub fn count_of(&self, key: &K) -> usize {
        self.inner.get_node(key).map(Node::count).unwrap_or(0)
    }

    /// Removes one occurrence of `key`. The node (and its value) is only
    /// actually removed from the tree once its multiplicity reaches zero.
    pub fn delete(&mut self, key: &K) -> bool {
        let Some(id) = self.inner.find_node_id(key) else {
            return false;
        };
        let count = self.inner.core.node(id).count();
        if count > 1 {
            self.inner.core.node_mut(id).count = count - 1;
        } else {
            self.inner.delete(key);
        }
        true
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    pub fn has(&self, key: &K) -> bool {
        self.inner.has(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.inner.iter()
    }
}

/// A multi-set: a [`TreeMultiMap`] with no payload beyond the key itself.
#[derive(Clone)]
pub struct TreeMultiSet<K> {
    inner: TreeMultiMap<K, ()>,
}

impl<K: Ord + Clone + 'static> Default for TreeMultiSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + 'static> TreeMultiSet<K> {
    pub fn new() -> Self {
        TreeMultiSet { inner: TreeMultiMap::new() }
    }

    pub fn with_comparator(comparator: Comparator<K>) -> Self {
        TreeMultiSet { inner: TreeMultiMap::with_comparator(comparator) }
    }

    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.inner.total_count()
    }

    pub fn count_of(&self, key: &K) -> usize {
        self.inner.count_of(key)
    }

    pub fn add(&mut self, key: K) -> bool {
        self.inner.add(key, ())
    }

    pub fn delete(&mut self, key: &K) -> bool {
        self.inner.delete(key)
    }

    pub fn has(&self, key: &K) -> bool {
        self.inner.has(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.inner.iter().map(|(k, _)| k)
    }
}

/// A thin wrapper over the ordered map ignoring values entirely (§4.5):
/// membership is key presence, with no multiplicity tracking at all.
#[derive(Clone)]
pub struct TreeSet<K> {
    inner: Bst<K, ()>,
}

impl<K: Ord + Clone + 'static> Default for TreeSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + 'static> TreeSet<K> {
    pub fn new() -> Self {
        TreeSet { inner: Bst::new() }
    }

    pub fn with_comparator(comparator: Comparator<K>) -> Self {
        TreeSet { inner: Bst::with_comparator(comparator) }
    }

    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub fn len(&self) -> usize {
        self.inner.size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear()
    }

    pub fn add(&mut self, key: K) -> bool {
        self.inner.add(key, ())
    }

    pub fn delete(&mut self, key: &K) -> bool {
        !self.inner.delete(key).is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.has(key)
    }

    pub fn ceiling(&self, target: &K) -> Option<&K> {
        self.inner.ceiling(target).map(|n| n.key())
    }

    pub fn floor(&self, target: &K) -> Option<&K> {
        self.inner.floor(target).map(|n| n.key())
    }

    pub fn higher(&self, target: &K) -> Option<&K> {
        self.inner.higher(target).map(|n| n.key())
    }

    pub fn lower(&self, target: &K) -> Option<&K> {
        self.inner.lower(target).map(|n| n.key())
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.inner.iter().map(|(k, _)| k)
    }
}

impl<K: Ord + Clone + 'static> FromIterator<K> for TreeSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = TreeSet::new();
        for k in iter {
            set.add(k);
        }
        set
    }
}
