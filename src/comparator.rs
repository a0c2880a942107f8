//! The ordering used by every ordered variant (BST and above).

use std::cmp::Ordering;
use std::sync::Arc;

/// A total order over keys, matching spec's `comparator: (a, b) => number`.
///
/// Wrapped in `Arc` rather than `Box` so trees can be cloned (§4.2's
/// `clone()`) without requiring `K: Clone` comparator closures to be
/// re-derived — the comparator itself is shared, immutable, cheap to copy.
#[derive(Clone)]
pub struct Comparator<K>(Arc<dyn Fn(&K, &K) -> Ordering + Send + Sync>);

impl<K> Comparator<K> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&K, &K) -> Ordering + Send + Sync + 'static,
    {
        Comparator(Arc::new(f))
    }

    pub(crate) fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a, b)
    }
}

impl<K: Ord> Default for Comparator<K> {
    /// The default comparator delegates to `Ord`. Unlike a dynamically
    /// typed host language, Rust rejects non-comparable key types at
    /// compile time via the `K: Ord` bound itself, so there is no runtime
    /// "type error on object keys" case to guard against here — see
    /// DESIGN.md's resolution of that Open Question.
    fn default() -> Self {
        Comparator::new(|a, b| a.cmp(b))
    }
}

/// Wraps a comparator so it produces the reverse order, realizing the
/// `isReverse` option without threading a boolean through every
/// comparison call site.
pub(crate) fn reversed<K>(cmp: Comparator<K>) -> Comparator<K>
where
    K: 'static,
{
    Comparator::new(move |a, b| cmp.compare(a, b).reverse())
}
