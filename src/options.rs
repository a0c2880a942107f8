//! Constructor option bags (§6).

use crate::comparator::Comparator;
use crate::iteration::IterationType;

/// Options accepted by [`crate::binary_tree::BinaryTree`]'s constructors.
#[derive(Debug, Clone, Copy)]
pub struct TreeOptions {
    pub iteration_type: IterationType,
    pub is_map_mode: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        TreeOptions {
            iteration_type: IterationType::default(),
            is_map_mode: true,
        }
    }
}

/// Options accepted by every ordered variant's constructors (BST and
/// above): adds `comparator` and `is_reverse` on top of [`TreeOptions`].
#[derive(Clone)]
pub struct OrderedOptions<K> {
    pub iteration_type: IterationType,
    pub is_map_mode: bool,
    pub comparator: Option<Comparator<K>>,
    pub is_reverse: bool,
}

impl<K: Ord> Default for OrderedOptions<K> {
    fn default() -> Self {
        OrderedOptions {
            iteration_type: IterationType::default(),
            is_map_mode: true,
            comparator: None,
            is_reverse: false,
        }
    }
}

impl<K: Ord + 'static> OrderedOptions<K> {
    pub fn resolved_comparator(&self) -> Comparator<K> {
        let base = self.comparator.clone().unwrap_or_default();
        if self.is_reverse {
            crate::comparator::reversed(base)
        } else {
            base
        }
    }
}
