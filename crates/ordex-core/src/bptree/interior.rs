use super::node::{compare, NodeId};
use std::cmp::Ordering;

pub struct InteriorNode<K> {
    pub(super) keys: Vec<K>,
    pub(super) children: Vec<NodeId>,
}

impl<K: PartialOrd> InteriorNode<K> {
    /// A fresh root over two subtrees.
    pub fn with_children(left: NodeId, separator: K, right: NodeId) -> Self {
        InteriorNode {
            keys: vec![separator],
            children: vec![left, right],
        }
    }

    /// Child that covers `key` for insertion. An exact separator match
    /// routes right, since a separator is the first key of its right child.
    /// With repeated separators this picks the rightmost candidate, which
    /// keeps a new duplicate behind the ones already stored.
    pub fn child_index(&self, key: &K) -> usize {
        self.keys.partition_point(|k| compare(k, key) != Ordering::Greater)
    }

    /// Child holding the first entry not less than `key`. Differs from
    /// [`child_index`](Self::child_index) only when duplicates of a
    /// separator spilled into the child to its left.
    pub fn lower_bound_child(&self, key: &K) -> usize {
        self.keys.partition_point(|k| compare(k, key) == Ordering::Less)
    }

    /// Splices a split-off sibling in directly after the child at `idx`.
    pub fn insert_child(&mut self, idx: usize, separator: K, child: NodeId) {
        self.keys.insert(idx, separator);
        self.children.insert(idx + 1, child);
    }

    pub fn is_overflow(&self, branching_factor: usize) -> bool {
        self.children.len() > branching_factor
    }

    /// Splits at the median key. The median is returned for the parent and
    /// kept in neither half.
    pub fn split_off(&mut self) -> (K, InteriorNode<K>) {
        let mid = (self.keys.len() + 1) / 2;

        let new_keys = self.keys.split_off(mid + 1);
        let new_children = self.children.split_off(mid + 1);
        let middle_key = self.keys.remove(mid);

        (
            middle_key,
            InteriorNode {
                keys: new_keys,
                children: new_children,
            },
        )
    }
}
