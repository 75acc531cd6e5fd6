use super::node::{compare, NodeId};
use std::cmp::Ordering;

pub struct LeafNode<K, V> {
    pub(super) keys: Vec<K>,
    pub(super) values: Vec<V>,
    pub(super) prev: Option<NodeId>,
    pub(super) next: Option<NodeId>,
}

impl<K: PartialOrd, V> LeafNode<K, V> {
    pub fn new() -> Self {
        LeafNode {
            keys: Vec::new(),
            values: Vec::new(),
            prev: None,
            next: None,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Index of the first key not less than `key`.
    pub fn lower_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| compare(k, key) == Ordering::Less)
    }

    /// Index just past the last key equal to `key`.
    pub fn upper_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| compare(k, key) != Ordering::Greater)
    }

    /// Places the pair after every key that is not greater than `key`, so
    /// duplicates keep their insertion order.
    pub fn insert(&mut self, key: K, value: V) {
        let idx = self.upper_bound(&key);
        self.keys.insert(idx, key);
        self.values.insert(idx, value);
    }

    pub fn is_overflow(&self, branching_factor: usize) -> bool {
        self.keys.len() >= branching_factor
    }

    /// Moves the entries from the median onward into a new, unlinked leaf.
    pub fn split_off(&mut self) -> LeafNode<K, V> {
        let mid = (self.keys.len() + 1) / 2;

        LeafNode {
            keys: self.keys.split_off(mid),
            values: self.values.split_off(mid),
            prev: None,
            next: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_of(keys: &[i32]) -> LeafNode<i32, i32> {
        let mut leaf = LeafNode::new();
        for &k in keys {
            leaf.insert(k, k * 10);
        }
        leaf
    }

    #[test]
    fn test_insert_keeps_keys_sorted() {
        let leaf = leaf_of(&[5, 1, 3, 4, 2]);
        assert_eq!(leaf.keys, &[1, 2, 3, 4, 5]);
        assert_eq!(leaf.values, &[10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_duplicates_keep_insertion_order() {
        let mut leaf = LeafNode::new();
        leaf.insert(2, "first");
        leaf.insert(1, "low");
        leaf.insert(2, "second");
        leaf.insert(3, "high");
        leaf.insert(2, "third");

        assert_eq!(leaf.keys, &[1, 2, 2, 2, 3]);
        assert_eq!(leaf.values, &["low", "first", "second", "third", "high"]);
    }

    #[test]
    fn test_insert_past_last_key() {
        // the last slot must be compared too, not just appended to
        let leaf = leaf_of(&[1, 3, 2]);
        assert_eq!(leaf.keys, &[1, 2, 3]);
    }

    #[test]
    fn test_bounds() {
        let leaf = leaf_of(&[1, 2, 2, 4]);
        assert_eq!(leaf.lower_bound(&2), 1);
        assert_eq!(leaf.upper_bound(&2), 3);
        assert_eq!(leaf.lower_bound(&3), 3);
        assert_eq!(leaf.lower_bound(&9), 4);
        assert_eq!(leaf.lower_bound(&0), 0);
    }

    #[test]
    fn test_overflow_threshold() {
        let leaf = leaf_of(&[1, 2, 3]);
        assert!(!leaf.is_overflow(4));
        assert!(leaf.is_overflow(3));
    }

    #[test]
    fn test_split_off_at_median() {
        let mut even = leaf_of(&[1, 2, 3, 4]);
        let right = even.split_off();
        assert_eq!(even.keys, &[1, 2]);
        assert_eq!(right.keys, &[3, 4]);
        assert_eq!(right.values, &[30, 40]);

        let mut odd = leaf_of(&[1, 2, 3, 4, 5]);
        let right = odd.split_off();
        assert_eq!(odd.keys, &[1, 2, 3]);
        assert_eq!(right.keys, &[4, 5]);
    }
}
