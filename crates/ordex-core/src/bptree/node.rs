use super::{InteriorNode, LeafNode};
use std::cmp::Ordering;
use tracing::trace;

/// Handle to a node stored in a [`NodeArena`].
///
/// A node id is owned by exactly one place: the tree's root slot or its
/// parent's child list. Leaf sibling links also hold ids, but only for
/// traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(super) fn index(self) -> usize {
        self.0
    }
}

pub enum Node<K, V> {
    Leaf(LeafNode<K, V>),
    Interior(InteriorNode<K>),
}

/// Result of a node split: the right-hand sibling and the separator the
/// parent must route to it.
pub struct Split<K> {
    pub separator: K,
    pub sibling: NodeId,
}

/// Orders two keys that both passed [`is_orderable`].
pub(super) fn compare<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// A value that does not compare equal to itself (a float NaN, for one)
/// has no place in a sorted sequence.
pub(super) fn is_orderable<T: PartialOrd>(value: &T) -> bool {
    value.partial_cmp(value) == Some(Ordering::Equal)
}

impl<K: PartialOrd, V> Node<K, V> {
    pub fn keys(&self) -> &[K] {
        match self {
            Node::Leaf(leaf) => &leaf.keys,
            Node::Interior(interior) => &interior.keys,
        }
    }

    pub fn is_overflow(&self, branching_factor: usize) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.is_overflow(branching_factor),
            Node::Interior(interior) => interior.is_overflow(branching_factor),
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode<K, V>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }
}

/// Backing store for every node of one tree. Nodes are never freed, the
/// index has no delete path.
pub struct NodeArena<K, V> {
    nodes: Vec<Node<K, V>>,
}

impl<K: PartialOrd + Clone, V> NodeArena<K, V> {
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.index()]
    }

    pub fn leaf(&self, id: NodeId) -> Option<&LeafNode<K, V>> {
        self.get(id).as_leaf()
    }

    fn leaf_mut(&mut self, id: NodeId) -> Option<&mut LeafNode<K, V>> {
        match &mut self.nodes[id.index()] {
            Node::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Inserts into the subtree rooted at `id`. Returns the new right-hand
    /// sibling when the node overflowed and had to split.
    pub fn insert(&mut self, id: NodeId, key: K, value: V, branching_factor: usize) -> Option<Split<K>> {
        let idx = match &mut self.nodes[id.index()] {
            Node::Leaf(leaf) => {
                leaf.insert(key, value);
                return if leaf.is_overflow(branching_factor) {
                    Some(self.split(id))
                } else {
                    None
                };
            }
            Node::Interior(interior) => interior.child_index(&key),
        };

        let child = self.child_at(id, idx);
        let split = self.insert(child, key, value, branching_factor)?;
        debug_assert!(self.first_leaf_key(split.sibling) == Some(&split.separator));

        if let Node::Interior(interior) = &mut self.nodes[id.index()] {
            interior.insert_child(idx, split.separator, split.sibling);
        }

        if self.get(id).is_overflow(branching_factor) {
            Some(self.split(id))
        } else {
            None
        }
    }

    fn child_at(&self, id: NodeId, idx: usize) -> NodeId {
        match self.get(id) {
            Node::Interior(interior) => interior.children[idx],
            Node::Leaf(_) => unreachable!("leaf {:?} has no children", id),
        }
    }

    /// Splits node `id` in place, keeping the left half, and allocates the
    /// right half as a new node.
    pub fn split(&mut self, id: NodeId) -> Split<K> {
        let sibling = NodeId(self.nodes.len());

        match &mut self.nodes[id.index()] {
            Node::Leaf(leaf) => {
                let mut right = leaf.split_off();
                right.prev = Some(id);
                right.next = leaf.next.replace(sibling);

                let separator = right.keys[0].clone();
                let successor = right.next;
                trace!(left = leaf.len(), right = right.len(), "leaf split");

                self.nodes.push(Node::Leaf(right));
                if let Some(leaf) = successor.and_then(|next| self.leaf_mut(next)) {
                    leaf.prev = Some(sibling);
                }

                Split { separator, sibling }
            }
            Node::Interior(interior) => {
                let (separator, right) = interior.split_off();
                trace!(
                    left = interior.children.len(),
                    right = right.children.len(),
                    "interior split"
                );

                self.nodes.push(Node::Interior(right));
                Split { separator, sibling }
            }
        }
    }

    /// Smallest key reachable from `id`, `None` for an empty leaf.
    pub fn first_leaf_key(&self, id: NodeId) -> Option<&K> {
        match self.get(id) {
            Node::Leaf(leaf) => leaf.keys.first(),
            Node::Interior(interior) => self.first_leaf_key(interior.children[0]),
        }
    }

    /// Leftmost leaf of the subtree rooted at `id`.
    pub fn first_child(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Node::Interior(interior) = self.get(current) {
            current = interior.children[0];
        }
        current
    }

    pub fn last_child(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Node::Interior(interior) = self.get(current) {
            current = interior.children[interior.children.len() - 1];
        }
        current
    }

    /// Leaf that holds the first entry not less than `key`, or the leaf
    /// just before it when every entry of that leaf is smaller.
    pub fn seek(&self, id: NodeId, key: &K) -> NodeId {
        let mut current = id;
        while let Node::Interior(interior) = self.get(current) {
            current = interior.children[interior.lower_bound_child(key)];
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with_root() -> (NodeArena<i32, i32>, NodeId) {
        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::Leaf(LeafNode::new()));
        (arena, root)
    }

    #[test]
    fn test_is_orderable() {
        assert!(is_orderable(&1.5f64));
        assert!(is_orderable(&"key"));
        assert!(!is_orderable(&f64::NAN));
    }

    #[test]
    fn test_leaf_split_links_siblings() {
        let (mut arena, root) = arena_with_root();
        for k in [1, 2, 3] {
            assert!(arena.insert(root, k, k, 4).is_none());
        }

        let split = arena.insert(root, 4, 4, 4).expect("leaf should split at 4 entries");
        assert_eq!(split.separator, 3);

        let left = arena.leaf(root).unwrap();
        let right = arena.leaf(split.sibling).unwrap();
        assert_eq!(left.keys, vec![1, 2]);
        assert_eq!(right.keys, vec![3, 4]);
        assert_eq!(left.next, Some(split.sibling));
        assert_eq!(right.prev, Some(root));
        assert_eq!(right.next, None);
    }

    #[test]
    fn test_middle_split_repairs_successor_link() {
        let (mut arena, root) = arena_with_root();
        arena.insert(root, 10, 10, 3);
        arena.insert(root, 20, 20, 3);
        let first = arena.insert(root, 30, 30, 3).expect("leaf should split at 3 entries");

        // [10, 20] overflows again; its new sibling lands between it and `first`
        let second = arena.insert(root, 5, 5, 3).expect("left leaf should overflow");
        assert_eq!(arena.leaf(second.sibling).unwrap().keys, vec![20]);

        assert_eq!(arena.leaf(root).unwrap().next, Some(second.sibling));
        assert_eq!(arena.leaf(second.sibling).unwrap().next, Some(first.sibling));
        assert_eq!(arena.leaf(first.sibling).unwrap().prev, Some(second.sibling));
    }

    #[test]
    fn test_node_overflow_dispatches_by_kind() {
        let (mut arena, root) = arena_with_root();
        for k in [1, 2] {
            arena.insert(root, k, k, 3);
        }
        assert!(!arena.get(root).is_overflow(3));
        arena.insert(root, 3, 3, 4);
        assert!(arena.get(root).is_overflow(3));

        let children = (0..4).map(|_| arena.alloc(Node::Leaf(LeafNode::new()))).collect();
        let interior: Node<i32, i32> = Node::Interior(InteriorNode { keys: vec![10, 20, 30], children });
        assert!(!interior.is_overflow(4));
        assert!(interior.is_overflow(3));
        assert_eq!(interior.keys(), &[10, 20, 30]);
        assert!(interior.as_leaf().is_none());
    }

    #[test]
    fn test_first_leaf_key_of_empty_leaf() {
        let (arena, root) = arena_with_root();
        assert_eq!(arena.first_leaf_key(root), None);
        assert_eq!(arena.first_child(root), root);
        assert_eq!(arena.last_child(root), root);
    }
}
