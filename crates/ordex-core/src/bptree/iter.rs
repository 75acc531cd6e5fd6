use super::node::{NodeArena, NodeId};
use super::LeafNode;
use std::iter::FusedIterator;

/// In-order iterator over `(key, value)` pairs, following the leaf chain
/// forward with `next` and backward with `next_back`.
pub struct BPTreeIter<'a, K, V> {
    nodes: &'a NodeArena<K, V>,
    /// Leaf and index of the next entry to yield from the front.
    front: Option<(NodeId, usize)>,
    /// Leaf and index one past the next entry to yield from the back.
    back: Option<(NodeId, usize)>,
    remaining: usize,
}

impl<'a, K: PartialOrd + Clone, V> BPTreeIter<'a, K, V> {
    pub(super) fn new(nodes: &'a NodeArena<K, V>, root: NodeId, len: usize) -> Self {
        let first = nodes.first_child(root);
        let last = nodes.last_child(root);
        let last_len = nodes.leaf(last).map_or(0, LeafNode::len);

        BPTreeIter {
            nodes,
            front: Some((first, 0)),
            back: Some((last, last_len)),
            remaining: len,
        }
    }
}

impl<'a, K: PartialOrd + Clone, V> Iterator for BPTreeIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        loop {
            let (id, idx) = self.front?;
            let leaf = self.nodes.leaf(id)?;

            if idx < leaf.len() {
                self.front = Some((id, idx + 1));
                self.remaining -= 1;
                return Some((&leaf.keys[idx], &leaf.values[idx]));
            }

            self.front = leaf.next.map(|next| (next, 0));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: PartialOrd + Clone, V> DoubleEndedIterator for BPTreeIter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        loop {
            let (id, end) = self.back?;
            let leaf = self.nodes.leaf(id)?;

            if end > 0 {
                self.back = Some((id, end - 1));
                self.remaining -= 1;
                return Some((&leaf.keys[end - 1], &leaf.values[end - 1]));
            }

            self.back = leaf
                .prev
                .and_then(|prev| self.nodes.leaf(prev).map(|p| (prev, p.len())));
        }
    }
}

impl<'a, K: PartialOrd + Clone, V> ExactSizeIterator for BPTreeIter<'a, K, V> {}

impl<'a, K: PartialOrd + Clone, V> FusedIterator for BPTreeIter<'a, K, V> {}

/// Forward walk along the leaf chain starting at a given slot of a leaf.
/// Used by lookups once the starting leaf has been located.
pub struct ChainIter<'a, K, V> {
    nodes: &'a NodeArena<K, V>,
    current: Option<(NodeId, usize)>,
}

impl<'a, K: PartialOrd + Clone, V> ChainIter<'a, K, V> {
    pub(super) fn new(nodes: &'a NodeArena<K, V>, leaf: NodeId, idx: usize) -> Self {
        ChainIter {
            nodes,
            current: Some((leaf, idx)),
        }
    }
}

impl<'a, K: PartialOrd + Clone, V> Iterator for ChainIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, idx) = self.current?;
            let leaf = self.nodes.leaf(id)?;

            if idx < leaf.len() {
                self.current = Some((id, idx + 1));
                return Some((&leaf.keys[idx], &leaf.values[idx]));
            }

            self.current = leaf.next.map(|next| (next, 0));
        }
    }
}

impl<'a, K: PartialOrd + Clone, V> FusedIterator for ChainIter<'a, K, V> {}
