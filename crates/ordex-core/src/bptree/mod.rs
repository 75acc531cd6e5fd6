//! In-memory B+ tree keyed by any totally ordered type.
//!
//! Nodes live in an arena owned by the tree. Interior nodes own
//! their children through `NodeId` handles; leaves are additionally
//! chained through `prev`/`next` ids so ordered scans never have to climb
//! back through the interior levels.
//!
//! Duplicate keys are allowed. Equal keys are kept in insertion order and
//! each occurrence keeps its own value.

mod comparator;
mod interior;
mod iter;
mod leaf;
mod node;

pub use comparator::Comparator;
pub use iter::BPTreeIter;

pub(crate) use interior::InteriorNode;
pub(crate) use iter::ChainIter;
pub(crate) use leaf::LeafNode;
pub(crate) use node::{Node, NodeArena, NodeId};

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use node::{compare, is_orderable};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Write as _;
use tracing::{debug, trace};

pub struct BPTree<K, V> {
    nodes: NodeArena<K, V>,
    root: NodeId,
    branching_factor: usize,
    len: usize,
}

impl<K: PartialOrd + Clone, V: PartialOrd> BPTree<K, V> {
    /// Creates an empty tree. Fails when `branching_factor` is 2 or less.
    pub fn new(branching_factor: usize) -> Result<Self> {
        Self::with_config(IndexConfig::new(branching_factor))
    }

    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::empty(config.branching_factor))
    }

    /// Builds an empty tree from an already validated branching factor.
    fn empty(branching_factor: usize) -> Self {
        let mut nodes = NodeArena::new();
        let root = nodes.alloc(Node::Leaf(LeafNode::new()));
        BPTree {
            nodes,
            root,
            branching_factor,
            len: 0,
        }
    }

    pub fn branching_factor(&self) -> usize {
        self.branching_factor
    }

    /// Number of entries ever inserted.
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, 1 while the root is still a leaf.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let Node::Interior(interior) = self.nodes.get(current) {
            current = interior.children[0];
            height += 1;
        }
        height
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut current = Some(self.nodes.first_child(self.root));
        while let Some(leaf) = current.and_then(|id| self.nodes.leaf(id)) {
            count += 1;
            current = leaf.next;
        }
        count
    }

    /// Adds an entry. Existing entries with an equal key are kept; the new
    /// one is ordered after them.
    ///
    /// A key or value that cannot be ordered (one that is not equal to
    /// itself, like a float NaN) is rejected and the tree is left untouched.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        if !is_orderable(&key) {
            trace!("rejected insert of an unordered key");
            return Err(Error::InvalidArgument("key cannot be ordered".to_string()));
        }
        if !is_orderable(&value) {
            trace!("rejected insert of an unordered value");
            return Err(Error::InvalidArgument("value cannot be ordered".to_string()));
        }

        if let Some(split) = self.nodes.insert(self.root, key, value, self.branching_factor) {
            let new_root = InteriorNode::with_children(self.root, split.separator, split.sibling);
            self.root = self.nodes.alloc(Node::Interior(new_root));
            debug!(height = self.height(), nodes = self.nodes.len(), "root promoted");
        }

        self.len += 1;
        Ok(())
    }

    /// Inserts pairs in order, stopping at the first rejected one. Returns
    /// how many were inserted.
    pub fn insert_all<I>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut inserted = 0;
        for (key, value) in entries {
            self.insert(key, value)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    /// Value of the earliest inserted entry whose key equals `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        if !is_orderable(key) {
            return None;
        }

        self.scan_from(key)
            .next()
            .filter(|(k, _)| compare(*k, key) == Ordering::Equal)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Values whose key satisfies `comparator` against `key`, sorted by
    /// value. An unrecognised comparator yields an empty result.
    pub fn range_search(&self, key: &K, comparator: &str) -> Vec<V>
    where
        V: Clone,
    {
        match comparator.parse::<Comparator>() {
            Ok(comparator) => self.range_search_by(key, comparator),
            Err(err) => {
                trace!(%err, "range search with unknown comparator");
                Vec::new()
            }
        }
    }

    pub fn range_search_by(&self, key: &K, comparator: Comparator) -> Vec<V>
    where
        V: Clone,
    {
        if !is_orderable(key) {
            return Vec::new();
        }

        // the chain is sorted by key, so every scan stops at its first miss
        let in_range = |(k, _): &(&K, &V)| comparator.accepts(compare(*k, key));
        let mut values: Vec<V> = match comparator {
            Comparator::LessOrEqual => self
                .iter()
                .take_while(in_range)
                .map(|(_, v)| v.clone())
                .collect(),
            Comparator::Equal | Comparator::GreaterOrEqual => self
                .scan_from(key)
                .take_while(in_range)
                .map(|(_, v)| v.clone())
                .collect(),
        };

        values.sort_by(compare);
        values
    }

    pub fn iter(&self) -> BPTreeIter<'_, K, V> {
        BPTreeIter::new(&self.nodes, self.root, self.len)
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Entries from the first one whose key is not less than `key`.
    fn scan_from(&self, key: &K) -> ChainIter<'_, K, V> {
        let leaf = self.nodes.seek(self.root, key);
        let idx = self.nodes.leaf(leaf).map_or(0, |l| l.lower_bound(key));
        ChainIter::new(&self.nodes, leaf, idx)
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    #[cfg(test)]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        self.nodes.get(id)
    }
}

impl<K: PartialOrd + Clone + fmt::Debug, V: PartialOrd> BPTree<K, V> {
    /// Level-by-level rendering of the tree, one line per level. Each
    /// parent's children are grouped in braces, each node shown as its key
    /// list. Meant for diagnostics, the format is not stable.
    pub fn debug_string(&self) -> String {
        let mut out = String::new();
        let mut level: Vec<Vec<NodeId>> = vec![vec![self.root]];

        while !level.is_empty() {
            let mut next_level = Vec::new();

            for (i, group) in level.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('{');
                for (j, id) in group.iter().enumerate() {
                    if j > 0 {
                        out.push_str(", ");
                    }
                    let node = self.nodes.get(*id);
                    let _ = write!(out, "{:?}", node.keys());
                    if let Node::Interior(interior) = node {
                        next_level.push(interior.children.clone());
                    }
                }
                out.push('}');
            }

            out.push('\n');
            level = next_level;
        }

        out
    }
}

impl<K: PartialOrd + Clone + fmt::Debug, V: PartialOrd> fmt::Display for BPTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_string())
    }
}

impl<K: PartialOrd + Clone + fmt::Debug, V: PartialOrd + fmt::Debug> fmt::Debug for BPTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialOrd + Clone, V: PartialOrd> Default for BPTree<K, V> {
    fn default() -> Self {
        Self::empty(IndexConfig::default().branching_factor)
    }
}

impl<'a, K: PartialOrd + Clone, V: PartialOrd> IntoIterator for &'a BPTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = BPTreeIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
