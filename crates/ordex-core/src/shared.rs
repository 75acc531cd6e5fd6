//! Thread-shareable handle around a [`BPTree`].
//!
//! The tree is not safe to mutate while a scan walks its leaf chain, so
//! every insert takes the write lock and every query takes the read lock.

use crate::bptree::{BPTree, Comparator};
use crate::config::IndexConfig;
use crate::error::Result;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

pub struct SharedIndex<K, V> {
    inner: Arc<RwLock<BPTree<K, V>>>,
}

impl<K, V> Clone for SharedIndex<K, V> {
    fn clone(&self) -> Self {
        SharedIndex {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: PartialOrd + Clone, V: PartialOrd + Clone> SharedIndex<K, V> {
    pub fn new(branching_factor: usize) -> Result<Self> {
        Self::with_config(IndexConfig::new(branching_factor))
    }

    pub fn with_config(config: IndexConfig) -> Result<Self> {
        Ok(Self::from_tree(BPTree::with_config(config)?))
    }

    pub fn from_tree(tree: BPTree<K, V>) -> Self {
        SharedIndex {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    pub fn insert(&self, key: K, value: V) -> Result<()> {
        self.inner.write().insert(key, value)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.read().get(key).cloned()
    }

    pub fn range_search(&self, key: &K, comparator: &str) -> Vec<V> {
        self.inner.read().range_search(key, comparator)
    }

    pub fn range_search_by(&self, key: &K, comparator: Comparator) -> Vec<V> {
        self.inner.read().range_search_by(key, comparator)
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    pub fn height(&self) -> usize {
        self.inner.read().height()
    }

    /// Runs `f` against the tree under the read lock.
    pub fn with_tree<R>(&self, f: impl FnOnce(&BPTree<K, V>) -> R) -> R {
        f(&self.inner.read())
    }
}

impl<K: PartialOrd + Clone + fmt::Debug, V: PartialOrd + Clone> SharedIndex<K, V> {
    pub fn debug_string(&self) -> String {
        self.inner.read().debug_string()
    }
}
