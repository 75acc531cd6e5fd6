pub mod error;
pub mod config;

pub mod bptree;
pub mod shared;

pub use error::{Error, Result};
pub use config::{IndexConfig, DEFAULT_BRANCHING_FACTOR, MIN_BRANCHING_FACTOR};
pub use bptree::{BPTree, BPTreeIter, Comparator};
pub use shared::SharedIndex;
