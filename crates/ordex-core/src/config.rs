use crate::error::{Error, Result};

/// Smallest branching factor an index accepts.
pub const MIN_BRANCHING_FACTOR: usize = 3;

pub const DEFAULT_BRANCHING_FACTOR: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Maximum number of children an internal node may hold. Leaves split
    /// once they reach this many entries.
    pub branching_factor: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            branching_factor: DEFAULT_BRANCHING_FACTOR,
        }
    }
}

impl IndexConfig {
    pub fn new(branching_factor: usize) -> Self {
        IndexConfig { branching_factor }
    }

    pub fn validate(&self) -> Result<()> {
        if self.branching_factor < MIN_BRANCHING_FACTOR {
            return Err(Error::InvalidArgument(format!(
                "illegal branching factor: {}",
                self.branching_factor
            )));
        }

        Ok(())
    }
}
