//! Table configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TableError},
    hash::HASH_BITS,
};

/// Default number of entries per bucket
pub const DEFAULT_BUCKET_CAPACITY: usize = 3;

/// Default upper bound on the global depth (`2^24` directory slots)
pub const DEFAULT_MAX_GLOBAL_DEPTH: u8 = 24;

/// Largest initial global depth; the initial directory is allocated eagerly
pub const MAX_INITIAL_GLOBAL_DEPTH: u8 = 20;

/// Sizing parameters fixed at table construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TableConfig {
    /// Global depth of the initial directory (`2^depth` buckets are created)
    pub initial_global_depth: u8,

    /// Maximum number of entries a bucket holds before it must split
    pub bucket_capacity: usize,

    /// Largest global depth the directory may grow to
    pub max_global_depth: u8,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_global_depth: 0,
            bucket_capacity: DEFAULT_BUCKET_CAPACITY,
            max_global_depth: DEFAULT_MAX_GLOBAL_DEPTH,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn initial_global_depth(mut self, depth: u8) -> Self {
        self.initial_global_depth = depth;
        self
    }

    #[must_use]
    pub fn bucket_capacity(mut self, capacity: usize) -> Self {
        self.bucket_capacity = capacity;
        self
    }

    #[must_use]
    pub fn max_global_depth(mut self, depth: u8) -> Self {
        self.max_global_depth = depth;
        self
    }

    /// Check the parameters describe a directory that can be addressed
    pub fn validate(&self) -> Result<()> {
        if self.bucket_capacity == 0 {
            return Err(TableError::InvalidConfig(
                "bucket capacity must be at least 1".to_string(),
            ));
        }

        // the directory length 2^depth must fit in a usize
        let addressable = HASH_BITS.min((usize::BITS - 1) as u8);
        if self.max_global_depth > addressable {
            return Err(TableError::InvalidConfig(format!(
                "max global depth {} exceeds addressable depth {}",
                self.max_global_depth, addressable
            )));
        }

        if self.initial_global_depth > MAX_INITIAL_GLOBAL_DEPTH {
            return Err(TableError::InvalidConfig(format!(
                "initial global depth {} exceeds {}",
                self.initial_global_depth, MAX_INITIAL_GLOBAL_DEPTH
            )));
        }

        if self.initial_global_depth > self.max_global_depth {
            return Err(TableError::InvalidConfig(format!(
                "initial global depth {} exceeds max global depth {}",
                self.initial_global_depth, self.max_global_depth
            )));
        }

        Ok(())
    }
}
