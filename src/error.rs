use thiserror::Error;

/// Errors returned by table and bucket operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The key is not present
    #[error("key not found")]
    KeyNotFound,

    /// A bucket was asked to take a new key while full
    ///
    /// Inserts through the table always split first, so seeing this from the
    /// public API indicates a bug.
    #[error("bucket capacity of {capacity} exceeded")]
    CapacityExceeded { capacity: usize },

    /// Colliding hashes cannot be separated within the allowed global depth
    #[error("hash collisions cannot be resolved within a global depth of {depth}")]
    DepthExhausted { depth: u8 },

    /// The hasher can no longer be replaced because keys have been routed with it
    #[error("hasher cannot be replaced after the first insert")]
    HasherLocked,

    /// Configuration rejected by validation
    #[error("invalid table configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = TableError> = std::result::Result<T, E>;
