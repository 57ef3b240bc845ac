//! # Extendible Hash
//!
//! An in-memory hash table built on extendible hashing.
//!
//! Keys are routed by the low `global_depth` bits of their hash through a
//! directory of bucket handles. Several directory slots may alias one bucket;
//! an overflowing bucket splits on the next hash bit, and the directory
//! doubles only when that bucket already uses every bit the directory
//! resolves. Nothing is ever rehashed wholesale.
//!
//! ## Basic Usage
//!
//! ```rust
//! use extendible_hash::{ExtendibleHashTable, TableError};
//!
//! let mut table = ExtendibleHashTable::new();
//!
//! table.insert(5u64, "five").unwrap();
//! table.insert(13u64, "thirteen").unwrap();
//! assert_eq!(table.get(&5), Some(&"five"));
//!
//! // inserting an existing key overwrites in place
//! assert_eq!(table.insert(5, "FIVE"), Ok(Some("five")));
//! assert_eq!(table.size(), 2);
//!
//! assert_eq!(table.remove(&13), Ok("thirteen"));
//! assert_eq!(table.remove(&13), Err(TableError::KeyNotFound));
//! ```
//!
//! ## Custom Hashing
//!
//! ```rust
//! use extendible_hash::{ExtendibleHashTable, Hashed, TableConfig};
//!
//! let config = TableConfig::new().bucket_capacity(8);
//! let mut table = ExtendibleHashTable::with_config(config, Hashed::random()).unwrap();
//!
//! table.insert("apple".to_string(), 1).unwrap();
//! assert!(table.contains("apple"));
//! ```

mod bucket;
mod config;
mod directory;
mod error;
mod hash;
mod iter;
mod layout;
mod table;

pub use bucket::Bucket;
pub use config::{
    TableConfig, DEFAULT_BUCKET_CAPACITY, DEFAULT_MAX_GLOBAL_DEPTH, MAX_INITIAL_GLOBAL_DEPTH,
};
pub use error::{Result, TableError};
pub use hash::{Hashed, Identity, IdentityKey, KeyHasher, HASH_BITS};
pub use iter::{Iter, IterMut, Keys, Values, ValuesMut};
pub use layout::{DirectoryLayout, Layout};
pub use table::ExtendibleHashTable;
