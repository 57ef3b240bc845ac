use std::{borrow::Borrow, fmt};

use tracing::trace;

use crate::{
    bucket::Bucket,
    config::TableConfig,
    directory::Directory,
    error::{Result, TableError},
    hash::{Identity, IdentityKey, KeyHasher},
    iter::{Iter, IterMut, Keys, Values, ValuesMut},
    layout::{DirectoryLayout, Layout},
};

/// A hash table using extendible hashing with bucket-level growth
///
/// Keys are routed by the low `global_depth` bits of their hash through a
/// directory of bucket handles. An overflowing bucket is split in two, and
/// the directory doubles only when that bucket already uses every bit the
/// directory resolves.
#[derive(Clone)]
pub struct ExtendibleHashTable<K, V, H = Identity> {
    directory: Directory<K, V>,
    hasher: H,
    config: TableConfig,
    /// Set by the first insert, after which the hasher is fixed
    hasher_locked: bool,
}

impl<K, V> ExtendibleHashTable<K, V, Identity>
where
    K: IdentityKey,
{
    /// Create an empty table with depth 0, bucket capacity 3 and identity hashing
    #[inline]
    pub fn new() -> Self {
        Self::with_hasher(Identity)
    }
}

impl<K, V, H> ExtendibleHashTable<K, V, H> {
    /// Create an empty table with the default config and provided hasher
    #[inline]
    pub fn with_hasher(hasher: H) -> Self {
        let config = TableConfig::default();
        let directory = Directory::new(config.bucket_capacity, config.max_global_depth);
        Self::build(config, directory, hasher)
    }

    /// Create an empty table from `config` with provided hasher
    pub fn with_config(config: TableConfig, hasher: H) -> Result<Self> {
        config.validate()?;
        let directory = Directory::with_config(&config)?;
        Ok(Self::build(config, directory, hasher))
    }

    fn build(config: TableConfig, directory: Directory<K, V>, hasher: H) -> Self {
        trace!(
            initial_global_depth = config.initial_global_depth,
            bucket_capacity = config.bucket_capacity,
            max_global_depth = config.max_global_depth,
            "creating table"
        );

        Self {
            directory,
            hasher,
            config,
            hasher_locked: false,
        }
    }

    /// Replace the hasher
    ///
    /// Only allowed before the first insert: entries already routed with the
    /// old hasher would become unreachable.
    pub fn set_hasher(&mut self, hasher: H) -> Result<()> {
        if self.hasher_locked {
            return Err(TableError::HasherLocked);
        }
        self.hasher = hasher;
        Ok(())
    }

    /// Returns the number of distinct keys in the table
    #[inline]
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    /// Same as [`len`](Self::len)
    #[inline]
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Returns `true` if the table contains no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Returns a reference to the hasher
    #[inline]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    #[inline]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the global depth of the directory
    #[inline]
    pub fn global_depth(&self) -> u8 {
        self.directory.global_depth()
    }

    /// Returns the number of physical buckets
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.directory.bucket_count()
    }

    #[inline]
    pub fn bucket_capacity(&self) -> usize {
        self.directory.bucket_capacity()
    }

    /// Clears the table, returning to the initial directory
    ///
    /// The hasher may be replaced again afterwards.
    pub fn clear(&mut self) {
        self.directory.reset(self.config.initial_global_depth);
        self.hasher_locked = false;
    }

    /// Buckets in handle order, each exactly once
    #[inline]
    pub fn buckets(&self) -> &[Bucket<K, V>] {
        self.directory.buckets()
    }

    /// Bucket handle held by each directory slot
    #[inline]
    pub fn directory_slots(&self) -> &[usize] {
        self.directory.slots()
    }

    /// Read-only view printing the directory and every bucket
    pub fn layout(&self) -> Layout<'_, K, V> {
        Layout::new(&self.directory)
    }

    /// Read-only view printing the directory slots only
    pub fn directory_layout(&self) -> DirectoryLayout<'_, K, V> {
        DirectoryLayout::new(&self.directory)
    }
}

impl<K, V, H> ExtendibleHashTable<K, V, H>
where
    K: Eq,
{
    /// Inserts a key-value pair into the table
    ///
    /// If the table did not have this key present, `Ok(None)` is returned.
    /// If it did, the value is updated and the old value is returned.
    /// Fails with [`TableError::DepthExhausted`] when the key's hash cannot be
    /// separated from a full bucket, leaving the table unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>>
    where
        H: KeyHasher<K>,
    {
        let hash = self.hasher.hash_key(&key);
        let hasher = &self.hasher;

        let result = self
            .directory
            .insert(hash, key, value, |k| hasher.hash_key(k));
        if result.is_ok() {
            self.hasher_locked = true;
        }
        result
    }

    /// Returns a reference to the value associated with the given key
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        self.directory.get(self.hasher.hash_key(key), key)
    }

    /// Returns a mutable reference to the value associated with the given key
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        let hash = self.hasher.hash_key(key);
        self.directory.get_mut(hash, key)
    }

    /// Returns the directory index routing to `key`, if present
    #[inline]
    pub fn search<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        self.directory.search(self.hasher.hash_key(key), key)
    }

    /// Return `true` if the table contains a value for the given key
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        self.search(key).is_some()
    }

    /// Removes a key from the table, returning its value
    ///
    /// Buckets are never merged and the directory never shrinks.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        let hash = self.hasher.hash_key(key);
        self.directory.remove(hash, key)
    }

    /// An iterator visiting all key-value pairs in bucket order
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.directory.buckets(), self.directory.len())
    }

    /// An iterator visiting all key-value pairs with mutable values
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let len = self.directory.len();
        IterMut::new(self.directory.buckets_mut(), len)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }
}

impl<K, V> Default for ExtendibleHashTable<K, V, Identity>
where
    K: IdentityKey,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> fmt::Debug for ExtendibleHashTable<K, V, H>
where
    K: Eq + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
