//! Fixed-capacity bucket of key-value pairs.
//!
//! - Entries stored inline in insertion order
//! - Capacity fixed at creation, shared table-wide
//! - Local depth tracks how many low hash bits the entries share
//! - No knowledge of the directory

use std::borrow::Borrow;

use crate::error::{Result, TableError};

/// Bucket holding at most `capacity` entries with unique keys
#[derive(Debug, Clone)]
pub struct Bucket<K, V> {
    /// Number of low-order hash bits shared by every entry
    local_depth: u8,

    /// Maximum number of entries
    capacity: usize,

    /// Stored entries, keys unique
    entries: Vec<(K, V)>,
}

impl<K, V> Bucket<K, V> {
    /// Create an empty bucket
    pub fn new(local_depth: u8, capacity: usize) -> Self {
        Self {
            local_depth,
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn local_depth(&self) -> u8 {
        self.local_depth
    }

    #[inline]
    pub fn set_local_depth(&mut self, depth: u8) {
        self.local_depth = depth;
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored entries
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    /// Remove and return every entry, leaving the bucket empty
    ///
    /// Local depth and capacity are untouched.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        std::mem::replace(&mut self.entries, Vec::with_capacity(self.capacity))
    }

    /// Stored entries in insertion order
    #[inline]
    pub fn entries(&self) -> &[(K, V)] {
        &self.entries
    }

    #[inline]
    pub(crate) fn entries_mut(&mut self) -> &mut [(K, V)] {
        &mut self.entries
    }

    /// Iterate over stored entries
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<K, V> Bucket<K, V>
where
    K: Eq,
{
    #[inline]
    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.iter().position(|(k, _)| k.borrow() == key)
    }

    /// Check if key is stored here
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.position(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Insert or overwrite
    ///
    /// Returns the previous value when the key was already present. A new
    /// key is only accepted while the bucket has room.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        if let Some(pos) = self.position(&key) {
            let old = std::mem::replace(&mut self.entries[pos].1, value);
            return Ok(Some(old));
        }

        if self.is_full() {
            return Err(TableError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        self.entries.push((key, value));
        Ok(None)
    }

    /// Remove key, keeping the relative order of remaining entries
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let pos = self.position(key).ok_or(TableError::KeyNotFound)?;
        let (_, value) = self.entries.remove(pos);
        Ok(value)
    }
}
