use std::borrow::Borrow;

use tracing::{debug, warn};

use crate::{
    bucket::Bucket,
    config::TableConfig,
    error::{Result, TableError},
    hash::HASH_BITS,
};

#[derive(Clone)]
pub struct Directory<K, V> {
    /// Bucket storage (owns buckets, append-only)
    buckets: Vec<Bucket<K, V>>,

    /// Directory mapping low hash bits to bucket handles
    slots: Vec<usize>,

    /// Global depth (slots.len() == 2^global_depth)
    global_depth: u8,

    /// Largest global depth the directory may grow to
    max_global_depth: u8,

    /// Capacity given to every bucket
    bucket_capacity: usize,

    /// Total entries across all buckets
    len: usize,
}

impl<K, V> Directory<K, V> {
    /// Create a single-bucket directory at depth 0
    pub fn new(bucket_capacity: usize, max_global_depth: u8) -> Self {
        Self {
            buckets: vec![Bucket::new(0, bucket_capacity)],
            slots: vec![0],
            global_depth: 0,
            max_global_depth,
            bucket_capacity,
            len: 0,
        }
    }

    /// Create a directory presized to `config.initial_global_depth`
    ///
    /// Fails with [`TableError::InvalidConfig`] if the initial directory
    /// cannot be allocated.
    pub fn with_config(config: &TableConfig) -> Result<Self> {
        let depth = config.initial_global_depth;
        let mut directory = Self::new(config.bucket_capacity, config.max_global_depth);

        let dir_size = 1usize.checked_shl(u32::from(depth)).ok_or_else(|| {
            TableError::InvalidConfig(format!("initial global depth {} too large", depth))
        })?;
        directory
            .buckets
            .try_reserve(dir_size)
            .and_then(|()| directory.slots.try_reserve(dir_size))
            .map_err(|err| {
                TableError::InvalidConfig(format!(
                    "cannot allocate directory of depth {}: {}",
                    depth, err
                ))
            })?;

        directory.reset(depth);
        Ok(directory)
    }

    /// Drop every entry and rebuild the directory at `depth`
    pub fn reset(&mut self, depth: u8) {
        let dir_size = 1usize << depth;
        self.buckets.clear();
        self.slots.clear();

        // one bucket per slot, each already distinguished by all `depth` bits
        for i in 0..dir_size {
            self.buckets.push(Bucket::new(depth, self.bucket_capacity));
            self.slots.push(i);
        }

        self.global_depth = depth;
        self.len = 0;
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of physical buckets
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn global_depth(&self) -> u8 {
        self.global_depth
    }

    #[inline]
    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    /// Directory slots in index order
    #[inline]
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Buckets in handle order
    #[inline]
    pub fn buckets(&self) -> &[Bucket<K, V>] {
        &self.buckets
    }

    #[inline]
    pub(crate) fn buckets_mut(&mut self) -> &mut [Bucket<K, V>] {
        &mut self.buckets
    }

    /// Compute directory index from hash (uses LOW bits)
    #[inline]
    pub fn slot_index(&self, hash: u64) -> usize {
        (hash & ((1u64 << self.global_depth) - 1)) as usize
    }

    /// Bucket handle stored at a directory index
    #[inline]
    pub fn slot(&self, index: usize) -> usize {
        self.slots[index]
    }

    #[inline]
    fn bucket_for(&self, hash: u64) -> &Bucket<K, V> {
        &self.buckets[self.slot(self.slot_index(hash))]
    }

    #[inline]
    fn bucket_for_mut(&mut self, hash: u64) -> &mut Bucket<K, V> {
        let handle = self.slot(self.slot_index(hash));
        &mut self.buckets[handle]
    }

    /// Double the directory size
    fn grow(&mut self) {
        // Mirror into the upper half: [A, B] -> [A, B, A, B]
        // slot i and slot i + old_len differ only in the new high bit
        self.slots.extend_from_within(..);
        self.global_depth += 1;

        debug!(
            global_depth = self.global_depth,
            slots = self.slots.len(),
            "doubled directory"
        );
    }
}

impl<K, V> Directory<K, V>
where
    K: Eq,
{
    pub fn get<Q>(&self, hash: u64, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.bucket_for(hash).get(key)
    }

    pub fn get_mut<Q>(&mut self, hash: u64, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.bucket_for_mut(hash).get_mut(key)
    }

    /// Directory index of the slot holding key, if present
    pub fn search<Q>(&self, hash: u64, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let index = self.slot_index(hash);
        self.buckets[self.slot(index)]
            .contains(key)
            .then_some(index)
    }

    pub fn remove<Q>(&mut self, hash: u64, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let value = self.bucket_for_mut(hash).remove(key)?;
        self.len -= 1;
        Ok(value)
    }

    /// Insert key-value pair, splitting buckets until the key fits
    pub fn insert<F>(&mut self, hash: u64, key: K, value: V, mut hash_fn: F) -> Result<Option<V>>
    where
        F: FnMut(&K) -> u64,
    {
        let mut checked = false;

        loop {
            let index = self.slot_index(hash);
            let handle = self.slot(index);
            let bucket = &mut self.buckets[handle];

            // overwrite never overflows
            if !bucket.is_full() || bucket.contains(&key) {
                let old = bucket.insert(key, value)?;
                if old.is_none() {
                    self.len += 1;
                }
                return Ok(old);
            }

            // one check up front bounds every split this insert performs
            if !checked {
                self.ensure_separable(handle, hash, &mut hash_fn)?;
                checked = true;
            }

            self.split_bucket(index, &mut hash_fn)?;
        }
    }

    /// Fail unless splitting can eventually make room for `hash`
    ///
    /// The new key lands in a bucket with room once the directory resolves
    /// the lowest bit where its hash differs from some entry of the full
    /// bucket. The slots for that depth are reserved up front, so no entry
    /// or slot changes on failure.
    fn ensure_separable<F>(&mut self, handle: usize, hash: u64, hash_fn: &mut F) -> Result<()>
    where
        F: FnMut(&K) -> u64,
    {
        let diff = self.buckets[handle]
            .iter()
            .fold(0u64, |acc, (k, _)| acc | (hash_fn(k) ^ hash));

        if diff == 0 {
            warn!(
                bucket = handle,
                global_depth = self.global_depth,
                "identical hashes exceed bucket capacity"
            );
            return Err(TableError::DepthExhausted { depth: HASH_BITS });
        }

        let required = diff.trailing_zeros() as u8 + 1;
        if required.max(self.global_depth) > self.max_global_depth {
            warn!(
                bucket = handle,
                required,
                max_global_depth = self.max_global_depth,
                "split would exceed max global depth"
            );
            return Err(TableError::DepthExhausted {
                depth: self.max_global_depth,
            });
        }

        if required > self.global_depth {
            let target = 1usize
                .checked_shl(u32::from(required))
                .unwrap_or(usize::MAX);
            let additional = target.saturating_sub(self.slots.len());
            if self.slots.try_reserve(additional).is_err() {
                warn!(
                    bucket = handle,
                    required,
                    global_depth = self.global_depth,
                    "cannot allocate directory for split"
                );
                return Err(TableError::DepthExhausted {
                    depth: self.global_depth,
                });
            }
        }

        Ok(())
    }

    /// Split the bucket behind directory `index` and update the directory
    fn split_bucket<F>(&mut self, index: usize, hash_fn: &mut F) -> Result<()>
    where
        F: FnMut(&K) -> u64,
    {
        let handle = self.slot(index);
        let depth = self.buckets[handle].local_depth();

        if depth == self.global_depth {
            self.grow();
        }

        // lowest slot of the group and its sibling one bit higher
        let index1 = index & ((1usize << depth) - 1);
        let index2 = index1 + (1usize << depth);

        let sibling = self.buckets.len();
        let split_off = Bucket::new(depth + 1, self.bucket_capacity);
        self.buckets.push(split_off);
        self.slots[index2] = sibling;
        self.buckets[handle].set_local_depth(depth + 1);

        // redistribute on the newly significant bit
        let bit = 1u64 << depth;
        let mut moved = 0usize;
        for (key, value) in self.buckets[handle].drain() {
            let target = if hash_fn(&key) & bit != 0 {
                moved += 1;
                sibling
            } else {
                handle
            };
            self.buckets[target].insert(key, value)?;
        }

        // remaining aliases with the new bit set follow index2
        let stride = 2usize << depth;
        for i in (index2 + stride..self.slots.len()).step_by(stride) {
            self.slots[i] = sibling;
        }

        debug!(
            bucket = handle,
            sibling,
            local_depth = depth + 1,
            moved,
            "split bucket"
        );

        Ok(())
    }
}

#[cfg(test)]
impl<K, V> Directory<K, V>
where
    K: Eq,
{
    /// Panic unless capacity, depth and aliasing invariants hold
    pub(crate) fn assert_invariants<F>(&self, mut hash_fn: F)
    where
        F: FnMut(&K) -> u64,
    {
        assert_eq!(self.slots.len(), 1usize << self.global_depth);

        let mut total = 0;
        for (handle, bucket) in self.buckets.iter().enumerate() {
            let local = bucket.local_depth();
            assert!(
                bucket.len() <= bucket.capacity(),
                "bucket {handle} over capacity"
            );
            assert!(
                local <= self.global_depth,
                "bucket {handle} deeper than directory"
            );

            let referencing: Vec<usize> = (0..self.slots.len())
                .filter(|&i| self.slots[i] == handle)
                .collect();
            assert_eq!(
                referencing.len(),
                1usize << (self.global_depth - local),
                "bucket {handle} referenced by wrong number of slots"
            );

            let mask = (1usize << local) - 1;
            let residue = referencing[0] & mask;
            assert!(referencing.iter().all(|&i| i & mask == residue));

            for (key, _) in bucket.iter() {
                assert_eq!(
                    hash_fn(key) as usize & mask,
                    residue,
                    "entry routed to wrong bucket"
                );
            }
            total += bucket.len();
        }
        assert_eq!(total, self.len);
    }
}
