//! Hashing strategies used to route keys through the directory.
//!
//! Only the low-order bits of a hash are consumed, one more bit per level
//! of depth, so a strategy must be deterministic for the lifetime of a table.

use std::hash::{BuildHasher, Hash, RandomState};

/// Number of bits produced by a [`KeyHasher`]
pub const HASH_BITS: u8 = u64::BITS as u8;

/// Maps a key to the 64-bit value whose low bits select a directory slot
pub trait KeyHasher<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u64;
}

impl<K, F> KeyHasher<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Keys that can be used as their own hash value
pub trait IdentityKey {
    fn identity_hash(&self) -> u64;
}

macro_rules! impl_identity_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IdentityKey for $ty {
                #[inline]
                fn identity_hash(&self) -> u64 {
                    *self as u64
                }
            }
        )*
    };
}

impl_identity_key!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

// 128-bit keys fold their high half into the low one, so values that fit in
// 64 bits keep their identity hash

impl IdentityKey for u128 {
    #[inline]
    fn identity_hash(&self) -> u64 {
        (*self as u64) ^ ((*self >> 64) as u64)
    }
}

impl IdentityKey for i128 {
    #[inline]
    fn identity_hash(&self) -> u64 {
        let low = *self as u64;
        // zero unless the high half is more than the sign extension of the low one
        let excess = ((*self >> 64) as u64) ^ (((low as i64) >> 63) as u64);
        low ^ excess
    }
}

impl IdentityKey for char {
    #[inline]
    fn identity_hash(&self) -> u64 {
        u64::from(*self)
    }
}

impl IdentityKey for bool {
    #[inline]
    fn identity_hash(&self) -> u64 {
        u64::from(*self)
    }
}

/// Identity hashing: the key's numeric value is its hash
///
/// This is the default strategy for integer keys. Sequential keys spread
/// perfectly over the low bits, but keys that share their low bits (for
/// example multiples of a large power of two) force deep splits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<K> KeyHasher<K> for Identity
where
    K: IdentityKey + ?Sized,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        key.identity_hash()
    }
}

/// Adapter routing keys through a standard [`BuildHasher`]
#[derive(Debug, Clone, Default)]
pub struct Hashed<S = RandomState>(pub S);

impl Hashed<RandomState> {
    /// Create an adapter over a randomly seeded `RandomState`
    pub fn random() -> Self {
        Self(RandomState::new())
    }
}

impl<K, S> KeyHasher<K> for Hashed<S>
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::hash_map::DefaultHasher, hash::BuildHasherDefault};

    use super::*;
    use crate::{config::TableConfig, table::ExtendibleHashTable};

    #[test]
    fn test_identity_integers() {
        assert_eq!(Identity.hash_key(&5u32), 5);
        assert_eq!(Identity.hash_key(&13u64), 13);
        assert_eq!(Identity.hash_key(&'a'), 97);
        assert_eq!(Identity.hash_key(&true), 1);
        // sign extension keeps the low bits of negative keys
        assert_eq!(Identity.hash_key(&-1i32) & 0xF, 0xF);
    }

    #[test]
    fn test_wide_integers_fold_high_bits() {
        assert_eq!(Identity.hash_key(&5u128), 5);
        assert_eq!(Identity.hash_key(&-3i128), Identity.hash_key(&-3i64));
        assert_eq!(Identity.hash_key(&(1u128 << 64)), 1);
        assert_ne!(Identity.hash_key(&(1i128 << 70)), 0);
        assert_ne!(Identity.hash_key(&i128::MIN), Identity.hash_key(&0i128));
    }

    #[test]
    fn test_wide_keys_differing_above_64_bits() {
        let config = TableConfig::new().bucket_capacity(2);
        let mut table = ExtendibleHashTable::with_config(config, Identity).unwrap();
        let keys: Vec<u128> = (1..=8).map(|i| i << 64).collect();

        for &key in &keys {
            table.insert(key, ()).unwrap();
        }
        assert_eq!(table.len(), keys.len());
        assert!(keys.iter().all(|key| table.contains(key)));
    }

    #[test]
    fn test_closure_hasher() {
        let plus_one = |k: &u64| k.wrapping_add(1);
        assert_eq!(plus_one.hash_key(&41), 42);
        assert_eq!(plus_one.hash_key(&u64::MAX), 0);
    }

    #[test]
    fn test_fn_pointer_hasher() {
        fn double(k: &u64) -> u64 {
            k.wrapping_mul(2)
        }
        let hasher: fn(&u64) -> u64 = double;
        assert_eq!(hasher.hash_key(&21), 42);
    }

    #[test]
    fn test_hashed_borrowed_forms_agree() {
        let hasher = Hashed(BuildHasherDefault::<DefaultHasher>::default());
        let owned = "hello".to_string();
        assert_eq!(hasher.hash_key(&owned), hasher.hash_key("hello"));
    }
}
