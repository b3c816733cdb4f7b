//! Key hashing and bucket indexing.

use crate::error::LongMapError;
use core::hash::{BuildHasher, Hash};

/// 32-bit hash of a key: the high word folded onto the low word.
#[inline]
pub(crate) fn key_hash(key: i64) -> i32 {
    (key ^ ((key as u64) >> 32) as i64) as i32
}

/// Bucket slot for `key` in a table of `capacity` buckets, always in
/// `[0, capacity)` regardless of the hash's sign.
#[inline]
pub(crate) fn bucket_index(key: i64, capacity: usize) -> Result<usize, LongMapError> {
    if capacity == 0 {
        return Err(LongMapError::IndexOutOfRange { key });
    }
    Ok(i64::from(key_hash(key)).rem_euclid(capacity as i64) as usize)
}

/// Hash of a whole entry, combining key and value the way a two-field
/// record hash does: `31 * (31 + key_hash) + value_hash`, wrapping.
pub(crate) fn entry_hash<V, S>(hasher: &S, key: i64, value: &V) -> i32
where
    V: ?Sized + Hash,
    S: BuildHasher,
{
    let h = hasher.hash_one(value);
    let value_hash = (h ^ (h >> 32)) as i32;
    31i32
        .wrapping_mul(31i32.wrapping_add(key_hash(key)))
        .wrapping_add(value_hash)
}
