//! long-map: a single-threaded hash map keyed by `i64`, built on an
//! array of lazily allocated bucket chains.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: amortized O(1) put/get/remove over a plain bucket array with
//!   separate chaining, with snapshot exports of keys and values.
//! - Layers:
//!   - `hash`: folds a key to 32 bits (`key ^ (key >>> 32)`) and maps it
//!     to a slot with a sign-safe modulo; also the structural entry hash
//!     used by the permissive collision policy.
//!   - `bucket::Bucket<V>`: an owned `Vec` of entries that share a slot,
//!     with the chain-level insert/lookup/remove rules.
//!   - `LongMap<V, S>`: the slot array, entry count, threshold and resize
//!     controller, plus `keys`/`values`/`iter` exporters.
//!
//! Constraints
//! - Single-threaded; mutation goes through `&mut self`.
//! - A slot holds no bucket until its first insert and loses it again on
//!   `clear` or when its last entry is removed.
//! - `len` always equals the number of entries across all chains.
//! - `threshold == round(capacity * load_factor)`; a put with
//!   `len + 1 >= threshold` doubles the slot array and reinserts every
//!   entry, bucket by bucket, through the chain insert path.
//!
//! Collision policy
//! - `CollisionPolicy::Permissive` (default) keeps the compatibility
//!   behavior: same-key overwrite plus an extra append for every existing
//!   entry whose structural hash matches the incoming one while differing
//!   from it, and key-blind release of one-entry buckets on remove.
//! - `CollisionPolicy::Strict` is the usual replace-or-append map.
//!
//! Failure boundaries
//! - Constructors reject negative capacity and zero, negative or NaN load
//!   factors with `LongMapError`.
//! - A table with zero buckets has no valid slot; `try_*` operations
//!   return `LongMapError::IndexOutOfRange` and their plain counterparts
//!   panic with it.
//!
//! Notes and non-goals
//! - Keys are `i64` only; values may be any `V`. Nullable values are
//!   `V = Option<T>`.
//! - No ordering guarantee beyond bucket-then-chain order.
//! - No persistence and no internal synchronization.

mod bucket;
pub mod config;
pub mod error;
mod hash;
pub mod long_map;
mod long_map_proptest;

// Public surface
pub use config::{CollisionPolicy, LongMapConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use error::LongMapError;
pub use long_map::{Iter, LongMap};
