//! Construction parameters for `LongMap`.

use crate::error::LongMapError;

/// Bucket count used when none is given.
pub const DEFAULT_CAPACITY: isize = 16;

/// Entries-per-bucket ratio used when none is given.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// How a bucket chain treats an incoming entry that shares its bucket with
/// existing ones.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum CollisionPolicy {
    /// Compatibility behavior. Same-key entries are overwritten in place,
    /// and every existing entry whose structural hash matches the incoming
    /// entry without being equal to it gets the incoming entry appended
    /// after it, possibly duplicating a key. Removing from a one-entry
    /// bucket takes that entry without comparing keys.
    #[default]
    Permissive,
    /// Same key replaces, different key appends, removal compares keys.
    Strict,
}

/// Capacity, load factor and collision policy of a `LongMap`.
///
/// Validation happens when the map is built, not when the config is
/// assembled, so a config can be carried around in any state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LongMapConfig {
    pub capacity: isize,
    pub load_factor: f32,
    pub collision_policy: CollisionPolicy,
}

impl Default for LongMapConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl LongMapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: isize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Checks the arguments and returns the bucket count to allocate.
    pub(crate) fn validate(&self) -> Result<usize, LongMapError> {
        let capacity = usize::try_from(self.capacity)
            .map_err(|_| LongMapError::InvalidCapacity(self.capacity))?;
        if self.load_factor.is_nan() || self.load_factor <= 0.0 {
            return Err(LongMapError::InvalidLoadFactor(self.load_factor));
        }
        Ok(capacity)
    }
}

/// Entry count at which a table of `capacity` buckets grows.
///
/// Computed in `f32` so that half-way products such as `10 * 0.45` round
/// up; saturates at `usize::MAX` for huge or infinite products.
pub(crate) fn threshold_for(capacity: usize, load_factor: f32) -> usize {
    (capacity as f32 * load_factor).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = LongMapConfig::default();
        assert_eq!(c.capacity, 16);
        assert_eq!(c.load_factor, 0.75);
        assert_eq!(c.collision_policy, CollisionPolicy::Permissive);
        assert_eq!(c.validate(), Ok(16));
    }

    /// Invariant: negative capacity and non-positive or NaN load factors are
    /// rejected; zero capacity is accepted.
    #[test]
    fn validation_rejects_bad_arguments() {
        let c = LongMapConfig::new().with_capacity(-5);
        assert_eq!(c.validate(), Err(LongMapError::InvalidCapacity(-5)));

        let c = LongMapConfig::new().with_load_factor(-3.0);
        assert_eq!(c.validate(), Err(LongMapError::InvalidLoadFactor(-3.0)));

        let c = LongMapConfig::new().with_load_factor(0.0);
        assert_eq!(c.validate(), Err(LongMapError::InvalidLoadFactor(0.0)));

        let c = LongMapConfig::new().with_load_factor(f32::NAN);
        assert!(matches!(
            c.validate(),
            Err(LongMapError::InvalidLoadFactor(lf)) if lf.is_nan()
        ));

        assert_eq!(LongMapConfig::new().with_capacity(0).validate(), Ok(0));
    }

    #[test]
    fn threshold_rounds_product() {
        assert_eq!(threshold_for(16, 0.75), 12);
        assert_eq!(threshold_for(32, 0.75), 24);
        assert_eq!(threshold_for(3, 0.5), 2);
        assert_eq!(threshold_for(1, 0.1), 0);
        assert_eq!(threshold_for(0, 0.75), 0);
        assert_eq!(threshold_for(4, f32::INFINITY), usize::MAX);
    }

    /// Invariant: products that land on .5 in `f32` round up, even when the
    /// load factor itself is not exactly representable.
    #[test]
    fn threshold_rounds_half_way_products_up() {
        assert_eq!(threshold_for(10, 0.45), 5);
        assert_eq!(threshold_for(5, 0.7), 4);
    }

    #[test]
    fn builder_setters_compose() {
        let c = LongMapConfig::new()
            .with_capacity(4)
            .with_load_factor(2.0)
            .with_collision_policy(CollisionPolicy::Strict);
        assert_eq!(
            c,
            LongMapConfig {
                capacity: 4,
                load_factor: 2.0,
                collision_policy: CollisionPolicy::Strict,
            }
        );
    }
}
