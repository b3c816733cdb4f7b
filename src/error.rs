//! Errors reported by `LongMap`.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LongMapError {
    /// Construction with a negative bucket count.
    InvalidCapacity(isize),
    /// Construction with a load factor that is zero, negative or NaN.
    InvalidLoadFactor(f32),
    /// A bucket index was requested from a table with no buckets.
    IndexOutOfRange { key: i64 },
}

impl LongMapError {
    /// True for the errors a constructor reports on bad arguments.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            LongMapError::InvalidCapacity(_) | LongMapError::InvalidLoadFactor(_)
        )
    }
}

impl fmt::Display for LongMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LongMapError::InvalidCapacity(c) => write!(f, "illegal initial capacity: {c}"),
            LongMapError::InvalidLoadFactor(lf) => write!(f, "illegal load factor: {lf}"),
            LongMapError::IndexOutOfRange { key } => {
                write!(f, "bucket index out of range for key {key}: table has no buckets")
            }
        }
    }
}

impl std::error::Error for LongMapError {}
