use core::fmt;
use core::hash::Hash;
use core::num::NonZeroUsize;

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width integer usable as a map key.
///
/// Keys are placed by reinterpreting them as the unsigned integer of the same
/// width and reducing that modulo the table capacity. Every operation uses the
/// same rule, so a negative key is always found in the bucket it was put in.
pub trait Key: sealed::Sealed + Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync {
    /// The key's bits as an unsigned integer of the same width, zero-extended to 64 bits.
    fn to_unsigned(self) -> u64;
}

macro_rules! impl_key {
    ($($int:ty => $unsigned:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $int {}

            impl Key for $int {
                #[inline]
                fn to_unsigned(self) -> u64 {
                    self as $unsigned as u64
                }
            }
        )*
    };
}

impl_key! {
    i8 => u8,
    i16 => u16,
    i32 => u32,
    i64 => u64,
    isize => usize,
    u8 => u8,
    u16 => u16,
    u32 => u32,
    u64 => u64,
    usize => usize,
}

/// Bucket index of `key` in a table with `capacity` buckets.
#[inline]
pub(crate) fn bucket_index<K: Key>(key: K, capacity: NonZeroUsize) -> usize {
    // The remainder is below `capacity`, so narrowing back to usize is lossless.
    (key.to_unsigned() % capacity.get() as u64) as usize
}
