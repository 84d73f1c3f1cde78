use core::num::NonZeroUsize;
use once_cell::sync::Lazy;

use crate::error::{Error, Result};

static DEFAULT_CAPACITY: Lazy<NonZeroUsize> = Lazy::new(|| {
    let threads = std::thread::available_parallelism().map_or(4, usize::from);
    let capacity = (threads * 4).next_power_of_two();

    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
});

/// The capacity used by the `Default` implementations of the maps.
///
/// Four buckets per available hardware thread, rounded up to a power of two.
pub fn default_capacity() -> usize {
    DEFAULT_CAPACITY.get()
}

pub(crate) fn default_nonzero_capacity() -> NonZeroUsize {
    *DEFAULT_CAPACITY
}

pub(crate) fn check_capacity(capacity: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(capacity).ok_or(Error::InvalidArgument {
        name: "capacity",
        reason: "must be greater than zero",
    })
}
