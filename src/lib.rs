//! A fixed-capacity chained hash map from integer keys to values.
//!
//! [`ConcurrentMap`] guards its whole table with one lock owned by the map:
//! every lookup, insert and removal runs start to finish inside that lock.
//! [`BucketLockedMap`] keeps the same table layout but locks buckets
//! individually and keeps its counters in atomics.
//!
//! Neither map ever resizes. Collisions are resolved by chaining.

mod bucket;
mod bucket_locked;
mod error;
mod hasher;
mod lock;
mod table;
mod util;

#[cfg(feature = "rayon")]
mod rayon {
    pub mod map;
}

pub use bucket_locked::BucketLockedMap;
pub use error::{Error, Result};
pub use hasher::Key;
pub use table::Table;
pub use util::default_capacity;

use bucket::Bucket;
use core::fmt;
use core::num::NonZeroUsize;
use hasher::bucket_index;
use lock::Mutex;

/// A hash map from fixed-width integer keys to values, serialized by a single lock.
///
/// The number of buckets is chosen at construction and never changes.
///
/// # Examples
///
/// ```
/// use chainmap::ConcurrentMap;
///
/// let map = ConcurrentMap::new(4).unwrap();
/// assert_eq!(map.put(1, 10), None);
/// assert_eq!(map.put(1, 11), Some(10));
/// assert_eq!(map.get(1), Some(11));
/// assert_eq!(map.remove(1), Some(11));
/// assert_eq!(map.operation_count(), 4);
/// ```
pub struct ConcurrentMap<K = i32, V = i32> {
    capacity: NonZeroUsize,
    inner: Mutex<Inner<K, V>>,
}

struct Inner<K, V> {
    buckets: Box<[Bucket<K, V>]>,
    len: usize,
    operations: u64,
}

impl<K: Key, V> ConcurrentMap<K, V> {
    /// Creates a map with `capacity` buckets.
    ///
    /// Fails with [`Error::InvalidArgument`] if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainmap::{ConcurrentMap, Error};
    ///
    /// assert!(ConcurrentMap::<i32, i32>::new(16).is_ok());
    /// assert!(matches!(
    ///     ConcurrentMap::<i32, i32>::new(0),
    ///     Err(Error::InvalidArgument { .. })
    /// ));
    /// ```
    pub fn new(capacity: usize) -> Result<Self> {
        util::check_capacity(capacity).map(Self::with_capacity)
    }

    /// Creates a map with `capacity` buckets.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let buckets = (0..capacity.get()).map(|_| Bucket::new()).collect();

        tracing::debug!(capacity = capacity.get(), "created map with a table-wide lock");

        Self {
            capacity,
            inner: Mutex::new(Inner {
                buckets,
                len: 0,
                operations: 0,
            }),
        }
    }

    /// Returns a copy of the value stored for `key`.
    pub fn get(&self, key: K) -> Option<V>
    where
        V: Clone,
    {
        let idx = bucket_index(key, self.capacity);
        let mut inner = self.inner.lock();
        inner.operations += 1;

        let value = inner.buckets[idx].find(&key).cloned();
        tracing::trace!(%key, bucket = idx, hit = value.is_some(), "get");

        value
    }

    /// Stores `value` for `key`.
    ///
    /// Returns the value previously stored for `key`, or `None` if the key is new.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let idx = bucket_index(key, self.capacity);
        let mut inner = self.inner.lock();
        inner.operations += 1;

        let previous = inner.buckets[idx].upsert(key, value);
        if previous.is_none() {
            inner.len += 1;
        }

        tracing::trace!(%key, bucket = idx, replaced = previous.is_some(), "put");

        previous
    }

    /// Removes `key` from the map, returning the value it held.
    pub fn remove(&self, key: K) -> Option<V> {
        let idx = bucket_index(key, self.capacity);
        let mut inner = self.inner.lock();
        inner.operations += 1;

        let removed = inner.buckets[idx].unlink(&key);
        if removed.is_some() {
            inner.len -= 1;
        }

        tracing::trace!(%key, bucket = idx, hit = removed.is_some(), "remove");

        removed
    }

    /// Returns `true` if the map holds an entry for `key`.
    ///
    /// Unlike [`get`](Self::get) this is not counted as an operation.
    pub fn contains_key(&self, key: K) -> bool {
        let idx = bucket_index(key, self.capacity);
        self.inner.lock().buckets[idx].find(&key).is_some()
    }

    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.inner.lock().len
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of completed `get`, `put` and `remove` calls, hits and misses alike.
    pub fn operation_count(&self) -> u64 {
        self.inner.lock().operations
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Tears the map down, releasing every entry and the table.
    ///
    /// Returns the number of entries that were released.
    pub fn destroy(self) -> usize {
        let inner = self.inner.into_inner();
        let released = inner.len;
        drop(inner);

        tracing::debug!(released, "destroyed map");

        released
    }
}

impl<K: Key, V> Default for ConcurrentMap<K, V> {
    fn default() -> Self {
        Self::with_capacity(util::default_nonzero_capacity())
    }
}

impl<K: Key, V: Clone + Send> Table<K, V> for ConcurrentMap<K, V> {
    fn get(&self, key: K) -> Option<V> {
        self.get(key)
    }

    fn put(&self, key: K, value: V) -> Option<V> {
        self.put(key, value)
    }

    fn remove(&self, key: K) -> Option<V> {
        self.remove(key)
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn operation_count(&self) -> u64 {
        self.operation_count()
    }

    fn capacity(&self) -> usize {
        self.capacity()
    }
}

/// Lists every bucket and its chain, one line per bucket:
///
/// ```text
/// [0] ->
/// [1] -> (1,10) -> (5,20)
/// ```
///
/// The table is locked for the whole listing.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for ConcurrentMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();

        for (i, bucket) in inner.buckets.iter().enumerate() {
            writeln!(f, "[{}] -> {}", i, bucket)?;
        }

        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ConcurrentMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();

        f.debug_map()
            .entries(inner.buckets.iter().flat_map(Bucket::iter))
            .finish()
    }
}

#[cfg(feature = "typesize")]
impl<K: Key, V> typesize::TypeSize for ConcurrentMap<K, V> {
    fn extra_size(&self) -> usize {
        let inner = self.inner.lock();
        core::mem::size_of_val(&*inner.buckets) + bucket::chain_heap_size::<K, V>(inner.len)
    }
}
