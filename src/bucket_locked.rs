use crate::bucket::Bucket;
use crate::error::Result;
use crate::hasher::{bucket_index, Key};
use crate::lock::{Mutex, MutexGuard};
use crate::table::Table;
use crate::util;
use core::fmt;
use core::num::NonZeroUsize;
use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use crossbeam_utils::CachePadded;

/// A hash map with the same fixed table as [`ConcurrentMap`](crate::ConcurrentMap),
/// but one lock per bucket.
///
/// Operations on different buckets proceed in parallel. The entry and operation
/// counters are atomics updated while the bucket lock is held, so they are exact
/// whenever no operation is in flight and a close estimate otherwise.
///
/// # Examples
///
/// ```
/// use chainmap::BucketLockedMap;
///
/// let map = BucketLockedMap::new(4).unwrap();
/// assert_eq!(map.put(-3i64, 1u64), None);
/// assert_eq!(map.get(-3), Some(1));
/// assert_eq!(map.len(), 1);
/// ```
pub struct BucketLockedMap<K = i32, V = i32> {
    capacity: NonZeroUsize,
    buckets: Box<[CachePadded<Mutex<Bucket<K, V>>>]>,
    len: AtomicUsize,
    operations: AtomicU64,
}

impl<K: Key, V> BucketLockedMap<K, V> {
    /// Creates a map with `capacity` buckets, each behind its own lock.
    ///
    /// Fails with [`Error::InvalidArgument`](crate::Error::InvalidArgument) if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        util::check_capacity(capacity).map(Self::with_capacity)
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let buckets = (0..capacity.get())
            .map(|_| CachePadded::new(Mutex::new(Bucket::new())))
            .collect();

        tracing::debug!(capacity = capacity.get(), "created map with per-bucket locks");

        Self {
            capacity,
            buckets,
            len: AtomicUsize::new(0),
            operations: AtomicU64::new(0),
        }
    }

    fn bucket(&self, key: K) -> (usize, MutexGuard<'_, Bucket<K, V>>) {
        let idx = bucket_index(key, self.capacity);
        (idx, self.buckets[idx].lock())
    }

    pub fn get(&self, key: K) -> Option<V>
    where
        V: Clone,
    {
        let (idx, bucket) = self.bucket(key);
        self.operations.fetch_add(1, Ordering::Relaxed);

        let value = bucket.find(&key).cloned();
        tracing::trace!(%key, bucket = idx, hit = value.is_some(), "get");

        value
    }

    pub fn put(&self, key: K, value: V) -> Option<V> {
        let (idx, mut bucket) = self.bucket(key);
        self.operations.fetch_add(1, Ordering::Relaxed);

        let previous = bucket.upsert(key, value);
        if previous.is_none() {
            self.len.fetch_add(1, Ordering::Relaxed);
        }

        tracing::trace!(%key, bucket = idx, replaced = previous.is_some(), "put");

        previous
    }

    pub fn remove(&self, key: K) -> Option<V> {
        let (idx, mut bucket) = self.bucket(key);
        self.operations.fetch_add(1, Ordering::Relaxed);

        let removed = bucket.unlink(&key);
        if removed.is_some() {
            self.len.fetch_sub(1, Ordering::Relaxed);
        }

        tracing::trace!(%key, bucket = idx, hit = removed.is_some(), "remove");

        removed
    }

    pub fn contains_key(&self, key: K) -> bool {
        self.bucket(key).1.find(&key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn operation_count(&self) -> u64 {
        self.operations.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Tears the map down, releasing every entry and the table.
    ///
    /// Returns the number of entries that were released.
    pub fn destroy(self) -> usize {
        let released = self.len.into_inner();
        drop(self.buckets);

        tracing::debug!(released, "destroyed map");

        released
    }
}

impl<K, V> BucketLockedMap<K, V> {
    /// Locks every bucket in index order.
    fn lock_all(&self) -> Vec<MutexGuard<'_, Bucket<K, V>>> {
        self.buckets.iter().map(|bucket| bucket.lock()).collect()
    }
}

impl<K: Key, V> Default for BucketLockedMap<K, V> {
    fn default() -> Self {
        Self::with_capacity(util::default_nonzero_capacity())
    }
}

impl<K: Key, V: Clone + Send> Table<K, V> for BucketLockedMap<K, V> {
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

/// Same listing as [`ConcurrentMap`](crate::ConcurrentMap)'s `Display`.
/// All bucket locks are held while the listing is written.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for BucketLockedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bucket) in self.lock_all().iter().enumerate() {
            writeln!(f, "[{}] -> {}", i, **bucket)?;
        }

        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BucketLockedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guards = self.lock_all();

        f.debug_map()
            .entries(guards.iter().flat_map(|bucket| bucket.iter()))
            .finish()
    }
}

#[cfg(feature = "typesize")]
impl<K: Key, V> typesize::TypeSize for BucketLockedMap<K, V> {
    fn extra_size(&self) -> usize {
        let guards = self.lock_all();
        let entries = guards.iter().map(|bucket| bucket.iter().count()).sum();

        core::mem::size_of_val(&*self.buckets) + crate::bucket::chain_heap_size::<K, V>(entries)
    }
}
