fn main() {
    tracing_subscriber::fmt::init();

    tracing::info!("running exchange workload against the table-wide lock");
    exchange(4).run::<MapTable<ConcurrentMap<u64, u32>>>();

    tracing::info!("running exchange workload against per-bucket locks");
    exchange(4).run::<MapTable<BucketLockedMap<u64, u32>>>();
}

use bustle::*;
use chainmap::{BucketLockedMap, ConcurrentMap, Table};
use std::marker::PhantomData;
use std::num::NonZeroUsize;
use std::sync::Arc;

fn ex_mix() -> Mix {
    Mix {
        read: 5,
        insert: 45,
        remove: 45,
        update: 5,
        upsert: 0,
    }
}

// The table never grows, so keep it small enough to allocate up front.
fn exchange(n: usize) -> Workload {
    *Workload::new(n, ex_mix())
        .initial_capacity_log2(16)
        .prefill_fraction(0.6)
        .operations(2.0)
}

trait FixedCapacity {
    fn with_buckets(capacity: NonZeroUsize) -> Self;
}

impl FixedCapacity for ConcurrentMap<u64, u32> {
    fn with_buckets(capacity: NonZeroUsize) -> Self {
        ConcurrentMap::with_capacity(capacity)
    }
}

impl FixedCapacity for BucketLockedMap<u64, u32> {
    fn with_buckets(capacity: NonZeroUsize) -> Self {
        BucketLockedMap::with_capacity(capacity)
    }
}

pub struct MapTable<T>(Arc<T>, PhantomData<fn() -> T>);

impl<T> Clone for MapTable<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0), PhantomData)
    }
}

impl<T> Collection for MapTable<T>
where
    T: Table<u64, u32> + FixedCapacity + 'static,
{
    type Handle = Self;

    fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self(Arc::new(T::with_buckets(capacity)), PhantomData)
    }

    fn pin(&self) -> Self::Handle {
        self.clone()
    }
}

impl<T> CollectionHandle for MapTable<T>
where
    T: Table<u64, u32> + FixedCapacity + 'static,
{
    type Key = u64;

    fn get(&mut self, key: &Self::Key) -> bool {
        self.0.get(*key).is_some()
    }

    fn insert(&mut self, key: &Self::Key) -> bool {
        self.0.put(*key, 0).is_none()
    }

    fn remove(&mut self, key: &Self::Key) -> bool {
        self.0.remove(*key).is_some()
    }

    // bustle partitions keys between threads, so nothing races between the two calls.
    fn update(&mut self, key: &Self::Key) -> bool {
        match self.0.get(*key) {
            Some(value) => {
                self.0.put(*key, value + 1);
                true
            }
            None => false,
        }
    }
}
