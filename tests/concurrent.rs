use chainmap::{BucketLockedMap, ConcurrentMap, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::Arc;
use std::thread;

const THREADS: u64 = 8;
const OPS_PER_THREAD: u64 = 20_000;
const KEYS: u32 = 512;

#[derive(Default)]
struct Tally {
    inserted: i64,
    removed: i64,
    calls: u64,
}

/// Every thread issues a random mix of operations over the same key range
/// and counts the puts that created an entry and the removes that found one.
fn hammer<T>(map: Arc<T>) -> Tally
where
    T: Table<u32, u32> + 'static,
{
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(t);
                let mut tally = Tally::default();

                for _ in 0..OPS_PER_THREAD {
                    let key = rng.gen_range(0..KEYS);
                    match rng.gen_range(0..10) {
                        0..=3 => {
                            if map.put(key, key).is_none() {
                                tally.inserted += 1;
                            }
                        }
                        4..=6 => {
                            if map.remove(key).is_some() {
                                tally.removed += 1;
                            }
                        }
                        _ => {
                            if let Some(value) = map.get(key) {
                                assert_eq!(value, key);
                            }
                        }
                    }
                    tally.calls += 1;
                }

                tally
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .fold(Tally::default(), |acc, t| Tally {
            inserted: acc.inserted + t.inserted,
            removed: acc.removed + t.removed,
            calls: acc.calls + t.calls,
        })
}

fn check_net_size<T>(map: Arc<T>)
where
    T: Table<u32, u32> + 'static,
{
    let tally = hammer(Arc::clone(&map));

    assert_eq!(map.len() as i64, tally.inserted - tally.removed);
    assert_eq!(map.operation_count(), tally.calls);
    assert_eq!(tally.calls, THREADS * OPS_PER_THREAD);

    let live = (0..KEYS).filter(|&key| map.get(key).is_some()).count();
    assert_eq!(live, map.len());
}

#[test]
#[cfg_attr(miri, ignore)]
fn global_lock_keeps_size_consistent() {
    check_net_size(Arc::new(ConcurrentMap::<u32, u32>::new(16).unwrap()));
}

#[test]
#[cfg_attr(miri, ignore)]
fn bucket_locks_keep_size_consistent() {
    check_net_size(Arc::new(BucketLockedMap::<u32, u32>::new(16).unwrap()));
}

#[test]
#[cfg_attr(miri, ignore)]
fn single_bucket_under_contention() {
    check_net_size(Arc::new(ConcurrentMap::<u32, u32>::new(1).unwrap()));
    check_net_size(Arc::new(BucketLockedMap::<u32, u32>::new(1).unwrap()));
}

#[test]
#[cfg_attr(miri, ignore)]
fn racing_writers_on_one_key_leave_one_entry() {
    let map = Arc::new(ConcurrentMap::<i32, i32>::new(8).unwrap());

    let handles: Vec<_> = (0..THREADS as i32)
        .map(|t| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                let mut created = 0;
                for i in 0..1000 {
                    if map.put(-42, t * 1000 + i).is_none() {
                        created += 1;
                    }
                }
                created
            })
        })
        .collect();

    let created: i32 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(created, 1);
    assert_eq!(map.len(), 1);

    let last = map.get(-42).unwrap();
    assert_eq!(last % 1000, 999);
}

struct Probe(Arc<ConcurrentMap>);

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Runs while the outer map holds its own lock.
        self.0.put(1, 1);
        f.write_str("probe")
    }
}

#[test]
fn maps_do_not_share_a_lock() {
    let inner = Arc::new(ConcurrentMap::new(2).unwrap());
    let outer: ConcurrentMap<i32, Probe> = ConcurrentMap::new(2).unwrap();
    outer.put(0, Probe(Arc::clone(&inner)));

    assert_eq!(outer.to_string(), "[0] -> (0,probe)\n[1] -> \n");
    assert_eq!(inner.get(1), Some(1));
}

#[test]
#[cfg_attr(miri, ignore)]
fn destroy_after_threads_finish() {
    let map = Arc::new(ConcurrentMap::<u64, u64>::new(32).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for i in 0..1000 {
                    map.put(t * 1000 + i, i);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let map = Arc::try_unwrap(map).ok().unwrap();
    assert_eq!(map.destroy(), (THREADS * 1000) as usize);
}
