use crate::hasher::Key;

/// Operations shared by every map flavour in this crate.
///
/// Every call to [`get`](Table::get), [`put`](Table::put) or [`remove`](Table::remove)
/// counts as one operation, hit or miss.
pub trait Table<K: Key, V>: Send + Sync {
    /// Returns a copy of the value stored for `key`.
    fn get(&self, key: K) -> Option<V>;

    /// Stores `value` for `key`, returning the value it replaced.
    fn put(&self, key: K, value: V) -> Option<V>;

    /// Removes `key`, returning the value it held.
    fn remove(&self, key: K) -> Option<V>;

    /// Number of entries in the map.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of completed `get`, `put` and `remove` calls.
    fn operation_count(&self) -> u64;

    /// Number of buckets, fixed at construction.
    fn capacity(&self) -> usize;
}
