use core::fmt;
use core::mem;

type Link<K, V> = Option<Box<Entry<K, V>>>;

pub(crate) struct Entry<K, V> {
    key: K,
    value: V,
    next: Link<K, V>,
}

/// The head of a singly-linked chain of entries.
///
/// Each entry is owned by exactly one of the head slot or its predecessor.
pub(crate) struct Bucket<K, V> {
    head: Link<K, V>,
}

impl<K, V> Bucket<K, V> {
    pub(crate) const fn new() -> Self {
        Self { head: None }
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl<K: Eq, V> Bucket<K, V> {
    pub(crate) fn find(&self, key: &K) -> Option<&V> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Overwrites the value of `key` in place, or links a new entry at the tail.
    ///
    /// Returns the previous value if the key was already present.
    pub(crate) fn upsert(&mut self, key: K, value: V) -> Option<V> {
        let mut cursor = &mut self.head;

        while let Some(entry) = cursor {
            if entry.key == key {
                return Some(mem::replace(&mut entry.value, value));
            }

            cursor = &mut entry.next;
        }

        // An empty bucket makes this the head, otherwise the new tail.
        *cursor = Some(Box::new(Entry {
            key,
            value,
            next: None,
        }));

        None
    }

    /// Unlinks the entry for `key`, relinking its predecessor (or the head) to its successor.
    pub(crate) fn unlink(&mut self, key: &K) -> Option<V> {
        let mut cursor = &mut self.head;

        loop {
            let hit = match cursor.as_deref() {
                Some(entry) => entry.key == *key,
                None => return None,
            };

            if hit {
                let entry = cursor.take()?;
                let Entry { value, next, .. } = *entry;
                *cursor = next;
                return Some(value);
            }

            cursor = &mut cursor.as_mut()?.next;
        }
    }
}

// Chains are unbounded, so release them iteratively instead of through
// the recursive drop of `Box<Entry>`.
impl<K, V> Drop for Bucket<K, V> {
    fn drop(&mut self) {
        let mut link = self.head.take();

        while let Some(mut entry) = link {
            link = entry.next.take();
        }
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Bucket<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "({},{})", k, v)?;
        }

        Ok(())
    }
}

/// Heap bytes owned by the chains of a table holding `entries` entries.
#[cfg(feature = "typesize")]
pub(crate) fn chain_heap_size<K, V>(entries: usize) -> usize {
    entries * mem::size_of::<Entry<K, V>>()
}

pub(crate) struct Iter<'a, K, V> {
    next: Option<&'a Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.next?;
        self.next = entry.next.as_deref();
        Some((&entry.key, &entry.value))
    }
}
