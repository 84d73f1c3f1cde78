use crate::hasher::Key;
use crate::{BucketLockedMap, ConcurrentMap};
use rayon::iter::{IntoParallelIterator, ParallelExtend, ParallelIterator};

macro_rules! impl_par_extend {
    ($map:ident) => {
        impl<K, V> ParallelExtend<(K, V)> for $map<K, V>
        where
            K: Key,
            V: Send,
        {
            fn par_extend<I>(&mut self, par_iter: I)
            where
                I: IntoParallelIterator<Item = (K, V)>,
            {
                (&*self).par_extend(par_iter);
            }
        }

        // `put` takes `&self`, so a shared reference can be extended too.
        impl<K, V> ParallelExtend<(K, V)> for &'_ $map<K, V>
        where
            K: Key,
            V: Send,
        {
            fn par_extend<I>(&mut self, par_iter: I)
            where
                I: IntoParallelIterator<Item = (K, V)>,
            {
                let &mut map = self;
                par_iter.into_par_iter().for_each(move |(key, value)| {
                    map.put(key, value);
                });
            }
        }
    };
}

impl_par_extend!(ConcurrentMap);
impl_par_extend!(BucketLockedMap);
