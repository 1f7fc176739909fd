use {
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeMap,
        iter,
        ops::Bound,
    },
};

/// A key-value pair.
pub type Record = (Vec<u8>, Vec<u8>);

/// A batch of writes and deletes, keyed by storage key.
pub type Batch = BTreeMap<Vec<u8>, Op>;

/// A pending write or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Insert(Vec<u8>),
    Delete,
}

/// Iteration direction.
#[derive(
    Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    Ascending,
    Descending,
}

/// Describing a KV store that supports read, write, and iteration.
///
/// The engine never owns its store. It is handed a `&mut dyn Storage` by the
/// state-transition driver for each call.
pub trait Storage {
    /// Read a single key-value pair from the storage.
    ///
    /// Return `None` if the key doesn't exist.
    fn read(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Iterate over data in the KV store under the given bounds and order.
    ///
    /// Minimum bound is inclusive, maximum bound is exclusive.
    /// If `min` > `max`, an empty iterator is to be returned.
    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a>;

    /// Similar to `scan`, but only return the keys.
    fn scan_keys<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Vec<u8>> + 'a> {
        Box::new(self.scan(min, max, order).map(|(k, _)| k))
    }

    /// Write a single key-value pair to the storage.
    fn write(&mut self, key: &[u8], value: &[u8]);

    /// Delete a single key-value pair from the storage.
    ///
    /// No-op if the key doesn't exist.
    fn remove(&mut self, key: &[u8]);

    /// Delete all key-value pairs whose keys are in the given range.
    ///
    /// Similar to `scan`, `min` is inclusive, while `max` is exclusive.
    fn remove_range(&mut self, min: Option<&[u8]>, max: Option<&[u8]>) {
        let keys = self.scan_keys(min, max, Order::Ascending).collect::<Vec<_>>();
        for key in keys {
            self.remove(&key);
        }
    }

    /// Apply a batch of writes and removes.
    fn flush(&mut self, batch: Batch) {
        for (key, op) in batch {
            if let Op::Insert(value) = op {
                self.write(&key, &value);
            } else {
                self.remove(&key);
            }
        }
    }
}

impl<T> Storage for &mut T
where
    T: Storage + ?Sized,
{
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        (**self).read(key)
    }

    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        (**self).scan(min, max, order)
    }

    fn write(&mut self, key: &[u8], value: &[u8]) {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &[u8]) {
        (**self).remove(key)
    }

    fn remove_range(&mut self, min: Option<&[u8]>, max: Option<&[u8]>) {
        (**self).remove_range(min, max)
    }

    fn flush(&mut self, batch: Batch) {
        (**self).flush(batch)
    }
}

// ----------------------------------- mock ------------------------------------

/// An in-memory KV store for testing purpose.
#[derive(Default, Debug, Clone)]
pub struct MockStorage {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MockStorage {
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }

    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        // BTreeMap::range panics if start > end. We interpret min as inclusive
        // and max as exclusive, and return an empty iterator instead.
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Box::new(iter::empty());
            }
        }

        let min = min.map_or(Bound::Unbounded, |bytes| Bound::Included(bytes.to_vec()));
        let max = max.map_or(Bound::Unbounded, |bytes| Bound::Excluded(bytes.to_vec()));
        let iter = self.data.range((min, max)).map(|(k, v)| (k.clone(), v.clone()));

        match order {
            Order::Ascending => Box::new(iter),
            Order::Descending => Box::new(iter.rev()),
        }
    }

    fn write(&mut self, key: &[u8], value: &[u8]) {
        self.data.insert(key.to_vec(), value.to_vec());
    }

    fn remove(&mut self, key: &[u8]) {
        self.data.remove(key);
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanning_with_bounds() {
        let mut storage = MockStorage::new();
        for i in 1..=5_u8 {
            storage.write(&[i], &[i * 10]);
        }

        let keys = storage
            .scan_keys(Some(&[2]), Some(&[5]), Order::Ascending)
            .collect::<Vec<_>>();
        assert_eq!(keys, vec![vec![2], vec![3], vec![4]]);

        let values = storage
            .scan(None, None, Order::Descending)
            .map(|(_, v)| v[0])
            .collect::<Vec<_>>();
        assert_eq!(values, vec![50, 40, 30, 20, 10]);

        assert_eq!(storage.scan(Some(&[4]), Some(&[2]), Order::Ascending).count(), 0);
    }

    #[test]
    fn removing_a_range() {
        let mut storage = MockStorage::new();
        for i in 1..=5_u8 {
            storage.write(&[i], &[i]);
        }

        storage.remove_range(Some(&[2]), Some(&[4]));

        let keys = storage.scan_keys(None, None, Order::Ascending).collect::<Vec<_>>();
        assert_eq!(keys, vec![vec![1], vec![4], vec![5]]);
    }
}
