use {
    crate::{Borsh, Codec, Item},
    liquidity_types::{Number, StdResult, Storage},
};

/// A single number that is monotonically incremented by the given step size.
///
/// Internally, this is an abstraction over an [`Item`](crate::Item).
pub struct Counter<'a, T, C = Borsh>
where
    C: Codec<T>,
{
    item: Item<'a, T, C>,
    base: T,
    step: T,
}

impl<'a, T, C> Counter<'a, T, C>
where
    T: Number + Copy,
    C: Codec<T>,
{
    pub const fn new(storage_key: &'a str, base: T, step: T) -> Self {
        Self {
            item: Item::new(storage_key),
            base,
            step,
        }
    }

    /// Load the current counter value.
    fn current(&self, storage: &dyn Storage) -> StdResult<T> {
        self.item
            .may_load(storage)
            .map(|maybe_value| maybe_value.unwrap_or(self.base))
    }

    /// Increment the value by the step size; return the values before and after
    /// incrementing.
    pub fn increment(&self, storage: &mut dyn Storage) -> StdResult<(T, T)> {
        let old_value = self.current(storage)?;
        let new_value = old_value.checked_add(self.step)?;

        self.item.save(storage, &new_value)?;

        Ok((old_value, new_value))
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, liquidity_types::MockStorage};

    const IDS: Counter<u64> = Counter::new("ids", 1, 1);
    const EVENS: Counter<u32> = Counter::new("evens", 0, 2);

    #[test]
    fn incrementing() {
        let mut storage = MockStorage::new();

        assert_eq!(IDS.current(&storage).unwrap(), 1);
        assert_eq!(IDS.increment(&mut storage).unwrap(), (1, 2));
        assert_eq!(IDS.increment(&mut storage).unwrap(), (2, 3));

        assert_eq!(EVENS.increment(&mut storage).unwrap(), (0, 2));
        assert_eq!(EVENS.current(&storage).unwrap(), 2);
        assert_eq!(IDS.current(&storage).unwrap(), 3);
    }

    #[test]
    fn overflow_is_reported() {
        let mut storage = MockStorage::new();
        let counter: Counter<u64> = Counter::new("near_max", u64::MAX, 1);

        assert!(counter.increment(&mut storage).is_err());
    }
}
