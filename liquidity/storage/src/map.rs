use {
    crate::{Borsh, Codec, Path, Prefix, Prefixer, PrimaryKey},
    liquidity_types::{Order, StdError, StdResult, Storage},
    std::marker::PhantomData,
};

/// A collection of values, each stored under its own key within a namespace.
pub struct Map<'a, K, T, C = Borsh>
where
    C: Codec<T>,
{
    namespace: &'a [u8],
    key: PhantomData<K>,
    data: PhantomData<T>,
    codec: PhantomData<C>,
}

impl<'a, K, T, C> Map<'a, K, T, C>
where
    C: Codec<T>,
{
    pub const fn new(namespace: &'a str) -> Self {
        Self {
            namespace: namespace.as_bytes(),
            key: PhantomData,
            data: PhantomData,
            codec: PhantomData,
        }
    }
}

impl<K, T, C> Map<'_, K, T, C>
where
    K: PrimaryKey,
    C: Codec<T>,
{
    pub fn path(&self, key: K) -> Path<'static, T, C> {
        let mut raw_keys = key.raw_keys();
        let last_raw_key = raw_keys.pop();
        Path::new(self.namespace, &raw_keys, last_raw_key.as_ref())
    }

    fn no_prefix(&self) -> Prefix<K, T, C> {
        Prefix::new(self.namespace, &[])
    }

    pub fn prefix(&self, prefix: K::Prefix) -> Prefix<K::Suffix, T, C> {
        Prefix::new(self.namespace, &prefix.raw_prefixes())
    }

    pub fn is_empty(&self, storage: &dyn Storage) -> bool {
        self.no_prefix().is_empty(storage)
    }

    // ---------------------- methods for single entries -----------------------

    pub fn may_load(&self, storage: &dyn Storage, key: K) -> StdResult<Option<T>> {
        self.path(key).may_load(storage)
    }

    pub fn load(&self, storage: &dyn Storage, key: K) -> StdResult<T> {
        self.path(key).load(storage)
    }

    pub fn save(&self, storage: &mut dyn Storage, key: K, data: &T) -> StdResult<()> {
        self.path(key).save(storage, data)
    }

    pub fn remove(&self, storage: &mut dyn Storage, key: K) {
        self.path(key).remove(storage)
    }

    pub fn may_modify<A, E>(
        &self,
        storage: &mut dyn Storage,
        key: K,
        action: A,
    ) -> Result<Option<T>, E>
    where
        A: FnOnce(Option<T>) -> Result<Option<T>, E>,
        E: From<StdError>,
    {
        self.path(key).may_modify(storage, action)
    }

    // --------------------------- iteration methods ---------------------------

    pub fn range<'b>(
        &self,
        storage: &'b dyn Storage,
        order: Order,
    ) -> Box<dyn Iterator<Item = StdResult<(K::Output, T)>> + 'b> {
        self.no_prefix().range(storage, order)
    }

    pub fn values<'b>(
        &self,
        storage: &'b dyn Storage,
        order: Order,
    ) -> Box<dyn Iterator<Item = StdResult<T>> + 'b> {
        self.no_prefix().values(storage, order)
    }

    pub fn clear(&self, storage: &mut dyn Storage) {
        self.no_prefix().clear(storage)
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        liquidity_types::{Denom, MockStorage},
    };

    const FOODS: Map<u64, String> = Map::new("foods");
    const REQUESTS: Map<(u64, u64), u32> = Map::new("requests");
    const BY_DENOMS: Map<(&Denom, &Denom, u32), u64> = Map::new("by_denoms");

    fn mock_foods() -> MockStorage {
        let mut storage = MockStorage::new();
        for (id, food) in [(1, "pizza"), (2, "jerk chicken"), (3, "sushi"), (256, "ramen")] {
            FOODS.save(&mut storage, id, &food.to_string()).unwrap();
        }
        storage
    }

    #[test]
    fn single_entries() {
        let mut storage = mock_foods();

        assert_eq!(FOODS.load(&storage, 3).unwrap(), "sushi");
        assert_eq!(FOODS.may_load(&storage, 4).unwrap(), None);

        FOODS.remove(&mut storage, 3);
        assert!(FOODS.load(&storage, 3).is_err());
    }

    #[test]
    fn modify_inserts_updates_and_deletes() {
        let mut storage = mock_foods();

        let inserted = FOODS
            .may_modify(&mut storage, 4, |maybe_food| -> StdResult<_> {
                assert!(maybe_food.is_none());
                Ok(Some("pho".to_string()))
            })
            .unwrap();
        assert_eq!(inserted.as_deref(), Some("pho"));

        FOODS
            .may_modify(&mut storage, 1, |maybe_food| -> StdResult<_> {
                Ok(maybe_food.map(|food| format!("{food} margherita")))
            })
            .unwrap();
        assert_eq!(FOODS.load(&storage, 1).unwrap(), "pizza margherita");

        FOODS
            .may_modify(&mut storage, 2, |_| -> StdResult<Option<String>> { Ok(None) })
            .unwrap();
        assert_eq!(FOODS.may_load(&storage, 2).unwrap(), None);
    }

    #[test]
    fn iteration_follows_key_order() {
        let mut storage = mock_foods();

        let ids = FOODS
            .range(&storage, Order::Ascending)
            .map(|res| res.map(|(id, _)| id))
            .collect::<StdResult<Vec<_>>>()
            .unwrap();
        assert_eq!(ids, vec![1, 2, 3, 256]);

        let foods = FOODS
            .values(&storage, Order::Descending)
            .collect::<StdResult<Vec<_>>>()
            .unwrap();
        assert_eq!(foods, vec!["ramen", "sushi", "jerk chicken", "pizza"]);

        FOODS.clear(&mut storage);
        assert!(FOODS.is_empty(&storage));
    }

    #[test]
    fn prefix_iteration_and_clear() {
        let mut storage = MockStorage::new();
        for (pool_id, request_id) in [(1, 1), (1, 4), (2, 2), (2, 3), (1, 5)] {
            REQUESTS
                .save(&mut storage, (pool_id, request_id), &(request_id as u32))
                .unwrap();
        }

        let pool_1 = REQUESTS
            .prefix(1)
            .values(&storage, Order::Ascending)
            .collect::<StdResult<Vec<_>>>()
            .unwrap();
        assert_eq!(pool_1, vec![1, 4, 5]);

        REQUESTS.prefix(2).clear(&mut storage);
        assert!(REQUESTS.prefix(2).is_empty(&storage));
        assert!(!REQUESTS.prefix(1).is_empty(&storage));
    }

    #[test]
    fn borrowed_compound_keys() {
        let mut storage = MockStorage::new();
        let x = Denom::new_unchecked("denomX");
        let y = Denom::new_unchecked("denomY");

        BY_DENOMS.save(&mut storage, (&x, &y, 1), &7).unwrap();

        assert_eq!(BY_DENOMS.may_load(&storage, (&x, &y, 1)).unwrap(), Some(7));
        assert_eq!(BY_DENOMS.may_load(&storage, (&y, &x, 1)).unwrap(), None);

        let found = BY_DENOMS
            .prefix(&x)
            .append(&y)
            .range(&storage, Order::Ascending)
            .collect::<StdResult<Vec<_>>>()
            .unwrap();
        assert_eq!(found, vec![(1, 7)]);
    }
}
