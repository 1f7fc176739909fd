use {
    crate::{
        encode_length, increment_last_byte, nested_namespaces_with_key, trim, Codec, Prefixer,
        PrimaryKey,
    },
    liquidity_types::{Order, Record, StdResult, Storage},
    std::{borrow::Cow, marker::PhantomData},
};

/// All entries of a [`Map`](crate::Map) whose keys start with the same
/// prefix, such as every pending request of one pool.
///
/// Iteration always covers the whole prefix.
pub struct Prefix<K, T, C>
where
    C: Codec<T>,
{
    namespace: Vec<u8>,
    suffix: PhantomData<K>,
    data: PhantomData<T>,
    codec: PhantomData<C>,
}

impl<K, T, C> Prefix<K, T, C>
where
    C: Codec<T>,
{
    pub fn new(namespace: &[u8], prefixes: &[Cow<[u8]>]) -> Self {
        Self {
            namespace: nested_namespaces_with_key(Some(namespace), prefixes, None),
            suffix: PhantomData,
            data: PhantomData,
            codec: PhantomData,
        }
    }

    fn scan<'a>(
        &self,
        storage: &'a dyn Storage,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        let end = increment_last_byte(self.namespace.clone());
        let namespace = self.namespace.clone();

        Box::new(
            storage
                .scan(Some(self.namespace.as_slice()), Some(end.as_slice()), order)
                .map(move |(key, value)| (trim(&namespace, &key), value)),
        )
    }

    pub fn is_empty(&self, storage: &dyn Storage) -> bool {
        self.scan(storage, Order::Ascending).next().is_none()
    }

    pub fn values<'a>(
        &self,
        storage: &'a dyn Storage,
        order: Order,
    ) -> Box<dyn Iterator<Item = StdResult<T>> + 'a> {
        Box::new(self.scan(storage, order).map(|(_, value)| C::decode(&value)))
    }

    pub fn clear(&self, storage: &mut dyn Storage) {
        let end = increment_last_byte(self.namespace.clone());
        storage.remove_range(Some(self.namespace.as_slice()), Some(end.as_slice()));
    }
}

impl<K, T, C> Prefix<K, T, C>
where
    K: PrimaryKey,
    C: Codec<T>,
{
    /// Narrow the prefix by the next key component(s).
    pub fn append(mut self, prefix: K::Prefix) -> Prefix<K::Suffix, T, C> {
        for elem in prefix.raw_prefixes() {
            self.namespace.extend(encode_length(&elem));
            self.namespace.extend(elem.as_ref());
        }

        Prefix {
            namespace: self.namespace,
            suffix: PhantomData,
            data: self.data,
            codec: self.codec,
        }
    }

    pub fn range<'a>(
        &self,
        storage: &'a dyn Storage,
        order: Order,
    ) -> Box<dyn Iterator<Item = StdResult<(K::Output, T)>> + 'a> {
        Box::new(self.scan(storage, order).map(|(key, value)| {
            Ok((K::from_slice(&key)?, C::decode(&value)?))
        }))
    }
}
