use {
    crate::{nested_namespaces_with_key, Codec},
    liquidity_types::{StdError, StdResult, Storage},
    std::{borrow::Cow, marker::PhantomData},
};

/// The full storage key of a single value, together with the value's type and
/// encoding scheme.
pub struct Path<'a, T, C> {
    storage_key: Cow<'a, [u8]>,
    data: PhantomData<T>,
    codec: PhantomData<C>,
}

impl<'a, T, C> Path<'a, T, C>
where
    C: Codec<T>,
{
    pub fn new(namespace: &[u8], prefixes: &[Cow<[u8]>], maybe_key: Option<&Cow<[u8]>>) -> Self {
        Self {
            storage_key: Cow::Owned(nested_namespaces_with_key(
                Some(namespace),
                prefixes,
                maybe_key,
            )),
            data: PhantomData,
            codec: PhantomData,
        }
    }

    pub const fn from_raw(storage_key: &'a [u8]) -> Self {
        Self {
            storage_key: Cow::Borrowed(storage_key),
            data: PhantomData,
            codec: PhantomData,
        }
    }

    #[inline]
    pub fn storage_key(&self) -> &[u8] {
        self.storage_key.as_ref()
    }

    pub fn may_load(&self, storage: &dyn Storage) -> StdResult<Option<T>> {
        storage
            .read(self.storage_key())
            .map(|val| C::decode(&val))
            .transpose()
    }

    pub fn load(&self, storage: &dyn Storage) -> StdResult<T> {
        storage
            .read(self.storage_key())
            .ok_or_else(|| StdError::data_not_found::<T>(self.storage_key()))
            .and_then(|val| C::decode(&val))
    }

    pub fn save(&self, storage: &mut dyn Storage, data: &T) -> StdResult<()> {
        let data_raw = C::encode(data)?;
        storage.write(self.storage_key(), &data_raw);
        Ok(())
    }

    pub fn remove(&self, storage: &mut dyn Storage) {
        storage.remove(self.storage_key());
    }

    /// Apply `action` to the current value, if any. Returning `None` deletes the
    /// entry.
    pub fn may_modify<F, E>(&self, storage: &mut dyn Storage, action: F) -> Result<Option<T>, E>
    where
        F: FnOnce(Option<T>) -> Result<Option<T>, E>,
        E: From<StdError>,
    {
        let maybe_current = self.may_load(storage)?;
        let was_present = maybe_current.is_some();

        let maybe_data = action(maybe_current)?;

        match (&maybe_data, was_present) {
            (Some(data), _) => {
                self.save(storage, data)?;
            },
            (None, true) => {
                self.remove(storage);
            },
            (None, false) => {},
        }

        Ok(maybe_data)
    }
}
