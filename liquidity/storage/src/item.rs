use {
    crate::{Borsh, Codec, Path},
    std::ops::Deref,
};

/// A single value stored under a fixed key.
pub struct Item<'a, T, C = Borsh>
where
    C: Codec<T>,
{
    path: Path<'a, T, C>,
}

impl<'a, T, C> Item<'a, T, C>
where
    C: Codec<T>,
{
    pub const fn new(storage_key: &'a str) -> Self {
        Self {
            path: Path::from_raw(storage_key.as_bytes()),
        }
    }
}

// `Item` is effectively a wrapper over a `Path`, so instead of implementing
// methods (`load`, `save`, ...) manually, we simply implement `Deref`.
impl<'a, T, C> Deref for Item<'a, T, C>
where
    C: Codec<T>,
{
    type Target = Path<'a, T, C>;

    fn deref(&self) -> &Self::Target {
        &self.path
    }
}

// ----------------------------------- tests -----------------------------------
