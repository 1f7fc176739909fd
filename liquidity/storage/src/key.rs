use {
    crate::nested_namespaces_with_key,
    liquidity_types::{Addr, Denom, StdError, StdResult},
    std::{borrow::Cow, mem, str},
};

// ------------------------------------ key ------------------------------------

/// Describes a key used in mapping data structures, i.e. [`Map`](crate::Map).
///
/// Keys are serialized to raw bytes without going through `serde`, such that
/// the byte order of serialized keys matches the logical order of the keys.
/// This is what makes range queries over pool and request ids work.
///
/// Compound keys can be split into `Prefix` and `Suffix`, which are useful in
/// iterations: e.g. given a pool id, iterate all request ids under it.
pub trait PrimaryKey {
    /// The number of elements in a tuple key. Singleton keys have 1.
    ///
    /// Needed to split nested tuple keys when deserializing.
    const KEY_ELEMS: u8;

    /// For tuple keys, the first element. Use `()` for singleton keys.
    type Prefix: Prefixer;

    /// For tuple keys, the elements excluding the `Prefix`. Use `()` for
    /// singleton keys.
    type Suffix;

    /// The type that raw keys deserialize into, which may be different from
    /// the key itself; e.g. `&Denom` deserializes into `Denom`.
    type Output;

    /// Convert the key into one or more raw keys.
    fn raw_keys(&self) -> Vec<Cow<[u8]>>;

    /// Serialize the raw keys into bytes. Each raw key other than the last one
    /// is prefixed by its length:
    ///
    /// ```plain
    /// len(A) | A | len(B) | B | C
    /// ```
    fn joined_key(&self) -> Vec<u8> {
        let mut raw_keys = self.raw_keys();
        let last_raw_key = raw_keys.pop();
        nested_namespaces_with_key(None, &raw_keys, last_raw_key.as_ref())
    }

    /// Deserialize the raw bytes into the output.
    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output>;
}

impl PrimaryKey for () {
    type Output = ();
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        vec![]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        if !bytes.is_empty() {
            return Err(StdError::deserialize::<Self::Output, _>(
                "key",
                "expecting empty bytes",
            ));
        }

        Ok(())
    }
}

impl PrimaryKey for Addr {
    type Output = Addr;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        vec![Cow::Borrowed(self.as_ref())]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        Addr::try_from(bytes)
    }
}

impl PrimaryKey for Denom {
    type Output = Denom;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        vec![Cow::Borrowed(self.as_str().as_bytes())]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        str::from_utf8(bytes)
            .map_err(|err| StdError::deserialize::<Self::Output, _>("key", err))
            .and_then(Denom::try_from)
    }
}

impl<K> PrimaryKey for &K
where
    K: PrimaryKey,
{
    type Output = K::Output;
    type Prefix = K::Prefix;
    type Suffix = K::Suffix;

    const KEY_ELEMS: u8 = K::KEY_ELEMS;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        (*self).raw_keys()
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        K::from_slice(bytes)
    }
}

macro_rules! impl_unsigned_integer_key {
    ($($t:ty),+) => {
        $(impl PrimaryKey for $t {
            type Output = $t;
            type Prefix = ();
            type Suffix = ();

            const KEY_ELEMS: u8 = 1;

            fn raw_keys(&self) -> Vec<Cow<[u8]>> {
                vec![Cow::Owned(self.to_be_bytes().to_vec())]
            }

            fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
                let Ok(bytes) = <[u8; mem::size_of::<Self>()]>::try_from(bytes) else {
                    return Err(StdError::deserialize::<Self::Output, _>(
                        "key",
                        format!(
                            "wrong number of bytes: expecting {}, got {}",
                            mem::size_of::<Self>(),
                            bytes.len(),
                        ),
                    ));
                };

                Ok(Self::from_be_bytes(bytes))
            }
        })*
    };
}

impl_unsigned_integer_key!(u32, u64);

impl<A, B> PrimaryKey for (A, B)
where
    A: PrimaryKey + Prefixer,
    B: PrimaryKey,
{
    type Output = (A::Output, B::Output);
    type Prefix = A;
    type Suffix = B;

    const KEY_ELEMS: u8 = A::KEY_ELEMS + B::KEY_ELEMS;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        let mut keys = self.0.raw_keys();
        keys.extend(self.1.raw_keys());
        keys
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        let (a_raw, b_raw) = split_first_key(A::KEY_ELEMS, bytes)?;

        let a = A::from_slice(&a_raw)?;
        let b = B::from_slice(b_raw)?;

        Ok((a, b))
    }
}

impl<A, B, C> PrimaryKey for (A, B, C)
where
    A: PrimaryKey + Prefixer,
    B: PrimaryKey + Prefixer,
    C: PrimaryKey,
{
    type Output = (A::Output, B::Output, C::Output);
    // `A` is the prefix and `(B, C)` the suffix. To fix both `A` and `B` and
    // iterate `C`, use `MAP.prefix(a).append(b)`.
    type Prefix = A;
    type Suffix = (B, C);

    const KEY_ELEMS: u8 = A::KEY_ELEMS + B::KEY_ELEMS + C::KEY_ELEMS;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        let mut keys = self.0.raw_keys();
        keys.extend(self.1.raw_keys());
        keys.extend(self.2.raw_keys());
        keys
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        let (a_raw, rest) = split_first_key(A::KEY_ELEMS, bytes)?;
        let (b_raw, c_raw) = split_first_key(B::KEY_ELEMS, rest)?;

        let a = A::from_slice(&a_raw)?;
        let b = B::from_slice(&b_raw)?;
        let c = C::from_slice(c_raw)?;

        Ok((a, b, c))
    }
}

/// Split off the first `key_elems` length-prefixed elements of a joined key.
///
/// Elements of the first key other than its last keep their length prefixes,
/// so the returned bytes are themselves a joined key.
fn split_first_key(key_elems: u8, bytes: &[u8]) -> StdResult<(Vec<u8>, &[u8])> {
    let mut index = 0;
    let mut first_key = Vec::new();

    for i in 0..key_elems {
        let Some(len_slice) = bytes.get(index..index + 2) else {
            return Err(StdError::deserialize::<Vec<u8>, _>(
                "key",
                "joined key ended before its length prefix",
            ));
        };
        index += 2;

        if i < key_elems - 1 {
            first_key.extend_from_slice(len_slice);
        }

        let elem_len = u16::from_be_bytes([len_slice[0], len_slice[1]]) as usize;
        let Some(elem) = bytes.get(index..index + elem_len) else {
            return Err(StdError::deserialize::<Vec<u8>, _>(
                "key",
                "joined key shorter than its length prefix",
            ));
        };
        first_key.extend_from_slice(elem);
        index += elem_len;
    }

    Ok((first_key, &bytes[index..]))
}

// --------------------------------- prefixer ----------------------------------

pub trait Prefixer {
    fn raw_prefixes(&self) -> Vec<Cow<[u8]>>;
}

impl Prefixer for () {
    fn raw_prefixes(&self) -> Vec<Cow<[u8]>> {
        vec![]
    }
}

macro_rules! impl_prefixer_via_raw_keys {
    ($($t:ty),+) => {
        $(impl Prefixer for $t {
            fn raw_prefixes(&self) -> Vec<Cow<[u8]>> {
                self.raw_keys()
            }
        })*
    };
}

impl_prefixer_via_raw_keys!(Addr, Denom, u32, u64);

impl<P> Prefixer for &P
where
    P: Prefixer,
{
    fn raw_prefixes(&self) -> Vec<Cow<[u8]>> {
        (*self).raw_prefixes()
    }
}

// ----------------------------------- tests -----------------------------------
