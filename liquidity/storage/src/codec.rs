use {
    borsh::{BorshDeserialize, BorshSerialize},
    liquidity_types::{BorshDeExt, BorshSerExt, StdResult},
};

/// A marker that designates encoding/decoding schemes.
pub trait Codec<T> {
    fn encode(data: &T) -> StdResult<Vec<u8>>;

    fn decode(data: &[u8]) -> StdResult<T>;
}

// ----------------------------------- borsh -----------------------------------

/// Represents the Borsh encoding scheme.
#[derive(Clone)]
pub struct Borsh;

impl<T> Codec<T> for Borsh
where
    T: BorshSerialize + BorshDeserialize,
{
    fn encode(data: &T) -> StdResult<Vec<u8>> {
        data.to_borsh_vec()
    }

    fn decode(data: &[u8]) -> StdResult<T> {
        data.deserialize_borsh()
    }
}
