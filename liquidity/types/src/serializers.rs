use {
    crate::{Json, StdError, StdResult},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{de::DeserializeOwned, Serialize},
};

// ----------------------------------- json ------------------------------------

pub trait JsonSerExt {
    fn to_json_vec(&self) -> StdResult<Vec<u8>>;

    fn to_json_string(&self) -> StdResult<String>;

    fn to_json_value(&self) -> StdResult<Json>;
}

impl<T> JsonSerExt for T
where
    T: Serialize,
{
    fn to_json_vec(&self) -> StdResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| StdError::serialize::<T, _>("json", err))
    }

    fn to_json_string(&self) -> StdResult<String> {
        serde_json::to_string(self).map_err(|err| StdError::serialize::<T, _>("json", err))
    }

    fn to_json_value(&self) -> StdResult<Json> {
        serde_json::to_value(self).map_err(|err| StdError::serialize::<T, _>("json", err))
    }
}

pub trait JsonDeExt {
    fn deserialize_json<T>(self) -> StdResult<T>
    where
        T: DeserializeOwned;
}

impl JsonDeExt for &[u8] {
    fn deserialize_json<T>(self) -> StdResult<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(self).map_err(|err| StdError::deserialize::<T, _>("json", err))
    }
}

impl JsonDeExt for &str {
    fn deserialize_json<T>(self) -> StdResult<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(self).map_err(|err| StdError::deserialize::<T, _>("json", err))
    }
}

impl JsonDeExt for Json {
    fn deserialize_json<T>(self) -> StdResult<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_value(self).map_err(|err| StdError::deserialize::<T, _>("json", err))
    }
}

// ----------------------------------- borsh -----------------------------------

pub trait BorshSerExt {
    fn to_borsh_vec(&self) -> StdResult<Vec<u8>>;
}

impl<T> BorshSerExt for T
where
    T: BorshSerialize,
{
    fn to_borsh_vec(&self) -> StdResult<Vec<u8>> {
        borsh::to_vec(self).map_err(|err| StdError::serialize::<T, _>("borsh", err))
    }
}

pub trait BorshDeExt {
    fn deserialize_borsh<T>(self) -> StdResult<T>
    where
        T: BorshDeserialize;
}

impl BorshDeExt for &[u8] {
    fn deserialize_borsh<T>(self) -> StdResult<T>
    where
        T: BorshDeserialize,
    {
        borsh::from_slice(self).map_err(|err| StdError::deserialize::<T, _>("borsh", err))
    }
}
