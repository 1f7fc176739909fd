use {
    data_encoding::BASE64,
    liquidity_math::MathError,
    std::{any::type_name, convert::Infallible},
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StdError {
    #[error(transparent)]
    Math(#[from] MathError),

    #[error("invalid denom `{denom}`: {reason}")]
    InvalidDenom { denom: String, reason: &'static str },

    #[error("invalid address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("invalid coins: {reason}")]
    InvalidCoins { reason: String },

    #[error("insufficient balance! address: {address}, denom: {denom}, balance: {balance}, needed: {needed}")]
    InsufficientBalance {
        address: String,
        denom: String,
        balance: String,
        needed: String,
    },

    #[error("data not found! type: {ty}, storage key: {key}")]
    DataNotFound { ty: &'static str, key: String },

    #[error("failed to serialize! codec: {codec}, type: {ty}, reason: {reason}")]
    Serialize {
        codec: &'static str,
        ty: &'static str,
        reason: String,
    },

    #[error("failed to deserialize! codec: {codec}, type: {ty}, reason: {reason}")]
    Deserialize {
        codec: &'static str,
        ty: &'static str,
        reason: String,
    },
}

impl StdError {
    pub fn invalid_denom(denom: impl ToString, reason: &'static str) -> Self {
        Self::InvalidDenom {
            denom: denom.to_string(),
            reason,
        }
    }

    pub fn invalid_address(address: impl ToString, reason: impl ToString) -> Self {
        Self::InvalidAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_coins(reason: impl ToString) -> Self {
        Self::InvalidCoins {
            reason: reason.to_string(),
        }
    }

    pub fn insufficient_balance(
        address: impl ToString,
        denom: impl ToString,
        balance: impl ToString,
        needed: impl ToString,
    ) -> Self {
        Self::InsufficientBalance {
            address: address.to_string(),
            denom: denom.to_string(),
            balance: balance.to_string(),
            needed: needed.to_string(),
        }
    }

    pub fn data_not_found<T>(key: &[u8]) -> Self {
        Self::DataNotFound {
            ty: type_name::<T>(),
            key: BASE64.encode(key),
        }
    }

    pub fn serialize<T, C>(codec: &'static str, reason: C) -> Self
    where
        C: ToString,
    {
        Self::Serialize {
            codec,
            ty: type_name::<T>(),
            reason: reason.to_string(),
        }
    }

    pub fn deserialize<T, C>(codec: &'static str, reason: C) -> Self
    where
        C: ToString,
    {
        Self::Deserialize {
            codec,
            ty: type_name::<T>(),
            reason: reason.to_string(),
        }
    }
}

impl From<Infallible> for StdError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

pub type StdResult<T> = core::result::Result<T, StdError>;
