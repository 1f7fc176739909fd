use liquidity_types::{
    amm::{BatchIndex, PoolId, PoolTypeId, RequestId},
    Addr, Denom, MathError, StdError, Uint128,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LiquidityError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    Math(#[from] MathError),

    #[error("invalid denom `{denom}`: {reason}")]
    InvalidDenom { denom: String, reason: String },

    #[error("pool already exists! denoms: {denom_a}/{denom_b}, pool type: {pool_type_id}, pool id: {pool_id}")]
    PoolAlreadyExists {
        denom_a: Denom,
        denom_b: Denom,
        pool_type_id: PoolTypeId,
        pool_id: PoolId,
    },

    #[error("pool not found! pool id: {pool_id}")]
    PoolNotFound { pool_id: PoolId },

    #[error("insufficient reserves in pool {pool_id}: {reason}")]
    InsufficientReserves { pool_id: PoolId, reason: String },

    #[error("batch {batch_index} of pool {pool_id} is executing and accepts no requests")]
    BatchClosed {
        pool_id: PoolId,
        batch_index: BatchIndex,
    },

    #[error("pool has no liquidity! reserves: {reserve_a}, {reserve_b}")]
    NoLiquidity {
        reserve_a: Uint128,
        reserve_b: Uint128,
    },

    #[error("deposit below minimum: {reason}")]
    BelowMinimumDeposit { reason: String },

    #[error("insufficient pool coins! requested: {requested}, balance: {balance}")]
    InsufficientShares {
        requested: Uint128,
        balance: Uint128,
    },

    #[error("offer amount {offer_amount} exceeds the maximum order amount {max_amount}")]
    PriceImpactExceeded {
        offer_amount: Uint128,
        max_amount: Uint128,
    },

    #[error("pool type not found! pool type id: {pool_type_id}")]
    PoolTypeNotFound { pool_type_id: PoolTypeId },

    #[error("request not found! pool id: {pool_id}, request id: {request_id}")]
    RequestNotFound {
        pool_id: PoolId,
        request_id: RequestId,
    },

    #[error("sender {sender} doesn't own request {request_id}")]
    Unauthorized { request_id: RequestId, sender: Addr },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("invalid params: {reason}")]
    InvalidParams { reason: String },

    #[error("malformed request: {reason}")]
    MalformedRequest { reason: String },
}

impl LiquidityError {
    pub fn invalid_denom(denom: impl ToString, reason: impl ToString) -> Self {
        Self::InvalidDenom {
            denom: denom.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn insufficient_reserves(pool_id: PoolId, reason: impl ToString) -> Self {
        Self::InsufficientReserves {
            pool_id,
            reason: reason.to_string(),
        }
    }

    pub fn below_minimum_deposit(reason: impl ToString) -> Self {
        Self::BelowMinimumDeposit {
            reason: reason.to_string(),
        }
    }

    pub fn invalid_request(reason: impl ToString) -> Self {
        Self::InvalidRequest {
            reason: reason.to_string(),
        }
    }

    pub fn invalid_params(reason: impl ToString) -> Self {
        Self::InvalidParams {
            reason: reason.to_string(),
        }
    }

    pub fn malformed_request(reason: impl ToString) -> Self {
        Self::MalformedRequest {
            reason: reason.to_string(),
        }
    }

    /// Whether the error means a pool's state is inconsistent, rather than a
    /// request being invalid. Halted batches log it to tell the two apart.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InsufficientReserves { .. } | Self::Math(_) | Self::Std(StdError::Math(_))
        )
    }
}

pub type LiquidityResult<T> = core::result::Result<T, LiquidityError>;

// ----------------------------------- tests -----------------------------------
