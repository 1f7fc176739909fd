use {
    crate::{
        amm::{Params, Pool, PoolId, PoolReserves, PoolTypeId, RequestId},
        Coin, Coins, Denom,
    },
    liquidity_math::Udec128,
    serde::{Deserialize, Serialize},
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct InstantiateMsg {
    pub params: Params,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Create a new pool from two reserve coins. The coins are taken from the
    /// sender as the pool's initial reserves, and the sender receives the
    /// initial pool coin supply.
    ///
    /// The order of the two coins doesn't matter.
    CreatePool {
        pool_type_id: PoolTypeId,
        deposit_coins: [Coin; 2],
    },
    /// Submit a swap into the pool's current batch. The offer coin is taken
    /// from the sender into escrow until the batch executes.
    Swap {
        pool_id: PoolId,
        offer_coin: Coin,
        demand_coin_denom: Denom,
        /// Limit price, in units of the pool's second denom per unit of the
        /// first, regardless of the swap direction.
        order_price: Udec128,
    },
    /// Submit a deposit of both reserve coins into the pool's current batch.
    Deposit {
        pool_id: PoolId,
        deposit_coins: Coins,
    },
    /// Submit a withdrawal of pool coins into the pool's current batch.
    Withdraw { pool_id: PoolId, pool_coin: Coin },
    /// Cancel a request that hasn't been drained for execution yet, and get
    /// the escrowed coins back.
    Cancel {
        pool_id: PoolId,
        request_id: RequestId,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    /// Query the module parameters.
    /// Returns: `Params`
    Params {},
    /// Query a single pool by id.
    /// Returns: `PoolResponse`
    Pool { pool_id: PoolId },
    /// Enumerate pools in ascending id order.
    /// Returns: `Vec<PoolResponse>`
    Pools {
        offset: Option<u32>,
        limit: Option<u32>,
    },
    /// Find the pool of a denom pair and pool type. The denoms may be given
    /// in either order.
    /// Returns: `PoolResponse`
    PoolByDenoms {
        denoms: [Denom; 2],
        pool_type_id: PoolTypeId,
    },
    /// Query a pool's reserves and pool coin supply.
    /// Returns: `PoolReserves`
    Reserves { pool_id: PoolId },
    /// Query a pool's current batch.
    /// Returns: `Batch`
    Batch { pool_id: PoolId },
    /// Enumerate a pool's swap requests waiting in the queue.
    /// Returns: `Vec<SwapRequest>`
    PendingSwaps { pool_id: PoolId },
    /// Returns: `Vec<DepositRequest>`
    PendingDeposits { pool_id: PoolId },
    /// Returns: `Vec<WithdrawRequest>`
    PendingWithdraws { pool_id: PoolId },
    /// Query a swap request, whether pending or settled in the pool's most
    /// recent batch.
    /// Returns: `SwapRequest`
    SwapRequest {
        pool_id: PoolId,
        request_id: RequestId,
    },
    /// Returns: `DepositRequest`
    DepositRequest {
        pool_id: PoolId,
        request_id: RequestId,
    },
    /// Returns: `WithdrawRequest`
    WithdrawRequest {
        pool_id: PoolId,
        request_id: RequestId,
    },
}

/// Response type of the `QueryMsg::Pool` and `Pools` queries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PoolResponse {
    pub pool: Pool,
    pub reserves: PoolReserves,
}
