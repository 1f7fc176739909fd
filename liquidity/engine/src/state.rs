use {
    liquidity_storage::{Counter, Item, Map},
    liquidity_types::{
        amm::{
            Batch, DepositRequest, Params, Pool, PoolId, PoolReserves, PoolTypeId, RequestId,
            SwapRequest, WithdrawRequest,
        },
        Denom,
    },
};

pub const PARAMS: Item<Params> = Item::new("params");

pub const NEXT_POOL_ID: Counter<PoolId> = Counter::new("pool_id", 1, 1);

/// Shared by the three request kinds, so that ids reflect arrival order across
/// all of them.
pub const NEXT_REQUEST_ID: Counter<RequestId> = Counter::new("request_id", 1, 1);

// pool_id => pool
pub const POOLS: Map<PoolId, Pool> = Map::new("pool");

// (denom_a, denom_b, pool_type_id) => pool_id
pub const POOL_IDS_BY_DENOMS: Map<(&Denom, &Denom, PoolTypeId), PoolId> =
    Map::new("pool_by_denoms");

// pool_id => reserves
//
// Written only by `reserve::apply_reserve_delta`.
pub const RESERVES: Map<PoolId, PoolReserves> = Map::new("reserve");

// pool_id => the pool's latest batch
pub const BATCHES: Map<PoolId, Batch> = Map::new("batch");

// (pool_id, request_id) => request
pub const PENDING_SWAPS: Map<(PoolId, RequestId), SwapRequest> = Map::new("pending_swap");

pub const PENDING_DEPOSITS: Map<(PoolId, RequestId), DepositRequest> =
    Map::new("pending_deposit");

pub const PENDING_WITHDRAWS: Map<(PoolId, RequestId), WithdrawRequest> =
    Map::new("pending_withdraw");

// (pool_id, request_id) => terminal request
//
// Holds the requests of the pool's most recent batch, plus any canceled or
// expired since. Cleared when the pool's next batch executes.
pub const SWAP_RESULTS: Map<(PoolId, RequestId), SwapRequest> = Map::new("swap_result");

pub const DEPOSIT_RESULTS: Map<(PoolId, RequestId), DepositRequest> =
    Map::new("deposit_result");

pub const WITHDRAW_RESULTS: Map<(PoolId, RequestId), WithdrawRequest> =
    Map::new("withdraw_result");
