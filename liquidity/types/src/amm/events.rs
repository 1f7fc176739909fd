use {
    crate::{
        amm::{BatchIndex, Direction, PoolId, PoolTypeId, RequestId, RequestStatus},
        contract_event, Addr, Coin, Coins, Denom,
    },
    liquidity_math::{Udec128, Uint128},
    serde::{Deserialize, Serialize},
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PoolCreated {
    pub pool_id: PoolId,
    pub pool_type_id: PoolTypeId,
    pub creator: Addr,
    pub reserve_coin_denoms: [Denom; 2],
    pub pool_coin_denom: Denom,
    pub reserve_account_address: Addr,
    pub deposit_coins: Coins,
    pub minted_pool_coin: Uint128,
}

contract_event!(PoolCreated => "pool_created");

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SwapSubmitted {
    pub pool_id: PoolId,
    pub batch_index: BatchIndex,
    pub request_id: RequestId,
    pub requester: Addr,
    pub direction: Direction,
    pub offer_coin: Coin,
    pub demand_coin_denom: Denom,
    pub order_price: Udec128,
    pub fee: Uint128,
}

contract_event!(SwapSubmitted => "swap_submitted");

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DepositSubmitted {
    pub pool_id: PoolId,
    pub batch_index: BatchIndex,
    pub request_id: RequestId,
    pub requester: Addr,
    pub deposit_coins: Coins,
}

contract_event!(DepositSubmitted => "deposit_submitted");

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WithdrawSubmitted {
    pub pool_id: PoolId,
    pub batch_index: BatchIndex,
    pub request_id: RequestId,
    pub requester: Addr,
    pub pool_coin: Coin,
}

contract_event!(WithdrawSubmitted => "withdraw_submitted");

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RequestCanceled {
    pub pool_id: PoolId,
    pub request_id: RequestId,
    pub requester: Addr,
    pub refund: Coins,
}

contract_event!(RequestCanceled => "request_canceled");

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RequestExpired {
    pub pool_id: PoolId,
    pub request_id: RequestId,
    pub requester: Addr,
    pub refund: Coins,
}

contract_event!(RequestExpired => "request_expired");

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SwapSettled {
    pub pool_id: PoolId,
    pub batch_index: BatchIndex,
    pub request_id: RequestId,
    pub requester: Addr,
    pub direction: Direction,
    /// The batch's clearing price. `None` if nothing in the batch matched.
    pub clearing_price: Option<Udec128>,
    /// Amount of the offer coin exchanged.
    pub filled: Uint128,
    /// Amount of the demand coin received.
    pub received: Uint128,
    /// Amount of the offer coin returned.
    pub refunded: Uint128,
    pub fee: Uint128,
    pub status: RequestStatus,
}

contract_event!(SwapSettled => "swap_settled");

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DepositSettled {
    pub pool_id: PoolId,
    pub batch_index: BatchIndex,
    pub request_id: RequestId,
    pub requester: Addr,
    pub minted_pool_coin: Uint128,
    pub refund: Coins,
    pub status: RequestStatus,
}

contract_event!(DepositSettled => "deposit_settled");

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WithdrawSettled {
    pub pool_id: PoolId,
    pub batch_index: BatchIndex,
    pub request_id: RequestId,
    pub requester: Addr,
    pub burned_pool_coin: Uint128,
    pub withdrawn: Coins,
    pub fee: Coins,
    pub status: RequestStatus,
}

contract_event!(WithdrawSettled => "withdraw_settled");

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BatchExecuted {
    pub pool_id: PoolId,
    pub batch_index: BatchIndex,
    pub clearing_price: Option<Udec128>,
    /// Matched volume, in units of the pool's first denom.
    pub matched_volume: Uint128,
    pub swaps: u32,
    pub deposits: u32,
    pub withdraws: u32,
}

contract_event!(BatchExecuted => "batch_executed");

/// Settlement of a pool's batch failed, or its coins couldn't move. Nothing
/// was applied; the batch's requests stay queued.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BatchHalted {
    pub pool_id: PoolId,
    pub batch_index: BatchIndex,
    pub reason: String,
}

contract_event!(BatchHalted => "batch_halted");
