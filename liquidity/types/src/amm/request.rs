use {
    crate::{
        amm::{BatchIndex, Direction, PoolId, RequestId},
        Addr, Coin, Coins, Denom,
    },
    borsh::{BorshDeserialize, BorshSerialize},
    liquidity_math::{NumberConst, Udec128, Uint128},
    serde::{Deserialize, Serialize},
};

#[derive(
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
    strum_macros::Display,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestStatus {
    /// Waiting in the batch queue.
    Pending,
    /// Fully executed. A deposit may still have had its excess refunded.
    Completed,
    PartiallyFilledAndRefunded,
    FullyRefunded,
    /// Stayed in the queue beyond `max_batch_age_blocks` and was refunded
    /// without executing.
    ExpiredAndRefunded,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        self != RequestStatus::Pending
    }
}

#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SwapRequest {
    pub id: RequestId,
    pub pool_id: PoolId,
    pub batch_index: BatchIndex,
    pub requester: Addr,
    pub direction: Direction,
    /// The full amount escrowed when the request was submitted.
    pub offer_coin: Coin,
    pub demand_coin_denom: Denom,
    /// Limit price, in units of the pool's second denom per unit of its first.
    /// An ask accepts any clearing price at or above it; a bid any at or below.
    pub order_price: Udec128,
    /// The swap fee, deducted from the offer.
    pub fee: Uint128,
    /// Offer amount after the fee; this is what takes part in matching.
    pub order_amount: Uint128,
    /// Amount of the offer coin exchanged.
    pub filled_amount: Uint128,
    /// Amount of the demand coin received.
    pub received_amount: Uint128,
    /// Amount of the offer coin returned.
    pub refunded_amount: Uint128,
    pub enqueued_height: u64,
    pub status: RequestStatus,
}

#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DepositRequest {
    pub id: RequestId,
    pub pool_id: PoolId,
    pub batch_index: BatchIndex,
    pub requester: Addr,
    pub deposit_coins: Coins,
    pub minted_pool_coin: Uint128,
    pub refunded_coins: Coins,
    pub enqueued_height: u64,
    pub status: RequestStatus,
}

#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct WithdrawRequest {
    pub id: RequestId,
    pub pool_id: PoolId,
    pub batch_index: BatchIndex,
    pub requester: Addr,
    pub pool_coin: Coin,
    pub withdrawn_coins: Coins,
    /// Withdrawal fee retained by the pool.
    pub fee_coins: Coins,
    pub enqueued_height: u64,
    pub status: RequestStatus,
}

/// Common accessors used by the batch queue, which treats the three request
/// kinds alike.
pub trait Request {
    fn id(&self) -> RequestId;

    fn requester(&self) -> Addr;

    fn enqueued_height(&self) -> u64;

    /// The coins held in escrow while the request is pending.
    fn escrowed(&self) -> Coins;

    /// Mark the request as never executed: everything escrowed goes back to
    /// the requester, and no fee is charged.
    fn refund_in_full(&mut self, status: RequestStatus);
}

impl Request for SwapRequest {
    fn id(&self) -> RequestId {
        self.id
    }

    fn requester(&self) -> Addr {
        self.requester
    }

    fn enqueued_height(&self) -> u64 {
        self.enqueued_height
    }

    fn escrowed(&self) -> Coins {
        self.offer_coin.clone().into()
    }

    fn refund_in_full(&mut self, status: RequestStatus) {
        self.fee = Uint128::ZERO;
        self.refunded_amount = self.offer_coin.amount;
        self.status = status;
    }
}

impl Request for DepositRequest {
    fn id(&self) -> RequestId {
        self.id
    }

    fn requester(&self) -> Addr {
        self.requester
    }

    fn enqueued_height(&self) -> u64 {
        self.enqueued_height
    }

    fn escrowed(&self) -> Coins {
        self.deposit_coins.clone()
    }

    fn refund_in_full(&mut self, status: RequestStatus) {
        self.refunded_coins = self.deposit_coins.clone();
        self.status = status;
    }
}

impl Request for WithdrawRequest {
    fn id(&self) -> RequestId {
        self.id
    }

    fn requester(&self) -> Addr {
        self.requester
    }

    fn enqueued_height(&self) -> u64 {
        self.enqueued_height
    }

    fn escrowed(&self) -> Coins {
        self.pool_coin.clone().into()
    }

    fn refund_in_full(&mut self, status: RequestStatus) {
        self.status = status;
    }
}

// ----------------------------------- tests -----------------------------------
