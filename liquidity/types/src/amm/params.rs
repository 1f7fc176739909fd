use {
    crate::amm::PoolTypeId,
    borsh::{BorshDeserialize, BorshSerialize},
    liquidity_math::{Udec128, Uint128},
    serde::{Deserialize, Serialize},
};

/// A pool type: selects the matching policy constants used for pools created
/// with it.
#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PoolType {
    pub id: PoolTypeId,
    pub name: String,
    pub description: String,
    /// Overrides `Params::max_price_impact` for pools of this type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price_impact: Option<Udec128>,
}

/// Module parameters, read once per call from storage.
#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct Params {
    pub pool_types: Vec<PoolType>,
    /// Fraction of each offered amount taken as the swap fee.
    pub swap_fee_rate: Udec128,
    /// Fraction of each withdrawal retained by the pool.
    pub withdraw_fee_rate: Udec128,
    /// How far the pool's own absorption of a batch's imbalance may move its
    /// reserve ratio, relative to the ratio before the batch.
    pub max_price_impact: Udec128,
    /// Upper bound of a single swap's offer amount, as a fraction of the
    /// pool's reserve of the offered denom.
    pub max_order_amount_ratio: Udec128,
    /// Number of blocks a batch stays open before it's executed.
    pub unit_batch_height: u64,
    /// Number of blocks after which a request still in the queue is refunded.
    pub max_batch_age_blocks: u64,
    /// Amount of pool coins minted when a pool is created, or refilled after
    /// being fully withdrawn.
    pub initial_pool_coin_supply: Uint128,
    /// Minimum amount of each reserve coin needed to create a pool.
    pub min_init_deposit_amount: Uint128,
}

impl Params {
    pub fn pool_type(&self, id: PoolTypeId) -> Option<&PoolType> {
        self.pool_types.iter().find(|pool_type| pool_type.id == id)
    }

    pub fn max_price_impact_for(&self, id: PoolTypeId) -> Udec128 {
        self.pool_type(id)
            .and_then(|pool_type| pool_type.max_price_impact)
            .unwrap_or(self.max_price_impact)
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            pool_types: vec![PoolType {
                id: 1,
                name: "StandardLiquidityPool".to_string(),
                description: "constant product pool of two reserve coins, priced as the ratio of its reserves".to_string(),
                max_price_impact: None,
            }],
            swap_fee_rate: Udec128::new_permille(3),
            withdraw_fee_rate: Udec128::new_permille(3),
            max_price_impact: Udec128::new_percent(10),
            max_order_amount_ratio: Udec128::new_percent(10),
            unit_batch_height: 1,
            max_batch_age_blocks: 100,
            initial_pool_coin_supply: Uint128::new(1_000_000),
            min_init_deposit_amount: Uint128::new(1_000_000),
        }
    }
}
