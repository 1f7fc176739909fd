use {
    crate::{LiquidityError, LiquidityResult, RESERVES},
    liquidity_types::{
        amm::{PoolId, PoolReserves},
        IsZero, Number, Storage, Uint128,
    },
};

/// Changes to a pool's reserves and pool coin supply, accumulated over a
/// settlement and applied at once.
///
/// All amounts are non-negative. Increases are applied before decreases, so a
/// delta may pay out coins that arrive within the same settlement.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveDelta {
    pub add_a: Uint128,
    pub sub_a: Uint128,
    pub add_b: Uint128,
    pub sub_b: Uint128,
    pub mint: Uint128,
    pub burn: Uint128,
}

impl ReserveDelta {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn merge(&mut self, other: &ReserveDelta) -> LiquidityResult<()> {
        self.add_a.checked_add_assign(other.add_a)?;
        self.sub_a.checked_add_assign(other.sub_a)?;
        self.add_b.checked_add_assign(other.add_b)?;
        self.sub_b.checked_add_assign(other.sub_b)?;
        self.mint.checked_add_assign(other.mint)?;
        self.burn.checked_add_assign(other.burn)?;

        Ok(())
    }

    /// The reserves after the delta, without checking that a positive pool coin
    /// supply stays backed. Used to price requests against the running
    /// reserves of a settlement.
    pub fn project(
        &self,
        pool_id: PoolId,
        reserves: &PoolReserves,
    ) -> LiquidityResult<PoolReserves> {
        let amount_a = apply_one(pool_id, "reserve a", reserves.amount_a, self.add_a, self.sub_a)?;
        let amount_b = apply_one(pool_id, "reserve b", reserves.amount_b, self.add_b, self.sub_b)?;
        let pool_coin_supply = apply_one(
            pool_id,
            "pool coin supply",
            reserves.pool_coin_supply,
            self.mint,
            self.burn,
        )?;

        Ok(PoolReserves {
            amount_a,
            amount_b,
            pool_coin_supply,
        })
    }

    /// Compute the reserves that result from applying the delta, without
    /// writing anything.
    pub fn apply_to(
        &self,
        pool_id: PoolId,
        reserves: PoolReserves,
    ) -> LiquidityResult<PoolReserves> {
        let reserves = self.project(pool_id, &reserves)?;

        if reserves.pool_coin_supply.is_non_zero()
            && (reserves.amount_a.is_zero() || reserves.amount_b.is_zero())
        {
            return Err(LiquidityError::insufficient_reserves(
                pool_id,
                format!(
                    "pool coin supply {} is backed by reserves {} and {}",
                    reserves.pool_coin_supply, reserves.amount_a, reserves.amount_b
                ),
            ));
        }

        Ok(reserves)
    }
}

fn apply_one(
    pool_id: PoolId,
    what: &str,
    current: Uint128,
    add: Uint128,
    sub: Uint128,
) -> LiquidityResult<Uint128> {
    current
        .checked_add(add)?
        .checked_sub(sub)
        .map_err(|_| {
            LiquidityError::insufficient_reserves(
                pool_id,
                format!("{what} would go negative: {current} + {add} - {sub}"),
            )
        })
}

pub fn query_reserves(storage: &dyn Storage, pool_id: PoolId) -> LiquidityResult<PoolReserves> {
    RESERVES
        .may_load(storage, pool_id)?
        .ok_or(LiquidityError::PoolNotFound { pool_id })
}

/// Apply a delta to the pool's reserve record. Nothing is written if it fails.
///
/// This is the only function that writes reserve records.
pub fn apply_reserve_delta(
    storage: &mut dyn Storage,
    pool_id: PoolId,
    delta: &ReserveDelta,
) -> LiquidityResult<PoolReserves> {
    let reserves = query_reserves(storage, pool_id)?;
    let reserves = delta.apply_to(pool_id, reserves)?;

    RESERVES.save(storage, pool_id, &reserves)?;

    Ok(reserves)
}

/// Create the empty reserve record of a new pool.
pub(crate) fn init_reserves(storage: &mut dyn Storage, pool_id: PoolId) -> LiquidityResult<()> {
    RESERVES.save(storage, pool_id, &PoolReserves::default())?;
    Ok(())
}

// ----------------------------------- tests -----------------------------------
