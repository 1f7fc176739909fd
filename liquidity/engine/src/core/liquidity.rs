use {
    crate::ReserveDelta,
    liquidity_types::{
        amm::PoolReserves, IsZero, MathResult, MultiplyFraction, MultiplyRatio, Number,
        NumberConst, Udec128, Uint128,
    },
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositOutcome {
    pub minted: Uint128,
    /// Amounts taken into the reserves. The rest of the deposit is refunded.
    pub used_a: Uint128,
    pub used_b: Uint128,
}

impl DepositOutcome {
    pub fn delta(&self) -> ReserveDelta {
        ReserveDelta {
            add_a: self.used_a,
            add_b: self.used_b,
            mint: self.minted,
            ..Default::default()
        }
    }
}

/// Compute the pool coins minted for a deposit.
///
/// The depositor gets pool coins in proportion to the smaller of the two
/// relative contributions, and pays for them rounding up; the excess of the
/// other coin is refunded.
///
/// A pool with no pool coins in circulation starts over: if both amounts are
/// at least `min_init_deposit_amount`, the deposit is taken in full for
/// `initial_pool_coin_supply` pool coins.
///
/// A zero outcome means the deposit is too small to mint anything.
pub fn compute_deposit(
    reserves: &PoolReserves,
    amount_a: Uint128,
    amount_b: Uint128,
    initial_pool_coin_supply: Uint128,
    min_init_deposit_amount: Uint128,
) -> MathResult<DepositOutcome> {
    let supply = reserves.pool_coin_supply;

    if supply.is_zero() {
        if amount_a < min_init_deposit_amount || amount_b < min_init_deposit_amount {
            return Ok(DepositOutcome::default());
        }

        return Ok(DepositOutcome {
            minted: initial_pool_coin_supply,
            used_a: amount_a,
            used_b: amount_b,
        });
    }

    let minted = amount_a
        .checked_multiply_ratio_floor(supply, reserves.amount_a)?
        .min(amount_b.checked_multiply_ratio_floor(supply, reserves.amount_b)?);

    if minted.is_zero() {
        return Ok(DepositOutcome::default());
    }

    Ok(DepositOutcome {
        minted,
        used_a: minted.checked_multiply_ratio_ceil(reserves.amount_a, supply)?,
        used_b: minted.checked_multiply_ratio_ceil(reserves.amount_b, supply)?,
    })
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawOutcome {
    /// Amounts paid out to the withdrawer, fee deducted.
    pub withdrawn_a: Uint128,
    pub withdrawn_b: Uint128,
    /// Amounts retained by the pool.
    pub fee_a: Uint128,
    pub fee_b: Uint128,
}

impl WithdrawOutcome {
    pub fn is_empty(&self) -> bool {
        self.withdrawn_a.is_zero()
            && self.withdrawn_b.is_zero()
            && self.fee_a.is_zero()
            && self.fee_b.is_zero()
    }

    pub fn delta(&self, burned: Uint128) -> ReserveDelta {
        ReserveDelta {
            sub_a: self.withdrawn_a,
            sub_b: self.withdrawn_b,
            burn: burned,
            ..Default::default()
        }
    }
}

/// Compute the reserves returned for burning pool coins.
///
/// The withdrawer's share of each reserve is rounded down, and a fee is taken
/// from it (also rounded down) that stays in the pool. Withdrawing the entire
/// supply returns everything, free of fee.
pub fn compute_withdraw(
    reserves: &PoolReserves,
    pool_coin_amount: Uint128,
    withdraw_fee_rate: Udec128,
) -> MathResult<WithdrawOutcome> {
    let supply = reserves.pool_coin_supply;

    if pool_coin_amount == supply {
        return Ok(WithdrawOutcome {
            withdrawn_a: reserves.amount_a,
            withdrawn_b: reserves.amount_b,
            fee_a: Uint128::ZERO,
            fee_b: Uint128::ZERO,
        });
    }

    let gross_a = pool_coin_amount.checked_multiply_ratio_floor(reserves.amount_a, supply)?;
    let gross_b = pool_coin_amount.checked_multiply_ratio_floor(reserves.amount_b, supply)?;
    let fee_a = gross_a.checked_mul_dec_floor(withdraw_fee_rate)?;
    let fee_b = gross_b.checked_mul_dec_floor(withdraw_fee_rate)?;

    Ok(WithdrawOutcome {
        withdrawn_a: gross_a.checked_sub(fee_a)?,
        withdrawn_b: gross_b.checked_sub(fee_b)?,
        fee_a,
        fee_b,
    })
}

// ----------------------------------- tests -----------------------------------
