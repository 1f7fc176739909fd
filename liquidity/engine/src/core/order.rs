use liquidity_types::{
    amm::{Direction, RequestId, SwapRequest},
    MultiplyFraction, Udec128, Uint128,
};

/// The part of a swap request that takes part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub id: RequestId,
    pub direction: Direction,
    /// Limit price, in units of the pool's second denom per unit of its first.
    pub price: Udec128,
    /// For asks, the amount of the first denom offered; for bids, that of the
    /// second. Fee already deducted.
    pub amount: Uint128,
}

impl From<&SwapRequest> for Order {
    fn from(swap: &SwapRequest) -> Self {
        Self {
            id: swap.id,
            direction: swap.direction,
            price: swap.order_price,
            amount: swap.order_amount,
        }
    }
}

/// How much of the first denom `amount` of the second buys at `price`,
/// rounding down and capped at `limit`.
///
/// Bids at tiny limit prices can be worth more than a `Uint128` holds. Those
/// take the cap instead of failing the batch.
pub fn bid_capacity(amount: Uint128, price: Udec128, limit: Uint128) -> Uint128 {
    amount
        .checked_div_dec_floor(price)
        .map_or(limit, |capacity| capacity.min(limit))
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        liquidity_types::NumberConst,
        test_case::test_case,
    };

    #[test_case(300, Udec128::new_percent(110), Uint128::MAX => Uint128::new(272); "rounds down")]
    #[test_case(300, Udec128::new_percent(110), Uint128::new(100) => Uint128::new(100); "capped")]
    #[test_case(
        500_000_000_000_000_000_000, Udec128::raw(Uint128::ONE), Uint128::MAX => Uint128::MAX;
        "saturates"
    )]
    fn capacity(amount: u128, price: Udec128, limit: Uint128) -> Uint128 {
        bid_capacity(Uint128::new(amount), price, limit)
    }
}
