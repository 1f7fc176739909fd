use {
    crate::{
        core::{bid_capacity, Order},
        LiquidityError, LiquidityResult,
    },
    liquidity_types::{
        amm::{Direction, PoolReserves},
        IsZero, MathResult, MultiplyRatio, Number, NumberConst, Udec128, Uint128,
    },
    std::{
        cmp::{Ordering, Reverse},
        collections::BTreeSet,
        iter,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearingPrice {
    pub price: Udec128,
    /// The reserve ratio before the batch.
    pub pool_price: Udec128,
    /// Amount of the first denom that changes hands at this price, counting
    /// what the pool absorbs.
    pub matched_volume: Uint128,
}

impl ClearingPrice {
    /// Higher volume wins; then the price closer to the pool price; then the
    /// lower price.
    pub fn outranks(&self, other: &Self) -> bool {
        let rank = |clearing: &Self| {
            (
                clearing.matched_volume,
                Reverse(clearing.price.abs_diff(clearing.pool_price)),
                Reverse(clearing.price),
            )
        };

        rank(self) > rank(other)
    }
}

/// The most the pool takes on, in units of the first denom, to absorb an
/// imbalance between supply and demand at the given price.
///
/// - When supply exceeds demand and the price doesn't exceed the pool price,
///   the pool buys up to `m * rb / (p + (1 - m) * P0)`;
/// - when demand exceeds supply and the price isn't below the pool price, the
///   pool sells up to `m * rb / (p + (1 + m) * P0)`;
/// - otherwise nothing.
///
/// Either bound keeps the pool's reserve ratio after the trade within
/// `P0 * (1 ± m)`. The pool stays out at prices too large to add to the pool
/// price, and a bound past `Uint128::MAX` is clamped to it.
pub fn pool_willingness(
    reserves: &PoolReserves,
    pool_price: Udec128,
    max_price_impact: Udec128,
    price: Udec128,
    supply: Uint128,
    demand: Uint128,
) -> MathResult<Uint128> {
    let shift = match supply.cmp(&demand) {
        Ordering::Greater if price <= pool_price => Udec128::ONE.checked_sub(max_price_impact)?,
        Ordering::Less if price >= pool_price => Udec128::ONE.checked_add(max_price_impact)?,
        _ => return Ok(Uint128::ZERO),
    };

    let Ok(denominator) = price.checked_add(shift.checked_mul(pool_price)?) else {
        return Ok(Uint128::ZERO);
    };

    Ok(reserves
        .amount_b
        .checked_multiply_ratio_floor(*max_price_impact.numerator(), *denominator.numerator())
        .unwrap_or(Uint128::MAX))
}

/// `min(S, D) + min(|S - D|, W)`
pub fn matched_volume(
    supply: Uint128,
    demand: Uint128,
    willingness: Uint128,
) -> MathResult<Uint128> {
    supply
        .min(demand)
        .checked_add(supply.abs_diff(demand).min(willingness))
}

/// Find the single price at which the batch's orders, together with the pool,
/// exchange the most.
///
/// Candidates are the orders' limit prices and the pool price. Among prices of
/// equal volume, the one closest to the pool price wins; between two equally
/// close, the lower one.
///
/// Returns `None` if no candidate achieves a non-zero volume.
pub fn discover_clearing_price(
    reserves: &PoolReserves,
    max_price_impact: Udec128,
    orders: &[Order],
) -> LiquidityResult<Option<ClearingPrice>> {
    if reserves.amount_a.is_zero() || reserves.amount_b.is_zero() {
        return Err(LiquidityError::NoLiquidity {
            reserve_a: reserves.amount_a,
            reserve_b: reserves.amount_b,
        });
    }

    let pool_price = reserves.price()?;

    let (mut asks, mut bids): (Vec<&Order>, Vec<&Order>) = orders
        .iter()
        .partition(|order| order.direction == Direction::Ask);

    asks.sort_by_key(|order| order.price);
    bids.sort_by_key(|order| order.price);

    let candidates = orders
        .iter()
        .map(|order| order.price)
        .chain(iter::once(pool_price))
        .filter(|price| price.is_non_zero())
        .collect::<BTreeSet<_>>();

    let total_bid = bids
        .iter()
        .try_fold(Uint128::ZERO, |sum, order| sum.checked_add(order.amount))?;

    let mut asks = asks.into_iter().peekable();
    let mut bids = bids.into_iter().peekable();
    let mut supply = Uint128::ZERO;
    let mut bid_below = Uint128::ZERO;
    let mut best: Option<ClearingPrice> = None;

    // Going up in price, asks only ever join the supply and bids only ever
    // leave the demand.
    for price in candidates {
        while let Some(ask) = asks.next_if(|ask| ask.price <= price) {
            supply.checked_add_assign(ask.amount)?;
        }

        while let Some(bid) = bids.next_if(|bid| bid.price < price) {
            bid_below.checked_add_assign(bid.amount)?;
        }

        let demand = bid_capacity(total_bid.checked_sub(bid_below)?, price, Uint128::MAX);
        let willingness =
            pool_willingness(reserves, pool_price, max_price_impact, price, supply, demand)?;

        let candidate = ClearingPrice {
            price,
            pool_price,
            matched_volume: matched_volume(supply, demand, willingness)?,
        };

        if best.as_ref().map_or(true, |best| candidate.outranks(best)) {
            best = Some(candidate);
        }
    }

    Ok(best.filter(|best| best.matched_volume.is_non_zero()))
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    fn reserves(a: u128, b: u128) -> PoolReserves {
        PoolReserves {
            amount_a: Uint128::new(a),
            amount_b: Uint128::new(b),
            pool_coin_supply: Uint128::new(1_000_000),
        }
    }

    fn ask(id: u64, price: Udec128, amount: u128) -> Order {
        Order {
            id,
            direction: Direction::Ask,
            price,
            amount: Uint128::new(amount),
        }
    }

    fn bid(id: u64, price: Udec128, amount: u128) -> Order {
        Order {
            id,
            direction: Direction::Bid,
            price,
            amount: Uint128::new(amount),
        }
    }

    // Supply and demand at 0.9 and at 1.0 both allow 997 units; the pool
    // price wins the tie.
    #[test]
    fn crossing_orders_clear_at_pool_price() {
        let orders = [
            ask(1, Udec128::new_percent(90), 997),
            bid(2, Udec128::new_percent(105), 898),
        ];

        let clearing = discover_clearing_price(
            &reserves(1_000_000_000, 1_000_000_000),
            Udec128::new_percent(10),
            &orders,
        )
        .unwrap()
        .unwrap();

        assert_eq!(clearing, ClearingPrice {
            price: Udec128::ONE,
            pool_price: Udec128::ONE,
            matched_volume: Uint128::new(997),
        });
    }

    // At 1.1 the bid takes floor(300 / 1.1) = 272 units; at 1.2 only 250.
    #[test]
    fn competing_asks() {
        let orders = [
            ask(1, Udec128::new_percent(110), 100),
            ask(2, Udec128::new_percent(110), 200),
            ask(3, Udec128::new_percent(110), 300),
            bid(4, Udec128::new_percent(120), 300),
        ];

        let clearing = discover_clearing_price(
            &reserves(1_000_000_000, 1_000_000_000),
            Udec128::ZERO,
            &orders,
        )
        .unwrap()
        .unwrap();

        assert_eq!(clearing.price, Udec128::new_percent(110));
        assert_eq!(clearing.matched_volume, Uint128::new(272));
    }

    // With no counterparty, the pool buys what it's willing to:
    // 0.01 * 1e9 / (0.5 + 0.99 * 1) = 6_711_409.39...
    #[test]
    fn pool_absorbs_one_sided_batch() {
        let orders = [ask(1, Udec128::new_percent(50), 20_000_000)];

        let clearing = discover_clearing_price(
            &reserves(1_000_000_000, 1_000_000_000),
            Udec128::new_percent(1),
            &orders,
        )
        .unwrap()
        .unwrap();

        assert_eq!(clearing.price, Udec128::new_percent(50));
        assert_eq!(clearing.matched_volume, Uint128::new(6_711_409));
    }

    #[test]
    fn ties_prefer_pool_price() {
        let orders = [
            ask(1, Udec128::new_percent(90), 100),
            bid(2, Udec128::new_percent(110), 110),
        ];

        let clearing = discover_clearing_price(&reserves(500, 500), Udec128::ZERO, &orders)
            .unwrap()
            .unwrap();

        assert_eq!(clearing.price, Udec128::ONE);
        assert_eq!(clearing.matched_volume, Uint128::new(100));
    }

    #[test]
    fn equally_close_prices_prefer_the_lower() {
        let at = |percent| ClearingPrice {
            price: Udec128::new_percent(percent),
            pool_price: Udec128::ONE,
            matched_volume: Uint128::new(500),
        };

        assert!(at(90).outranks(&at(110)));
        assert!(!at(110).outranks(&at(90)));
        assert!(at(95).outranks(&at(90)));
        assert!(!at(90).outranks(&at(90)));

        let busier = ClearingPrice {
            matched_volume: Uint128::new(501),
            ..at(110)
        };
        assert!(busier.outranks(&at(100)));
    }

    // 5e20 / 1e-18 doesn't fit in a `Uint128`; the bid's demand saturates and
    // the batch still clears for the other order.
    #[test]
    fn bid_at_tiny_price_saturates() {
        let orders = [
            ask(1, Udec128::new_percent(90), 1_000_000),
            bid(2, Udec128::raw(Uint128::ONE), 500_000_000_000_000_000_000),
        ];

        let clearing = discover_clearing_price(
            &reserves(10_000_000_000_000_000_000_000, 10_000_000_000_000_000_000_000),
            Udec128::new_percent(10),
            &orders,
        )
        .unwrap()
        .unwrap();

        assert_eq!(clearing.price, Udec128::ONE);
        assert_eq!(clearing.matched_volume, Uint128::new(1_000_000));
    }

    #[test]
    fn willingness_past_decimal_range() {
        let pool = reserves(1_000_000_000, 1_000_000_000);

        assert_eq!(
            pool_willingness(
                &pool,
                Udec128::ONE,
                Udec128::new_percent(10),
                Udec128::MAX,
                Uint128::ZERO,
                Uint128::new(100),
            ),
            Ok(Uint128::ZERO)
        );
    }

    #[test_case(&[]; "empty batch")]
    #[test_case(&[ask(1, Udec128::new(2), 100), bid(2, Udec128::new_percent(50), 100)]; "no overlap")]
    fn nothing_matches(orders: &[Order]) {
        assert_eq!(
            discover_clearing_price(&reserves(1_000, 1_000), Udec128::ZERO, orders),
            Ok(None)
        );
    }

    #[test_case(0, 1_000; "no first denom")]
    #[test_case(1_000, 0; "no second denom")]
    fn empty_pool(a: u128, b: u128) {
        let orders = [ask(1, Udec128::ONE, 100)];

        assert!(matches!(
            discover_clearing_price(&reserves(a, b), Udec128::new_percent(10), &orders),
            Err(LiquidityError::NoLiquidity { .. })
        ));
    }

    #[test_case(1_000, 900, Udec128::new_percent(90) => 55_555_555; "buying below pool price")]
    #[test_case(1_000, 900, Udec128::new_percent(110) => 0; "buying above pool price")]
    #[test_case(900, 1_000, Udec128::new_percent(110) => 45_454_545; "selling above pool price")]
    #[test_case(900, 1_000, Udec128::new_percent(90) => 0; "selling below pool price")]
    #[test_case(1_000, 1_000, Udec128::ONE => 0; "balanced")]
    fn willingness(supply: u128, demand: u128, price: Udec128) -> u128 {
        // 0.1 * 1e9 / (0.9 + 0.9) and 0.1 * 1e9 / (1.1 + 1.1)
        pool_willingness(
            &reserves(1_000_000_000, 1_000_000_000),
            Udec128::ONE,
            Udec128::new_percent(10),
            price,
            Uint128::new(supply),
            Uint128::new(demand),
        )
        .unwrap()
        .number()
    }
}
