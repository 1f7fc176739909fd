use {
    crate::{
        core::{bid_capacity, discover_clearing_price, matched_volume, pool_willingness, Order},
        LiquidityError, LiquidityResult,
    },
    itertools::Itertools,
    liquidity_types::{
        amm::{Direction, PoolReserves, RequestId, RequestStatus},
        IsZero, MathResult, MultiplyFraction, MultiplyRatio, Number, NumberConst, Udec128,
        Uint128,
    },
    std::{cmp::Reverse, collections::BTreeMap},
};

/// How a single order was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub id: RequestId,
    pub direction: Direction,
    /// Amount of the offered denom exchanged.
    pub filled: Uint128,
    /// Amount of the demanded denom received.
    pub received: Uint128,
    /// Amount of the offered denom returned. The fee isn't included.
    pub refunded: Uint128,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingOutcome {
    /// `None` if nothing matched, in which case every order is refunded.
    pub clearing_price: Option<Udec128>,
    /// Amount of the first denom exchanged, on the busier side of the batch.
    pub matched_volume: Uint128,
    /// One for each order, in the order they were given.
    pub fills: Vec<Fill>,
}

/// Match the orders of a batch against each other and the pool.
///
/// An empty pool matches nothing.
pub fn match_orders(
    reserves: &PoolReserves,
    max_price_impact: Udec128,
    orders: &[Order],
) -> LiquidityResult<MatchingOutcome> {
    let clearing = match discover_clearing_price(reserves, max_price_impact, orders) {
        Ok(clearing) => clearing,
        Err(LiquidityError::NoLiquidity { .. }) => None,
        Err(err) => return Err(err),
    };

    let Some(clearing) = clearing else {
        let fills = orders
            .iter()
            .map(|order| Fill {
                id: order.id,
                direction: order.direction,
                filled: Uint128::ZERO,
                received: Uint128::ZERO,
                refunded: order.amount,
                status: RequestStatus::FullyRefunded,
            })
            .collect();

        return Ok(MatchingOutcome {
            clearing_price: None,
            matched_volume: Uint128::ZERO,
            fills,
        });
    };

    let price = clearing.price;

    // Asks in ascending price, bids in descending price, ties by request id.
    let asks = orders
        .iter()
        .filter(|order| order.direction == Direction::Ask && order.price <= price)
        .copied()
        .sorted_by_key(|order| (order.price, order.id))
        .collect_vec();

    // A bid's capacity is how much of the first denom its offer buys at the
    // clearing price. Capping each at `MAX / n` keeps every sum of them in
    // range.
    let capacity_limit = Uint128::new(u128::MAX / orders.len() as u128);
    let bids = orders
        .iter()
        .filter(|order| order.direction == Direction::Bid && order.price >= price)
        .map(|order| Order {
            amount: bid_capacity(order.amount, price, capacity_limit),
            ..*order
        })
        .sorted_by_key(|order| (Reverse(order.price), order.id))
        .collect_vec();

    let supply = sum_amounts(&asks)?;
    let demand = sum_amounts(&bids)?;
    let willingness = pool_willingness(
        reserves,
        clearing.pool_price,
        max_price_impact,
        price,
        supply,
        demand,
    )?;
    let total = matched_volume(supply, demand, willingness)?;

    let ask_fills = allocate(&asks, total.min(supply))?;
    let bid_fills = allocate(&bids, total.min(demand))?;

    let mut ask_volume = Uint128::ZERO;
    let mut bid_volume = Uint128::ZERO;

    let fills = orders
        .iter()
        .map(|order| match order.direction {
            Direction::Ask => {
                let filled = ask_fills.get(&order.id).copied().unwrap_or_default();
                ask_volume.checked_add_assign(filled)?;

                Ok(Fill {
                    id: order.id,
                    direction: order.direction,
                    filled,
                    received: filled.checked_mul_dec_floor(price)?,
                    refunded: order.amount.checked_sub(filled)?,
                    status: status_of(filled, order.amount),
                })
            },
            Direction::Bid => {
                let bought = bid_fills.get(&order.id).copied().unwrap_or_default();
                let paid = bought.checked_mul_dec_ceil(price)?;
                let capacity = bid_capacity(order.amount, price, capacity_limit);
                bid_volume.checked_add_assign(bought)?;

                Ok(Fill {
                    id: order.id,
                    direction: order.direction,
                    filled: paid,
                    received: bought,
                    refunded: order.amount.checked_sub(paid)?,
                    status: status_of(bought, capacity),
                })
            },
        })
        .collect::<MathResult<Vec<_>>>()?;

    Ok(MatchingOutcome {
        clearing_price: Some(price),
        matched_volume: ask_volume.max(bid_volume),
        fills,
    })
}

fn status_of(filled: Uint128, capacity: Uint128) -> RequestStatus {
    if filled.is_zero() {
        RequestStatus::FullyRefunded
    } else if filled == capacity {
        RequestStatus::Completed
    } else {
        RequestStatus::PartiallyFilledAndRefunded
    }
}

fn sum_amounts(orders: &[Order]) -> MathResult<Uint128> {
    orders
        .iter()
        .try_fold(Uint128::ZERO, |sum, order| sum.checked_add(order.amount))
}

/// Distribute `total` among orders given in priority order.
///
/// Price levels are filled in full one after another. The first level that
/// can't be filled in full is shared pro-rata to order amounts, rounding down;
/// the units lost to rounding go one each to the level's orders in ascending
/// request id.
fn allocate(orders: &[Order], total: Uint128) -> MathResult<BTreeMap<RequestId, Uint128>> {
    let mut fills = BTreeMap::new();
    let mut remaining = total;

    for level in orders.chunk_by(|a, b| a.price == b.price) {
        let level_amount = sum_amounts(level)?;

        if remaining >= level_amount {
            for order in level {
                fills.insert(order.id, order.amount);
            }

            remaining.checked_sub_assign(level_amount)?;
            continue;
        }

        let mut level_fills = level
            .iter()
            .map(|order| {
                let fill = remaining.checked_multiply_ratio_floor(order.amount, level_amount)?;
                Ok((order, fill))
            })
            .collect::<MathResult<Vec<_>>>()?;

        let allocated = level_fills
            .iter()
            .try_fold(Uint128::ZERO, |sum, (_, fill)| sum.checked_add(*fill))?;
        let mut leftover = remaining.checked_sub(allocated)?;

        level_fills.sort_by_key(|(order, _)| order.id);

        for (order, fill) in level_fills {
            if leftover.is_non_zero() && fill < order.amount {
                fills.insert(order.id, fill.checked_add(Uint128::ONE)?);
                leftover.checked_sub_assign(Uint128::ONE)?;
            } else {
                fills.insert(order.id, fill);
            }
        }

        break;
    }

    Ok(fills)
}

// ----------------------------------- tests -----------------------------------
