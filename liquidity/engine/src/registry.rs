use {
    crate::{
        reserve::{apply_reserve_delta, init_reserves},
        LiquidityError, LiquidityResult, ReserveDelta, NEXT_POOL_ID, PARAMS, POOLS,
        POOL_IDS_BY_DENOMS,
    },
    liquidity_types::{
        amm::{Pool, PoolCreated, PoolId, PoolTypeId, POOL_COIN_NAMESPACE},
        Coin, Coins, Denom, MutableCtx, Order as IterationOrder, Response, StdResult, Storage,
    },
};

pub const DEFAULT_PAGE_LIMIT: u32 = 30;

pub const MAX_PAGE_LIMIT: u32 = 100;

pub fn create_pool(
    ctx: MutableCtx,
    pool_type_id: PoolTypeId,
    deposit_coins: [Coin; 2],
) -> LiquidityResult<Response> {
    let params = PARAMS.load(ctx.storage)?;

    for coin in &deposit_coins {
        if coin.denom.namespace() == Some(POOL_COIN_NAMESPACE) {
            return Err(LiquidityError::invalid_denom(
                &coin.denom,
                "pool coins can't be reserve coins",
            ));
        }
    }

    let [coin_a, coin_b] = deposit_coins;

    if coin_a.denom == coin_b.denom {
        return Err(LiquidityError::invalid_denom(
            &coin_a.denom,
            "the two reserve coins must be different",
        ));
    }

    if params.pool_type(pool_type_id).is_none() {
        return Err(LiquidityError::PoolTypeNotFound { pool_type_id });
    }

    let (coin_a, coin_b) = if coin_a.denom < coin_b.denom {
        (coin_a, coin_b)
    } else {
        (coin_b, coin_a)
    };

    if let Some(pool_id) =
        POOL_IDS_BY_DENOMS.may_load(ctx.storage, (&coin_a.denom, &coin_b.denom, pool_type_id))?
    {
        return Err(LiquidityError::PoolAlreadyExists {
            denom_a: coin_a.denom,
            denom_b: coin_b.denom,
            pool_type_id,
            pool_id,
        });
    }

    for coin in [&coin_a, &coin_b] {
        if coin.amount < params.min_init_deposit_amount {
            return Err(LiquidityError::below_minimum_deposit(format!(
                "initial deposit {coin} is less than {}",
                params.min_init_deposit_amount
            )));
        }
    }

    let (pool_id, _) = NEXT_POOL_ID.increment(ctx.storage)?;
    let pool = Pool::new(pool_id, pool_type_id, coin_a.denom.clone(), coin_b.denom.clone());
    let deposit_coins = Coins::try_from([coin_a.clone(), coin_b.clone()])?;

    ctx.bank
        .transfer(&ctx.sender, &pool.reserve_account_address, &deposit_coins)?;
    ctx.bank.mint(&ctx.sender, &Coin {
        denom: pool.pool_coin_denom.clone(),
        amount: params.initial_pool_coin_supply,
    })?;

    init_reserves(ctx.storage, pool_id)?;
    apply_reserve_delta(ctx.storage, pool_id, &ReserveDelta {
        add_a: coin_a.amount,
        add_b: coin_b.amount,
        mint: params.initial_pool_coin_supply,
        ..Default::default()
    })?;

    POOLS.save(ctx.storage, pool_id, &pool)?;
    POOL_IDS_BY_DENOMS.save(
        ctx.storage,
        (&coin_a.denom, &coin_b.denom, pool_type_id),
        &pool_id,
    )?;

    #[cfg(feature = "tracing")]
    {
        tracing::info!(
            pool_id,
            pool_type_id,
            denom_a = %coin_a.denom,
            denom_b = %coin_b.denom,
            "Created pool"
        );
    }

    Ok(Response::new().add_event(PoolCreated {
        pool_id,
        pool_type_id,
        creator: ctx.sender,
        reserve_coin_denoms: pool.reserve_coin_denoms,
        pool_coin_denom: pool.pool_coin_denom,
        reserve_account_address: pool.reserve_account_address,
        deposit_coins,
        minted_pool_coin: params.initial_pool_coin_supply,
    })?)
}

pub fn query_pool(storage: &dyn Storage, pool_id: PoolId) -> LiquidityResult<Pool> {
    POOLS
        .may_load(storage, pool_id)?
        .ok_or(LiquidityError::PoolNotFound { pool_id })
}

/// Pools in ascending id, skipping the first `offset`.
pub fn query_pools(
    storage: &dyn Storage,
    offset: Option<u32>,
    limit: Option<u32>,
) -> LiquidityResult<Vec<Pool>> {
    let offset = offset.unwrap_or(0) as usize;
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT) as usize;

    Ok(POOLS
        .values(storage, IterationOrder::Ascending)
        .skip(offset)
        .take(limit)
        .collect::<StdResult<_>>()?)
}

/// Find a pool by its reserve denoms, given in either order.
pub fn query_pool_by_denoms(
    storage: &dyn Storage,
    denoms: [Denom; 2],
    pool_type_id: PoolTypeId,
) -> LiquidityResult<Option<Pool>> {
    let [denom_a, denom_b] = denoms;
    let (denom_a, denom_b) = if denom_a <= denom_b {
        (denom_a, denom_b)
    } else {
        (denom_b, denom_a)
    };

    POOL_IDS_BY_DENOMS
        .may_load(storage, (&denom_a, &denom_b, pool_type_id))?
        .map(|pool_id| query_pool(storage, pool_id))
        .transpose()
}
