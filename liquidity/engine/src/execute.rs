use {
    crate::{
        core::compute_deposit,
        genesis::validate_params,
        queue::{self, batch_for_enqueue, enqueue_deposit, enqueue_swap, enqueue_withdraw},
        registry::{create_pool, query_pool},
        reserve::query_reserves,
        LiquidityError, LiquidityResult, NEXT_REQUEST_ID, PARAMS,
    },
    liquidity_types::{
        amm::{
            DepositRequest, DepositSubmitted, ExecuteMsg, InstantiateMsg, PoolId, Request,
            RequestId, RequestStatus, SwapRequest, SwapSubmitted, WithdrawRequest,
            WithdrawSubmitted,
        },
        Buffer, Coin, Coins, Denom, IsZero, MultiplyFraction, MutableCtx, Number, NumberConst,
        Response, Udec128, Uint128,
    },
};

pub fn instantiate(ctx: MutableCtx, msg: InstantiateMsg) -> LiquidityResult<Response> {
    validate_params(&msg.params)?;

    PARAMS.save(ctx.storage, &msg.params)?;

    Ok(Response::new())
}

/// Handle a message from a user.
///
/// Storage writes are buffered and only committed if the message succeeds,
/// so a failed escrow transfer leaves no trace.
pub fn execute(ctx: MutableCtx, msg: ExecuteMsg) -> LiquidityResult<Response> {
    let MutableCtx {
        storage,
        bank,
        block,
        contract,
        sender,
    } = ctx;

    let mut buffer = Buffer::new(storage);

    let ctx = MutableCtx {
        storage: &mut buffer,
        bank,
        block,
        contract,
        sender,
    };

    let response = match msg {
        ExecuteMsg::CreatePool {
            pool_type_id,
            deposit_coins,
        } => create_pool(ctx, pool_type_id, deposit_coins),
        ExecuteMsg::Swap {
            pool_id,
            offer_coin,
            demand_coin_denom,
            order_price,
        } => swap(ctx, pool_id, offer_coin, demand_coin_denom, order_price),
        ExecuteMsg::Deposit {
            pool_id,
            deposit_coins,
        } => deposit(ctx, pool_id, deposit_coins),
        ExecuteMsg::Withdraw { pool_id, pool_coin } => withdraw(ctx, pool_id, pool_coin),
        ExecuteMsg::Cancel {
            pool_id,
            request_id,
        } => cancel(ctx, pool_id, request_id),
    }?;

    buffer.commit();

    Ok(response)
}

fn swap(
    ctx: MutableCtx,
    pool_id: PoolId,
    offer_coin: Coin,
    demand_coin_denom: Denom,
    order_price: Udec128,
) -> LiquidityResult<Response> {
    let params = PARAMS.load(ctx.storage)?;
    let pool = query_pool(ctx.storage, pool_id)?;

    let direction = pool.direction_of_offer(&offer_coin.denom).ok_or_else(|| {
        LiquidityError::invalid_denom(&offer_coin.denom, "not a reserve coin of the pool")
    })?;

    if demand_coin_denom != *pool.demand_denom(direction) {
        return Err(LiquidityError::invalid_denom(
            &demand_coin_denom,
            format!("expecting the pool's other reserve coin {}", pool.demand_denom(direction)),
        ));
    }

    if offer_coin.amount.is_zero() {
        return Err(LiquidityError::invalid_request("offer amount is zero"));
    }

    if order_price.is_zero() {
        return Err(LiquidityError::invalid_request("order price is zero"));
    }

    let fee = offer_coin.amount.checked_mul_dec_floor(params.swap_fee_rate)?;
    let order_amount = offer_coin.amount.checked_sub(fee)?;

    if order_amount.is_zero() {
        return Err(LiquidityError::invalid_request(
            "nothing left of the offer after the swap fee",
        ));
    }

    let reserves = query_reserves(ctx.storage, pool_id)?;

    if reserves.amount_a.is_zero() || reserves.amount_b.is_zero() {
        return Err(LiquidityError::NoLiquidity {
            reserve_a: reserves.amount_a,
            reserve_b: reserves.amount_b,
        });
    }

    let max_amount = reserves
        .amount_of(direction)
        .checked_mul_dec_floor(params.max_order_amount_ratio)?;

    if offer_coin.amount > max_amount {
        return Err(LiquidityError::PriceImpactExceeded {
            offer_amount: offer_coin.amount,
            max_amount,
        });
    }

    let batch = batch_for_enqueue(ctx.storage, pool_id, ctx.block.height)?;
    let (request_id, _) = NEXT_REQUEST_ID.increment(ctx.storage)?;

    let swap = SwapRequest {
        id: request_id,
        pool_id,
        batch_index: batch.index,
        requester: ctx.sender,
        direction,
        offer_coin,
        demand_coin_denom,
        order_price,
        fee,
        order_amount,
        filled_amount: Uint128::ZERO,
        received_amount: Uint128::ZERO,
        refunded_amount: Uint128::ZERO,
        enqueued_height: ctx.block.height,
        status: RequestStatus::Pending,
    };

    enqueue_swap(ctx.storage, &swap)?;

    ctx.bank
        .transfer(&ctx.sender, &ctx.contract, &swap.escrowed())?;

    #[cfg(feature = "tracing")]
    {
        tracing::debug!(
            pool_id,
            request_id,
            batch_index = batch.index,
            direction = %swap.direction,
            offer = %swap.offer_coin,
            order_price = %swap.order_price,
            "Enqueued swap"
        );
    }

    Ok(Response::new().add_event(SwapSubmitted {
        pool_id,
        batch_index: batch.index,
        request_id,
        requester: ctx.sender,
        direction,
        offer_coin: swap.offer_coin,
        demand_coin_denom: swap.demand_coin_denom,
        order_price,
        fee,
    })?)
}

fn deposit(ctx: MutableCtx, pool_id: PoolId, deposit_coins: Coins) -> LiquidityResult<Response> {
    let params = PARAMS.load(ctx.storage)?;
    let pool = query_pool(ctx.storage, pool_id)?;

    if deposit_coins.len() != 2 {
        return Err(LiquidityError::invalid_request(format!(
            "a deposit takes exactly the pool's two reserve coins, got {deposit_coins}"
        )));
    }

    if let Some(coin) = deposit_coins
        .iter()
        .find(|coin| !pool.reserve_coin_denoms.contains(coin.denom))
    {
        return Err(LiquidityError::invalid_denom(
            coin.denom,
            "not a reserve coin of the pool",
        ));
    }

    let reserves = query_reserves(ctx.storage, pool_id)?;
    let outcome = compute_deposit(
        &reserves,
        deposit_coins.amount_of(pool.denom_a()),
        deposit_coins.amount_of(pool.denom_b()),
        params.initial_pool_coin_supply,
        params.min_init_deposit_amount,
    )?;

    if outcome.minted.is_zero() {
        return Err(LiquidityError::below_minimum_deposit(format!(
            "{deposit_coins} mints no pool coins at reserves {} and {}",
            reserves.amount_a, reserves.amount_b
        )));
    }

    let batch = batch_for_enqueue(ctx.storage, pool_id, ctx.block.height)?;
    let (request_id, _) = NEXT_REQUEST_ID.increment(ctx.storage)?;

    let deposit = DepositRequest {
        id: request_id,
        pool_id,
        batch_index: batch.index,
        requester: ctx.sender,
        deposit_coins,
        minted_pool_coin: Uint128::ZERO,
        refunded_coins: Coins::new(),
        enqueued_height: ctx.block.height,
        status: RequestStatus::Pending,
    };

    enqueue_deposit(ctx.storage, &deposit)?;

    ctx.bank
        .transfer(&ctx.sender, &ctx.contract, &deposit.deposit_coins)?;

    #[cfg(feature = "tracing")]
    {
        tracing::debug!(
            pool_id,
            request_id,
            batch_index = batch.index,
            coins = %deposit.deposit_coins,
            "Enqueued deposit"
        );
    }

    Ok(Response::new().add_event(DepositSubmitted {
        pool_id,
        batch_index: batch.index,
        request_id,
        requester: ctx.sender,
        deposit_coins: deposit.deposit_coins,
    })?)
}

fn withdraw(ctx: MutableCtx, pool_id: PoolId, pool_coin: Coin) -> LiquidityResult<Response> {
    let pool = query_pool(ctx.storage, pool_id)?;

    if pool_coin.denom != pool.pool_coin_denom {
        return Err(LiquidityError::invalid_denom(
            &pool_coin.denom,
            format!("expecting the pool coin {}", pool.pool_coin_denom),
        ));
    }

    if pool_coin.amount.is_zero() {
        return Err(LiquidityError::invalid_request("withdraw amount is zero"));
    }

    let balance = ctx.bank.balance(&ctx.sender, &pool_coin.denom)?;

    if balance < pool_coin.amount {
        return Err(LiquidityError::InsufficientShares {
            requested: pool_coin.amount,
            balance,
        });
    }

    let batch = batch_for_enqueue(ctx.storage, pool_id, ctx.block.height)?;
    let (request_id, _) = NEXT_REQUEST_ID.increment(ctx.storage)?;

    let withdraw = WithdrawRequest {
        id: request_id,
        pool_id,
        batch_index: batch.index,
        requester: ctx.sender,
        pool_coin,
        withdrawn_coins: Coins::new(),
        fee_coins: Coins::new(),
        enqueued_height: ctx.block.height,
        status: RequestStatus::Pending,
    };

    enqueue_withdraw(ctx.storage, &withdraw)?;

    ctx.bank
        .transfer(&ctx.sender, &ctx.contract, &withdraw.escrowed())?;

    #[cfg(feature = "tracing")]
    {
        tracing::debug!(
            pool_id,
            request_id,
            batch_index = batch.index,
            pool_coin = %withdraw.pool_coin,
            "Enqueued withdrawal"
        );
    }

    Ok(Response::new().add_event(WithdrawSubmitted {
        pool_id,
        batch_index: batch.index,
        request_id,
        requester: ctx.sender,
        pool_coin: withdraw.pool_coin,
    })?)
}

fn cancel(ctx: MutableCtx, pool_id: PoolId, request_id: RequestId) -> LiquidityResult<Response> {
    query_pool(ctx.storage, pool_id)?;

    let canceled = queue::cancel(ctx.storage, pool_id, request_id, ctx.sender)?;

    if !canceled.refund.is_empty() {
        ctx.bank
            .transfer(&ctx.contract, &ctx.sender, &canceled.refund)?;
    }

    #[cfg(feature = "tracing")]
    {
        tracing::debug!(pool_id, request_id, refund = %canceled.refund, "Canceled request");
    }

    Ok(Response::new().add_event(canceled)?)
}
