use {
    crate::{
        queue::pending,
        registry::{query_pool, query_pool_by_denoms, query_pools},
        reserve::query_reserves,
        LiquidityError, LiquidityResult, BATCHES, DEPOSIT_RESULTS, PARAMS, PENDING_DEPOSITS,
        PENDING_SWAPS, PENDING_WITHDRAWS, SWAP_RESULTS, WITHDRAW_RESULTS,
    },
    liquidity_storage::{Borsh, Codec, Map},
    liquidity_types::{
        amm::{Pool, PoolId, PoolResponse, QueryMsg, RequestId},
        ImmutableCtx, Json, JsonDeExt, JsonSerExt, Storage,
    },
};

pub fn query(ctx: ImmutableCtx, msg: QueryMsg) -> LiquidityResult<Json> {
    let storage = ctx.storage;

    let json = match msg {
        QueryMsg::Params {} => PARAMS.load(storage)?.to_json_value(),
        QueryMsg::Pool { pool_id } => {
            let pool = query_pool(storage, pool_id)?;
            pool_response(storage, pool)?.to_json_value()
        },
        QueryMsg::Pools { offset, limit } => query_pools(storage, offset, limit)?
            .into_iter()
            .map(|pool| pool_response(storage, pool))
            .collect::<LiquidityResult<Vec<_>>>()?
            .to_json_value(),
        QueryMsg::PoolByDenoms {
            denoms,
            pool_type_id,
        } => query_pool_by_denoms(storage, denoms, pool_type_id)?
            .map(|pool| pool_response(storage, pool))
            .transpose()?
            .to_json_value(),
        QueryMsg::Reserves { pool_id } => query_reserves(storage, pool_id)?.to_json_value(),
        QueryMsg::Batch { pool_id } => {
            query_pool(storage, pool_id)?;
            BATCHES.may_load(storage, pool_id)?.to_json_value()
        },
        QueryMsg::PendingSwaps { pool_id } => {
            query_pool(storage, pool_id)?;
            pending(storage, &PENDING_SWAPS, pool_id)?.to_json_value()
        },
        QueryMsg::PendingDeposits { pool_id } => {
            query_pool(storage, pool_id)?;
            pending(storage, &PENDING_DEPOSITS, pool_id)?.to_json_value()
        },
        QueryMsg::PendingWithdraws { pool_id } => {
            query_pool(storage, pool_id)?;
            pending(storage, &PENDING_WITHDRAWS, pool_id)?.to_json_value()
        },
        QueryMsg::SwapRequest {
            pool_id,
            request_id,
        } => query_request(storage, &PENDING_SWAPS, &SWAP_RESULTS, pool_id, request_id)?
            .to_json_value(),
        QueryMsg::DepositRequest {
            pool_id,
            request_id,
        } => query_request(storage, &PENDING_DEPOSITS, &DEPOSIT_RESULTS, pool_id, request_id)?
            .to_json_value(),
        QueryMsg::WithdrawRequest {
            pool_id,
            request_id,
        } => query_request(storage, &PENDING_WITHDRAWS, &WITHDRAW_RESULTS, pool_id, request_id)?
            .to_json_value(),
    }?;

    Ok(json)
}

/// Decode a JSON-encoded query and answer it.
pub fn query_raw(ctx: ImmutableCtx, msg: &[u8]) -> LiquidityResult<Json> {
    let msg = msg
        .deserialize_json::<QueryMsg>()
        .map_err(LiquidityError::malformed_request)?;

    query(ctx, msg)
}

fn pool_response(storage: &dyn Storage, pool: Pool) -> LiquidityResult<PoolResponse> {
    Ok(PoolResponse {
        reserves: query_reserves(storage, pool.id)?,
        pool,
    })
}

fn query_request<R>(
    storage: &dyn Storage,
    pending: &Map<(PoolId, RequestId), R>,
    results: &Map<(PoolId, RequestId), R>,
    pool_id: PoolId,
    request_id: RequestId,
) -> LiquidityResult<R>
where
    Borsh: Codec<R>,
{
    if let Some(request) = pending.may_load(storage, (pool_id, request_id))? {
        return Ok(request);
    }

    results
        .may_load(storage, (pool_id, request_id))?
        .ok_or(LiquidityError::RequestNotFound {
            pool_id,
            request_id,
        })
}
