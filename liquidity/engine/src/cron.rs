use {
    crate::{
        queue::{expire_stale, prune_results},
        registry::query_pool,
        settlement::{settle_batch, Settlement},
        LiquidityResult, BATCHES, PARAMS,
    },
    liquidity_types::{
        amm::{Batch, BatchHalted, BatchStatus},
        Buffer, Order as IterationOrder, Response, StdResult, SudoCtx, TransferBuilder,
    },
};

/// Execute the batches of all pools that are due, in ascending pool id.
///
/// Called once at the end of every block. Before a pool's batch is executed,
/// requests that have waited too long are refunded.
///
/// Each pool is settled in its own write buffer. If settlement fails for any
/// reason, including a coin movement the ledger rejects, the pool's writes are
/// discarded and its batch is left `Executing`. Other pools are unaffected.
/// The pool takes no new requests while in this state, and the batch is
/// retried every block.
pub fn execute_batches(ctx: SudoCtx) -> LiquidityResult<Response> {
    let params = PARAMS.load(ctx.storage)?;
    let height = ctx.block.height;
    let mut response = Response::new();

    let batches = BATCHES
        .range(ctx.storage, IterationOrder::Ascending)
        .collect::<StdResult<Vec<_>>>()?;

    for (pool_id, batch) in batches {
        if batch.status == BatchStatus::Executed {
            continue;
        }

        let due = batch.status == BatchStatus::Executing
            || batch.is_due(height, params.unit_batch_height);

        if due {
            prune_results(ctx.storage, pool_id);
        }

        let mut refunds = TransferBuilder::new(ctx.contract);
        let expired = expire_stale(
            ctx.storage,
            pool_id,
            height,
            params.max_batch_age_blocks,
            &mut refunds,
        )?;

        refunds.execute(ctx.bank)?;
        response = response.add_events(expired);

        if !due {
            continue;
        }

        let pool = query_pool(ctx.storage, pool_id)?;
        let mut buffer = Buffer::new(&mut *ctx.storage);

        // Coins move before the buffer is committed; if they can't, the pool's
        // writes are discarded along with everything else.
        let settled = settle_batch(
            &mut buffer,
            &params,
            &pool,
            batch.clone(),
            height,
            ctx.contract,
        )
        .and_then(|settlement| {
            let Settlement {
                bank_ops,
                events,
                summary,
                ..
            } = settlement;

            bank_ops.ensure_funded(&*ctx.bank)?;
            bank_ops.execute(ctx.bank)?;

            Ok((events, summary))
        });

        match settled {
            Ok((events, summary)) => {
                buffer.commit();

                response = response.add_events(events).add_event(summary)?;
            },
            Err(err) => {
                drop(buffer);

                #[cfg(feature = "tracing")]
                {
                    tracing::error!(
                        pool_id,
                        batch_index = batch.index,
                        fatal = err.is_fatal(),
                        error = %err,
                        "!!! BATCH HALTED !!!"
                    );
                }

                response = response.add_event(BatchHalted {
                    pool_id,
                    batch_index: batch.index,
                    reason: err.to_string(),
                })?;

                BATCHES.save(ctx.storage, pool_id, &Batch {
                    status: BatchStatus::Executing,
                    ..batch
                })?;
            },
        }
    }

    Ok(response)
}
