use {
    crate::{
        LiquidityError, LiquidityResult, BATCHES, DEPOSIT_RESULTS, PENDING_DEPOSITS,
        PENDING_SWAPS, PENDING_WITHDRAWS, SWAP_RESULTS, WITHDRAW_RESULTS,
    },
    liquidity_storage::{Borsh, Codec, Map},
    liquidity_types::{
        amm::{
            Batch, BatchStatus, DepositRequest, PoolId, Request, RequestCanceled, RequestExpired,
            RequestId, RequestStatus, SwapRequest, WithdrawRequest,
        },
        Addr, Coins, EventBuilder, Order as IterationOrder, StdResult, Storage, TransferBuilder,
    },
};

/// Requests of a pool drained for execution, each kind in ascending id.
#[derive(Default, Debug)]
pub struct DrainedRequests {
    pub swaps: Vec<SwapRequest>,
    pub deposits: Vec<DepositRequest>,
    pub withdraws: Vec<WithdrawRequest>,
}

impl DrainedRequests {
    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty() && self.deposits.is_empty() && self.withdraws.is_empty()
    }
}

/// Find the batch that a new request to the pool joins.
///
/// If the pool has no batch yet, or its latest batch has executed, a new one
/// is opened at the current height.
pub fn batch_for_enqueue(
    storage: &mut dyn Storage,
    pool_id: PoolId,
    height: u64,
) -> LiquidityResult<Batch> {
    match BATCHES.may_load(storage, pool_id)? {
        Some(batch) if batch.status == BatchStatus::Open => Ok(batch),
        Some(batch) if batch.status == BatchStatus::Executing => {
            Err(LiquidityError::BatchClosed {
                pool_id,
                batch_index: batch.index,
            })
        },
        maybe_batch => {
            let index = maybe_batch.map_or(1, |batch| batch.index + 1);
            let batch = Batch::new(pool_id, index, height);

            BATCHES.save(storage, pool_id, &batch)?;

            Ok(batch)
        },
    }
}

pub fn enqueue_swap(storage: &mut dyn Storage, swap: &SwapRequest) -> LiquidityResult<()> {
    PENDING_SWAPS.save(storage, (swap.pool_id, swap.id), swap)?;
    Ok(())
}

pub fn enqueue_deposit(storage: &mut dyn Storage, deposit: &DepositRequest) -> LiquidityResult<()> {
    PENDING_DEPOSITS.save(storage, (deposit.pool_id, deposit.id), deposit)?;
    Ok(())
}

pub fn enqueue_withdraw(
    storage: &mut dyn Storage,
    withdraw: &WithdrawRequest,
) -> LiquidityResult<()> {
    PENDING_WITHDRAWS.save(storage, (withdraw.pool_id, withdraw.id), withdraw)?;
    Ok(())
}

/// Take all pending requests of the pool out of the queue. Requests enqueued
/// afterwards belong to the next batch.
pub fn drain_for_execution(
    storage: &mut dyn Storage,
    pool_id: PoolId,
) -> LiquidityResult<DrainedRequests> {
    Ok(DrainedRequests {
        swaps: drain(storage, &PENDING_SWAPS, pool_id)?,
        deposits: drain(storage, &PENDING_DEPOSITS, pool_id)?,
        withdraws: drain(storage, &PENDING_WITHDRAWS, pool_id)?,
    })
}

/// Pending requests of the pool of one kind, in ascending id.
pub fn pending<R>(
    storage: &dyn Storage,
    map: &Map<(PoolId, RequestId), R>,
    pool_id: PoolId,
) -> StdResult<Vec<R>>
where
    Borsh: Codec<R>,
{
    map.prefix(pool_id)
        .values(storage, IterationOrder::Ascending)
        .collect()
}

fn drain<R>(
    storage: &mut dyn Storage,
    map: &Map<(PoolId, RequestId), R>,
    pool_id: PoolId,
) -> LiquidityResult<Vec<R>>
where
    Borsh: Codec<R>,
{
    let requests = pending(storage, map, pool_id)?;

    map.prefix(pool_id).clear(storage);

    Ok(requests)
}

/// Withdraw a request from the queue on its owner's behalf. Its escrow is
/// returned in full; no fee is charged.
///
/// Requests of a batch that is executing can't be canceled.
pub fn cancel(
    storage: &mut dyn Storage,
    pool_id: PoolId,
    request_id: RequestId,
    sender: Addr,
) -> LiquidityResult<RequestCanceled> {
    if let Some(batch) = BATCHES.may_load(storage, pool_id)? {
        if batch.status == BatchStatus::Executing {
            return Err(LiquidityError::BatchClosed {
                pool_id,
                batch_index: batch.index,
            });
        }
    }

    let refund = if let Some(refund) =
        cancel_in(storage, &PENDING_SWAPS, &SWAP_RESULTS, pool_id, request_id, sender)?
    {
        refund
    } else if let Some(refund) =
        cancel_in(storage, &PENDING_DEPOSITS, &DEPOSIT_RESULTS, pool_id, request_id, sender)?
    {
        refund
    } else if let Some(refund) =
        cancel_in(storage, &PENDING_WITHDRAWS, &WITHDRAW_RESULTS, pool_id, request_id, sender)?
    {
        refund
    } else {
        return Err(LiquidityError::RequestNotFound {
            pool_id,
            request_id,
        });
    };

    Ok(RequestCanceled {
        pool_id,
        request_id,
        requester: sender,
        refund,
    })
}

fn cancel_in<R>(
    storage: &mut dyn Storage,
    pending: &Map<(PoolId, RequestId), R>,
    results: &Map<(PoolId, RequestId), R>,
    pool_id: PoolId,
    request_id: RequestId,
    sender: Addr,
) -> LiquidityResult<Option<Coins>>
where
    R: Request,
    Borsh: Codec<R>,
{
    let Some(mut request) = pending.may_load(storage, (pool_id, request_id))? else {
        return Ok(None);
    };

    if request.requester() != sender {
        return Err(LiquidityError::Unauthorized { request_id, sender });
    }

    request.refund_in_full(RequestStatus::FullyRefunded);

    pending.remove(storage, (pool_id, request_id));
    results.save(storage, (pool_id, request_id), &request)?;

    Ok(Some(request.escrowed()))
}

/// Refund every pending request of the pool that has waited for at least
/// `max_batch_age_blocks`. The refunds are added to `refunds`, to be paid from
/// the escrow.
pub fn expire_stale(
    storage: &mut dyn Storage,
    pool_id: PoolId,
    height: u64,
    max_batch_age_blocks: u64,
    refunds: &mut TransferBuilder,
) -> LiquidityResult<EventBuilder> {
    let mut events = EventBuilder::new();

    expire_in(
        storage,
        &PENDING_SWAPS,
        &SWAP_RESULTS,
        pool_id,
        height,
        max_batch_age_blocks,
        refunds,
        &mut events,
    )?;

    expire_in(
        storage,
        &PENDING_DEPOSITS,
        &DEPOSIT_RESULTS,
        pool_id,
        height,
        max_batch_age_blocks,
        refunds,
        &mut events,
    )?;

    expire_in(
        storage,
        &PENDING_WITHDRAWS,
        &WITHDRAW_RESULTS,
        pool_id,
        height,
        max_batch_age_blocks,
        refunds,
        &mut events,
    )?;

    Ok(events)
}

#[allow(clippy::too_many_arguments)]
fn expire_in<R>(
    storage: &mut dyn Storage,
    pending: &Map<(PoolId, RequestId), R>,
    results: &Map<(PoolId, RequestId), R>,
    pool_id: PoolId,
    height: u64,
    max_batch_age_blocks: u64,
    refunds: &mut TransferBuilder,
    events: &mut EventBuilder,
) -> LiquidityResult<()>
where
    R: Request,
    Borsh: Codec<R>,
{
    let stale = self::pending(storage, pending, pool_id)?
        .into_iter()
        .filter(|request| {
            height.saturating_sub(request.enqueued_height()) >= max_batch_age_blocks
        })
        .collect::<Vec<_>>();

    for mut request in stale {
        let request_id = request.id();
        let requester = request.requester();
        let refund = request.escrowed();

        #[cfg(feature = "tracing")]
        {
            tracing::warn!(
                pool_id,
                request_id,
                enqueued_height = request.enqueued_height(),
                "Request expired in the queue"
            );
        }

        request.refund_in_full(RequestStatus::ExpiredAndRefunded);

        pending.remove(storage, (pool_id, request_id));
        results.save(storage, (pool_id, request_id), &request)?;
        refunds.insert_many(requester, refund.clone())?;

        events.push(RequestExpired {
            pool_id,
            request_id,
            requester,
            refund,
        })?;
    }

    Ok(())
}

/// Remove the results of the pool's previous batch.
pub fn prune_results(storage: &mut dyn Storage, pool_id: PoolId) {
    SWAP_RESULTS.prefix(pool_id).clear(storage);
    DEPOSIT_RESULTS.prefix(pool_id).clear(storage);
    WITHDRAW_RESULTS.prefix(pool_id).clear(storage);
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        liquidity_types::{
            amm::Direction, Coin, Denom, MockStorage, NumberConst, Udec128, Uint128,
        },
        test_case::test_case,
    };

    const ALICE: Addr = Addr::mock(1);
    const BOB: Addr = Addr::mock(2);

    fn swap(id: RequestId, pool_id: PoolId, requester: Addr, enqueued_height: u64) -> SwapRequest {
        SwapRequest {
            id,
            pool_id,
            batch_index: 1,
            requester,
            direction: Direction::Ask,
            offer_coin: Coin::new("denomX", 1_000_u128).unwrap(),
            demand_coin_denom: Denom::new_unchecked("denomY"),
            order_price: Udec128::ONE,
            fee: Uint128::new(3),
            order_amount: Uint128::new(997),
            filled_amount: Uint128::ZERO,
            received_amount: Uint128::ZERO,
            refunded_amount: Uint128::ZERO,
            enqueued_height,
            status: RequestStatus::Pending,
        }
    }

    fn withdraw(id: RequestId, requester: Addr, enqueued_height: u64) -> WithdrawRequest {
        WithdrawRequest {
            id,
            pool_id: 1,
            batch_index: 1,
            requester,
            pool_coin: Coin::new("pool/1", 10_u128).unwrap(),
            withdrawn_coins: Coins::new(),
            fee_coins: Coins::new(),
            enqueued_height,
            status: RequestStatus::Pending,
        }
    }

    #[test]
    fn batches_open_and_close() {
        let mut storage = MockStorage::new();

        let first = batch_for_enqueue(&mut storage, 1, 10).unwrap();
        assert_eq!(first, Batch::new(1, 1, 10));

        // Joining an open batch doesn't move it.
        assert_eq!(batch_for_enqueue(&mut storage, 1, 11).unwrap(), first);

        BATCHES
            .save(&mut storage, 1, &Batch {
                status: BatchStatus::Executing,
                ..first.clone()
            })
            .unwrap();
        assert_eq!(
            batch_for_enqueue(&mut storage, 1, 12),
            Err(LiquidityError::BatchClosed {
                pool_id: 1,
                batch_index: 1
            })
        );

        BATCHES
            .save(&mut storage, 1, &Batch {
                status: BatchStatus::Executed,
                executed_height: Some(12),
                ..first
            })
            .unwrap();
        assert_eq!(batch_for_enqueue(&mut storage, 1, 13).unwrap(), Batch::new(1, 2, 13));
    }

    #[test]
    fn draining_is_per_pool_and_ordered() {
        let mut storage = MockStorage::new();
        for (id, pool_id) in [(3, 1), (1, 1), (2, 2), (5, 1)] {
            enqueue_swap(&mut storage, &swap(id, pool_id, ALICE, 1)).unwrap();
        }
        enqueue_withdraw(&mut storage, &withdraw(4, BOB, 1)).unwrap();

        let drained = drain_for_execution(&mut storage, 1).unwrap();
        assert_eq!(drained.swaps.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(drained.withdraws.len(), 1);
        assert!(drained.deposits.is_empty());

        assert!(drain_for_execution(&mut storage, 1).unwrap().is_empty());
        assert_eq!(pending(&storage, &PENDING_SWAPS, 2).unwrap().len(), 1);
    }

    #[test_case(1, ALICE => Ok(Coins::one("denomX", 1_000_u128).unwrap()); "owner")]
    #[test_case(1, BOB => Err(LiquidityError::Unauthorized { request_id: 1, sender: BOB }); "not owner")]
    #[test_case(9, ALICE => Err(LiquidityError::RequestNotFound { pool_id: 1, request_id: 9 }); "unknown")]
    fn canceling(request_id: RequestId, sender: Addr) -> LiquidityResult<Coins> {
        let mut storage = MockStorage::new();
        enqueue_swap(&mut storage, &swap(1, 1, ALICE, 1)).unwrap();

        let canceled = cancel(&mut storage, 1, request_id, sender)?;

        assert!(pending(&storage, &PENDING_SWAPS, 1).unwrap().is_empty());
        let result = SWAP_RESULTS.load(&storage, (1, request_id)).unwrap();
        assert_eq!(result.status, RequestStatus::FullyRefunded);
        assert_eq!(result.fee, Uint128::ZERO);

        Ok(canceled.refund)
    }

    #[test]
    fn expiring_old_requests() {
        let mut storage = MockStorage::new();
        enqueue_swap(&mut storage, &swap(1, 1, ALICE, 1)).unwrap();
        enqueue_swap(&mut storage, &swap(2, 1, BOB, 5)).unwrap();
        enqueue_withdraw(&mut storage, &withdraw(3, BOB, 2)).unwrap();

        let mut refunds = TransferBuilder::new(Addr::mock(9));
        let events = expire_stale(&mut storage, 1, 12, 10, &mut refunds).unwrap();

        assert_eq!(events.into_iter().count(), 2);
        assert_eq!(
            pending(&storage, &PENDING_SWAPS, 1).unwrap().iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![2]
        );
        assert!(pending(&storage, &PENDING_WITHDRAWS, 1).unwrap().is_empty());
        assert_eq!(
            SWAP_RESULTS.load(&storage, (1, 1)).unwrap().status,
            RequestStatus::ExpiredAndRefunded
        );

        let refunds = refunds.into_batch();
        assert_eq!(refunds[&ALICE], Coins::one("denomX", 1_000_u128).unwrap());
        assert_eq!(refunds[&BOB], Coins::one("pool/1", 10_u128).unwrap());
    }
}
