use {
    crate::{
        core::{compute_deposit, compute_withdraw, match_orders, Order},
        queue::drain_for_execution,
        reserve::{apply_reserve_delta, query_reserves},
        LiquidityResult, ReserveDelta, BATCHES, DEPOSIT_RESULTS, SWAP_RESULTS, WITHDRAW_RESULTS,
    },
    itertools::Itertools,
    liquidity_types::{
        amm::{
            Batch, BatchExecuted, BatchStatus, DepositRequest, DepositSettled, Direction, Params,
            Pool, PoolReserves, Request, RequestStatus, SwapRequest, SwapSettled,
            WithdrawRequest, WithdrawSettled,
        },
        Addr, Bank, Coin, Coins, EventBuilder, IsZero, Number, NumberConst, StdError, StdResult,
        Storage, TransferBuilder, Uint128,
    },
    std::collections::BTreeMap,
};

/// Coin movements of a settled batch. They are executed only after the
/// batch's state changes have been committed.
#[derive(Debug)]
pub struct BankOps {
    contract: Addr,
    reserve: Addr,
    /// Consumed escrow and fees, moved from the module account to the pool's
    /// reserve account.
    into_reserve: Coins,
    /// Escrowed pool coins of executed withdrawals.
    burns: Coins,
    /// Paid from the reserve account.
    payouts: TransferBuilder,
    /// Paid from the module account.
    refunds: TransferBuilder,
    mints: BTreeMap<Addr, Coins>,
}

impl BankOps {
    pub fn new(contract: Addr, reserve: Addr) -> Self {
        Self {
            contract,
            reserve,
            into_reserve: Coins::new(),
            burns: Coins::new(),
            payouts: TransferBuilder::new(reserve),
            refunds: TransferBuilder::new(contract),
            mints: BTreeMap::new(),
        }
    }

    /// Check that the module and reserve accounts cover every outgoing
    /// movement, so that `execute` can't run out of funds halfway.
    pub fn ensure_funded(&self, bank: &dyn Bank) -> StdResult<()> {
        let mut from_contract = self.refunds.total()?;
        for coins in [&self.into_reserve, &self.burns] {
            add_coins(&mut from_contract, coins)?;
        }

        ensure_covers(bank, &self.contract, &Coins::new(), &from_contract)?;
        ensure_covers(bank, &self.reserve, &self.into_reserve, &self.payouts.total()?)
    }

    /// Fund the reserve first, so that it can make the payouts.
    pub fn execute(self, bank: &mut dyn Bank) -> StdResult<()> {
        if !self.into_reserve.is_empty() {
            bank.transfer(&self.contract, &self.reserve, &self.into_reserve)?;
        }

        for coin in self.burns {
            bank.burn(&self.contract, &coin)?;
        }

        self.payouts.execute(bank)?;
        self.refunds.execute(bank)?;

        for (to, coins) in self.mints {
            for coin in coins {
                bank.mint(&to, &coin)?;
            }
        }

        Ok(())
    }

    pub fn into_reserve(&self) -> &Coins {
        &self.into_reserve
    }

    pub fn burns(&self) -> &Coins {
        &self.burns
    }

    pub fn payouts(&self) -> &TransferBuilder {
        &self.payouts
    }

    pub fn refunds(&self) -> &TransferBuilder {
        &self.refunds
    }
}

fn add_coins(total: &mut Coins, coins: &Coins) -> StdResult<()> {
    for coin in coins {
        total.insert(Coin {
            denom: coin.denom.clone(),
            amount: *coin.amount,
        })?;
    }

    Ok(())
}

/// `incoming` counts toward the balance; it arrives before anything leaves.
fn ensure_covers(
    bank: &dyn Bank,
    address: &Addr,
    incoming: &Coins,
    outgoing: &Coins,
) -> StdResult<()> {
    for coin in outgoing {
        let available = bank
            .balance(address, coin.denom)?
            .checked_add(incoming.amount_of(coin.denom))?;

        if available < *coin.amount {
            return Err(StdError::insufficient_balance(
                address,
                coin.denom,
                available,
                coin.amount,
            ));
        }
    }

    Ok(())
}

pub struct Settlement {
    pub bank_ops: BankOps,
    pub events: EventBuilder,
    pub summary: BatchExecuted,
    pub reserves: PoolReserves,
}

/// Execute a pool's batch: drain its queue, match the swaps and settle them
/// against the pool, then process deposits and withdrawals at the resulting
/// reserves.
///
/// Deposits and withdrawals are priced against the running reserves, but the
/// batch's reserve changes reach the ledger in one delta, checked against the
/// post-batch totals.
///
/// State changes are written to `storage` as they're made; on error, the
/// caller is expected to discard them. Coins don't move until the caller
/// executes the returned `BankOps`.
pub fn settle_batch(
    storage: &mut dyn Storage,
    params: &Params,
    pool: &Pool,
    mut batch: Batch,
    height: u64,
    contract: Addr,
) -> LiquidityResult<Settlement> {
    let requests = drain_for_execution(storage, pool.id)?;
    let mut ops = BankOps::new(contract, pool.reserve_account_address);
    let mut events = EventBuilder::new();

    let swaps = requests.swaps.len() as u32;
    let deposits = requests.deposits.len() as u32;
    let withdraws = requests.withdraws.len() as u32;

    // ----------------------------- 1. swaps ------------------------------

    let pre_batch = query_reserves(storage, pool.id)?;
    let orders = requests.swaps.iter().map(Order::from).collect_vec();
    let outcome = match_orders(
        &pre_batch,
        params.max_price_impact_for(pool.pool_type_id),
        &orders,
    )?;

    let mut batch_delta = ReserveDelta::default();

    for (mut swap, fill) in requests.swaps.into_iter().zip(outcome.fills) {
        swap.filled_amount = fill.filled;
        swap.received_amount = fill.received;
        swap.refunded_amount = fill.refunded;
        swap.status = fill.status;

        // The fee goes to the pool whether or not the swap matched.
        let into_reserve = fill.filled.checked_add(swap.fee)?;

        match swap.direction {
            Direction::Ask => {
                batch_delta.add_a.checked_add_assign(into_reserve)?;
                batch_delta.sub_b.checked_add_assign(fill.received)?;
            },
            Direction::Bid => {
                batch_delta.add_b.checked_add_assign(into_reserve)?;
                batch_delta.sub_a.checked_add_assign(fill.received)?;
            },
        }

        settle_swap(&mut ops, &swap, into_reserve)?;

        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                pool_id = pool.id,
                request_id = swap.id,
                direction = %swap.direction,
                filled = %swap.filled_amount,
                received = %swap.received_amount,
                refunded = %swap.refunded_amount,
                status = %swap.status,
                "Settled swap"
            );
        }

        events.push(SwapSettled {
            pool_id: pool.id,
            batch_index: batch.index,
            request_id: swap.id,
            requester: swap.requester,
            direction: swap.direction,
            clearing_price: outcome.clearing_price,
            filled: swap.filled_amount,
            received: swap.received_amount,
            refunded: swap.refunded_amount,
            fee: swap.fee,
            status: swap.status,
        })?;

        SWAP_RESULTS.save(storage, (pool.id, swap.id), &swap)?;
    }

    let mut reserves = batch_delta.project(pool.id, &pre_batch)?;

    // ------------------------ 2. deposits, withdraws ------------------------

    for mut deposit in requests.deposits {
        let delta = settle_deposit(&mut ops, params, pool, &reserves, &mut deposit)?;
        reserves = delta.project(pool.id, &reserves)?;
        batch_delta.merge(&delta)?;

        events.push(DepositSettled {
            pool_id: pool.id,
            batch_index: batch.index,
            request_id: deposit.id,
            requester: deposit.requester,
            minted_pool_coin: deposit.minted_pool_coin,
            refund: deposit.refunded_coins.clone(),
            status: deposit.status,
        })?;

        DEPOSIT_RESULTS.save(storage, (pool.id, deposit.id), &deposit)?;
    }

    for mut withdraw in requests.withdraws {
        let delta = settle_withdraw(&mut ops, params, pool, &reserves, &mut withdraw)?;
        reserves = delta.project(pool.id, &reserves)?;
        batch_delta.merge(&delta)?;

        events.push(WithdrawSettled {
            pool_id: pool.id,
            batch_index: batch.index,
            request_id: withdraw.id,
            requester: withdraw.requester,
            burned_pool_coin: if withdraw.status == RequestStatus::Completed {
                withdraw.pool_coin.amount
            } else {
                Uint128::ZERO
            },
            withdrawn: withdraw.withdrawn_coins.clone(),
            fee: withdraw.fee_coins.clone(),
            status: withdraw.status,
        })?;

        WITHDRAW_RESULTS.save(storage, (pool.id, withdraw.id), &withdraw)?;
    }

    let reserves = apply_reserve_delta(storage, pool.id, &batch_delta)?;

    // ------------------------------ 3. batch -------------------------------

    batch.status = BatchStatus::Executed;
    batch.executed_height = Some(height);

    BATCHES.save(storage, pool.id, &batch)?;

    let summary = BatchExecuted {
        pool_id: pool.id,
        batch_index: batch.index,
        clearing_price: outcome.clearing_price,
        matched_volume: outcome.matched_volume,
        swaps,
        deposits,
        withdraws,
    };

    #[cfg(feature = "tracing")]
    {
        tracing::info!(
            pool_id = pool.id,
            batch_index = batch.index,
            clearing_price = ?outcome.clearing_price,
            matched_volume = %outcome.matched_volume,
            swaps,
            deposits,
            withdraws,
            "Executed batch"
        );
    }

    Ok(Settlement {
        bank_ops: ops,
        events,
        summary,
        reserves,
    })
}

fn settle_swap(ops: &mut BankOps, swap: &SwapRequest, into_reserve: Uint128) -> StdResult<()> {
    ops.into_reserve.insert(Coin {
        denom: swap.offer_coin.denom.clone(),
        amount: into_reserve,
    })?;
    ops.payouts.insert(
        swap.requester,
        swap.demand_coin_denom.clone(),
        swap.received_amount,
    )?;
    ops.refunds.insert(
        swap.requester,
        swap.offer_coin.denom.clone(),
        swap.refunded_amount,
    )?;

    Ok(())
}

/// Settle a deposit at the current reserves, returning the change it makes to
/// them.
fn settle_deposit(
    ops: &mut BankOps,
    params: &Params,
    pool: &Pool,
    reserves: &PoolReserves,
    deposit: &mut DepositRequest,
) -> LiquidityResult<ReserveDelta> {
    let amount_a = deposit.deposit_coins.amount_of(pool.denom_a());
    let amount_b = deposit.deposit_coins.amount_of(pool.denom_b());

    let outcome = compute_deposit(
        reserves,
        amount_a,
        amount_b,
        params.initial_pool_coin_supply,
        params.min_init_deposit_amount,
    )?;

    if outcome.minted.is_zero() {
        deposit.refund_in_full(RequestStatus::FullyRefunded);
        ops.refunds
            .insert_many(deposit.requester, deposit.refunded_coins.clone())?;

        return Ok(ReserveDelta::default());
    }

    deposit.minted_pool_coin = outcome.minted;
    deposit.refunded_coins = pair_coins(
        pool,
        amount_a.checked_sub(outcome.used_a)?,
        amount_b.checked_sub(outcome.used_b)?,
    )?;
    deposit.status = RequestStatus::Completed;

    for coin in pair_coins(pool, outcome.used_a, outcome.used_b)? {
        ops.into_reserve.insert(coin)?;
    }

    ops.refunds
        .insert_many(deposit.requester, deposit.refunded_coins.clone())?;
    ops.mints
        .entry(deposit.requester)
        .or_default()
        .insert(Coin {
            denom: pool.pool_coin_denom.clone(),
            amount: outcome.minted,
        })?;

    Ok(outcome.delta())
}

/// Settle a withdrawal at the current reserves, returning the change it makes
/// to them.
fn settle_withdraw(
    ops: &mut BankOps,
    params: &Params,
    pool: &Pool,
    reserves: &PoolReserves,
    withdraw: &mut WithdrawRequest,
) -> LiquidityResult<ReserveDelta> {
    let outcome = compute_withdraw(reserves, withdraw.pool_coin.amount, params.withdraw_fee_rate)?;

    if outcome.is_empty() {
        withdraw.refund_in_full(RequestStatus::FullyRefunded);
        ops.refunds
            .insert_many(withdraw.requester, withdraw.escrowed())?;

        return Ok(ReserveDelta::default());
    }

    withdraw.withdrawn_coins = pair_coins(pool, outcome.withdrawn_a, outcome.withdrawn_b)?;
    withdraw.fee_coins = pair_coins(pool, outcome.fee_a, outcome.fee_b)?;
    withdraw.status = RequestStatus::Completed;

    ops.burns.insert(withdraw.pool_coin.clone())?;
    ops.payouts
        .insert_many(withdraw.requester, withdraw.withdrawn_coins.clone())?;

    Ok(outcome.delta(withdraw.pool_coin.amount))
}

fn pair_coins(pool: &Pool, amount_a: Uint128, amount_b: Uint128) -> StdResult<Coins> {
    let mut coins = Coins::new();

    coins.insert(Coin {
        denom: pool.denom_a().clone(),
        amount: amount_a,
    })?;
    coins.insert(Coin {
        denom: pool.denom_b().clone(),
        amount: amount_b,
    })?;

    Ok(coins)
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            queue::{enqueue_deposit, enqueue_swap, enqueue_withdraw},
            LiquidityError, POOLS, RESERVES,
        },
        liquidity_types::{
            amm::{RequestId, SwapRequest},
            Denom, MockStorage, Udec128,
        },
    };

    const ALICE: Addr = Addr::mock(1);
    const BOB: Addr = Addr::mock(2);
    const CONTRACT: Addr = Addr::mock(100);

    fn setup(a: u128, b: u128, supply: u128) -> (MockStorage, Pool, Batch) {
        let mut storage = MockStorage::new();
        let pool = Pool::new(
            1,
            1,
            Denom::new_unchecked("denomX"),
            Denom::new_unchecked("denomY"),
        );
        let batch = Batch::new(1, 1, 1);

        POOLS.save(&mut storage, 1, &pool).unwrap();
        RESERVES
            .save(&mut storage, 1, &PoolReserves {
                amount_a: Uint128::new(a),
                amount_b: Uint128::new(b),
                pool_coin_supply: Uint128::new(supply),
            })
            .unwrap();
        BATCHES.save(&mut storage, 1, &batch).unwrap();

        (storage, pool, batch)
    }

    fn params() -> Params {
        Params {
            swap_fee_rate: Udec128::new_permille(3),
            withdraw_fee_rate: Udec128::new_permille(3),
            max_price_impact: Udec128::new_percent(10),
            ..Default::default()
        }
    }

    fn swap(
        id: RequestId,
        requester: Addr,
        direction: Direction,
        offer: u128,
        fee: u128,
        price: Udec128,
    ) -> SwapRequest {
        let (offer_denom, demand_denom) = match direction {
            Direction::Ask => ("denomX", "denomY"),
            Direction::Bid => ("denomY", "denomX"),
        };

        SwapRequest {
            id,
            pool_id: 1,
            batch_index: 1,
            requester,
            direction,
            offer_coin: Coin::new(offer_denom, offer).unwrap(),
            demand_coin_denom: Denom::new_unchecked(demand_denom),
            order_price: price,
            fee: Uint128::new(fee),
            order_amount: Uint128::new(offer - fee),
            filled_amount: Uint128::ZERO,
            received_amount: Uint128::ZERO,
            refunded_amount: Uint128::ZERO,
            enqueued_height: 1,
            status: RequestStatus::Pending,
        }
    }

    fn coins<const N: usize>(coins: [(&str, u128); N]) -> Coins {
        let mut out = Coins::new();
        for (denom, amount) in coins {
            out.insert(Coin::new(denom, amount).unwrap()).unwrap();
        }
        out
    }

    #[test]
    fn crossing_swaps() {
        let (mut storage, pool, batch) = setup(1_000_000_000, 1_000_000_000, 1_000_000);
        enqueue_swap(
            &mut storage,
            &swap(1, ALICE, Direction::Ask, 1_000, 3, Udec128::new_percent(90)),
        )
        .unwrap();
        enqueue_swap(
            &mut storage,
            &swap(2, BOB, Direction::Bid, 900, 2, Udec128::new_percent(105)),
        )
        .unwrap();

        let settlement = settle_batch(&mut storage, &params(), &pool, batch, 3, CONTRACT).unwrap();

        assert_eq!(settlement.summary, BatchExecuted {
            pool_id: 1,
            batch_index: 1,
            clearing_price: Some(Udec128::ONE),
            matched_volume: Uint128::new(997),
            swaps: 2,
            deposits: 0,
            withdraws: 0,
        });

        // A: +997 sold + 3 fee - 898 bought; B: +898 paid + 2 fee - 997 bought.
        assert_eq!(settlement.reserves, PoolReserves {
            amount_a: Uint128::new(1_000_000_102),
            amount_b: Uint128::new(999_999_903),
            pool_coin_supply: Uint128::new(1_000_000),
        });
        assert_eq!(RESERVES.load(&storage, 1).unwrap(), settlement.reserves);

        let ops = settlement.bank_ops;
        assert_eq!(ops.into_reserve(), &coins([("denomX", 1_000), ("denomY", 900)]));
        assert_eq!(ops.payouts().clone().into_batch(), BTreeMap::from([
            (ALICE, coins([("denomY", 997)])),
            (BOB, coins([("denomX", 898)])),
        ]));
        assert!(ops.refunds().is_empty());

        let alice = SWAP_RESULTS.load(&storage, (1, 1)).unwrap();
        assert_eq!(alice.status, RequestStatus::Completed);
        assert_eq!(alice.filled_amount + alice.fee + alice.refunded_amount, Uint128::new(1_000));

        let batch = BATCHES.load(&storage, 1).unwrap();
        assert_eq!(batch.status, BatchStatus::Executed);
        assert_eq!(batch.executed_height, Some(3));
    }

    #[test]
    fn unmatched_swaps_still_pay_fees() {
        let (mut storage, pool, batch) = setup(1_000_000_000, 1_000_000_000, 1_000_000);
        enqueue_swap(
            &mut storage,
            &swap(1, ALICE, Direction::Ask, 1_000, 3, Udec128::new(2)),
        )
        .unwrap();

        let settlement = settle_batch(&mut storage, &params(), &pool, batch, 1, CONTRACT).unwrap();

        assert_eq!(settlement.summary.clearing_price, None);
        assert_eq!(settlement.reserves.amount_a, Uint128::new(1_000_000_003));
        assert_eq!(settlement.bank_ops.refunds().clone().into_batch(), BTreeMap::from([(
            ALICE,
            coins([("denomX", 997)])
        )]));

        let result = SWAP_RESULTS.load(&storage, (1, 1)).unwrap();
        assert_eq!(result.status, RequestStatus::FullyRefunded);
    }

    #[test]
    fn empty_batch_changes_nothing() {
        let (mut storage, pool, batch) = setup(1_000, 2_000, 100);

        let settlement = settle_batch(&mut storage, &params(), &pool, batch, 1, CONTRACT).unwrap();

        assert_eq!(settlement.reserves, RESERVES.load(&storage, 1).unwrap());
        assert_eq!(settlement.reserves.amount_a, Uint128::new(1_000));
        assert!(settlement.bank_ops.into_reserve().is_empty());
        assert!(settlement.events.is_empty());
    }

    // Deposits see the reserves left by the deposits before them, and
    // withdrawals those left by all deposits.
    #[test]
    fn deposits_then_withdrawals() {
        let (mut storage, pool, batch) = setup(1_000, 2_000, 100);
        enqueue_withdraw(&mut storage, &WithdrawRequest {
            id: 1,
            pool_id: 1,
            batch_index: 1,
            requester: BOB,
            pool_coin: Coin::new("pool/1", 11_u128).unwrap(),
            withdrawn_coins: Coins::new(),
            fee_coins: Coins::new(),
            enqueued_height: 1,
            status: RequestStatus::Pending,
        })
        .unwrap();
        enqueue_deposit(&mut storage, &DepositRequest {
            id: 2,
            pool_id: 1,
            batch_index: 1,
            requester: ALICE,
            deposit_coins: coins([("denomX", 100), ("denomY", 100)]),
            minted_pool_coin: Uint128::ZERO,
            refunded_coins: Coins::new(),
            enqueued_height: 1,
            status: RequestStatus::Pending,
        })
        .unwrap();

        let settlement = settle_batch(&mut storage, &params(), &pool, batch, 1, CONTRACT).unwrap();

        // Alice mints 5 for 50 + 100; Bob then takes 11/105 of (1050, 2100),
        // i.e. 110 and 220, less 0 and 0 in fees.
        let deposit = DEPOSIT_RESULTS.load(&storage, (1, 2)).unwrap();
        assert_eq!(deposit.minted_pool_coin, Uint128::new(5));
        assert_eq!(deposit.refunded_coins, coins([("denomX", 50)]));

        let withdraw = WITHDRAW_RESULTS.load(&storage, (1, 1)).unwrap();
        assert_eq!(withdraw.withdrawn_coins, coins([("denomX", 110), ("denomY", 220)]));
        assert_eq!(withdraw.status, RequestStatus::Completed);

        assert_eq!(settlement.reserves, PoolReserves {
            amount_a: Uint128::new(940),
            amount_b: Uint128::new(1_880),
            pool_coin_supply: Uint128::new(94),
        });

        let ops = settlement.bank_ops;
        assert_eq!(ops.burns(), &coins([("pool/1", 11)]));
        assert_eq!(ops.mints, BTreeMap::from([(ALICE, coins([("pool/1", 5)]))]));
    }

    #[test]
    fn unbacked_withdrawal_is_fatal() {
        let (mut storage, pool, batch) = setup(1_000, 2_000, 100);
        enqueue_withdraw(&mut storage, &WithdrawRequest {
            id: 1,
            pool_id: 1,
            batch_index: 1,
            requester: BOB,
            pool_coin: Coin::new("pool/1", 200_u128).unwrap(),
            withdrawn_coins: Coins::new(),
            fee_coins: Coins::new(),
            enqueued_height: 1,
            status: RequestStatus::Pending,
        })
        .unwrap();

        let err = settle_batch(&mut storage, &params(), &pool, batch, 1, CONTRACT)
            .err()
            .unwrap();

        assert!(matches!(err, LiquidityError::InsufficientReserves { pool_id: 1, .. }));
        assert!(err.is_fatal());
    }

    // The swap's fee would have been booked before the withdrawal failed if
    // swaps and liquidity changes reached the ledger separately.
    #[test]
    fn reserves_change_once_per_batch() {
        let (mut storage, pool, batch) = setup(1_000, 2_000, 100);
        enqueue_swap(
            &mut storage,
            &swap(1, ALICE, Direction::Ask, 100, 3, Udec128::new(5)),
        )
        .unwrap();
        enqueue_withdraw(&mut storage, &WithdrawRequest {
            id: 2,
            pool_id: 1,
            batch_index: 1,
            requester: BOB,
            pool_coin: Coin::new("pool/1", 200_u128).unwrap(),
            withdrawn_coins: Coins::new(),
            fee_coins: Coins::new(),
            enqueued_height: 1,
            status: RequestStatus::Pending,
        })
        .unwrap();

        assert!(matches!(
            settle_batch(&mut storage, &params(), &pool, batch, 1, CONTRACT),
            Err(LiquidityError::InsufficientReserves { pool_id: 1, .. })
        ));
        assert_eq!(RESERVES.load(&storage, 1).unwrap(), PoolReserves {
            amount_a: Uint128::new(1_000),
            amount_b: Uint128::new(2_000),
            pool_coin_supply: Uint128::new(100),
        });
    }
}
