use {
    liquidity_engine::{LiquidityError, RESERVES},
    liquidity_testing::{
        coins, setup_test, setup_tracing_subscriber, ResultExt, TestSuite, CONTRACT, DENOM_X,
        DENOM_Y, DENOM_Z, GENESIS_BALANCE, INITIAL_RESERVE, OWNER, USERS,
    },
    liquidity_types::{
        amm::{
            pool_coin_denom, reserve_address, Batch, BatchExecuted, BatchHalted, BatchStatus,
            ExecuteMsg, Params, PoolId, PoolReserves, QueryMsg, RequestCanceled, RequestExpired,
            RequestStatus, SwapRequest, SwapSubmitted,
        },
        Addr, Bank, Coin, Denom, IsZero, NumberConst, Response, Udec128, Uint128,
    },
};

fn ask(
    suite: &mut TestSuite,
    sender: Addr,
    pool_id: PoolId,
    amount: u128,
) -> anyhow::Result<Response> {
    Ok(suite.execute(sender, ExecuteMsg::Swap {
        pool_id,
        offer_coin: Coin::new(DENOM_X, amount)?,
        demand_coin_denom: Denom::new_unchecked(DENOM_Y),
        order_price: Udec128::new_percent(90),
    })?)
}

fn query_batch(suite: &TestSuite, pool_id: PoolId) -> Option<Batch> {
    suite.query(QueryMsg::Batch { pool_id }).should_succeed()
}

fn executed(response: &Response) -> Vec<BatchExecuted> {
    response
        .events_of(BatchExecuted::EVENT_NAME)
        .unwrap()
}

#[test]
fn batch_lifecycle() {
    let (mut suite, pool_id) = setup_test(Params::default());

    // No batch until the first request arrives.
    assert_eq!(query_batch(&suite, pool_id), None);

    ask(&mut suite, USERS[0], pool_id, 1_000).should_succeed();

    assert_eq!(query_batch(&suite, pool_id), Some(Batch::new(pool_id, 1, 1)));

    let response = suite.end_block().should_succeed();
    assert_eq!(executed(&response).len(), 1);

    assert_eq!(
        query_batch(&suite, pool_id),
        Some(Batch {
            status: BatchStatus::Executed,
            executed_height: Some(1),
            ..Batch::new(pool_id, 1, 1)
        })
    );

    // Nothing to do for an executed batch.
    let response = suite.end_block().should_succeed();
    assert!(response.events.is_empty());

    // The next request opens the next batch.
    ask(&mut suite, USERS[0], pool_id, 1_000).should_succeed();
    assert_eq!(query_batch(&suite, pool_id), Some(Batch::new(pool_id, 2, 3)));

    // The previous batch's results stay queryable until the next one executes.
    suite
        .query::<SwapRequest>(QueryMsg::SwapRequest {
            pool_id,
            request_id: 1,
        })
        .should_succeed_and(|swap| swap.status == RequestStatus::Completed);

    suite.end_block().should_succeed();

    suite
        .query::<SwapRequest>(QueryMsg::SwapRequest {
            pool_id,
            request_id: 1,
        })
        .should_fail_with_error(LiquidityError::RequestNotFound {
            pool_id,
            request_id: 1,
        });
}

#[test]
fn batches_span_unit_batch_height() {
    let (mut suite, pool_id) = setup_test(Params {
        unit_batch_height: 3,
        ..Default::default()
    });

    ask(&mut suite, USERS[0], pool_id, 1_000).should_succeed();
    assert!(executed(&suite.end_block().should_succeed()).is_empty());

    // Joins the batch opened at height 1.
    ask(&mut suite, USERS[1], pool_id, 2_000)
        .should_succeed()
        .events_of::<SwapSubmitted>(SwapSubmitted::EVENT_NAME)
        .should_succeed_and(|submitted| submitted[0].batch_index == 1);
    assert!(executed(&suite.end_block().should_succeed()).is_empty());

    // Both asks are absorbed by the pool, fee deducted.
    let response = suite.end_block().should_succeed();
    assert_eq!(executed(&response), vec![BatchExecuted {
        pool_id,
        batch_index: 1,
        clearing_price: Some(Udec128::ONE),
        matched_volume: Uint128::new(2_991),
        swaps: 2,
        deposits: 0,
        withdraws: 0,
    }]);

    assert_eq!(
        query_batch(&suite, pool_id).map(|batch| batch.executed_height),
        Some(Some(3))
    );
}

#[test]
fn pools_execute_in_order() {
    let (mut suite, pool_id) = setup_test(Params::default());
    let other_pool_id = suite
        .create_pool(OWNER, 1, (DENOM_X, INITIAL_RESERVE), (DENOM_Z, INITIAL_RESERVE))
        .should_succeed();

    suite
        .execute(USERS[0], ExecuteMsg::Swap {
            pool_id: other_pool_id,
            offer_coin: Coin::new(DENOM_Z, 1_000_u128).unwrap(),
            demand_coin_denom: Denom::new_unchecked(DENOM_X),
            order_price: Udec128::ONE,
        })
        .should_succeed();
    ask(&mut suite, USERS[1], pool_id, 1_000).should_succeed();

    let response = suite.end_block().should_succeed();

    assert!(executed(&response)
        .iter()
        .map(|summary| summary.pool_id)
        .eq([pool_id, other_pool_id]));
}

// The module account no longer holds the first pool's escrow, so its coins
// can't move. That pool halts with nothing written or paid; the next one
// settles as usual.
#[test]
fn unfunded_settlement_halts_only_its_pool() {
    let (mut suite, pool_id) = setup_test(Params::default());
    let other_pool_id = suite
        .create_pool(OWNER, 1, (DENOM_X, INITIAL_RESERVE), (DENOM_Z, INITIAL_RESERVE))
        .should_succeed();

    suite
        .execute(USERS[0], ExecuteMsg::Swap {
            pool_id,
            offer_coin: Coin::new(DENOM_Y, 1_000_u128).unwrap(),
            demand_coin_denom: Denom::new_unchecked(DENOM_X),
            order_price: Udec128::new_percent(110),
        })
        .should_succeed();
    suite
        .execute(USERS[1], ExecuteMsg::Swap {
            pool_id: other_pool_id,
            offer_coin: Coin::new(DENOM_Z, 1_000_u128).unwrap(),
            demand_coin_denom: Denom::new_unchecked(DENOM_X),
            order_price: Udec128::ONE,
        })
        .should_succeed();

    suite
        .bank
        .transfer(&CONTRACT, &OWNER, &coins([(DENOM_Y, 1_000)]))
        .unwrap();

    let reserves = suite.query_reserves(pool_id).unwrap();
    let response = suite.end_block().should_succeed();

    let halted = response
        .events_of::<BatchHalted>(BatchHalted::EVENT_NAME)
        .unwrap();
    assert_eq!(halted.len(), 1);
    assert_eq!(halted[0].pool_id, pool_id);
    assert!(halted[0].reason.contains("insufficient balance"));

    assert!(executed(&response)
        .iter()
        .map(|summary| summary.pool_id)
        .eq([other_pool_id]));

    assert_eq!(query_batch(&suite, pool_id).unwrap().status, BatchStatus::Executing);
    assert_eq!(suite.query_reserves(pool_id).unwrap(), reserves);
    assert_eq!(
        suite.balance(reserve_address(pool_id), DENOM_X),
        Uint128::new(INITIAL_RESERVE)
    );
    assert_eq!(suite.balance(USERS[0], DENOM_X), Uint128::new(GENESIS_BALANCE));
}

#[test]
fn canceling_requests() {
    let (mut suite, pool_id) = setup_test(Params::default());

    ask(&mut suite, USERS[0], pool_id, 1_000).should_succeed();
    suite
        .execute(USERS[1], ExecuteMsg::Deposit {
            pool_id,
            deposit_coins: coins([(DENOM_X, 10_000_000), (DENOM_Y, 10_000_000)]),
        })
        .should_succeed();

    suite
        .execute(USERS[1], ExecuteMsg::Cancel {
            pool_id,
            request_id: 1,
        })
        .should_fail_with_error(LiquidityError::Unauthorized {
            request_id: 1,
            sender: USERS[1],
        });

    suite
        .execute(USERS[0], ExecuteMsg::Cancel {
            pool_id,
            request_id: 9,
        })
        .should_fail_with_error(LiquidityError::RequestNotFound {
            pool_id,
            request_id: 9,
        });

    // The fee is returned along with the rest of the offer.
    let response = suite
        .execute(USERS[0], ExecuteMsg::Cancel {
            pool_id,
            request_id: 1,
        })
        .should_succeed();

    assert_eq!(
        response
            .events_of::<RequestCanceled>(RequestCanceled::EVENT_NAME)
            .unwrap(),
        vec![RequestCanceled {
            pool_id,
            request_id: 1,
            requester: USERS[0],
            refund: coins([(DENOM_X, 1_000)]),
        }]
    );
    assert_eq!(suite.balance(USERS[0], DENOM_X), Uint128::new(GENESIS_BALANCE));

    suite
        .query::<SwapRequest>(QueryMsg::SwapRequest {
            pool_id,
            request_id: 1,
        })
        .should_succeed_and(|swap| {
            swap.status == RequestStatus::FullyRefunded
                && swap.refunded_amount == Uint128::new(1_000)
                && swap.fee.is_zero()
        });

    // Already canceled.
    suite
        .execute(USERS[0], ExecuteMsg::Cancel {
            pool_id,
            request_id: 1,
        })
        .should_fail_with_error(LiquidityError::RequestNotFound {
            pool_id,
            request_id: 1,
        });

    suite
        .execute(USERS[1], ExecuteMsg::Cancel {
            pool_id,
            request_id: 2,
        })
        .should_succeed();
    assert_eq!(suite.balance(USERS[1], DENOM_X), Uint128::new(GENESIS_BALANCE));
    assert_eq!(suite.balance(USERS[1], DENOM_Y), Uint128::new(GENESIS_BALANCE));

    // The batch executes with nothing in it.
    let response = suite.end_block().should_succeed();
    assert_eq!(executed(&response)[0].swaps + executed(&response)[0].deposits, 0);

    suite
        .query_reserves(pool_id)
        .should_succeed_and_equal(PoolReserves {
            amount_a: Uint128::new(INITIAL_RESERVE),
            amount_b: Uint128::new(INITIAL_RESERVE),
            pool_coin_supply: Uint128::new(1_000_000),
        });
    assert!(suite.bank.balances_of(CONTRACT).unwrap().is_empty());
}

// The pool's records claim half the pool coins that are in circulation, so
// the owner's withdrawal can't be paid out of the reserves.
#[test]
fn inconsistent_pool_halts_until_requests_expire() {
    setup_tracing_subscriber(tracing::Level::WARN);

    let (mut suite, pool_id) = setup_test(Params {
        max_batch_age_blocks: 5,
        ..Default::default()
    });

    RESERVES
        .save(&mut suite.storage, pool_id, &PoolReserves {
            amount_a: Uint128::new(INITIAL_RESERVE),
            amount_b: Uint128::new(INITIAL_RESERVE),
            pool_coin_supply: Uint128::new(500_000),
        })
        .unwrap();

    ask(&mut suite, USERS[0], pool_id, 1_000).should_succeed();
    suite
        .execute(OWNER, ExecuteMsg::Withdraw {
            pool_id,
            pool_coin: Coin {
                denom: pool_coin_denom(pool_id),
                amount: Uint128::new(1_000_000),
            },
        })
        .should_succeed();

    let response = suite.end_block().should_succeed();

    assert!(executed(&response).is_empty());
    assert_eq!(
        response
            .events_of::<BatchHalted>(BatchHalted::EVENT_NAME)
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        query_batch(&suite, pool_id).map(|batch| batch.status),
        Some(BatchStatus::Executing)
    );

    // None of the batch's writes made it, including the swap's.
    suite
        .query::<Vec<SwapRequest>>(QueryMsg::PendingSwaps { pool_id })
        .should_succeed_and(|swaps| swaps.len() == 1);
    assert_eq!(suite.balance(CONTRACT, DENOM_X), Uint128::new(1_000));

    // The pool takes no requests while halted.
    ask(&mut suite, USERS[1], pool_id, 1_000).should_fail_with_error(
        LiquidityError::BatchClosed {
            pool_id,
            batch_index: 1,
        },
    );
    suite
        .execute(USERS[0], ExecuteMsg::Cancel {
            pool_id,
            request_id: 1,
        })
        .should_fail_with_error(LiquidityError::BatchClosed {
            pool_id,
            batch_index: 1,
        });

    // Retried, and halted again, every block.
    for _ in 2..6 {
        suite
            .end_block()
            .should_succeed()
            .events_of::<BatchHalted>(BatchHalted::EVENT_NAME)
            .should_succeed_and(|halted| halted.len() == 1);
    }

    // At height 6 both requests have waited 5 blocks. With them refunded, the
    // batch executes empty.
    let response = suite.end_block().should_succeed();

    assert_eq!(
        response
            .events_of::<RequestExpired>(RequestExpired::EVENT_NAME)
            .unwrap()
            .len(),
        2
    );
    assert_eq!(executed(&response).len(), 1);
    assert_eq!(
        query_batch(&suite, pool_id).map(|batch| batch.status),
        Some(BatchStatus::Executed)
    );

    // The swap fee is refunded as well.
    assert_eq!(suite.balance(USERS[0], DENOM_X), Uint128::new(GENESIS_BALANCE));
    assert_eq!(
        suite.balance(OWNER, pool_coin_denom(pool_id).as_str()),
        Uint128::new(1_000_000)
    );
    assert!(suite.bank.balances_of(CONTRACT).unwrap().is_empty());

    suite
        .query::<SwapRequest>(QueryMsg::SwapRequest {
            pool_id,
            request_id: 1,
        })
        .should_succeed_and(|swap| swap.status == RequestStatus::ExpiredAndRefunded);

    // Back in business.
    ask(&mut suite, USERS[1], pool_id, 1_000).should_succeed();
    assert_eq!(query_batch(&suite, pool_id).map(|batch| batch.index), Some(2));
}

#[test]
fn execution_is_deterministic() {
    fn run() -> (Vec<Response>, PoolReserves) {
        let (mut suite, pool_id) = setup_test(Params::default());
        let mut responses = vec![];

        for (i, user) in USERS.iter().enumerate() {
            let amount = 1_000 * (i as u128 + 1);
            let msg = if i % 2 == 0 {
                ExecuteMsg::Swap {
                    pool_id,
                    offer_coin: Coin::new(DENOM_X, amount).unwrap(),
                    demand_coin_denom: Denom::new_unchecked(DENOM_Y),
                    order_price: Udec128::new_percent(95 + i as u128),
                }
            } else {
                ExecuteMsg::Swap {
                    pool_id,
                    offer_coin: Coin::new(DENOM_Y, amount).unwrap(),
                    demand_coin_denom: Denom::new_unchecked(DENOM_X),
                    order_price: Udec128::new_percent(105 - i as u128),
                }
            };

            responses.push(suite.execute(*user, msg).unwrap());
        }

        responses.push(suite.end_block().unwrap());

        (responses, suite.query_reserves(pool_id).unwrap())
    }

    assert_eq!(run(), run());
}
