use {
    liquidity_engine::{execute, execute_batches, instantiate, query, query_raw, LiquidityResult},
    liquidity_mock_bank::MockBank,
    liquidity_types::{
        amm::{
            ExecuteMsg, InstantiateMsg, Params, PoolCreated, PoolId, PoolReserves, PoolTypeId,
            QueryMsg,
        },
        Addr, Bank, BlockInfo, Coin, Coins, Denom, ImmutableCtx, Json, JsonDeExt, MockStorage,
        MutableCtx, Response, SudoCtx, Uint128,
    },
    serde::de::DeserializeOwned,
    std::iter,
};

/// The module's own account, holding the escrow of queued requests.
pub const CONTRACT: Addr = Addr::mock(0);

pub const OWNER: Addr = Addr::mock(1);

pub const USERS: [Addr; 9] = [
    Addr::mock(2),
    Addr::mock(3),
    Addr::mock(4),
    Addr::mock(5),
    Addr::mock(6),
    Addr::mock(7),
    Addr::mock(8),
    Addr::mock(9),
    Addr::mock(10),
];

pub const DENOM_X: &str = "denomX";

pub const DENOM_Y: &str = "denomY";

pub const DENOM_Z: &str = "denomZ";

/// Genesis balance of each denom held by the owner and every user.
pub const GENESIS_BALANCE: u128 = 10_000_000_000;

pub const INITIAL_RESERVE: u128 = 1_000_000_000;

/// A suite where the owner has created a pool of X and Y with
/// `INITIAL_RESERVE` of each, using pool type 1.
pub fn setup_test(params: Params) -> (TestSuite, PoolId) {
    let balances = iter::once(OWNER).chain(USERS).map(|address| {
        (
            address,
            coins([
                (DENOM_X, GENESIS_BALANCE),
                (DENOM_Y, GENESIS_BALANCE),
                (DENOM_Z, GENESIS_BALANCE),
            ]),
        )
    });

    let mut suite = TestSuite::new(params, balances).unwrap();
    let pool_id = suite
        .create_pool(OWNER, 1, (DENOM_X, INITIAL_RESERVE), (DENOM_Y, INITIAL_RESERVE))
        .unwrap();

    (suite, pool_id)
}

/// Drives the module the way the host chain would: user messages are executed
/// at the current height, then `end_block` executes due batches and advances
/// to the next height.
pub struct TestSuite {
    pub storage: MockStorage,
    pub bank: MockBank,
    pub block: BlockInfo,
}

impl TestSuite {
    /// Instantiate the module at height 1 with the given params and genesis
    /// balances.
    pub fn new<B>(params: Params, balances: B) -> anyhow::Result<Self>
    where
        B: IntoIterator<Item = (Addr, Coins)>,
    {
        let mut suite = Self {
            storage: MockStorage::new(),
            bank: MockBank::with_balances(balances)?,
            block: BlockInfo { height: 1 },
        };

        instantiate(suite.mutable_ctx(CONTRACT), InstantiateMsg { params })?;

        Ok(suite)
    }

    pub fn execute(&mut self, sender: Addr, msg: ExecuteMsg) -> LiquidityResult<Response> {
        execute(self.mutable_ctx(sender), msg)
    }

    /// Execute due batches at the current height, then move to the next one.
    pub fn end_block(&mut self) -> LiquidityResult<Response> {
        let result = execute_batches(SudoCtx {
            storage: &mut self.storage,
            bank: &mut self.bank,
            block: self.block,
            contract: CONTRACT,
        });

        self.block.height += 1;

        result
    }

    pub fn query<R>(&self, msg: QueryMsg) -> anyhow::Result<R>
    where
        R: DeserializeOwned,
    {
        let json = query(self.immutable_ctx(), msg)?;

        Ok(json.deserialize_json()?)
    }

    pub fn query_raw(&self, msg: &[u8]) -> LiquidityResult<Json> {
        query_raw(self.immutable_ctx(), msg)
    }

    pub fn query_reserves(&self, pool_id: PoolId) -> anyhow::Result<PoolReserves> {
        self.query(QueryMsg::Reserves { pool_id })
    }

    pub fn balance(&self, address: Addr, denom: &str) -> Uint128 {
        self.bank
            .balance(&address, &Denom::new_unchecked(denom))
            .unwrap()
    }

    /// Create a pool of the given pool type, returning its id.
    pub fn create_pool(
        &mut self,
        creator: Addr,
        pool_type_id: PoolTypeId,
        coin_a: (&str, u128),
        coin_b: (&str, u128),
    ) -> anyhow::Result<PoolId> {
        let response = self.execute(creator, ExecuteMsg::CreatePool {
            pool_type_id,
            deposit_coins: [Coin::new(coin_a.0, coin_a.1)?, Coin::new(coin_b.0, coin_b.1)?],
        })?;

        response
            .events_of::<PoolCreated>(PoolCreated::EVENT_NAME)?
            .first()
            .map(|created| created.pool_id)
            .ok_or_else(|| anyhow::anyhow!("no `PoolCreated` event emitted"))
    }

    fn mutable_ctx(&mut self, sender: Addr) -> MutableCtx<'_> {
        MutableCtx {
            storage: &mut self.storage,
            bank: &mut self.bank,
            block: self.block,
            contract: CONTRACT,
            sender,
        }
    }

    fn immutable_ctx(&self) -> ImmutableCtx<'_> {
        ImmutableCtx {
            storage: &self.storage,
            bank: &self.bank,
            block: self.block,
            contract: CONTRACT,
        }
    }
}

/// Build a `Coins` from denom-amount pairs.
pub fn coins<const N: usize>(pairs: [(&str, u128); N]) -> Coins {
    let mut coins = Coins::new();

    for (denom, amount) in pairs {
        coins.insert(Coin::new(denom, amount).unwrap()).unwrap();
    }

    coins
}
