use {
    crate::{Addr, Coin, Coins, Denom, StdResult},
    liquidity_math::Uint128,
    std::collections::BTreeMap,
};

/// The account ledger the module relies on for custody of coins.
///
/// Every method operates on committed state as of the current block and is
/// synchronous.
pub trait Bank {
    fn balance(&self, address: &Addr, denom: &Denom) -> StdResult<Uint128>;

    fn supply(&self, denom: &Denom) -> StdResult<Uint128>;

    fn transfer(&mut self, from: &Addr, to: &Addr, coins: &Coins) -> StdResult<()>;

    fn mint(&mut self, to: &Addr, coin: &Coin) -> StdResult<()>;

    fn burn(&mut self, from: &Addr, coin: &Coin) -> StdResult<()>;
}

/// Aggregates many outgoing transfers from a single sender, so that each
/// recipient is paid with one ledger call.
#[derive(Debug, Clone)]
pub struct TransferBuilder {
    from: Addr,
    batch: BTreeMap<Addr, Coins>,
}

impl TransferBuilder {
    pub fn new(from: Addr) -> Self {
        Self {
            from,
            batch: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, address: Addr, denom: Denom, amount: Uint128) -> StdResult<()> {
        self.batch
            .entry(address)
            .or_default()
            .insert(Coin { denom, amount })
            .map(|_| ())
    }

    pub fn insert_many(&mut self, address: Addr, coins: Coins) -> StdResult<()> {
        let entry = self.batch.entry(address).or_default();

        for coin in coins {
            entry.insert(coin)?;
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.batch.values().all(Coins::is_empty)
    }

    /// Sum of all transfers, by denom.
    pub fn total(&self) -> StdResult<Coins> {
        let mut total = Coins::new();

        for coins in self.batch.values() {
            for coin in coins {
                total.insert(Coin {
                    denom: coin.denom.clone(),
                    amount: *coin.amount,
                })?;
            }
        }

        Ok(total)
    }

    pub fn into_batch(self) -> BTreeMap<Addr, Coins> {
        self.batch
    }

    /// Execute the transfers in ascending recipient address order.
    pub fn execute(self, bank: &mut dyn Bank) -> StdResult<()> {
        for (to, coins) in self.batch {
            if !coins.is_empty() {
                bank.transfer(&self.from, &to, &coins)?;
            }
        }

        Ok(())
    }
}
