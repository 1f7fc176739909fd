//! An in-memory account ledger, used in place of the host chain's bank when
//! testing the liquidity module.
//!
//! The ledger keeps its balances in its own store, separate from the module's,
//! so that rolling back a pool's settlement never rolls back coin movements
//! and vice versa.

use {
    liquidity_storage::Map,
    liquidity_types::{
        Addr, Bank, Coin, Coins, Denom, IsZero, MockStorage, Number, Order, StdError, StdResult,
        Storage, Uint128,
    },
    std::collections::BTreeMap,
};

const BALANCES: Map<(Addr, &Denom), Uint128> = Map::new("balance");

const SUPPLIES: Map<&Denom, Uint128> = Map::new("supply");

#[derive(Default, Debug, Clone)]
pub struct MockBank {
    storage: MockStorage,
}

impl MockBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger with the given genesis balances. Supplies are the sums
    /// of the balances.
    pub fn with_balances<B>(initial_balances: B) -> StdResult<Self>
    where
        B: IntoIterator<Item = (Addr, Coins)>,
    {
        let mut bank = Self::new();

        for (address, coins) in initial_balances {
            for coin in coins {
                bank.mint(&address, &coin)?;
            }
        }

        Ok(bank)
    }

    /// All non-zero balances of an account.
    pub fn balances_of(&self, address: Addr) -> StdResult<Coins> {
        let mut coins = Coins::new();

        for record in BALANCES
            .prefix(address)
            .range(&self.storage, Order::Ascending)
        {
            let (denom, amount) = record?;
            coins.insert(Coin { denom, amount })?;
        }

        Ok(coins)
    }

    /// All supplies, keyed by denom.
    pub fn supplies(&self) -> StdResult<BTreeMap<Denom, Uint128>> {
        SUPPLIES
            .range(&self.storage, Order::Ascending)
            .collect()
    }
}

impl Bank for MockBank {
    fn balance(&self, address: &Addr, denom: &Denom) -> StdResult<Uint128> {
        BALANCES
            .may_load(&self.storage, (*address, denom))
            .map(Option::unwrap_or_default)
    }

    fn supply(&self, denom: &Denom) -> StdResult<Uint128> {
        SUPPLIES
            .may_load(&self.storage, denom)
            .map(Option::unwrap_or_default)
    }

    fn transfer(&mut self, from: &Addr, to: &Addr, coins: &Coins) -> StdResult<()> {
        // Check all balances before moving anything, so that a failed transfer
        // leaves the ledger untouched.
        for coin in coins {
            let balance = self.balance(from, coin.denom)?;
            if balance < *coin.amount {
                return Err(StdError::insufficient_balance(
                    from,
                    coin.denom,
                    balance,
                    coin.amount,
                ));
            }
        }

        for coin in coins {
            decrease_balance(&mut self.storage, *from, coin.denom, *coin.amount)?;
            increase_balance(&mut self.storage, *to, coin.denom, *coin.amount)?;
        }

        Ok(())
    }

    fn mint(&mut self, to: &Addr, coin: &Coin) -> StdResult<()> {
        increase_supply(&mut self.storage, &coin.denom, coin.amount)?;
        increase_balance(&mut self.storage, *to, &coin.denom, coin.amount)?;

        Ok(())
    }

    fn burn(&mut self, from: &Addr, coin: &Coin) -> StdResult<()> {
        let balance = self.balance(from, &coin.denom)?;
        if balance < coin.amount {
            return Err(StdError::insufficient_balance(
                from,
                &coin.denom,
                balance,
                coin.amount,
            ));
        }

        decrease_supply(&mut self.storage, &coin.denom, coin.amount)?;
        decrease_balance(&mut self.storage, *from, &coin.denom, coin.amount)?;

        Ok(())
    }
}

/// Increase the total supply of a token by the given amount.
fn increase_supply(
    storage: &mut dyn Storage,
    denom: &Denom,
    amount: Uint128,
) -> StdResult<Option<Uint128>> {
    SUPPLIES.may_modify(storage, denom, |supply| {
        let supply = supply.unwrap_or_default().checked_add(amount)?;
        // Only write to storage if the supply is non-zero.
        if supply.is_zero() {
            Ok(None)
        } else {
            Ok(Some(supply))
        }
    })
}

/// Decrease the total supply of a token by the given amount.
fn decrease_supply(
    storage: &mut dyn Storage,
    denom: &Denom,
    amount: Uint128,
) -> StdResult<Option<Uint128>> {
    SUPPLIES.may_modify(storage, denom, |supply| {
        let supply = supply.unwrap_or_default().checked_sub(amount)?;
        // If supply is reduced to zero, delete it.
        if supply.is_zero() {
            Ok(None)
        } else {
            Ok(Some(supply))
        }
    })
}

fn increase_balance(
    storage: &mut dyn Storage,
    address: Addr,
    denom: &Denom,
    amount: Uint128,
) -> StdResult<Option<Uint128>> {
    BALANCES.may_modify(storage, (address, denom), |balance| {
        let balance = balance.unwrap_or_default().checked_add(amount)?;
        if balance.is_zero() {
            Ok(None)
        } else {
            Ok(Some(balance))
        }
    })
}

fn decrease_balance(
    storage: &mut dyn Storage,
    address: Addr,
    denom: &Denom,
    amount: Uint128,
) -> StdResult<Option<Uint128>> {
    BALANCES.may_modify(storage, (address, denom), |balance| {
        let balance = balance.unwrap_or_default().checked_sub(amount)?;
        if balance.is_zero() {
            Ok(None)
        } else {
            Ok(Some(balance))
        }
    })
}

// ----------------------------------- tests -----------------------------------
