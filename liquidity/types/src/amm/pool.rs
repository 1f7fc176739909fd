use {
    crate::{
        amm::{Direction, PoolId, PoolTypeId, POOL_COIN_NAMESPACE, RESERVE_ADDRESS_NAMESPACE},
        Addr, Denom,
    },
    borsh::{BorshDeserialize, BorshSerialize},
    liquidity_math::{MathResult, Udec128, Uint128},
    serde::{Deserialize, Serialize},
};

#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Pool {
    pub id: PoolId,
    pub pool_type_id: PoolTypeId,
    /// The two reserve coin denoms, in ascending order.
    pub reserve_coin_denoms: [Denom; 2],
    pub pool_coin_denom: Denom,
    pub reserve_account_address: Addr,
}

impl Pool {
    pub fn new(id: PoolId, pool_type_id: PoolTypeId, denom_a: Denom, denom_b: Denom) -> Self {
        Self {
            id,
            pool_type_id,
            reserve_coin_denoms: [denom_a, denom_b],
            pool_coin_denom: pool_coin_denom(id),
            reserve_account_address: reserve_address(id),
        }
    }

    pub fn denom_a(&self) -> &Denom {
        &self.reserve_coin_denoms[0]
    }

    pub fn denom_b(&self) -> &Denom {
        &self.reserve_coin_denoms[1]
    }

    /// The direction of a swap that offers the given denom, if it's one of
    /// the pool's reserve denoms.
    pub fn direction_of_offer(&self, offer_denom: &Denom) -> Option<Direction> {
        if offer_denom == self.denom_a() {
            Some(Direction::Ask)
        } else if offer_denom == self.denom_b() {
            Some(Direction::Bid)
        } else {
            None
        }
    }

    pub fn offer_denom(&self, direction: Direction) -> &Denom {
        match direction {
            Direction::Ask => self.denom_a(),
            Direction::Bid => self.denom_b(),
        }
    }

    pub fn demand_denom(&self, direction: Direction) -> &Denom {
        self.offer_denom(-direction)
    }
}

/// Derive the pool coin denom from the pool id:
///
/// ```plain
/// pool/{pool_id}
/// ```
pub fn pool_coin_denom(pool_id: PoolId) -> Denom {
    Denom::new_unchecked(format!("{POOL_COIN_NAMESPACE}/{pool_id}"))
}

/// Derive the reserve account address from the pool id.
pub fn reserve_address(pool_id: PoolId) -> Addr {
    Addr::derive(RESERVE_ADDRESS_NAMESPACE, &pool_id.to_be_bytes())
}

/// A pool's reserve balances and pool coin supply, as tracked by the
/// reserve ledger.
#[derive(
    Serialize, Deserialize, BorshSerialize, BorshDeserialize, Default, Debug, Clone, Copy, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
pub struct PoolReserves {
    pub amount_a: Uint128,
    pub amount_b: Uint128,
    pub pool_coin_supply: Uint128,
}

impl PoolReserves {
    /// The pool price: units of the second denom per unit of the first.
    pub fn price(&self) -> MathResult<Udec128> {
        Udec128::checked_from_ratio_floor(self.amount_b, self.amount_a)
    }

    pub fn amount_of(&self, direction: Direction) -> Uint128 {
        match direction {
            Direction::Ask => self.amount_a,
            Direction::Bid => self.amount_b,
        }
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_identifiers() {
        let pool = Pool::new(
            3,
            1,
            Denom::new_unchecked("denomX"),
            Denom::new_unchecked("denomY"),
        );

        assert_eq!(pool.pool_coin_denom.as_str(), "pool/3");
        assert_eq!(pool.reserve_account_address, reserve_address(3));
        assert_ne!(reserve_address(3), reserve_address(4));
        assert_eq!(pool.direction_of_offer(&Denom::new_unchecked("denomX")), Some(Direction::Ask));
        assert_eq!(pool.direction_of_offer(&Denom::new_unchecked("denomY")), Some(Direction::Bid));
        assert_eq!(pool.direction_of_offer(&Denom::new_unchecked("denomZ")), None);
        assert_eq!(pool.demand_denom(Direction::Ask).as_str(), "denomY");
    }
}
