use {
    crate::{Denom, StdError, StdResult},
    borsh::{BorshDeserialize, BorshSerialize},
    liquidity_math::{IsZero, Number, Uint128},
    serde::{de, ser, ser::SerializeSeq, Deserialize, Serialize},
    std::{
        collections::{btree_map, BTreeMap},
        fmt,
    },
};

// ----------------------------------- coin ------------------------------------

#[derive(
    Serialize, Deserialize, BorshSerialize, BorshDeserialize, Clone, PartialEq, Eq, Hash,
)]
pub struct Coin {
    pub denom: Denom,
    pub amount: Uint128,
}

impl Coin {
    pub fn new<D, A>(denom: D, amount: A) -> StdResult<Self>
    where
        D: TryInto<Denom>,
        A: Into<Uint128>,
        StdError: From<D::Error>,
    {
        Ok(Self {
            denom: denom.try_into()?,
            amount: amount.into(),
        })
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.denom, self.amount)
    }
}

impl fmt::Debug for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coin({}:{})", self.denom, self.amount)
    }
}

/// A record in the `Coins` map, borrowing the denom and amount.
#[derive(Serialize)]
pub struct CoinRef<'a> {
    pub denom: &'a Denom,
    pub amount: &'a Uint128,
}

// ----------------------------------- coins -----------------------------------

/// A set of coins with unique denoms and non-zero amounts, ordered by denom.
#[derive(BorshSerialize, BorshDeserialize, Default, Clone, PartialEq, Eq)]
pub struct Coins(BTreeMap<Denom, Uint128>);

impl Coins {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn one<D, A>(denom: D, amount: A) -> StdResult<Self>
    where
        D: TryInto<Denom>,
        A: Into<Uint128>,
        StdError: From<D::Error>,
    {
        let mut coins = Self::new();
        coins.insert(Coin::new(denom, amount)?)?;
        Ok(coins)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get the amount of the given denom.
    /// Note, if the denom does not exist, zero is returned.
    pub fn amount_of(&self, denom: &Denom) -> Uint128 {
        self.0.get(denom).copied().unwrap_or_default()
    }

    /// Increase the amount of a denom by the given amount. If the denom doesn't
    /// exist, a new record is created. Zero amounts are ignored.
    pub fn insert(&mut self, coin: Coin) -> StdResult<&mut Self> {
        if coin.amount.is_zero() {
            return Ok(self);
        }

        self.0
            .entry(coin.denom)
            .or_default()
            .checked_add_assign(coin.amount)?;

        Ok(self)
    }

    pub fn iter(&self) -> CoinsIter<'_> {
        CoinsIter(self.0.iter())
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = StdError;

    fn try_from(coins: Vec<Coin>) -> StdResult<Self> {
        let mut map = BTreeMap::new();

        for coin in coins {
            if coin.amount.is_zero() {
                return Err(StdError::invalid_coins(format!(
                    "denom `{}` has zero amount",
                    coin.denom
                )));
            }

            if map.insert(coin.denom.clone(), coin.amount).is_some() {
                return Err(StdError::invalid_coins(format!(
                    "duplicate denom: `{}`",
                    coin.denom
                )));
            }
        }

        Ok(Self(map))
    }
}

impl<const N: usize> TryFrom<[Coin; N]> for Coins {
    type Error = StdError;

    fn try_from(coins: [Coin; N]) -> StdResult<Self> {
        Self::try_from(coins.to_vec())
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        let mut map = BTreeMap::new();

        if coin.amount.is_non_zero() {
            map.insert(coin.denom, coin.amount);
        }

        Self(map)
    }
}

impl<'a> IntoIterator for &'a Coins {
    type IntoIter = CoinsIter<'a>;
    type Item = CoinRef<'a>;

    fn into_iter(self) -> Self::IntoIter {
        CoinsIter(self.0.iter())
    }
}

impl IntoIterator for Coins {
    type IntoIter = CoinsIntoIter;
    type Item = Coin;

    fn into_iter(self) -> Self::IntoIter {
        CoinsIntoIter(self.0.into_iter())
    }
}

pub struct CoinsIter<'a>(btree_map::Iter<'a, Denom, Uint128>);

impl<'a> Iterator for CoinsIter<'a> {
    type Item = CoinRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(denom, amount)| CoinRef { denom, amount })
    }
}

pub struct CoinsIntoIter(btree_map::IntoIter<Denom, Uint128>);

impl Iterator for CoinsIntoIter {
    type Item = Coin;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(denom, amount)| Coin { denom, amount })
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .iter()
            .map(|coin| format!("{}:{}", coin.denom, coin.amount))
            .collect::<Vec<_>>()
            .join(",");

        f.write_str(&s)
    }
}

impl fmt::Debug for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coins([{self}])")
    }
}

impl ser::Serialize for Coins {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for coin in self {
            seq.serialize_element(&coin)?;
        }
        seq.end()
    }
}

impl<'de> de::Deserialize<'de> for Coins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let coins = <Vec<Coin> as de::Deserialize>::deserialize(deserializer)?;
        Coins::try_from(coins).map_err(de::Error::custom)
    }
}

// ----------------------------------- tests -----------------------------------
