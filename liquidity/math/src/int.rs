use {
    crate::{IsZero, MathError, MathResult, Number, NumberConst},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{de, ser},
    std::{
        fmt,
        iter::Sum,
        ops::{Add, Div, Mul, Sub},
        str::FromStr,
    },
};

/// A 128-bit unsigned integer, used for all token amounts.
///
/// Serializes to JSON as a string so that values above 2^53 survive clients
/// that parse numbers as IEEE-754 doubles.
#[derive(
    BorshSerialize, BorshDeserialize, Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Uint128(u128);

impl Uint128 {
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn number(self) -> u128 {
        self.0
    }

    pub fn abs_diff(self, other: Self) -> Self {
        Self(self.0.abs_diff(other.0))
    }
}

impl From<u128> for Uint128 {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Uint128 {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl From<Uint128> for u128 {
    fn from(value: Uint128) -> Self {
        value.0
    }
}

impl NumberConst for Uint128 {
    const MAX: Self = Self(u128::MAX);
    const MIN: Self = Self(u128::MIN);
    const ONE: Self = Self(1);
    const TEN: Self = Self(10);
    const ZERO: Self = Self(0);
}

impl IsZero for Uint128 {
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

macro_rules! impl_checked_ops {
    ($($op:ident => $err:ident),+ $(,)?) => {
        paste::paste! {
            $(
                fn [<checked_ $op>](self, other: Self) -> MathResult<Self> {
                    self.0
                        .[<checked_ $op>](other.0)
                        .map(Self)
                        .ok_or_else(|| MathError::$err(self, other))
                }
            )*
        }
    };
}

impl Number for Uint128 {
    impl_checked_ops! {
        add => overflow_add,
        sub => overflow_sub,
        mul => overflow_mul,
    }

    fn checked_div(self, other: Self) -> MathResult<Self> {
        self.0
            .checked_div(other.0)
            .map(Self)
            .ok_or_else(|| MathError::division_by_zero(self))
    }

    fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Uint128 {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u128::from_str(s)
            .map(Self)
            .map_err(|err| MathError::parse_number::<Self, _, _>(s, err))
    }
}

impl ser::Serialize for Uint128 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> de::Deserialize<'de> for Uint128 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(UintVisitor)
    }
}

struct UintVisitor;

impl de::Visitor<'_> for UintVisitor {
    type Value = Uint128;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string-encoded unsigned integer")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Uint128::from_str(v).map_err(E::custom)
    }
}

impl Sum for Uint128 {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Self>,
    {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl Add for Uint128 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl Sub for Uint128 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl Mul for Uint128 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.checked_mul(rhs).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl Div for Uint128 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self.checked_div(rhs).unwrap_or_else(|err| panic!("{err}"))
    }
}

// ----------------------------------- tests -----------------------------------
