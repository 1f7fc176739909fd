use {
    crate::{IsZero, MathError, MathResult, MultiplyRatio, Number, NumberConst, Uint128},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{de, ser},
    std::{fmt, str::FromStr},
};

/// An unsigned fixed-point decimal number with 18 decimal places, backed by a
/// 128-bit integer.
///
/// Every operation that can lose precision comes in an explicitly rounded
/// form, or rounds toward zero when the name doesn't say otherwise.
#[derive(
    BorshSerialize, BorshDeserialize, Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Udec128(Uint128);

impl Udec128 {
    pub const DECIMAL_PLACES: u32 = 18;
    const PRECISION: u128 = 10_u128.pow(Self::DECIMAL_PLACES);

    /// Create a decimal from a whole number.
    pub const fn new(x: u128) -> Self {
        Self(Uint128::new(x * Self::PRECISION))
    }

    pub const fn new_percent(x: u128) -> Self {
        Self(Uint128::new(x * (Self::PRECISION / 100)))
    }

    pub const fn new_permille(x: u128) -> Self {
        Self(Uint128::new(x * (Self::PRECISION / 1_000)))
    }

    /// Create a decimal from its raw inner value, i.e. the value multiplied
    /// by 10^18.
    pub const fn raw(value: Uint128) -> Self {
        Self(value)
    }

    pub fn numerator(&self) -> &Uint128 {
        &self.0
    }

    pub const fn denominator() -> Uint128 {
        Uint128::new(Self::PRECISION)
    }

    pub fn checked_from_ratio_floor<N, D>(numerator: N, denominator: D) -> MathResult<Self>
    where
        N: Into<Uint128>,
        D: Into<Uint128>,
    {
        numerator
            .into()
            .checked_multiply_ratio_floor(Self::denominator(), denominator)
            .map(Self)
    }

    pub fn abs_diff(self, other: Self) -> Self {
        Self(self.0.abs_diff(other.0))
    }
}

impl NumberConst for Udec128 {
    const MAX: Self = Self(Uint128::MAX);
    const MIN: Self = Self(Uint128::MIN);
    const ONE: Self = Self::new(1);
    const TEN: Self = Self::new(10);
    const ZERO: Self = Self(Uint128::ZERO);
}

impl IsZero for Udec128 {
    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Number for Udec128 {
    fn checked_add(self, other: Self) -> MathResult<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    fn checked_sub(self, other: Self) -> MathResult<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Multiplication rounding toward zero.
    fn checked_mul(self, other: Self) -> MathResult<Self> {
        self.0
            .checked_multiply_ratio_floor(other.0, Self::denominator())
            .map(Self)
    }

    /// Division rounding toward zero.
    fn checked_div(self, other: Self) -> MathResult<Self> {
        if other.is_zero() {
            return Err(MathError::division_by_zero(self));
        }

        self.0
            .checked_multiply_ratio_floor(Self::denominator(), other.0)
            .map(Self)
    }

    fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Udec128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0.number() / Self::PRECISION;
        let fractional = self.0.number() % Self::PRECISION;

        if fractional == 0 {
            write!(f, "{whole}")
        } else {
            let fractional = format!("{fractional:0>18}");
            write!(f, "{whole}.{}", fractional.trim_end_matches('0'))
        }
    }
}

impl FromStr for Udec128 {
    type Err = MathError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts_iter = input.split('.');

        let whole = parts_iter
            .next()
            .unwrap_or_default()
            .parse::<u128>()
            .map_err(|_| MathError::parse_number::<Self, _, _>(input, "error parsing whole"))?;

        let mut atomics = whole
            .checked_mul(Self::PRECISION)
            .ok_or_else(|| MathError::parse_number::<Self, _, _>(input, "value too big"))?;

        if let Some(fractional_part) = parts_iter.next() {
            let fractional = fractional_part.parse::<u128>().map_err(|_| {
                MathError::parse_number::<Self, _, _>(input, "error parsing fractional")
            })?;

            let exp = Self::DECIMAL_PLACES
                .checked_sub(fractional_part.len() as u32)
                .ok_or_else(|| {
                    MathError::parse_number::<Self, _, _>(
                        input,
                        format!(
                            "cannot parse more than {} fractional digits",
                            Self::DECIMAL_PLACES
                        ),
                    )
                })?;

            // Can't overflow: fractional < 10^18 and the factor is <= 10^18.
            atomics = fractional
                .checked_mul(10_u128.pow(exp))
                .and_then(|fractional| atomics.checked_add(fractional))
                .ok_or_else(|| MathError::parse_number::<Self, _, _>(input, "value too big"))?;
        }

        if parts_iter.next().is_some() {
            return Err(MathError::parse_number::<Self, _, _>(
                input,
                "unexpected number of dots",
            ));
        }

        Ok(Self(Uint128::new(atomics)))
    }
}

impl ser::Serialize for Udec128 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> de::Deserialize<'de> for Udec128 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(DecVisitor)
    }
}

struct DecVisitor;

impl de::Visitor<'_> for DecVisitor {
    type Value = Udec128;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string-encoded decimal")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Udec128::from_str(v).map_err(E::custom)
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test_case("0" => Udec128::ZERO; "zero")]
    #[test_case("1" => Udec128::ONE; "one")]
    #[test_case("0.003" => Udec128::new_permille(3); "fee rate")]
    #[test_case("1.05" => Udec128::new_percent(105); "limit price")]
    #[test_case("0.000000000000000001" => Udec128::raw(Uint128::ONE); "smallest")]
    fn parsing(input: &str) -> Udec128 {
        input.parse().unwrap()
    }

    #[test_case("1.0000000000000000001"; "too many digits")]
    #[test_case("1.2.3"; "two dots")]
    #[test_case("-1"; "negative")]
    #[test_case("abc"; "garbage")]
    fn parsing_fails(input: &str) {
        assert!(input.parse::<Udec128>().is_err());
    }

    #[test_case(Udec128::new(7) => "7"; "whole")]
    #[test_case(Udec128::new_percent(90) => "0.9"; "fraction")]
    #[test_case(Udec128::new_permille(1_001) => "1.001"; "permille")]
    fn displaying(dec: Udec128) -> String {
        dec.to_string()
    }

    #[test]
    fn ratio_rounds_down() {
        let floor = Udec128::checked_from_ratio_floor(2_u128, 3_u128).unwrap();
        assert_eq!(floor.to_string(), "0.666666666666666666");
        assert!(Udec128::checked_from_ratio_floor(1_u128, 0_u128).is_err());
    }

    #[test]
    fn mul_and_div_round_down() {
        let third = Udec128::checked_from_ratio_floor(1_u128, 3_u128).unwrap();
        assert_eq!(
            third.checked_mul(Udec128::new(3)).unwrap().to_string(),
            "0.999999999999999999"
        );
        assert_eq!(
            Udec128::ONE.checked_div(Udec128::new(3)).unwrap(),
            third
        );
        assert!(Udec128::ONE.checked_div(Udec128::ZERO).is_err());
    }

    #[test]
    fn json_is_a_string() {
        let json = serde_json::to_string(&Udec128::new_percent(105)).unwrap();
        assert_eq!(json, "\"1.05\"");
    }
}
