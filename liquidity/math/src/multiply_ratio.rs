use {
    crate::{IsZero, MathError, MathResult, Uint128},
    bnum::{cast::As, types::U256},
};

/// Describes operations where a number is multiplied by a numerator then
/// immediately divided by a denominator.
/// This is different from applying a multiplication and a division sequentially,
/// because the multiplication part can overflow.
pub trait MultiplyRatio: Sized {
    fn checked_multiply_ratio_floor<A, B>(self, numerator: A, denominator: B) -> MathResult<Self>
    where
        A: Into<Self>,
        B: Into<Self>;

    fn checked_multiply_ratio_ceil<A, B>(self, numerator: A, denominator: B) -> MathResult<Self>
    where
        A: Into<Self>,
        B: Into<Self>;
}

impl MultiplyRatio for Uint128 {
    fn checked_multiply_ratio_floor<A, B>(self, numerator: A, denominator: B) -> MathResult<Self>
    where
        A: Into<Self>,
        B: Into<Self>,
    {
        let (quotient, _) = full_mul_div(self, numerator.into(), denominator.into())?;
        narrow(quotient)
    }

    fn checked_multiply_ratio_ceil<A, B>(self, numerator: A, denominator: B) -> MathResult<Self>
    where
        A: Into<Self>,
        B: Into<Self>,
    {
        let (quotient, remainder) = full_mul_div(self, numerator.into(), denominator.into())?;

        if remainder.is_zero() {
            narrow(quotient)
        } else {
            narrow(quotient + U256::ONE)
        }
    }
}

/// Compute `a * b / c` in 256-bit precision, returning the quotient and the
/// remainder.
fn full_mul_div(a: Uint128, b: Uint128, c: Uint128) -> MathResult<(U256, U256)> {
    if c.is_zero() {
        return Err(MathError::division_by_zero(a));
    }

    let product = U256::from(a.number()) * U256::from(b.number());
    let c = U256::from(c.number());

    Ok((product / c, product % c))
}

fn narrow(value: U256) -> MathResult<Uint128> {
    if value > U256::from(u128::MAX) {
        return Err(MathError::overflow_conversion::<_, Uint128>(value));
    }

    Ok(Uint128::new(value.as_::<u128>()))
}

// ----------------------------------- tests -----------------------------------
