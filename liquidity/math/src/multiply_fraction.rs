use crate::{IsZero, MathError, MathResult, MultiplyRatio, NumberConst, Udec128, Uint128};

/// Describes operations between an integer and a decimal type.
pub trait MultiplyFraction<F>: Sized {
    fn checked_mul_dec_floor(self, rhs: F) -> MathResult<Self>;

    fn checked_mul_dec_ceil(self, rhs: F) -> MathResult<Self>;

    fn checked_div_dec_floor(self, rhs: F) -> MathResult<Self>;
}

impl MultiplyFraction<Udec128> for Uint128 {
    fn checked_mul_dec_floor(self, rhs: Udec128) -> MathResult<Self> {
        // If either left or right hand side is zero, then simply return zero.
        if self.is_zero() || rhs.is_zero() {
            return Ok(Self::ZERO);
        }

        self.checked_multiply_ratio_floor(*rhs.numerator(), Udec128::denominator())
    }

    fn checked_mul_dec_ceil(self, rhs: Udec128) -> MathResult<Self> {
        if self.is_zero() || rhs.is_zero() {
            return Ok(Self::ZERO);
        }

        self.checked_multiply_ratio_ceil(*rhs.numerator(), Udec128::denominator())
    }

    fn checked_div_dec_floor(self, rhs: Udec128) -> MathResult<Self> {
        // If right hand side is zero, throw error, because you can't divide any
        // number by zero.
        if rhs.is_zero() {
            return Err(MathError::division_by_zero(self));
        }

        // If left hand side is zero, and we know right hand size is positive,
        // then simply return zero.
        if self.is_zero() {
            return Ok(Self::ZERO);
        }

        self.checked_multiply_ratio_floor(Udec128::denominator(), *rhs.numerator())
    }

}

// ----------------------------------- tests -----------------------------------
