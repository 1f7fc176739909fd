use crate::{MathError, MathResult};

/// Describes basic checked arithmetic operations that all numeric types
/// (integers and fixed-point decimals) in this crate implement.
pub trait Number: Sized {
    fn checked_add(self, other: Self) -> MathResult<Self>;

    fn checked_sub(self, other: Self) -> MathResult<Self>;

    fn checked_mul(self, other: Self) -> MathResult<Self>;

    fn checked_div(self, other: Self) -> MathResult<Self>;

    fn saturating_sub(self, other: Self) -> Self;

    fn checked_add_assign(&mut self, other: Self) -> MathResult<()>
    where
        Self: Copy,
    {
        *self = self.checked_add(other)?;
        Ok(())
    }

    fn checked_sub_assign(&mut self, other: Self) -> MathResult<()>
    where
        Self: Copy,
    {
        *self = self.checked_sub(other)?;
        Ok(())
    }
}

// ------------------------------ primitive types ------------------------------

macro_rules! impl_number {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Number for $t {
                fn checked_add(self, other: Self) -> MathResult<Self> {
                    <$t>::checked_add(self, other).ok_or_else(|| MathError::overflow_add(self, other))
                }

                fn checked_sub(self, other: Self) -> MathResult<Self> {
                    <$t>::checked_sub(self, other).ok_or_else(|| MathError::overflow_sub(self, other))
                }

                fn checked_mul(self, other: Self) -> MathResult<Self> {
                    <$t>::checked_mul(self, other).ok_or_else(|| MathError::overflow_mul(self, other))
                }

                fn checked_div(self, other: Self) -> MathResult<Self> {
                    <$t>::checked_div(self, other).ok_or_else(|| MathError::division_by_zero(self))
                }

                fn saturating_sub(self, other: Self) -> Self {
                    <$t>::saturating_sub(self, other)
                }
            }
        )*
    };
}

impl_number!(u32, u64, u128);

// ----------------------------------- tests -----------------------------------
