/// Describes a number that can be compared to zero.
pub trait IsZero {
    /// Return true if the number is zero; false otherwise.
    fn is_zero(&self) -> bool;

    /// Return true if the number is not zero; false otherwise.
    #[inline]
    fn is_non_zero(&self) -> bool {
        !self.is_zero()
    }
}

macro_rules! impl_is_zero {
    ($($t:ty),+ $(,)?) => {
        $(
            impl IsZero for $t {
                #[inline]
                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_is_zero!(u8, u16, u32, u64, u128, usize);
