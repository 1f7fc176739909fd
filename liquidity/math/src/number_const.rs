/// Describes a number type that has a set of well-known constant values.
pub trait NumberConst {
    const MAX: Self;
    const MIN: Self;
    const ONE: Self;
    const TEN: Self;
    const ZERO: Self;
}

macro_rules! impl_number_const {
    ($($t:ty),+ $(,)?) => {
        $(
            impl NumberConst for $t {
                const MAX: Self = <$t>::MAX;
                const MIN: Self = <$t>::MIN;
                const ONE: Self = 1;
                const TEN: Self = 10;
                const ZERO: Self = 0;
            }
        )*
    };
}

impl_number_const!(u8, u16, u32, u64, u128, usize);
