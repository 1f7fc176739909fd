mod dec;
mod error;
mod int;
mod is_zero;
mod multiply_fraction;
mod multiply_ratio;
mod number;
mod number_const;

pub use {
    dec::*, error::*, int::*, is_zero::*, multiply_fraction::*, multiply_ratio::*, number::*,
    number_const::*,
};
