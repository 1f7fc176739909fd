use std::any::type_name;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("failed to parse string `{input}` into {ty}: {reason}")]
    ParseNumber {
        ty: &'static str,
        input: String,
        reason: String,
    },

    #[error("conversion overflow: {source_type}({value}) > {target_type}::MAX")]
    OverflowConversion {
        source_type: &'static str,
        target_type: &'static str,
        value: String,
    },

    #[error("addition overflow: {a} + {b} > {ty}::MAX")]
    OverflowAdd {
        ty: &'static str,
        a: String,
        b: String,
    },

    #[error("subtraction overflow: {a} - {b} < {ty}::MIN")]
    OverflowSub {
        ty: &'static str,
        a: String,
        b: String,
    },

    #[error("multiplication overflow: {a} * {b} > {ty}::MAX")]
    OverflowMul {
        ty: &'static str,
        a: String,
        b: String,
    },

    #[error("division by zero: {a} / 0")]
    DivisionByZero { a: String },
}

impl MathError {
    pub fn parse_number<T, V, R>(input: V, reason: R) -> Self
    where
        V: ToString,
        R: ToString,
    {
        Self::ParseNumber {
            ty: type_name::<T>(),
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn overflow_conversion<A, B>(source: A) -> Self
    where
        A: ToString,
    {
        Self::OverflowConversion {
            source_type: type_name::<A>(),
            target_type: type_name::<B>(),
            value: source.to_string(),
        }
    }

    pub fn overflow_add<T>(a: T, b: T) -> Self
    where
        T: ToString,
    {
        Self::OverflowAdd {
            ty: type_name::<T>(),
            a: a.to_string(),
            b: b.to_string(),
        }
    }

    pub fn overflow_sub<T>(a: T, b: T) -> Self
    where
        T: ToString,
    {
        Self::OverflowSub {
            ty: type_name::<T>(),
            a: a.to_string(),
            b: b.to_string(),
        }
    }

    pub fn overflow_mul<T>(a: T, b: T) -> Self
    where
        T: ToString,
    {
        Self::OverflowMul {
            ty: type_name::<T>(),
            a: a.to_string(),
            b: b.to_string(),
        }
    }

    pub fn division_by_zero(a: impl ToString) -> Self {
        Self::DivisionByZero { a: a.to_string() }
    }

}

pub type MathResult<T> = core::result::Result<T, MathError>;
