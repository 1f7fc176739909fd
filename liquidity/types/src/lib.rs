mod address;
pub mod amm;
mod bank;
mod buffer;
mod coin;
mod context;
mod denom;
mod error;
mod event;
mod serializers;
mod storage;

pub use {
    address::*, bank::*, buffer::*, coin::*, context::*, denom::*, error::*, event::*,
    serializers::*, storage::*,
};

// ---------------------------------- re-exports ---------------------------------

pub use liquidity_math::*;

/// A shorthand for JSON values, used in query responses and event payloads.
pub type Json = serde_json::Value;
