mod batch;
mod direction;
mod events;
mod msgs;
mod params;
mod pool;
mod request;

pub use {batch::*, direction::*, events::*, msgs::*, params::*, pool::*, request::*};

/// The namespace of pool coin denoms: `pool/{pool_id}`.
pub const POOL_COIN_NAMESPACE: &str = "pool";

/// Seed prefix from which a pool's reserve account address is derived.
pub const RESERVE_ADDRESS_NAMESPACE: &[u8] = b"liquidity/reserve";

/// Pools are identified by a number assigned at creation, starting at 1.
pub type PoolId = u64;

/// Requests are identified by a number assigned in arrival order, unique
/// across all pools.
pub type RequestId = u64;

/// Index into the list of pool types in `Params`.
pub type PoolTypeId = u32;

/// Batches of a pool are numbered starting at 1.
pub type BatchIndex = u64;
