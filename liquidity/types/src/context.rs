use {
    crate::{Addr, Bank, Storage},
    serde::{Deserialize, Serialize},
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub height: u64,
}

/// Context for calls that may mutate state, made on behalf of a sender.
///
/// `contract` is the module's own account, which escrows coins of requests
/// waiting in a batch.
pub struct MutableCtx<'a> {
    pub storage: &'a mut dyn Storage,
    pub bank: &'a mut dyn Bank,
    pub block: BlockInfo,
    pub contract: Addr,
    pub sender: Addr,
}

/// Context for calls made by the state machine itself, such as the end-block
/// batch execution. There is no sender.
pub struct SudoCtx<'a> {
    pub storage: &'a mut dyn Storage,
    pub bank: &'a mut dyn Bank,
    pub block: BlockInfo,
    pub contract: Addr,
}

/// Context for read-only calls.
#[derive(Clone, Copy)]
pub struct ImmutableCtx<'a> {
    pub storage: &'a dyn Storage,
    pub bank: &'a dyn Bank,
    pub block: BlockInfo,
    pub contract: Addr,
}
