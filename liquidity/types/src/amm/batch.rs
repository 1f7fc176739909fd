use {
    crate::amm::{BatchIndex, PoolId},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
};

#[derive(
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
    strum_macros::Display,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BatchStatus {
    /// Accepting requests.
    Open,
    /// Its snapshot has been drained and is being settled. New requests are
    /// rejected until settlement finishes.
    Executing,
    /// Settled. The next request to arrive opens a new batch.
    Executed,
}

/// The batch currently associated with a pool.
#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Batch {
    pub pool_id: PoolId,
    pub index: BatchIndex,
    /// The block height at which the batch was opened.
    pub begin_height: u64,
    pub status: BatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_height: Option<u64>,
}

impl Batch {
    pub fn new(pool_id: PoolId, index: BatchIndex, begin_height: u64) -> Self {
        Self {
            pool_id,
            index,
            begin_height,
            status: BatchStatus::Open,
            executed_height: None,
        }
    }

    /// Whether the batch is open and has been open for at least
    /// `unit_batch_height` blocks, counting the current one.
    pub fn is_due(&self, height: u64, unit_batch_height: u64) -> bool {
        self.status == BatchStatus::Open
            && height.saturating_sub(self.begin_height) + 1 >= unit_batch_height
    }
}
