mod core;
mod cron;
mod error;
mod execute;
mod genesis;
mod query;
mod queue;
mod registry;
mod reserve;
mod settlement;
mod state;

pub use {
    core::*, cron::*, error::*, execute::*, genesis::*, query::*, queue::*, registry::*,
    reserve::*, settlement::*, state::*,
};
