mod result;
mod suite;
mod tracing;

pub use {result::*, suite::*, tracing::*};
