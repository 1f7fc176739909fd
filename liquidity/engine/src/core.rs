mod liquidity;
mod matching;
mod order;
mod price_discovery;

pub use {liquidity::*, matching::*, order::*, price_discovery::*};
