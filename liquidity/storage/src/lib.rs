mod codec;
mod counter;
mod item;
mod key;
mod map;
mod path;
mod prefix;
mod utils;

pub use {
    codec::*, counter::*, item::*, key::*, map::*, path::*, prefix::*, utils::*,
};
