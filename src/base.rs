mod bitset;
mod pos;

pub use {
    bitset::{FixBitSet, FixBitSetIter},
    pos::CmdPos,
};
