use crate::base::{CmdPos, FixBitSet};

/// Set of live command positions of one trace.
///
/// Sized to the trace at creation. It only ever grows while a solve runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessSet {
    bits: FixBitSet<4>,
}

impl LivenessSet {
    pub fn with_len(trace_len: usize) -> Self {
        Self { bits: FixBitSet::with_len(trace_len) }
    }

    /// Length of the trace this set describes.
    pub fn trace_len(&self) -> usize {
        self.bits.len()
    }

    pub fn contains(&self, pos: CmdPos) -> bool {
        self.bits.get(pos.index())
    }

    /// Marks `pos` live and returns whether it was dead before.
    /// Positions outside the trace are ignored.
    pub fn insert(&mut self, pos: CmdPos) -> bool {
        self.bits.insert(pos.index())
    }

    pub fn live_count(&self) -> usize {
        self.bits.count_ones()
    }
    pub fn dead_count(&self) -> usize {
        self.trace_len() - self.live_count()
    }
    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }

    /// Live positions in trace order.
    pub fn iter(&self) -> impl Iterator<Item = CmdPos> + '_ {
        self.bits.iter().map(|i| CmdPos(i as u32))
    }
    /// Dead positions in trace order.
    pub fn dead_positions(&self) -> impl Iterator<Item = CmdPos> + '_ {
        (0..self.trace_len())
            .filter(|&i| !self.bits.get(i))
            .map(|i| CmdPos(i as u32))
    }

    pub fn is_superset(&self, other: &Self) -> bool {
        self.bits.is_superset(&other.bits)
    }
    pub fn union_with(&mut self, other: &Self) {
        self.bits.union_with(&other.bits);
    }
}
