use std::fmt::{Debug, Display};

/// Position of a command inside a trace, i.e. its index in program order.
///
/// Positions are dense and start at zero, so they double as indices into
/// per-command tables such as `DepGraph::nodes` and `LivenessSet`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CmdPos(pub u32);

impl CmdPos {
    pub const MAX_TRACE_LEN: usize = u32::MAX as usize;

    pub fn new(index: usize) -> Option<Self> {
        if index < Self::MAX_TRACE_LEN {
            Some(Self(index as u32))
        } else {
            None
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for CmdPos {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Debug for CmdPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
impl Display for CmdPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
