use smallvec::{SmallVec, smallvec};

use crate::{
    base::CmdPos,
    dce::{DceErr, DceRes},
    graph::DepGraph,
    key::{IStateKey, StateKey},
};

/// Something a caller wants to observe after replaying the filtered trace.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DceRequest<K = StateKey> {
    /// Keep this command and everything it depends on.
    Cmd(CmdPos),
    /// The value of `key` as a read at `pos` would see it. `pos` may equal
    /// the trace length, meaning "after the last command".
    StateBefore { key: K, pos: CmdPos },
    /// The value of `key` right after `pos` executed.
    StateAfter { key: K, pos: CmdPos },
    /// The value of `key` at the end of the trace.
    FinalState(K),
}

impl<K> DceRequest<K> {
    pub fn state_before(key: K, pos: CmdPos) -> Self {
        Self::StateBefore { key, pos }
    }
    pub fn state_after(key: K, pos: CmdPos) -> Self {
        Self::StateAfter { key, pos }
    }
}

/// Maps a request to the commands that must be kept to satisfy it.
///
/// A state request on a group key may need several writers. An empty list
/// means the requested state was never written by the trace (it is initial
/// state supplied from outside), so no command is needed.
pub fn resolve_request<K: IStateKey>(
    graph: &DepGraph<K>,
    request: &DceRequest<K>,
) -> DceRes<SmallVec<[CmdPos; 4]>> {
    let len = graph.len();
    let max_depth = graph.options().max_parent_depth;
    let out_of_range = |pos| DceErr::SeedOutOfRange { pos, len };

    match request {
        DceRequest::Cmd(pos) => {
            if pos.index() >= len {
                return Err(out_of_range(*pos));
            }
            Ok(smallvec![*pos])
        }
        DceRequest::StateBefore { key, pos } => {
            if pos.index() > len {
                return Err(out_of_range(*pos));
            }
            let history = graph.history().ok_or(DceErr::HistoryNotRecorded)?;
            Ok(history.resolve_before(key, *pos, max_depth)?)
        }
        DceRequest::StateAfter { key, pos } => {
            if pos.index() >= len {
                return Err(out_of_range(*pos));
            }
            let history = graph.history().ok_or(DceErr::HistoryNotRecorded)?;
            Ok(history.resolve_before(key, CmdPos(pos.0 + 1), max_depth)?)
        }
        DceRequest::FinalState(key) => {
            let history = graph.history().ok_or(DceErr::HistoryNotRecorded)?;
            Ok(history.resolve_last(key, max_depth)?)
        }
    }
}
