//! Dependency graph over a command trace.
//!
//! One [`GraphNode`] per command, each holding the command's behaviour and the
//! positions of the earlier commands whose writes it observes. The graph is
//! built by a single forward pass ([`GraphBuilder`]) and is immutable
//! afterwards, so it can be shared by any number of concurrent liveness
//! queries.

use smallvec::SmallVec;
use std::collections::HashSet;

use crate::{
    base::CmdPos,
    behaviour::{CmdBehaviour, IBehaviourProvider},
    key::{IStateKey, StateKey},
};

mod builder;
mod visualize;
mod writers;

pub(crate) use self::writers::WriterHistory;
pub use self::{builder::GraphBuilder, visualize::write_graph_dot};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphErr {
    #[error("parent chain of key {key} exceeds {max_depth} levels; is `parent()` cyclic?")]
    ParentChainTooDeep { key: String, max_depth: usize },

    #[error("trace is longer than {} commands", CmdPos::MAX_TRACE_LEN)]
    TraceTooLong,
}
pub type GraphRes<T = ()> = Result<T, GraphErr>;

/// Options of a single graph construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildOptions {
    /// Maximum number of `parent()` steps taken when resolving one read.
    pub max_parent_depth: usize,
    /// Keep every writer of every key, not only the last one. Required by
    /// state observation requests.
    pub record_history: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { max_parent_depth: 64, record_history: true }
    }
}

impl BuildOptions {
    pub fn max_parent_depth(self, val: usize) -> Self {
        Self { max_parent_depth: val, ..self }
    }
    pub fn record_history(self, val: bool) -> Self {
        Self { record_history: val, ..self }
    }
}

/// Why a command is live regardless of any request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForceReason {
    /// Writes a key of the root set.
    RootWrite,
    KeepAlive,
    Aborted,
}

impl ForceReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ForceReason::RootWrite => "root",
            ForceReason::KeepAlive => "keep-alive",
            ForceReason::Aborted => "aborted",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphNode<K = StateKey> {
    pub pos: CmdPos,
    pub behaviour: CmdBehaviour<K>,
    /// Earlier commands this one depends on, ascending and without duplicates.
    pub deps: SmallVec<[CmdPos; 4]>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    /// Keys with a current writer at the end of the trace. Keys superseded by
    /// a later write to one of their ancestors are not counted.
    pub keys_written: usize,
    /// Reads against state no command in the trace has written.
    pub unresolved_reads: usize,
    /// Distinct commands forced live.
    pub forced: usize,
}

#[derive(Debug, Clone)]
pub struct DepGraph<K = StateKey> {
    pub(crate) nodes: Vec<GraphNode<K>>,
    pub(crate) forced: Vec<(CmdPos, ForceReason)>,
    pub(crate) roots: HashSet<K>,
    pub(crate) history: Option<WriterHistory<K>>,
    pub(crate) options: BuildOptions,
    pub(crate) stats: GraphStats,
}

impl<K: IStateKey> DepGraph<K> {
    /// Builds the graph of `trace` with default options and no root keys.
    /// See [`GraphBuilder::run`] for the driver loop.
    pub fn build<C, P>(trace: &[C], provider: &P, state: &mut P::State) -> GraphRes<Self>
    where
        P: IBehaviourProvider<C, Key = K>,
    {
        GraphBuilder::new().run(trace, provider, state)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, pos: CmdPos) -> Option<&GraphNode<K>> {
        self.nodes.get(pos.index())
    }
    pub fn nodes(&self) -> &[GraphNode<K>] {
        &self.nodes
    }
    pub fn deps_of(&self, pos: CmdPos) -> &[CmdPos] {
        self.node(pos).map(|n| n.deps.as_slice()).unwrap_or(&[])
    }

    /// Commands live independently of any request, with the reason.
    pub fn forced_seeds(&self) -> &[(CmdPos, ForceReason)] {
        &self.forced
    }
    pub fn is_root(&self, key: &K) -> bool {
        self.roots.contains(key)
    }
    pub fn roots(&self) -> impl Iterator<Item = &K> {
        self.roots.iter()
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }
    pub fn options(&self) -> BuildOptions {
        self.options
    }
    pub fn has_history(&self) -> bool {
        self.history.is_some()
    }
    pub(crate) fn history(&self) -> Option<&WriterHistory<K>> {
        self.history.as_ref()
    }
}

/// Builds the dependency graph of `trace` with default options.
pub fn build<C, P>(trace: &[C], provider: &P, state: &mut P::State) -> GraphRes<DepGraph<P::Key>>
where
    P: IBehaviourProvider<C>,
{
    DepGraph::build(trace, provider, state)
}
