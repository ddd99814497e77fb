use smallvec::SmallVec;
use std::collections::HashSet;

use crate::{
    base::CmdPos,
    behaviour::{CmdBehaviour, IBehaviourProvider},
    graph::{
        BuildOptions, DepGraph, ForceReason, GraphErr, GraphNode, GraphRes, GraphStats,
        WriterHistory,
        writers::{WriterTable, ancestors_of},
    },
    key::{IStateKey, StateKey},
};

/// Forward-pass graph constructor.
///
/// Commands must be pushed strictly in trace order: the writer table at the
/// time command `i` is pushed reflects exactly commands `0..i`. Dropping a
/// builder half way is the way to cancel; only [`GraphBuilder::finish`] hands
/// out a graph.
#[derive(Debug, Clone)]
pub struct GraphBuilder<K = StateKey> {
    options: BuildOptions,
    writers: WriterTable<K>,
    history: Option<WriterHistory<K>>,
    roots: HashSet<K>,
    nodes: Vec<GraphNode<K>>,
    forced: Vec<(CmdPos, ForceReason)>,
    stats: GraphStats,
}

impl<K: IStateKey> Default for GraphBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IStateKey> GraphBuilder<K> {
    pub fn new() -> Self {
        Self::with_options(BuildOptions::default())
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            options,
            writers: WriterTable::new(),
            history: options.record_history.then(WriterHistory::new),
            roots: HashSet::new(),
            nodes: Vec::new(),
            forced: Vec::new(),
            stats: GraphStats::default(),
        }
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Marks `key` as externally observable. Every later write to it is a
    /// liveness seed. Writes pushed before the call are not revisited.
    ///
    /// Returns `false` if the key was already a root.
    pub fn mark_root(&mut self, key: K) -> bool {
        self.roots.insert(key)
    }

    /// Position the next pushed command will get.
    pub fn next_pos(&self) -> CmdPos {
        CmdPos(self.nodes.len() as u32)
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Records the next command of the trace.
    ///
    /// Reads (including the read half of modifies) are resolved before the
    /// command's own writes are recorded, so a modify links to the previous
    /// writer of the key. On error nothing is recorded.
    pub fn push(&mut self, behaviour: CmdBehaviour<K>) -> GraphRes<CmdPos> {
        if self.nodes.len() >= CmdPos::MAX_TRACE_LEN {
            return Err(GraphErr::TraceTooLong);
        }
        let pos = self.next_pos();
        let max_depth = self.options.max_parent_depth;

        let mut deps = SmallVec::<[CmdPos; 4]>::new();
        let mut unresolved = 0;
        for key in behaviour.observed_keys() {
            let writers = self.writers.resolve(key, max_depth)?;
            if writers.is_empty() {
                unresolved += 1;
            }
            for writer in &writers {
                log::trace!("{pos} reads {key:?} written by {writer}");
            }
            deps.extend(writers);
        }
        deps.sort_unstable();
        deps.dedup();

        // every ancestor chain is walked before the tables change.
        let written: SmallVec<[_; 4]> = behaviour
            .written_keys()
            .map(|key| ancestors_of(key, max_depth).map(|chain| (key, chain)))
            .collect::<GraphRes<_>>()?;
        let mut writes_root = false;
        for (key, ancestors) in written {
            writes_root |= self.roots.contains(key);
            self.writers.record(key.clone(), &ancestors, pos);
            if let Some(history) = &mut self.history {
                history.record(key.clone(), &ancestors, pos);
            }
        }

        let mut forced = false;
        let mut force = |reason: ForceReason| {
            log::debug!("{pos} forced live: {reason:?}");
            self.forced.push((pos, reason));
            forced = true;
        };
        if writes_root {
            force(ForceReason::RootWrite);
        }
        if behaviour.is_aborted() {
            force(ForceReason::Aborted);
        }
        if behaviour.is_keep_alive() {
            force(ForceReason::KeepAlive);
        }

        self.stats.forced += forced as usize;
        self.stats.edges += deps.len();
        self.stats.unresolved_reads += unresolved;
        self.nodes.push(GraphNode { pos, behaviour, deps });
        Ok(pos)
    }

    /// Driver loop over a whole trace: classify each command against the
    /// current snapshot, push it, then let the provider advance the snapshot.
    ///
    /// `state` holds the snapshot before the first command on entry and the
    /// one after the last command on return.
    pub fn run<C, P>(
        mut self,
        trace: &[C],
        provider: &P,
        state: &mut P::State,
    ) -> GraphRes<DepGraph<K>>
    where
        P: IBehaviourProvider<C, Key = K>,
    {
        if self.nodes.len() + trace.len() > CmdPos::MAX_TRACE_LEN {
            return Err(GraphErr::TraceTooLong);
        }
        self.reserve(trace.len());
        for cmd in trace {
            let behaviour = provider.behaviour(cmd, state);
            self.push(behaviour)?;
            provider.apply(cmd, state);
        }
        Ok(self.finish())
    }

    pub fn finish(self) -> DepGraph<K> {
        let mut stats = self.stats;
        stats.nodes = self.nodes.len();
        stats.keys_written = self.writers.len();
        log::debug!(
            "dependency graph built: {} commands, {} edges, {} keys written, \
             {} unresolved reads, {} forced",
            stats.nodes,
            stats.edges,
            stats.keys_written,
            stats.unresolved_reads,
            stats.forced,
        );
        DepGraph {
            nodes: self.nodes,
            forced: self.forced,
            roots: self.roots,
            history: self.history,
            options: self.options,
            stats,
        }
    }
}
