use std::collections::VecDeque;

use crate::{
    base::CmdPos,
    dce::{DceErr, DceRes, LivenessSet},
    graph::DepGraph,
    key::IStateKey,
};

/// Worklist marker over one immutable graph.
pub(super) struct LiveCmdMarker<'g, K> {
    graph: &'g DepGraph<K>,
    live: LivenessSet,
    mark_queue: VecDeque<CmdPos>,
}

impl<'g, K: IStateKey> LiveCmdMarker<'g, K> {
    pub fn new(graph: &'g DepGraph<K>) -> Self {
        Self {
            graph,
            live: LivenessSet::with_len(graph.len()),
            mark_queue: VecDeque::new(),
        }
    }

    pub fn push_mark(&mut self, pos: CmdPos) -> DceRes {
        if pos.index() >= self.graph.len() {
            return Err(DceErr::SeedOutOfRange { pos, len: self.graph.len() });
        }
        if self.live.insert(pos) {
            self.mark_queue.push_back(pos);
        }
        Ok(())
    }

    /// Seeds every command the graph forces live.
    pub fn push_forced(&mut self) {
        for &(pos, _) in self.graph.forced_seeds() {
            if self.live.insert(pos) {
                self.mark_queue.push_back(pos);
            }
        }
    }

    pub fn mark_all(&mut self) {
        while let Some(pos) = self.mark_queue.pop_front() {
            for &dep in self.graph.deps_of(pos) {
                // deps always point backwards into the same graph.
                if self.live.insert(dep) {
                    self.mark_queue.push_back(dep);
                }
            }
        }
    }

    pub fn release_live_set(self) -> LivenessSet {
        self.live
    }
}

/// Computes the live commands needed by `seeds`, plus everything the graph
/// forces live.
///
/// Fails with [`DceErr::SeedOutOfRange`] if a seed is not a position of the
/// trace the graph was built from. Seeds are checked before any marking.
pub fn solve<K: IStateKey>(graph: &DepGraph<K>, seeds: &[CmdPos]) -> DceRes<LivenessSet> {
    if let Some(&pos) = seeds.iter().find(|p| p.index() >= graph.len()) {
        return Err(DceErr::SeedOutOfRange { pos, len: graph.len() });
    }
    let mut marker = LiveCmdMarker::new(graph);
    marker.push_forced();
    for &seed in seeds {
        marker.push_mark(seed)?;
    }
    marker.mark_all();
    let live = marker.release_live_set();
    log::debug!(
        "liveness solved: {} seeds, {} of {} commands live",
        seeds.len(),
        live.live_count(),
        graph.len()
    );
    Ok(live)
}
