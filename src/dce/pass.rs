use crate::{
    base::CmdPos,
    dce::{DceRequest, DceRes, LivenessSet, filter, filter_iter, resolve_request, solve},
    graph::DepGraph,
    key::{IStateKey, StateKey},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DceStats {
    pub total: usize,
    pub live: usize,
    pub dead: usize,
    /// Commands live no matter what was requested.
    pub forced: usize,
    pub requests: usize,
    /// Requests for state no command of the trace wrote.
    pub unresolved_requests: usize,
}

#[derive(Debug, Clone)]
pub struct DceResult {
    pub live: LivenessSet,
    pub stats: DceStats,
}

impl DceResult {
    pub fn is_live(&self, pos: CmdPos) -> bool {
        self.live.contains(pos)
    }

    /// The live subsequence of `trace`.
    pub fn keep_live<C: Clone>(&self, trace: &[C]) -> DceRes<Vec<C>> {
        filter(trace, &self.live)
    }
    pub fn live_cmds<'t, C>(
        &'t self,
        trace: &'t [C],
    ) -> DceRes<impl Iterator<Item = (CmdPos, &'t C)> + 't> {
        filter_iter(trace, &self.live)
    }
}

/// Accumulates requests against one graph and solves them together.
///
/// ```ignore
/// let mut dce = DeadCodeElimination::new(&graph);
/// dce.request_cmd(draw);
/// dce.request(DceRequest::state_before(StateKey::default_framebuffer_color(ctx), swap));
/// let kept = dce.run()?.keep_live(&trace)?;
/// ```
pub struct DeadCodeElimination<'g, K = StateKey> {
    graph: &'g DepGraph<K>,
    requests: Vec<DceRequest<K>>,
}

impl<'g, K: IStateKey> DeadCodeElimination<'g, K> {
    pub fn new(graph: &'g DepGraph<K>) -> Self {
        Self { graph, requests: Vec::new() }
    }

    pub fn graph(&self) -> &'g DepGraph<K> {
        self.graph
    }
    pub fn requests(&self) -> &[DceRequest<K>] {
        &self.requests
    }

    pub fn request(&mut self, request: DceRequest<K>) -> &mut Self {
        self.requests.push(request);
        self
    }
    pub fn request_cmd(&mut self, pos: CmdPos) -> &mut Self {
        self.request(DceRequest::Cmd(pos))
    }
    pub fn request_final_state(&mut self, key: K) -> &mut Self {
        self.request(DceRequest::FinalState(key))
    }

    /// Resolves all requests and solves liveness. Any invalid request fails
    /// the whole run.
    pub fn run(&self) -> DceRes<DceResult> {
        let mut seeds = Vec::with_capacity(self.requests.len());
        let mut unresolved_requests = 0;
        for request in &self.requests {
            let writers = resolve_request(self.graph, request)?;
            if writers.is_empty() {
                log::debug!("request {request:?} needs no command: state comes from outside");
                unresolved_requests += 1;
            }
            seeds.extend(writers);
        }

        let live = solve(self.graph, &seeds)?;
        let stats = DceStats {
            total: self.graph.len(),
            live: live.live_count(),
            dead: live.dead_count(),
            forced: self.graph.stats().forced,
            requests: self.requests.len(),
            unresolved_requests,
        };
        log::info!(
            "DCE: kept {} of {} commands ({} dead, {} forced, {} requests)",
            stats.live,
            stats.total,
            stats.dead,
            stats.forced,
            stats.requests
        );
        Ok(DceResult { live, stats })
    }
}
