use crate::{
    base::CmdPos,
    dce::{DceRes, LivenessSet, solve},
    graph::DepGraph,
    key::IStateKey,
};

/// Answers many independent liveness queries over one graph.
///
/// The graph is only read, so with the `rayon` feature the queries run in
/// parallel without any locking. Results come back in query order either way.
#[cfg(feature = "rayon")]
pub fn solve_batch<K>(graph: &DepGraph<K>, queries: &[Vec<CmdPos>]) -> DceRes<Vec<LivenessSet>>
where
    K: IStateKey + Send + Sync,
{
    use rayon::prelude::*;
    queries.par_iter().map(|seeds| solve(graph, seeds)).collect()
}

/// Answers many independent liveness queries over one graph.
///
/// Built without the `rayon` feature: queries are solved one after another.
#[cfg(not(feature = "rayon"))]
pub fn solve_batch<K>(graph: &DepGraph<K>, queries: &[Vec<CmdPos>]) -> DceRes<Vec<LivenessSet>>
where
    K: IStateKey + Send + Sync,
{
    queries.iter().map(|seeds| solve(graph, seeds)).collect()
}
