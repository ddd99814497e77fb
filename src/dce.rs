//! Dead code elimination over a built [`DepGraph`](crate::graph::DepGraph).
//!
//! Liveness is plain backward reachability: start from the requested commands
//! plus every forced command (root writes, keep-alive, aborted) and follow
//! dependency edges until nothing new is reached. The result only depends on
//! the graph and the seed set, so solving is deterministic and idempotent and
//! a bigger seed set never yields a smaller live set.

use crate::{base::CmdPos, graph::GraphErr};

mod batch;
mod filter;
mod liveset;
mod mark;
mod pass;
mod request;

pub use self::{
    batch::solve_batch,
    filter::{filter, filter_iter},
    liveset::LivenessSet,
    mark::solve,
    pass::{DceResult, DceStats, DeadCodeElimination},
    request::{DceRequest, resolve_request},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DceErr {
    #[error("seed {pos} is outside the trace of {len} commands")]
    SeedOutOfRange { pos: CmdPos, len: usize },

    #[error("liveness set covers {live} commands but the trace has {trace}")]
    TraceLenMismatch { trace: usize, live: usize },

    #[error("state requests need a graph built with `record_history`")]
    HistoryNotRecorded,

    #[error("graph error: {0}")]
    Graph(#[from] GraphErr),
}
pub type DceRes<T = ()> = Result<T, DceErr>;
