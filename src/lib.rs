//! # tracedce
//!
//! Dependency tracking and dead code elimination for captured GPU command
//! traces.
//!
//! Given an ordered trace of stateful API calls and a pluggable
//! [`IBehaviourProvider`] that reports what each call reads and writes, this
//! crate builds a dependency graph in one forward pass, computes which calls
//! are needed to reproduce a set of requested outputs, and projects the trace
//! down to those calls:
//!
//! ```ignore
//! let graph = build(&trace, &provider, &mut initial_state)?;
//! let live = solve(&graph, &[CmdPos(draw)])?;
//! let kept = filter(&trace, &live)?;
//! ```

pub mod base;
pub mod behaviour;
pub mod dce;
pub mod graph;
pub mod key;

#[cfg(test)]
mod testing;

pub use self::{
    base::CmdPos,
    behaviour::{BehaviourFlags, CmdBehaviour, IBehaviourProvider},
    dce::{
        DceErr, DceRequest, DceRes, DceResult, DceStats, DeadCodeElimination, LivenessSet, filter,
        filter_iter, solve, solve_batch,
    },
    graph::{
        BuildOptions, DepGraph, ForceReason, GraphBuilder, GraphErr, GraphNode, GraphRes,
        GraphStats, build,
    },
    key::{IStateKey, StateKey},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
