//! Export a dependency graph to Graphviz format.

use smallvec::SmallVec;
use std::io::Write;

use crate::{
    dce::LivenessSet,
    graph::DepGraph,
    key::IStateKey,
};

/// Writes `graph` as a `digraph`. Edges point from a reader to the writer it
/// depends on. With `live`, dead commands are drawn grey and dashed.
pub fn write_graph_dot<K: IStateKey>(
    graph: &DepGraph<K>,
    out: &mut dyn Write,
    live: Option<&LivenessSet>,
) -> std::io::Result<()> {
    writeln!(out, "digraph \"deps\" {{")?;
    writeln!(out, "    rankdir=BT;")?;

    let mut reasons = vec![SmallVec::<[&str; 2]>::new(); graph.len()];
    for &(pos, reason) in graph.forced_seeds() {
        reasons[pos.index()].push(reason.as_str());
    }
    for node in graph.nodes() {
        let idx = node.pos.index();
        let label = match reasons[idx].as_slice() {
            [] => format!("{}", node.pos),
            why => format!("{} ({})", node.pos, why.join(", ")),
        };
        let style = match live {
            Some(live) if !live.contains(node.pos) => " color=grey fontcolor=grey style=dashed",
            _ => "",
        };
        writeln!(out, "    {idx} [label=\"{label}\" shape=box{style}];")?;
    }
    for node in graph.nodes() {
        for dep in &node.deps {
            writeln!(out, "    {} -> {};", node.pos.index(), dep.index())?;
        }
    }
    writeln!(out, "}}")
}
