use crate::{
    base::CmdPos,
    dce::{DceErr, DceRes, LivenessSet},
};

fn check_len<C>(trace: &[C], live: &LivenessSet) -> DceRes {
    if trace.len() != live.trace_len() {
        return Err(DceErr::TraceLenMismatch { trace: trace.len(), live: live.trace_len() });
    }
    Ok(())
}

/// Live commands of `trace` with their positions, in trace order.
pub fn filter_iter<'t, C>(
    trace: &'t [C],
    live: &'t LivenessSet,
) -> DceRes<impl Iterator<Item = (CmdPos, &'t C)> + 't> {
    check_len(trace, live)?;
    Ok(live.iter().map(move |pos| (pos, &trace[pos.index()])))
}

/// Projects `trace` down to its live subsequence. Never reorders.
pub fn filter<C: Clone>(trace: &[C], live: &LivenessSet) -> DceRes<Vec<C>> {
    let mut kept = Vec::with_capacity(live.live_count());
    kept.extend(filter_iter(trace, live)?.map(|(_, cmd)| cmd.clone()));
    Ok(kept)
}
