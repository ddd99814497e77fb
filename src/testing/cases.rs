//! End-to-end scenarios: mock GL trace -> graph -> liveness -> filtered trace.

use super::mock_gl::*;
use crate::{
    base::CmdPos,
    dce::{DceRequest, DeadCodeElimination, LivenessSet, filter, solve},
    graph::{DepGraph, GraphBuilder},
    key::{ContextID, ProgramID, StateKey, TextureID},
};

fn build(trace: &[GlCmd]) -> DepGraph {
    DepGraph::build(trace, &MockGl, &mut GlState::default()).unwrap()
}

fn live_of(trace: &[GlCmd], seeds: &[u32]) -> LivenessSet {
    let graph = build(trace);
    let seeds: Vec<CmdPos> = seeds.iter().map(|&p| CmdPos(p)).collect();
    solve(&graph, &seeds).unwrap()
}

fn positions(live: &LivenessSet) -> Vec<u32> {
    live.iter().map(|p| p.0).collect()
}

#[test]
fn draw_call_survival() {
    let trace = vec![
        link(1, &[(0, 1)]),
        use_program(1),
        GlCmd::Draw,
        GlCmd::Draw,
        GlCmd::Draw,
        GlCmd::Draw,
        GlCmd::Draw,
    ];
    let live = live_of(&trace, &[3]);
    assert_eq!(positions(&live), vec![0, 1, 3]);
    for draw in [2, 4, 5, 6] {
        assert!(!live.contains(CmdPos(draw)), "draw {draw} should be dead");
    }
}

#[test]
fn last_writer_wins() {
    let trace = vec![
        link(1, &[(0, 1), (1, 1)]),
        use_program(1),
        uniform(0, 1, 10),
        uniform(1, 1, 20),
        uniform(0, 1, 30),
        GlCmd::Draw,
    ];
    let live = live_of(&trace, &[5]);
    assert_eq!(positions(&live), vec![0, 1, 3, 4, 5]);
    assert_eq!(
        filter(&trace, &live).unwrap(),
        vec![
            link(1, &[(0, 1), (1, 1)]),
            use_program(1),
            uniform(1, 1, 20),
            uniform(0, 1, 30),
            GlCmd::Draw,
        ]
    );
}

#[test]
fn per_binding_isolation() {
    let trace = vec![
        link(1, &[(0, 1)]),
        link(2, &[(0, 1)]),
        use_program(1),
        uniform(0, 1, 1), // under program 1
        use_program(2),
        uniform(0, 1, 2), // under program 2
        use_program(1),
        GlCmd::Draw,
    ];
    let live = live_of(&trace, &[7]);
    assert!(live.contains(CmdPos(3)));
    assert!(!live.contains(CmdPos(5)));
    assert_eq!(positions(&live), vec![0, 2, 3, 6, 7]);
}

#[test]
fn array_and_scalar_uniforms_do_not_alias() {
    let trace = vec![
        link(1, &[(0, 1)]),
        use_program(1),
        uniform(0, 10, 1),
        uniform(0, 1, 2),
        GlCmd::Draw,
    ];
    let live = live_of(&trace, &[4]);
    assert!(!live.contains(CmdPos(2)));
    assert_eq!(positions(&live), vec![0, 1, 3, 4]);
}

#[test]
fn unhandled_commands_are_retained() {
    let trace = vec![
        link(1, &[]),
        GlCmd::Unknown("glHint".into()),
        use_program(1),
        GlCmd::Unknown("glDebugMessageInsert".into()),
        GlCmd::Clear,
        GlCmd::MakeCurrent(ContextID(0)),
        GlCmd::Draw,
    ];
    let live = live_of(&trace, &[]);
    assert_eq!(
        filter(&trace, &live).unwrap(),
        vec![
            GlCmd::Unknown("glHint".into()),
            GlCmd::Unknown("glDebugMessageInsert".into()),
            GlCmd::MakeCurrent(ContextID(0)),
        ]
    );

    let live = live_of(&trace, &[6]);
    assert_eq!(positions(&live), vec![0, 1, 2, 3, 5, 6]);
}

#[test]
fn classification_failure_is_forced_live() {
    // uniform write with no program bound cannot be classified.
    let trace = vec![uniform(0, 1, 5), link(1, &[]), use_program(1)];
    let graph = build(&trace);
    assert!(graph.node(CmdPos(0)).unwrap().behaviour.is_aborted());
    assert_eq!(positions(&solve(&graph, &[]).unwrap()), vec![0]);
}

#[test]
fn screen_writes_are_roots() {
    let trace = vec![
        link(1, &[]),
        use_program(1),
        GlCmd::Clear,
        GlCmd::Draw,
        GlCmd::Draw,
        GlCmd::SwapBuffers,
    ];
    let mut builder = GraphBuilder::new();
    builder.mark_root(StateKey::default_framebuffer_color(ContextID(0)));
    let graph = builder.run(&trace, &MockGl, &mut GlState::default()).unwrap();
    assert_eq!(positions(&solve(&graph, &[]).unwrap()), vec![0, 1, 2, 3, 4]);
}

#[test]
fn blending_keeps_earlier_draws() {
    let screen = StateKey::default_framebuffer_color(ContextID(0));
    let opaque = vec![
        link(1, &[]),
        use_program(1),
        GlCmd::Clear,
        GlCmd::Draw,
        GlCmd::Draw,
        GlCmd::SwapBuffers,
    ];
    let graph = build(&opaque);
    let mut dce = DeadCodeElimination::new(&graph);
    dce.request(DceRequest::state_before(screen.clone(), CmdPos(5)));
    assert_eq!(positions(&dce.run().unwrap().live), vec![0, 1, 4]);

    let blended = vec![
        link(1, &[]),
        use_program(1),
        GlCmd::Clear,
        GlCmd::EnableBlend,
        GlCmd::Draw,
        GlCmd::Draw,
        GlCmd::SwapBuffers,
    ];
    let graph = build(&blended);
    let mut dce = DeadCodeElimination::new(&graph);
    dce.request(DceRequest::state_before(screen, CmdPos(6)));
    assert_eq!(positions(&dce.run().unwrap().live), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn texture_levels_are_tracked_separately() {
    let tex = TextureID(5);
    let trace = vec![
        link(1, &[]),
        use_program(1),
        GlCmd::TexImage { texture: tex, level: 0 },
        GlCmd::TexImage { texture: tex, level: 1 },
        GlCmd::TexImage { texture: tex, level: 0 },
        GlCmd::BindTexture(tex),
        GlCmd::Draw,
    ];
    let live = live_of(&trace, &[6]);
    assert_eq!(positions(&live), vec![0, 1, 4, 5, 6]);
}

#[test]
fn contexts_are_isolated() {
    let trace = vec![
        GlCmd::MakeCurrent(ContextID(1)),
        link(1, &[(0, 1)]),
        use_program(1),
        uniform(0, 1, 1),
        GlCmd::MakeCurrent(ContextID(2)),
        link(1, &[(0, 1)]),
        use_program(1),
        uniform(0, 1, 2),
        GlCmd::MakeCurrent(ContextID(1)),
        GlCmd::Draw,
    ];
    let live = live_of(&trace, &[9]);
    assert_eq!(positions(&live), vec![0, 1, 2, 3, 4, 8, 9]);
}

#[test]
fn driver_loop_advances_state() {
    let trace = vec![link(1, &[(0, 1)]), link(2, &[]), use_program(2), uniform(3, 1, 7)];
    let mut state = GlState::default();
    let graph = DepGraph::build(&trace, &MockGl, &mut state).unwrap();
    assert_eq!(graph.len(), 4);
    assert_eq!(state.programs.len(), 2);
    assert_eq!(state.program, Some(ProgramID(2)));
    let key = StateKey::Uniform {
        ctx: ContextID(0),
        program: ProgramID(2),
        location: 3,
        count: 1,
    };
    assert_eq!(state.uniform_values.get(&key), Some(&7));
    assert_eq!(graph.deps_of(CmdPos(3)), &[CmdPos(2)]);
}

#[test]
fn whole_program_read_keeps_uniform_writes() {
    // program 1 was never linked, so the draw cannot name its uniforms and
    // reads all of them.
    let trace = vec![use_program(1), uniform(0, 1, 7), GlCmd::Draw];
    let live = live_of(&trace, &[2]);
    assert_eq!(positions(&live), vec![0, 1, 2]);
}

#[test]
fn relink_resets_earlier_uniforms() {
    let trace = vec![
        link(1, &[(0, 1)]),
        use_program(1),
        uniform(0, 1, 5),
        link(1, &[(0, 1)]),
        GlCmd::Draw,
    ];
    let live = live_of(&trace, &[4]);
    assert_eq!(positions(&live), vec![0, 1, 3, 4]);

    let mut state = GlState::default();
    DepGraph::build(&filter(&trace, &live).unwrap(), &MockGl, &mut state).unwrap();
    assert!(state.uniform_values.is_empty());
}

#[test]
fn uniform_after_relink_survives() {
    let trace = vec![
        link(1, &[(0, 1)]),
        use_program(1),
        uniform(0, 1, 5),
        link(1, &[(0, 1)]),
        uniform(0, 1, 6),
        GlCmd::Draw,
    ];
    let mut state = GlState::default();
    let graph = DepGraph::build(&trace, &MockGl, &mut state).unwrap();
    let key = StateKey::Uniform {
        ctx: ContextID(0),
        program: ProgramID(1),
        location: 0,
        count: 1,
    };
    assert_eq!(state.uniform_values.get(&key), Some(&6));
    assert_eq!(positions(&solve(&graph, &[CmdPos(5)]).unwrap()), vec![0, 1, 4, 5]);
}
