//! Property-based tests for the execution engine.
//!
//! These tests use proptest to drive a fixed machine through random
//! sequences of operations and check that its invariants hold after each
//! one.

use proptest::prelude::*;
use statechart::builder::{StateBuilder, StateMachineBuilder, TransitionBuilder};
use statechart::core::{EventId, StateId, TransitionHistory};
use statechart::{Context, StateMachine, Trigger};

#[derive(Debug, Default)]
struct World {
    /// `(true, id)` for an entry, `(false, id)` for an exit.
    trace: Vec<(bool, u16)>,
    ready: bool,
    repeated_admissions: Vec<usize>,
}

type Ctx<'a> = Context<'a, World, ()>;

fn enter(ctx: &mut Ctx<'_>, id: StateId, _: Option<&Trigger<()>>) {
    ctx.data_mut().trace.push((true, id.get()));
}

fn exit(ctx: &mut Ctx<'_>, id: StateId, _: Option<&Trigger<()>>) {
    ctx.data_mut().trace.push((false, id.get()));
}

fn state(id: u16) -> StateBuilder<World, ()> {
    StateBuilder::new(id).on_entry(enter).on_exit(exit)
}

fn on(from: u16, to: u16, event: u8) -> TransitionBuilder<World, ()> {
    TransitionBuilder::new().from(from).to(to).on(event)
}

fn when_ready(from: u16, to: u16) -> TransitionBuilder<World, ()> {
    TransitionBuilder::new()
        .from(from)
        .to(to)
        .when(|ctx: &Ctx<'_>, _| ctx.data().ready)
}

const HISTORY: usize = 8;

// 1 ─┬─ 2 ─┬─ 3
//    │     └─ 4
//    └─ 5 ─┬─ 6
//          └─ 7
fn world() -> StateMachine<World, ()> {
    let transitions = vec![
        on(3, 4, b'a'),
        on(4, 3, b'a'),
        on(2, 5, b'b'),
        on(5, 2, b'b'),
        on(6, 7, b'c'),
        on(7, 6, b'd'),
        on(1, 4, b'd'),
        on(2, 2, b'e'),
        on(1, 1, b'f'),
        on(3, 2, b'e'),
        on(5, 7, b'a'),
        TransitionBuilder::<World, ()>::new().from(2u16).on(b'c').effect(|ctx, _| {
            ctx.dispatch(b'a');
            let again = ctx.dispatch(b'a');
            ctx.data_mut().repeated_admissions.push(again);
        }),
        when_ready(4, 3),
        when_ready(7, 5),
    ];

    let mut builder = StateMachineBuilder::new(World::default())
        .history_capacity(HISTORY)
        .root(
            state(1)
                .initial(2u16)
                .child(state(2).initial(3u16).child(state(3)).child(state(4)))
                .child(state(5).initial(6u16).child(state(6)).child(state(7))),
        );
    for transition in transitions {
        builder = builder.transition(transition).unwrap();
    }
    builder.build().unwrap()
}

#[derive(Debug, Clone)]
enum Op {
    Dispatch(u8),
    Step,
    Toggle,
    Terminate,
    Init,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => (b'a'..=b'g').prop_map(Op::Dispatch),
        2 => Just(Op::Step),
        1 => Just(Op::Toggle),
        1 => Just(Op::Terminate),
        1 => Just(Op::Init),
    ]
}

fn apply(machine: &mut StateMachine<World, ()>, op: &Op) {
    match op {
        Op::Dispatch(event) => {
            machine.dispatch(*event);
        }
        Op::Step => {
            machine.step();
        }
        Op::Toggle => {
            let ready = machine.data().ready;
            machine.data_mut().ready = !ready;
        }
        Op::Terminate => machine.terminate(),
        Op::Init => {
            let _ = machine.init();
        }
    }
}

fn assert_single_path(machine: &StateMachine<World, ()>) -> Result<(), TestCaseError> {
    let tree = machine.tree();
    for state in tree.states() {
        let id = state.id();
        let active_children = tree
            .children_of(id)
            .into_iter()
            .filter(|&child| machine.is_active(child))
            .count();
        prop_assert!(active_children <= 1, "state {} has {} active children", id, active_children);

        if machine.is_active(id) {
            if let Some(parent) = tree.ancestor_of(id) {
                prop_assert!(machine.is_active(parent), "state {} active under inactive parent", id);
            }
        }
    }

    let leaf = machine.active_state();
    prop_assert_eq!(machine.active_configuration().last().copied(), leaf);
    if let Some(leaf) = leaf {
        prop_assert!(tree.find_by_id(leaf).is_some_and(|state| state.is_leaf()));
    }
    prop_assert_eq!(machine.is_running(), leaf.is_some());
    Ok(())
}

/// Replay entries and exits on a stack: a state is entered only below the
/// current innermost state and exited only when it is innermost.
fn assert_nested_callbacks(machine: &StateMachine<World, ()>) -> Result<(), TestCaseError> {
    let tree = machine.tree();
    let mut stack: Vec<u16> = Vec::new();
    for &(entered, id) in &machine.data().trace {
        let state = StateId::new(id).ok_or_else(|| TestCaseError::fail("zero id in trace"))?;
        if entered {
            let parent = tree.ancestor_of(state).map(StateId::get);
            prop_assert_eq!(parent, stack.last().copied(), "entered {} out of order", id);
            stack.push(id);
        } else {
            prop_assert_eq!(stack.pop(), Some(id), "exited {} out of order", id);
        }
    }

    let expected: Vec<u16> = machine
        .active_configuration()
        .into_iter()
        .map(StateId::get)
        .collect();
    prop_assert_eq!(stack, expected);
    Ok(())
}

proptest! {
    #[test]
    fn exactly_one_active_path(ops in prop::collection::vec(op(), 0..40)) {
        let mut machine = world();
        machine.init().unwrap();
        assert_single_path(&machine)?;

        for op in &ops {
            apply(&mut machine, op);
            assert_single_path(&machine)?;
        }
    }

    #[test]
    fn entries_and_exits_nest(ops in prop::collection::vec(op(), 0..40)) {
        let mut machine = world();
        machine.init().unwrap();
        for op in &ops {
            apply(&mut machine, op);
        }
        assert_nested_callbacks(&machine)?;
    }

    #[test]
    fn terminate_is_idempotent(ops in prop::collection::vec(op(), 0..30)) {
        let mut machine = world();
        machine.init().unwrap();
        for op in &ops {
            apply(&mut machine, op);
        }

        machine.terminate();
        let trace_len = machine.data().trace.len();
        prop_assert_eq!(machine.active_state(), None);

        machine.terminate();
        prop_assert_eq!(machine.data().trace.len(), trace_len);
        prop_assert_eq!(machine.active_state(), None);
        prop_assert_eq!(machine.pending_count(), 0);
        prop_assert_eq!(machine.dispatch(b'a'), None);
    }

    #[test]
    fn repeated_admission_is_deduplicated(ops in prop::collection::vec(op(), 0..40)) {
        let mut machine = world();
        machine.init().unwrap();
        for op in &ops {
            apply(&mut machine, op);
            let slots_for_a = machine
                .transitions()
                .iter()
                .filter(|transition| transition.event == EventId::from(b'a'))
                .count();
            prop_assert!(machine.pending_count() <= slots_for_a);
        }
        prop_assert!(machine.data().repeated_admissions.iter().all(|&again| again == 0));
    }

    #[test]
    fn history_stays_bounded(ops in prop::collection::vec(op(), 0..60)) {
        let mut machine = world();
        machine.init().unwrap();
        for op in &ops {
            apply(&mut machine, op);
            prop_assert!(machine.history().len() <= HISTORY);
        }
    }

    #[test]
    fn history_roundtrip_serialization(ops in prop::collection::vec(op(), 0..20)) {
        let mut machine = world();
        machine.init().unwrap();
        for op in &ops {
            apply(&mut machine, op);
        }

        let json = serde_json::to_string(machine.history()).unwrap();
        let restored: TransitionHistory = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored.len(), machine.history().len());
        prop_assert_eq!(restored.get_path(), machine.history().get_path());
    }
}
