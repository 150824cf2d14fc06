//! State machine driving a hierarchical state tree.

use crate::builder::MachineConfig;
use crate::core::{EventId, StateId, StateTree, Transition, TransitionHistory, ROOT};
use crate::engine::error::MachineError;
use crate::engine::executor::Executor;
use crate::engine::pool::TriggerPool;
use std::fmt;
use uuid::Uuid;

/// Reentrancy guard. `Processing` only for the extent of `init`, one
/// `dispatch`/`step` pass, or `terminate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Processing,
}

/// Mutable part of a machine. Everything a callback may touch lives here.
pub(crate) struct Runtime<D, P> {
    pub(crate) data: D,
    pub(crate) active: Vec<bool>,
    pub(crate) pool: TriggerPool<P>,
    pub(crate) phase: Phase,
    pub(crate) pass: u64,
    pub(crate) terminate_requested: bool,
    pub(crate) history: TransitionHistory,
}

impl<D, P> Runtime<D, P> {
    /// Admit `event` into the pool. Admissions made while processing are
    /// deferred to a later pass.
    pub(crate) fn admit<F>(&mut self, event: EventId, payload: F) -> usize
    where
        F: Fn() -> Option<P>,
    {
        if event.is_none() {
            tracing::warn!("ignoring dispatch of the completion sentinel event");
            return 0;
        }
        let deferred = self.phase == Phase::Processing;
        let admitted = self.pool.admit(event, payload, self.pass, deferred);
        tracing::debug!(?event, admitted, deferred, "admitted event");
        admitted
    }

    fn begin(&mut self) -> u64 {
        self.phase = Phase::Processing;
        self.pass += 1;
        self.pass
    }
}

/// A hierarchical state machine.
///
/// `D` is the domain data callbacks read and write; `P` is the payload type
/// events may carry.
///
/// # Example
///
/// ```rust
/// use statechart::builder::{StateBuilder, StateMachineBuilder, TransitionBuilder};
///
/// let mut machine = StateMachineBuilder::<u32, ()>::new(0)
///     .root(
///         StateBuilder::new(1u16)
///             .initial(2u16)
///             .child(StateBuilder::new(2u16))
///             .child(StateBuilder::<u32, ()>::new(3u16).on_entry(|ctx, _, _| *ctx.data_mut() += 1)),
///     )
///     .transition(TransitionBuilder::new().from(2u16).to(3u16).on(b'g'))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.init().unwrap().get(), 2);
/// assert_eq!(machine.dispatch(b'g').map(|id| id.get()), Some(3));
/// assert_eq!(*machine.data(), 1);
///
/// machine.terminate();
/// assert_eq!(machine.active_state(), None);
/// ```
pub struct StateMachine<D, P = ()> {
    config: MachineConfig,
    instance: Uuid,
    tree: StateTree<D, P>,
    transitions: Vec<Transition<D, P>>,
    rt: Runtime<D, P>,
}

impl<D, P> StateMachine<D, P> {
    /// Assemble a machine from a validated tree and transition table.
    pub(crate) fn new(
        config: MachineConfig,
        tree: StateTree<D, P>,
        transitions: Vec<Transition<D, P>>,
        data: D,
    ) -> Self {
        let rt = Runtime {
            data,
            active: vec![false; tree.len()],
            pool: TriggerPool::new(transitions.iter().map(|transition| transition.event)),
            phase: Phase::Idle,
            pass: 0,
            terminate_requested: false,
            history: TransitionHistory::with_capacity(config.history_capacity),
        };
        Self {
            config,
            instance: Uuid::new_v4(),
            tree,
            transitions,
            rt,
        }
    }

    fn executor(&mut self) -> Executor<'_, D, P> {
        Executor::new(&self.tree, &self.transitions, &mut self.rt)
    }

    /// Activate the initial configuration by entering the root and
    /// following initial transitions down to a leaf.
    pub fn init(&mut self) -> Result<StateId, MachineError> {
        if self.is_running() {
            return Err(MachineError::AlreadyInitialized {
                machine: self.config.name.clone(),
            });
        }
        tracing::info!(machine = %self.config.name, instance = %self.instance, "initializing state machine");
        self.rt.begin();
        self.executor().enter(ROOT, None, None);
        self.settle();
        self.active_state()
            .ok_or_else(|| MachineError::TerminatedDuringInit {
                machine: self.config.name.clone(),
            })
    }

    /// Admit `event` and, if anything was admitted, run one processing pass.
    /// Returns the innermost active state afterwards.
    pub fn dispatch(&mut self, event: impl Into<EventId>) -> Option<StateId> {
        self.dispatch_inner(event.into(), || None)
    }

    /// Like [`dispatch`](Self::dispatch), attaching `payload` to every
    /// admitted transition slot.
    pub fn dispatch_with(&mut self, event: impl Into<EventId>, payload: P) -> Option<StateId>
    where
        P: Clone,
    {
        self.dispatch_inner(event.into(), move || Some(payload.clone()))
    }

    fn dispatch_inner<F>(&mut self, event: EventId, payload: F) -> Option<StateId>
    where
        F: Fn() -> Option<P>,
    {
        if !self.is_running() {
            tracing::debug!(?event, "ignoring event for inert state machine");
            return None;
        }
        let admitted = self.rt.admit(event, payload);
        if admitted > 0 && self.rt.phase == Phase::Idle {
            self.run_pass(Some(event));
        }
        self.active_state()
    }

    /// Run one pass without a new event: completion transitions and
    /// previously admitted slots get a chance to fire.
    pub fn step(&mut self) -> Option<StateId> {
        if !self.is_running() {
            return None;
        }
        self.run_pass(None);
        self.active_state()
    }

    fn run_pass(&mut self, offer: Option<EventId>) {
        let pass = self.rt.begin();
        let span = tracing::debug_span!("pass", machine = %self.config.name, pass, offer = ?offer);
        let _entered = span.enter();

        let settled = self.executor().process(ROOT, offer);
        let discarded = self.rt.pool.discard_stale(pass, offer);
        if settled.is_none() {
            tracing::trace!(discarded, "pass settled without a transition");
        }
        self.settle();
    }

    /// Carry out a termination requested by a callback, then go idle.
    fn settle(&mut self) {
        if std::mem::take(&mut self.rt.terminate_requested) {
            self.exit_all();
        }
        self.rt.phase = Phase::Idle;
    }

    fn exit_all(&mut self) {
        self.executor().exit(ROOT, None);
        self.rt.pool.clear();
        self.rt.terminate_requested = false;
        tracing::info!(machine = %self.config.name, instance = %self.instance, "state machine terminated");
    }

    /// Exit the whole active configuration, innermost states first.
    /// Calling this on an inert machine does nothing.
    pub fn terminate(&mut self) {
        if !self.is_running() {
            return;
        }
        self.rt.phase = Phase::Processing;
        self.exit_all();
        self.rt.phase = Phase::Idle;
    }

    /// Innermost active state, or `None` if uninitialized or terminated.
    pub fn active_state(&self) -> Option<StateId> {
        self.tree
            .active_leaf(ROOT, &self.rt.active)
            .map(|ix| self.tree.id_of(ix))
    }

    /// The active path from the root to the innermost active state.
    pub fn active_configuration(&self) -> Vec<StateId> {
        self.tree
            .active_path(&self.rt.active)
            .into_iter()
            .map(|ix| self.tree.id_of(ix))
            .collect()
    }

    pub fn is_active(&self, id: StateId) -> bool {
        self.tree
            .index_of(id)
            .is_some_and(|ix| self.rt.active[ix])
    }

    /// Whether the machine has been initialized and not terminated.
    pub fn is_running(&self) -> bool {
        self.rt.active[ROOT]
    }

    pub fn data(&self) -> &D {
        &self.rt.data
    }

    /// Domain data, for drivers updating inputs between calls.
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.rt.data
    }

    pub fn tree(&self) -> &StateTree<D, P> {
        &self.tree
    }

    pub fn transitions(&self) -> &[Transition<D, P>] {
        &self.transitions
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.rt.history
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance
    }

    /// Number of transition slots holding an admitted, unprocessed event.
    pub fn pending_count(&self) -> usize {
        self.rt.pool.pending_count()
    }

    /// Whether the slot of transition `index` (declaration order) is pending.
    pub fn is_pending(&self, index: usize) -> bool {
        self.rt.pool.is_pending(index)
    }
}

impl<D: fmt::Debug, P> fmt::Debug for StateMachine<D, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.config.name)
            .field("instance", &self.instance)
            .field("active", &self.active_configuration())
            .field("pending", &self.pending_count())
            .field("data", &self.rt.data)
            .finish()
    }
}
