//! Definition checks run by [`StateMachineBuilder::build`].
//!
//! Every check contributes a `Validation`, so a misconfigured machine
//! reports all problems at once instead of failing on the first.
//!
//! [`StateMachineBuilder::build`]: crate::builder::StateMachineBuilder::build

use crate::builder::error::{BuildError, ConfigError};
use crate::builder::state::StateBuilder;
use crate::core::{StateTree, Transition, TransitionKind, ROOT};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub(crate) type Checked = Validation<(), NonEmptyVec<ConfigError>>;

fn check(ok: bool, error: impl FnOnce() -> ConfigError) -> Checked {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(error())
    }
}

/// Checks on raw builder ids, before the tree is flattened.
pub(crate) fn check_states<D, P>(root: &StateBuilder<D, P>) -> Checked {
    let mut checks: Vec<Checked> = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![root];

    while let Some(state) = stack.pop() {
        checks.push(check(state.id != 0, || ConfigError::ReservedStateId {
            name: state.name.clone().unwrap_or_default(),
        }));
        if state.id != 0 {
            checks.push(check(seen.insert(state.id), || {
                ConfigError::DuplicateStateId { id: state.id }
            }));
        }
        if let Some(target) = state.initial {
            checks.push(check(target != 0, || ConfigError::UnknownInitialTarget {
                state: state.id,
                target,
            }));
        }
        stack.extend(state.children.iter().rev());
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Checks on the flattened tree and the transition table.
pub(crate) fn check_definition<D, P>(
    tree: &StateTree<D, P>,
    transitions: &[Transition<D, P>],
) -> Checked {
    let mut checks: Vec<Checked> = Vec::new();

    for state in tree.states() {
        let Some(initial) = state.initial() else {
            continue;
        };
        let (state, target) = (state.id(), initial.target());
        if tree.find_by_id(target).is_none() {
            checks.push(Validation::fail(ConfigError::UnknownInitialTarget {
                state: state.get(),
                target: target.get(),
            }));
        } else {
            checks.push(check(tree.is_descendant(state, target), || {
                ConfigError::InitialNotDescendant {
                    state: state.get(),
                    target: target.get(),
                }
            }));
        }
    }

    for (index, transition) in transitions.iter().enumerate() {
        checks.push(check_transition(tree, index, transition));
    }

    Validation::all_vec(checks).map(|_| ())
}

fn check_transition<D, P>(
    tree: &StateTree<D, P>,
    index: usize,
    transition: &Transition<D, P>,
) -> Checked {
    let state = transition.source.get();
    let Some(source) = tree.index_of(transition.source) else {
        return Validation::fail(ConfigError::UnknownSource { index, state });
    };

    let Some(target_id) = transition.target else {
        return check(!transition.is_completion(), || {
            ConfigError::CompletionWithoutTarget { index, state }
        });
    };
    let target = target_id.get();
    let Some(target_ix) = tree.index_of(target_id) else {
        return Validation::fail(ConfigError::UnknownTarget { index, target });
    };

    match transition.kind(tree) {
        TransitionKind::SelfTransition | TransitionKind::External if source != ROOT => {
            let reachable = tree.parent(source).is_some_and(|parent| {
                parent == target_ix || tree.is_descendant_ix(parent, target_ix)
            });
            check(reachable, || ConfigError::UnreachableTarget {
                index,
                state,
                target,
            })
        }
        _ => Validation::success(()),
    }
}

/// Collapse accumulated problems into a build error.
pub(crate) fn into_result(checked: Checked) -> Result<(), BuildError> {
    match checked {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(BuildError::Invalid(errors.iter().cloned().collect())),
    }
}
