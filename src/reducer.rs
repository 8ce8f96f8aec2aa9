//! Folds component state updates into the keyed state slice.

use crate::action::{Action, ComponentKey, ComponentStateAction, StateMap};
use std::collections::HashMap;

/// The slice of global state owned by this crate: one entry per component key.
pub type ComponentStates = HashMap<ComponentKey, StateMap>;

/// Reducer transforms state based on actions.
///
/// It must be a pure function: (State, Action) -> State
pub trait Reducer {
    type State;
    type Action;

    fn reduce(state: Self::State, action: &Self::Action) -> Self::State;
}

/// [`Reducer`] for the component state slice, backed by [`reduce`].
pub struct ComponentStateReducer;

impl Reducer for ComponentStateReducer {
    type State = ComponentStates;
    type Action = Action;

    fn reduce(state: ComponentStates, action: &Action) -> ComponentStates {
        reduce(state, action)
    }
}

/// Apply `action` to the component state slice.
///
/// An update replaces the entry for its key wholesale, unless it is an
/// initializing update and the key already has an entry. Initialization is
/// first-write-wins. Actions without a component state payload leave the
/// slice untouched.
pub fn reduce<A>(mut state: ComponentStates, action: &A) -> ComponentStates
where
    A: ComponentStateAction + ?Sized,
{
    let Some(payload) = action.component_state() else {
        return state;
    };

    if payload.initializing && state.contains_key(&payload.component_key) {
        tracing::trace!(
            key = %payload.component_key,
            "initializing update ignored, entry already exists"
        );
        return state;
    }

    state.insert(payload.component_key.clone(), payload.new_state.clone());
    state
}
