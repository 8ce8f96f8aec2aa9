//! The state-update action and its creator.

use crate::error::{kind_of, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

/// Type marker carried by every component state update on the wire.
pub const SET_STATE: &str = "@@component-state/UPDATE_COMPONENT_STATE";

/// One component's local state.
pub type StateMap = serde_json::Map<String, Value>;

/// Identifies the state slot of one component instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKey(String);

impl ComponentKey {
    /// Wrap an explicit key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ComponentKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for ComponentKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ComponentKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Body of a component state update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatePayload {
    pub component_key: ComponentKey,
    pub new_state: StateMap,
    /// Marks the instance's first write; ignored by the reducer if the key
    /// already has an entry.
    pub initializing: bool,
}

/// Actions understood by the component state reducer.
///
/// Serializes as `{"type": SET_STATE, "payload": {..}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    // Must match `SET_STATE`.
    #[serde(rename = "@@component-state/UPDATE_COMPONENT_STATE")]
    UpdateComponentState(SetStatePayload),
}

impl Action {
    /// The update carried by this action.
    pub fn payload(&self) -> &SetStatePayload {
        match self {
            Action::UpdateComponentState(payload) => payload,
        }
    }
}

/// Lets an application action type carry component state updates.
///
/// The reducer only looks at actions that return a payload here and passes
/// every other action through.
pub trait ComponentStateAction {
    /// The component state update this action carries, if any.
    fn component_state(&self) -> Option<&SetStatePayload>;
}

impl ComponentStateAction for Action {
    fn component_state(&self) -> Option<&SetStatePayload> {
        Some(self.payload())
    }
}

/// A requested change to a component's state.
pub enum Updater<P> {
    /// Shallow-merged onto the current state; keys here win.
    Merge(StateMap),
    /// Computes the next state from the current state and props.
    Compute(Box<dyn FnOnce(&StateMap, &P) -> StateMap>),
}

impl<P> Updater<P> {
    /// Box `f` into a [`Updater::Compute`].
    pub fn compute<F>(f: F) -> Self
    where
        F: FnOnce(&StateMap, &P) -> StateMap + 'static,
    {
        Updater::Compute(Box::new(f))
    }

    /// Convert an untyped updater. Only objects are accepted.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(patch) => Ok(Updater::Merge(patch)),
            other => Err(Error::InvalidUpdater {
                found: kind_of(&other),
            }),
        }
    }

    fn apply(self, current: &StateMap, props: &P) -> StateMap {
        match self {
            Updater::Merge(patch) => {
                let mut merged = current.clone();
                merged.extend(patch);
                merged
            }
            // TODO: sequence behind updates that are still in flight once the
            // store exposes a completion hook.
            Updater::Compute(f) => f(current, props),
        }
    }
}

impl<P> From<StateMap> for Updater<P> {
    fn from(patch: StateMap) -> Self {
        Updater::Merge(patch)
    }
}

impl<P> fmt::Debug for Updater<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Updater::Merge(patch) => f.debug_tuple("Merge").field(patch).finish(),
            Updater::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

/// Anything with a current local state and props, typically a mounted
/// component's [`LocalState`](crate::connect::LocalState).
pub trait Element {
    type Props;

    /// Current local state, `None` if never set.
    fn current_state(&self) -> Option<&StateMap>;

    /// Props passed to [`Updater::Compute`].
    fn props(&self) -> &Self::Props;
}

/// Build the update action for `component_key`.
///
/// The element's current state (empty if unset) is the merge base for a
/// [`Updater::Merge`] and the input of a [`Updater::Compute`]. Nothing is
/// dispatched.
pub fn set_state<E: Element>(
    updater: Updater<E::Props>,
    component_key: ComponentKey,
    element: &E,
    initializing: bool,
) -> Action {
    let empty = StateMap::new();
    let current = element.current_state().unwrap_or(&empty);
    let new_state = updater.apply(current, element.props());

    Action::UpdateComponentState(SetStatePayload {
        component_key,
        new_state,
        initializing,
    })
}
