//! Host store integration.
//!
//! Connected components only need two things from a store: a way to dispatch
//! [`Action`]s and a way to read back the state stored under their key. Those
//! are captured by [`StoreHandle`]. [`Store`] is a small synchronous reducer
//! store implementing it, and [`StoreContext`] locates a handle by binding name.

mod context;
mod store;

pub use context::StoreContext;
pub use store::Store;

use crate::action::{Action, ComponentKey, StateMap};
use crate::reducer::ComponentStates;
use std::collections::HashMap;

/// Locates the component state slice inside a global state value.
pub trait ComponentStateSource {
    fn component_states(&self, slice: &str) -> Option<&ComponentStates>;
}

/// The slice itself, used as the whole state. The name is not checked.
impl ComponentStateSource for ComponentStates {
    fn component_states(&self, _slice: &str) -> Option<&ComponentStates> {
        Some(self)
    }
}

impl ComponentStateSource for HashMap<String, ComponentStates> {
    fn component_states(&self, slice: &str) -> Option<&ComponentStates> {
        self.get(slice)
    }
}

/// Dispatch and selection surface a connected component uses.
pub trait StoreHandle: Send + Sync {
    fn dispatch(&self, action: Action);

    /// State stored for `key` in the slice named `slice`, if any.
    fn select(&self, slice: &str, key: &ComponentKey) -> Option<StateMap>;
}
