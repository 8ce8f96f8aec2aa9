//! # component-state
//!
//! Keep UI component local state in a centralized store, keyed per component
//! instance, instead of in the component itself.
//!
//! ## Building blocks
//!
//! - [`action::set_state`] - builds the state-update [`Action`] for a component key
//! - [`reducer::reduce`] - folds updates into the keyed [`ComponentStates`] slice
//! - [`connect`] - gives a [`Component`] a [`LocalState`] handle whose writes are
//!   dispatched to the store and whose reads come back from it
//! - [`utils`] - assertion helper and random component keys
//!
//! ## Store
//!
//! - [`Store`] - thread-safe reducer store with subscribers
//! - [`StoreContext`] - locates a store by binding name for connected components

pub mod action;
pub mod connect;
pub mod error;
pub mod reducer;
pub mod store;
pub mod utils;

// Re-export main types for convenience
pub use action::{set_state, Action, ComponentKey, StateMap, Updater, SET_STATE};
pub use connect::{connect_component_state, Component, ConnectOptions, Connected, LocalState};
pub use error::{Error, Result};
pub use reducer::{reduce, ComponentStates};
pub use store::{Store, StoreContext};
