use crate::action::{self, ComponentKey, Element, StateMap, Updater};
use crate::error::{kind_of, Error, Result};
use crate::store::StoreHandle;
use serde_json::Value;
use std::sync::Arc;

/// Progress of the one-time initializing dispatch.
#[derive(Debug, Clone, PartialEq)]
enum InitState {
    Uninitialized,
    Scheduled(StateMap),
    Dispatched,
    /// Mounted before any state was assigned.
    Closed,
}

/// State surface handed to a connected component.
///
/// Reads come from the state the store holds for this component's key, or a
/// locally cached fallback until the store has an entry. Writes are
/// dispatched to the store.
pub struct LocalState<P> {
    key: ComponentKey,
    props: P,
    slice_name: String,
    store: Arc<dyn StoreHandle>,
    injected: Option<StateMap>,
    fallback: Option<StateMap>,
    init: InitState,
}

impl<P> LocalState<P> {
    pub(crate) fn new(
        key: ComponentKey,
        props: P,
        slice_name: String,
        store: Arc<dyn StoreHandle>,
    ) -> Self {
        Self {
            key,
            props,
            slice_name,
            store,
            injected: None,
            fallback: None,
            init: InitState::Uninitialized,
        }
    }

    pub fn component_key(&self) -> &ComponentKey {
        &self.key
    }

    pub fn props(&self) -> &P {
        &self.props
    }

    /// Assign the initial state. Meant to be called from
    /// [`Component::create`](super::Component::create).
    ///
    /// The value becomes the fallback read by [`state`](Self::state) until the
    /// store holds an entry for this key. The first non-null mapping also
    /// schedules an initializing dispatch, sent once when the component is
    /// mounted. Once scheduled, later calls only replace the fallback.
    ///
    /// Non-mapping values are rejected as long as no mapping was ever
    /// assigned, including after mount.
    pub fn init(&mut self, value: impl Into<Value>) -> Result<()> {
        let map = match value.into() {
            Value::Null => {
                self.fallback = None;
                return Ok(());
            }
            Value::Object(map) => map,
            other if matches!(self.init, InitState::Uninitialized | InitState::Closed) => {
                return Err(Error::NotAMapping {
                    found: kind_of(&other),
                });
            }
            other => {
                tracing::debug!(
                    key = %self.key,
                    found = %kind_of(&other),
                    "ignoring state reassignment"
                );
                return Ok(());
            }
        };

        self.fallback = Some(map.clone());

        match self.init {
            InitState::Uninitialized => self.init = InitState::Scheduled(map),
            InitState::Closed => {
                tracing::debug!(key = %self.key, "state assigned after mount is not dispatched");
                self.init = InitState::Dispatched;
            }
            _ => {
                tracing::debug!(key = %self.key, "state already initialized, use set_state to update");
            }
        }
        Ok(())
    }

    /// Current state: the store's entry for this key, else the fallback.
    pub fn state(&self) -> Option<&StateMap> {
        self.injected.as_ref().or(self.fallback.as_ref())
    }

    /// Dispatch an update for this component and re-read its state.
    ///
    /// There is no completion callback; the store applies the update
    /// synchronously, so [`state`](Self::state) reflects it on return.
    pub fn set_state(&mut self, updater: impl Into<Updater<P>>) {
        let action = action::set_state(updater.into(), self.key.clone(), &*self, false);
        self.store.dispatch(action);
        self.refresh();
    }

    /// [`set_state`](Self::set_state) with an untyped updater, which must be a
    /// mapping.
    pub fn set_state_value(&mut self, updater: Value) -> Result<()> {
        self.set_state(Updater::from_value(updater)?);
        Ok(())
    }

    /// Re-read this component's entry from the store.
    pub fn refresh(&mut self) {
        self.injected = self.store.select(&self.slice_name, &self.key);
    }

    pub(crate) fn inject(&mut self, state: Option<StateMap>) {
        self.injected = state;
    }

    pub(crate) fn set_props(&mut self, props: P) {
        self.props = props;
    }

    /// Send the scheduled initializing update, if any. No initializing
    /// update is sent after this, whether or not anything was scheduled.
    pub(crate) fn mount(&mut self) {
        match std::mem::replace(&mut self.init, InitState::Dispatched) {
            InitState::Scheduled(initial) => {
                let action =
                    action::set_state(Updater::Merge(initial), self.key.clone(), &*self, true);
                tracing::debug!(key = %self.key, "dispatching initial component state");
                self.store.dispatch(action);
            }
            InitState::Uninitialized => self.init = InitState::Closed,
            previous => self.init = previous,
        }
        self.refresh();
    }
}

impl<P> Element for LocalState<P> {
    type Props = P;

    fn current_state(&self) -> Option<&StateMap> {
        self.state()
    }

    fn props(&self) -> &P {
        &self.props
    }
}
