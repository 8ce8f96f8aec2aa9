//! Connecting components to the store.
//!
//! A connected component never owns its local state. It reads and writes it
//! through a [`LocalState`] handle that dispatches updates to the store bound in
//! a [`StoreContext`] and reads back the entry stored under the component's key.
//!
//! ```text
//! set_state ──→ Action ──→ Store ──→ reducer ──→ slice[key]
//!     ↑                                              │
//!     └──────────────── state() ←── refresh ←────────┘
//! ```
//!
//! # Examples
//!
//! ```
//! use component_state::connect::{connect_component_state, Component, ConnectOptions, LocalState};
//! use component_state::reducer::{ComponentStateReducer, ComponentStates};
//! use component_state::store::{Store, StoreContext};
//! use serde_json::json;
//!
//! struct Counter;
//!
//! impl Component for Counter {
//!     type Props = ();
//!
//!     fn create(state: &mut LocalState<()>) -> component_state::Result<Self> {
//!         state.init(json!({ "count": 0 }))?;
//!         Ok(Counter)
//!     }
//! }
//!
//! let store = Store::with_reducer::<ComponentStateReducer>(ComponentStates::new());
//! let context = StoreContext::new().bind("store", store.clone());
//!
//! let connector = connect_component_state(ConnectOptions::default()).unwrap();
//! let mut counter = connector.mount::<Counter>((), &context).unwrap();
//!
//! counter.with(|_, state| state.set_state_value(json!({ "count": 1 }))).unwrap();
//! assert_eq!(counter.state().unwrap()["count"], json!(1));
//! assert_eq!(store.read(|s| s.len()), 1);
//! ```

mod local;
mod options;

pub use local::LocalState;
pub use options::{ConnectConfig, ConnectOptions, KeyGenerator};

use crate::action::{ComponentKey, StateMap};
use crate::error::{Error, Result};
use crate::store::{ComponentStateSource, StoreContext};
use crate::utils::{assert, ComponentMeta};

/// A UI component whose local state lives in the store.
pub trait Component: Sized {
    type Props;

    /// Name used by the default key generator.
    fn display_name() -> Option<&'static str> {
        None
    }

    /// Construct the component. Initial state is assigned here through
    /// [`LocalState::init`]; it cannot be initialized later.
    fn create(state: &mut LocalState<Self::Props>) -> Result<Self>;

    /// Runs once after the initial state has been dispatched.
    fn will_mount(&mut self, _state: &mut LocalState<Self::Props>) {}
}

/// Props projected from the store into a connected component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStateProps {
    pub component_key: ComponentKey,
    pub state: Option<StateMap>,
}

/// Produces connected components sharing one set of [`ConnectOptions`].
#[derive(Debug)]
pub struct Connector<P> {
    options: ConnectOptions<P>,
}

impl<P> Clone for Connector<P> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
        }
    }
}

/// Validate `options` and build a [`Connector`].
///
/// Fails with [`Error::InvalidOptions`] when the slice name or store binding
/// is empty.
pub fn connect_component_state<P>(options: ConnectOptions<P>) -> Result<Connector<P>> {
    let non_empty = |name: &str, field: &str| {
        let message = format!("{field} must not be empty");
        assert(&name.is_empty(), &false, None, Some(message.as_str()))
            .map_err(|e| Error::InvalidOptions(e.to_string()))
    };
    non_empty(options.slice_name.as_str(), "slice name")?;
    non_empty(options.store_binding.as_str(), "store binding")?;

    Ok(Connector { options })
}

impl<P> Connector<P> {
    pub fn options(&self) -> &ConnectOptions<P> {
        &self.options
    }

    /// Construct and mount a `C` with `props`.
    ///
    /// Looks up the store bound under the configured name, derives the
    /// component key, runs [`Component::create`], dispatches the initial state
    /// if one was assigned, then runs [`Component::will_mount`].
    pub fn mount<C>(&self, props: P, context: &StoreContext) -> Result<Connected<C>>
    where
        C: Component<Props = P>,
    {
        let store = context.get(&self.options.store_binding)?;
        let meta = ComponentMeta {
            display_name: C::display_name(),
        };
        let key = (self.options.key_generator)(&props, &meta);

        let mut local = LocalState::new(key, props, self.options.slice_name.clone(), store);
        let mut component = C::create(&mut local)?;
        local.mount();
        component.will_mount(&mut local);

        tracing::debug!(key = %local.component_key(), component = meta.name(), "component mounted");

        Ok(Connected {
            component,
            local,
            meta,
        })
    }

    /// Project the entry for `key` out of a global state.
    pub fn map_state_to_props<S>(&self, key: &ComponentKey, state: &S) -> ComponentStateProps
    where
        S: ComponentStateSource + ?Sized,
    {
        ComponentStateProps {
            component_key: key.clone(),
            state: state
                .component_states(&self.options.slice_name)
                .and_then(|states| states.get(key))
                .cloned(),
        }
    }
}

/// A mounted component together with its [`LocalState`].
///
/// The component key is fixed for the lifetime of this value.
pub struct Connected<C: Component> {
    component: C,
    local: LocalState<C::Props>,
    meta: ComponentMeta,
}

impl<C: Component> Connected<C> {
    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn local(&self) -> &LocalState<C::Props> {
        &self.local
    }

    pub fn component_key(&self) -> &ComponentKey {
        self.local.component_key()
    }

    pub fn display_name(&self) -> &'static str {
        self.meta.name()
    }

    pub fn state(&self) -> Option<&StateMap> {
        self.local.state()
    }

    /// Run `f` with the component and its state handle.
    pub fn with<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut C, &mut LocalState<C::Props>) -> R,
    {
        f(&mut self.component, &mut self.local)
    }

    /// Replace the props. The component key is kept.
    pub fn set_props(&mut self, props: C::Props) {
        self.local.set_props(props);
        self.local.refresh();
    }

    /// Re-read the component's entry from the bound store.
    pub fn refresh(&mut self) {
        self.local.refresh();
    }

    /// Apply props projected by [`Connector::map_state_to_props`].
    ///
    /// Props for another key are ignored.
    pub fn receive(&mut self, props: ComponentStateProps) {
        if &props.component_key == self.local.component_key() {
            self.local.inject(props.state);
        } else {
            tracing::warn!(
                expected = %self.local.component_key(),
                received = %props.component_key,
                "ignoring state projected for another component"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, StateMap, Updater};
    use crate::reducer::{ComponentStateReducer, ComponentStates};
    use crate::store::{Store, StoreHandle};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Store handle that records every dispatched action.
    #[derive(Clone)]
    struct Recorder {
        store: Store<ComponentStates, Action>,
        dispatched: Arc<Mutex<Vec<Action>>>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                store: Store::with_reducer::<ComponentStateReducer>(ComponentStates::new()),
                dispatched: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn dispatched(&self) -> Vec<Action> {
            self.dispatched.lock().unwrap().clone()
        }
    }

    impl StoreHandle for Recorder {
        fn dispatch(&self, action: Action) {
            self.dispatched.lock().unwrap().push(action.clone());
            self.store.dispatch(action);
        }

        fn select(&self, slice: &str, key: &ComponentKey) -> Option<StateMap> {
            StoreHandle::select(&self.store, slice, key)
        }
    }

    fn map(value: Value) -> StateMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    struct Toggle {
        mounted: bool,
    }

    impl Component for Toggle {
        type Props = String;

        fn display_name() -> Option<&'static str> {
            Some("Toggle")
        }

        fn create(state: &mut LocalState<String>) -> Result<Self> {
            let label = state.props().clone();
            state.init(json!({ "on": false, "label": label }))?;
            Ok(Toggle { mounted: false })
        }

        fn will_mount(&mut self, state: &mut LocalState<String>) {
            self.mounted = state.state().is_some();
        }
    }

    struct Stateless;

    impl Component for Stateless {
        type Props = ();

        fn create(_state: &mut LocalState<()>) -> Result<Self> {
            Ok(Stateless)
        }
    }

    struct Scalar;

    impl Component for Scalar {
        type Props = ();

        fn create(state: &mut LocalState<()>) -> Result<Self> {
            state.init(42)?;
            Ok(Scalar)
        }
    }

    fn setup() -> (Recorder, StoreContext) {
        let recorder = Recorder::new();
        let context = StoreContext::new().bind("store", recorder.clone());
        (recorder, context)
    }

    #[test]
    fn mount_dispatches_initial_state_once() {
        let (recorder, context) = setup();
        let connector = connect_component_state(ConnectOptions::default()).unwrap();

        let toggle = connector
            .mount::<Toggle>("lamp".to_string(), &context)
            .unwrap();

        let dispatched = recorder.dispatched();
        assert_eq!(dispatched.len(), 1);
        let payload = dispatched[0].payload();
        assert!(payload.initializing);
        assert_eq!(&payload.component_key, toggle.component_key());
        assert_eq!(payload.new_state, map(json!({"on": false, "label": "lamp"})));

        assert!(toggle.component().mounted);
        assert!(toggle.component_key().as_str().starts_with("Toggle__"));
        assert_eq!(toggle.display_name(), "Toggle");
    }

    #[test]
    fn set_state_dispatches_non_initializing_update() {
        let (recorder, context) = setup();
        let connector = connect_component_state(ConnectOptions::default()).unwrap();
        let mut toggle = connector.mount::<Toggle>("lamp".to_string(), &context).unwrap();

        toggle.with(|_, state| state.set_state(map(json!({"on": true}))));

        let dispatched = recorder.dispatched();
        assert_eq!(dispatched.len(), 2);
        assert!(!dispatched[1].payload().initializing);
        assert_eq!(toggle.state().unwrap()["on"], json!(true));
        assert_eq!(toggle.state().unwrap()["label"], json!("lamp"));
    }

    #[test]
    fn compute_updater_sees_props() {
        let (_recorder, context) = setup();
        let connector = connect_component_state(ConnectOptions::default()).unwrap();
        let mut toggle = connector.mount::<Toggle>("lamp".to_string(), &context).unwrap();

        toggle.with(|_, state| {
            state.set_state(Updater::compute(|current: &StateMap, props: &String| {
                let on = current["on"].as_bool().unwrap_or_default();
                map(json!({ "on": !on, "label": format!("{props}!") }))
            }))
        });

        assert_eq!(
            toggle.state().unwrap(),
            &map(json!({"on": true, "label": "lamp!"}))
        );
    }

    #[test]
    fn fallback_is_read_before_store_has_entry() {
        let (_recorder, context) = setup();
        let connector = connect_component_state(ConnectOptions::<()>::default()).unwrap();
        let store = context.get("store").unwrap();
        let mut local = LocalState::new("k".into(), (), "componentState".into(), store);

        local.init(json!({"draft": true})).unwrap();
        assert_eq!(local.state().unwrap()["draft"], json!(true));

        local.mount();
        assert_eq!(local.state().unwrap()["draft"], json!(true));
        assert!(connector.options().slice_name == "componentState");
    }

    #[test]
    fn initialization_only_on_first_assignment() {
        let (recorder, context) = setup();
        let store = context.get("store").unwrap();
        let mut local = LocalState::new("k".into(), (), "componentState".into(), store);

        local.init(json!({"v": 1})).unwrap();
        local.init(json!({"v": 2})).unwrap();
        local.mount();

        let dispatched = recorder.dispatched();
        assert_eq!(dispatched.len(), 1);
        assert_eq!(dispatched[0].payload().new_state, map(json!({"v": 1})));

        local.init(json!({"v": 3})).unwrap();
        local.mount();
        assert_eq!(recorder.dispatched().len(), 1);
        assert_eq!(local.state().unwrap()["v"], json!(1));
    }

    #[test]
    fn non_mapping_reassignment_keeps_fallback() {
        let (recorder, context) = setup();
        let store = context.get("store").unwrap();
        let mut local = LocalState::new("k".into(), (), "componentState".into(), store);

        local.init(json!({"v": 1})).unwrap();
        assert!(local.init(json!(42)).is_ok());
        assert_eq!(local.state().unwrap()["v"], json!(1));

        local.mount();
        assert!(local.init(json!(42)).is_ok());
        assert_eq!(recorder.dispatched().len(), 1);
    }

    #[test]
    fn non_mapping_after_mount_without_state_is_rejected() {
        let (recorder, context) = setup();
        let connector = connect_component_state(ConnectOptions::default()).unwrap();
        let mut stateless = connector.mount::<Stateless>((), &context).unwrap();

        let err = stateless.with(|_, state| state.init(json!(42))).unwrap_err();
        assert!(matches!(err, Error::NotAMapping { .. }));

        // A late mapping becomes the fallback but is never dispatched.
        stateless
            .with(|_, state| state.init(json!({"late": true})))
            .unwrap();
        assert_eq!(stateless.state().unwrap()["late"], json!(true));
        assert!(recorder.dispatched().is_empty());
        assert!(stateless.with(|_, state| state.init(json!(42))).is_ok());
    }

    #[test]
    fn null_initial_state_schedules_nothing() {
        let (recorder, context) = setup();
        let store = context.get("store").unwrap();
        let mut local = LocalState::new("k".into(), (), "componentState".into(), store);

        local.init(Value::Null).unwrap();
        local.mount();

        assert!(recorder.dispatched().is_empty());
        assert!(local.state().is_none());
    }

    #[test]
    fn stateless_component_dispatches_nothing() {
        let (recorder, context) = setup();
        let connector = connect_component_state(ConnectOptions::default()).unwrap();
        let connected = connector.mount::<Stateless>((), &context).unwrap();

        assert!(recorder.dispatched().is_empty());
        assert!(connected.state().is_none());
        assert!(connected.component_key().as_str().starts_with("Anonymous__"));
    }

    #[test]
    fn non_mapping_initial_state_is_rejected() {
        let (_recorder, context) = setup();
        let connector = connect_component_state(ConnectOptions::default()).unwrap();

        let err = connector.mount::<Scalar>((), &context).err().unwrap();
        assert!(matches!(err, Error::NotAMapping { .. }));
    }

    #[test]
    fn missing_store_binding_fails() {
        let (_recorder, context) = setup();
        let options = ConnectOptions::<()>::default().with_store_binding("elsewhere");
        let connector = connect_component_state(options).unwrap();

        let err = connector.mount::<Stateless>((), &context).err().unwrap();
        assert!(matches!(err, Error::StoreNotBound(ref name) if name == "elsewhere"));
    }

    #[test]
    fn empty_option_names_are_rejected() {
        let err = connect_component_state(ConnectOptions::<()>::default().with_slice_name(""))
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "Invalid connector options: slice name must not be empty"
        );

        assert!(
            connect_component_state(ConnectOptions::<()>::default().with_store_binding(""))
                .is_err()
        );
    }

    #[test]
    fn custom_key_generator_is_called_once_per_instance() {
        let calls = Arc::new(Mutex::new(0));
        let counted = Arc::clone(&calls);
        let options = ConnectOptions::<String>::default().with_key_generator(
            move |props: &String, _meta: &ComponentMeta| {
                *counted.lock().unwrap() += 1;
                ComponentKey::new(format!("toggle:{props}"))
            },
        );

        let (_recorder, context) = setup();
        let connector = connect_component_state(options).unwrap();
        let mut toggle = connector.mount::<Toggle>("hall".to_string(), &context).unwrap();

        toggle.with(|_, state| state.set_state(map(json!({"on": true}))));
        toggle.set_props("renamed".to_string());
        toggle.refresh();

        assert_eq!(toggle.component_key().as_str(), "toggle:hall");
        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(toggle.local().props(), "renamed");
    }

    #[test]
    fn receive_applies_projection_for_own_key() {
        let (recorder, context) = setup();
        let connector = connect_component_state(ConnectOptions::default()).unwrap();
        let mut toggle = connector.mount::<Toggle>("lamp".to_string(), &context).unwrap();

        let key = toggle.component_key().clone();
        let mut global = recorder.store.get();
        global.insert(key.clone(), map(json!({"on": true})));

        toggle.receive(connector.map_state_to_props(&"other".into(), &global));
        assert_eq!(toggle.state().unwrap()["on"], json!(false));

        toggle.receive(connector.map_state_to_props(&key, &global));
        assert_eq!(toggle.state().unwrap()["on"], json!(true));
    }
}
