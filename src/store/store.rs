use crate::action::{Action, ComponentKey, StateMap};
use crate::reducer::Reducer;
use crate::store::{ComponentStateSource, StoreHandle};
use std::sync::{Arc, RwLock};

type Subscriber<S> = Arc<dyn Fn(&S) + Send + Sync>;
type ReduceFn<S, A> = Arc<dyn Fn(S, &A) -> S + Send + Sync>;

/// A thread-safe store that folds dispatched actions into its state.
///
/// Clones share the same state and subscribers.
pub struct Store<S, A> {
    state: Arc<RwLock<S>>,
    reducer: ReduceFn<S, A>,
    subscribers: Arc<RwLock<Vec<Subscriber<S>>>>,
}

impl<S, A> Store<S, A>
where
    S: Default + 'static,
    A: 'static,
{
    /// Create a new store with the given initial state and reducer.
    pub fn new<F>(initial: S, reducer: F) -> Self
    where
        F: Fn(S, &A) -> S + Send + Sync + 'static,
    {
        Self {
            state: Arc::new(RwLock::new(initial)),
            reducer: Arc::new(reducer),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a store driven by a [`Reducer`] implementation.
    pub fn with_reducer<R>(initial: S) -> Self
    where
        R: Reducer<State = S, Action = A> + 'static,
    {
        Self::new(initial, R::reduce)
    }

    /// Get a clone of the current state.
    pub fn get(&self) -> S
    where
        S: Clone,
    {
        self.state.read().unwrap().clone()
    }

    /// Read state without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.state.read().unwrap();
        f(&*state)
    }

    /// Run `action` through the reducer and notify subscribers.
    ///
    /// Subscribers get a snapshot of the new state and run with no lock held,
    /// so they may dispatch again.
    pub fn dispatch(&self, action: A)
    where
        S: Clone,
    {
        let snapshot = {
            let mut state = self.state.write().unwrap();
            let current = std::mem::take(&mut *state);
            *state = (self.reducer)(current, &action);
            state.clone()
        };
        self.notify(&snapshot);
    }

    /// Subscribe to state changes.
    ///
    /// The callback will be called after every dispatch.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.subscribers.write().unwrap().push(Arc::new(callback));
    }

    fn notify(&self, state: &S) {
        let subscribers = self.subscribers.read().unwrap().clone();
        for subscriber in subscribers {
            subscriber(state);
        }
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: Arc::clone(&self.reducer),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<S, A> StoreHandle for Store<S, A>
where
    S: ComponentStateSource + Clone + Default + Send + Sync + 'static,
    A: From<Action> + 'static,
{
    fn dispatch(&self, action: Action) {
        Store::dispatch(self, A::from(action));
    }

    fn select(&self, slice: &str, key: &ComponentKey) -> Option<StateMap> {
        self.read(|state| {
            state
                .component_states(slice)
                .and_then(|states| states.get(key))
                .cloned()
        })
    }
}
