use crate::error::{Error, Result};
use crate::store::StoreHandle;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Stores available to connected components, keyed by binding name.
///
/// # Examples
///
/// ```
/// use component_state::reducer::{ComponentStateReducer, ComponentStates};
/// use component_state::store::{Store, StoreContext};
///
/// let store = Store::with_reducer::<ComponentStateReducer>(ComponentStates::new());
/// let context = StoreContext::new().bind("store", store);
///
/// assert!(context.get("store").is_ok());
/// assert!(context.get("other").is_err());
/// ```
#[derive(Clone, Default)]
pub struct StoreContext {
    stores: HashMap<String, Arc<dyn StoreHandle>>,
}

impl StoreContext {
    /// An empty context with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `store` under `name`, replacing any previous binding.
    pub fn bind<H>(mut self, name: impl Into<String>, store: H) -> Self
    where
        H: StoreHandle + 'static,
    {
        self.insert(name, Arc::new(store));
        self
    }

    /// Register an already shared `store` under `name`.
    pub fn insert(&mut self, name: impl Into<String>, store: Arc<dyn StoreHandle>) {
        self.stores.insert(name.into(), store);
    }

    /// Look up the store bound under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<dyn StoreHandle>> {
        self.stores
            .get(name)
            .cloned()
            .ok_or_else(|| Error::StoreNotBound(name.to_string()))
    }
}

impl fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreContext")
            .field("bindings", &self.stores.keys().collect::<Vec<_>>())
            .finish()
    }
}
