//! Two counters whose state lives in one shared store.
//!
//! Run with `RUST_LOG=component_state=debug` to see dispatches.

use component_state::reducer::ComponentStateReducer;
use component_state::{
    connect_component_state, Component, ComponentStates, ConnectOptions, LocalState, StateMap,
    Store, StoreContext, Updater,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

struct Counter;

impl Component for Counter {
    type Props = i64;

    fn display_name() -> Option<&'static str> {
        Some("Counter")
    }

    fn create(state: &mut LocalState<i64>) -> component_state::Result<Self> {
        state.init(json!({ "count": 0 }))?;
        Ok(Counter)
    }
}

impl Counter {
    fn step(state: &mut LocalState<i64>) {
        state.set_state(Updater::compute(|current: &StateMap, step: &i64| {
            let count = current["count"].as_i64().unwrap_or_default();
            StateMap::from_iter([("count".to_string(), json!(count + step))])
        }));
    }

    fn render(state: &LocalState<i64>) -> String {
        let count = state
            .state()
            .and_then(|s| s["count"].as_i64())
            .unwrap_or_default();
        format!("{} = {}", state.component_key(), count)
    }
}

fn main() -> component_state::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Counters in a shared store ===\n");

    let store = Store::with_reducer::<ComponentStateReducer>(ComponentStates::new());
    store.subscribe(|state| {
        println!("   [Store] {} component(s) tracked", state.len());
    });

    let context = StoreContext::new().bind("store", store.clone());
    let connector = connect_component_state(ConnectOptions::default())?;

    println!("1. Mounting counters");
    let mut ones = connector.mount::<Counter>(1, &context)?;
    let mut tens = connector.mount::<Counter>(10, &context)?;

    println!("\n2. Stepping");
    for _ in 0..3 {
        ones.with(|_, state| Counter::step(state));
    }
    tens.with(|_, state| Counter::step(state));

    println!("\n3. Rendering");
    println!("   {}", Counter::render(ones.local()));
    println!("   {}", Counter::render(tens.local()));

    println!("\n4. Store contents");
    store.read(|state| {
        for (key, value) in state {
            println!("   {key}: {}", serde_json::Value::Object(value.clone()));
        }
    });

    Ok(())
}
