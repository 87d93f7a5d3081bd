//! Overrides for array methods reached through a writable wrapper
//!
//! Search methods depend on every slot, so each index is tracked before the
//! search runs on the raw array; a miss is retried with raw arguments, which
//! reconciles wrapped arguments against raw storage.
//!
//! Length-mutating methods both read and write `length`. They run with
//! tracking paused so an effect that pushes can never subscribe to the
//! `length` it is about to change. Writes still go through the wrapper and
//! still trigger.

use crate::effect::{pause_tracking, track};
use crate::operations::TrackOpTypes;
use crate::reactive::to_raw;
use builtins::{ArrayPrototype, JsResult, JsValue};
use std::collections::HashMap;

/// Methods whose result depends on the whole array
pub const SEARCH_METHODS: [&str; 3] = ["includes", "indexOf", "lastIndexOf"];

/// Methods that change `length`
pub const LENGTH_MUTATING_METHODS: [&str; 5] = ["push", "pop", "shift", "unshift", "splice"];

thread_local! {
    static INSTRUMENTATIONS: HashMap<&'static str, JsValue> = create_array_instrumentations();
}

fn create_array_instrumentations() -> HashMap<&'static str, JsValue> {
    let mut instrumentations = HashMap::new();
    for method in SEARCH_METHODS {
        instrumentations.insert(
            method,
            JsValue::function(move |this, args| search(method, &this, &args)),
        );
    }
    for method in LENGTH_MUTATING_METHODS {
        instrumentations.insert(
            method,
            JsValue::function(move |this, args| mutate(method, &this, &args)),
        );
    }
    instrumentations
}

/// The override for `key`, if `key` is instrumented.
///
/// The same function value is returned on every call.
pub fn get(key: &str) -> Option<JsValue> {
    INSTRUMENTATIONS.with(|methods| methods.get(key).cloned())
}

/// Whether `key` names an instrumented method
pub fn is_instrumented(key: &str) -> bool {
    SEARCH_METHODS.contains(&key) || LENGTH_MUTATING_METHODS.contains(&key)
}

fn is_not_found(result: &JsValue) -> bool {
    result.as_number() == Some(-1.0) || result.as_boolean() == Some(false)
}

fn search(method: &str, this: &JsValue, args: &[JsValue]) -> JsResult<JsValue> {
    let arr = to_raw(this);
    let len = this.get_property("length")?.as_number().unwrap_or(0.0) as usize;
    for i in 0..len {
        track(&arr, TrackOpTypes::Get, &i.to_string());
    }

    let res = ArrayPrototype::invoke(method, &arr, args)?;
    if is_not_found(&res) {
        let raw_args: Vec<JsValue> = args.iter().map(to_raw).collect();
        ArrayPrototype::invoke(method, &arr, &raw_args)
    } else {
        Ok(res)
    }
}

fn mutate(method: &str, this: &JsValue, args: &[JsValue]) -> JsResult<JsValue> {
    let _paused = pause_tracking();
    ArrayPrototype::invoke(method, this, args)
}
