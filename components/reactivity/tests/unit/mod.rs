//! Unit tests for the reactivity crate

mod base_handlers_test;

use builtins::JsValue;
use reactivity::REF_FLAG;

/// A boxed reference holding `inner`
pub fn make_ref(inner: JsValue) -> JsValue {
    JsValue::object_from([(REF_FLAG, JsValue::boolean(true)), ("value", inner)])
}

/// Shorthand for a number value
pub fn num(n: f64) -> JsValue {
    JsValue::number(n)
}
