//! Boxed-reference capability checks
//!
//! A boxed reference is any object whose `__v_isRef` key reads `true`; its
//! payload lives in `value`. Constructing references belongs to the caller.

use crate::flags::{read_flag, REF_FLAG};
use builtins::{JsResult, JsValue};

/// Whether `value` is a boxed reference
pub fn is_ref(value: &JsValue) -> bool {
    value.is_heap_object() && read_flag(value, REF_FLAG).as_boolean() == Some(true)
}

/// The payload of a boxed reference, or `value` itself
pub fn unref(value: &JsValue) -> JsResult<JsValue> {
    if is_ref(value) {
        value.get_property("value")
    } else {
        Ok(value.clone())
    }
}
