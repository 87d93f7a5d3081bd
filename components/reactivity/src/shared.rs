//! Small predicates shared by the handlers and the factory

use builtins::reflect::array_index;
use builtins::JsValue;

/// Whether `value` is a heap object (object, array, collection, function, proxy)
pub fn is_object(value: &JsValue) -> bool {
    value.is_heap_object()
}

/// `Array.isArray`: looks through proxies to their target
pub fn is_array(value: &JsValue) -> bool {
    match value {
        JsValue::Array(_) => true,
        JsValue::Proxy(proxy) => is_array(&proxy.target()),
        _ => false,
    }
}

/// Whether `key` is a canonical non-negative integer index
pub fn is_integer_key(key: &str) -> bool {
    array_index(key).is_some()
}

/// `!Object.is(value, old_value)`
pub fn has_changed(value: &JsValue, old_value: &JsValue) -> bool {
    !value.same_value(old_value)
}

/// The `[object Tag]` tag of `value`
pub fn to_raw_type(value: &JsValue) -> &'static str {
    value.raw_type()
}
