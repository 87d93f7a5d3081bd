//! Reserved flag keys
//!
//! Every wrapper answers these keys from its get trap before any data
//! lookup, so a wrapper's mode can be queried without touching user data.

use builtins::JsValue;

/// Key marking a boxed reference
pub const REF_FLAG: &str = "__v_isRef";

/// Flag keys understood by the get trap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactiveFlags {
    /// Opt-out marker set by `mark_raw`
    Skip,
    /// `true` on every non-readonly wrapper
    IsReactive,
    /// `true` on readonly wrappers
    IsReadonly,
    /// `true` on shallow wrappers
    IsShallow,
    /// The wrapped target, answered only to the canonical wrapper itself
    Raw,
}

impl ReactiveFlags {
    /// The property key this flag is read through
    pub fn key(self) -> &'static str {
        match self {
            ReactiveFlags::Skip => "__v_skip",
            ReactiveFlags::IsReactive => "__v_isReactive",
            ReactiveFlags::IsReadonly => "__v_isReadonly",
            ReactiveFlags::IsShallow => "__v_isShallow",
            ReactiveFlags::Raw => "__v_raw",
        }
    }

    /// Parse a property key into a flag
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "__v_skip" => Some(ReactiveFlags::Skip),
            "__v_isReactive" => Some(ReactiveFlags::IsReactive),
            "__v_isReadonly" => Some(ReactiveFlags::IsReadonly),
            "__v_isShallow" => Some(ReactiveFlags::IsShallow),
            "__v_raw" => Some(ReactiveFlags::Raw),
            _ => None,
        }
    }
}

/// Whether `key` is reserved for flags or reference detection.
///
/// Reads of reserved keys are never tracked.
pub fn is_reserved_key(key: &str) -> bool {
    key == REF_FLAG || ReactiveFlags::from_key(key).is_some()
}

/// Read `key` off `value` through `[[Get]]`.
///
/// Primitives and faulting reads answer `undefined`.
pub(crate) fn read_flag(value: &JsValue, key: &str) -> JsValue {
    if !value.is_heap_object() {
        return JsValue::undefined();
    }
    value.get_property(key).unwrap_or(JsValue::Undefined)
}

/// Whether `flag` reads truthy on `value`
pub(crate) fn has_flag(value: &JsValue, flag: ReactiveFlags) -> bool {
    read_flag(value, flag.key()).is_truthy()
}
