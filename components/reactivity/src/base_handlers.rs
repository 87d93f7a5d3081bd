//! Traps for plain objects and arrays
//!
//! Reads resolve flags first, then array instrumentation, then the
//! underlying value through the receiver. Writable modes report reads to
//! `track` and completed writes to `trigger`; readonly modes refuse every
//! write. Deep modes unwrap boxed references and wrap nested objects lazily,
//! on the read that first reaches them.

use crate::array_instrumentations;
use crate::effect::{track, trigger};
use crate::flags::is_reserved_key;
use crate::operations::{TrackOpTypes, TriggerOpTypes, ITERATE_KEY};
use crate::reactive::{
    is_readonly, is_shallow, reactive, readonly, resolve_flag, to_raw, ProxyMode,
};
use crate::refs::is_ref;
use crate::shared::{has_changed, is_array, is_integer_key, is_object};
use builtins::reflect::array_index;
use builtins::{JsResult, JsValue, ProxyHandler, ReflectObject};
use tracing::warn;

/// Build the handler set for `mode`
pub(crate) fn create(mode: ProxyMode) -> ProxyHandler {
    if mode.is_readonly() {
        return ProxyHandler {
            get: Some(Box::new(move |target, key, receiver| {
                get(mode, target, key, receiver)
            })),
            set: Some(Box::new(|target, key, _value, _receiver| {
                warn!(
                    key,
                    target = target.raw_type(),
                    "set operation failed: target is readonly"
                );
                Ok(false)
            })),
            delete_property: Some(Box::new(|target, key| {
                warn!(
                    key,
                    target = target.raw_type(),
                    "delete operation failed: target is readonly"
                );
                Ok(false)
            })),
            ..ProxyHandler::default()
        };
    }

    ProxyHandler {
        get: Some(Box::new(move |target, key, receiver| {
            get(mode, target, key, receiver)
        })),
        set: Some(Box::new(move |target, key, value, receiver| {
            set(mode, target, key, value, receiver)
        })),
        has: Some(Box::new(has)),
        delete_property: Some(Box::new(delete_property)),
        own_keys: Some(Box::new(own_keys)),
    }
}

fn get(mode: ProxyMode, target: &JsValue, key: &str, receiver: &JsValue) -> JsResult<JsValue> {
    if let Some(flag) = resolve_flag(mode, target, key, receiver) {
        return Ok(flag);
    }

    let target_is_array = is_array(target);
    if !mode.is_readonly() && target_is_array {
        if let Some(method) = array_instrumentations::get(key) {
            return Ok(method);
        }
    }

    let res = ReflectObject::get(target, key, Some(receiver))?;

    if !mode.is_readonly() && !is_reserved_key(key) {
        track(target, TrackOpTypes::Get, key);
    }

    if mode.is_shallow() {
        return Ok(res);
    }

    if is_ref(&res) {
        // positional access keeps the box
        if target_is_array && is_integer_key(key) {
            return Ok(res);
        }
        return res.get_property("value");
    }

    if is_object(&res) {
        return Ok(if mode.is_readonly() {
            readonly(&res)
        } else {
            reactive(&res)
        });
    }

    Ok(res)
}

fn own_length(target: &JsValue) -> JsResult<usize> {
    let len = ReflectObject::get(target, "length", None)?;
    Ok(len.as_number().unwrap_or(0.0) as usize)
}

fn set(
    mode: ProxyMode,
    target: &JsValue,
    key: &str,
    value: JsValue,
    receiver: &JsValue,
) -> JsResult<bool> {
    let mut old_value = ReflectObject::get(target, key, None)?;
    let mut value = value;

    if !mode.is_shallow() {
        if is_readonly(&old_value) && is_ref(&old_value) && !is_ref(&value) {
            return Ok(false);
        }
        if !is_shallow(&value) && !is_readonly(&value) {
            old_value = to_raw(&old_value);
            value = to_raw(&value);
        }
    }

    let had_key = match array_index(key) {
        Some(index) if is_array(target) => index < own_length(target)?,
        _ => ReflectObject::has_own_property(target, key)?,
    };

    let result = ReflectObject::set(target, key, value.clone(), Some(receiver))?;

    // writes reaching the target through a prototype chain notify nothing here
    if result && target.equals(&to_raw(receiver)) {
        if !had_key {
            trigger(target, TriggerOpTypes::Add, key, Some(&value), None);
        } else if has_changed(&value, &old_value) {
            trigger(target, TriggerOpTypes::Set, key, Some(&value), Some(&old_value));
        }
    }
    Ok(result)
}

fn delete_property(target: &JsValue, key: &str) -> JsResult<bool> {
    let had_key = ReflectObject::has_own_property(target, key)?;
    let old_value = ReflectObject::get(target, key, None)?;
    let result = ReflectObject::delete_property(target, key)?;
    if result && had_key {
        trigger(target, TriggerOpTypes::Delete, key, None, Some(&old_value));
    }
    Ok(result)
}

fn has(target: &JsValue, key: &str) -> JsResult<bool> {
    let result = ReflectObject::has(target, key)?;
    track(target, TrackOpTypes::Has, key);
    Ok(result)
}

fn own_keys(target: &JsValue) -> JsResult<Vec<String>> {
    let key = if is_array(target) { "length" } else { ITERATE_KEY };
    track(target, TrackOpTypes::Iterate, key);
    ReflectObject::own_keys(target)
}
