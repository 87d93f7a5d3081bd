//! Reflect object implementation
//!
//! The Reflect object provides the default behavior of every proxy trap.
//! `get` and `set` honor the receiver: accessors run with the receiver as
//! `this`, and data writes land on the receiver, so an access made through a
//! prototype chain or a proxy resolves the way ordinary objects do.

use crate::array::ArrayPrototype;
use crate::value::{ArrayData, JsError, JsResult, JsValue};
use std::cell::RefCell;
use std::rc::Rc;

/// Largest valid array length (2^32 - 1)
pub const MAX_ARRAY_LENGTH: f64 = 4_294_967_295.0;

/// Elements are stored densely; lengths above this are refused with a RangeError
pub const MAX_DENSE_LENGTH: usize = 1 << 24;

/// Parse a canonical array index key (`"0"`, `"17"`, not `"01"` or `"-1"`)
pub fn array_index(key: &str) -> Option<usize> {
    let index = key.parse::<usize>().ok()?;
    if index.to_string() == key && (index as f64) < MAX_ARRAY_LENGTH {
        Some(index)
    } else {
        None
    }
}

/// Result of looking up a key on an ordinary object's own storage
enum OwnLookup {
    Data(JsValue),
    Accessor { get: Option<JsValue>, set: Option<JsValue> },
    Missing(Option<JsValue>),
}

fn lookup_own(target: &JsValue, key: &str) -> OwnLookup {
    match target {
        JsValue::Object(obj) => {
            let data = obj.borrow();
            if let Some(value) = data.properties.get(key) {
                OwnLookup::Data(value.clone())
            } else if let Some(accessor) = data.accessors.get(key) {
                OwnLookup::Accessor {
                    get: accessor.get.clone(),
                    set: accessor.set.clone(),
                }
            } else {
                OwnLookup::Missing(data.prototype.as_deref().cloned())
            }
        }
        _ => OwnLookup::Missing(None),
    }
}

/// Reflect object - provides static methods for object operations
pub struct ReflectObject;

impl ReflectObject {
    /// Reflect.get(target, propertyKey [, receiver])
    ///
    /// Gets the value of a property on an object. Getters are invoked with
    /// `receiver` (defaulting to `target`) as `this`.
    pub fn get(target: &JsValue, key: &str, receiver: Option<&JsValue>) -> JsResult<JsValue> {
        Self::validate_object(target, "Reflect.get")?;
        let receiver = receiver.unwrap_or(target);

        match target {
            JsValue::Proxy(proxy) => proxy.get(key, Some(receiver)),
            JsValue::Object(_) => match lookup_own(target, key) {
                OwnLookup::Data(value) => Ok(value),
                OwnLookup::Accessor { get: Some(getter), .. } => {
                    getter.call(receiver.clone(), Vec::new())
                }
                OwnLookup::Accessor { get: None, .. } => Ok(JsValue::undefined()),
                OwnLookup::Missing(Some(proto)) => Self::get(&proto, key, Some(receiver)),
                OwnLookup::Missing(None) => Ok(JsValue::undefined()),
            },
            JsValue::Array(arr) => {
                let data = arr.borrow();
                if key == "length" {
                    Ok(JsValue::number(data.elements.len() as f64))
                } else if let Some(index) = array_index(key) {
                    Ok(data
                        .elements
                        .get(index)
                        .cloned()
                        .unwrap_or(JsValue::undefined()))
                } else if let Some(value) = data.properties.get(key) {
                    Ok(value.clone())
                } else {
                    Ok(ArrayPrototype::method(key).unwrap_or(JsValue::undefined()))
                }
            }
            JsValue::Map(data) | JsValue::Set(data) if key == "size" => {
                Ok(JsValue::number(data.borrow().entries.len() as f64))
            }
            other => Ok(other.get(key).unwrap_or(JsValue::undefined())),
        }
    }

    /// Reflect.set(target, propertyKey, value [, receiver])
    ///
    /// Sets the value of a property on an object. Setters are invoked with
    /// the receiver as `this`; data writes are defined on the receiver.
    /// Returns `false` when the write is refused.
    pub fn set(
        target: &JsValue,
        key: &str,
        value: JsValue,
        receiver: Option<&JsValue>,
    ) -> JsResult<bool> {
        Self::validate_object(target, "Reflect.set")?;
        let receiver = receiver.unwrap_or(target);

        match target {
            JsValue::Proxy(proxy) => proxy.set(key, value, Some(receiver)),
            JsValue::Object(_) => match lookup_own(target, key) {
                OwnLookup::Accessor { set: Some(setter), .. } => {
                    setter.call(receiver.clone(), vec![value])?;
                    Ok(true)
                }
                OwnLookup::Accessor { set: None, .. } => Ok(false),
                OwnLookup::Missing(Some(proto)) => Self::set(&proto, key, value, Some(receiver)),
                OwnLookup::Data(_) | OwnLookup::Missing(None) => {
                    Self::define_on_receiver(receiver, key, value)
                }
            },
            JsValue::Array(_) => Self::define_on_receiver(receiver, key, value),
            _ => Ok(false),
        }
    }

    /// Create or update a data property on the receiver of a `[[Set]]`.
    /// Proxies carry no define trap, so the definition reaches their target.
    fn define_on_receiver(receiver: &JsValue, key: &str, value: JsValue) -> JsResult<bool> {
        match receiver {
            JsValue::Proxy(proxy) => Self::define_on_receiver(&proxy.target(), key, value),
            JsValue::Object(obj) => {
                let mut data = obj.borrow_mut();
                if data.accessors.contains_key(key) {
                    return Ok(false);
                }
                if !data.properties.contains_key(key) && !data.is_extensible() {
                    return Ok(false);
                }
                data.properties.insert(key.to_string(), value);
                Ok(true)
            }
            JsValue::Array(arr) => Self::array_set(arr, key, value),
            _ => Ok(false),
        }
    }

    fn array_set(arr: &Rc<RefCell<ArrayData>>, key: &str, value: JsValue) -> JsResult<bool> {
        let mut data = arr.borrow_mut();
        if key == "length" {
            let len = value.as_number().unwrap_or(f64::NAN);
            if !(0.0..=MAX_ARRAY_LENGTH).contains(&len) || len.fract() != 0.0 {
                return Err(JsError::range_error("Invalid array length"));
            }
            if len as usize > MAX_DENSE_LENGTH {
                return Err(JsError::range_error("Array length exceeds dense storage"));
            }
            data.elements.resize(len as usize, JsValue::undefined());
            Ok(true)
        } else if let Some(index) = array_index(key) {
            if index >= data.elements.len() {
                if !data.is_extensible() {
                    return Ok(false);
                }
                if index >= MAX_DENSE_LENGTH {
                    return Err(JsError::range_error("Array index exceeds dense storage"));
                }
                data.elements.resize(index + 1, JsValue::undefined());
            }
            data.elements[index] = value;
            Ok(true)
        } else {
            if !data.properties.contains_key(key) && !data.is_extensible() {
                return Ok(false);
            }
            data.properties.insert(key.to_string(), value);
            Ok(true)
        }
    }

    /// Reflect.has(target, propertyKey)
    ///
    /// Returns a Boolean indicating whether the target has the property,
    /// following the prototype chain.
    pub fn has(target: &JsValue, key: &str) -> JsResult<bool> {
        Self::validate_object(target, "Reflect.has")?;

        match target {
            JsValue::Proxy(proxy) => proxy.has(key),
            JsValue::Object(obj) => {
                let proto = {
                    let data = obj.borrow();
                    if data.has_own(key) {
                        return Ok(true);
                    }
                    data.prototype.as_deref().cloned()
                };
                match proto {
                    Some(p) => Self::has(&p, key),
                    None => Ok(false),
                }
            }
            JsValue::Array(_) => {
                Ok(target.has_own(key) || ArrayPrototype::is_method(key))
            }
            JsValue::Map(_) | JsValue::Set(_) if key == "size" => Ok(true),
            other => Ok(other.has_own(key)),
        }
    }

    /// Object.prototype.hasOwnProperty(target, propertyKey)
    ///
    /// Proxies are looked through to their target.
    pub fn has_own_property(target: &JsValue, key: &str) -> JsResult<bool> {
        Self::validate_object(target, "Object.prototype.hasOwnProperty")?;

        match target {
            JsValue::Proxy(proxy) => Self::has_own_property(&proxy.target(), key),
            other => Ok(other.has_own(key)),
        }
    }

    /// Reflect.deleteProperty(target, propertyKey)
    ///
    /// Deletes a property from an object. Deleting an array element leaves a hole.
    pub fn delete_property(target: &JsValue, key: &str) -> JsResult<bool> {
        Self::validate_object(target, "Reflect.deleteProperty")?;

        match target {
            JsValue::Proxy(proxy) => proxy.delete_property(key),
            JsValue::Object(obj) => {
                let mut data = obj.borrow_mut();
                data.properties.remove(key);
                data.accessors.remove(key);
                Ok(true)
            }
            JsValue::Array(arr) => {
                if key == "length" {
                    return Ok(false);
                }
                let mut data = arr.borrow_mut();
                if let Some(index) = array_index(key) {
                    if index < data.elements.len() {
                        data.elements[index] = JsValue::undefined();
                    }
                } else {
                    data.properties.remove(key);
                }
                Ok(true)
            }
            other => {
                if let Some(data) = other.as_collection() {
                    data.borrow_mut().properties.remove(key);
                }
                Ok(true)
            }
        }
    }

    /// Reflect.ownKeys(target)
    ///
    /// Returns the target object's own property keys.
    pub fn own_keys(target: &JsValue) -> JsResult<Vec<String>> {
        Self::validate_object(target, "Reflect.ownKeys")?;

        match target {
            JsValue::Proxy(proxy) => proxy.own_keys(),
            JsValue::Object(obj) => {
                let data = obj.borrow();
                Ok(data
                    .properties
                    .keys()
                    .chain(data.accessors.keys())
                    .cloned()
                    .collect())
            }
            JsValue::Array(arr) => {
                let data = arr.borrow();
                let mut keys: Vec<String> =
                    (0..data.elements.len()).map(|i| i.to_string()).collect();
                keys.push("length".to_string());
                keys.extend(data.properties.keys().cloned());
                Ok(keys)
            }
            other => Ok(other
                .as_collection()
                .map(|data| data.borrow().properties.keys().cloned().collect())
                .unwrap_or_default()),
        }
    }

    /// Reflect.isExtensible(target)
    pub fn is_extensible(target: &JsValue) -> JsResult<bool> {
        Self::validate_object(target, "Reflect.isExtensible")?;

        match target {
            JsValue::Proxy(proxy) => Self::is_extensible(&proxy.target()),
            JsValue::Object(obj) => Ok(obj.borrow().is_extensible()),
            JsValue::Array(arr) => Ok(arr.borrow().is_extensible()),
            _ => Ok(true),
        }
    }

    /// Reflect.preventExtensions(target)
    ///
    /// Prevents new properties from ever being added to the target object.
    pub fn prevent_extensions(target: &JsValue) -> JsResult<bool> {
        Self::validate_object(target, "Reflect.preventExtensions")?;

        match target {
            JsValue::Proxy(proxy) => Self::prevent_extensions(&proxy.target()),
            JsValue::Object(obj) => {
                obj.borrow_mut().extensible = Some(false);
                Ok(true)
            }
            JsValue::Array(arr) => {
                arr.borrow_mut().extensible = Some(false);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Helper: Validate that target is an object
    fn validate_object(target: &JsValue, method: &str) -> JsResult<()> {
        if target.is_heap_object() {
            Ok(())
        } else {
            Err(JsError::type_error(format!(
                "{} called on non-object",
                method
            )))
        }
    }
}
