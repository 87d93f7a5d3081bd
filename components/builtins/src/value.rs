//! JavaScript value representation for builtins
//!
//! This module provides the heap object model the proxy and reactivity layers
//! operate on: plain objects (with data and accessor properties), arrays, the
//! keyed collections, native functions and proxies.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::proxy::ProxyObject;
use crate::reflect::{array_index, ReflectObject, MAX_DENSE_LENGTH};

/// Error type for JavaScript operations
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct JsError {
    /// The error message
    pub message: String,
}

impl JsError {
    /// Create a new generic error
    pub fn new(message: impl Into<String>) -> Self {
        JsError {
            message: message.into(),
        }
    }

    /// Create a TypeError
    pub fn type_error(message: impl Into<String>) -> Self {
        JsError::new(format!("TypeError: {}", message.into()))
    }

    /// Create a RangeError
    pub fn range_error(message: impl Into<String>) -> Self {
        JsError::new(format!("RangeError: {}", message.into()))
    }
}

/// Result type for JavaScript operations
pub type JsResult<T> = Result<T, JsError>;

/// Accessor property: getter and setter are native functions called with the
/// receiver of the access as `this`.
#[derive(Debug, Clone, Default)]
pub struct AccessorProperty {
    /// Getter function, if any
    pub get: Option<JsValue>,
    /// Setter function, if any
    pub set: Option<JsValue>,
}

/// Internal object data
#[derive(Debug, Clone, Default)]
pub struct ObjectData {
    /// Data properties
    pub properties: HashMap<String, JsValue>,
    /// Accessor properties
    pub accessors: HashMap<String, AccessorProperty>,
    /// Optional prototype reference
    pub prototype: Option<Box<JsValue>>,
    /// Whether object is extensible (None means default true)
    pub extensible: Option<bool>,
}

impl ObjectData {
    /// Whether new properties may be added
    pub fn is_extensible(&self) -> bool {
        self.extensible.unwrap_or(true)
    }

    /// Whether `key` is an own data or accessor property
    pub fn has_own(&self, key: &str) -> bool {
        self.properties.contains_key(key) || self.accessors.contains_key(key)
    }
}

/// Internal array data
#[derive(Debug, Clone, Default)]
pub struct ArrayData {
    /// Array elements; holes are stored as undefined
    pub elements: Vec<JsValue>,
    /// Named (non-index) properties
    pub properties: HashMap<String, JsValue>,
    /// Whether array is extensible (None means default true)
    pub extensible: Option<bool>,
}

impl ArrayData {
    /// Whether new elements or properties may be added
    pub fn is_extensible(&self) -> bool {
        self.extensible.unwrap_or(true)
    }
}

/// Internal data shared by Map, Set, WeakMap and WeakSet
///
/// Set members are stored as `(value, value)` pairs. Named properties hold
/// expando keys such as opt-out markers; they are separate from the entries.
#[derive(Debug, Clone, Default)]
pub struct CollectionData {
    /// Entries in insertion order
    pub entries: Vec<(JsValue, JsValue)>,
    /// Named properties
    pub properties: HashMap<String, JsValue>,
}

/// Native function signature: `(this, arguments)`
pub type NativeFn = dyn Fn(JsValue, Vec<JsValue>) -> JsResult<JsValue>;

/// Internal function data
pub struct FunctionData {
    /// The function implementation
    pub func: Box<NativeFn>,
}

impl std::fmt::Debug for FunctionData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionData").finish()
    }
}

/// JavaScript value representation
#[derive(Debug, Clone)]
pub enum JsValue {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String value
    String(String),
    /// Object with properties
    Object(Rc<RefCell<ObjectData>>),
    /// Array
    Array(Rc<RefCell<ArrayData>>),
    /// Map collection
    Map(Rc<RefCell<CollectionData>>),
    /// Set collection
    Set(Rc<RefCell<CollectionData>>),
    /// WeakMap collection
    WeakMap(Rc<RefCell<CollectionData>>),
    /// WeakSet collection
    WeakSet(Rc<RefCell<CollectionData>>),
    /// Native function object
    Function(Rc<FunctionData>),
    /// Proxy object
    Proxy(ProxyObject),
}

impl JsValue {
    /// Create undefined value
    pub fn undefined() -> Self {
        JsValue::Undefined
    }

    /// Create null value
    pub fn null() -> Self {
        JsValue::Null
    }

    /// Create boolean value
    pub fn boolean(v: bool) -> Self {
        JsValue::Boolean(v)
    }

    /// Create number value
    pub fn number(v: f64) -> Self {
        JsValue::Number(v)
    }

    /// Create string value
    pub fn string(s: impl Into<String>) -> Self {
        JsValue::String(s.into())
    }

    /// Create empty object
    pub fn object() -> Self {
        JsValue::Object(Rc::new(RefCell::new(ObjectData::default())))
    }

    /// Create object with prototype
    pub fn object_with_proto(proto: &JsValue) -> Self {
        JsValue::Object(Rc::new(RefCell::new(ObjectData {
            prototype: Some(Box::new(proto.clone())),
            ..ObjectData::default()
        })))
    }

    /// Create an object from `(key, value)` pairs
    pub fn object_from<K: Into<String>>(entries: impl IntoIterator<Item = (K, JsValue)>) -> Self {
        let properties = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();
        JsValue::Object(Rc::new(RefCell::new(ObjectData {
            properties,
            ..ObjectData::default()
        })))
    }

    /// Create a function value
    pub fn function<F>(func: F) -> Self
    where
        F: Fn(JsValue, Vec<JsValue>) -> JsResult<JsValue> + 'static,
    {
        JsValue::Function(Rc::new(FunctionData {
            func: Box::new(func),
        }))
    }

    /// Create a proxy value
    pub fn from_proxy(proxy: ProxyObject) -> Self {
        JsValue::Proxy(proxy)
    }

    /// Create empty array
    pub fn array() -> Self {
        JsValue::array_from(Vec::new())
    }

    /// Create array from values
    pub fn array_from(values: Vec<JsValue>) -> Self {
        JsValue::Array(Rc::new(RefCell::new(ArrayData {
            elements: values,
            ..ArrayData::default()
        })))
    }

    /// Create an empty Map
    pub fn map() -> Self {
        JsValue::Map(Rc::new(RefCell::new(CollectionData::default())))
    }

    /// Create an empty Set
    pub fn set_collection() -> Self {
        JsValue::Set(Rc::new(RefCell::new(CollectionData::default())))
    }

    /// Create an empty WeakMap
    pub fn weak_map() -> Self {
        JsValue::WeakMap(Rc::new(RefCell::new(CollectionData::default())))
    }

    /// Create an empty WeakSet
    pub fn weak_set() -> Self {
        JsValue::WeakSet(Rc::new(RefCell::new(CollectionData::default())))
    }

    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, JsValue::Undefined)
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, JsValue::Null)
    }

    /// Check if value is a plain object
    pub fn is_object(&self) -> bool {
        matches!(self, JsValue::Object(_))
    }

    /// Check if value is an array (does not look through proxies)
    pub fn is_array(&self) -> bool {
        matches!(self, JsValue::Array(_))
    }

    /// Check if value is a function
    pub fn is_function(&self) -> bool {
        matches!(self, JsValue::Function(_))
    }

    /// Check if value is a proxy
    pub fn is_proxy(&self) -> bool {
        matches!(self, JsValue::Proxy(_))
    }

    /// Check if value is a heap object (anything with identity)
    pub fn is_heap_object(&self) -> bool {
        self.object_identity().is_some()
    }

    /// Get the object pointer identity (used for identity-keyed maps)
    ///
    /// Returns Some(address) for object types, None for primitives.
    pub fn object_identity(&self) -> Option<usize> {
        match self {
            JsValue::Object(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
            JsValue::Array(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
            JsValue::Map(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
            JsValue::Set(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
            JsValue::WeakMap(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
            JsValue::WeakSet(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
            JsValue::Function(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
            JsValue::Proxy(proxy) => Some(proxy.identity()),
            JsValue::Undefined
            | JsValue::Null
            | JsValue::Boolean(_)
            | JsValue::Number(_)
            | JsValue::String(_) => None,
        }
    }

    /// The built-in type tag, as `Object.prototype.toString` reports it
    /// between `[object ` and `]`. Proxies report their target's tag.
    pub fn raw_type(&self) -> &'static str {
        match self {
            JsValue::Undefined => "Undefined",
            JsValue::Null => "Null",
            JsValue::Boolean(_) => "Boolean",
            JsValue::Number(_) => "Number",
            JsValue::String(_) => "String",
            JsValue::Object(_) => "Object",
            JsValue::Array(_) => "Array",
            JsValue::Map(_) => "Map",
            JsValue::Set(_) => "Set",
            JsValue::WeakMap(_) => "WeakMap",
            JsValue::WeakSet(_) => "WeakSet",
            JsValue::Function(_) => "Function",
            JsValue::Proxy(proxy) => proxy.target().raw_type(),
        }
    }

    /// Get as boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            JsValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            JsValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string
    pub fn as_string(&self) -> Option<String> {
        match self {
            JsValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Get as proxy
    pub fn as_proxy(&self) -> Option<&ProxyObject> {
        match self {
            JsValue::Proxy(proxy) => Some(proxy),
            _ => None,
        }
    }

    /// ToBoolean
    pub fn is_truthy(&self) -> bool {
        match self {
            JsValue::Undefined | JsValue::Null => false,
            JsValue::Boolean(b) => *b,
            JsValue::Number(n) => *n != 0.0 && !n.is_nan(),
            JsValue::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Get raw array length (no proxy dispatch)
    pub fn array_length(&self) -> usize {
        match self {
            JsValue::Array(arr) => arr.borrow().elements.len(),
            _ => 0,
        }
    }

    /// The storage of a Map, Set, WeakMap or WeakSet
    pub fn as_collection(&self) -> Option<&Rc<RefCell<CollectionData>>> {
        match self {
            JsValue::Map(data)
            | JsValue::Set(data)
            | JsValue::WeakMap(data)
            | JsValue::WeakSet(data) => Some(data),
            _ => None,
        }
    }

    /// Set an own data property directly on the underlying storage,
    /// bypassing proxies, accessors and extensibility.
    ///
    /// Returns `false` when nothing was stored: primitives, functions,
    /// proxies, and array indices at or past [`MAX_DENSE_LENGTH`].
    pub fn set(&self, key: &str, value: JsValue) -> bool {
        match self {
            JsValue::Object(obj) => {
                obj.borrow_mut().properties.insert(key.to_string(), value);
                true
            }
            JsValue::Array(arr) => {
                let mut data = arr.borrow_mut();
                match array_index(key) {
                    Some(index) if index >= MAX_DENSE_LENGTH => false,
                    Some(index) => {
                        if index >= data.elements.len() {
                            data.elements.resize(index + 1, JsValue::Undefined);
                        }
                        data.elements[index] = value;
                        true
                    }
                    None => {
                        data.properties.insert(key.to_string(), value);
                        true
                    }
                }
            }
            other => match other.as_collection() {
                Some(data) => {
                    data.borrow_mut().properties.insert(key.to_string(), value);
                    true
                }
                None => false,
            },
        }
    }

    /// Get an own data property directly from the underlying storage
    pub fn get(&self, key: &str) -> Option<JsValue> {
        match self {
            JsValue::Object(obj) => obj.borrow().properties.get(key).cloned(),
            JsValue::Array(arr) => {
                let data = arr.borrow();
                match array_index(key) {
                    Some(index) => data.elements.get(index).cloned(),
                    None => data.properties.get(key).cloned(),
                }
            }
            other => other
                .as_collection()
                .and_then(|data| data.borrow().properties.get(key).cloned()),
        }
    }

    /// Check if object has own property
    pub fn has_own(&self, key: &str) -> bool {
        match self {
            JsValue::Object(obj) => obj.borrow().has_own(key),
            JsValue::Array(arr) => {
                let data = arr.borrow();
                key == "length"
                    || match array_index(key) {
                        Some(index) => index < data.elements.len(),
                        None => data.properties.contains_key(key),
                    }
            }
            other => other
                .as_collection()
                .is_some_and(|data| data.borrow().properties.contains_key(key)),
        }
    }

    /// Define an accessor property on a plain object
    pub fn define_accessor(&self, key: &str, get: Option<JsValue>, set: Option<JsValue>) {
        if let JsValue::Object(obj) = self {
            let mut data = obj.borrow_mut();
            data.properties.remove(key);
            data.accessors
                .insert(key.to_string(), AccessorProperty { get, set });
        }
    }

    /// `[[Get]]` with this value as receiver; dispatches through proxies
    pub fn get_property(&self, key: &str) -> JsResult<JsValue> {
        ReflectObject::get(self, key, None)
    }

    /// `[[Set]]` with this value as receiver; dispatches through proxies
    pub fn set_property(&self, key: &str, value: JsValue) -> JsResult<bool> {
        ReflectObject::set(self, key, value, None)
    }

    /// `[[HasProperty]]`
    pub fn has_property(&self, key: &str) -> JsResult<bool> {
        ReflectObject::has(self, key)
    }

    /// `[[Delete]]`
    pub fn delete_property(&self, key: &str) -> JsResult<bool> {
        ReflectObject::delete_property(self, key)
    }

    /// `[[OwnPropertyKeys]]`
    pub fn own_keys(&self) -> JsResult<Vec<String>> {
        ReflectObject::own_keys(self)
    }

    /// `[[Call]]`
    pub fn call(&self, this: JsValue, args: Vec<JsValue>) -> JsResult<JsValue> {
        match self {
            JsValue::Function(f) => (f.func)(this, args),
            JsValue::Proxy(proxy) => proxy.target().call(this, args),
            _ => Err(JsError::type_error(format!(
                "{} is not a function",
                self.to_js_string()
            ))),
        }
    }

    /// Look up `name` through `[[Get]]` and call it with this value as `this`
    pub fn call_method(&self, name: &str, args: Vec<JsValue>) -> JsResult<JsValue> {
        let method = self.get_property(name)?;
        if !method.is_function() {
            return Err(JsError::type_error(format!("{} is not a function", name)));
        }
        method.call(self.clone(), args)
    }

    /// Convert to string representation
    pub fn to_js_string(&self) -> String {
        match self {
            JsValue::Undefined => "undefined".to_string(),
            JsValue::Null => "null".to_string(),
            JsValue::Boolean(b) => b.to_string(),
            JsValue::Number(n) => {
                if n.is_nan() {
                    "NaN".to_string()
                } else if n.is_infinite() {
                    if *n > 0.0 {
                        "Infinity".to_string()
                    } else {
                        "-Infinity".to_string()
                    }
                } else if *n == n.trunc() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            JsValue::String(s) => s.clone(),
            JsValue::Object(_) => "[object Object]".to_string(),
            JsValue::Array(arr) => {
                let elements: Vec<String> = arr
                    .borrow()
                    .elements
                    .iter()
                    .map(|e| match e {
                        JsValue::Undefined | JsValue::Null => String::new(),
                        other => other.to_js_string(),
                    })
                    .collect();
                elements.join(",")
            }
            JsValue::Map(_) => "[object Map]".to_string(),
            JsValue::Set(_) => "[object Set]".to_string(),
            JsValue::WeakMap(_) => "[object WeakMap]".to_string(),
            JsValue::WeakSet(_) => "[object WeakSet]".to_string(),
            JsValue::Function(_) => "function() { [native code] }".to_string(),
            JsValue::Proxy(proxy) => proxy.target().to_js_string(),
        }
    }

    /// Strict equality (`===`)
    pub fn equals(&self, other: &JsValue) -> bool {
        match (self, other) {
            (JsValue::Undefined, JsValue::Undefined) => true,
            (JsValue::Null, JsValue::Null) => true,
            (JsValue::Boolean(a), JsValue::Boolean(b)) => a == b,
            (JsValue::Number(a), JsValue::Number(b)) => a == b,
            (JsValue::String(a), JsValue::String(b)) => a == b,
            // Reference types - same instance only
            (JsValue::Proxy(a), JsValue::Proxy(b)) => a.ptr_eq(b),
            (JsValue::Proxy(_), _) | (_, JsValue::Proxy(_)) => false,
            (a, b) => match (a.object_identity(), b.object_identity()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// SameValueZero comparison (used by `includes`)
    ///
    /// Like equals() but treats NaN === NaN.
    pub fn same_value_zero(&self, other: &JsValue) -> bool {
        match (self, other) {
            (JsValue::Number(a), JsValue::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.equals(other),
        }
    }

    /// SameValue comparison (`Object.is`)
    ///
    /// NaN equals NaN, but -0 and +0 differ.
    pub fn same_value(&self, other: &JsValue) -> bool {
        match (self, other) {
            (JsValue::Number(a), JsValue::Number(b)) => {
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b && a.is_sign_negative() == b.is_sign_negative()
                }
            }
            _ => self.equals(other),
        }
    }
}

impl PartialEq for JsValue {
    fn eq(&self, other: &Self) -> bool {
        self.same_value_zero(other)
    }
}
