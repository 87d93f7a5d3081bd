//! Proxy object implementation
//!
//! A proxy wraps a target object and routes the fundamental property
//! operations (`get`, `set`, `has`, `deleteProperty`, `ownKeys`) through a
//! handler. Callers go through [`ProxyObject`] (or the generic
//! `JsValue::get_property` family) instead of native field syntax.

use crate::reflect::ReflectObject;
use crate::value::{JsError, JsResult, JsValue};
use std::rc::{Rc, Weak};

/// Type alias for get trap function: `(target, key, receiver)`
pub type GetTrap = Box<dyn Fn(&JsValue, &str, &JsValue) -> JsResult<JsValue>>;
/// Type alias for set trap function: `(target, key, value, receiver)`
pub type SetTrap = Box<dyn Fn(&JsValue, &str, JsValue, &JsValue) -> JsResult<bool>>;
/// Type alias for has trap function
pub type HasTrap = Box<dyn Fn(&JsValue, &str) -> JsResult<bool>>;
/// Type alias for deleteProperty trap function
pub type DeletePropertyTrap = Box<dyn Fn(&JsValue, &str) -> JsResult<bool>>;
/// Type alias for ownKeys trap function
pub type OwnKeysTrap = Box<dyn Fn(&JsValue) -> JsResult<Vec<String>>>;

/// Handler object containing trap functions
///
/// Missing traps forward the operation to the target through [`ReflectObject`].
#[derive(Default)]
pub struct ProxyHandler {
    /// get(target, property, receiver)
    pub get: Option<GetTrap>,
    /// set(target, property, value, receiver)
    pub set: Option<SetTrap>,
    /// has(target, property)
    pub has: Option<HasTrap>,
    /// deleteProperty(target, property)
    pub delete_property: Option<DeletePropertyTrap>,
    /// ownKeys(target)
    pub own_keys: Option<OwnKeysTrap>,
}

impl std::fmt::Debug for ProxyHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyHandler")
            .field("get", &self.get.is_some())
            .field("set", &self.set.is_some())
            .field("has", &self.has.is_some())
            .field("delete_property", &self.delete_property.is_some())
            .field("own_keys", &self.own_keys.is_some())
            .finish()
    }
}

/// Internal proxy data
struct ProxyData {
    target: JsValue,
    handler: Rc<ProxyHandler>,
}

/// Proxy object
///
/// Cloning yields another handle to the same proxy; identity is shared.
#[derive(Clone)]
pub struct ProxyObject {
    data: Rc<ProxyData>,
}

/// Non-owning handle to a proxy
#[derive(Clone)]
pub struct WeakProxy {
    data: Weak<ProxyData>,
}

impl WeakProxy {
    /// Upgrade to a live proxy, if it is still reachable
    pub fn upgrade(&self) -> Option<ProxyObject> {
        self.data.upgrade().map(|data| ProxyObject { data })
    }

    /// Whether the proxy is still reachable
    pub fn is_alive(&self) -> bool {
        self.data.strong_count() > 0
    }
}

impl ProxyObject {
    /// Create a new Proxy object
    ///
    /// Returns TypeError if the target is a primitive.
    pub fn new(target: JsValue, handler: Rc<ProxyHandler>) -> JsResult<Self> {
        if !target.is_heap_object() {
            return Err(JsError::type_error(
                "Cannot create proxy with a non-object as target",
            ));
        }
        Ok(ProxyObject {
            data: Rc::new(ProxyData { target, handler }),
        })
    }

    /// Get the target object
    pub fn target(&self) -> JsValue {
        self.data.target.clone()
    }

    /// Get the handler
    pub fn handler(&self) -> Rc<ProxyHandler> {
        self.data.handler.clone()
    }

    /// Whether both handles denote the same proxy
    pub fn ptr_eq(&self, other: &ProxyObject) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Stable address of this proxy, usable as an identity key
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.data) as *const () as usize
    }

    /// Create a non-owning handle
    pub fn downgrade(&self) -> WeakProxy {
        WeakProxy {
            data: Rc::downgrade(&self.data),
        }
    }

    fn as_value(&self) -> JsValue {
        JsValue::Proxy(self.clone())
    }

    /// [[Get]] internal method
    ///
    /// `receiver` is the value the access was made through; `None` means the
    /// proxy itself.
    pub fn get(&self, key: &str, receiver: Option<&JsValue>) -> JsResult<JsValue> {
        let own = self.as_value();
        let receiver = receiver.unwrap_or(&own);
        match self.data.handler.get {
            Some(ref trap) => trap(&self.data.target, key, receiver),
            None => ReflectObject::get(&self.data.target, key, Some(receiver)),
        }
    }

    /// [[Set]] internal method
    pub fn set(&self, key: &str, value: JsValue, receiver: Option<&JsValue>) -> JsResult<bool> {
        let own = self.as_value();
        let receiver = receiver.unwrap_or(&own);
        match self.data.handler.set {
            Some(ref trap) => trap(&self.data.target, key, value, receiver),
            None => ReflectObject::set(&self.data.target, key, value, Some(receiver)),
        }
    }

    /// [[HasProperty]] internal method
    pub fn has(&self, key: &str) -> JsResult<bool> {
        match self.data.handler.has {
            Some(ref trap) => trap(&self.data.target, key),
            None => ReflectObject::has(&self.data.target, key),
        }
    }

    /// [[Delete]] internal method
    pub fn delete_property(&self, key: &str) -> JsResult<bool> {
        match self.data.handler.delete_property {
            Some(ref trap) => trap(&self.data.target, key),
            None => ReflectObject::delete_property(&self.data.target, key),
        }
    }

    /// [[OwnPropertyKeys]] internal method
    pub fn own_keys(&self) -> JsResult<Vec<String>> {
        match self.data.handler.own_keys {
            Some(ref trap) => trap(&self.data.target),
            None => ReflectObject::own_keys(&self.data.target),
        }
    }
}

impl std::fmt::Debug for ProxyObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyObject")
            .field("identity", &self.identity())
            .finish()
    }
}

impl std::fmt::Debug for WeakProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakProxy")
            .field("alive", &self.is_alive())
            .finish()
    }
}
