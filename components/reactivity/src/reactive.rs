//! Wrapper factory and the public wrapping API
//!
//! Each of the four modes keeps its own identity cache from raw target to
//! wrapper, so a target has at most one wrapper per mode. Caches hold weak
//! handles: a wrapper nobody references any more is swept on the next insert
//! and a fresh one is built on the next request.

use crate::base_handlers;
use crate::collection_handlers;
use crate::flags::{has_flag, read_flag, ReactiveFlags};
use crate::shared::{is_object, to_raw_type};
use builtins::{JsValue, ProxyHandler, ProxyObject, ReflectObject, WeakProxy};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{trace, warn};

/// The four wrapping modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyMode {
    /// Deep, writable
    Reactive,
    /// Deep, rejects writes
    Readonly,
    /// Outermost level only, writable
    ShallowReactive,
    /// Outermost level only, rejects writes
    ShallowReadonly,
}

impl ProxyMode {
    /// Every mode, in cache order
    pub const ALL: [ProxyMode; 4] = [
        ProxyMode::Reactive,
        ProxyMode::Readonly,
        ProxyMode::ShallowReactive,
        ProxyMode::ShallowReadonly,
    ];

    /// Whether writes are rejected
    pub fn is_readonly(self) -> bool {
        matches!(self, ProxyMode::Readonly | ProxyMode::ShallowReadonly)
    }

    /// Whether nested values are left unwrapped
    pub fn is_shallow(self) -> bool {
        matches!(self, ProxyMode::ShallowReactive | ProxyMode::ShallowReadonly)
    }

    /// Name used in logs
    pub fn name(self) -> &'static str {
        match self {
            ProxyMode::Reactive => "reactive",
            ProxyMode::Readonly => "readonly",
            ProxyMode::ShallowReactive => "shallowReactive",
            ProxyMode::ShallowReadonly => "shallowReadonly",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Handler category a target is wrapped with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    /// Never wrapped
    Invalid,
    /// Plain objects and arrays
    Common,
    /// Map, Set, WeakMap, WeakSet
    Collection,
}

fn target_type_map(raw_type: &str) -> TargetType {
    match raw_type {
        "Object" | "Array" => TargetType::Common,
        "Map" | "Set" | "WeakMap" | "WeakSet" => TargetType::Collection,
        _ => TargetType::Invalid,
    }
}

/// Classify `value`. Opted-out and non-extensible objects are invalid.
pub fn get_target_type(value: &JsValue) -> TargetType {
    if has_flag(value, ReactiveFlags::Skip) || !ReflectObject::is_extensible(value).unwrap_or(false)
    {
        TargetType::Invalid
    } else {
        target_type_map(to_raw_type(value))
    }
}

/// Identity map from raw target to its wrapper for one mode
#[derive(Debug, Default)]
pub struct ModeCache {
    entries: HashMap<usize, WeakProxy>,
}

impl ModeCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The live wrapper for `target`, if any
    pub fn get(&self, target: &JsValue) -> Option<ProxyObject> {
        let id = target.object_identity()?;
        self.entries.get(&id)?.upgrade()
    }

    /// Remember `proxy` as the wrapper of `target`
    pub fn insert(&mut self, target: &JsValue, proxy: &ProxyObject) {
        let Some(id) = target.object_identity() else {
            return;
        };
        self.purge();
        self.entries.insert(id, proxy.downgrade());
    }

    /// Number of live wrappers
    pub fn len(&self) -> usize {
        self.entries.values().filter(|w| w.is_alive()).count()
    }

    /// Whether no live wrapper is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries whose wrapper is gone; returns how many were dropped
    pub fn purge(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, weak| weak.is_alive());
        let purged = before - self.entries.len();
        if purged > 0 {
            trace!(purged, "swept dead wrappers");
        }
        purged
    }
}

thread_local! {
    static MODE_CACHES: RefCell<[ModeCache; 4]> = RefCell::new(Default::default());
    static BASE_HANDLERS: [Rc<ProxyHandler>; 4] =
        ProxyMode::ALL.map(|mode| Rc::new(base_handlers::create(mode)));
    static COLLECTION_HANDLERS: [Rc<ProxyHandler>; 4] =
        ProxyMode::ALL.map(|mode| Rc::new(collection_handlers::create(mode)));
}

pub(crate) fn cached_proxy(mode: ProxyMode, target: &JsValue) -> Option<ProxyObject> {
    MODE_CACHES.with(|caches| caches.borrow()[mode.index()].get(target))
}

/// Live wrappers cached for `mode` on this thread
pub fn mode_cache_len(mode: ProxyMode) -> usize {
    MODE_CACHES.with(|caches| caches.borrow()[mode.index()].len())
}

/// Sweep dead entries from every cache; returns how many were dropped
pub fn purge_mode_caches() -> usize {
    MODE_CACHES.with(|caches| caches.borrow_mut().iter_mut().map(ModeCache::purge).sum())
}

fn handler_for(mode: ProxyMode, target_type: TargetType) -> Rc<ProxyHandler> {
    match target_type {
        TargetType::Collection => COLLECTION_HANDLERS.with(|h| h[mode.index()].clone()),
        TargetType::Common | TargetType::Invalid => BASE_HANDLERS.with(|h| h[mode.index()].clone()),
    }
}

/// Answer a flag key for a wrapper in `mode`.
///
/// `Raw` is only disclosed when the access was made through the canonical
/// wrapper itself, not through an object inheriting from it.
pub(crate) fn resolve_flag(
    mode: ProxyMode,
    target: &JsValue,
    key: &str,
    receiver: &JsValue,
) -> Option<JsValue> {
    match ReactiveFlags::from_key(key)? {
        ReactiveFlags::IsReactive => Some(JsValue::boolean(!mode.is_readonly())),
        ReactiveFlags::IsReadonly => Some(JsValue::boolean(mode.is_readonly())),
        ReactiveFlags::IsShallow => Some(JsValue::boolean(mode.is_shallow())),
        ReactiveFlags::Raw => {
            let cached = cached_proxy(mode, target)?;
            let canonical = receiver.as_proxy().is_some_and(|r| r.ptr_eq(&cached));
            canonical.then(|| target.clone())
        }
        ReactiveFlags::Skip => None,
    }
}

fn create_reactive_object(target: &JsValue, mode: ProxyMode) -> JsValue {
    if !is_object(target) {
        return target.clone();
    }
    // already a wrapper; only readonly may wrap a reactive one again
    if has_flag(target, ReactiveFlags::Raw)
        && !(mode.is_readonly() && has_flag(target, ReactiveFlags::IsReactive))
    {
        return target.clone();
    }
    if let Some(existing) = cached_proxy(mode, target) {
        return JsValue::from_proxy(existing);
    }
    let target_type = get_target_type(target);
    if target_type == TargetType::Invalid {
        return target.clone();
    }

    let proxy = match ProxyObject::new(target.clone(), handler_for(mode, target_type)) {
        Ok(proxy) => proxy,
        Err(err) => {
            warn!(%err, mode = mode.name(), "target cannot be wrapped");
            return target.clone();
        }
    };
    MODE_CACHES.with(|caches| caches.borrow_mut()[mode.index()].insert(target, &proxy));
    trace!(
        mode = mode.name(),
        target = to_raw_type(target),
        kind = ?target_type,
        "created wrapper"
    );
    JsValue::from_proxy(proxy)
}

/// Deep writable wrapper of `target`.
///
/// Readonly wrappers are returned unchanged.
pub fn reactive(target: &JsValue) -> JsValue {
    if is_readonly(target) {
        return target.clone();
    }
    create_reactive_object(target, ProxyMode::Reactive)
}

/// Writable wrapper tracking only the outermost level
pub fn shallow_reactive(target: &JsValue) -> JsValue {
    create_reactive_object(target, ProxyMode::ShallowReactive)
}

/// Deep readonly wrapper of `target`
pub fn readonly(target: &JsValue) -> JsValue {
    create_reactive_object(target, ProxyMode::Readonly)
}

/// Readonly wrapper of the outermost level only
pub fn shallow_readonly(target: &JsValue) -> JsValue {
    create_reactive_object(target, ProxyMode::ShallowReadonly)
}

/// Whether `value` is a writable wrapper, or a readonly view of one
pub fn is_reactive(value: &JsValue) -> bool {
    if is_readonly(value) {
        return is_reactive(&read_flag(value, ReactiveFlags::Raw.key()));
    }
    has_flag(value, ReactiveFlags::IsReactive)
}

/// Whether `value` is a readonly wrapper
pub fn is_readonly(value: &JsValue) -> bool {
    has_flag(value, ReactiveFlags::IsReadonly)
}

/// Whether `value` is a shallow wrapper
pub fn is_shallow(value: &JsValue) -> bool {
    has_flag(value, ReactiveFlags::IsShallow)
}

/// Whether `value` is any wrapper produced here
pub fn is_proxy(value: &JsValue) -> bool {
    is_reactive(value) || is_readonly(value)
}

/// The raw target beneath any number of wrappers
pub fn to_raw(observed: &JsValue) -> JsValue {
    let raw = read_flag(observed, ReactiveFlags::Raw.key());
    if raw.is_heap_object() {
        to_raw(&raw)
    } else {
        observed.clone()
    }
}

/// Opt `value` out of wrapping.
///
/// Objects, arrays and collections carry the marker; a wrapper passes it down
/// to its raw target. Non-extensible objects are left untouched.
pub fn mark_raw(value: &JsValue) -> JsValue {
    let raw = to_raw(value);
    if ReflectObject::is_extensible(&raw).unwrap_or(false)
        && !raw.set(ReactiveFlags::Skip.key(), JsValue::boolean(true))
    {
        trace!(target = raw.raw_type(), "value cannot carry the skip marker");
    }
    value.clone()
}
