//! Traps for Map, Set, WeakMap and WeakSet targets.
//!
//! Only the flag keys are intercepted; every other operation reaches the raw
//! collection untracked.

use crate::reactive::{resolve_flag, ProxyMode};
use builtins::{ProxyHandler, ReflectObject};

pub(crate) fn create(mode: ProxyMode) -> ProxyHandler {
    ProxyHandler {
        get: Some(Box::new(move |target, key, receiver| {
            match resolve_flag(mode, target, key, receiver) {
                Some(flag) => Ok(flag),
                None => ReflectObject::get(target, key, Some(receiver)),
            }
        })),
        ..ProxyHandler::default()
    }
}
