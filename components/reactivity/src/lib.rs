//! Reactive proxies over the builtins object model
//!
//! This crate wraps plain objects and arrays in proxies whose traps report
//! reads and writes to a dependency-tracking collaborator:
//! - [`reactive`], [`readonly`], [`shallow_reactive`], [`shallow_readonly`] -
//!   one canonical wrapper per target and mode
//! - [`to_raw`], [`is_reactive`], [`is_readonly`], [`is_shallow`],
//!   [`is_proxy`], [`mark_raw`] - wrapper introspection
//! - [`DependencyTracker`], [`set_tracker`], [`pause_tracking`] - the
//!   `track`/`trigger` hooks and their nesting pause
//! - [`RecordingTracker`], [`EffectRunner`] - in-process trackers
//!
//! # Example
//!
//! ```
//! use builtins::JsValue;
//! use reactivity::{reactive, set_tracker, to_raw, RecordingTracker};
//! use std::rc::Rc;
//!
//! let recorder = Rc::new(RecordingTracker::new());
//! set_tracker(recorder.clone());
//!
//! let raw = JsValue::object_from([("count", JsValue::number(0.0))]);
//! let state = reactive(&raw);
//! state.get_property("count").unwrap();
//! state.set_property("count", JsValue::number(1.0)).unwrap();
//!
//! assert!(to_raw(&state).equals(&raw));
//! assert_eq!(recorder.tracked_keys(), vec!["count"]);
//! assert_eq!(recorder.triggered().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array_instrumentations;
mod base_handlers;
mod collection_handlers;
pub mod effect;
pub mod flags;
pub mod operations;
pub mod reactive;
pub mod refs;
pub mod shared;
pub mod tracker;

pub use effect::{
    clear_tracker, is_tracking, pause_tracking, set_tracker, DependencyTracker,
    PauseTrackingGuard,
};
pub use flags::{ReactiveFlags, REF_FLAG};
pub use operations::{TrackOpTypes, TriggerOpTypes, ITERATE_KEY};
pub use reactive::{
    is_proxy, is_reactive, is_readonly, is_shallow, mark_raw, mode_cache_len,
    purge_mode_caches, reactive, readonly, shallow_reactive, shallow_readonly, to_raw,
    ProxyMode, TargetType,
};
pub use refs::{is_ref, unref};
pub use tracker::{EffectId, EffectRunner, RecordingTracker, TrackerEvent};
