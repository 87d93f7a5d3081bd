//! Hooks into the dependency-tracking collaborator
//!
//! The engine does not store subscriptions itself. Reads call [`track`] and
//! writes call [`trigger`]; both forward to the [`DependencyTracker`]
//! installed for the current thread, and are no-ops when none is installed.
//!
//! Tracking can be suspended with [`pause_tracking`]. Pauses nest: the
//! returned guard decrements a per-thread counter when it drops, so inner
//! pauses never resume an outer one early and a fault unwinding through the
//! guard still restores the counter.

use crate::operations::{TrackOpTypes, TriggerOpTypes};
use builtins::JsValue;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::debug;

/// The subscriber store the engine reports reads and writes to.
///
/// Implementations may re-enter the engine from either hook.
pub trait DependencyTracker {
    /// A read of `key` on the raw `target`
    fn track(&self, target: &JsValue, op: TrackOpTypes, key: &str);

    /// A completed write of `key` on the raw `target`
    fn trigger(
        &self,
        target: &JsValue,
        op: TriggerOpTypes,
        key: &str,
        new_value: Option<&JsValue>,
        old_value: Option<&JsValue>,
    );
}

thread_local! {
    static TRACKER: RefCell<Option<Rc<dyn DependencyTracker>>> = RefCell::new(None);
    static PAUSE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Install `tracker` for the current thread, returning the previous one
pub fn set_tracker(tracker: Rc<dyn DependencyTracker>) -> Option<Rc<dyn DependencyTracker>> {
    TRACKER.with(|slot| slot.borrow_mut().replace(tracker))
}

/// Remove the current thread's tracker
pub fn clear_tracker() -> Option<Rc<dyn DependencyTracker>> {
    TRACKER.with(|slot| slot.borrow_mut().take())
}

fn current_tracker() -> Option<Rc<dyn DependencyTracker>> {
    TRACKER.with(|slot| slot.borrow().clone())
}

/// Whether reads are currently reported
pub fn is_tracking() -> bool {
    PAUSE_DEPTH.with(|depth| depth.get() == 0)
}

/// Current pause nesting depth
pub fn pause_depth() -> usize {
    PAUSE_DEPTH.with(Cell::get)
}

/// Suspend [`track`] until the returned guard is dropped
pub fn pause_tracking() -> PauseTrackingGuard {
    let depth = PAUSE_DEPTH.with(|d| {
        let next = d.get() + 1;
        d.set(next);
        next
    });
    debug!(depth, "tracking paused");
    PauseTrackingGuard { _private: () }
}

/// Scope of a tracking pause
#[must_use = "tracking resumes as soon as the guard is dropped"]
#[derive(Debug)]
pub struct PauseTrackingGuard {
    _private: (),
}

impl Drop for PauseTrackingGuard {
    fn drop(&mut self) {
        let depth = PAUSE_DEPTH.with(|d| {
            let next = d.get().saturating_sub(1);
            d.set(next);
            next
        });
        debug!(depth, "tracking resumed");
    }
}

/// Report a read. Suppressed while tracking is paused.
pub fn track(target: &JsValue, op: TrackOpTypes, key: &str) {
    if !is_tracking() {
        return;
    }
    if let Some(tracker) = current_tracker() {
        tracker.track(target, op, key);
    }
}

/// Report a completed write
pub fn trigger(
    target: &JsValue,
    op: TriggerOpTypes,
    key: &str,
    new_value: Option<&JsValue>,
    old_value: Option<&JsValue>,
) {
    if let Some(tracker) = current_tracker() {
        tracker.trigger(target, op, key, new_value, old_value);
    }
}
