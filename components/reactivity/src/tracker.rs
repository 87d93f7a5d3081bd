//! In-process [`DependencyTracker`] implementations
//!
//! [`RecordingTracker`] keeps a log of every hook call. [`EffectRunner`] is a
//! minimal subscriber store: effects subscribe to what they read and re-run
//! when it is written.

use crate::effect::DependencyTracker;
use crate::operations::{TrackOpTypes, TriggerOpTypes, ITERATE_KEY};
use crate::shared::{is_array, is_integer_key};
use builtins::reflect::array_index;
use builtins::{JsError, JsResult, JsValue};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// One hook call
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// A reported read
    Track {
        /// Identity of the raw target
        target: usize,
        /// Read kind
        op: TrackOpTypes,
        /// Key read
        key: String,
    },
    /// A reported write
    Trigger {
        /// Identity of the raw target
        target: usize,
        /// Write kind
        op: TriggerOpTypes,
        /// Key written
        key: String,
        /// Value after the write
        new_value: Option<JsValue>,
        /// Value before the write
        old_value: Option<JsValue>,
    },
}

impl TrackerEvent {
    /// The key the event concerns
    pub fn key(&self) -> &str {
        match self {
            TrackerEvent::Track { key, .. } | TrackerEvent::Trigger { key, .. } => key,
        }
    }

    /// Whether this is a read
    pub fn is_track(&self) -> bool {
        matches!(self, TrackerEvent::Track { .. })
    }
}

impl fmt::Display for TrackerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerEvent::Track { op, key, .. } => write!(f, "track   {:<8} {}", op, key),
            TrackerEvent::Trigger {
                op,
                key,
                new_value,
                old_value,
                ..
            } => {
                let show = |v: &Option<JsValue>| {
                    v.as_ref()
                        .map(JsValue::to_js_string)
                        .unwrap_or_else(|| "-".to_string())
                };
                write!(
                    f,
                    "trigger {:<8} {} ({} -> {})",
                    op,
                    key,
                    show(old_value),
                    show(new_value)
                )
            }
        }
    }
}

/// Records every hook call in order
#[derive(Debug, Default)]
pub struct RecordingTracker {
    events: RefCell<Vec<TrackerEvent>>,
}

impl RecordingTracker {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the log
    pub fn events(&self) -> Vec<TrackerEvent> {
        self.events.borrow().clone()
    }

    /// Drain the log
    pub fn take(&self) -> Vec<TrackerEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Keys of recorded reads
    pub fn tracked_keys(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.is_track())
            .map(|e| e.key().to_string())
            .collect()
    }

    /// `(op, key)` of recorded writes
    pub fn triggered(&self) -> Vec<(TriggerOpTypes, String)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                TrackerEvent::Trigger { op, key, .. } => Some((*op, key.clone())),
                TrackerEvent::Track { .. } => None,
            })
            .collect()
    }
}

impl DependencyTracker for RecordingTracker {
    fn track(&self, target: &JsValue, op: TrackOpTypes, key: &str) {
        self.events.borrow_mut().push(TrackerEvent::Track {
            target: target.object_identity().unwrap_or(0),
            op,
            key: key.to_string(),
        });
    }

    fn trigger(
        &self,
        target: &JsValue,
        op: TriggerOpTypes,
        key: &str,
        new_value: Option<&JsValue>,
        old_value: Option<&JsValue>,
    ) {
        self.events.borrow_mut().push(TrackerEvent::Trigger {
            target: target.object_identity().unwrap_or(0),
            op,
            key: key.to_string(),
            new_value: new_value.cloned(),
            old_value: old_value.cloned(),
        });
    }
}

/// Identifier of an effect registered with an [`EffectRunner`]
pub type EffectId = usize;

type Effect = Rc<dyn Fn() -> JsResult<()>>;

/// Runs effects and re-runs them when something they read is written.
///
/// An effect is never re-entered while it is already running.
pub struct EffectRunner {
    effects: RefCell<Vec<Effect>>,
    runs: RefCell<Vec<usize>>,
    active: RefCell<Vec<EffectId>>,
    deps: RefCell<HashMap<(usize, String), Vec<EffectId>>>,
    total_runs: Cell<usize>,
    max_runs: usize,
}

impl Default for EffectRunner {
    fn default() -> Self {
        Self::with_max_runs(1000)
    }
}

impl fmt::Debug for EffectRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectRunner")
            .field("effects", &self.effects.borrow().len())
            .field("total_runs", &self.total_runs.get())
            .finish()
    }
}

impl EffectRunner {
    /// Create a runner with the default run cap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner that refuses to run more than `max_runs` times in total
    pub fn with_max_runs(max_runs: usize) -> Self {
        EffectRunner {
            effects: RefCell::new(Vec::new()),
            runs: RefCell::new(Vec::new()),
            active: RefCell::new(Vec::new()),
            deps: RefCell::new(HashMap::new()),
            total_runs: Cell::new(0),
            max_runs,
        }
    }

    /// Register `f` and run it once
    pub fn effect<F>(&self, f: F) -> JsResult<EffectId>
    where
        F: Fn() -> JsResult<()> + 'static,
    {
        let id = {
            let mut effects = self.effects.borrow_mut();
            effects.push(Rc::new(f));
            effects.len() - 1
        };
        self.runs.borrow_mut().push(0);
        self.run(id)?;
        Ok(id)
    }

    /// Run effect `id`, re-collecting its dependencies
    pub fn run(&self, id: EffectId) -> JsResult<()> {
        let effect = self
            .effects
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| JsError::new(format!("unknown effect {}", id)))?;

        if self.total_runs.get() >= self.max_runs {
            return Err(JsError::range_error("Maximum recursive updates exceeded"));
        }
        self.total_runs.set(self.total_runs.get() + 1);
        self.runs.borrow_mut()[id] += 1;

        for subscribers in self.deps.borrow_mut().values_mut() {
            subscribers.retain(|e| *e != id);
        }

        debug!(effect = id, "running effect");
        self.active.borrow_mut().push(id);
        let result = effect();
        self.active.borrow_mut().pop();
        result
    }

    /// How many times effect `id` has run
    pub fn run_count(&self, id: EffectId) -> usize {
        self.runs.borrow().get(id).copied().unwrap_or(0)
    }

    /// Runs across all effects
    pub fn total_runs(&self) -> usize {
        self.total_runs.get()
    }

    fn subscribers_of(&self, target: usize, key: &str) -> Vec<EffectId> {
        self.deps
            .borrow()
            .get(&(target, key.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Keys whose subscribers a write to `key` concerns
    fn affected_keys(
        &self,
        target: &JsValue,
        op: TriggerOpTypes,
        key: &str,
        new_value: Option<&JsValue>,
    ) -> Vec<String> {
        let mut keys = vec![key.to_string()];
        let target_is_array = is_array(target);
        match op {
            TriggerOpTypes::Add if target_is_array && is_integer_key(key) => {
                keys.push("length".to_string());
            }
            TriggerOpTypes::Add | TriggerOpTypes::Delete if !target_is_array => {
                keys.push(ITERATE_KEY.to_string());
            }
            _ => {}
        }
        if target_is_array && key == "length" {
            let new_len = new_value.and_then(JsValue::as_number).unwrap_or(0.0) as usize;
            let id = target.object_identity().unwrap_or(0);
            keys.extend(
                self.deps
                    .borrow()
                    .keys()
                    .filter(|(t, k)| *t == id && array_index(k).is_some_and(|i| i >= new_len))
                    .map(|(_, k)| k.clone()),
            );
        }
        keys
    }
}

impl DependencyTracker for EffectRunner {
    fn track(&self, target: &JsValue, _op: TrackOpTypes, key: &str) {
        let Some(&active) = self.active.borrow().last() else {
            return;
        };
        let id = target.object_identity().unwrap_or(0);
        let mut deps = self.deps.borrow_mut();
        let subscribers = deps.entry((id, key.to_string())).or_default();
        if !subscribers.contains(&active) {
            subscribers.push(active);
        }
    }

    fn trigger(
        &self,
        target: &JsValue,
        op: TriggerOpTypes,
        key: &str,
        new_value: Option<&JsValue>,
        _old_value: Option<&JsValue>,
    ) {
        let id = target.object_identity().unwrap_or(0);
        let mut pending: Vec<EffectId> = Vec::new();
        for affected in self.affected_keys(target, op, key, new_value) {
            for effect in self.subscribers_of(id, &affected) {
                if !pending.contains(&effect) {
                    pending.push(effect);
                }
            }
        }
        pending.retain(|effect| !self.active.borrow().contains(effect));

        for effect in pending {
            if let Err(err) = self.run(effect) {
                warn!(effect, %err, "effect failed while re-running");
            }
        }
    }
}
