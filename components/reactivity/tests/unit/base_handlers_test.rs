//! Unit tests for the object and array traps

use super::{make_ref, num};
use builtins::JsValue;
use reactivity::{
    reactive, set_tracker, shallow_reactive, shallow_readonly, to_raw, RecordingTracker,
    TrackOpTypes, TrackerEvent, TriggerOpTypes, ITERATE_KEY,
};
use std::rc::Rc;

fn recorder() -> Rc<RecordingTracker> {
    let recorder = Rc::new(RecordingTracker::new());
    set_tracker(recorder.clone());
    recorder
}

#[test]
fn get_tracks_against_the_raw_target() {
    let recorder = recorder();
    let raw = JsValue::object_from([("a", num(1.0))]);
    reactive(&raw).get_property("a").unwrap();

    assert_eq!(
        recorder.events(),
        vec![TrackerEvent::Track {
            target: raw.object_identity().unwrap(),
            op: TrackOpTypes::Get,
            key: "a".to_string(),
        }]
    );
}

#[test]
fn flag_reads_are_not_tracked() {
    let recorder = recorder();
    let state = reactive(&JsValue::object());
    to_raw(&state);
    state.get_property("__v_isRef").unwrap();
    state.get_property("__v_skip").unwrap();

    assert!(recorder.events().is_empty());
}

#[test]
fn getter_runs_against_the_wrapper() {
    let recorder = recorder();
    let raw = JsValue::object_from([("n", num(21.0))]);
    raw.define_accessor(
        "double",
        Some(JsValue::function(|this, _| {
            let n = this.get_property("n")?.as_number().unwrap_or(0.0);
            Ok(JsValue::number(n * 2.0))
        })),
        None,
    );

    assert_eq!(reactive(&raw).get_property("double").unwrap(), num(42.0));
    assert_eq!(recorder.tracked_keys(), vec!["n", "double"]);
}

#[test]
fn set_classifies_add_and_set() {
    let recorder = recorder();
    let state = reactive(&JsValue::object_from([("a", num(1.0))]));

    state.set_property("b", num(1.0)).unwrap();
    state.set_property("a", num(1.0)).unwrap();
    state.set_property("a", num(2.0)).unwrap();

    assert_eq!(
        recorder.triggered(),
        vec![
            (TriggerOpTypes::Add, "b".to_string()),
            (TriggerOpTypes::Set, "a".to_string()),
        ]
    );
    match recorder.events().last() {
        Some(TrackerEvent::Trigger {
            new_value,
            old_value,
            ..
        }) => {
            assert_eq!(new_value, &Some(num(2.0)));
            assert_eq!(old_value, &Some(num(1.0)));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn set_compares_with_object_is() {
    let recorder = recorder();
    let state = reactive(&JsValue::object_from([("x", num(f64::NAN)), ("z", num(0.0))]));

    state.set_property("x", num(f64::NAN)).unwrap();
    state.set_property("z", num(-0.0)).unwrap();

    assert_eq!(recorder.triggered(), vec![(TriggerOpTypes::Set, "z".to_string())]);
}

#[test]
fn set_stores_raw_values() {
    let inner = JsValue::object();
    let raw = JsValue::object();
    let state = reactive(&raw);

    state.set_property("child", reactive(&inner)).unwrap();
    assert!(raw.get("child").unwrap().equals(&inner));

    // assigning the wrapper of the stored value is not a change
    let recorder = recorder();
    state.set_property("child", reactive(&inner)).unwrap();
    assert!(recorder.triggered().is_empty());
}

#[test]
fn shallow_set_keeps_wrappers() {
    let inner = JsValue::object();
    let raw = JsValue::object();
    let wrapped = reactive(&inner);

    shallow_reactive(&raw).set_property("child", wrapped.clone()).unwrap();
    assert!(raw.get("child").unwrap().equals(&wrapped));
}

#[test]
fn array_index_writes_add_then_set() {
    let recorder = recorder();
    let arr = reactive(&JsValue::array_from(vec![num(1.0)]));

    arr.set_property("0", num(5.0)).unwrap();
    arr.set_property("3", num(6.0)).unwrap();
    arr.set_property("length", num(1.0)).unwrap();

    assert_eq!(
        recorder.triggered(),
        vec![
            (TriggerOpTypes::Set, "0".to_string()),
            (TriggerOpTypes::Add, "3".to_string()),
            (TriggerOpTypes::Set, "length".to_string()),
        ]
    );
    assert_eq!(to_raw(&arr).array_length(), 1);
}

#[test]
fn writes_through_inheritance_do_not_trigger() {
    let parent = JsValue::object_from([("shared", num(1.0))]);
    let state = reactive(&parent);
    let child = JsValue::object_with_proto(&state);
    let recorder = recorder();

    assert!(child.set_property("shared", num(2.0)).unwrap());

    assert_eq!(child.get("shared"), Some(num(2.0)));
    assert_eq!(parent.get("shared"), Some(num(1.0)));
    assert!(recorder.triggered().is_empty());
}

#[test]
fn has_tracks_has() {
    let recorder = recorder();
    let state = reactive(&JsValue::object_from([("a", num(1.0))]));

    assert!(state.has_property("a").unwrap());
    assert!(!state.has_property("b").unwrap());
    assert_eq!(
        recorder
            .events()
            .iter()
            .filter(|e| matches!(e, TrackerEvent::Track { op: TrackOpTypes::Has, .. }))
            .count(),
        2
    );
}

#[test]
fn delete_triggers_only_existing_keys() {
    let recorder = recorder();
    let raw = JsValue::object_from([("a", num(1.0))]);
    let state = reactive(&raw);

    assert!(state.delete_property("a").unwrap());
    assert!(state.delete_property("missing").unwrap());

    assert!(!raw.has_own("a"));
    assert_eq!(recorder.triggered(), vec![(TriggerOpTypes::Delete, "a".to_string())]);
    match recorder.events().last() {
        Some(TrackerEvent::Trigger {
            new_value,
            old_value,
            ..
        }) => {
            assert_eq!(new_value, &None);
            assert_eq!(old_value, &Some(num(1.0)));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn own_keys_tracks_iteration() {
    let recorder = recorder();
    let object = reactive(&JsValue::object_from([("a", num(1.0))]));
    let array = reactive(&JsValue::array_from(vec![num(1.0)]));

    assert_eq!(object.own_keys().unwrap(), vec!["a"]);
    assert_eq!(array.own_keys().unwrap(), vec!["0", "length"]);

    let iterations: Vec<String> = recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            TrackerEvent::Track {
                op: TrackOpTypes::Iterate,
                key,
                ..
            } => Some(key),
            _ => None,
        })
        .collect();
    assert_eq!(iterations, vec![ITERATE_KEY.to_string(), "length".to_string()]);
}

#[test]
fn shallow_readonly_neither_tracks_nor_writes() {
    let recorder = recorder();
    let inner = JsValue::object();
    let raw = JsValue::object_from([("inner", inner.clone())]);
    let view = shallow_readonly(&raw);

    assert!(view.get_property("inner").unwrap().equals(&inner));
    assert!(!view.set_property("inner", num(1.0)).unwrap());
    assert!(recorder.events().is_empty());
}

#[test]
fn shallow_reactive_tracks_the_outer_level() {
    let recorder = recorder();
    let raw = JsValue::object_from([("r", make_ref(num(1.0)))]);

    shallow_reactive(&raw).get_property("r").unwrap();
    assert_eq!(recorder.tracked_keys(), vec!["r"]);
}
