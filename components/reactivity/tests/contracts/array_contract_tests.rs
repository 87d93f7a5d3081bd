//! Array instrumentation: search fallback, tracking pauses, fault unwinding

use super::{make_ref, num};
use builtins::JsValue;
use reactivity::{
    is_reactive, is_tracking, reactive, readonly, set_tracker, to_raw, EffectRunner,
    RecordingTracker, TriggerOpTypes,
};
use std::rc::Rc;

#[test]
fn includes_finds_wrapped_and_raw_arguments() {
    let obj = JsValue::object();
    let arr = reactive(&JsValue::array_from(vec![num(1.0), num(2.0), obj.clone()]));
    let wrapped = arr.get_property("2").unwrap();
    assert!(is_reactive(&wrapped));

    let found = JsValue::boolean(true);
    assert_eq!(arr.call_method("includes", vec![wrapped.clone()]).unwrap(), found);
    assert_eq!(arr.call_method("includes", vec![obj.clone()]).unwrap(), found);
    assert_eq!(arr.call_method("indexOf", vec![wrapped.clone()]).unwrap(), num(2.0));
    assert_eq!(arr.call_method("lastIndexOf", vec![obj]).unwrap(), num(2.0));
    assert_eq!(arr.call_method("indexOf", vec![JsValue::object()]).unwrap(), num(-1.0));
}

#[test]
fn wrapped_element_stored_raw_is_found_either_way() {
    let obj = JsValue::object();
    let arr = reactive(&JsValue::array());
    arr.call_method("push", vec![reactive(&obj)]).unwrap();

    // the set trap stores the raw element
    assert!(to_raw(&arr).get("0").unwrap().equals(&obj));
    assert_eq!(
        arr.call_method("includes", vec![reactive(&obj)]).unwrap(),
        JsValue::boolean(true)
    );
}

#[test]
fn search_tracks_length_and_every_index() {
    let recorder = Rc::new(RecordingTracker::new());
    set_tracker(recorder.clone());

    let arr = reactive(&JsValue::array_from(vec![num(1.0), num(2.0), num(3.0)]));
    arr.call_method("includes", vec![num(9.0)]).unwrap();

    assert_eq!(recorder.tracked_keys(), vec!["length", "0", "1", "2"]);
}

#[test]
fn mutating_methods_trigger_without_tracking() {
    let recorder = Rc::new(RecordingTracker::new());
    set_tracker(recorder.clone());

    let arr = reactive(&JsValue::array_from(vec![num(1.0)]));
    arr.call_method("push", vec![num(2.0)]).unwrap();

    assert!(recorder.tracked_keys().is_empty());
    assert_eq!(recorder.triggered(), vec![(TriggerOpTypes::Add, "1".to_string())]);
    assert!(is_tracking());

    recorder.take();
    assert_eq!(arr.call_method("pop", vec![]).unwrap(), num(2.0));
    assert!(recorder.tracked_keys().is_empty());
    assert_eq!(
        recorder.triggered(),
        vec![
            (TriggerOpTypes::Delete, "1".to_string()),
            (TriggerOpTypes::Set, "length".to_string()),
        ]
    );
}

#[test]
fn pushing_effects_do_not_retrigger_each_other() {
    let runner = Rc::new(EffectRunner::new());
    set_tracker(runner.clone());
    let arr = reactive(&JsValue::array());

    let first = {
        let arr = arr.clone();
        runner
            .effect(move || arr.call_method("push", vec![num(1.0)]).map(|_| ()))
            .unwrap()
    };
    let second = {
        let arr = arr.clone();
        runner
            .effect(move || arr.call_method("push", vec![num(2.0)]).map(|_| ()))
            .unwrap()
    };

    assert_eq!(runner.run_count(first), 1);
    assert_eq!(runner.run_count(second), 1);
    assert_eq!(to_raw(&arr).array_length(), 2);
}

#[test]
fn effect_reading_length_and_pushing_terminates() {
    let runner = Rc::new(EffectRunner::with_max_runs(50));
    set_tracker(runner.clone());
    let arr = reactive(&JsValue::array());

    let id = {
        let arr = arr.clone();
        runner
            .effect(move || {
                let len = arr.get_property("length")?;
                arr.call_method("push", vec![len])?;
                Ok(())
            })
            .unwrap()
    };
    assert_eq!(runner.run_count(id), 1);

    // truncating from outside re-runs the subscriber exactly once
    arr.set_property("length", num(0.0)).unwrap();
    assert_eq!(runner.run_count(id), 2);
    assert_eq!(to_raw(&arr).get("0"), Some(num(0.0)));
    assert_eq!(to_raw(&arr).array_length(), 1);
    assert!(is_tracking());
}

#[test]
fn native_fault_unwinds_the_pause() {
    let arr = reactive(&JsValue::array_from(vec![readonly(&make_ref(num(1.0)))]));

    let err = arr.call_method("unshift", vec![num(0.0)]).unwrap_err();

    assert!(err.message.starts_with("TypeError"));
    assert!(is_tracking());
}

#[test]
fn splice_through_wrapper_reports_writes() {
    let recorder = Rc::new(RecordingTracker::new());
    set_tracker(recorder.clone());

    let arr = reactive(&JsValue::array_from(vec![num(1.0), num(2.0), num(3.0)]));
    let removed = arr.call_method("splice", vec![num(0.0), num(1.0)]).unwrap();

    assert_eq!(removed.get("0"), Some(num(1.0)));
    assert_eq!(to_raw(&arr).array_length(), 2);
    let triggered = recorder.triggered();
    assert!(triggered.contains(&(TriggerOpTypes::Set, "0".to_string())));
    assert!(triggered.contains(&(TriggerOpTypes::Set, "length".to_string())));
    assert!(recorder.tracked_keys().is_empty());
}

#[test]
fn huge_length_write_is_a_range_error_not_an_abort() {
    let recorder = Rc::new(RecordingTracker::new());
    set_tracker(recorder.clone());

    let raw = JsValue::array_from(vec![num(1.0)]);
    let arr = reactive(&raw);

    let err = arr.set_property("length", num(4294967294.0)).unwrap_err();
    assert!(err.message.starts_with("RangeError"));
    let err = arr.set_property("4294967290", num(2.0)).unwrap_err();
    assert!(err.message.starts_with("RangeError"));

    assert_eq!(raw.array_length(), 1);
    assert!(recorder.triggered().is_empty());
}
