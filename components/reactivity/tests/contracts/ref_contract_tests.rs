//! Boxed references inside wrapped objects and arrays

use super::{make_ref, num};
use builtins::JsValue;
use reactivity::{is_ref, reactive, readonly, shallow_reactive, to_raw, unref};

#[test]
fn object_property_ref_is_unwrapped() {
    let state = reactive(&JsValue::object_from([("count", make_ref(num(0.0)))]));
    assert_eq!(state.get_property("count").unwrap(), num(0.0));
}

#[test]
fn array_index_ref_keeps_the_box() {
    let arr = reactive(&JsValue::array_from(vec![make_ref(num(0.0))]));
    let slot = arr.get_property("0").unwrap();

    assert!(is_ref(&slot));
    assert_eq!(unref(&slot).unwrap(), num(0.0));
}

#[test]
fn array_named_property_ref_is_unwrapped() {
    let raw = JsValue::array();
    raw.set("total", make_ref(num(4.0)));
    let arr = reactive(&raw);

    assert_eq!(arr.get_property("total").unwrap(), num(4.0));
}

#[test]
fn readonly_ref_slot_rejects_plain_values() {
    let state = reactive(&JsValue::object_from([(
        "count",
        readonly(&make_ref(num(5.0))),
    )]));

    assert!(!state.set_property("count", num(10.0)).unwrap());
    assert_eq!(state.get_property("count").unwrap(), num(5.0));
}

#[test]
fn readonly_ref_slot_accepts_another_ref() {
    let raw = JsValue::object_from([("count", readonly(&make_ref(num(5.0))))]);
    let state = reactive(&raw);

    assert!(state.set_property("count", make_ref(num(7.0))).unwrap());
    assert_eq!(state.get_property("count").unwrap(), num(7.0));
}

#[test]
fn shallow_modes_do_not_unwrap() {
    let box_ = make_ref(num(1.0));
    let state = shallow_reactive(&JsValue::object_from([("r", box_.clone())]));

    let read = state.get_property("r").unwrap();
    assert!(read.equals(&box_));
}

#[test]
fn wrapped_ref_objects_still_answer_is_ref() {
    let box_ = make_ref(num(2.0));
    let wrapped = reactive(&box_);

    assert!(is_ref(&wrapped));
    assert_eq!(unref(&wrapped).unwrap(), num(2.0));
    assert!(to_raw(&wrapped).equals(&box_));
}
