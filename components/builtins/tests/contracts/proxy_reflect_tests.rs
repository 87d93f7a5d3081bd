//! Contract tests for Proxy and Reflect
//!
//! These tests verify that Proxy intercepts the property operations and that
//! Reflect supplies receiver-aware defaults for them.

use builtins::reflect::MAX_DENSE_LENGTH;
use builtins::{JsError, JsValue, ProxyHandler, ProxyObject, ReflectObject};
use std::cell::RefCell;
use std::rc::Rc;

mod reflect_tests {
    use super::*;

    #[test]
    fn test_reflect_get_basic() {
        let obj = JsValue::object();
        obj.set("foo", JsValue::number(42.0));

        let result = ReflectObject::get(&obj, "foo", None).unwrap();
        assert_eq!(result.as_number(), Some(42.0));
    }

    #[test]
    fn test_reflect_get_with_receiver_runs_getter_on_receiver() {
        let target = JsValue::object();
        target.define_accessor(
            "double",
            Some(JsValue::function(|this, _| {
                let n = this.get_property("n")?.as_number().unwrap_or(0.0);
                Ok(JsValue::number(n * 2.0))
            })),
            None,
        );
        let receiver = JsValue::object_from([("n", JsValue::number(21.0))]);

        let result = ReflectObject::get(&target, "double", Some(&receiver)).unwrap();
        assert_eq!(result.as_number(), Some(42.0));
    }

    #[test]
    fn test_reflect_set_basic() {
        let obj = JsValue::object();

        let result = ReflectObject::set(&obj, "bar", JsValue::string("hello"), None).unwrap();
        assert!(result);
        assert_eq!(obj.get("bar").unwrap().as_string(), Some("hello".to_string()));
    }

    #[test]
    fn test_reflect_set_with_receiver_defines_on_receiver() {
        let target = JsValue::object_from([("x", JsValue::number(1.0))]);
        let receiver = JsValue::object();

        assert!(ReflectObject::set(&target, "x", JsValue::number(2.0), Some(&receiver)).unwrap());
        assert_eq!(target.get("x"), Some(JsValue::number(1.0)));
        assert_eq!(receiver.get("x"), Some(JsValue::number(2.0)));
    }

    #[test]
    fn test_reflect_setter_error_propagates() {
        let obj = JsValue::object();
        obj.define_accessor(
            "locked",
            None,
            Some(JsValue::function(|_, _| Err(JsError::type_error("locked")))),
        );

        assert!(ReflectObject::set(&obj, "locked", JsValue::null(), None).is_err());
    }

    #[test]
    fn test_reflect_has_follows_prototype() {
        let proto = JsValue::object_from([("inherited", JsValue::boolean(true))]);
        let obj = JsValue::object_with_proto(&proto);

        assert!(ReflectObject::has(&obj, "inherited").unwrap());
        assert!(!ReflectObject::has_own_property(&obj, "inherited").unwrap());
        assert!(!ReflectObject::has(&obj, "missing").unwrap());
    }

    #[test]
    fn test_reflect_own_keys() {
        let obj = JsValue::object_from([
            ("a", JsValue::number(1.0)),
            ("b", JsValue::number(2.0)),
            ("c", JsValue::number(3.0)),
        ]);

        let mut keys = ReflectObject::own_keys(&obj).unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_reflect_prevent_extensions() {
        let obj = JsValue::object();

        assert!(ReflectObject::is_extensible(&obj).unwrap());
        assert!(ReflectObject::prevent_extensions(&obj).unwrap());
        assert!(!ReflectObject::is_extensible(&obj).unwrap());
    }

    #[test]
    fn test_reflect_type_error_on_non_object() {
        let non_obj = JsValue::number(42.0);

        let result = ReflectObject::get(&non_obj, "foo", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_reflect_array_length_past_dense_storage_is_range_error() {
        let arr = JsValue::array_from(vec![JsValue::number(1.0)]);

        let err = ReflectObject::set(&arr, "length", JsValue::number(4294967294.0), None)
            .unwrap_err();
        assert!(err.message.starts_with("RangeError"));

        let index = (MAX_DENSE_LENGTH + 1).to_string();
        let err = ReflectObject::set(&arr, &index, JsValue::number(2.0), None).unwrap_err();
        assert!(err.message.starts_with("RangeError"));

        assert_eq!(arr.array_length(), 1);
    }

    #[test]
    fn test_reflect_collection_named_properties() {
        let map = JsValue::map();

        assert!(ReflectObject::get(&map, "marker", None).unwrap().is_undefined());
        assert!(map.set("marker", JsValue::boolean(true)));
        assert_eq!(
            ReflectObject::get(&map, "marker", None).unwrap(),
            JsValue::boolean(true)
        );
        assert!(ReflectObject::has(&map, "marker").unwrap());
        assert!(ReflectObject::has(&map, "size").unwrap());
        assert_eq!(ReflectObject::own_keys(&map).unwrap(), vec!["marker".to_string()]);
        assert!(ReflectObject::delete_property(&map, "marker").unwrap());
        assert!(!ReflectObject::has(&map, "marker").unwrap());
    }
}

mod proxy_tests {
    use super::*;

    fn proxy_of(target: &JsValue, handler: ProxyHandler) -> JsValue {
        JsValue::from_proxy(ProxyObject::new(target.clone(), Rc::new(handler)).unwrap())
    }

    #[test]
    fn test_proxy_get_trap() {
        let target = JsValue::object();
        target.set("original", JsValue::number(10.0));

        let mut handler = ProxyHandler::default();
        handler.get = Some(Box::new(|_target, key, _receiver| {
            Ok(JsValue::string(format!("intercepted_{}", key)))
        }));

        let proxy = proxy_of(&target, handler);
        let result = proxy.get_property("original").unwrap();

        assert_eq!(result.as_string(), Some("intercepted_original".to_string()));
    }

    #[test]
    fn test_proxy_set_trap() {
        let target = JsValue::object();
        let set_called = Rc::new(RefCell::new(false));
        let set_called_clone = set_called.clone();

        let mut handler = ProxyHandler::default();
        handler.set = Some(Box::new(move |target, key, value, _receiver| {
            *set_called_clone.borrow_mut() = true;
            if let Some(n) = value.as_number() {
                target.set(key, JsValue::number(n * 2.0));
            }
            Ok(true)
        }));

        let proxy = proxy_of(&target, handler);
        let result = proxy.set_property("count", JsValue::number(5.0)).unwrap();

        assert!(result);
        assert!(*set_called.borrow());
        assert_eq!(target.get("count").unwrap().as_number(), Some(10.0));
    }

    #[test]
    fn test_proxy_receiver_is_inheriting_object() {
        let seen = Rc::new(RefCell::new(None));
        let seen_clone = seen.clone();

        let mut handler = ProxyHandler::default();
        handler.get = Some(Box::new(move |target, key, receiver| {
            *seen_clone.borrow_mut() = Some(receiver.clone());
            ReflectObject::get(target, key, Some(receiver))
        }));

        let proxy = proxy_of(&JsValue::object(), handler);
        let child = JsValue::object_with_proto(&proxy);
        child.get_property("anything").unwrap();

        let receiver = seen.borrow().clone().unwrap();
        assert!(receiver.equals(&child));
        assert!(!receiver.equals(&proxy));
    }

    #[test]
    fn test_proxy_equality_is_identity() {
        let target = JsValue::object();
        let a = proxy_of(&target, ProxyHandler::default());
        let b = proxy_of(&target, ProxyHandler::default());

        assert!(a.equals(&a.clone()));
        assert!(!a.equals(&b));
        assert!(!a.equals(&target));
    }

    #[test]
    fn test_proxy_has_trap() {
        let target = JsValue::object();
        target.set("secret", JsValue::boolean(true));

        let mut handler = ProxyHandler::default();
        handler.has = Some(Box::new(|_target, key| Ok(key != "secret")));

        let proxy = proxy_of(&target, handler);

        assert!(!proxy.has_property("secret").unwrap());
        assert!(proxy.has_property("public").unwrap());
    }

    #[test]
    fn test_proxy_delete_and_own_keys_traps() {
        let deleted = Rc::new(RefCell::new(Vec::new()));
        let deleted_clone = deleted.clone();

        let mut handler = ProxyHandler::default();
        handler.delete_property = Some(Box::new(move |target, key| {
            deleted_clone.borrow_mut().push(key.to_string());
            ReflectObject::delete_property(target, key)
        }));
        handler.own_keys = Some(Box::new(|_target| Ok(vec!["virtual".to_string()])));

        let target = JsValue::object_from([("a", JsValue::number(1.0))]);
        let proxy = proxy_of(&target, handler);

        assert!(proxy.delete_property("a").unwrap());
        assert_eq!(*deleted.borrow(), vec!["a".to_string()]);
        assert_eq!(proxy.own_keys().unwrap(), vec!["virtual".to_string()]);
    }

    #[test]
    fn test_proxy_raw_type_reports_target() {
        let proxy = proxy_of(&JsValue::array(), ProxyHandler::default());
        assert_eq!(proxy.raw_type(), "Array");
        assert_eq!(proxy.to_js_string(), "");
    }
}
