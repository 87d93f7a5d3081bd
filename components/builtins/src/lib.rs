//! JavaScript object model and standard-library subset
//!
//! This crate provides the heap objects an interception layer works against:
//! - [`JsValue`] - values, plain objects (data and accessor properties),
//!   arrays, keyed collections, native functions
//! - [`ProxyObject`] / [`ProxyHandler`] - explicit interception wrappers
//! - [`ReflectObject`] - receiver-aware default behavior of every trap
//! - [`ArrayPrototype`] - array methods written against `[[Get]]`/`[[Set]]`
//!
//! # Example
//!
//! ```
//! use builtins::{JsValue, ArrayPrototype};
//!
//! let arr = JsValue::array_from(vec![JsValue::number(1.0), JsValue::number(2.0)]);
//! ArrayPrototype::push(&arr, &[JsValue::number(3.0)]).unwrap();
//!
//! assert_eq!(arr.get_property("length").unwrap().as_number(), Some(3.0));
//! assert_eq!(
//!     arr.call_method("includes", vec![JsValue::number(2.0)]).unwrap(),
//!     JsValue::boolean(true)
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod proxy;
pub mod reflect;
pub mod value;

// Re-export main types for convenience
pub use array::ArrayPrototype;
pub use proxy::{ProxyHandler, ProxyObject, WeakProxy};
pub use reflect::ReflectObject;
pub use value::{JsError, JsResult, JsValue};
