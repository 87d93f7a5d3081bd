//! Array.prototype methods
//!
//! Every method is generic over its `this` value: `length` and elements are
//! read through `[[Get]]` and written through `[[Set]]`, so the same code
//! runs against a raw array or against a proxy that wraps one. A refused
//! `[[Set]]` raises a TypeError.

use crate::reflect::ReflectObject;
use crate::value::{JsError, JsResult, JsValue};

/// Methods resolvable on every array through its prototype
const METHODS: &[&str] = &[
    "push",
    "pop",
    "shift",
    "unshift",
    "splice",
    "includes",
    "indexOf",
    "lastIndexOf",
    "slice",
    "join",
];

/// Array.prototype methods
pub struct ArrayPrototype;

impl ArrayPrototype {
    /// Whether `name` is an `Array.prototype` method
    pub fn is_method(name: &str) -> bool {
        METHODS.contains(&name)
    }

    /// The native function for `name`, if it is an `Array.prototype` method
    pub fn method(name: &str) -> Option<JsValue> {
        let name: &'static str = METHODS.iter().copied().find(|m| *m == name)?;
        Some(JsValue::function(move |this, args| {
            ArrayPrototype::invoke(name, &this, &args)
        }))
    }

    /// Call the method `name` with `this` and `args`
    pub fn invoke(name: &str, this: &JsValue, args: &[JsValue]) -> JsResult<JsValue> {
        let undefined = JsValue::undefined();
        let search = args.first().unwrap_or(&undefined);
        match name {
            "push" => Self::push(this, args),
            "pop" => Self::pop(this),
            "shift" => Self::shift(this),
            "unshift" => Self::unshift(this, args),
            "splice" => Self::splice(this, args),
            "includes" => Self::includes(this, search, args.get(1)),
            "indexOf" => Self::index_of(this, search, args.get(1)),
            "lastIndexOf" => Self::last_index_of(this, search, args.get(1)),
            "slice" => Self::slice(this, args.first(), args.get(1)),
            "join" => Self::join(this, args.first()),
            _ => Err(JsError::type_error(format!(
                "Array.prototype.{} is not a function",
                name
            ))),
        }
    }

    /// Array.prototype.push(...items)
    pub fn push(this: &JsValue, items: &[JsValue]) -> JsResult<JsValue> {
        let len = length_of(this)?;
        for (i, item) in items.iter().enumerate() {
            set_or_throw(this, &(len + i).to_string(), item.clone())?;
        }
        let new_len = len + items.len();
        set_or_throw(this, "length", JsValue::number(new_len as f64))?;
        Ok(JsValue::number(new_len as f64))
    }

    /// Array.prototype.pop()
    pub fn pop(this: &JsValue) -> JsResult<JsValue> {
        let len = length_of(this)?;
        if len == 0 {
            set_or_throw(this, "length", JsValue::number(0.0))?;
            return Ok(JsValue::undefined());
        }
        let index = (len - 1).to_string();
        let element = ReflectObject::get(this, &index, None)?;
        delete_or_throw(this, &index)?;
        set_or_throw(this, "length", JsValue::number((len - 1) as f64))?;
        Ok(element)
    }

    /// Array.prototype.shift()
    pub fn shift(this: &JsValue) -> JsResult<JsValue> {
        let len = length_of(this)?;
        if len == 0 {
            set_or_throw(this, "length", JsValue::number(0.0))?;
            return Ok(JsValue::undefined());
        }
        let first = ReflectObject::get(this, "0", None)?;
        for k in 1..len {
            move_element(this, k, k - 1)?;
        }
        delete_or_throw(this, &(len - 1).to_string())?;
        set_or_throw(this, "length", JsValue::number((len - 1) as f64))?;
        Ok(first)
    }

    /// Array.prototype.unshift(...items)
    pub fn unshift(this: &JsValue, items: &[JsValue]) -> JsResult<JsValue> {
        let len = length_of(this)?;
        let count = items.len();
        if count > 0 {
            for k in (0..len).rev() {
                move_element(this, k, k + count)?;
            }
            for (j, item) in items.iter().enumerate() {
                set_or_throw(this, &j.to_string(), item.clone())?;
            }
        }
        let new_len = len + count;
        set_or_throw(this, "length", JsValue::number(new_len as f64))?;
        Ok(JsValue::number(new_len as f64))
    }

    /// Array.prototype.splice(start, deleteCount, ...items)
    ///
    /// Returns a new (raw) array of the removed elements.
    pub fn splice(this: &JsValue, args: &[JsValue]) -> JsResult<JsValue> {
        let len = length_of(this)?;
        let start = relative_index(args.first(), len, 0);
        let delete_count = match args.len() {
            0 => 0,
            1 => len - start,
            _ => clamp_integer(&args[1], 0, len - start),
        };
        let items = args.get(2..).unwrap_or(&[]);
        let item_count = items.len();

        let mut removed = Vec::with_capacity(delete_count);
        for k in 0..delete_count {
            removed.push(ReflectObject::get(this, &(start + k).to_string(), None)?);
        }

        if item_count < delete_count {
            for k in start..(len - delete_count) {
                move_element(this, k + delete_count, k + item_count)?;
            }
            for k in ((len - delete_count + item_count)..len).rev() {
                delete_or_throw(this, &k.to_string())?;
            }
        } else if item_count > delete_count {
            for k in (start..(len - delete_count)).rev() {
                move_element(this, k + delete_count, k + item_count)?;
            }
        }

        for (j, item) in items.iter().enumerate() {
            set_or_throw(this, &(start + j).to_string(), item.clone())?;
        }
        let new_len = len - delete_count + item_count;
        set_or_throw(this, "length", JsValue::number(new_len as f64))?;
        Ok(JsValue::array_from(removed))
    }

    /// Array.prototype.includes(searchElement, fromIndex) - SameValueZero
    pub fn includes(
        this: &JsValue,
        search: &JsValue,
        from_index: Option<&JsValue>,
    ) -> JsResult<JsValue> {
        let len = length_of(this)?;
        for k in relative_index(from_index, len, 0)..len {
            let element = ReflectObject::get(this, &k.to_string(), None)?;
            if element.same_value_zero(search) {
                return Ok(JsValue::boolean(true));
            }
        }
        Ok(JsValue::boolean(false))
    }

    /// Array.prototype.indexOf(searchElement, fromIndex) - strict equality
    pub fn index_of(
        this: &JsValue,
        search: &JsValue,
        from_index: Option<&JsValue>,
    ) -> JsResult<JsValue> {
        let len = length_of(this)?;
        for k in relative_index(from_index, len, 0)..len {
            let key = k.to_string();
            if ReflectObject::has(this, &key)?
                && ReflectObject::get(this, &key, None)?.equals(search)
            {
                return Ok(JsValue::number(k as f64));
            }
        }
        Ok(JsValue::number(-1.0))
    }

    /// Array.prototype.lastIndexOf(searchElement, fromIndex) - strict equality
    pub fn last_index_of(
        this: &JsValue,
        search: &JsValue,
        from_index: Option<&JsValue>,
    ) -> JsResult<JsValue> {
        let len = length_of(this)?;
        if len == 0 {
            return Ok(JsValue::number(-1.0));
        }
        let start = match from_index {
            None => len as f64 - 1.0,
            Some(value) => {
                let n = to_integer(value);
                if n >= 0.0 {
                    n.min(len as f64 - 1.0)
                } else {
                    len as f64 + n
                }
            }
        };
        if start < 0.0 {
            return Ok(JsValue::number(-1.0));
        }
        for k in (0..=start as usize).rev() {
            let key = k.to_string();
            if ReflectObject::has(this, &key)?
                && ReflectObject::get(this, &key, None)?.equals(search)
            {
                return Ok(JsValue::number(k as f64));
            }
        }
        Ok(JsValue::number(-1.0))
    }

    /// Array.prototype.slice(start, end)
    pub fn slice(this: &JsValue, start: Option<&JsValue>, end: Option<&JsValue>) -> JsResult<JsValue> {
        let len = length_of(this)?;
        let from = relative_index(start, len, 0);
        let to = match end {
            None | Some(JsValue::Undefined) => len,
            Some(_) => relative_index(end, len, len),
        };
        let mut sliced = Vec::new();
        for k in from..to.max(from) {
            sliced.push(ReflectObject::get(this, &k.to_string(), None)?);
        }
        Ok(JsValue::array_from(sliced))
    }

    /// Array.prototype.join(separator)
    pub fn join(this: &JsValue, separator: Option<&JsValue>) -> JsResult<JsValue> {
        let separator = match separator {
            None | Some(JsValue::Undefined) => ",".to_string(),
            Some(sep) => sep.to_js_string(),
        };
        let len = length_of(this)?;
        let mut parts = Vec::with_capacity(len);
        for k in 0..len {
            let element = ReflectObject::get(this, &k.to_string(), None)?;
            parts.push(match element {
                JsValue::Undefined | JsValue::Null => String::new(),
                other => other.to_js_string(),
            });
        }
        Ok(JsValue::string(parts.join(&separator)))
    }
}

fn length_of(this: &JsValue) -> JsResult<usize> {
    let len = ReflectObject::get(this, "length", None)?;
    let n = to_integer(&len);
    Ok(if n <= 0.0 { 0 } else { n as usize })
}

fn set_or_throw(this: &JsValue, key: &str, value: JsValue) -> JsResult<()> {
    if ReflectObject::set(this, key, value, None)? {
        Ok(())
    } else {
        Err(JsError::type_error(format!(
            "Cannot assign to property '{}' of array",
            key
        )))
    }
}

fn delete_or_throw(this: &JsValue, key: &str) -> JsResult<()> {
    if ReflectObject::delete_property(this, key)? {
        Ok(())
    } else {
        Err(JsError::type_error(format!(
            "Cannot delete property '{}' of array",
            key
        )))
    }
}

/// Move element `from` to `to`, leaving a hole at `to` when `from` is absent
fn move_element(this: &JsValue, from: usize, to: usize) -> JsResult<()> {
    let from = from.to_string();
    let to = to.to_string();
    if ReflectObject::has(this, &from)? {
        let value = ReflectObject::get(this, &from, None)?;
        set_or_throw(this, &to, value)
    } else {
        delete_or_throw(this, &to)
    }
}

/// ToIntegerOrInfinity for the numeric arguments these methods accept
fn to_integer(value: &JsValue) -> f64 {
    match value {
        JsValue::Number(n) if n.is_nan() => 0.0,
        JsValue::Number(n) => n.trunc(),
        JsValue::Boolean(true) => 1.0,
        JsValue::String(s) => s.trim().parse::<f64>().map(f64::trunc).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Resolve a relative start/end argument against `len`
fn relative_index(value: Option<&JsValue>, len: usize, default: usize) -> usize {
    let n = match value {
        None | Some(JsValue::Undefined) => return default,
        Some(v) => to_integer(v),
    };
    if n < 0.0 {
        (len as f64 + n).max(0.0) as usize
    } else {
        n.min(len as f64) as usize
    }
}

fn clamp_integer(value: &JsValue, min: usize, max: usize) -> usize {
    to_integer(value).max(min as f64).min(max as f64) as usize
}
