//! In-memory object-graph values.
//!
//! This module provides the value type keyquill paths resolve against.
//! A graph is built from nested objects (insertion-ordered maps), arrays,
//! scalars, and callable values. Objects use `IndexMap` so that wildcard
//! enumeration sees keys in insertion order.
//!
//! # Example
//!
//! ```
//! use keyquill::value::Value;
//! use serde_json::json;
//!
//! let root = Value::from(json!({"user": {"name": "Alice", "age": 30}}));
//! assert!(root.is_object());
//!
//! if let Value::Object(fields) = &root {
//!     assert!(fields.contains_key("user"));
//! }
//! ```

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// A numeric value (integer or float).
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }
}

/// A callable value stored in a graph.
///
/// The wrapped closure receives the receiver (the value the function was
/// retrieved from) and the call arguments, and returns a new value.
/// Equality is pointer identity, so a function value only equals itself.
#[derive(Clone)]
pub struct NativeFn(Rc<dyn Fn(&Value, &[Value]) -> Value>);

impl NativeFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Value + 'static,
    {
        NativeFn(Rc::new(f))
    }

    /// Invokes the function with the given receiver and arguments.
    pub fn call(&self, receiver: &Value, args: &[Value]) -> Value {
        (self.0)(receiver, args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn(<native>)")
    }
}

impl PartialEq for NativeFn {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0) as *const u8,
            Rc::as_ptr(&other.0) as *const u8,
        )
    }
}

/// A value in the object graph.
///
/// Objects and arrays contain further `Value` instances; `Func` holds a
/// callable that paths can invoke with a call container.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null value
    Null,
    /// A boolean
    Bool(bool),
    /// A number (integer or float)
    Number(Number),
    /// A string
    String(String),
    /// An ordered array of values
    Array(Vec<Value>),
    /// An object with insertion-ordered keys
    Object(IndexMap<String, Value>),
    /// A callable value
    Func(NativeFn),
}

impl Value {
    /// Returns true if this value is an object.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns true if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if this value is callable.
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Func(_))
    }

    /// Returns true if this value is a container (object or array).
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }

    /// Returns the string slice if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a child by textual key.
    ///
    /// Objects are indexed by key; arrays accept a decimal index. Scalars
    /// and callables have no children.
    pub fn index(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Enumerates the own keys of this value, in enumeration order.
    ///
    /// Object keys come back in insertion order; array indices as decimal
    /// strings in ascending order.
    pub fn own_keys(&self) -> Vec<String> {
        match self {
            Value::Object(fields) => fields.keys().cloned().collect(),
            Value::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Renders this value as the string used for placeholder substitution
    /// and computed property keys.
    ///
    /// Strings render without quotes; other scalars render naturally;
    /// containers render as compact JSON.
    pub fn coerce_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Func(_) => "<fn>".to_string(),
            Value::Array(_) | Value::Object(_) => serde_json::Value::from(self).to_string(),
        }
    }
}

// Display mirrors coerce_string so diagnostic output and substitution agree.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coerce_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::Integer(i))
                } else {
                    Value::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(Number::Integer(i)) => serde_json::Value::from(*i),
            Value::Number(Number::Float(f)) => serde_json::Value::from(*f),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
            // Callables have no JSON form
            Value::Func(_) => serde_json::Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_index_object() {
        let v = Value::from(json!({"a": 1, "b": 2}));
        assert_eq!(v.index("a"), Some(&Value::Number(Number::Integer(1))));
        assert_eq!(v.index("missing"), None);
    }

    #[test]
    fn test_index_array() {
        let v = Value::from(json!(["x", "y"]));
        assert_eq!(v.index("1"), Some(&Value::String("y".to_string())));
        assert_eq!(v.index("2"), None);
        assert_eq!(v.index("not-a-number"), None);
    }

    #[test]
    fn test_index_scalar() {
        let v = Value::Bool(true);
        assert_eq!(v.index("anything"), None);
    }

    #[test]
    fn test_own_keys_insertion_order() {
        let v = Value::from(json!({"b": 1, "a": 2, "c": 3}));
        assert_eq!(v.own_keys(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_parsed_json_keeps_document_order() {
        let parsed: serde_json::Value =
            serde_json::from_str(r#"{"zeta": {"y": 1, "x": 2}, "alpha": 3}"#).unwrap();
        let v = Value::from(parsed);
        assert_eq!(v.own_keys(), vec!["zeta", "alpha"]);
        assert_eq!(v.index("zeta").unwrap().own_keys(), vec!["y", "x"]);
    }

    #[test]
    fn test_own_keys_array() {
        let v = Value::from(json!([10, 20, 30]));
        assert_eq!(v.own_keys(), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_coerce_string_scalars() {
        assert_eq!(Value::String("hi".to_string()).coerce_string(), "hi");
        assert_eq!(Value::Number(Number::Integer(42)).coerce_string(), "42");
        assert_eq!(Value::Bool(false).coerce_string(), "false");
        assert_eq!(Value::Null.coerce_string(), "null");
    }

    #[test]
    fn test_coerce_string_container() {
        let v = Value::from(json!([1, 2]));
        assert_eq!(v.coerce_string(), "[1,2]");
    }

    #[test]
    fn test_native_fn_identity_equality() {
        let f = NativeFn::new(|_, _| Value::Null);
        let g = NativeFn::new(|_, _| Value::Null);
        assert_eq!(f.clone(), f);
        assert_ne!(f, g);
    }

    #[test]
    fn test_native_fn_call() {
        let f = NativeFn::new(|recv, args| {
            let mut total = match recv {
                Value::Number(n) => n.as_f64(),
                _ => 0.0,
            };
            for a in args {
                if let Value::Number(n) = a {
                    total += n.as_f64();
                }
            }
            Value::Number(Number::Float(total))
        });
        let recv = Value::Number(Number::Integer(1));
        let out = f.call(&recv, &[Value::Number(Number::Integer(2))]);
        assert_eq!(out, Value::Number(Number::Float(3.0)));
    }

    #[test]
    fn test_json_round_trip() {
        let original = json!({"a": [1, true, "s", null], "b": {"c": 1.5}});
        let v = Value::from(original.clone());
        assert_eq!(serde_json::Value::from(&v), original);
    }
}
