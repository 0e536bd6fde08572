//! Core types for list workspaces.

use crate::error::Result;
use parking_lot::RwLock;
use serde::{Serialize, Serializer};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A list element shared by reference.
///
/// Copying a list that contains one of these aliases the inner list; mutation
/// through any alias is visible through all of them.
pub type SharedList = Arc<RwLock<Vec<Value>>>;

/// An object element shared by reference.
pub type SharedObject = Arc<RwLock<BTreeMap<String, Value>>>;

type CallableFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A named function that can be stored in a list and invoked by
/// `compose` and `sequence`.
#[derive(Clone)]
pub struct Callable {
    name: Arc<str>,
    func: Arc<CallableFn>,
}

impl Callable {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let name: String = name.into();
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function with the given argument list.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.func)(args)
    }

    /// Identity comparison (two clones of the same callable are equal).
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.func) as *const (),
            Arc::as_ptr(&other.func) as *const (),
        )
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

/// A dynamically typed list element.
///
/// Cloning is shallow: `List`, `Object` and `Func` payloads are reference
/// counted and the clone aliases the same storage.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(SharedList),
    Object(SharedObject),
    Func(Callable),
}

impl Value {
    /// Wrap elements in a new shared list.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(RwLock::new(items)))
    }

    /// Wrap fields in a new shared object.
    pub fn object(fields: BTreeMap<String, Value>) -> Self {
        Value::Object(Arc::new(RwLock::new(fields)))
    }

    pub fn func<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Value::Func(Callable::new(name, func))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Integral numbers as an index; anything else is `None`.
    pub fn as_index(&self) -> Option<isize> {
        match self {
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as isize),
            _ => None,
        }
    }

    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Func(_) => "function",
        }
    }

    /// Strict equality: scalars by value (`NaN` is unequal to itself),
    /// lists, objects and functions by identity.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Func(a), Value::Func(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// String coercion, the default equality key for `unique`.
    ///
    /// `1` and `"1"` coerce to the same string, so `unique` treats them as
    /// duplicates. A list reached again while it is being joined
    /// contributes an empty string.
    pub fn coerce_to_string(&self) -> String {
        self.coerce_with(&mut Vec::new())
    }

    fn coerce_with(&self, visiting: &mut Vec<*const ()>) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.clone(),
            Value::List(items) => {
                let ptr = Arc::as_ptr(items) as *const ();
                if visiting.contains(&ptr) {
                    return String::new();
                }
                visiting.push(ptr);
                let joined = items
                    .read()
                    .iter()
                    .map(|item| match item {
                        Value::Undefined | Value::Null => String::new(),
                        other => other.coerce_with(visiting),
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                visiting.pop();
                joined
            }
            Value::Object(_) => "[object Object]".to_string(),
            Value::Func(f) => format!("function {}()", f.name()),
        }
    }

    /// Turn a call result into the argument list for the next call.
    ///
    /// Lists spread into their elements; `undefined` and `null` become an
    /// empty argument list; any other value is passed as the sole argument.
    pub fn as_arguments(&self) -> Vec<Value> {
        match self {
            Value::List(items) => items.read().clone(),
            Value::Undefined | Value::Null => Vec::new(),
            other => vec![other.clone()],
        }
    }

    /// Convert to JSON. Functions, `undefined` and back-references into a
    /// list or object still being converted become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        self.to_json_with(&mut Vec::new())
    }

    fn to_json_with(&self, visiting: &mut Vec<*const ()>) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null | Value::Func(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    serde_json::Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            }
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                let ptr = Arc::as_ptr(items) as *const ();
                if visiting.contains(&ptr) {
                    return serde_json::Value::Null;
                }
                visiting.push(ptr);
                let array = items
                    .read()
                    .iter()
                    .map(|item| item.to_json_with(visiting))
                    .collect();
                visiting.pop();
                serde_json::Value::Array(array)
            }
            Value::Object(fields) => {
                let ptr = Arc::as_ptr(fields) as *const ();
                if visiting.contains(&ptr) {
                    return serde_json::Value::Null;
                }
                visiting.push(ptr);
                let object = fields
                    .read()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_with(visiting)))
                    .collect();
                visiting.pop();
                serde_json::Value::Object(object)
            }
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        // Covers -0 as well.
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Shortest round-trip mantissa with a signed exponent: 1e-7, 1.5e+21.
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else {
        format!("{}", n)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_eq(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visiting = RefCell::new(Vec::new());
        DebugValue {
            value: self,
            visiting: &visiting,
        }
        .fmt(f)
    }
}

/// Debug view that prints `[...]` / `{...}` for a list or object it is
/// already inside of.
struct DebugValue<'a> {
    value: &'a Value,
    visiting: &'a RefCell<Vec<*const ()>>,
}

impl DebugValue<'_> {
    fn child<'b>(&'b self, value: &'b Value) -> DebugValue<'b> {
        DebugValue {
            value,
            visiting: self.visiting,
        }
    }

    fn enter(&self, ptr: *const ()) -> bool {
        if self.visiting.borrow().contains(&ptr) {
            return false;
        }
        self.visiting.borrow_mut().push(ptr);
        true
    }

    fn leave(&self) {
        self.visiting.borrow_mut().pop();
    }
}

impl fmt::Debug for DebugValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                if !self.enter(Arc::as_ptr(items) as *const ()) {
                    return f.write_str("[...]");
                }
                let items = items.read();
                let result = f
                    .debug_list()
                    .entries(items.iter().map(|item| self.child(item)))
                    .finish();
                self.leave();
                result
            }
            Value::Object(fields) => {
                if !self.enter(Arc::as_ptr(fields) as *const ()) {
                    return f.write_str("{...}");
                }
                let fields = fields.read();
                let result = f
                    .debug_map()
                    .entries(fields.iter().map(|(k, v)| (k, self.child(v))))
                    .finish();
                self.leave();
                result
            }
            Value::Func(c) => write!(f, "{:?}", c),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.coerce_to_string())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::list(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Func(c)
    }
}

/// Build a `Vec<Value>` from anything convertible.
pub fn values<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Vec<Value> {
    items.into_iter().map(Into::into).collect()
}

/// Identifies a list: a registered name, or a literal list used anonymously.
///
/// Literal lists are operated on directly and never stored.
#[derive(Clone, Debug, PartialEq)]
pub enum Key {
    Named(String),
    Literal(Vec<Value>),
}

impl Key {
    pub fn name(&self) -> Option<&str> {
        match self {
            Key::Named(name) => Some(name),
            Key::Literal(_) => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Key::Literal(_))
    }

    /// The key as a list element.
    pub fn to_value(&self) -> Value {
        match self {
            Key::Named(name) => Value::Str(name.clone()),
            Key::Literal(items) => Value::list(items.clone()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Named(name) => write!(f, "{}", name),
            Key::Literal(items) => write!(f, "<literal; {} items>", items.len()),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Named(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Named(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Named(name.clone())
    }
}

impl From<Vec<Value>> for Key {
    fn from(items: Vec<Value>) -> Self {
        Key::Literal(items)
    }
}
