//! Tagged script values.

use std::fmt;
use std::rc::Rc;

use super::object::ObjectRef;

/// A value in the script runtime.
#[derive(Clone, Default)]
pub enum ScriptValue {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Object(ObjectRef),
}

impl ScriptValue {
    /// Build a string value.
    pub fn string(s: impl AsRef<str>) -> Self {
        ScriptValue::String(Rc::from(s.as_ref()))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, ScriptValue::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ScriptValue::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, ScriptValue::Object(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ScriptValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScriptValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            ScriptValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// The `typeof`-style tag of the value.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Undefined => "undefined",
            ScriptValue::Null => "null",
            ScriptValue::Boolean(_) => "boolean",
            ScriptValue::Number(_) => "number",
            ScriptValue::String(_) => "string",
            ScriptValue::Object(o) if o.is_callable() => "function",
            ScriptValue::Object(_) => "object",
        }
    }
}

impl PartialEq for ScriptValue {
    /// Strict equality; objects compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ScriptValue::Undefined, ScriptValue::Undefined) => true,
            (ScriptValue::Null, ScriptValue::Null) => true,
            (ScriptValue::Boolean(a), ScriptValue::Boolean(b)) => a == b,
            (ScriptValue::Number(a), ScriptValue::Number(b)) => a == b,
            (ScriptValue::String(a), ScriptValue::String(b)) => a == b,
            (ScriptValue::Object(a), ScriptValue::Object(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::Undefined => write!(f, "undefined"),
            ScriptValue::Null => write!(f, "null"),
            ScriptValue::Boolean(b) => write!(f, "{}", b),
            ScriptValue::Number(n) => write!(f, "{}", n),
            ScriptValue::String(s) => write!(f, "{:?}", s),
            ScriptValue::Object(o) => write!(f, "[object {}]", o.class_name()),
        }
    }
}

impl From<bool> for ScriptValue {
    fn from(v: bool) -> Self {
        ScriptValue::Boolean(v)
    }
}

impl From<f64> for ScriptValue {
    fn from(v: f64) -> Self {
        ScriptValue::Number(v)
    }
}

impl From<i32> for ScriptValue {
    fn from(v: i32) -> Self {
        ScriptValue::Number(v as f64)
    }
}

impl From<&str> for ScriptValue {
    fn from(v: &str) -> Self {
        ScriptValue::string(v)
    }
}

impl From<String> for ScriptValue {
    fn from(v: String) -> Self {
        ScriptValue::String(Rc::from(v))
    }
}

impl From<ObjectRef> for ScriptValue {
    fn from(v: ObjectRef) -> Self {
        ScriptValue::Object(v)
    }
}
