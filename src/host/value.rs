//! Dynamic host values.

use std::any::{Any, type_name};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::HostError;
use crate::primitive_kind::PrimitiveKind;
use crate::script::ScriptValue;

use super::primitives::{array_type, object_type, primitive_type, script_value_type, string_type};
use super::types::HostType;

/// A value in the host runtime.
#[derive(Clone, Default)]
pub enum HostValue {
    /// The script-undefined sentinel. Never a host null.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    /// Enum constant of a specific enum type.
    Enum { ty: HostType, value: i64 },
    /// Shared handle to a host instance.
    Object(HostRef),
    /// Element-typed sequence.
    Array(HostArray),
    /// A host type itself.
    Type(HostType),
    /// A script value carried untouched through the host side.
    Script(ScriptValue),
}

impl HostValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, HostValue::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, HostValue::Null)
    }

    /// The exact runtime type of this value.
    ///
    /// `Undefined` and `Null` have no runtime type.
    pub fn runtime_type(&self) -> Option<HostType> {
        let ty = match self {
            HostValue::Undefined | HostValue::Null => return None,
            HostValue::Enum { ty, .. } => ty.clone(),
            HostValue::Object(r) => r.ty().clone(),
            HostValue::Array(_) => array_type(),
            HostValue::Type(_) => object_type(),
            HostValue::String(_) => string_type(),
            HostValue::Script(_) => script_value_type(),
            other => primitive_type(other.primitive_kind()?),
        };
        Some(ty)
    }

    /// The primitive kind for bool and numeric values.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            HostValue::Bool(_) => PrimitiveKind::Bool,
            HostValue::Int8(_) => PrimitiveKind::Int8,
            HostValue::Int16(_) => PrimitiveKind::Int16,
            HostValue::Int32(_) => PrimitiveKind::Int32,
            HostValue::Int64(_) => PrimitiveKind::Int64,
            HostValue::UInt8(_) => PrimitiveKind::Uint8,
            HostValue::UInt16(_) => PrimitiveKind::Uint16,
            HostValue::UInt32(_) => PrimitiveKind::Uint32,
            HostValue::UInt64(_) => PrimitiveKind::Uint64,
            HostValue::Float(_) => PrimitiveKind::Float,
            HostValue::Double(_) => PrimitiveKind::Double,
            _ => return None,
        })
    }

    /// Integer payload of integer and enum values.
    pub fn as_i128(&self) -> Option<i128> {
        Some(match *self {
            HostValue::Int8(v) => v as i128,
            HostValue::Int16(v) => v as i128,
            HostValue::Int32(v) => v as i128,
            HostValue::Int64(v) => v as i128,
            HostValue::UInt8(v) => v as i128,
            HostValue::UInt16(v) => v as i128,
            HostValue::UInt32(v) => v as i128,
            HostValue::UInt64(v) => v as i128,
            HostValue::Enum { value, .. } => value as i128,
            _ => return None,
        })
    }

    /// Numeric payload as a double, for integer, float and enum values.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            HostValue::Float(v) => Some(v as f64),
            HostValue::Double(v) => Some(v),
            _ => self.as_i128().map(|v| v as f64),
        }
    }

    /// Short name of the value's shape, for error messages.
    pub fn type_name(&self) -> String {
        match self {
            HostValue::Undefined => "undefined".to_string(),
            HostValue::Null => "null".to_string(),
            other => other
                .runtime_type()
                .map(|t| t.name().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        use HostValue::*;
        match (self, other) {
            (Undefined, Undefined) | (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int8(a), Int8(b)) => a == b,
            (Int16(a), Int16(b)) => a == b,
            (Int32(a), Int32(b)) => a == b,
            (Int64(a), Int64(b)) => a == b,
            (UInt8(a), UInt8(b)) => a == b,
            (UInt16(a), UInt16(b)) => a == b,
            (UInt32(a), UInt32(b)) => a == b,
            (UInt64(a), UInt64(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Double(a), Double(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Enum { ty: ta, value: a }, Enum { ty: tb, value: b }) => ta == tb && a == b,
            (Object(a), Object(b)) => a.ptr_eq(b),
            (Array(a), Array(b)) => a == b,
            (Type(a), Type(b)) => a == b,
            (Script(a), Script(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Undefined => write!(f, "Undefined"),
            HostValue::Null => write!(f, "Null"),
            HostValue::Bool(v) => write!(f, "Bool({})", v),
            HostValue::Int8(v) => write!(f, "Int8({})", v),
            HostValue::Int16(v) => write!(f, "Int16({})", v),
            HostValue::Int32(v) => write!(f, "Int32({})", v),
            HostValue::Int64(v) => write!(f, "Int64({})", v),
            HostValue::UInt8(v) => write!(f, "UInt8({})", v),
            HostValue::UInt16(v) => write!(f, "UInt16({})", v),
            HostValue::UInt32(v) => write!(f, "UInt32({})", v),
            HostValue::UInt64(v) => write!(f, "UInt64({})", v),
            HostValue::Float(v) => write!(f, "Float({})", v),
            HostValue::Double(v) => write!(f, "Double({})", v),
            HostValue::String(s) => write!(f, "String({:?})", s),
            HostValue::Enum { ty, value } => write!(f, "Enum({}::{})", ty.name(), value),
            HostValue::Object(r) => write!(f, "Object({})", r.ty().name()),
            HostValue::Array(a) => write!(f, "Array({}[{}])", a.element_type.name(), a.items.len()),
            HostValue::Type(t) => write!(f, "Type({})", t.name()),
            HostValue::Script(v) => write!(f, "Script({:?})", v),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for HostValue {
                fn from(v: $ty) -> Self {
                    HostValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive!(
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    HostRef => Object,
    HostArray => Array,
    HostType => Type,
    ScriptValue => Script,
);

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        HostValue::String(v.to_string())
    }
}

/// Shared handle to one host instance together with its exact runtime type.
///
/// Cloning the handle shares the instance. Borrows are scoped to a closure;
/// a conflicting borrow (for example a reentrant write while a method holds
/// the instance) reports [`HostError::Busy`] instead of panicking.
#[derive(Clone)]
pub struct HostRef {
    ty: HostType,
    cell: Rc<RefCell<Box<dyn Any>>>,
}

impl HostRef {
    /// Wrap a concrete value as an instance of `ty`.
    pub fn new<T: Any>(ty: HostType, value: T) -> Self {
        Self::from_box(ty, Box::new(value))
    }

    /// Wrap already-boxed storage, as produced by a constructor closure.
    pub fn from_box(ty: HostType, value: Box<dyn Any>) -> Self {
        Self {
            ty,
            cell: Rc::new(RefCell::new(value)),
        }
    }

    /// The exact runtime type of the instance.
    pub fn ty(&self) -> &HostType {
        &self.ty
    }

    /// Borrow the instance as `T`.
    pub fn with<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, HostError> {
        let guard = self.cell.try_borrow().map_err(|_| self.busy())?;
        let value = guard.downcast_ref::<T>().ok_or_else(|| self.mismatch::<T>())?;
        Ok(f(value))
    }

    /// Mutably borrow the instance as `T`.
    pub fn with_mut<T: 'static, R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, HostError> {
        let mut guard = self.cell.try_borrow_mut().map_err(|_| self.busy())?;
        let value = guard.downcast_mut::<T>().ok_or_else(|| self.mismatch::<T>())?;
        Ok(f(value))
    }

    /// Check whether the storage holds a `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.cell.try_borrow().map(|b| b.is::<T>()).unwrap_or(false)
    }

    /// Check whether two handles share one instance.
    pub fn ptr_eq(&self, other: &HostRef) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    fn busy(&self) -> HostError {
        HostError::Busy {
            type_name: self.ty.name().to_string(),
        }
    }

    fn mismatch<T>(&self) -> HostError {
        HostError::TargetMismatch {
            expected: type_name::<T>().to_string(),
            actual: self.ty.name().to_string(),
        }
    }
}

impl fmt::Debug for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRef")
            .field("ty", &self.ty.name())
            .finish_non_exhaustive()
    }
}

/// An element-typed host sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct HostArray {
    pub element_type: HostType,
    pub items: Vec<HostValue>,
}

impl HostArray {
    pub fn new(element_type: HostType, items: Vec<HostValue>) -> Self {
        Self {
            element_type,
            items,
        }
    }

    /// An untyped (heterogeneous) sequence.
    pub fn untyped(items: Vec<HostValue>) -> Self {
        Self::new(object_type(), items)
    }

    /// True when the element type is more specific than `object`.
    pub fn is_typed(&self) -> bool {
        self.element_type != object_type()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
