//! Conversion traits between Rust values and [`HostValue`].
//!
//! - [`FromHost`]: extract a Rust value from a [`HostValue`]
//! - [`IntoHost`]: wrap a Rust value as a [`HostValue`]
//! - [`HostTyped`]: the declared host type of a Rust type
//!
//! Integer extraction accepts any integer variant and bounds-checks the
//! narrowing; arguments reaching host closures have already been coerced to
//! the declared parameter type, so this only has to be lenient about width.
//!
//! ## Example
//!
//! ```
//! use hostbridge::host::{FromHost, HostValue, IntoHost};
//!
//! let value = 42i32.into_host();
//! assert_eq!(u8::from_host(&value), Ok(42));
//! assert!(i8::from_host(&HostValue::Int32(300)).is_err());
//! ```

use crate::error::ConversionError;
use crate::primitive_kind::PrimitiveKind;
use crate::script::ScriptValue;

use super::primitives::{object_type, primitive_type, script_value_type, string_type};
use super::types::HostType;
use super::value::{HostArray, HostValue};

/// Extract a Rust value from a host value.
pub trait FromHost: Sized {
    fn from_host(value: &HostValue) -> Result<Self, ConversionError>;
}

/// Convert a Rust value into a host value.
pub trait IntoHost {
    fn into_host(self) -> HostValue;
}

/// Rust types with a fixed declared host type.
pub trait HostTyped {
    fn host_type() -> HostType;
}

fn mismatch(value: &HostValue, expected: &str) -> ConversionError {
    ConversionError::incompatible(value.type_name(), expected)
}

// ============================================================================
// Integer implementations
// ============================================================================

macro_rules! impl_host_int {
    ($($ty:ty => $kind:ident),*) => {
        $(
            impl FromHost for $ty {
                fn from_host(value: &HostValue) -> Result<Self, ConversionError> {
                    let v = value
                        .as_i128()
                        .filter(|_| !matches!(value, HostValue::Enum { .. }))
                        .ok_or_else(|| mismatch(value, stringify!($ty)))?;
                    <$ty>::try_from(v).map_err(|_| ConversionError::Overflow {
                        value: v.to_string(),
                        target_type: PrimitiveKind::$kind.name().to_string(),
                    })
                }
            }

            impl IntoHost for $ty {
                fn into_host(self) -> HostValue {
                    HostValue::from(self)
                }
            }

            impl HostTyped for $ty {
                fn host_type() -> HostType {
                    primitive_type(PrimitiveKind::$kind)
                }
            }
        )*
    };
}

impl_host_int!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64
);

// ============================================================================
// Float implementations
// ============================================================================

impl FromHost for f64 {
    fn from_host(value: &HostValue) -> Result<Self, ConversionError> {
        match value {
            HostValue::Enum { .. } => Err(mismatch(value, "double")),
            _ => value.as_f64().ok_or_else(|| mismatch(value, "double")),
        }
    }
}

impl FromHost for f32 {
    fn from_host(value: &HostValue) -> Result<Self, ConversionError> {
        match value {
            HostValue::Float(v) => Ok(*v),
            _ => f64::from_host(value)
                .map_err(|_| mismatch(value, "float"))
                .map(|v| v as f32),
        }
    }
}

impl IntoHost for f32 {
    fn into_host(self) -> HostValue {
        HostValue::Float(self)
    }
}

impl IntoHost for f64 {
    fn into_host(self) -> HostValue {
        HostValue::Double(self)
    }
}

impl HostTyped for f32 {
    fn host_type() -> HostType {
        primitive_type(PrimitiveKind::Float)
    }
}

impl HostTyped for f64 {
    fn host_type() -> HostType {
        primitive_type(PrimitiveKind::Double)
    }
}

// ============================================================================
// Bool, string, unit
// ============================================================================

impl FromHost for bool {
    fn from_host(value: &HostValue) -> Result<Self, ConversionError> {
        match value {
            HostValue::Bool(v) => Ok(*v),
            _ => Err(mismatch(value, "bool")),
        }
    }
}

impl IntoHost for bool {
    fn into_host(self) -> HostValue {
        HostValue::Bool(self)
    }
}

impl HostTyped for bool {
    fn host_type() -> HostType {
        primitive_type(PrimitiveKind::Bool)
    }
}

impl FromHost for String {
    fn from_host(value: &HostValue) -> Result<Self, ConversionError> {
        match value {
            HostValue::String(s) => Ok(s.clone()),
            _ => Err(mismatch(value, "string")),
        }
    }
}

impl IntoHost for String {
    fn into_host(self) -> HostValue {
        HostValue::String(self)
    }
}

impl IntoHost for &str {
    fn into_host(self) -> HostValue {
        HostValue::String(self.to_string())
    }
}

impl HostTyped for String {
    fn host_type() -> HostType {
        string_type()
    }
}

impl IntoHost for () {
    fn into_host(self) -> HostValue {
        HostValue::Undefined
    }
}

// ============================================================================
// Dynamic values
// ============================================================================

impl FromHost for HostValue {
    fn from_host(value: &HostValue) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }
}

impl IntoHost for HostValue {
    fn into_host(self) -> HostValue {
        self
    }
}

impl HostTyped for HostValue {
    fn host_type() -> HostType {
        object_type()
    }
}

impl FromHost for ScriptValue {
    fn from_host(value: &HostValue) -> Result<Self, ConversionError> {
        match value {
            HostValue::Script(v) => Ok(v.clone()),
            HostValue::Undefined => Ok(ScriptValue::Undefined),
            HostValue::Null => Ok(ScriptValue::Null),
            _ => Err(mismatch(value, "ScriptValue")),
        }
    }
}

impl IntoHost for ScriptValue {
    fn into_host(self) -> HostValue {
        HostValue::Script(self)
    }
}

impl HostTyped for ScriptValue {
    fn host_type() -> HostType {
        script_value_type()
    }
}

// ============================================================================
// Option and Vec
// ============================================================================

impl<T: FromHost> FromHost for Option<T> {
    fn from_host(value: &HostValue) -> Result<Self, ConversionError> {
        match value {
            HostValue::Null | HostValue::Undefined => Ok(None),
            other => T::from_host(other).map(Some),
        }
    }
}

impl<T: IntoHost> IntoHost for Option<T> {
    fn into_host(self) -> HostValue {
        match self {
            Some(v) => v.into_host(),
            None => HostValue::Null,
        }
    }
}

impl<T: HostTyped> HostTyped for Option<T> {
    fn host_type() -> HostType {
        T::host_type()
    }
}

impl<T: FromHost> FromHost for Vec<T> {
    fn from_host(value: &HostValue) -> Result<Self, ConversionError> {
        match value {
            HostValue::Array(arr) => arr.items.iter().map(T::from_host).collect(),
            _ => Err(mismatch(value, "Array")),
        }
    }
}

impl<T: IntoHost + HostTyped> IntoHost for Vec<T> {
    fn into_host(self) -> HostValue {
        HostValue::Array(HostArray::new(
            T::host_type(),
            self.into_iter().map(IntoHost::into_host).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_narrowing_is_checked() {
        assert_eq!(i8::from_host(&HostValue::Int64(-128)), Ok(-128));
        assert!(matches!(
            i8::from_host(&HostValue::Int32(200)),
            Err(ConversionError::Overflow { .. })
        ));
        assert!(matches!(
            u32::from_host(&HostValue::Int32(-1)),
            Err(ConversionError::Overflow { .. })
        ));
        assert_eq!(u64::from_host(&HostValue::UInt64(u64::MAX)), Ok(u64::MAX));
    }

    #[test]
    fn int_rejects_other_shapes() {
        assert!(matches!(
            i32::from_host(&HostValue::Double(1.0)),
            Err(ConversionError::Incompatible { .. })
        ));
        assert!(i32::from_host(&HostValue::from("1")).is_err());
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(f64::from_host(&HostValue::Int32(3)), Ok(3.0));
        assert_eq!(f32::from_host(&HostValue::Double(1.5)), Ok(1.5));
        assert!(f64::from_host(&HostValue::Bool(true)).is_err());
    }

    #[test]
    fn option_maps_null() {
        assert_eq!(Option::<i32>::from_host(&HostValue::Null), Ok(None));
        assert_eq!(Option::<i32>::from_host(&HostValue::Int32(4)), Ok(Some(4)));
        assert_eq!(None::<String>.into_host(), HostValue::Null);
    }

    #[test]
    fn vec_round_trip_keeps_element_type() {
        let HostValue::Array(arr) = vec![1.5f64, 2.5].into_host() else {
            panic!("expected array");
        };
        assert_eq!(arr.element_type, primitive_type(PrimitiveKind::Double));
        assert_eq!(
            Vec::<f64>::from_host(&HostValue::Array(arr)),
            Ok(vec![1.5, 2.5])
        );
    }

    #[test]
    fn declared_types() {
        assert_eq!(i32::host_type().name(), "int");
        assert_eq!(String::host_type(), string_type());
        assert_eq!(ScriptValue::host_type(), script_value_type());
        assert_eq!(HostValue::host_type(), object_type());
    }
}
