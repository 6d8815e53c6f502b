//! Narrowing a generic host value to a specific host type.
//!
//! Used wherever a member or parameter declares a type that differs from a
//! value's natural conversion. Rules, first match wins:
//!
//! | source            | target                         | result                 |
//! |-------------------|--------------------------------|------------------------|
//! | undefined         | any                            | error                  |
//! | null              | reference type                 | null                   |
//! | null              | value type                     | error                  |
//! | assignable value  | its type, a base, an interface | unchanged              |
//! | numeric/bool/enum | primitive                      | range-checked convert  |
//! | string            | primitive                      | invariant parse        |
//! | numeric           | enum                           | enum constant by value |
//! | numeric/bool/enum | string                         | formatted              |

use crate::error::ConversionError;
use crate::primitive_kind::PrimitiveKind;

use super::primitives::{script_value_type, string_type};
use super::types::HostType;
use super::value::HostValue;

/// Coerce `value` to `target`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn coerce(value: &HostValue, target: &HostType) -> Result<HostValue, ConversionError> {
    let fail = || ConversionError::incompatible(value.type_name(), target.name());

    match value {
        HostValue::Undefined => return Err(fail()),
        HostValue::Null => {
            return if target.is_value_type() {
                Err(fail())
            } else {
                Ok(HostValue::Null)
            };
        }
        _ => {}
    }

    if let Some(ty) = value.runtime_type() {
        if ty.is_assignable_to(target) {
            return Ok(value.clone());
        }
    }

    if *target == script_value_type() {
        return Err(fail());
    }

    if let Some(kind) = target.primitive_kind() {
        return to_primitive(value, kind).ok_or_else(fail)?;
    }

    if target.is_enum() {
        let Some(n) = integral(value) else {
            return Err(fail());
        };
        let value = i64::try_from(n).map_err(|_| ConversionError::Overflow {
            value: n.to_string(),
            target_type: target.name().to_string(),
        })?;
        return Ok(HostValue::Enum {
            ty: target.clone(),
            value,
        });
    }

    if *target == string_type() {
        return match value {
            HostValue::Bool(b) => Ok(HostValue::String(if *b { "True" } else { "False" }.into())),
            HostValue::Float(v) => Ok(HostValue::String(v.to_string())),
            HostValue::Double(v) => Ok(HostValue::String(v.to_string())),
            other => other
                .as_i128()
                .map(|n| HostValue::String(n.to_string()))
                .ok_or_else(fail),
        };
    }

    Err(fail())
}

/// Integral payload of a value, accepting whole doubles.
fn integral(value: &HostValue) -> Option<i128> {
    if let Some(n) = value.as_i128() {
        return Some(n);
    }
    let v = value.as_f64()?;
    (v.is_finite() && v.fract() == 0.0).then_some(v as i128)
}

enum Number {
    Int(i128),
    Float(f64),
}

fn numeric_source(value: &HostValue, kind: PrimitiveKind) -> Option<Result<Number, ConversionError>> {
    Some(Ok(match value {
        HostValue::Bool(b) => Number::Int(*b as i128),
        HostValue::Float(v) => Number::Float(*v as f64),
        HostValue::Double(v) => Number::Float(*v),
        HostValue::String(s) => return Some(parse(s, kind)),
        other => Number::Int(other.as_i128()?),
    }))
}

fn parse(text: &str, kind: PrimitiveKind) -> Result<Number, ConversionError> {
    let trimmed = text.trim();
    let err = || ConversionError::Parse {
        text: text.to_string(),
        target_type: kind.name().to_string(),
    };
    if kind == PrimitiveKind::Bool {
        return if trimmed.eq_ignore_ascii_case("true") {
            Ok(Number::Int(1))
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(Number::Int(0))
        } else {
            Err(err())
        };
    }
    if kind.is_integer() {
        trimmed.parse::<i128>().map(Number::Int).map_err(|_| err())
    } else {
        trimmed.parse::<f64>().map(Number::Float).map_err(|_| err())
    }
}

macro_rules! narrow_int {
    ($n:expr, $ty:ty, $variant:ident, $kind:expr) => {
        <$ty>::try_from($n)
            .map(HostValue::$variant)
            .map_err(|_| ConversionError::Overflow {
                value: $n.to_string(),
                target_type: $kind.name().to_string(),
            })
    };
}

fn to_primitive(
    value: &HostValue,
    kind: PrimitiveKind,
) -> Option<Result<HostValue, ConversionError>> {
    let number = match numeric_source(value, kind)? {
        Ok(n) => n,
        Err(e) => return Some(Err(e)),
    };

    let result = match kind {
        PrimitiveKind::Bool => Ok(HostValue::Bool(match number {
            Number::Int(n) => n != 0,
            Number::Float(f) => f != 0.0,
        })),
        PrimitiveKind::Float => Ok(HostValue::Float(match number {
            Number::Int(n) => n as f32,
            Number::Float(f) => {
                if f.is_finite() && f.abs() > f32::MAX as f64 {
                    return Some(Err(ConversionError::Overflow {
                        value: f.to_string(),
                        target_type: kind.name().to_string(),
                    }));
                }
                f as f32
            }
        })),
        PrimitiveKind::Double => Ok(HostValue::Double(match number {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        })),
        _ => {
            let n = match number {
                Number::Int(n) => n,
                Number::Float(f) => {
                    if !f.is_finite() {
                        return Some(Err(ConversionError::Overflow {
                            value: f.to_string(),
                            target_type: kind.name().to_string(),
                        }));
                    }
                    f.round_ties_even() as i128
                }
            };
            match kind {
                PrimitiveKind::Int8 => narrow_int!(n, i8, Int8, kind),
                PrimitiveKind::Int16 => narrow_int!(n, i16, Int16, kind),
                PrimitiveKind::Int32 => narrow_int!(n, i32, Int32, kind),
                PrimitiveKind::Int64 => narrow_int!(n, i64, Int64, kind),
                PrimitiveKind::Uint8 => narrow_int!(n, u8, UInt8, kind),
                PrimitiveKind::Uint16 => narrow_int!(n, u16, UInt16, kind),
                PrimitiveKind::Uint32 => narrow_int!(n, u32, UInt32, kind),
                _ => narrow_int!(n, u64, UInt64, kind),
            }
        }
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{TypeBuilder, object_type, primitive_type};

    fn prim(kind: PrimitiveKind) -> HostType {
        primitive_type(kind)
    }

    #[test]
    fn identity_and_object() {
        let v = HostValue::Int32(5);
        assert_eq!(coerce(&v, &prim(PrimitiveKind::Int32)), Ok(v.clone()));
        assert_eq!(coerce(&v, &object_type()), Ok(v));
        assert!(coerce(&HostValue::Undefined, &object_type()).is_err());
    }

    #[test]
    fn null_handling() {
        assert_eq!(coerce(&HostValue::Null, &string_type()), Ok(HostValue::Null));
        assert!(coerce(&HostValue::Null, &prim(PrimitiveKind::Int32)).is_err());
    }

    #[test]
    fn numeric_widening_and_narrowing() {
        assert_eq!(
            coerce(&HostValue::Int32(7), &prim(PrimitiveKind::Double)),
            Ok(HostValue::Double(7.0))
        );
        assert_eq!(
            coerce(&HostValue::Int32(200), &prim(PrimitiveKind::Uint8)),
            Ok(HostValue::UInt8(200))
        );
        assert!(matches!(
            coerce(&HostValue::Int32(300), &prim(PrimitiveKind::Uint8)),
            Err(ConversionError::Overflow { .. })
        ));
        assert!(matches!(
            coerce(&HostValue::Int32(-1), &prim(PrimitiveKind::Uint32)),
            Err(ConversionError::Overflow { .. })
        ));
    }

    #[test]
    fn doubles_round_half_to_even() {
        let int = prim(PrimitiveKind::Int32);
        assert_eq!(coerce(&HostValue::Double(2.5), &int), Ok(HostValue::Int32(2)));
        assert_eq!(coerce(&HostValue::Double(3.5), &int), Ok(HostValue::Int32(4)));
        assert!(coerce(&HostValue::Double(f64::NAN), &int).is_err());
        assert!(coerce(&HostValue::Double(f64::INFINITY), &int).is_err());
    }

    #[test]
    fn bool_numeric_conversions() {
        assert_eq!(
            coerce(&HostValue::Bool(true), &prim(PrimitiveKind::Int32)),
            Ok(HostValue::Int32(1))
        );
        assert_eq!(
            coerce(&HostValue::Double(0.0), &prim(PrimitiveKind::Bool)),
            Ok(HostValue::Bool(false))
        );
    }

    #[test]
    fn string_parse_and_format() {
        assert_eq!(
            coerce(&HostValue::from(" 42 "), &prim(PrimitiveKind::Int64)),
            Ok(HostValue::Int64(42))
        );
        assert_eq!(
            coerce(&HostValue::from("TRUE"), &prim(PrimitiveKind::Bool)),
            Ok(HostValue::Bool(true))
        );
        assert!(matches!(
            coerce(&HostValue::from("abc"), &prim(PrimitiveKind::Int32)),
            Err(ConversionError::Parse { .. })
        ));
        assert_eq!(
            coerce(&HostValue::Double(55.5), &string_type()),
            Ok(HostValue::from("55.5"))
        );
        assert_eq!(
            coerce(&HostValue::Int32(3), &string_type()),
            Ok(HostValue::from("3"))
        );
    }

    #[test]
    fn enum_conversions() {
        let color = TypeBuilder::<()>::enumeration("CoerceTests.Color")
            .constant("Red", 0)
            .constant("Green", 1)
            .build();
        let green = coerce(&HostValue::Int32(1), &color).unwrap();
        assert_eq!(
            green,
            HostValue::Enum {
                ty: color.clone(),
                value: 1
            }
        );
        assert_eq!(coerce(&green, &color), Ok(green.clone()));
        assert_eq!(
            coerce(&green, &prim(PrimitiveKind::Int32)),
            Ok(HostValue::Int32(1))
        );
        assert!(coerce(&HostValue::Double(1.5), &color).is_err());
    }

    #[test]
    fn class_hierarchy() {
        struct Base;
        struct Derived;
        let base = TypeBuilder::<Base>::class("CoerceTests.Base").build();
        let derived = TypeBuilder::<Derived>::class("CoerceTests.Derived")
            .base(&base)
            .build();
        let value = HostValue::Object(crate::host::HostRef::new(derived.clone(), Derived));

        assert_eq!(coerce(&value, &base), Ok(value.clone()));
        assert!(coerce(&HostValue::Object(crate::host::HostRef::new(base, Base)), &derived).is_err());
        assert!(coerce(&value, &string_type()).is_err());
    }
}
