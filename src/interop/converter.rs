//! Script value <-> host value conversion.
//!
//! [`to_host`] is the strict entry point: with a target type, every shape
//! conflict is an error. [`convert_to`] is the lenient path used when
//! binding arguments, fields and properties: it takes the natural host
//! conversion and then coerces it to the declared type.

use crate::engine::Engine;
use crate::error::ConversionError;
use crate::host::{
    HostArray, HostType, HostValue, array_type, coerce, object_type, primitive_type,
    script_value_type, string_type, value_type,
};
use crate::primitive_kind::PrimitiveKind;
use crate::script::ScriptValue;

/// Convert a script value to a host value, optionally requiring `target`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn to_host(value: &ScriptValue, target: Option<&HostType>) -> Result<HostValue, ConversionError> {
    if target.is_some_and(|t| *t == script_value_type()) {
        return Ok(HostValue::Script(value.clone()));
    }
    let fail = |to: &HostType| ConversionError::incompatible(value.type_name(), to.name());
    let accepts = |ty: HostType| target.is_none_or(|t| ty.is_assignable_to(t));

    match value {
        ScriptValue::Undefined => match target {
            Some(t) => Err(fail(t)),
            None => Ok(HostValue::Undefined),
        },
        ScriptValue::Null => match target {
            Some(t) if t.is_value_type() => Err(fail(t)),
            _ => Ok(HostValue::Null),
        },
        ScriptValue::Boolean(b) => match target {
            Some(t) if *t != primitive_type(PrimitiveKind::Bool) => Err(fail(t)),
            _ => Ok(HostValue::Bool(*b)),
        },
        ScriptValue::String(s) => match target {
            Some(t) if *t != string_type() => Err(fail(t)),
            _ => Ok(HostValue::String(s.to_string())),
        },
        ScriptValue::Number(n) => {
            let natural = natural_number(*n);
            match target {
                None => Ok(natural),
                Some(t) if t.is_value_type() => coerce(&natural, t),
                Some(t) => Err(fail(t)),
            }
        }
        ScriptValue::Object(obj) => {
            if let Some(elements) = obj.array_elements() {
                if let Some(t) = target.filter(|_| !accepts(array_type())) {
                    return Err(fail(t));
                }
                let items = elements
                    .iter()
                    .map(|e| to_host(e, None))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(HostValue::Array(homogenize(items)));
            }
            if let Some(instance) = obj.host_target() {
                return match target {
                    Some(t) if !instance.ty().is_assignable_to(t) => Err(fail(t)),
                    _ => Ok(HostValue::Object(instance.clone())),
                };
            }
            if let Some(ty) = obj.referenced_type() {
                return match target {
                    Some(t) if *t != object_type() => Err(fail(t)),
                    _ => Ok(HostValue::Type(ty.clone())),
                };
            }
            match target {
                Some(t) if *t != object_type() => Err(fail(t)),
                _ => Ok(HostValue::Script(value.clone())),
            }
        }
    }
}

/// Convert a script value to the declared type of a parameter or member.
///
/// `ScriptValue`-typed destinations receive the value untouched.
pub fn convert_to(value: &ScriptValue, target: &HostType) -> Result<HostValue, ConversionError> {
    if *target == script_value_type() {
        return Ok(HostValue::Script(value.clone()));
    }
    coerce(&to_host(value, None)?, target)
}

/// Whole numbers in `int` range narrow to `int`; everything else stays double.
///
/// Negative zero stays double so its sign survives.
fn natural_number(n: f64) -> HostValue {
    let negative_zero = n == 0.0 && n.is_sign_negative();
    if !negative_zero && n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64 {
        HostValue::Int32(n as i32)
    } else {
        HostValue::Double(n)
    }
}

/// Narrow a converted sequence to its most specific common element type.
///
/// All-numeric sequences become `double`. When no common type more specific
/// than `object` exists, the sequence stays untyped.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn homogenize(items: Vec<HostValue>) -> HostArray {
    let object = object_type();
    let ty_of = |v: &HostValue| v.runtime_type().unwrap_or_else(object_type);

    let Some(first) = items.first() else {
        return HostArray::untyped(items);
    };
    let mut common = ty_of(first);
    for item in &items[1..] {
        let next = ty_of(item);
        while common != object && (!next.is_assignable_to(&common) || common == value_type()) {
            common = common.base().cloned().unwrap_or_else(object_type);
        }
    }

    let all_numeric = items
        .iter()
        .all(|v| v.primitive_kind().is_some_and(PrimitiveKind::is_numeric));
    if all_numeric {
        common = primitive_type(PrimitiveKind::Double);
    }

    if common == object {
        return HostArray::untyped(items);
    }
    match items.iter().map(|v| coerce(v, &common)).collect::<Result<Vec<_>, _>>() {
        Ok(converted) => HostArray::new(common, converted),
        Err(_) => HostArray::untyped(items),
    }
}

/// Convert a host value back into the script runtime.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn from_host(engine: &Engine, value: HostValue) -> ScriptValue {
    match value {
        HostValue::Undefined => ScriptValue::Undefined,
        HostValue::Null => ScriptValue::Null,
        HostValue::Bool(b) => ScriptValue::Boolean(b),
        HostValue::String(s) => ScriptValue::from(s),
        HostValue::Enum { value, .. } => ScriptValue::Number(value as f64),
        HostValue::Object(instance) => ScriptValue::Object(engine.wrap(instance)),
        HostValue::Array(arr) => {
            let elements = arr.items.into_iter().map(|v| from_host(engine, v)).collect();
            ScriptValue::Object(engine.new_array(elements))
        }
        HostValue::Type(ty) => ScriptValue::Object(engine.type_reference(ty)),
        HostValue::Script(v) => v,
        number => ScriptValue::Number(number.as_f64().unwrap_or(f64::NAN)),
    }
}
