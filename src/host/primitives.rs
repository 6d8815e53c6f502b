//! Built-in host types.
//!
//! ```text
//! object
//! ├── ValueType
//! │   ├── bool, int8 .. uint64, float, double
//! │   └── (registered enums and value types)
//! ├── string
//! ├── Array
//! └── ScriptValue
//! ```

use std::sync::OnceLock;

use crate::primitive_kind::PrimitiveKind;

use super::types::{HostType, TypeEntry, TypeKind};

struct Builtins {
    object: HostType,
    value: HostType,
    primitives: Vec<HostType>,
    string: HostType,
    array: HostType,
    script_value: HostType,
}

fn builtins() -> &'static Builtins {
    static BUILTINS: OnceLock<Builtins> = OnceLock::new();
    BUILTINS.get_or_init(|| {
        let object = HostType::from_entry(TypeEntry::new("object".into(), TypeKind::Class, None));
        let value = HostType::from_entry(TypeEntry::new(
            "ValueType".into(),
            TypeKind::Class,
            Some(object.clone()),
        ));
        let primitives = PrimitiveKind::ALL
            .iter()
            .map(|&kind| {
                HostType::from_entry(TypeEntry::new(
                    kind.name().into(),
                    TypeKind::Primitive(kind),
                    Some(value.clone()),
                ))
            })
            .collect();
        let child_of_object = |name: &str| {
            HostType::from_entry(TypeEntry::new(
                name.into(),
                TypeKind::Class,
                Some(object.clone()),
            ))
        };
        Builtins {
            string: child_of_object("string"),
            array: child_of_object("Array"),
            script_value: child_of_object("ScriptValue"),
            value,
            primitives,
            object,
        }
    })
}

/// The universal base type.
pub fn object_type() -> HostType {
    builtins().object.clone()
}

/// Base of every value-representable type.
pub fn value_type() -> HostType {
    builtins().value.clone()
}

/// The built-in type for a primitive kind.
pub fn primitive_type(kind: PrimitiveKind) -> HostType {
    let index = PrimitiveKind::ALL
        .iter()
        .position(|&k| k == kind)
        .unwrap_or_default();
    builtins().primitives[index].clone()
}

pub fn string_type() -> HostType {
    builtins().string.clone()
}

/// Runtime type of every host array, whatever its element type.
pub fn array_type() -> HostType {
    builtins().array.clone()
}

/// The script-value representation itself.
///
/// Parameters, fields and properties of this type receive script values
/// untouched.
pub fn script_value_type() -> HostType {
    builtins().script_value.clone()
}
