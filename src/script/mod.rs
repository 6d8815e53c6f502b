//! Engine-facing object model.
//!
//! The evaluator drives these types; the interop layer plugs host-backed
//! objects and descriptors into them.

mod array;
mod descriptor;
mod function;
mod object;
mod property_table;
mod value;

pub use array::ArrayObject;
pub use descriptor::{
    AccessorDescriptor, DataDescriptor, Descriptor, DescriptorRef, PropertyFlags,
    UndefinedDescriptor,
};
pub use function::NativeFunction;
pub use object::{
    ObjectRef, PlainObject, ScriptObject, ordinary_delete, ordinary_get, ordinary_has_instance,
    ordinary_put, same_object,
};
pub use property_table::{PropertyTable, SlotState};
pub use value::ScriptValue;
