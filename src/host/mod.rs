//! Host runtime model.
//!
//! Host types are described once by a [`TypeBuilder`] into an immutable
//! [`HostType`]; members carry typed accessor closures instead of runtime
//! reflection. Instances travel through the bridge as [`HostValue`]s.

mod builder;
mod coerce;
mod convert;
mod members;
mod native_fn;
mod primitives;
mod types;
mod value;

pub use builder::TypeBuilder;
pub use coerce::coerce;
pub use convert::{FromHost, HostTyped, IntoHost};
pub use members::{
    ConstructorEntry, EnumValue, FieldEntry, IndexerEntry, MethodEntry, ParamEntry, PropertyEntry,
};
pub use native_fn::{
    CountFn, CtorFn, DefaultArgFn, DefaultInstanceFn, GetterFn, HostCall, IndexGetFn, IndexSetFn,
    MethodFn, SetterFn, guarded,
};
pub use primitives::{
    array_type, object_type, primitive_type, script_value_type, string_type, value_type,
};
pub use types::{HostType, TypeEntry, TypeKind};
pub use value::{HostArray, HostRef, HostValue};
