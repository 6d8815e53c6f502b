//! Host interop: script objects and descriptors backed by host members.
//!
//! # Slot lifecycle
//!
//! Host-backed objects keep one tri-state slot per normalized name:
//!
//! ```text
//! Unset --first access, resolves--> Live(binding)
//! Live  --delete------------------> Deleted
//! Unset --delete------------------> Deleted
//! Deleted --write-----------------> Live(plain data slot)
//! ```
//!
//! Once deleted, a name never binds to its host member again.

mod converter;
mod field_binding;
mod index_binding;
mod method_group;
mod object_wrapper;
mod overload;
mod property_binding;
mod type_reference;

pub use converter::{convert_to, from_host, homogenize, to_host};
pub use field_binding::FieldBinding;
pub use index_binding::IndexBinding;
pub use method_group::MethodGroupFunction;
pub use object_wrapper::ObjectWrapper;
pub use overload::{CostRanker, OverloadRanker};
pub use property_binding::PropertyBinding;
pub use type_reference::TypeReference;

use crate::engine::Engine;
use crate::error::{BridgeResult, InvocationError};
use crate::names::normalize;
use crate::script::{DataDescriptor, ScriptObject, ScriptValue};

/// Assignment through the slot state machine shared by wrappers and type
/// references.
fn host_put<O: ScriptObject + ?Sized>(
    obj: &O,
    engine: &Engine,
    name: &str,
    value: ScriptValue,
    throw: bool,
    expando: bool,
) -> BridgeResult<()> {
    let key = normalize(name);
    if obj.properties().state(&key).is_deleted() {
        tracing::debug!(name, "deleted member rebound as a plain slot");
        obj.properties()
            .set_live(&key, DataDescriptor::plain(value).into_ref());
        return Ok(());
    }

    match obj.get_own_property(engine, name)? {
        Some(desc) if !desc.is_undefined_marker() => {
            if desc.is_writable() {
                desc.set(engine, value)
            } else if throw {
                Err(InvocationError::ReadOnly {
                    name: name.to_string(),
                }
                .into())
            } else {
                Ok(())
            }
        }
        _ if throw => Err(InvocationError::UnknownMember {
            name: name.to_string(),
        }
        .into()),
        _ if expando => {
            tracing::debug!(name, "expando member added");
            obj.properties()
                .set_live(&key, DataDescriptor::plain(value).into_ref());
            Ok(())
        }
        _ => Ok(()),
    }
}
