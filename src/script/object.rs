//! The script object abstraction and its ordinary behavior.
//!
//! [`ScriptObject`] is the own-property protocol the evaluator drives.
//! Default methods implement ordinary object semantics on top of the
//! object's [`PropertyTable`]; host-backed objects override the protocol to
//! resolve members lazily.

use std::rc::Rc;

use crate::engine::Engine;
use crate::error::{BridgeResult, InvocationError};
use crate::host::{HostRef, HostType};

use super::descriptor::{DataDescriptor, DescriptorRef};
use super::property_table::PropertyTable;
use super::value::ScriptValue;

/// Shared handle to a script object.
pub type ObjectRef = Rc<dyn ScriptObject>;

/// A script object with an overridable own-property protocol.
pub trait ScriptObject {
    /// Class tag used in diagnostics.
    fn class_name(&self) -> &str;

    fn properties(&self) -> &PropertyTable;

    fn prototype(&self) -> Option<ObjectRef>;

    /// Own descriptor for `name`. `Some(marker)` means "known to be absent".
    fn get_own_property(&self, _engine: &Engine, name: &str) -> BridgeResult<Option<DescriptorRef>> {
        Ok(self.properties().get(name))
    }

    /// Read `name`, following the prototype chain on a miss.
    fn get(&self, engine: &Engine, name: &str) -> BridgeResult<ScriptValue> {
        ordinary_get(self, engine, name)
    }

    /// Check whether an assignment to `name` may proceed.
    fn can_put(&self, engine: &Engine, name: &str) -> BridgeResult<bool> {
        Ok(match self.get_own_property(engine, name)? {
            Some(desc) if !desc.is_undefined_marker() => desc.is_writable(),
            _ => true,
        })
    }

    /// Assign `name`. With `throw`, failed writes are errors instead of no-ops.
    fn put(&self, engine: &Engine, name: &str, value: ScriptValue, throw: bool) -> BridgeResult<()> {
        ordinary_put(self, engine, name, value, throw)
    }

    /// Remove `name`.
    fn delete(&self, engine: &Engine, name: &str, throw: bool) -> BridgeResult<bool> {
        ordinary_delete(self, engine, name, throw)
    }

    /// Install a descriptor for `name` directly.
    fn define_own_property(
        &self,
        _engine: &Engine,
        name: &str,
        descriptor: DescriptorRef,
        _throw: bool,
    ) -> BridgeResult<bool> {
        self.properties().set_live(name, descriptor);
        Ok(true)
    }

    /// Names of materialized own properties, in insertion order.
    fn own_keys(&self) -> Vec<String> {
        self.properties().live_keys()
    }

    fn is_callable(&self) -> bool {
        false
    }

    fn call(&self, _engine: &Engine, _this: &ScriptValue, _args: &[ScriptValue]) -> BridgeResult<ScriptValue> {
        Err(InvocationError::NotCallable {
            what: self.class_name().to_string(),
        }
        .into())
    }

    fn construct(&self, _engine: &Engine, _args: &[ScriptValue]) -> BridgeResult<ScriptValue> {
        Err(InvocationError::NotConstructor {
            what: self.class_name().to_string(),
        }
        .into())
    }

    /// `value instanceof this`.
    fn has_instance(&self, engine: &Engine, value: &ScriptValue) -> BridgeResult<bool> {
        ordinary_has_instance(self, engine, value)
    }

    /// Whether spread and iteration treat this object as a sequence.
    fn is_array_like(&self) -> bool {
        false
    }

    /// Elements of a script array, if this is one.
    fn array_elements(&self) -> Option<Vec<ScriptValue>> {
        None
    }

    /// The host instance behind a host object wrapper.
    fn host_target(&self) -> Option<&HostRef> {
        None
    }

    /// The host type behind a type reference.
    fn referenced_type(&self) -> Option<&HostType> {
        None
    }
}

/// Read through own properties, then the prototype chain.
pub fn ordinary_get<O: ScriptObject + ?Sized>(
    obj: &O,
    engine: &Engine,
    name: &str,
) -> BridgeResult<ScriptValue> {
    if let Some(desc) = obj.get_own_property(engine, name)? {
        if !desc.is_undefined_marker() {
            return desc.get(engine);
        }
    }
    match obj.prototype() {
        Some(proto) => proto.get(engine, name),
        None => Ok(ScriptValue::Undefined),
    }
}

/// Write an existing own slot, or add a plain data slot.
pub fn ordinary_put<O: ScriptObject + ?Sized>(
    obj: &O,
    engine: &Engine,
    name: &str,
    value: ScriptValue,
    throw: bool,
) -> BridgeResult<()> {
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
        _ => {
            obj.properties()
                .set_live(name, DataDescriptor::plain(value).into_ref());
            Ok(())
        }
    }
}

/// Remove a configurable own slot.
pub fn ordinary_delete<O: ScriptObject + ?Sized>(
    obj: &O,
    engine: &Engine,
    name: &str,
    throw: bool,
) -> BridgeResult<bool> {
    match obj.get_own_property(engine, name)? {
        None => Ok(true),
        Some(desc) if desc.is_undefined_marker() || desc.is_configurable() => {
            obj.properties().remove(name);
            Ok(true)
        }
        Some(_) if throw => Err(InvocationError::NotConfigurable {
            name: name.to_string(),
        }
        .into()),
        Some(_) => Ok(false),
    }
}

/// Prototype-chain instance check against `callee.prototype`.
pub fn ordinary_has_instance<O: ScriptObject + ?Sized>(
    callee: &O,
    engine: &Engine,
    value: &ScriptValue,
) -> BridgeResult<bool> {
    if !callee.is_callable() {
        return Err(InvocationError::NotCallable {
            what: callee.class_name().to_string(),
        }
        .into());
    }
    let ScriptValue::Object(obj) = value else {
        return Ok(false);
    };
    let ScriptValue::Object(proto) = callee.get(engine, "prototype")? else {
        return Ok(false);
    };
    let mut current = obj.prototype();
    while let Some(candidate) = current {
        if same_object(&candidate, &proto) {
            return Ok(true);
        }
        current = candidate.prototype();
    }
    Ok(false)
}

/// Identity comparison for object handles.
pub fn same_object(a: &ObjectRef, b: &ObjectRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// An ordinary object with a prototype link.
pub struct PlainObject {
    table: PropertyTable,
    prototype: Option<ObjectRef>,
}

impl PlainObject {
    pub fn new(prototype: Option<ObjectRef>) -> Self {
        Self {
            table: PropertyTable::new(),
            prototype,
        }
    }
}

impl ScriptObject for PlainObject {
    fn class_name(&self) -> &str {
        "Object"
    }

    fn properties(&self) -> &PropertyTable {
        &self.table
    }

    fn prototype(&self) -> Option<ObjectRef> {
        self.prototype.clone()
    }
}
