//! Script object exposing one host instance.

use crate::engine::Engine;
use crate::error::BridgeResult;
use crate::host::{HostRef, guarded};
use crate::names::normalize;
use crate::resolver::{MemberScope, ResolvedMember};
use crate::script::{
    AccessorDescriptor, DataDescriptor, DescriptorRef, ObjectRef, PropertyFlags, PropertyTable,
    ScriptObject, ScriptValue, SlotState, UndefinedDescriptor,
};

use super::field_binding::FieldBinding;
use super::host_put;
use super::index_binding::IndexBinding;
use super::method_group::MethodGroupFunction;
use super::property_binding::PropertyBinding;

/// Wraps a host instance as a script object.
///
/// Members are resolved lazily on first access and bound into the slot
/// table. Countable instances get a live, read-only `length` and are
/// array-like.
pub struct ObjectWrapper {
    target: HostRef,
    table: PropertyTable,
    prototype: Option<ObjectRef>,
    array_like: bool,
}

impl ObjectWrapper {
    pub fn new(engine: &Engine, target: HostRef) -> Self {
        let table = PropertyTable::new();
        let array_like = target.ty().is_countable();
        if array_like {
            let counted = target.clone();
            let length = AccessorDescriptor::new(
                move |_: &Engine| -> BridgeResult<ScriptValue> {
                    let count = guarded(|| counted.ty().count_of(&counted).unwrap_or(Ok(0)))?;
                    Ok(ScriptValue::Number(count as f64))
                },
                PropertyFlags::NONE,
            );
            table.set_live("length", std::rc::Rc::new(length));
        }
        Self {
            target,
            table,
            prototype: Some(engine.object_prototype()),
            array_like,
        }
    }

    pub fn target(&self) -> &HostRef {
        &self.target
    }

    /// Bind `name` to its resolved member. The flag tells whether the
    /// binding may be stored in the slot table.
    fn bind(&self, engine: &Engine, name: &str, key: &str) -> Option<(DescriptorRef, bool)> {
        let target = Some(self.target.clone());
        match engine.resolve(self.target.ty(), key, MemberScope::Instance) {
            ResolvedMember::Field(field) => Some((FieldBinding::new(field, target).into_ref(), true)),
            ResolvedMember::Property(property) => {
                Some((PropertyBinding::new(property, target).into_ref(), true))
            }
            ResolvedMember::MethodGroup(group) => {
                let function: ObjectRef = std::rc::Rc::new(MethodGroupFunction::new(engine, group, target));
                let slot = DataDescriptor::new(
                    ScriptValue::Object(function),
                    PropertyFlags::WRITABLE | PropertyFlags::ENUMERABLE,
                );
                Some((slot.into_ref(), true))
            }
            ResolvedMember::Indexer(indexer) => Some((
                IndexBinding::new(indexer, self.target.clone(), name).into_ref(),
                false,
            )),
            ResolvedMember::EnumConstant(_) | ResolvedMember::Undefined => None,
        }
    }
}

impl ScriptObject for ObjectWrapper {
    fn class_name(&self) -> &str {
        self.target.ty().name()
    }

    fn properties(&self) -> &PropertyTable {
        &self.table
    }

    fn prototype(&self) -> Option<ObjectRef> {
        self.prototype.clone()
    }

    fn get_own_property(&self, engine: &Engine, name: &str) -> BridgeResult<Option<DescriptorRef>> {
        let key = normalize(name);
        match self.table.state(&key) {
            SlotState::Live(desc) => Ok(Some(desc)),
            SlotState::Deleted => Ok(Some(UndefinedDescriptor::shared())),
            SlotState::Unset => Ok(self.bind(engine, name, &key).map(|(desc, store)| {
                if store {
                    self.table.set_live(&key, desc.clone());
                }
                desc
            })),
        }
    }

    fn put(&self, engine: &Engine, name: &str, value: ScriptValue, throw: bool) -> BridgeResult<()> {
        host_put(self, engine, name, value, throw, engine.options().expando_members)
    }

    /// Always succeeds, including for names that never resolved.
    fn delete(&self, _engine: &Engine, name: &str, _throw: bool) -> BridgeResult<bool> {
        self.table.mark_deleted(&normalize(name));
        Ok(true)
    }

    fn is_array_like(&self) -> bool {
        self.array_like
    }

    fn host_target(&self) -> Option<&HostRef> {
        Some(&self.target)
    }
}
