//! Script value exposing a host type: static members plus construction.

use std::rc::Rc;

use crate::engine::Engine;
use crate::error::{BridgeError, BridgeResult, InvocationError};
use crate::host::{HostCall, HostRef, HostType, HostValue, ParamEntry, guarded};
use crate::names::normalize;
use crate::resolver::{MemberScope, ResolvedMember};
use crate::script::{
    DataDescriptor, DescriptorRef, ObjectRef, PlainObject, PropertyFlags, PropertyTable,
    ScriptObject, ScriptValue, SlotState, UndefinedDescriptor, ordinary_has_instance,
};

use super::converter::from_host;
use super::field_binding::FieldBinding;
use super::host_put;
use super::method_group::MethodGroupFunction;
use super::overload::convert_arguments;
use super::property_binding::PropertyBinding;

/// A host type as a callable, constructible script value.
///
/// Calling a type reference constructs it. Enum types expose their
/// constants as read-only numbers and nothing else.
pub struct TypeReference {
    ty: HostType,
    table: PropertyTable,
    prototype: Option<ObjectRef>,
}

impl TypeReference {
    pub fn new(engine: &Engine, ty: HostType) -> Self {
        let table = PropertyTable::new();
        let instance_proto: ObjectRef = Rc::new(PlainObject::new(Some(engine.object_prototype())));
        table.set_live(
            "prototype",
            DataDescriptor::new(ScriptValue::Object(instance_proto), PropertyFlags::NONE).into_ref(),
        );
        Self {
            ty,
            table,
            prototype: Some(engine.function_prototype()),
        }
    }

    pub fn host_type(&self) -> &HostType {
        &self.ty
    }

    fn bind(&self, engine: &Engine, key: &str) -> Option<DescriptorRef> {
        match engine.resolve(&self.ty, key, MemberScope::Static) {
            ResolvedMember::EnumConstant(value) => Some(
                DataDescriptor::new(ScriptValue::Number(value as f64), PropertyFlags::NONE)
                    .into_ref(),
            ),
            ResolvedMember::Property(property) => Some(PropertyBinding::new(property, None).into_ref()),
            ResolvedMember::Field(field) => Some(FieldBinding::new(field, None).into_ref()),
            ResolvedMember::MethodGroup(group) => {
                let function: ObjectRef = Rc::new(MethodGroupFunction::new(engine, group, None));
                Some(DataDescriptor::new(ScriptValue::Object(function), PropertyFlags::NONE).into_ref())
            }
            ResolvedMember::Indexer(_) | ResolvedMember::Undefined => None,
        }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn construct_instance(&self, engine: &Engine, args: &[ScriptValue]) -> BridgeResult<ScriptValue> {
        if args.is_empty() && self.ty.is_value_type() {
            if let Some(value) = self.ty.default_value() {
                return Ok(from_host(engine, value));
            }
        }

        let candidates: Vec<&[ParamEntry]> = self
            .ty
            .constructors()
            .iter()
            .map(|c| c.params.as_slice())
            .collect();

        for index in engine.ranker().rank(&candidates, args) {
            let Some(ctor) = self.ty.constructors().get(index) else {
                continue;
            };
            let attempt = convert_arguments(&ctor.params, args).and_then(|host_args| {
                let mut call = HostCall::new(engine, None, host_args);
                guarded(|| (ctor.func)(&mut call)).map_err(BridgeError::from)
            });
            match attempt {
                Ok(storage) => {
                    let instance = HostRef::from_box(self.ty.clone(), storage);
                    return Ok(from_host(engine, HostValue::Object(instance)));
                }
                Err(error) => tracing::debug!(
                    ty = self.ty.name(),
                    candidate = index,
                    %error,
                    "constructor candidate rejected"
                ),
            }
        }

        Err(InvocationError::NoMatchingConstructor {
            type_name: self.ty.name().to_string(),
        }
        .into())
    }
}

impl ScriptObject for TypeReference {
    fn class_name(&self) -> &str {
        self.ty.name()
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
            SlotState::Unset => Ok(self.bind(engine, &key).inspect(|desc| {
                self.table.set_live(&key, desc.clone());
            })),
        }
    }

    fn put(&self, engine: &Engine, name: &str, value: ScriptValue, throw: bool) -> BridgeResult<()> {
        host_put(self, engine, name, value, throw, engine.options().expando_members)
    }

    fn delete(&self, _engine: &Engine, name: &str, _throw: bool) -> BridgeResult<bool> {
        self.table.mark_deleted(&normalize(name));
        Ok(true)
    }

    fn define_own_property(
        &self,
        _engine: &Engine,
        name: &str,
        _descriptor: DescriptorRef,
        _throw: bool,
    ) -> BridgeResult<bool> {
        Err(InvocationError::DefineOnTypeReference {
            type_name: self.ty.name().to_string(),
            name: name.to_string(),
        }
        .into())
    }

    fn is_callable(&self) -> bool {
        true
    }

    fn call(&self, engine: &Engine, _this: &ScriptValue, args: &[ScriptValue]) -> BridgeResult<ScriptValue> {
        self.construct_instance(engine, args)
    }

    fn construct(&self, engine: &Engine, args: &[ScriptValue]) -> BridgeResult<ScriptValue> {
        self.construct_instance(engine, args)
    }

    /// Exact runtime type match for host instances; no subtype matching.
    fn has_instance(&self, engine: &Engine, value: &ScriptValue) -> BridgeResult<bool> {
        if let Some(instance) = value.as_object().and_then(|o| o.host_target()) {
            if *instance.ty() == self.ty {
                return Ok(true);
            }
        }
        ordinary_has_instance(self, engine, value)
    }

    fn referenced_type(&self) -> Option<&HostType> {
        Some(&self.ty)
    }
}
