//! Fluent builder producing immutable [`HostType`]s.
//!
//! # Example
//!
//! ```
//! use hostbridge::host::{HostValue, TypeBuilder, primitive_type};
//! use hostbridge::PrimitiveKind;
//!
//! struct Counter {
//!     hits: i32,
//! }
//!
//! let int = primitive_type(PrimitiveKind::Int32);
//! let counter = TypeBuilder::<Counter>::class("Docs.Counter")
//!     .constructor([int.clone()], |call| Ok(Counter { hits: call.arg(0)? }))
//!     .property_rw("Hits", |c: &Counter| c.hits, |c: &mut Counter, v: i32| c.hits = v)
//!     .method("Bump", [int], |call| {
//!         let by: i32 = call.arg(0)?;
//!         call.with_this_mut(|c: &mut Counter| {
//!             c.hits += by;
//!             HostValue::Int32(c.hits)
//!         })
//!     })
//!     .build();
//!
//! assert_eq!(counter.name(), "Docs.Counter");
//! assert_eq!(counter.constructors().len(), 1);
//! ```

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::HostError;
use crate::type_hash::TypeHash;

use super::convert::{FromHost, HostTyped, IntoHost};
use super::members::{
    ConstructorEntry, EnumValue, FieldEntry, IndexerEntry, MethodEntry, ParamEntry, PropertyEntry,
};
use super::native_fn::{GetterFn, HostCall, IndexGetFn, IndexSetFn, SetterFn};
use super::primitives::{object_type, value_type};
use super::types::{HostType, TypeEntry, TypeKind};
use super::value::{HostRef, HostValue};

/// Builder for a host type backed by the Rust type `T`.
///
/// `T` is the storage type of instances; enums and interfaces, which have
/// no instances, conventionally use `()`.
pub struct TypeBuilder<T: 'static> {
    entry: TypeEntry,
    _marker: PhantomData<fn() -> T>,
}

fn require_target(this: Option<&HostRef>) -> Result<&HostRef, HostError> {
    this.ok_or_else(|| HostError::TargetMismatch {
        expected: "instance".to_string(),
        actual: "no instance".to_string(),
    })
}

fn instance_getter<T: 'static, R: IntoHost + 'static>(
    get: impl Fn(&T) -> R + Send + Sync + 'static,
) -> GetterFn {
    Arc::new(
        move |this: Option<&HostRef>| -> Result<HostValue, HostError> {
            require_target(this)?.with(|t: &T| get(t).into_host())
        },
    )
}

fn instance_setter<T: 'static, R: FromHost + 'static>(
    set: impl Fn(&mut T, R) + Send + Sync + 'static,
) -> SetterFn {
    Arc::new(
        move |this: Option<&HostRef>, value: HostValue| -> Result<(), HostError> {
            let value = R::from_host(&value)?;
            require_target(this)?.with_mut(|t: &mut T| set(t, value))
        },
    )
}

fn static_getter<R: IntoHost + 'static>(get: impl Fn() -> R + Send + Sync + 'static) -> GetterFn {
    Arc::new(move |_: Option<&HostRef>| -> Result<HostValue, HostError> {
        Ok(get().into_host())
    })
}

fn static_setter<R: FromHost + 'static>(set: impl Fn(R) + Send + Sync + 'static) -> SetterFn {
    Arc::new(
        move |_: Option<&HostRef>, value: HostValue| -> Result<(), HostError> {
            set(R::from_host(&value)?);
            Ok(())
        },
    )
}

fn params(list: impl IntoIterator<Item = impl Into<ParamEntry>>) -> Vec<ParamEntry> {
    list.into_iter().map(Into::into).collect()
}

impl<T: 'static> TypeBuilder<T> {
    fn new(name: impl Into<String>, kind: TypeKind, base: HostType) -> Self {
        Self {
            entry: TypeEntry::new(name.into(), kind, Some(base)),
            _marker: PhantomData,
        }
    }

    /// A reference type deriving from `object`.
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class, object_type())
    }

    /// A value type deriving from `ValueType`.
    pub fn value(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Value, value_type())
    }

    /// An enumeration deriving from `ValueType`.
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Enum, value_type())
    }

    /// An interface.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface, object_type())
    }

    fn owner(&self) -> TypeHash {
        self.entry.type_hash
    }

    // === Hierarchy ===

    /// Set the base type.
    pub fn base(mut self, base: &HostType) -> Self {
        self.entry.base = Some(base.clone());
        self
    }

    /// Add an implemented interface.
    pub fn implements(mut self, interface: &HostType) -> Self {
        if !self.entry.interfaces.contains(interface) {
            self.entry.interfaces.push(interface.clone());
        }
        self
    }

    // === Raw entries ===

    /// Add a prepared property entry.
    pub fn with_property(mut self, property: PropertyEntry) -> Self {
        self.entry.properties.push(Arc::new(property));
        self
    }

    /// Add a prepared field entry.
    pub fn with_field(mut self, field: FieldEntry) -> Self {
        self.entry.fields.push(Arc::new(field));
        self
    }

    /// Add a prepared indexer entry.
    pub fn with_indexer(mut self, indexer: IndexerEntry) -> Self {
        match indexer.interface.clone() {
            Some(iface) => {
                self = self.implements(&iface);
                self.entry.explicit_indexers.push(Arc::new(indexer));
            }
            None => self.entry.indexers.push(Arc::new(indexer)),
        }
        self
    }

    // === Properties ===

    /// Read-only instance property.
    pub fn property<R: IntoHost + HostTyped + 'static>(
        self,
        name: impl Into<String>,
        get: impl Fn(&T) -> R + Send + Sync + 'static,
    ) -> Self {
        let entry = PropertyEntry::new(name, R::host_type(), Some(instance_getter(get)), None);
        self.with_property(entry)
    }

    /// Read-write instance property.
    pub fn property_rw<R: IntoHost + FromHost + HostTyped + 'static>(
        self,
        name: impl Into<String>,
        get: impl Fn(&T) -> R + Send + Sync + 'static,
        set: impl Fn(&mut T, R) + Send + Sync + 'static,
    ) -> Self {
        let entry = PropertyEntry::new(
            name,
            R::host_type(),
            Some(instance_getter(get)),
            Some(instance_setter(set)),
        );
        self.with_property(entry)
    }

    /// Read-only static property.
    pub fn static_property<R: IntoHost + HostTyped + 'static>(
        self,
        name: impl Into<String>,
        get: impl Fn() -> R + Send + Sync + 'static,
    ) -> Self {
        let entry = PropertyEntry::new(name, R::host_type(), Some(static_getter(get)), None);
        self.with_property(entry.as_static())
    }

    /// Read-write static property.
    pub fn static_property_rw<R: IntoHost + FromHost + HostTyped + 'static>(
        self,
        name: impl Into<String>,
        get: impl Fn() -> R + Send + Sync + 'static,
        set: impl Fn(R) + Send + Sync + 'static,
    ) -> Self {
        let entry = PropertyEntry::new(
            name,
            R::host_type(),
            Some(static_getter(get)),
            Some(static_setter(set)),
        );
        self.with_property(entry.as_static())
    }

    /// Read-only property explicitly implementing `interface`.
    pub fn explicit_property<R: IntoHost + HostTyped + 'static>(
        mut self,
        interface: &HostType,
        name: impl Into<String>,
        get: impl Fn(&T) -> R + Send + Sync + 'static,
    ) -> Self {
        let entry = PropertyEntry::new(name, R::host_type(), Some(instance_getter(get)), None)
            .for_interface(interface);
        self = self.implements(interface);
        self.entry.explicit_properties.push(Arc::new(entry));
        self
    }

    // === Fields ===

    /// Read-write instance field.
    pub fn field<R: IntoHost + FromHost + HostTyped + 'static>(
        self,
        name: impl Into<String>,
        get: impl Fn(&T) -> R + Send + Sync + 'static,
        set: impl Fn(&mut T, R) + Send + Sync + 'static,
    ) -> Self {
        let entry = FieldEntry::new(
            name,
            R::host_type(),
            instance_getter(get),
            Some(instance_setter(set)),
        );
        self.with_field(entry)
    }

    /// Read-only instance field.
    pub fn readonly_field<R: IntoHost + HostTyped + 'static>(
        self,
        name: impl Into<String>,
        get: impl Fn(&T) -> R + Send + Sync + 'static,
    ) -> Self {
        let entry = FieldEntry::new(name, R::host_type(), instance_getter(get), None);
        self.with_field(entry)
    }

    /// Read-write static field.
    pub fn static_field<R: IntoHost + FromHost + HostTyped + 'static>(
        self,
        name: impl Into<String>,
        get: impl Fn() -> R + Send + Sync + 'static,
        set: impl Fn(R) + Send + Sync + 'static,
    ) -> Self {
        let entry = FieldEntry::new(
            name,
            R::host_type(),
            static_getter(get),
            Some(static_setter(set)),
        );
        self.with_field(entry.as_static())
    }

    // === Methods ===

    /// Instance method overload. Calling this again with the same name adds
    /// another overload to the group.
    pub fn method(
        mut self,
        name: impl Into<String>,
        params_list: impl IntoIterator<Item = impl Into<ParamEntry>>,
        f: impl Fn(&mut HostCall<'_>) -> Result<HostValue, HostError> + Send + Sync + 'static,
    ) -> Self {
        let entry = MethodEntry::new(self.owner(), name, params(params_list), Arc::new(f));
        self.entry.methods.push(Arc::new(entry));
        self
    }

    /// Static method overload.
    pub fn static_method(
        mut self,
        name: impl Into<String>,
        params_list: impl IntoIterator<Item = impl Into<ParamEntry>>,
        f: impl Fn(&mut HostCall<'_>) -> Result<HostValue, HostError> + Send + Sync + 'static,
    ) -> Self {
        let entry = MethodEntry::new(self.owner(), name, params(params_list), Arc::new(f));
        self.entry.methods.push(Arc::new(entry.as_static()));
        self
    }

    /// Method overload explicitly implementing `interface`.
    pub fn explicit_method(
        mut self,
        interface: &HostType,
        name: impl Into<String>,
        params_list: impl IntoIterator<Item = impl Into<ParamEntry>>,
        f: impl Fn(&mut HostCall<'_>) -> Result<HostValue, HostError> + Send + Sync + 'static,
    ) -> Self {
        let entry = MethodEntry::new(self.owner(), name, params(params_list), Arc::new(f))
            .for_interface(interface);
        self = self.implements(interface);
        self.entry.explicit_methods.push(Arc::new(entry));
        self
    }

    // === Construction ===

    /// Public instance constructor.
    pub fn constructor(
        mut self,
        params_list: impl IntoIterator<Item = impl Into<ParamEntry>>,
        f: impl Fn(&mut HostCall<'_>) -> Result<T, HostError> + Send + Sync + 'static,
    ) -> Self {
        let func = Arc::new(
            move |call: &mut HostCall<'_>| -> Result<Box<dyn Any>, HostError> {
                f(call).map(|value| Box::new(value) as Box<dyn Any>)
            },
        );
        let entry = ConstructorEntry::new(self.owner(), params(params_list), func);
        self.entry.constructors.push(Arc::new(entry));
        self
    }

    /// Use `T::default()` as the default instance of a value type.
    pub fn default_instance(mut self) -> Self
    where
        T: Default,
    {
        self.entry.default_instance = Some(Arc::new(|| -> Box<dyn Any> { Box::new(T::default()) }));
        self
    }

    // === Collections ===

    /// Expose a live element count, making wrappers array-like.
    pub fn countable(mut self, count: impl Fn(&T) -> usize + Send + Sync + 'static) -> Self {
        self.entry.count = Some(Arc::new(
            move |target: &HostRef| -> Result<usize, HostError> { target.with(|t: &T| count(t)) },
        ));
        self
    }

    /// Read-only indexer.
    pub fn indexer<K, V>(
        self,
        get: impl Fn(&T, K) -> Result<V, HostError> + Send + Sync + 'static,
    ) -> Self
    where
        K: FromHost + HostTyped + 'static,
        V: IntoHost + HostTyped + 'static,
    {
        let entry = IndexerEntry::new(K::host_type(), V::host_type(), Some(index_getter(get)), None);
        self.with_indexer(entry)
    }

    /// Read-write indexer.
    pub fn indexer_rw<K, V>(
        self,
        get: impl Fn(&T, K) -> Result<V, HostError> + Send + Sync + 'static,
        set: impl Fn(&mut T, K, V) -> Result<(), HostError> + Send + Sync + 'static,
    ) -> Self
    where
        K: FromHost + HostTyped + 'static,
        V: IntoHost + FromHost + HostTyped + 'static,
    {
        let setter: IndexSetFn = Arc::new(
            move |target: &HostRef, key: &HostValue, value: HostValue| -> Result<(), HostError> {
                let key = K::from_host(key)?;
                let value = V::from_host(&value)?;
                target.with_mut(|t: &mut T| set(t, key, value))?
            },
        );
        let entry = IndexerEntry::new(
            K::host_type(),
            V::host_type(),
            Some(index_getter(get)),
            Some(setter),
        );
        self.with_indexer(entry)
    }

    /// Read-only indexer explicitly implementing `interface`.
    pub fn explicit_indexer<K, V>(
        self,
        interface: &HostType,
        get: impl Fn(&T, K) -> Result<V, HostError> + Send + Sync + 'static,
    ) -> Self
    where
        K: FromHost + HostTyped + 'static,
        V: IntoHost + HostTyped + 'static,
    {
        let entry = IndexerEntry::new(K::host_type(), V::host_type(), Some(index_getter(get)), None)
            .for_interface(interface);
        self.with_indexer(entry)
    }

    // === Enums ===

    /// Add an enum constant.
    pub fn constant(mut self, name: impl Into<String>, value: i64) -> Self {
        self.entry.enum_values.push(EnumValue::new(name, value));
        self
    }

    /// Finish the type.
    pub fn build(self) -> HostType {
        HostType::from_entry(self.entry)
    }
}

fn index_getter<T: 'static, K: FromHost + 'static, V: IntoHost + 'static>(
    get: impl Fn(&T, K) -> Result<V, HostError> + Send + Sync + 'static,
) -> IndexGetFn {
    Arc::new(
        move |target: &HostRef, key: &HostValue| -> Result<HostValue, HostError> {
            let key = K::from_host(key)?;
            target.with(|t: &T| get(t, key).map(IntoHost::into_host))?
        },
    )
}
