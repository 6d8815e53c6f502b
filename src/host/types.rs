//! Host type descriptions.

use std::fmt;
use std::iter;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::HostError;
use crate::primitive_kind::PrimitiveKind;
use crate::type_hash::TypeHash;

use super::members::{
    ConstructorEntry, EnumValue, FieldEntry, IndexerEntry, MethodEntry, PropertyEntry,
};
use super::native_fn::{CountFn, DefaultInstanceFn};
use super::primitives::object_type;
use super::value::{HostRef, HostValue};

/// The shape category of a host type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Reference type: shared by handle, nullable.
    Class,
    /// Value type: has a default instance, not nullable.
    Value,
    /// Integer-backed named constants.
    Enum,
    /// Interface: only a target for explicit member implementations.
    Interface,
    /// Built-in bool or numeric type.
    Primitive(PrimitiveKind),
}

impl TypeKind {
    /// Check if values of this kind are value types.
    pub fn is_value(self) -> bool {
        matches!(self, TypeKind::Value | TypeKind::Enum | TypeKind::Primitive(_))
    }
}

/// Immutable description of one host type.
///
/// Built once by a [`TypeBuilder`](super::TypeBuilder). Member names are
/// stored alongside their normalized lookup key.
pub struct TypeEntry {
    pub(crate) name: String,
    pub(crate) type_hash: TypeHash,
    pub(crate) id: u64,
    pub(crate) kind: TypeKind,
    pub(crate) base: Option<HostType>,
    pub(crate) interfaces: Vec<HostType>,

    pub(crate) properties: Vec<Arc<PropertyEntry>>,
    pub(crate) fields: Vec<Arc<FieldEntry>>,
    pub(crate) methods: Vec<Arc<MethodEntry>>,
    pub(crate) indexers: Vec<Arc<IndexerEntry>>,

    // explicit interface implementations
    pub(crate) explicit_properties: Vec<Arc<PropertyEntry>>,
    pub(crate) explicit_methods: Vec<Arc<MethodEntry>>,
    pub(crate) explicit_indexers: Vec<Arc<IndexerEntry>>,

    pub(crate) constructors: Vec<Arc<ConstructorEntry>>,
    pub(crate) enum_values: Vec<EnumValue>,
    pub(crate) default_instance: Option<DefaultInstanceFn>,
    pub(crate) count: Option<CountFn>,
}

impl TypeEntry {
    pub(crate) fn new(name: String, kind: TypeKind, base: Option<HostType>) -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            base,
            interfaces: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            indexers: Vec::new(),
            explicit_properties: Vec::new(),
            explicit_methods: Vec::new(),
            explicit_indexers: Vec::new(),
            constructors: Vec::new(),
            enum_values: Vec::new(),
            default_instance: None,
            count: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// Process-unique identity of this registration.
    ///
    /// Two types built under the same name share a [`TypeHash`] but never an id.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn base(&self) -> Option<&HostType> {
        self.base.as_ref()
    }

    pub fn interfaces(&self) -> &[HostType] {
        &self.interfaces
    }

    pub fn properties(&self) -> &[Arc<PropertyEntry>] {
        &self.properties
    }

    pub fn fields(&self) -> &[Arc<FieldEntry>] {
        &self.fields
    }

    pub fn methods(&self) -> &[Arc<MethodEntry>] {
        &self.methods
    }

    pub fn indexers(&self) -> &[Arc<IndexerEntry>] {
        &self.indexers
    }

    pub fn constructors(&self) -> &[Arc<ConstructorEntry>] {
        &self.constructors
    }

    pub fn enum_values(&self) -> &[EnumValue] {
        &self.enum_values
    }

    pub fn is_value_type(&self) -> bool {
        self.kind.is_value()
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Check if the type exposes a live element count.
    pub fn is_countable(&self) -> bool {
        self.count.is_some()
    }

    /// Live element count of a countable instance.
    pub fn count_of(&self, target: &HostRef) -> Option<Result<usize, HostError>> {
        self.count.as_ref().map(|count| count(target))
    }

    /// The type followed by its base chain, most derived first.
    pub fn ancestry(&self) -> impl Iterator<Item = &TypeEntry> {
        iter::successors(Some(self), |t| t.base.as_deref())
    }

    /// Look up an enum constant by normalized key.
    pub fn enum_value(&self, key: &str) -> Option<i64> {
        self.enum_values
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value)
    }

    /// Check if this type or any ancestor implements `interface`.
    pub fn implements(&self, interface: &TypeEntry) -> bool {
        self.ancestry().any(|t| {
            t.interfaces
                .iter()
                .any(|i| i.id == interface.id || i.implements(interface))
        })
    }

    /// Check if a value of this type can be used where `target` is expected.
    ///
    /// True for identity, derived-to-base, implemented interfaces, and any
    /// type against the universal base.
    pub fn is_assignable_to(&self, target: &TypeEntry) -> bool {
        if target.id == object_type().id {
            return true;
        }
        self.ancestry().any(|t| t.id == target.id)
            || (target.is_interface() && self.implements(target))
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("type_hash", &self.type_hash)
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("base", &self.base.as_ref().map(|b| b.name()))
            .field("properties", &self.properties.len())
            .field("fields", &self.fields.len())
            .field("methods", &self.methods.len())
            .field("constructors", &self.constructors.len())
            .finish_non_exhaustive()
    }
}

/// Shared handle to an immutable host type description.
///
/// Identity is the registration, not the name: two builds of the same
/// name are distinct types.
#[derive(Clone)]
pub struct HostType(Arc<TypeEntry>);

impl HostType {
    pub(crate) fn from_entry(entry: TypeEntry) -> Self {
        HostType(Arc::new(entry))
    }

    /// The default value of a value type.
    ///
    /// Primitives default to zero/false, enums to the constant `0`, and
    /// registered value types to their default instance. Reference types
    /// and value types without a default factory yield `None`.
    pub fn default_value(&self) -> Option<HostValue> {
        if let Some(kind) = self.primitive_kind() {
            return Some(zero_of(kind));
        }
        match self.kind {
            TypeKind::Enum => Some(HostValue::Enum {
                ty: self.clone(),
                value: 0,
            }),
            TypeKind::Value => self
                .default_instance
                .as_ref()
                .map(|make| HostValue::Object(HostRef::from_box(self.clone(), make()))),
            _ => None,
        }
    }
}

fn zero_of(kind: PrimitiveKind) -> HostValue {
    match kind {
        PrimitiveKind::Bool => HostValue::Bool(false),
        PrimitiveKind::Int8 => HostValue::Int8(0),
        PrimitiveKind::Int16 => HostValue::Int16(0),
        PrimitiveKind::Int32 => HostValue::Int32(0),
        PrimitiveKind::Int64 => HostValue::Int64(0),
        PrimitiveKind::Uint8 => HostValue::UInt8(0),
        PrimitiveKind::Uint16 => HostValue::UInt16(0),
        PrimitiveKind::Uint32 => HostValue::UInt32(0),
        PrimitiveKind::Uint64 => HostValue::UInt64(0),
        PrimitiveKind::Float => HostValue::Float(0.0),
        PrimitiveKind::Double => HostValue::Double(0.0),
    }
}

impl Deref for HostType {
    type Target = TypeEntry;

    fn deref(&self) -> &TypeEntry {
        &self.0
    }
}

impl PartialEq for HostType {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for HostType {}

impl std::hash::Hash for HostType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostType({})", self.0.name)
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}
