//! Member entries of a host type.
//!
//! Each entry keeps the declared name for diagnostics and the normalized key
//! used for lookup.

use std::fmt;

use crate::names::normalize;
use crate::type_hash::TypeHash;

use super::native_fn::{
    CtorFn, DefaultArgFn, GetterFn, IndexGetFn, IndexSetFn, MethodFn, SetterFn,
};
use super::types::HostType;
use super::value::HostValue;

/// A declared parameter of a method or constructor.
#[derive(Clone)]
pub struct ParamEntry {
    pub ty: HostType,
    /// Default used when the argument is omitted. `None` means required.
    pub default: Option<DefaultArgFn>,
}

impl ParamEntry {
    /// A required parameter.
    pub fn new(ty: HostType) -> Self {
        Self { ty, default: None }
    }

    /// An optional parameter with a default.
    pub fn optional(ty: HostType, default: impl Fn() -> HostValue + Send + Sync + 'static) -> Self {
        Self {
            ty,
            default: Some(std::sync::Arc::new(default)),
        }
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

impl From<HostType> for ParamEntry {
    fn from(ty: HostType) -> Self {
        ParamEntry::new(ty)
    }
}

impl fmt::Debug for ParamEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_optional() {
            write!(f, "{}?", self.ty.name())
        } else {
            write!(f, "{}", self.ty.name())
        }
    }
}

/// Number of arguments a parameter list requires.
pub(crate) fn required_arity(params: &[ParamEntry]) -> usize {
    params.iter().filter(|p| !p.is_optional()).count()
}

/// A data member stored directly on the instance (or the type, if static).
pub struct FieldEntry {
    pub name: String,
    pub(crate) key: String,
    pub ty: HostType,
    pub is_static: bool,
    pub(crate) get: GetterFn,
    /// `None` for read-only fields.
    pub(crate) set: Option<SetterFn>,
}

impl FieldEntry {
    pub fn new(name: impl Into<String>, ty: HostType, get: GetterFn, set: Option<SetterFn>) -> Self {
        let name = name.into();
        Self {
            key: normalize(&name).into_owned(),
            name,
            ty,
            is_static: false,
            get,
            set,
        }
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }
}

impl fmt::Debug for FieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEntry")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("is_static", &self.is_static)
            .field("writable", &self.is_writable())
            .finish()
    }
}

/// An accessor-backed member.
pub struct PropertyEntry {
    pub name: String,
    pub(crate) key: String,
    pub ty: HostType,
    pub is_static: bool,
    pub(crate) get: Option<GetterFn>,
    pub(crate) set: Option<SetterFn>,
    /// Interface this property explicitly implements, if any.
    pub interface: Option<HostType>,
}

impl PropertyEntry {
    pub fn new(
        name: impl Into<String>,
        ty: HostType,
        get: Option<GetterFn>,
        set: Option<SetterFn>,
    ) -> Self {
        let name = name.into();
        Self {
            key: normalize(&name).into_owned(),
            name,
            ty,
            is_static: false,
            get,
            set,
            interface: None,
        }
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn for_interface(mut self, interface: &HostType) -> Self {
        self.interface = Some(interface.clone());
        self
    }

    pub fn is_readable(&self) -> bool {
        self.get.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }
}

impl fmt::Debug for PropertyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyEntry")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("is_static", &self.is_static)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .field("interface", &self.interface.as_ref().map(|i| i.name()))
            .finish()
    }
}

/// One overload of a method.
pub struct MethodEntry {
    pub name: String,
    pub(crate) key: String,
    /// Signature hash over owner, name and parameter types.
    pub signature: TypeHash,
    pub params: Vec<ParamEntry>,
    pub is_static: bool,
    pub(crate) func: MethodFn,
    pub interface: Option<HostType>,
}

impl MethodEntry {
    pub fn new(
        owner: TypeHash,
        name: impl Into<String>,
        params: Vec<ParamEntry>,
        func: MethodFn,
    ) -> Self {
        let name = name.into();
        let param_hashes: Vec<TypeHash> = params.iter().map(|p| p.ty.type_hash()).collect();
        Self {
            key: normalize(&name).into_owned(),
            signature: TypeHash::from_signature(owner, &name, &param_hashes),
            name,
            params,
            is_static: false,
            func,
            interface: None,
        }
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn for_interface(mut self, interface: &HostType) -> Self {
        self.interface = Some(interface.clone());
        self
    }

    /// Check whether two overloads take the same parameter types.
    pub(crate) fn same_params(&self, other: &MethodEntry) -> bool {
        self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.ty == b.ty)
    }
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("is_static", &self.is_static)
            .finish_non_exhaustive()
    }
}

/// One public instance constructor.
pub struct ConstructorEntry {
    pub signature: TypeHash,
    pub params: Vec<ParamEntry>,
    pub(crate) func: CtorFn,
}

impl ConstructorEntry {
    pub fn new(owner: TypeHash, params: Vec<ParamEntry>, func: CtorFn) -> Self {
        let param_hashes: Vec<TypeHash> = params.iter().map(|p| p.ty.type_hash()).collect();
        Self {
            signature: TypeHash::from_signature(owner, ".ctor", &param_hashes),
            params,
            func,
        }
    }
}

impl fmt::Debug for ConstructorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorEntry")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// A property with an index parameter.
pub struct IndexerEntry {
    pub key_type: HostType,
    pub value_type: HostType,
    pub(crate) get: Option<IndexGetFn>,
    pub(crate) set: Option<IndexSetFn>,
    pub interface: Option<HostType>,
}

impl IndexerEntry {
    pub fn new(
        key_type: HostType,
        value_type: HostType,
        get: Option<IndexGetFn>,
        set: Option<IndexSetFn>,
    ) -> Self {
        Self {
            key_type,
            value_type,
            get,
            set,
            interface: None,
        }
    }

    pub fn for_interface(mut self, interface: &HostType) -> Self {
        self.interface = Some(interface.clone());
        self
    }

    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }
}

impl fmt::Debug for IndexerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexerEntry")
            .field("key_type", &self.key_type)
            .field("value_type", &self.value_type)
            .field("writable", &self.is_writable())
            .finish_non_exhaustive()
    }
}

/// A named enum constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub(crate) key: String,
    pub value: i64,
}

impl EnumValue {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        let name = name.into();
        Self {
            key: normalize(&name).into_owned(),
            name,
            value,
        }
    }
}
