//! Member resolution against host types.
//!
//! [`resolve`] maps a (type, normalized name) pair to the member it denotes.
//! Resolution is pure: the same inputs always produce the same result, which
//! is what allows [`ResolutionCache`](crate::cache::ResolutionCache) to
//! memoize it without locking.
//!
//! Instance lookup order, first match wins:
//!
//! 1. integer names skip every named step
//! 2. property (instance or static), most derived first
//! 3. field
//! 4. method group, collected across the base chain
//! 5. indexer
//! 6. exactly one explicit interface property
//! 7. explicit interface method group
//! 8. exactly one explicit interface indexer
//!
//! Enum types resolve only their constants.

use std::sync::Arc;

use crate::host::{FieldEntry, HostType, IndexerEntry, MethodEntry, PropertyEntry, TypeEntry};
use crate::names::is_index_name;

/// Which member set a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberScope {
    /// Members visible through an instance wrapper.
    Instance,
    /// Static members visible through a type reference.
    Static,
}

/// All overloads sharing one name.
#[derive(Debug, Clone)]
pub struct MethodGroup {
    pub owner: HostType,
    pub name: String,
    pub methods: Vec<Arc<MethodEntry>>,
}

/// The outcome of resolving a name against a host type.
#[derive(Debug, Clone)]
pub enum ResolvedMember {
    Field(Arc<FieldEntry>),
    Property(Arc<PropertyEntry>),
    MethodGroup(MethodGroup),
    Indexer(Arc<IndexerEntry>),
    EnumConstant(i64),
    Undefined,
}

impl ResolvedMember {
    pub fn is_undefined(&self) -> bool {
        matches!(self, ResolvedMember::Undefined)
    }

    /// Short tag for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ResolvedMember::Field(_) => "field",
            ResolvedMember::Property(_) => "property",
            ResolvedMember::MethodGroup(_) => "method group",
            ResolvedMember::Indexer(_) => "indexer",
            ResolvedMember::EnumConstant(_) => "enum constant",
            ResolvedMember::Undefined => "undefined",
        }
    }
}

/// Resolve a normalized member key against `ty`.
///
/// Never fails; a name that matches nothing resolves to
/// [`ResolvedMember::Undefined`].
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn resolve(ty: &HostType, key: &str, scope: MemberScope) -> ResolvedMember {
    if ty.is_enum() {
        return ty
            .enum_value(key)
            .map_or(ResolvedMember::Undefined, ResolvedMember::EnumConstant);
    }
    let resolved = match scope {
        MemberScope::Instance => resolve_instance(ty, key),
        MemberScope::Static => resolve_static(ty, key),
    };
    tracing::debug!(
        ty = ty.name(),
        key,
        ?scope,
        kind = resolved.kind_name(),
        "resolved member"
    );
    resolved
}

fn resolve_instance(ty: &HostType, key: &str) -> ResolvedMember {
    if !is_index_name(key) {
        if let Some(p) = find(ty, |t| &t.properties, |p| p.key == key) {
            return ResolvedMember::Property(p);
        }
        if let Some(f) = find(ty, |t| &t.fields, |f| f.key == key) {
            return ResolvedMember::Field(f);
        }
        let methods = collect_methods(ty, |t| &t.methods, key);
        if !methods.is_empty() {
            return method_group(ty, methods);
        }
    }

    if let Some(i) = find(ty, |t| &t.indexers, |_| true) {
        return ResolvedMember::Indexer(i);
    }

    if !is_index_name(key) {
        if let Some(p) = single(ty, |t| &t.explicit_properties, |p| p.key == key) {
            return ResolvedMember::Property(p);
        }
        let methods = collect_methods(ty, |t| &t.explicit_methods, key);
        if !methods.is_empty() {
            return method_group(ty, methods);
        }
    }

    if let Some(i) = single(ty, |t| &t.explicit_indexers, |_| true) {
        return ResolvedMember::Indexer(i);
    }

    ResolvedMember::Undefined
}

fn resolve_static(ty: &HostType, key: &str) -> ResolvedMember {
    if is_index_name(key) {
        return ResolvedMember::Undefined;
    }
    if let Some(p) = ty.properties.iter().find(|p| p.is_static && p.key == key) {
        return ResolvedMember::Property(Arc::clone(p));
    }
    if let Some(f) = ty.fields.iter().find(|f| f.is_static && f.key == key) {
        return ResolvedMember::Field(Arc::clone(f));
    }
    let methods: Vec<_> = ty
        .methods
        .iter()
        .filter(|m| m.is_static && m.key == key)
        .cloned()
        .collect();
    if !methods.is_empty() {
        return method_group(ty, methods);
    }
    ResolvedMember::Undefined
}

/// First match along the base chain, most derived first.
fn find<M>(
    ty: &HostType,
    members: impl Fn(&TypeEntry) -> &Vec<Arc<M>>,
    pred: impl Fn(&M) -> bool,
) -> Option<Arc<M>> {
    ty.ancestry()
        .flat_map(|t| members(t).iter())
        .find(|m| pred(m))
        .cloned()
}

/// The only match along the base chain; ambiguity yields `None`.
fn single<M>(
    ty: &HostType,
    members: impl Fn(&TypeEntry) -> &Vec<Arc<M>>,
    pred: impl Fn(&M) -> bool,
) -> Option<Arc<M>> {
    let mut matches = ty
        .ancestry()
        .flat_map(|t| members(t).iter())
        .filter(|m| pred(m));
    let first = matches.next()?;
    if matches.next().is_some() {
        tracing::debug!(ty = ty.name(), "ambiguous explicit interface member");
        return None;
    }
    Some(Arc::clone(first))
}

/// Overloads named `key`, hiding base overloads with identical parameters.
fn collect_methods(
    ty: &HostType,
    members: impl Fn(&TypeEntry) -> &Vec<Arc<MethodEntry>>,
    key: &str,
) -> Vec<Arc<MethodEntry>> {
    let mut collected: Vec<Arc<MethodEntry>> = Vec::new();
    for method in ty
        .ancestry()
        .flat_map(|t| members(t).iter())
        .filter(|m| m.key == key)
    {
        if !collected.iter().any(|c| c.same_params(method)) {
            collected.push(Arc::clone(method));
        }
    }
    collected
}

fn method_group(ty: &HostType, methods: Vec<Arc<MethodEntry>>) -> ResolvedMember {
    let name = methods
        .first()
        .map(|m| m.name.clone())
        .unwrap_or_default();
    ResolvedMember::MethodGroup(MethodGroup {
        owner: ty.clone(),
        name,
        methods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostValue, ParamEntry, TypeBuilder, primitive_type};
    use crate::primitive_kind::PrimitiveKind;

    struct Base;
    struct Derived;

    fn int() -> HostType {
        primitive_type(PrimitiveKind::Int32)
    }

    fn sample() -> (HostType, HostType) {
        let base = TypeBuilder::<Base>::class("ResolverTests.Base")
            .property("Name", |_: &Base| "base".to_string())
            .method("Run", Vec::<ParamEntry>::new(), |_| Ok(HostValue::Int32(1)))
            .method("Run", [int()], |_| Ok(HostValue::Int32(2)))
            .indexer(|_: &Base, i: i32| Ok(i))
            .build();
        let derived = TypeBuilder::<Derived>::class("ResolverTests.Derived")
            .base(&base)
            .field("Count", |_: &Derived| 0i32, |_: &mut Derived, _: i32| {})
            .method("Run", Vec::<ParamEntry>::new(), |_| Ok(HostValue::Int32(3)))
            .static_method("Make", Vec::<ParamEntry>::new(), |_| Ok(HostValue::Null))
            .build();
        (base, derived)
    }

    #[test]
    fn inherited_members_are_visible() {
        let (_, derived) = sample();
        assert!(matches!(
            resolve(&derived, "name", MemberScope::Instance),
            ResolvedMember::Property(_)
        ));
        assert!(matches!(
            resolve(&derived, "count", MemberScope::Instance),
            ResolvedMember::Field(_)
        ));
    }

    #[test]
    fn method_groups_hide_identical_base_overloads() {
        let (_, derived) = sample();
        let ResolvedMember::MethodGroup(group) = resolve(&derived, "run", MemberScope::Instance)
        else {
            panic!("expected method group");
        };
        assert_eq!(group.methods.len(), 2);
        assert_eq!(group.name, "Run");
        assert!(group.methods[0].params.is_empty());
        assert_eq!(group.methods[1].params.len(), 1);
    }

    #[test]
    fn integer_names_go_to_indexers() {
        let (base, _) = sample();
        assert!(matches!(
            resolve(&base, "0", MemberScope::Instance),
            ResolvedMember::Indexer(_)
        ));
        assert!(matches!(
            resolve(&base, "missing", MemberScope::Instance),
            ResolvedMember::Indexer(_)
        ));
    }

    #[test]
    fn static_scope_sees_own_statics_only() {
        let (_, derived) = sample();
        assert!(matches!(
            resolve(&derived, "make", MemberScope::Static),
            ResolvedMember::MethodGroup(_)
        ));
        assert!(resolve(&derived, "run", MemberScope::Static).is_undefined());
        assert!(resolve(&derived, "name", MemberScope::Static).is_undefined());
    }

    #[test]
    fn enums_resolve_constants_only() {
        let color = TypeBuilder::<()>::enumeration("ResolverTests.Color")
            .constant("Red", 0)
            .build();
        assert!(matches!(
            resolve(&color, "red", MemberScope::Static),
            ResolvedMember::EnumConstant(0)
        ));
        assert!(resolve(&color, "blue", MemberScope::Instance).is_undefined());
    }

    #[test]
    fn explicit_members_require_a_single_match() {
        let a = TypeBuilder::<()>::interface("ResolverTests.IA").build();
        let b = TypeBuilder::<()>::interface("ResolverTests.IB").build();
        let only = TypeBuilder::<Base>::class("ResolverTests.OneExplicit")
            .explicit_property(&a, "Label", |_: &Base| 1i32)
            .build();
        let both = TypeBuilder::<Base>::class("ResolverTests.TwoExplicit")
            .explicit_property(&a, "Label", |_: &Base| 1i32)
            .explicit_property(&b, "Label", |_: &Base| 2i32)
            .build();

        assert!(matches!(
            resolve(&only, "label", MemberScope::Instance),
            ResolvedMember::Property(_)
        ));
        assert!(resolve(&both, "label", MemberScope::Instance).is_undefined());
    }

    #[test]
    fn resolution_is_repeatable() {
        let (_, derived) = sample();
        let first = resolve(&derived, "count", MemberScope::Instance);
        let second = resolve(&derived, "count", MemberScope::Instance);
        match (first, second) {
            (ResolvedMember::Field(a), ResolvedMember::Field(b)) => assert!(Arc::ptr_eq(&a, &b)),
            other => panic!("unexpected {:?}", other),
        }
    }
}
