//! The engine-facing entry point.
//!
//! An [`Engine`] owns the interop configuration, a handle to the resolution
//! cache, the overload ranker and the intrinsic prototypes. It exposes the
//! wrapping factories, the conversion entry points, and the member-access
//! hooks an evaluator calls.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::cache::ResolutionCache;
use crate::error::{BridgeError, BridgeResult, ConversionError, InvocationError};
use crate::host::{HostRef, HostType, HostValue, coerce};
use crate::interop::{self, CostRanker, ObjectWrapper, OverloadRanker, TypeReference};
use crate::options::InteropOptions;
use crate::resolver::{MemberScope, ResolvedMember};
use crate::script::{ArrayObject, DescriptorRef, NativeFunction, ObjectRef, PlainObject, ScriptValue};

/// One script engine's view of the host bridge.
///
/// # Example
///
/// ```
/// use hostbridge::{Engine, InteropOptions, ScriptValue};
/// use hostbridge::host::{HostRef, TypeBuilder};
///
/// struct Point {
///     x: i32,
/// }
///
/// let point = TypeBuilder::<Point>::class("Docs.Point")
///     .property_rw("X", |p: &Point| p.x, |p: &mut Point, v: i32| p.x = v)
///     .build();
///
/// let engine = Engine::new(InteropOptions::default().with_isolated_cache(true));
/// let obj = engine.wrap(HostRef::new(point, Point { x: 1 }));
///
/// engine.set_member(&obj, "x", ScriptValue::from(5)).unwrap();
/// let value = engine.get_member(&ScriptValue::Object(obj), "X").unwrap();
/// assert_eq!(value, ScriptValue::from(5));
/// ```
pub struct Engine {
    options: InteropOptions,
    cache: Arc<ResolutionCache>,
    ranker: Box<dyn OverloadRanker>,
    object_prototype: ObjectRef,
    function_prototype: ObjectRef,
    array_prototype: ObjectRef,
}

impl Engine {
    pub fn new(options: InteropOptions) -> Self {
        let cache = if options.isolated_cache {
            Arc::new(ResolutionCache::new())
        } else {
            ResolutionCache::global()
        };
        let object_prototype: ObjectRef = Rc::new(PlainObject::new(None));
        let function_prototype: ObjectRef =
            Rc::new(PlainObject::new(Some(Rc::clone(&object_prototype))));
        let array_prototype: ObjectRef =
            Rc::new(PlainObject::new(Some(Rc::clone(&object_prototype))));
        Self {
            options,
            cache,
            ranker: Box::new(CostRanker::new()),
            object_prototype,
            function_prototype,
            array_prototype,
        }
    }

    /// Replace the overload ranker.
    pub fn with_ranker(mut self, ranker: impl OverloadRanker + 'static) -> Self {
        self.ranker = Box::new(ranker);
        self
    }

    pub fn options(&self) -> &InteropOptions {
        &self.options
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn ranker(&self) -> &dyn OverloadRanker {
        self.ranker.as_ref()
    }

    pub fn object_prototype(&self) -> ObjectRef {
        Rc::clone(&self.object_prototype)
    }

    pub fn function_prototype(&self) -> ObjectRef {
        Rc::clone(&self.function_prototype)
    }

    pub fn array_prototype(&self) -> ObjectRef {
        Rc::clone(&self.array_prototype)
    }

    /// Resolve a normalized member key through this engine's cache.
    pub fn resolve(&self, ty: &HostType, key: &str, scope: MemberScope) -> ResolvedMember {
        self.cache.get_or_resolve(ty, key, scope)
    }

    // === Factories ===

    /// Wrap a host instance as a script object.
    pub fn wrap(&self, target: HostRef) -> ObjectRef {
        Rc::new(ObjectWrapper::new(self, target))
    }

    /// Expose a host type as a callable, constructible script object.
    pub fn type_reference(&self, ty: HostType) -> ObjectRef {
        Rc::new(TypeReference::new(self, ty))
    }

    pub fn new_object(&self) -> ObjectRef {
        Rc::new(PlainObject::new(Some(self.object_prototype())))
    }

    pub fn new_array(&self, elements: Vec<ScriptValue>) -> ObjectRef {
        Rc::new(ArrayObject::new(elements, Some(self.array_prototype())))
    }

    pub fn new_function(
        &self,
        name: impl Into<String>,
        body: impl Fn(&Engine, &ScriptValue, &[ScriptValue]) -> BridgeResult<ScriptValue> + 'static,
    ) -> ObjectRef {
        Rc::new(NativeFunction::new(name, Some(self.function_prototype()), body))
    }

    // === Conversion ===

    /// Convert a script value to a host value, failing on any shape conflict
    /// with `target`.
    pub fn to_host(&self, value: &ScriptValue, target: Option<&HostType>) -> BridgeResult<HostValue> {
        Ok(interop::to_host(value, target)?)
    }

    /// Convert a script value to `target`, coercing where possible.
    pub fn convert_to(&self, value: &ScriptValue, target: &HostType) -> BridgeResult<HostValue> {
        Ok(interop::convert_to(value, target)?)
    }

    pub fn from_host(&self, value: HostValue) -> ScriptValue {
        interop::from_host(self, value)
    }

    pub fn coerce(&self, value: &HostValue, target: &HostType) -> BridgeResult<HostValue> {
        Ok(coerce(value, target)?)
    }

    // === Evaluator hooks ===

    /// `base[name]`.
    pub fn get_member(&self, base: &ScriptValue, name: &str) -> BridgeResult<ScriptValue> {
        match base {
            ScriptValue::Object(obj) => obj.get(self, name),
            ScriptValue::Undefined | ScriptValue::Null => {
                Err(ConversionError::incompatible(base.type_name(), "object").into())
            }
            _ => Ok(ScriptValue::Undefined),
        }
    }

    /// `base[name] = value`. Failed writes raise only in strict mode.
    pub fn set_member(&self, base: &ObjectRef, name: &str, value: ScriptValue) -> BridgeResult<()> {
        base.put(self, name, value, self.options.strict)
    }

    /// `delete base[name]`.
    pub fn delete_member(&self, base: &ObjectRef, name: &str) -> BridgeResult<bool> {
        base.delete(self, name, self.options.strict)
    }

    /// `Object.defineProperty(base, name, ...)`.
    pub fn define_property(
        &self,
        base: &ObjectRef,
        name: &str,
        descriptor: DescriptorRef,
    ) -> BridgeResult<bool> {
        base.define_own_property(self, name, descriptor, true)
    }

    /// `callee.call(this, ...args)`.
    pub fn call(
        &self,
        callee: &ScriptValue,
        this: &ScriptValue,
        args: &[ScriptValue],
    ) -> BridgeResult<ScriptValue> {
        match callee {
            ScriptValue::Object(f) if f.is_callable() => f.call(self, this, args),
            other => Err(InvocationError::NotCallable {
                what: other.type_name().to_string(),
            }
            .into()),
        }
    }

    /// `base.name(...args)`.
    pub fn call_method(
        &self,
        base: &ScriptValue,
        name: &str,
        args: &[ScriptValue],
    ) -> BridgeResult<ScriptValue> {
        let callee = self.get_member(base, name)?;
        match callee {
            ScriptValue::Object(ref f) if f.is_callable() => f.call(self, base, args),
            _ => Err(InvocationError::NotCallable {
                what: name.to_string(),
            }
            .into()),
        }
    }

    /// `new callee(...args)`.
    pub fn construct(&self, callee: &ScriptValue, args: &[ScriptValue]) -> BridgeResult<ScriptValue> {
        match callee {
            ScriptValue::Object(f) => f.construct(self, args),
            other => Err(InvocationError::NotConstructor {
                what: other.type_name().to_string(),
            }
            .into()),
        }
    }

    /// `value instanceof callee`.
    pub fn instance_of(&self, value: &ScriptValue, callee: &ScriptValue) -> BridgeResult<bool> {
        match callee {
            ScriptValue::Object(f) => f.has_instance(self, value),
            other => Err(InvocationError::NotCallable {
                what: other.type_name().to_string(),
            }
            .into()),
        }
    }

    /// Longest sequence [`array_like_values`](Self::array_like_values) will
    /// materialize.
    pub const MAX_ARRAY_LIKE_LENGTH: usize = 1 << 24;

    /// Elements of an array-like object, read through `length` and the
    /// index names `"0".."length-1"`.
    ///
    /// A missing, negative or non-finite `length` reads as zero; one above
    /// [`MAX_ARRAY_LIKE_LENGTH`](Self::MAX_ARRAY_LIKE_LENGTH) is rejected.
    pub fn array_like_values(&self, obj: &ObjectRef) -> BridgeResult<Vec<ScriptValue>> {
        let not_array_like = || -> BridgeError {
            InvocationError::NotArrayLike {
                what: obj.class_name().to_string(),
            }
            .into()
        };
        if !obj.is_array_like() {
            return Err(not_array_like());
        }
        let length = obj
            .get(self, "length")?
            .as_number()
            .filter(|n| n.is_finite() && *n > 0.0)
            .unwrap_or(0.0);
        if length > Self::MAX_ARRAY_LIKE_LENGTH as f64 {
            return Err(not_array_like());
        }
        (0..length as usize).map(|i| obj.get(self, &i.to_string())).collect()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(InteropOptions::default())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("cached_members", &self.cache.len())
            .finish_non_exhaustive()
    }
}
