//! Host closure storage and the guarded call boundary.
//!
//! Every host member is a type-erased closure. Closures are `Send + Sync` so
//! resolved members can live in the process-wide resolution cache; the
//! values they exchange stay on the engine thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::engine::Engine;
use crate::error::HostError;

use super::convert::FromHost;
use super::value::{HostRef, HostValue};

/// Reads a property or field. Static members receive `None`.
pub type GetterFn = Arc<dyn Fn(Option<&HostRef>) -> Result<HostValue, HostError> + Send + Sync>;

/// Writes a property or field. Static members receive `None`.
pub type SetterFn =
    Arc<dyn Fn(Option<&HostRef>, HostValue) -> Result<(), HostError> + Send + Sync>;

/// Invokes a method overload.
pub type MethodFn = Arc<dyn Fn(&mut HostCall<'_>) -> Result<HostValue, HostError> + Send + Sync>;

/// Invokes a constructor, producing the new instance's storage.
pub type CtorFn =
    Arc<dyn Fn(&mut HostCall<'_>) -> Result<Box<dyn Any>, HostError> + Send + Sync>;

/// Reads an indexer slot.
pub type IndexGetFn =
    Arc<dyn Fn(&HostRef, &HostValue) -> Result<HostValue, HostError> + Send + Sync>;

/// Writes an indexer slot.
pub type IndexSetFn =
    Arc<dyn Fn(&HostRef, &HostValue, HostValue) -> Result<(), HostError> + Send + Sync>;

/// Live element count of a countable collection.
pub type CountFn = Arc<dyn Fn(&HostRef) -> Result<usize, HostError> + Send + Sync>;

/// Default instance of a value type.
pub type DefaultInstanceFn = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;

/// Default for an optional parameter.
pub type DefaultArgFn = Arc<dyn Fn() -> HostValue + Send + Sync>;

/// Call context handed to method and constructor closures.
///
/// Arguments have already been converted to the overload's declared
/// parameter types.
pub struct HostCall<'a> {
    engine: &'a Engine,
    this: Option<&'a HostRef>,
    args: Vec<HostValue>,
}

impl<'a> HostCall<'a> {
    pub fn new(engine: &'a Engine, this: Option<&'a HostRef>, args: Vec<HostValue>) -> Self {
        Self { engine, this, args }
    }

    /// The engine driving this call, for reentrant script calls.
    pub fn engine(&self) -> &'a Engine {
        self.engine
    }

    /// The bound instance, if this is an instance member.
    pub fn this(&self) -> Option<&'a HostRef> {
        self.this
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    pub fn args(&self) -> &[HostValue] {
        &self.args
    }

    /// Borrow a raw argument.
    pub fn arg_value(&self, index: usize) -> Result<&HostValue, HostError> {
        self.args
            .get(index)
            .ok_or(HostError::MissingArgument { index })
    }

    /// Extract a typed argument.
    pub fn arg<T: FromHost>(&self, index: usize) -> Result<T, HostError> {
        Ok(T::from_host(self.arg_value(index)?)?)
    }

    /// Take ownership of an argument, leaving undefined in its place.
    pub fn take_arg(&mut self, index: usize) -> Result<HostValue, HostError> {
        self.args
            .get_mut(index)
            .map(std::mem::take)
            .ok_or(HostError::MissingArgument { index })
    }

    /// Borrow the bound instance as `T`.
    pub fn with_this<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, HostError> {
        self.require_this()?.with(f)
    }

    /// Mutably borrow the bound instance as `T`.
    pub fn with_this_mut<T: 'static, R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, HostError> {
        self.require_this()?.with_mut(f)
    }

    fn require_this(&self) -> Result<&'a HostRef, HostError> {
        self.this.ok_or_else(|| HostError::TargetMismatch {
            expected: "instance".to_string(),
            actual: "no instance".to_string(),
        })
    }
}

/// Run host code, containing panics.
///
/// A panic inside `f` becomes [`HostError::Panicked`]; it never unwinds
/// into the engine.
pub fn guarded<R>(f: impl FnOnce() -> Result<R, HostError>) -> Result<R, HostError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            tracing::debug!(%message, "host panic contained at call boundary");
            Err(HostError::Panicked(message))
        }
    }
}
