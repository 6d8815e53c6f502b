//! Callable script function over a host method group.

use crate::engine::Engine;
use crate::error::{BridgeError, BridgeResult, InvocationError};
use crate::host::{HostCall, HostRef, ParamEntry, guarded};
use crate::resolver::MethodGroup;
use crate::script::{ObjectRef, PropertyTable, ScriptObject, ScriptValue};

use super::converter::from_host;
use super::overload::convert_arguments;

/// A method group bound to an instance (or to nothing, for statics).
pub struct MethodGroupFunction {
    group: MethodGroup,
    target: Option<HostRef>,
    table: PropertyTable,
    prototype: Option<ObjectRef>,
}

impl MethodGroupFunction {
    pub fn new(engine: &Engine, group: MethodGroup, target: Option<HostRef>) -> Self {
        Self {
            group,
            target,
            table: PropertyTable::new(),
            prototype: Some(engine.function_prototype()),
        }
    }

    pub fn group(&self) -> &MethodGroup {
        &self.group
    }
}

impl ScriptObject for MethodGroupFunction {
    fn class_name(&self) -> &str {
        &self.group.name
    }

    fn properties(&self) -> &PropertyTable {
        &self.table
    }

    fn prototype(&self) -> Option<ObjectRef> {
        self.prototype.clone()
    }

    fn is_callable(&self) -> bool {
        true
    }

    fn call(&self, engine: &Engine, _this: &ScriptValue, args: &[ScriptValue]) -> BridgeResult<ScriptValue> {
        invoke(engine, &self.group, self.target.as_ref(), args)
    }
}

/// Try each overload best-first; the first success wins.
#[cfg_attr(feature = "profiling", profiling::function)]
fn invoke(
    engine: &Engine,
    group: &MethodGroup,
    target: Option<&HostRef>,
    args: &[ScriptValue],
) -> BridgeResult<ScriptValue> {
    let candidates: Vec<&[ParamEntry]> = group.methods.iter().map(|m| m.params.as_slice()).collect();

    for index in engine.ranker().rank(&candidates, args) {
        let Some(method) = group.methods.get(index) else {
            continue;
        };
        let attempt = convert_arguments(&method.params, args).and_then(|host_args| {
            let mut call = HostCall::new(engine, target, host_args);
            guarded(|| (method.func)(&mut call)).map_err(BridgeError::from)
        });
        match attempt {
            Ok(value) => return Ok(from_host(engine, value)),
            Err(error) => tracing::debug!(
                method = %group.name,
                candidate = index,
                %error,
                "method overload rejected"
            ),
        }
    }

    Err(InvocationError::NoMatchingMethod {
        type_name: group.owner.name().to_string(),
        name: group.name.clone(),
    }
    .into())
}
