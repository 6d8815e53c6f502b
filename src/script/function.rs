//! Script functions backed by Rust closures.

use crate::engine::Engine;
use crate::error::BridgeResult;

use super::object::{ObjectRef, ScriptObject};
use super::property_table::PropertyTable;
use super::value::ScriptValue;

type NativeBody = Box<dyn Fn(&Engine, &ScriptValue, &[ScriptValue]) -> BridgeResult<ScriptValue>>;

/// A callable script object whose body is a Rust closure.
pub struct NativeFunction {
    name: String,
    table: PropertyTable,
    prototype: Option<ObjectRef>,
    body: NativeBody,
}

impl NativeFunction {
    pub fn new(
        name: impl Into<String>,
        prototype: Option<ObjectRef>,
        body: impl Fn(&Engine, &ScriptValue, &[ScriptValue]) -> BridgeResult<ScriptValue> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            table: PropertyTable::new(),
            prototype,
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ScriptObject for NativeFunction {
    fn class_name(&self) -> &str {
        "Function"
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

    fn call(&self, engine: &Engine, this: &ScriptValue, args: &[ScriptValue]) -> BridgeResult<ScriptValue> {
        (self.body)(engine, this, args)
    }
}
