//! Descriptor bound to a host field.

use std::sync::Arc;

use crate::engine::Engine;
use crate::error::BridgeResult;
use crate::host::{FieldEntry, HostRef, guarded};
use crate::script::{Descriptor, DescriptorRef, PropertyFlags, ScriptValue};

use super::converter::{convert_to, from_host};

/// Reads and writes one field of one instance (or a static field).
///
/// Write conversion failures are errors; nothing is remembered.
pub struct FieldBinding {
    field: Arc<FieldEntry>,
    target: Option<HostRef>,
}

impl FieldBinding {
    pub fn new(field: Arc<FieldEntry>, target: Option<HostRef>) -> Self {
        Self { field, target }
    }

    pub fn into_ref(self) -> DescriptorRef {
        std::rc::Rc::new(self)
    }
}

impl Descriptor for FieldBinding {
    fn flags(&self) -> PropertyFlags {
        if self.field.is_writable() {
            PropertyFlags::WRITABLE | PropertyFlags::ENUMERABLE
        } else {
            PropertyFlags::ENUMERABLE
        }
    }

    fn get(&self, engine: &Engine) -> BridgeResult<ScriptValue> {
        let value = guarded(|| (self.field.get)(self.target.as_ref()))?;
        Ok(from_host(engine, value))
    }

    fn set(&self, _engine: &Engine, value: ScriptValue) -> BridgeResult<()> {
        let Some(set) = &self.field.set else {
            return Ok(());
        };
        let value = convert_to(&value, &self.field.ty)?;
        guarded(|| set(self.target.as_ref(), value))?;
        Ok(())
    }
}
