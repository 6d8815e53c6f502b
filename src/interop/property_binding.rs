//! Descriptor bound to a host property.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::engine::Engine;
use crate::error::BridgeResult;
use crate::host::{HostRef, PropertyEntry, guarded};
use crate::script::{Descriptor, DescriptorRef, PropertyFlags, ScriptValue};

use super::converter::{convert_to, from_host};

/// Reads and writes one property of one instance (or a static property).
///
/// Unlike [`FieldBinding`](super::FieldBinding), a write whose value cannot
/// be converted to the property type is not an error: the script value is
/// kept as a shadow and returned by later reads until the next successful
/// write. The host property is left untouched.
pub struct PropertyBinding {
    property: Arc<PropertyEntry>,
    target: Option<HostRef>,
    shadow: RefCell<Option<ScriptValue>>,
}

impl PropertyBinding {
    pub fn new(property: Arc<PropertyEntry>, target: Option<HostRef>) -> Self {
        Self {
            property,
            target,
            shadow: RefCell::new(None),
        }
    }

    pub fn into_ref(self) -> DescriptorRef {
        Rc::new(self)
    }

    /// Check if a shadowed value is currently hiding the host property.
    pub fn is_shadowed(&self) -> bool {
        self.shadow.borrow().is_some()
    }
}

impl Descriptor for PropertyBinding {
    fn flags(&self) -> PropertyFlags {
        if self.property.is_writable() {
            PropertyFlags::WRITABLE | PropertyFlags::ENUMERABLE
        } else {
            PropertyFlags::ENUMERABLE
        }
    }

    fn get(&self, engine: &Engine) -> BridgeResult<ScriptValue> {
        if let Some(shadow) = self.shadow.borrow().as_ref() {
            return Ok(shadow.clone());
        }
        let Some(get) = &self.property.get else {
            return Ok(ScriptValue::Undefined);
        };
        let value = guarded(|| get(self.target.as_ref()))?;
        Ok(from_host(engine, value))
    }

    fn set(&self, _engine: &Engine, value: ScriptValue) -> BridgeResult<()> {
        let Some(set) = &self.property.set else {
            return Ok(());
        };
        match convert_to(&value, &self.property.ty) {
            Ok(converted) => {
                guarded(|| set(self.target.as_ref(), converted))?;
                self.shadow.replace(None);
            }
            Err(error) => {
                tracing::debug!(
                    property = %self.property.name,
                    %error,
                    "property write shadowed after failed conversion"
                );
                self.shadow.replace(Some(value));
            }
        }
        Ok(())
    }
}
