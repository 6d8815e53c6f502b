//! Descriptor bound to one key of a host indexer.

use std::rc::Rc;
use std::sync::Arc;

use crate::engine::Engine;
use crate::error::{BridgeResult, HostError};
use crate::host::{HostRef, HostValue, IndexerEntry, coerce, guarded};
use crate::script::{Descriptor, DescriptorRef, PropertyFlags, ScriptValue};

use super::converter::{convert_to, from_host};

/// Reads and writes `target[key]`.
///
/// The key is the name exactly as the caller spelled it; it is coerced to
/// the indexer's key type on every access.
pub struct IndexBinding {
    indexer: Arc<IndexerEntry>,
    target: HostRef,
    key: String,
}

impl IndexBinding {
    pub fn new(indexer: Arc<IndexerEntry>, target: HostRef, key: impl Into<String>) -> Self {
        Self {
            indexer,
            target,
            key: key.into(),
        }
    }

    pub fn into_ref(self) -> DescriptorRef {
        Rc::new(self)
    }

    fn host_key(&self) -> Result<HostValue, crate::error::ConversionError> {
        coerce(&HostValue::String(self.key.clone()), &self.indexer.key_type)
    }
}

impl Descriptor for IndexBinding {
    fn flags(&self) -> PropertyFlags {
        if self.indexer.is_writable() {
            PropertyFlags::WRITABLE | PropertyFlags::ENUMERABLE
        } else {
            PropertyFlags::ENUMERABLE
        }
    }

    fn get(&self, engine: &Engine) -> BridgeResult<ScriptValue> {
        let Some(get) = &self.indexer.get else {
            return Ok(ScriptValue::Undefined);
        };
        let Ok(key) = self.host_key() else {
            return Ok(ScriptValue::Undefined);
        };
        match guarded(|| get(&self.target, &key)) {
            Ok(value) => Ok(from_host(engine, value)),
            Err(HostError::KeyNotFound(_)) => Ok(ScriptValue::Undefined),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, _engine: &Engine, value: ScriptValue) -> BridgeResult<()> {
        let Some(set) = &self.indexer.set else {
            return Ok(());
        };
        let key = self.host_key()?;
        let value = convert_to(&value, &self.indexer.value_type)?;
        guarded(|| set(&self.target, &key, value))?;
        Ok(())
    }
}
