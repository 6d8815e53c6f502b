//! Property descriptors.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::engine::Engine;
use crate::error::BridgeResult;

use super::value::ScriptValue;

bitflags! {
    /// Attributes of a property slot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        const WRITABLE = 1 << 0;
        const ENUMERABLE = 1 << 1;
        const CONFIGURABLE = 1 << 2;
    }
}

impl PropertyFlags {
    /// No attributes: read-only, hidden, permanent.
    pub const NONE: PropertyFlags = PropertyFlags::empty();
}

/// A named, attributed binding backing one property of a script object.
pub trait Descriptor {
    fn flags(&self) -> PropertyFlags;

    fn get(&self, engine: &Engine) -> BridgeResult<ScriptValue>;

    /// Store a value. Callers check writability first.
    fn set(&self, engine: &Engine, value: ScriptValue) -> BridgeResult<()>;

    /// True only for the undefined marker returned for unresolved or
    /// deleted names.
    fn is_undefined_marker(&self) -> bool {
        false
    }

    fn is_writable(&self) -> bool {
        self.flags().contains(PropertyFlags::WRITABLE)
    }

    fn is_enumerable(&self) -> bool {
        self.flags().contains(PropertyFlags::ENUMERABLE)
    }

    fn is_configurable(&self) -> bool {
        self.flags().contains(PropertyFlags::CONFIGURABLE)
    }
}

/// Shared handle to a descriptor.
pub type DescriptorRef = Rc<dyn Descriptor>;

/// A plain value slot.
pub struct DataDescriptor {
    value: RefCell<ScriptValue>,
    flags: PropertyFlags,
}

impl DataDescriptor {
    pub fn new(value: ScriptValue, flags: PropertyFlags) -> Self {
        Self {
            value: RefCell::new(value),
            flags,
        }
    }

    /// A writable, enumerable, configurable slot.
    pub fn plain(value: ScriptValue) -> Self {
        Self::new(value, PropertyFlags::all())
    }

    pub fn into_ref(self) -> DescriptorRef {
        Rc::new(self)
    }
}

impl Descriptor for DataDescriptor {
    fn flags(&self) -> PropertyFlags {
        self.flags
    }

    fn get(&self, _engine: &Engine) -> BridgeResult<ScriptValue> {
        Ok(self.value.borrow().clone())
    }

    fn set(&self, _engine: &Engine, value: ScriptValue) -> BridgeResult<()> {
        *self.value.borrow_mut() = value;
        Ok(())
    }
}

impl fmt::Debug for DataDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataDescriptor")
            .field("value", &*self.value.borrow())
            .field("flags", &self.flags)
            .finish()
    }
}

type AccessorGet = Box<dyn Fn(&Engine) -> BridgeResult<ScriptValue>>;

/// A read-only slot whose value is recomputed on every read.
pub struct AccessorDescriptor {
    getter: AccessorGet,
    flags: PropertyFlags,
}

impl AccessorDescriptor {
    pub fn new(
        getter: impl Fn(&Engine) -> BridgeResult<ScriptValue> + 'static,
        flags: PropertyFlags,
    ) -> Self {
        Self {
            getter: Box::new(getter),
            flags: flags - PropertyFlags::WRITABLE,
        }
    }
}

impl Descriptor for AccessorDescriptor {
    fn flags(&self) -> PropertyFlags {
        self.flags
    }

    fn get(&self, engine: &Engine) -> BridgeResult<ScriptValue> {
        (self.getter)(engine)
    }

    fn set(&self, _engine: &Engine, _value: ScriptValue) -> BridgeResult<()> {
        Ok(())
    }
}

/// Marker for "no such member": reads yield undefined, writes are ignored.
#[derive(Debug, Default)]
pub struct UndefinedDescriptor;

impl UndefinedDescriptor {
    pub fn shared() -> DescriptorRef {
        Rc::new(UndefinedDescriptor)
    }
}

impl Descriptor for UndefinedDescriptor {
    fn flags(&self) -> PropertyFlags {
        PropertyFlags::NONE
    }

    fn get(&self, _engine: &Engine) -> BridgeResult<ScriptValue> {
        Ok(ScriptValue::Undefined)
    }

    fn set(&self, _engine: &Engine, _value: ScriptValue) -> BridgeResult<()> {
        Ok(())
    }

    fn is_undefined_marker(&self) -> bool {
        true
    }
}
