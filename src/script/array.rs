//! Dense script arrays.

use std::cell::RefCell;

use crate::engine::Engine;
use crate::error::BridgeResult;
use crate::names::is_index_name;

use super::descriptor::{DataDescriptor, DescriptorRef, PropertyFlags};
use super::object::{ObjectRef, ScriptObject, ordinary_delete, ordinary_put};
use super::property_table::PropertyTable;
use super::value::ScriptValue;

/// A script array: dense elements plus ordinary named properties.
pub struct ArrayObject {
    elements: RefCell<Vec<ScriptValue>>,
    table: PropertyTable,
    prototype: Option<ObjectRef>,
}

impl ArrayObject {
    pub fn new(elements: Vec<ScriptValue>, prototype: Option<ObjectRef>) -> Self {
        Self {
            elements: RefCell::new(elements),
            table: PropertyTable::new(),
            prototype,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    fn index_of(name: &str) -> Option<usize> {
        is_index_name(name).then(|| name.parse().ok()).flatten()
    }
}

impl ScriptObject for ArrayObject {
    fn class_name(&self) -> &str {
        "Array"
    }

    fn properties(&self) -> &PropertyTable {
        &self.table
    }

    fn prototype(&self) -> Option<ObjectRef> {
        self.prototype.clone()
    }

    fn get_own_property(&self, _engine: &Engine, name: &str) -> BridgeResult<Option<DescriptorRef>> {
        if name == "length" {
            let len = ScriptValue::Number(self.len() as f64);
            return Ok(Some(DataDescriptor::new(len, PropertyFlags::WRITABLE).into_ref()));
        }
        if let Some(index) = Self::index_of(name) {
            return Ok(self
                .elements
                .borrow()
                .get(index)
                .map(|v| DataDescriptor::plain(v.clone()).into_ref()));
        }
        Ok(self.table.get(name))
    }

    fn put(&self, engine: &Engine, name: &str, value: ScriptValue, throw: bool) -> BridgeResult<()> {
        if name == "length" {
            if let Some(n) = value.as_number().filter(|n| *n >= 0.0 && n.fract() == 0.0) {
                self.elements
                    .borrow_mut()
                    .resize(n as usize, ScriptValue::Undefined);
            }
            return Ok(());
        }
        if let Some(index) = Self::index_of(name) {
            let mut elements = self.elements.borrow_mut();
            if index >= elements.len() {
                elements.resize(index + 1, ScriptValue::Undefined);
            }
            elements[index] = value;
            return Ok(());
        }
        ordinary_put(self, engine, name, value, throw)
    }

    fn delete(&self, engine: &Engine, name: &str, throw: bool) -> BridgeResult<bool> {
        if name == "length" {
            return Ok(false);
        }
        if let Some(index) = Self::index_of(name) {
            if let Some(slot) = self.elements.borrow_mut().get_mut(index) {
                *slot = ScriptValue::Undefined;
            }
            return Ok(true);
        }
        ordinary_delete(self, engine, name, throw)
    }

    fn own_keys(&self) -> Vec<String> {
        (0..self.len())
            .map(|i| i.to_string())
            .chain(self.table.live_keys())
            .collect()
    }

    fn is_array_like(&self) -> bool {
        true
    }

    fn array_elements(&self) -> Option<Vec<ScriptValue>> {
        Some(self.elements.borrow().clone())
    }
}
