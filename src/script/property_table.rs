//! Per-object slot table with tri-state slots.
//!
//! A name is either absent (`Unset`), bound to a descriptor (`Live`) or
//! explicitly removed (`Deleted`). The state lives in the slot itself, so a
//! name can never be deleted and live at the same time.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use super::descriptor::DescriptorRef;

enum Slot {
    Live(DescriptorRef),
    Deleted,
}

/// Observable state of one slot.
#[derive(Clone)]
pub enum SlotState {
    Unset,
    Live(DescriptorRef),
    Deleted,
}

impl SlotState {
    pub fn is_unset(&self) -> bool {
        matches!(self, SlotState::Unset)
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, SlotState::Deleted)
    }

    pub fn live(&self) -> Option<&DescriptorRef> {
        match self {
            SlotState::Live(d) => Some(d),
            _ => None,
        }
    }
}

/// Insertion-ordered slot table.
#[derive(Default)]
pub struct PropertyTable {
    slots: RefCell<FxHashMap<String, Slot>>,
    order: RefCell<Vec<String>>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: &str) -> SlotState {
        match self.slots.borrow().get(key) {
            None => SlotState::Unset,
            Some(Slot::Live(d)) => SlotState::Live(d.clone()),
            Some(Slot::Deleted) => SlotState::Deleted,
        }
    }

    /// Live descriptor for `key`, if any.
    pub fn get(&self, key: &str) -> Option<DescriptorRef> {
        self.state(key).live().cloned()
    }

    /// Bind `key` to a descriptor, replacing any previous state.
    pub fn set_live(&self, key: &str, descriptor: DescriptorRef) {
        let previous = self
            .slots
            .borrow_mut()
            .insert(key.to_string(), Slot::Live(descriptor));
        if previous.is_none() {
            self.order.borrow_mut().push(key.to_string());
        }
    }

    /// Mark `key` deleted, dropping any live descriptor.
    pub fn mark_deleted(&self, key: &str) {
        let previous = self
            .slots
            .borrow_mut()
            .insert(key.to_string(), Slot::Deleted);
        if previous.is_none() {
            self.order.borrow_mut().push(key.to_string());
        }
    }

    /// Forget `key` entirely, returning it to `Unset`.
    pub fn remove(&self, key: &str) -> bool {
        let removed = self.slots.borrow_mut().remove(key).is_some();
        if removed {
            self.order.borrow_mut().retain(|k| k != key);
        }
        removed
    }

    /// Keys of live slots, in first-insertion order.
    pub fn live_keys(&self) -> Vec<String> {
        let slots = self.slots.borrow();
        self.order
            .borrow()
            .iter()
            .filter(|k| matches!(slots.get(k.as_str()), Some(Slot::Live(_))))
            .cloned()
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.slots
            .borrow()
            .values()
            .filter(|s| matches!(s, Slot::Live(_)))
            .count()
    }
}
