// emugl-egl/src/table.rs
//
//! A handle-indexed table of shared records.
//!
//! Handles carry the slot's generation, so a handle whose entry has been removed never resolves
//! again, even after the slot is reused. A slot whose generation is about to wrap is retired
//! instead of being reused.

use crate::handle::SlotKey;

use std::sync::Arc;

struct Slot<T> {
    generation: u32,
    object: Option<Arc<T>>,
}

pub(crate) struct ObjectTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> ObjectTable<T> {
    pub(crate) fn new() -> ObjectTable<T> {
        ObjectTable { slots: vec![], free: vec![], len: 0 }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Stores one share of `object` and returns the raw handle naming it, or `None` if every
    /// slot index is in use or retired.
    pub(crate) fn insert(&mut self, object: Arc<T>) -> Option<u64> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = u32::try_from(self.slots.len()).ok().filter(|&i| i < u32::MAX)?;
                self.slots.push(Slot { generation: 0, object: None });
                index
            }
        };

        let slot = &mut self.slots[index as usize];
        debug_assert!(slot.object.is_none());
        slot.object = Some(object);
        self.len += 1;
        Some(SlotKey { index, generation: slot.generation }.pack())
    }

    pub(crate) fn get(&self, raw: u64) -> Option<&Arc<T>> {
        let key = SlotKey::unpack(raw)?;
        let slot = self.slots.get(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.object.as_ref()
    }

    pub(crate) fn remove(&mut self, raw: u64) -> Option<Arc<T>> {
        let key = SlotKey::unpack(raw)?;
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let object = slot.object.take()?;
        self.release_slot(key.index);
        Some(object)
    }

    /// Returns the raw handle of the entry holding `object`, if any.
    pub(crate) fn find(&self, object: &Arc<T>) -> Option<u64> {
        self.slots.iter().enumerate().find_map(|(index, slot)| match slot.object {
            Some(ref candidate) if Arc::ptr_eq(candidate, object) => {
                Some(SlotKey { index: index as u32, generation: slot.generation }.pack())
            }
            _ => None,
        })
    }

    /// Removes every entry and hands back the table's shares, so the caller can drop them
    /// outside of any lock.
    pub(crate) fn drain(&mut self) -> Vec<Arc<T>> {
        let mut drained = Vec::with_capacity(self.len);
        for index in 0..self.slots.len() {
            if let Some(object) = self.slots[index].object.take() {
                drained.push(object);
                self.release_slot(index as u32);
            }
        }
        drained
    }

    fn release_slot(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        self.len -= 1;
        if slot.generation == u32::MAX {
            return;
        }
        slot.generation += 1;
        self.free.push(index);
    }
}
