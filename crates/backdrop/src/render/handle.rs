//! # Handles: Generational References to Renderer Entities
//!
//! The simulation never holds GPU objects directly. It holds an
//! [`EntityHandle`]: a slot index paired with a generation counter. When an
//! entity is removed its slot is recycled and the generation bumps, so a
//! stale handle (say, a burst retired twice) is detected and ignored instead
//! of hitting whatever now lives in that slot.
//!
//! ```text
//! EntityHandle { index: 5, generation: 0 }  ← first allocation
//! EntityHandle { index: 5, generation: 1 }  ← after recycle
//! ```
//!
//! [`Slots`] pairs the allocator with the per-slot storage both renderers use.

use std::fmt;

/// A lightweight handle to an entity owned by a renderer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl EntityHandle {
    /// Returns the raw index. Useful for diagnostics, not for general use.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation. Useful for diagnostics.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityHandle({}v{})", self.index, self.generation)
    }
}

/// Generational slot storage.
///
/// ```text
/// generations: [0, 1, 0, 2, 0]   ← one generation per slot ever allocated
/// values:      [A, _, C, _, E]   ← None where the slot is free
/// free_list:   [1, 3]            ← slots available for reuse
/// ```
pub struct Slots<T> {
    generations: Vec<u32>,
    values: Vec<Option<T>>,
    free_list: Vec<u32>,
}

impl<T> Slots<T> {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            values: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store a value, reusing a freed slot if one is available.
    pub fn insert(&mut self, value: T) -> EntityHandle {
        if let Some(index) = self.free_list.pop() {
            // Generation was already bumped on removal.
            self.values[index as usize] = Some(value);
            EntityHandle {
                index,
                generation: self.generations[index as usize],
            }
        } else {
            let index = self.values.len() as u32;
            self.generations.push(0);
            self.values.push(Some(value));
            EntityHandle {
                index,
                generation: 0,
            }
        }
    }

    /// Check if a handle still refers to a live value.
    pub fn is_alive(&self, handle: EntityHandle) -> bool {
        let idx = handle.index as usize;
        idx < self.generations.len()
            && self.generations[idx] == handle.generation
            && self.values[idx].is_some()
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&T> {
        if self.is_alive(handle) {
            self.values[handle.index as usize].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut T> {
        if self.is_alive(handle) {
            self.values[handle.index as usize].as_mut()
        } else {
            None
        }
    }

    /// Remove a value and free its slot. Returns `None` for stale handles.
    pub fn remove(&mut self, handle: EntityHandle) -> Option<T> {
        if !self.is_alive(handle) {
            return None;
        }
        let idx = handle.index as usize;
        self.generations[idx] += 1;
        self.free_list.push(handle.index);
        self.values[idx].take()
    }

    /// Remove everything. Every outstanding handle becomes stale.
    pub fn clear(&mut self) {
        for (idx, value) in self.values.iter_mut().enumerate() {
            if value.take().is_some() {
                self.generations[idx] += 1;
                self.free_list.push(idx as u32);
            }
        }
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.values.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate live values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &T)> {
        self.values.iter().enumerate().filter_map(|(idx, value)| {
            value.as_ref().map(|v| {
                (
                    EntityHandle {
                        index: idx as u32,
                        generation: self.generations[idx],
                    },
                    v,
                )
            })
        })
    }

    /// Mutable access to every live value, in slot order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.values.iter_mut().filter_map(Option::as_mut)
    }
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self::new()
    }
}
