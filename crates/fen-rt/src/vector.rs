//! Growable vectors of 64-bit integers.
//!
//! A [`Vector`] is the only integer-indexed dynamic container Fen programs
//! have. Its backing storage doubles when full, so push is amortized O(1)
//! and existing elements keep their offsets across every growth. Generated
//! code addresses a vector through a [`VecHandle`] resolved by the
//! [`VectorTable`]; storage may move on growth, the handle never does.
//!
//! # Indexing contract
//!
//! `get` and `set` are deliberately not checked against `length`: reading
//! or writing a slot past the live length but within capacity touches a
//! stale slot, exactly as generated code expects. An index outside the
//! allocated capacity is a caller error; it is asserted in debug builds
//! and resolved to the defined defaults (`get` returns 0, `set` is a
//! no-op) in release builds.
//!
//! # Examples
//!
//! ```
//! use fen_rt::Vector;
//!
//! let mut v = Vector::new();
//! v.push(10);
//! v.push(20);
//! v.push(30);
//!
//! assert_eq!(v.pop(), 30);
//! assert_eq!(v.len(), 2);
//! assert_eq!(v.get(0), 10);
//! assert_eq!(v.get(1), 20);
//! ```

use crate::error::{Error, Result};
use crate::handle::VecHandle;
use fxhash::FxHashMap;

/// Capacity of a vector created without an explicit capacity request.
pub const DEFAULT_VECTOR_CAPACITY: usize = 8;

// ============================================================================
// Vector
// ============================================================================

/// A growable, contiguous sequence of `i64` values.
///
/// Capacity only grows, never shrinks; `clear` and `pop` leave old values
/// in place in their slots.
#[derive(Debug)]
pub struct Vector {
    /// Backing storage; its length is the vector's capacity.
    storage: Box<[i64]>,

    /// Number of live elements, always `<= storage.len()`.
    len: usize,
}

impl Vector {
    /// Creates an empty vector with the default capacity of 8 slots.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_VECTOR_CAPACITY)
    }

    /// Creates an empty vector with exactly `capacity` slots.
    ///
    /// A capacity of 0 is allowed; the first push grows the storage to a
    /// single slot.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Appends `value`, doubling the backing storage first if full.
    ///
    /// Growth preserves every existing element at its offset. Amortized
    /// O(1).
    pub fn push(&mut self, value: i64) {
        if self.len == self.storage.len() {
            self.grow();
        }
        self.storage[self.len] = value;
        self.len += 1;
    }

    /// Removes and returns the last element, or 0 if the vector is empty.
    ///
    /// Popping an empty vector is a defined no-op, not an error; the
    /// length never underflows. The vacated slot keeps its old value but
    /// is no longer reachable through the live range.
    pub fn pop(&mut self) -> i64 {
        if self.len == 0 {
            return 0;
        }
        self.len -= 1;
        self.storage[self.len]
    }

    /// Reads the slot at `index`, unchecked against the live length.
    ///
    /// Within capacity but past the length this returns whatever the slot
    /// last held. Outside capacity (or negative) it returns 0; debug
    /// builds assert first.
    #[must_use]
    pub fn get(&self, index: i64) -> i64 {
        match self.slot(index) {
            Some(slot) => self.storage[slot],
            None => {
                debug_assert!(
                    false,
                    "vector index {index} outside capacity {}",
                    self.storage.len()
                );
                0
            }
        }
    }

    /// Writes the slot at `index`, unchecked against the live length.
    ///
    /// Writing past the length but within capacity overwrites a stale
    /// slot without extending the vector. Outside capacity the write is
    /// dropped; debug builds assert first.
    pub fn set(&mut self, index: i64, value: i64) {
        match self.slot(index) {
            Some(slot) => self.storage[slot] = value,
            None => {
                debug_assert!(
                    false,
                    "vector index {index} outside capacity {}",
                    self.storage.len()
                );
            }
        }
    }

    /// Number of live elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no elements are live.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Resets the length to 0 without shrinking capacity or zeroing slots.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Maps a caller index to a storage slot if it is within capacity.
    fn slot(&self, index: i64) -> Option<usize> {
        if index < 0 {
            return None;
        }
        let index = index as usize;
        (index < self.storage.len()).then_some(index)
    }

    /// Doubles the backing storage (0 grows to a single slot).
    fn grow(&mut self) {
        let old_capacity = self.storage.len();
        let new_capacity = if old_capacity == 0 { 1 } else { old_capacity * 2 };
        fen_log::trace!("vector growth: {old_capacity} -> {new_capacity} slots");

        let mut next = vec![0; new_capacity].into_boxed_slice();
        next[..self.len].copy_from_slice(&self.storage[..self.len]);
        self.storage = next;
    }
}

impl Default for Vector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Vector Table
// ============================================================================

/// Owning table mapping handles to live vectors.
///
/// Handles come from a monotonically increasing counter starting at 1 and
/// are never reissued, so a freed vector's handle stays dead rather than
/// aliasing a newer vector.
#[derive(Debug)]
pub struct VectorTable {
    vectors: FxHashMap<VecHandle, Vector>,
    next_handle: u64,
}

impl VectorTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vectors: FxHashMap::default(),
            next_handle: 1,
        }
    }

    /// Allocates a vector with the default capacity.
    pub fn alloc(&mut self) -> VecHandle {
        self.insert(Vector::new())
    }

    /// Allocates a vector with `capacity` slots (negative is treated as 0).
    pub fn alloc_with_capacity(&mut self, capacity: i64) -> VecHandle {
        self.insert(Vector::with_capacity(capacity.max(0) as usize))
    }

    fn insert(&mut self, vector: Vector) -> VecHandle {
        let handle = VecHandle::new(self.next_handle);
        self.next_handle += 1;
        self.vectors.insert(handle, vector);
        handle
    }

    /// Appends `value` to the vector named by `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVectorHandle`] if the handle is not live.
    pub fn push(&mut self, handle: VecHandle, value: i64) -> Result<()> {
        self.vector_mut(handle)?.push(value);
        Ok(())
    }

    /// Pops the last element; 0 for an empty vector or dead handle.
    pub fn pop(&mut self, handle: VecHandle) -> i64 {
        self.vectors.get_mut(&handle).map_or(0, Vector::pop)
    }

    /// Reads a slot; 0 for a dead handle.
    #[must_use]
    pub fn get(&self, handle: VecHandle, index: i64) -> i64 {
        self.vectors.get(&handle).map_or(0, |v| v.get(index))
    }

    /// Writes a slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVectorHandle`] if the handle is not live.
    pub fn set(&mut self, handle: VecHandle, index: i64, value: i64) -> Result<()> {
        self.vector_mut(handle)?.set(index, value);
        Ok(())
    }

    /// Live length of the named vector; 0 for a dead handle.
    #[must_use]
    pub fn len(&self, handle: VecHandle) -> i64 {
        self.vectors.get(&handle).map_or(0, |v| v.len() as i64)
    }

    /// Allocated capacity of the named vector; 0 for a dead handle.
    #[must_use]
    pub fn capacity(&self, handle: VecHandle) -> i64 {
        self.vectors.get(&handle).map_or(0, |v| v.capacity() as i64)
    }

    /// Resets the named vector's length to 0, keeping its capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVectorHandle`] if the handle is not live.
    pub fn clear(&mut self, handle: VecHandle) -> Result<()> {
        self.vector_mut(handle)?.clear();
        Ok(())
    }

    /// Releases the named vector's storage; the handle becomes invalid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVectorHandle`] if the handle is not live
    /// (including a second free of the same handle).
    pub fn free(&mut self, handle: VecHandle) -> Result<()> {
        self.vectors
            .remove(&handle)
            .map(|_| ())
            .ok_or(Error::InvalidVectorHandle { handle })
    }

    /// Number of live vectors in the table.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.vectors.len()
    }

    fn vector_mut(&mut self, handle: VecHandle) -> Result<&mut Vector> {
        self.vectors
            .get_mut(&handle)
            .ok_or(Error::InvalidVectorHandle { handle })
    }
}

impl Default for VectorTable {
    fn default() -> Self {
        Self::new()
    }
}
