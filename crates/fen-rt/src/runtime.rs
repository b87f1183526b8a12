//! The owning runtime context and its flat ABI surface.
//!
//! A [`Runtime`] composes the three process-wide state objects — the
//! vector table, the intern pool, and the builder table — behind one
//! owner, and exposes the flat operation set generated Fen code calls.
//! The only cross-component path is `sb_build`, which materializes a
//! builder's fragments through the string layer's allocation primitive.
//!
//! # Execution model
//!
//! The runtime is single-threaded and synchronous: no operation suspends
//! or blocks, and every operation runs to completion. The process-wide
//! instance lives in thread-local storage (the single logical thread of
//! execution owns it); a concurrent embedding must add its own
//! mutual-exclusion layer on top, that is not part of this contract.
//!
//! # Examples
//!
//! ```
//! use fen_rt::Runtime;
//!
//! let mut rt = Runtime::new();
//!
//! let v = rt.vec_new();
//! rt.vec_push(v, 10).unwrap();
//! rt.vec_push(v, 20).unwrap();
//! assert_eq!(rt.vec_pop(v), 20);
//!
//! let hello = rt.string_new(b"hello");
//! let world = rt.string_new(b" world");
//! let greeting = rt.string_concat(Some(&hello), Some(&world));
//! assert_eq!(greeting.as_bytes(), b"hello world");
//!
//! let sb = rt.sb_new().unwrap();
//! rt.sb_push(sb, Some(&greeting)).unwrap();
//! assert_eq!(rt.sb_len(sb), 11);
//! ```

use crate::builder::BuilderTable;
use crate::error::Result;
use crate::handle::{BuilderHandle, VecHandle};
use crate::string::{self, InternPool, StringRef};
use crate::vector::VectorTable;
use std::cell::RefCell;

/// Owner of all process-wide runtime state.
///
/// Initialized empty at process start and never torn down.
#[derive(Debug)]
pub struct Runtime {
    vectors: VectorTable,
    strings: InternPool,
    builders: BuilderTable,
}

impl Runtime {
    /// Creates a runtime with empty tables and an empty pool.
    #[must_use]
    pub fn new() -> Self {
        fen_log::debug!("runtime initialized");
        Self {
            vectors: VectorTable::new(),
            strings: InternPool::new(),
            builders: BuilderTable::new(),
        }
    }

    // ------------------------------------------------------------------
    // Vector operations
    // ------------------------------------------------------------------

    /// Allocates a vector with the default capacity of 8.
    pub fn vec_new(&mut self) -> VecHandle {
        self.vectors.alloc()
    }

    /// Allocates a vector with an explicit capacity (negative reads as 0).
    pub fn vec_with_capacity(&mut self, capacity: i64) -> VecHandle {
        self.vectors.alloc_with_capacity(capacity)
    }

    /// Appends `value` to the vector named by `v`.
    ///
    /// # Errors
    ///
    /// Fails for a handle that is not live.
    pub fn vec_push(&mut self, v: VecHandle, value: i64) -> Result<()> {
        self.vectors.push(v, value)
    }

    /// Pops the last element; 0 on empty or dead handle.
    pub fn vec_pop(&mut self, v: VecHandle) -> i64 {
        self.vectors.pop(v)
    }

    /// Reads a slot (unchecked against length); 0 on dead handle.
    #[must_use]
    pub fn vec_get(&self, v: VecHandle, index: i64) -> i64 {
        self.vectors.get(v, index)
    }

    /// Writes a slot (unchecked against length).
    ///
    /// # Errors
    ///
    /// Fails for a handle that is not live.
    pub fn vec_set(&mut self, v: VecHandle, index: i64, value: i64) -> Result<()> {
        self.vectors.set(v, index, value)
    }

    /// Live length; 0 on dead handle.
    #[must_use]
    pub fn vec_len(&self, v: VecHandle) -> i64 {
        self.vectors.len(v)
    }

    /// Allocated capacity; 0 on dead handle.
    #[must_use]
    pub fn vec_cap(&self, v: VecHandle) -> i64 {
        self.vectors.capacity(v)
    }

    /// Resets length to 0, keeping capacity.
    ///
    /// # Errors
    ///
    /// Fails for a handle that is not live.
    pub fn vec_clear(&mut self, v: VecHandle) -> Result<()> {
        self.vectors.clear(v)
    }

    /// Releases the vector's storage; the handle becomes invalid.
    ///
    /// # Errors
    ///
    /// Fails for a handle that is not live.
    pub fn vec_free(&mut self, v: VecHandle) -> Result<()> {
        self.vectors.free(v)
    }

    // ------------------------------------------------------------------
    // String operations
    // ------------------------------------------------------------------

    /// Creates a managed string by copying `bytes`.
    pub fn string_new(&mut self, bytes: &[u8]) -> StringRef {
        self.strings.alloc(bytes)
    }

    /// Creates a managed string from a NUL-terminated byte sequence.
    pub fn string_from_literal(&mut self, bytes: &[u8]) -> StringRef {
        self.strings.from_literal(bytes)
    }

    /// Length of a possibly-absent string; 0 for absent.
    #[must_use]
    pub fn string_len(&self, s: Option<&StringRef>) -> i64 {
        string::str_len(s)
    }

    /// Byte at `index`; 0 for absent or out of range.
    #[must_use]
    pub fn string_char_at(&self, s: Option<&StringRef>, index: i64) -> i64 {
        string::char_at(s, index)
    }

    /// Copies a clamped byte range into a new string.
    pub fn string_slice(&mut self, s: Option<&StringRef>, start: i64, end: i64) -> StringRef {
        self.strings.slice(s, start, end)
    }

    /// Concatenates two possibly-absent strings into fresh storage.
    pub fn string_concat(&mut self, a: Option<&StringRef>, b: Option<&StringRef>) -> StringRef {
        self.strings.concat(a, b)
    }

    /// Content equality with absence rules.
    #[must_use]
    pub fn string_eq(&self, a: Option<&StringRef>, b: Option<&StringRef>) -> bool {
        string::string_eq(a, b)
    }

    /// One-byte string from a character code truncated to 8 bits.
    pub fn chr(&mut self, code: i64) -> StringRef {
        self.strings.from_char_code(code)
    }

    /// First byte of a possibly-absent string; 0 for absent or empty.
    #[must_use]
    pub fn ord(&self, s: Option<&StringRef>) -> i64 {
        string::ordinal(s)
    }

    // ------------------------------------------------------------------
    // String-builder operations
    // ------------------------------------------------------------------

    /// Allocates a new builder.
    ///
    /// # Errors
    ///
    /// Fails once the builder table is at its fixed maximum.
    pub fn sb_new(&mut self) -> Result<BuilderHandle> {
        self.builders.alloc()
    }

    /// Copies the bytes of `s` into a new fragment of the named builder.
    ///
    /// # Errors
    ///
    /// Fails for an invalid handle or an absent string.
    pub fn sb_push(&mut self, h: BuilderHandle, s: Option<&StringRef>) -> Result<()> {
        self.builders.push(h, s)
    }

    /// Sum of fragment lengths; 0 for an invalid handle.
    #[must_use]
    pub fn sb_len(&self, h: BuilderHandle) -> i64 {
        self.builders.total_length(h)
    }

    /// Concatenates the builder's fragments into one new managed string
    /// (the empty string for an invalid handle), leaving the builder
    /// unchanged.
    pub fn sb_build(&mut self, h: BuilderHandle) -> StringRef {
        self.builders.build(h, &mut self.strings)
    }

    /// Drops the builder's fragments, keeping the builder alive.
    ///
    /// # Errors
    ///
    /// Fails for an invalid handle.
    pub fn sb_clear(&mut self, h: BuilderHandle) -> Result<()> {
        self.builders.clear(h)
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// The vector table.
    #[must_use]
    pub fn vectors(&self) -> &VectorTable {
        &self.vectors
    }

    /// The intern pool.
    #[must_use]
    pub fn strings(&self) -> &InternPool {
        &self.strings
    }

    /// The builder table.
    #[must_use]
    pub fn builders(&self) -> &BuilderTable {
        &self.builders
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

// Process-wide runtime instance. Thread-local because the execution model
// is a single logical thread; strings are shared via non-atomic Rc.
thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

/// Runs `f` against the process-wide runtime instance.
///
/// The instance is created on first use and never torn down. Not
/// re-entrant: `f` must not call `with_runtime` again.
///
/// # Examples
///
/// ```
/// use fen_rt::with_runtime;
///
/// let v = with_runtime(|rt| rt.vec_new());
/// with_runtime(|rt| rt.vec_push(v, 5)).unwrap();
/// assert_eq!(with_runtime(|rt| rt.vec_len(v)), 1);
/// ```
pub fn with_runtime<T>(f: impl FnOnce(&mut Runtime) -> T) -> T {
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}
