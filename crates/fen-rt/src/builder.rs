//! String builders and the process-wide builder table.
//!
//! A [`Builder`] accumulates independent byte-fragment copies and
//! concatenates them into one managed string on demand. Generated code
//! addresses builders through [`BuilderHandle`] indices into a
//! [`BuilderTable`] with a fixed maximum occupancy; builders are never
//! removed and handles are never recycled.
//!
//! Fragments are copies: freeing or reusing the string passed to `push`
//! never affects the builder. `build` leaves the builder untouched and may
//! be called repeatedly; `clear` drops the fragment copies but keeps the
//! builder (and its fragment-table capacity) alive.
//!
//! # Examples
//!
//! ```
//! use fen_rt::{BuilderTable, InternPool};
//!
//! let mut pool = InternPool::new();
//! let mut builders = BuilderTable::new();
//!
//! let h = builders.alloc().unwrap();
//! let ab = pool.alloc(b"ab");
//! let cd = pool.alloc(b"cd");
//! builders.push(h, Some(&ab)).unwrap();
//! builders.push(h, Some(&cd)).unwrap();
//!
//! assert_eq!(builders.total_length(h), 4);
//! assert_eq!(builders.build(h, &mut pool).as_bytes(), b"abcd");
//! ```

use crate::buf;
use crate::error::{Error, Result};
use crate::handle::BuilderHandle;
use crate::string::{InternPool, StringRef};

/// Fixed maximum number of builders for the process lifetime.
pub const BUILDER_TABLE_LIMIT: usize = 256;

// ============================================================================
// Builder
// ============================================================================

/// A mutable sequence of byte-fragment copies.
#[derive(Debug, Default)]
pub struct Builder {
    /// Fragment copies in insertion order; storage doubles when full and
    /// its capacity survives `clear`.
    fragments: Vec<Box<[u8]>>,
}

impl Builder {
    /// Creates a builder with no fragments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies `bytes` into a new fragment at the end.
    pub fn push(&mut self, bytes: &[u8]) {
        self.fragments.push(bytes.into());
    }

    /// Sum of all fragment lengths.
    #[must_use]
    pub fn total_length(&self) -> usize {
        self.fragments.iter().map(|f| f.len()).sum()
    }

    /// Number of fragments held.
    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Allocated fragment-table slots.
    #[must_use]
    pub fn fragment_capacity(&self) -> usize {
        self.fragments.capacity()
    }

    /// Drops every fragment copy, keeping the fragment table's capacity.
    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    /// Concatenates the fragments in insertion order into one new managed
    /// string, registered in `pool`. The builder is unchanged.
    pub fn build(&self, pool: &mut InternPool) -> StringRef {
        let total = self.total_length();
        let joined = buf::concat_terminated(self.fragments.iter().map(|f| &**f), total);
        pool.adopt_terminated(joined)
    }
}

// ============================================================================
// Builder Table
// ============================================================================

/// Append-only table of builders with a fixed maximum occupancy.
///
/// Initialized empty at process start and never torn down. The table owns
/// its builders and each builder owns its fragment copies.
#[derive(Debug)]
pub struct BuilderTable {
    builders: Vec<Builder>,
    limit: usize,
}

impl BuilderTable {
    /// Creates an empty table with the default ceiling
    /// ([`BUILDER_TABLE_LIMIT`]).
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(BUILDER_TABLE_LIMIT)
    }

    /// Creates an empty table with an explicit ceiling.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            builders: Vec::new(),
            limit,
        }
    }

    /// Allocates a new builder and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BuilderTableFull`] once the table holds its fixed
    /// maximum; the table is not resizable and the process keeps running.
    pub fn alloc(&mut self) -> Result<BuilderHandle> {
        if self.builders.len() >= self.limit {
            fen_log::warn!("builder table full at {} builders", self.limit);
            return Err(Error::BuilderTableFull { limit: self.limit });
        }
        let handle = BuilderHandle::new(self.builders.len() as u32);
        self.builders.push(Builder::new());
        Ok(handle)
    }

    /// Copies the bytes of `s` into a new fragment of the named builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBuilderHandle`] for an unallocated handle
    /// and [`Error::AbsentString`] for an absent string.
    pub fn push(&mut self, handle: BuilderHandle, s: Option<&StringRef>) -> Result<()> {
        let builder = self.builder_mut(handle)?;
        let s = s.ok_or(Error::AbsentString)?;
        builder.push(s.as_bytes());
        Ok(())
    }

    /// Sum of the named builder's fragment lengths; 0 for an invalid
    /// handle.
    #[must_use]
    pub fn total_length(&self, handle: BuilderHandle) -> i64 {
        self.builders
            .get(handle.as_usize())
            .map_or(0, |b| b.total_length() as i64)
    }

    /// Builds the named builder's fragments into one managed string.
    ///
    /// An invalid handle yields the empty string. The builder's state is
    /// unchanged either way.
    pub fn build(&self, handle: BuilderHandle, pool: &mut InternPool) -> StringRef {
        match self.builders.get(handle.as_usize()) {
            Some(builder) => builder.build(pool),
            None => pool.alloc(&[]),
        }
    }

    /// Drops the named builder's fragments, keeping the builder alive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBuilderHandle`] for an unallocated handle.
    pub fn clear(&mut self, handle: BuilderHandle) -> Result<()> {
        self.builder_mut(handle)?.clear();
        Ok(())
    }

    /// Number of builders allocated so far.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.builders.len()
    }

    /// The table's fixed occupancy ceiling.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    fn builder_mut(&mut self, handle: BuilderHandle) -> Result<&mut Builder> {
        self.builders
            .get_mut(handle.as_usize())
            .ok_or(Error::InvalidBuilderHandle { handle })
    }
}

impl Default for BuilderTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> InternPool {
        InternPool::new()
    }

    #[test]
    fn test_empty_builder_builds_empty_string() {
        let mut pool = pool();
        let builder = Builder::new();
        assert_eq!(builder.total_length(), 0);
        let built = builder.build(&mut pool);
        assert_eq!(built.len(), 0);
        assert_eq!(built.as_bytes_with_nul(), b"\0");
    }

    #[test]
    fn test_mixed_fragments_including_empty() {
        let mut pool = pool();
        let mut builders = BuilderTable::new();
        let h = builders.alloc().unwrap();

        for fragment in [&b"ab"[..], &b""[..], &b"cd"[..]] {
            let s = pool.alloc(fragment);
            builders.push(h, Some(&s)).unwrap();
        }

        assert_eq!(builders.total_length(h), 4);
        assert_eq!(builders.build(h, &mut pool).as_bytes(), b"abcd");

        builders.clear(h).unwrap();
        assert_eq!(builders.total_length(h), 0);
        assert_eq!(builders.build(h, &mut pool).len(), 0);
    }

    #[test]
    fn test_build_is_repeatable() {
        let mut pool = pool();
        let mut builders = BuilderTable::new();
        let h = builders.alloc().unwrap();
        let s = pool.alloc(b"xy");
        builders.push(h, Some(&s)).unwrap();

        let first = builders.build(h, &mut pool);
        let second = builders.build(h, &mut pool);
        assert_eq!(first.as_bytes(), b"xy");
        assert_eq!(second.as_bytes(), b"xy");
        assert_eq!(builders.total_length(h), 2);
    }

    #[test]
    fn test_fragments_are_independent_copies() {
        let mut pool = pool();
        let mut builders = BuilderTable::new();
        let h = builders.alloc().unwrap();

        let original = pool.alloc(b"keep");
        builders.push(h, Some(&original)).unwrap();
        drop(original);

        assert_eq!(builders.build(h, &mut pool).as_bytes(), b"keep");
    }

    #[test]
    fn test_clear_keeps_builder_usable_and_capacity() {
        let mut pool = pool();
        let mut builder = Builder::new();
        for _ in 0..10 {
            builder.push(b"frag");
        }
        let capacity = builder.fragment_capacity();
        builder.clear();
        assert_eq!(builder.fragment_count(), 0);
        assert_eq!(builder.fragment_capacity(), capacity);

        builder.push(b"again");
        assert_eq!(builder.build(&mut pool).as_bytes(), b"again");
    }

    #[test]
    fn test_push_invalid_handle_and_absent_string() {
        let mut pool = pool();
        let mut builders = BuilderTable::new();
        let dead = BuilderHandle::new(42);
        let s = pool.alloc(b"x");

        assert_eq!(
            builders.push(dead, Some(&s)),
            Err(Error::InvalidBuilderHandle { handle: dead })
        );

        let h = builders.alloc().unwrap();
        assert_eq!(builders.push(h, None), Err(Error::AbsentString));
        assert_eq!(builders.total_length(h), 0);
    }

    #[test]
    fn test_invalid_handle_defaults() {
        let mut pool = pool();
        let mut builders = BuilderTable::new();
        let dead = BuilderHandle::new(7);

        assert_eq!(builders.total_length(dead), 0);
        assert_eq!(builders.build(dead, &mut pool).len(), 0);
        assert_eq!(
            builders.clear(dead),
            Err(Error::InvalidBuilderHandle { handle: dead })
        );
    }

    #[test]
    fn test_table_ceiling() {
        let mut builders = BuilderTable::with_limit(2);
        let a = builders.alloc().unwrap();
        let b = builders.alloc().unwrap();
        assert_ne!(a, b);
        assert_eq!(builders.alloc(), Err(Error::BuilderTableFull { limit: 2 }));
        assert_eq!(builders.allocated(), 2);

        // Existing builders stay fully usable after exhaustion.
        let mut pool = pool();
        let s = pool.alloc(b"ok");
        builders.push(a, Some(&s)).unwrap();
        assert_eq!(builders.build(a, &mut pool).as_bytes(), b"ok");
    }

    #[test]
    fn test_handles_are_sequential_indices() {
        let mut builders = BuilderTable::new();
        assert_eq!(builders.alloc().unwrap().as_u32(), 0);
        assert_eq!(builders.alloc().unwrap().as_u32(), 1);
        assert_eq!(builders.alloc().unwrap().as_u32(), 2);
    }

    #[test]
    fn test_built_string_registers_in_pool() {
        let mut pool = InternPool::new();
        let mut builders = BuilderTable::new();
        let h = builders.alloc().unwrap();
        let s = pool.alloc(b"frag");
        builders.push(h, Some(&s)).unwrap();

        let before = pool.retained();
        builders.build(h, &mut pool);
        assert_eq!(pool.retained(), before + 1);
    }

    #[test]
    fn test_interleaved_builders() {
        let mut pool = pool();
        let mut builders = BuilderTable::new();
        let left = builders.alloc().unwrap();
        let right = builders.alloc().unwrap();

        let a = pool.alloc(b"a");
        let b = pool.alloc(b"b");
        builders.push(left, Some(&a)).unwrap();
        builders.push(right, Some(&b)).unwrap();
        builders.push(left, Some(&b)).unwrap();

        assert_eq!(builders.build(left, &mut pool).as_bytes(), b"ab");
        assert_eq!(builders.build(right, &mut pool).as_bytes(), b"b");
    }
}
