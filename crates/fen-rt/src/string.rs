//! Immutable managed strings and the process-wide intern pool.
//!
//! An [`RtString`] is an immutable byte buffer with a cached length and a
//! trailing NUL for interop; every producing operation (`slice`, `concat`,
//! `chr`) allocates a fresh instance and nothing ever mutates an existing
//! one. Callers hold strings as [`StringRef`] (a shared reference); the
//! absent string of the ABI is `Option::None`.
//!
//! # The pool retains, it does not collect
//!
//! Every string created through an [`InternPool`] is appended to the pool
//! while its fixed ceiling allows, purely for retention: the pool never
//! deduplicates and never frees. Strings created past the ceiling are
//! returned fully usable, just not retained. This "create and keep
//! forever" model is the runtime's contract; there is no collector behind
//! it, so the pool is a deliberate, bounded leak.
//!
//! # Examples
//!
//! ```
//! use fen_rt::InternPool;
//!
//! let mut pool = InternPool::new();
//! let hello = pool.alloc(b"hello");
//! let hell = pool.slice(Some(&hello), 0, 4);
//!
//! assert_eq!(hello.len(), 5);
//! assert_eq!(hell.as_bytes(), b"hell");
//! assert_eq!(pool.retained(), 2);
//! ```

use crate::buf;
use std::fmt;
use std::rc::Rc;

/// Fixed ceiling on pool registrations for the process lifetime.
pub const STRING_POOL_LIMIT: usize = 4096;

/// Shared reference to an immutable managed string.
pub type StringRef = Rc<RtString>;

// ============================================================================
// RtString
// ============================================================================

/// An immutable, NUL-terminated managed byte string.
///
/// The payload may contain arbitrary bytes, including interior NULs; the
/// terminator exists for interop and is excluded from [`len`](Self::len).
/// Equality is by content.
pub struct RtString {
    /// Payload plus trailing NUL; never empty.
    bytes: Box<[u8]>,
}

impl RtString {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: buf::copy_terminated(bytes),
        }
    }

    /// Wraps a buffer that already carries its trailing NUL.
    pub(crate) fn from_terminated(bytes: Box<[u8]>) -> Self {
        debug_assert!(bytes.last() == Some(&0), "buffer missing terminator");
        Self { bytes }
    }

    /// Payload length in bytes, excluding the terminator.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    /// Returns true if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocated buffer size; always `len() + 1`.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// The payload bytes, without the terminator.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// The payload bytes including the trailing NUL, for C-style interop.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// The byte at `index`, or 0 for any index outside `[0, len)`.
    ///
    /// Out-of-range access is a defined no-op returning 0, not an error.
    #[must_use]
    pub fn byte_at(&self, index: i64) -> i64 {
        if index < 0 || index as usize >= self.len() {
            return 0;
        }
        i64::from(self.bytes[index as usize])
    }

    /// The first byte's value, or 0 for the empty string.
    #[must_use]
    pub fn ordinal(&self) -> i64 {
        self.byte_at(0)
    }
}

impl PartialEq for RtString {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for RtString {}

impl fmt::Display for RtString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl fmt::Debug for RtString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RtString({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}

// ============================================================================
// Absent-tolerant queries
// ============================================================================

/// Length of a possibly-absent string; 0 for `None`.
#[must_use]
pub fn str_len(s: Option<&StringRef>) -> i64 {
    s.map_or(0, |s| s.len() as i64)
}

/// Byte at `index` of a possibly-absent string; 0 for `None` or out of
/// range.
#[must_use]
pub fn char_at(s: Option<&StringRef>, index: i64) -> i64 {
    s.map_or(0, |s| s.byte_at(index))
}

/// First byte of a possibly-absent string; 0 for `None` or empty.
#[must_use]
pub fn ordinal(s: Option<&StringRef>) -> i64 {
    s.map_or(0, |s| s.ordinal())
}

/// Content equality with absence rules: two absent strings are equal, an
/// absent and a present string are not.
#[must_use]
pub fn string_eq(a: Option<&StringRef>, b: Option<&StringRef>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.as_ref() == b.as_ref(),
        _ => false,
    }
}

// ============================================================================
// Intern Pool
// ============================================================================

/// Append-only, capacity-bounded registry of every created string.
///
/// Initialized empty at process start and never torn down. Registration
/// stops silently at the ceiling; creation does not.
pub struct InternPool {
    entries: Vec<StringRef>,
    limit: usize,
    omitted: u64,
}

impl InternPool {
    /// Creates an empty pool with the default ceiling
    /// ([`STRING_POOL_LIMIT`]).
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(STRING_POOL_LIMIT)
    }

    /// Creates an empty pool with an explicit ceiling.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
            omitted: 0,
        }
    }

    /// Copies `bytes` into a fresh string and registers it.
    ///
    /// This is the allocation primitive every other producing operation
    /// (and the string builder) bottoms out in.
    pub fn alloc(&mut self, bytes: &[u8]) -> StringRef {
        let s = Rc::new(RtString::from_bytes(bytes));
        self.register(&s);
        s
    }

    /// Adopts a buffer that already carries its terminator, registering
    /// the result. Used by the builder to avoid a second copy.
    pub(crate) fn adopt_terminated(&mut self, bytes: Box<[u8]>) -> StringRef {
        let s = Rc::new(RtString::from_terminated(bytes));
        self.register(&s);
        s
    }

    /// Creates a string from a NUL-terminated byte sequence, deriving the
    /// length from the terminator position.
    pub fn from_literal(&mut self, bytes: &[u8]) -> StringRef {
        let len = buf::cstr_len(bytes);
        self.alloc(&bytes[..len])
    }

    /// Copies the byte range `[start, end)` of `s` into a new string.
    ///
    /// `start` is clamped to `>= 0` and `end` to `<= len`; an empty or
    /// inverted clamped range (and an absent `s`) yields the empty string.
    pub fn slice(&mut self, s: Option<&StringRef>, start: i64, end: i64) -> StringRef {
        let Some(s) = s else { return self.alloc(&[]) };
        let start = start.max(0) as usize;
        let end = end.min(s.len() as i64).max(0) as usize;
        if start >= end {
            return self.alloc(&[]);
        }
        let bytes = &s.as_bytes()[start..end];
        self.alloc(bytes)
    }

    /// Concatenates `a` and `b` into fresh storage; an absent operand is
    /// treated as empty. No structural sharing.
    pub fn concat(&mut self, a: Option<&StringRef>, b: Option<&StringRef>) -> StringRef {
        let a = a.map_or(&[][..], |s| s.as_bytes());
        let b = b.map_or(&[][..], |s| s.as_bytes());
        let joined = buf::concat_terminated([a, b], a.len() + b.len());
        self.adopt_terminated(joined)
    }

    /// Creates a one-byte string from `code`, truncated to 8 bits.
    ///
    /// This is deliberately the single-byte path; multi-byte code points
    /// go through a separate UTF-8 encoder outside this layer.
    pub fn from_char_code(&mut self, code: i64) -> StringRef {
        self.alloc(&[code as u8])
    }

    /// Number of strings retained in the pool.
    #[must_use]
    pub fn retained(&self) -> usize {
        self.entries.len()
    }

    /// The pool's fixed registration ceiling.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of strings created past the ceiling and not retained.
    #[must_use]
    pub fn omitted(&self) -> u64 {
        self.omitted
    }

    fn register(&mut self, s: &StringRef) {
        if self.entries.len() < self.limit {
            self.entries.push(Rc::clone(s));
        } else {
            self.omitted += 1;
            fen_log::debug!(
                "intern pool at ceiling ({}); {}-byte string not retained",
                self.limit,
                s.len()
            );
        }
    }
}

impl Default for InternPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InternPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternPool")
            .field("retained", &self.entries.len())
            .field("limit", &self.limit)
            .field("omitted", &self.omitted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_copies_and_terminates() {
        let mut pool = InternPool::new();
        let s = pool.alloc(b"abc");
        assert_eq!(s.len(), 3);
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.as_bytes(), b"abc");
        assert_eq!(s.as_bytes_with_nul(), b"abc\0");
    }

    #[test]
    fn test_alloc_empty() {
        let mut pool = InternPool::new();
        let s = pool.alloc(b"");
        assert!(s.is_empty());
        assert_eq!(s.as_bytes_with_nul(), b"\0");
        assert_eq!(s.ordinal(), 0);
    }

    #[test]
    fn test_from_literal_stops_at_terminator() {
        let mut pool = InternPool::new();
        let s = pool.from_literal(b"hello\0trailing");
        assert_eq!(s.as_bytes(), b"hello");

        let unterminated = pool.from_literal(b"raw");
        assert_eq!(unterminated.as_bytes(), b"raw");
    }

    #[test]
    fn test_byte_at_in_and_out_of_range() {
        let mut pool = InternPool::new();
        let s = pool.alloc(b"AB");
        assert_eq!(s.byte_at(0), i64::from(b'A'));
        assert_eq!(s.byte_at(1), i64::from(b'B'));
        assert_eq!(s.byte_at(2), 0);
        assert_eq!(s.byte_at(-1), 0);
        assert_eq!(s.byte_at(1000), 0);
    }

    #[test]
    fn test_slice_clamps_bounds() {
        let mut pool = InternPool::new();
        let s = pool.alloc(b"hello");

        assert_eq!(pool.slice(Some(&s), 1, 4).as_bytes(), b"ell");
        assert_eq!(pool.slice(Some(&s), -10, 2).as_bytes(), b"he");
        assert_eq!(pool.slice(Some(&s), 2, 99).as_bytes(), b"llo");
        assert_eq!(pool.slice(Some(&s), 0, 5).as_bytes(), b"hello");
    }

    #[test]
    fn test_slice_empty_and_inverted_ranges() {
        let mut pool = InternPool::new();
        let s = pool.alloc(b"hello");

        assert_eq!(pool.slice(Some(&s), 3, 3).len(), 0);
        assert_eq!(pool.slice(Some(&s), 4, 2).len(), 0);
        assert_eq!(pool.slice(Some(&s), 99, 100).len(), 0);
        assert_eq!(pool.slice(Some(&s), -5, -1).len(), 0);
        assert_eq!(pool.slice(None, 0, 3).len(), 0);
    }

    #[test]
    fn test_concat_lengths_and_content() {
        let mut pool = InternPool::new();
        let a = pool.alloc(b"foo");
        let b = pool.alloc(b"barbaz");

        let joined = pool.concat(Some(&a), Some(&b));
        assert_eq!(joined.len(), a.len() + b.len());
        assert_eq!(joined.as_bytes(), b"foobarbaz");

        // The two halves slice back out exactly.
        let head = pool.slice(Some(&joined), 0, a.len() as i64);
        let tail = pool.slice(Some(&joined), a.len() as i64, joined.len() as i64);
        assert!(string_eq(Some(&head), Some(&a)));
        assert!(string_eq(Some(&tail), Some(&b)));
    }

    #[test]
    fn test_concat_absent_operands() {
        let mut pool = InternPool::new();
        let s = pool.alloc(b"x");

        assert_eq!(pool.concat(None, Some(&s)).as_bytes(), b"x");
        assert_eq!(pool.concat(Some(&s), None).as_bytes(), b"x");
        assert_eq!(pool.concat(None, None).len(), 0);
    }

    #[test]
    fn test_concat_allocates_fresh_storage() {
        let mut pool = InternPool::new();
        let a = pool.alloc(b"left");
        let empty = pool.alloc(b"");
        let joined = pool.concat(Some(&a), Some(&empty));
        assert!(!Rc::ptr_eq(&a, &joined));
        assert_eq!(joined.as_bytes(), a.as_bytes());
    }

    #[test]
    fn test_equality_rules() {
        let mut pool = InternPool::new();
        let a = pool.alloc(b"same");
        let b = pool.alloc(b"same");
        let c = pool.alloc(b"other");
        let empty = pool.alloc(b"");

        assert!(string_eq(Some(&a), Some(&a)));
        assert!(string_eq(Some(&a), Some(&b)));
        assert!(string_eq(Some(&b), Some(&a)));
        assert!(!string_eq(Some(&a), Some(&c)));
        assert!(string_eq(Some(&empty), Some(&empty)));
        assert!(string_eq(None, None));
        assert!(!string_eq(Some(&a), None));
        assert!(!string_eq(None, Some(&a)));
    }

    #[test]
    fn test_from_char_code_single_byte() {
        let mut pool = InternPool::new();
        let a = pool.from_char_code(65);
        assert_eq!(a.as_bytes(), b"A");
        assert_eq!(a.len(), 1);

        // Truncated to 8 bits, faithfully single-byte.
        let truncated = pool.from_char_code(0x141);
        assert_eq!(truncated.as_bytes(), &[0x41]);

        let nul = pool.from_char_code(0);
        assert_eq!(nul.len(), 1);
        assert_eq!(nul.ordinal(), 0);
    }

    #[test]
    fn test_ordinal() {
        let mut pool = InternPool::new();
        let s = pool.alloc(b"Zebra");
        assert_eq!(s.ordinal(), i64::from(b'Z'));
        assert_eq!(ordinal(Some(&s)), i64::from(b'Z'));
        assert_eq!(ordinal(None), 0);
    }

    #[test]
    fn test_absent_queries_default_to_zero() {
        assert_eq!(str_len(None), 0);
        assert_eq!(char_at(None, 0), 0);
        assert_eq!(ordinal(None), 0);
    }

    #[test]
    fn test_pool_registers_every_creation() {
        let mut pool = InternPool::new();
        let s = pool.alloc(b"a");
        pool.slice(Some(&s), 0, 1);
        pool.concat(Some(&s), Some(&s));
        pool.from_char_code(98);
        pool.from_literal(b"lit\0");
        assert_eq!(pool.retained(), 5);
        assert_eq!(pool.omitted(), 0);
    }

    #[test]
    fn test_pool_ceiling_omits_but_still_creates() {
        let mut pool = InternPool::with_limit(3);
        for _ in 0..3 {
            pool.alloc(b"kept");
        }
        assert_eq!(pool.retained(), 3);

        // Past the ceiling: fully usable, just not retained.
        let overflow = pool.alloc(b"overflow");
        assert_eq!(overflow.as_bytes(), b"overflow");
        assert_eq!(overflow.len(), 8);
        assert_eq!(pool.retained(), 3);
        assert_eq!(pool.omitted(), 1);

        let joined = pool.concat(Some(&overflow), Some(&overflow));
        assert_eq!(joined.as_bytes(), b"overflowoverflow");
        assert_eq!(pool.omitted(), 2);
    }

    #[test]
    fn test_interior_nul_preserved() {
        let mut pool = InternPool::new();
        let s = pool.alloc(b"a\0b");
        assert_eq!(s.len(), 3);
        assert_eq!(s.byte_at(1), 0);
        assert_eq!(s.byte_at(2), i64::from(b'b'));
    }

    #[test]
    fn test_display_and_debug() {
        let mut pool = InternPool::new();
        let s = pool.alloc(b"hi");
        assert_eq!(format!("{s}"), "hi");
        assert_eq!(format!("{s:?}"), "RtString(\"hi\")");
    }
}
