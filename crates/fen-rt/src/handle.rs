//! Opaque handle types for runtime-managed objects.
//!
//! Generated Fen code never sees the address of a vector's or builder's
//! backing storage; it sees an integer token that the runtime maps to owned
//! storage internally. This keeps growth reallocation safe: storage may move,
//! the token never does.
//!
//! # Examples
//!
//! ```
//! use fen_rt::{BuilderHandle, VecHandle};
//!
//! let v1 = VecHandle::new(1);
//! let v2 = VecHandle::new(1);
//! assert_eq!(v1, v2);
//!
//! let b = BuilderHandle::new(0);
//! assert_eq!(b.as_usize(), 0);
//! assert!(!b.is_invalid());
//! ```

use std::fmt;

/// Token identifying a vector in the runtime's vector table.
///
/// Handles are allocated from a monotonically increasing counter starting
/// at 1; the zero handle is reserved as the invalid sentinel. A freed
/// vector's handle is never reissued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VecHandle(u64);

impl VecHandle {
    /// Creates a handle from a raw token value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The reserved invalid handle (raw value 0).
    #[must_use]
    pub const fn invalid() -> Self {
        Self(0)
    }

    /// Returns the raw token value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns true if this is the reserved invalid handle.
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for VecHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VecHandle({})", self.0)
    }
}

impl From<u64> for VecHandle {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Token identifying a string builder in the runtime's builder table.
///
/// Builder handles are indices into an append-only table: builders are
/// never removed, so handles are never recycled. `u32::MAX` is the
/// reserved invalid sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BuilderHandle(u32);

impl BuilderHandle {
    /// Creates a handle from a raw table index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The reserved invalid handle.
    #[must_use]
    pub const fn invalid() -> Self {
        Self(u32::MAX)
    }

    /// Returns the raw index value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the raw index value as usize.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns true if this is the reserved invalid handle.
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Display for BuilderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuilderHandle({})", self.0)
    }
}

impl From<u32> for BuilderHandle {
    fn from(index: u32) -> Self {
        Self(index)
    }
}
