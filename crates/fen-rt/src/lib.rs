//! Runtime memory layer for Fen programs.
//!
//! This crate is the runtime support library a Fen compiler links
//! generated programs against. It provides the language's only two
//! dynamically-sized data structures and the state behind them:
//!
//! - [`Vector`]: a growable sequence of `i64` values with doubling
//!   growth, addressed through opaque [`VecHandle`] tokens.
//! - [`RtString`]: an immutable, NUL-terminated managed string; every
//!   producing operation allocates a fresh instance and registers it in
//!   the process-wide [`InternPool`].
//! - [`Builder`]: a fragment buffer addressed through [`BuilderHandle`]
//!   tokens in the capacity-bounded [`BuilderTable`], materialized into a
//!   managed string on demand.
//!
//! The [`Runtime`] context owns all three and exposes the flat operation
//! surface generated code calls; [`with_runtime`] reaches the
//! process-wide instance.
//!
//! # Layering
//!
//! Leaves first: the terminated-buffer primitive ([`buf`]) feeds the
//! string layer, which the builder layer materializes through; vectors
//! are fully independent. The builder never mutates a string and a string
//! never reaches back into a builder.
//!
//! # Retention, not collection
//!
//! Nothing in this layer is freed automatically. The intern pool retains
//! every registered string for the process lifetime, vectors are freed
//! only explicitly, and builders are never removed from their table; only
//! builder fragments are released, on `clear`. See the module docs in
//! [`string`] for why this is a deliberate, bounded leak.
//!
//! # Example
//!
//! ```
//! use fen_rt::Runtime;
//!
//! let mut rt = Runtime::new();
//! let sb = rt.sb_new().unwrap();
//! for part in [&b"ab"[..], b"", b"cd"] {
//!     let s = rt.string_new(part);
//!     rt.sb_push(sb, Some(&s)).unwrap();
//! }
//! assert_eq!(rt.sb_len(sb), 4);
//! assert_eq!(rt.sb_build(sb).as_bytes(), b"abcd");
//! ```

pub mod buf;
pub mod builder;
pub mod error;
pub mod handle;
pub mod runtime;
pub mod string;
pub mod vector;

pub use builder::{BUILDER_TABLE_LIMIT, Builder, BuilderTable};
pub use error::{Error, Result};
pub use handle::{BuilderHandle, VecHandle};
pub use runtime::{Runtime, with_runtime};
pub use string::{InternPool, RtString, STRING_POOL_LIMIT, StringRef};
pub use vector::{DEFAULT_VECTOR_CAPACITY, Vector, VectorTable};
