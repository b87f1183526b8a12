//! Terminated byte-buffer primitives.
//!
//! The leaf of the runtime's dependency order: every managed string and
//! every built result is a fresh owned buffer carrying a trailing NUL so
//! the bytes can cross a C-style boundary unchanged. Vectors do not use
//! this module at all.

/// Copies `bytes` into fresh owned storage with a trailing NUL appended.
///
/// The returned buffer has length `bytes.len() + 1` and its last byte
/// is 0. The payload itself may contain interior NULs; they are copied
/// verbatim.
#[must_use]
pub fn copy_terminated(bytes: &[u8]) -> Box<[u8]> {
    let mut storage = Vec::with_capacity(bytes.len() + 1);
    storage.extend_from_slice(bytes);
    storage.push(0);
    storage.into_boxed_slice()
}

/// Concatenates `parts` in order into one freshly terminated buffer.
///
/// `total_len` must equal the summed length of all parts; the buffer is
/// sized once up front, so a mismatch would force a reallocation but not
/// corrupt the result.
#[must_use]
pub fn concat_terminated<'a, I>(parts: I, total_len: usize) -> Box<[u8]>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut storage = Vec::with_capacity(total_len + 1);
    for part in parts {
        storage.extend_from_slice(part);
    }
    storage.push(0);
    storage.into_boxed_slice()
}

/// Returns the length of a NUL-terminated byte sequence.
///
/// Counts bytes up to but not including the first 0; if no terminator is
/// present the whole slice is the payload.
#[must_use]
pub fn cstr_len(bytes: &[u8]) -> usize {
    bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len())
}
