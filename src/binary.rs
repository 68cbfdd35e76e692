//! Binary reading utilities for parsing replay files.
//!
//! This module provides bounds-checked readers for little-endian integers,
//! byte slices and NUL-padded text fields, plus [`ByteCursor`], the
//! (buffer, offset) pair threaded through every decode step.
//!
//! # Endianness
//!
//! All multi-byte integers in the replay format are little-endian.
//!
//! # Example
//!
//! ```
//! use rep_parser::binary::{read_u16_le, read_u32_le, ByteCursor};
//!
//! let data = [0x80, 0x00, 0x01, 0x00, 0x07];
//! assert_eq!(read_u16_le(&data, 0).unwrap(), 0x0080);
//! assert_eq!(read_u32_le(&data, 0).unwrap(), 0x0001_0080);
//!
//! let mut cursor = ByteCursor::new(&data);
//! assert_eq!(cursor.read_u32_le().unwrap(), 0x0001_0080);
//! assert_eq!(cursor.read_u8().unwrap(), 7);
//! assert!(cursor.is_at_end());
//! ```

use crate::error::{ParserError, Result};

/// Checks that `len` bytes starting at `offset` lie inside `bytes`.
fn check_span(bytes: &[u8], offset: usize, len: usize) -> Result<usize> {
    match offset.checked_add(len) {
        Some(end) if end <= bytes.len() => Ok(end),
        _ => Err(ParserError::unexpected_eof(
            offset.saturating_add(len),
            bytes.len(),
        )),
    }
}

/// Reads a single byte at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if `offset` is past the buffer.
pub fn read_u8(bytes: &[u8], offset: usize) -> Result<u8> {
    check_span(bytes, offset, 1)?;
    Ok(bytes[offset])
}

/// Reads a `u16` stored low byte first.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` when `offset + 2` runs past the end.
///
/// # Example
///
/// ```
/// use rep_parser::binary::read_u16_le;
///
/// // Map width and height from a 128x96 header.
/// let dims = [0x80, 0x00, 0x60, 0x00];
/// assert_eq!(read_u16_le(&dims, 0).unwrap(), 128);
/// assert_eq!(read_u16_le(&dims, 2).unwrap(), 96);
/// ```
pub fn read_u16_le(bytes: &[u8], offset: usize) -> Result<u16> {
    let end = check_span(bytes, offset, 2)?;
    let slice = &bytes[offset..end];
    Ok(u16::from_le_bytes([slice[0], slice[1]]))
}

/// Reads a `u32` stored low byte first.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` when `offset + 4` runs past the end.
pub fn read_u32_le(bytes: &[u8], offset: usize) -> Result<u32> {
    let end = check_span(bytes, offset, 4)?;
    let slice = &bytes[offset..end];
    Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Reads a signed `i32`, as used by sub-block length fields.
///
/// # Errors
///
/// Same as [`read_u32_le`].
pub fn read_i32_le(bytes: &[u8], offset: usize) -> Result<i32> {
    let end = check_span(bytes, offset, 4)?;
    let slice = &bytes[offset..end];
    Ok(i32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Borrows `len` bytes starting at `offset`.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` when the span runs past the end.
///
/// # Example
///
/// ```
/// use rep_parser::binary::read_bytes;
///
/// let data = b"seRS\x00\x00";
/// assert_eq!(read_bytes(data, 0, 4).unwrap(), b"seRS");
/// ```
pub fn read_bytes(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = check_span(bytes, offset, len)?;
    Ok(&bytes[offset..end])
}

/// Reads a fixed-size array from the buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if fewer than `N` bytes remain.
pub fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N]> {
    let slice = read_bytes(bytes, offset, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    Ok(out)
}

/// Presents a NUL-padded fixed-width field as text.
///
/// The field is cut at its first NUL byte (it is not guaranteed to contain
/// one) and decoded lossily, since replay names are not guaranteed to be
/// UTF-8.
///
/// # Example
///
/// ```
/// use rep_parser::binary::fixed_str_lossy;
///
/// assert_eq!(fixed_str_lossy(b"Lost Temple\x00\x00\x00"), "Lost Temple");
/// assert_eq!(fixed_str_lossy(b"FullWidth"), "FullWidth");
/// ```
#[must_use]
pub fn fixed_str_lossy(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// A read position inside a byte buffer.
///
/// Every read checks bounds before moving; a failed read leaves the
/// offset where it was. The offset never exceeds the buffer length.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Creates a cursor at `offset`, clamped to the buffer length.
    #[must_use]
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            offset: offset.min(data.len()),
        }
    }

    /// Returns the current offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the whole underlying buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Returns the unread bytes without consuming them.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    /// Returns whether every byte has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.offset == self.data.len()
    }

    /// Returns the next `len` bytes without consuming them.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than `len` bytes remain.
    pub fn peek_bytes(&self, len: usize) -> Result<&'a [u8]> {
        read_bytes(self.data, self.offset, len)
    }

    /// Consumes and returns the next `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = read_bytes(self.data, self.offset, len)?;
        self.offset += len;
        Ok(bytes)
    }

    /// Consumes a fixed-size array.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let out = read_array::<N>(self.data, self.offset)?;
        self.offset += N;
        Ok(out)
    }

    /// Consumes one byte.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` at the end of the buffer.
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = read_u8(self.data, self.offset)?;
        self.offset += 1;
        Ok(value)
    }

    /// Consumes a little-endian u16.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than 2 bytes remain.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let value = read_u16_le(self.data, self.offset)?;
        self.offset += 2;
        Ok(value)
    }

    /// Consumes a little-endian u32.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than 4 bytes remain.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let value = read_u32_le(self.data, self.offset)?;
        self.offset += 4;
        Ok(value)
    }

    /// Consumes a little-endian i32.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than 4 bytes remain.
    pub fn read_i32_le(&mut self) -> Result<i32> {
        let value = read_i32_le(self.data, self.offset)?;
        self.offset += 4;
        Ok(value)
    }

    /// Skips `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than `len` bytes remain.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }
}
