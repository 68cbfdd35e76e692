//! Selection command bodies (0x09-0x0B and the 1.21 variants 0x63-0x65).
//!
//! # Format
//!
//! ```text
//! classic: [count: 1] [unit_tag: 2]*count
//! 1.21:    [count: 1] ([unit_tag: 2] [unused: 2])*count
//! ```

use crate::binary::ByteCursor;
use crate::error::Result;

/// How a selection command changes the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Replace the selection.
    Replace,
    /// Add units to the selection.
    Add,
    /// Remove units from the selection.
    Remove,
}

/// A decoded selection body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// How the selection changes.
    pub mode: SelectionMode,
    /// Whether the record used the 4-byte 1.21 element layout.
    pub wide: bool,
    /// Tags of the units named by the command, in record order.
    pub unit_tags: Vec<u16>,
}

impl Selection {
    /// Parses a selection body (the bytes after the command head).
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if the body is shorter than its
    /// count byte implies.
    pub fn parse(body: &[u8], mode: SelectionMode, wide: bool) -> Result<Self> {
        let mut cursor = ByteCursor::new(body);
        let count = cursor.read_u8()?;

        let mut unit_tags = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            unit_tags.push(cursor.read_u16_le()?);
            if wide {
                cursor.skip(2)?;
            }
        }

        Ok(Selection {
            mode,
            wide,
            unit_tags,
        })
    }

    /// Returns the number of units named.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.unit_tags.len()
    }
}
