//! Control group hotkey body (0x13).
//!
//! # Format
//!
//! ```text
//! [operation: 1] [group: 1]
//! ```

use std::fmt;

use crate::binary::ByteCursor;
use crate::error::Result;

/// What a hotkey press did with its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyOperation {
    /// Ctrl+number: store the selection in the group (0).
    Assign,
    /// Number: recall the group (1).
    Select,
    /// Shift+number: add the selection to the group (2).
    Add,
    /// Any other value.
    Unknown(u8),
}

impl From<u8> for HotkeyOperation {
    fn from(value: u8) -> Self {
        match value {
            0 => HotkeyOperation::Assign,
            1 => HotkeyOperation::Select,
            2 => HotkeyOperation::Add,
            other => HotkeyOperation::Unknown(other),
        }
    }
}

impl fmt::Display for HotkeyOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotkeyOperation::Assign => f.write_str("assign"),
            HotkeyOperation::Select => f.write_str("select"),
            HotkeyOperation::Add => f.write_str("add"),
            HotkeyOperation::Unknown(value) => write!(f, "op{value}"),
        }
    }
}

/// A decoded hotkey body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    /// What was done.
    pub operation: HotkeyOperation,
    /// Control group number (0-9).
    pub group: u8,
}

impl Hotkey {
    /// Parses a hotkey body.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if the body is shorter than 2 bytes.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(body);
        Ok(Hotkey {
            operation: HotkeyOperation::from(cursor.read_u8()?),
            group: cursor.read_u8()?,
        })
    }
}
