//! Unit order bodies: right click (0x14, 0x60), targeted order (0x15, 0x61)
//! and build (0x0C).
//!
//! # Format
//!
//! ```text
//! right click:      [x: 2] [y: 2] [target_tag: 2] [unknown: 2]? [unit_type: 2] [queued: 1]
//! targeted order:   [x: 2] [y: 2] [target_tag: 2] [unknown: 2]? [unit_type: 2] [order: 1] [queued: 1]
//! build:            [order: 1] [x: 2] [y: 2] [unit_type: 2]
//! ```
//!
//! The bracketed `unknown` field is only present in the 1.21 layouts.

use std::fmt;

use crate::binary::ByteCursor;
use crate::error::Result;

/// A map position. Orders use pixels; builds and lift-offs use tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// X coordinate.
    pub x: u16,
    /// Y coordinate.
    pub y: u16,
}

impl Position {
    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Position {
            x: cursor.read_u16_le()?,
            y: cursor.read_u16_le()?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A right-click order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RightClick {
    /// Clicked position.
    pub position: Position,
    /// Tag of the clicked unit, zero for ground.
    pub target_tag: u16,
    /// Type of the clicked unit.
    pub unit_type: u16,
    /// Whether the order was queued.
    pub queued: bool,
}

impl RightClick {
    /// Parses a right-click body.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if the body is too short.
    pub fn parse(body: &[u8], wide: bool) -> Result<Self> {
        let mut cursor = ByteCursor::new(body);
        let position = Position::parse(&mut cursor)?;
        let target_tag = cursor.read_u16_le()?;
        if wide {
            cursor.skip(2)?;
        }
        Ok(RightClick {
            position,
            target_tag,
            unit_type: cursor.read_u16_le()?,
            queued: cursor.read_u8()? != 0,
        })
    }
}

/// An order with an explicit order id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetedOrder {
    /// Target position.
    pub position: Position,
    /// Tag of the target unit, zero for ground.
    pub target_tag: u16,
    /// Type of the target unit.
    pub unit_type: u16,
    /// Order id.
    pub order: u8,
    /// Whether the order was queued.
    pub queued: bool,
}

impl TargetedOrder {
    /// Parses a targeted-order body.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if the body is too short.
    pub fn parse(body: &[u8], wide: bool) -> Result<Self> {
        let mut cursor = ByteCursor::new(body);
        let position = Position::parse(&mut cursor)?;
        let target_tag = cursor.read_u16_le()?;
        if wide {
            cursor.skip(2)?;
        }
        Ok(TargetedOrder {
            position,
            target_tag,
            unit_type: cursor.read_u16_le()?,
            order: cursor.read_u8()?,
            queued: cursor.read_u8()? != 0,
        })
    }
}

/// A building placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Build {
    /// Order id (which kind of worker build).
    pub order: u8,
    /// Tile position.
    pub position: Position,
    /// Building type.
    pub unit_type: u16,
}

impl Build {
    /// Parses a build body.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if the body is too short.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(body);
        Ok(Build {
            order: cursor.read_u8()?,
            position: Position::parse(&mut cursor)?,
            unit_type: cursor.read_u16_le()?,
        })
    }
}
