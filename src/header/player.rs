//! Player slot records embedded in the replay header.
//!
//! The header holds twelve 36-byte slot records:
//!
//! | Offset | Size | Type | Field |
//! |--------|------|------|-------|
//! | 0x00 | 4 | u32 | Slot id |
//! | 0x04 | 4 | u32 | Player id |
//! | 0x08 | 1 | u8 | Player type |
//! | 0x09 | 1 | u8 | Race |
//! | 0x0A | 1 | u8 | Team |
//! | 0x0B | 25 | bytes | Name (NUL padded) |

use std::fmt;

use crate::binary::{fixed_str_lossy, ByteCursor};
use crate::error::{ParserError, Result};

/// Size of one slot record.
pub const PLAYER_RECORD_SIZE: usize = 36;

/// Number of slot records in the header.
pub const PLAYER_SLOT_COUNT: usize = 12;

/// Width of the name field.
pub const PLAYER_NAME_SIZE: usize = 25;

/// The race chosen for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Race {
    /// Zerg (0).
    Zerg,
    /// Terran (1).
    Terran,
    /// Protoss (2).
    Protoss,
    /// Random (6).
    Random,
    /// Any other value.
    Unknown(u8),
}

impl Race {
    /// Decodes a race byte.
    #[must_use]
    pub fn from_byte(value: u8) -> Self {
        match value {
            0 => Race::Zerg,
            1 => Race::Terran,
            2 => Race::Protoss,
            6 => Race::Random,
            other => Race::Unknown(other),
        }
    }

    /// Returns the race name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Race::Zerg => "Zerg",
            Race::Terran => "Terran",
            Race::Protoss => "Protoss",
            Race::Random => "Random",
            Race::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Race::Unknown(value) => write!(f, "Unknown({value})"),
            known => f.write_str(known.name()),
        }
    }
}

/// Who controls a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerType {
    /// Unused slot (0).
    Inactive,
    /// Computer player (1).
    Computer,
    /// Human player (2).
    Human,
    /// Rescuable units (3).
    Rescuable,
    /// Computer-controlled slot in a custom map (5).
    ComputerControlled,
    /// Open slot (6).
    Open,
    /// Neutral units (7).
    Neutral,
    /// Closed slot (8).
    Closed,
    /// Any other value.
    Unknown(u8),
}

impl PlayerType {
    /// Decodes a player type byte.
    #[must_use]
    pub fn from_byte(value: u8) -> Self {
        match value {
            0 => PlayerType::Inactive,
            1 => PlayerType::Computer,
            2 => PlayerType::Human,
            3 => PlayerType::Rescuable,
            5 => PlayerType::ComputerControlled,
            6 => PlayerType::Open,
            7 => PlayerType::Neutral,
            8 => PlayerType::Closed,
            other => PlayerType::Unknown(other),
        }
    }

    /// Returns whether the slot is controlled by someone.
    #[must_use]
    pub fn is_participant(&self) -> bool {
        matches!(
            self,
            PlayerType::Human | PlayerType::Computer | PlayerType::ComputerControlled
        )
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerType::Inactive => f.write_str("Inactive"),
            PlayerType::Computer => f.write_str("Computer"),
            PlayerType::Human => f.write_str("Human"),
            PlayerType::Rescuable => f.write_str("Rescuable"),
            PlayerType::ComputerControlled => f.write_str("Computer (controlled)"),
            PlayerType::Open => f.write_str("Open"),
            PlayerType::Neutral => f.write_str("Neutral"),
            PlayerType::Closed => f.write_str("Closed"),
            PlayerType::Unknown(value) => write!(f, "Unknown({value})"),
        }
    }
}

/// One decoded slot record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    /// Slot id.
    pub slot_id: u32,
    /// Player id used in command heads.
    pub player_id: u32,
    /// Who controls the slot.
    pub player_type: PlayerType,
    /// Chosen race.
    pub race: Race,
    /// Team number.
    pub team: u8,
    /// Name bytes as stored.
    pub name: [u8; PLAYER_NAME_SIZE],
}

impl PlayerSlot {
    /// Parses one 36-byte slot record.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if `data` is shorter than a record.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < PLAYER_RECORD_SIZE {
            return Err(ParserError::unexpected_eof(PLAYER_RECORD_SIZE, data.len()));
        }

        let mut cursor = ByteCursor::new(data);
        Ok(PlayerSlot {
            slot_id: cursor.read_u32_le()?,
            player_id: cursor.read_u32_le()?,
            player_type: PlayerType::from_byte(cursor.read_u8()?),
            race: Race::from_byte(cursor.read_u8()?),
            team: cursor.read_u8()?,
            name: cursor.read_array()?,
        })
    }

    /// Returns the name as text, cut at the first NUL.
    #[must_use]
    pub fn name(&self) -> String {
        fixed_str_lossy(&self.name)
    }

    /// Returns whether the slot holds a named participant.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.player_type.is_participant() && self.name[0] != 0
    }
}
