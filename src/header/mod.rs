//! The replay id token and the fixed-layout replay header.
//!
//! The header is a packed 0x279-byte record. Fields are read at explicit
//! offsets; the raw bytes are kept so the record can be reproduced exactly.
//!
//! # Header Layout (0x279 bytes)
//!
//! | Offset | Size | Field | Description |
//! |--------|------|-------|-------------|
//! | 0x000 | 1 | `engine` | 0 = StarCraft, 1 = Brood War |
//! | 0x001 | 4 | `game_frames` | Length of the game in frames |
//! | 0x005 | 3 | | Unknown |
//! | 0x008 | 4 | `save_time` | Unix timestamp |
//! | 0x00C | 12 | | Unknown |
//! | 0x018 | 28 | `game_name` | NUL padded |
//! | 0x034 | 2 | `map_width` | Tiles |
//! | 0x036 | 2 | `map_height` | Tiles |
//! | 0x038 | 16 | | Unknown |
//! | 0x048 | 24 | `creator` | NUL padded |
//! | 0x060 | 1 | | Unknown |
//! | 0x061 | 26 | `map_name` | NUL padded |
//! | 0x07B | 38 | | Unknown |
//! | 0x0A1 | 432 | `players` | 12 slot records of 36 bytes |
//! | 0x251 | 32 | `player_colors` | 8 × u32 |
//! | 0x271 | 8 | `player_indices` | 8 × u8 |
//!
//! # Example
//!
//! ```
//! use rep_parser::header::{decode_replay_id, ReplayHeader, Engine};
//! use rep_parser::format::HEADER_SIZE;
//!
//! let id = decode_replay_id(b"seRS").unwrap();
//! assert!(id.is_known_marker());
//!
//! let mut raw = vec![0u8; HEADER_SIZE];
//! raw[0] = 1;
//! let header = ReplayHeader::parse(&raw).unwrap();
//! assert_eq!(header.engine, Engine::BroodWar);
//! assert_eq!(header.as_bytes(), &raw[..]);
//! ```

pub mod player;

pub use player::{PlayerSlot, PlayerType, Race, PLAYER_RECORD_SIZE, PLAYER_SLOT_COUNT};

use std::fmt;

use crate::binary::{fixed_str_lossy, read_array, read_u16_le, read_u32_le, read_u8};
use crate::error::{ParserError, Result};
use crate::format::{HEADER_SIZE, MARKER_RERS, MARKER_SERS, MILLIS_PER_FRAME, REPLAY_ID_SIZE};

const ENGINE_OFFSET: usize = 0x000;
const GAME_FRAMES_OFFSET: usize = 0x001;
const SAVE_TIME_OFFSET: usize = 0x008;
const GAME_NAME_OFFSET: usize = 0x018;
const MAP_WIDTH_OFFSET: usize = 0x034;
const MAP_HEIGHT_OFFSET: usize = 0x036;
const CREATOR_OFFSET: usize = 0x048;
const MAP_NAME_OFFSET: usize = 0x061;
const PLAYERS_OFFSET: usize = 0x0A1;
const COLORS_OFFSET: usize = 0x251;
const INDICES_OFFSET: usize = 0x271;

/// The four-byte token that opens a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplayId(pub [u8; REPLAY_ID_SIZE]);

impl ReplayId {
    /// Returns the token bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; REPLAY_ID_SIZE] {
        &self.0
    }

    /// Returns whether the token is one of the markers written by the game.
    #[must_use]
    pub fn is_known_marker(&self) -> bool {
        &self.0 == MARKER_SERS || &self.0 == MARKER_RERS
    }
}

impl fmt::Display for ReplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(u8::is_ascii_graphic) {
            for &b in &self.0 {
                write!(f, "{}", char::from(b))?;
            }
            Ok(())
        } else {
            for &b in &self.0 {
                write!(f, "{b:02x}")?;
            }
            Ok(())
        }
    }
}

/// Validates the decoded replay id chunk.
///
/// The content is not checked; use [`ReplayId::is_known_marker`] for that.
///
/// # Errors
///
/// Returns `ParserError::BadReplayIdLength` unless `raw` is exactly 4 bytes.
pub fn decode_replay_id(raw: &[u8]) -> Result<ReplayId> {
    let bytes: [u8; REPLAY_ID_SIZE] = raw
        .try_into()
        .map_err(|_| ParserError::BadReplayIdLength { length: raw.len() })?;
    Ok(ReplayId(bytes))
}

/// The game engine that recorded the replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    /// Original StarCraft (0).
    StarCraft,
    /// Brood War expansion (1).
    BroodWar,
    /// Any other value.
    Unknown(u8),
}

impl Engine {
    /// Decodes the engine byte.
    #[must_use]
    pub fn from_byte(value: u8) -> Self {
        match value {
            0 => Engine::StarCraft,
            1 => Engine::BroodWar,
            other => Engine::Unknown(other),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::StarCraft => f.write_str("StarCraft"),
            Engine::BroodWar => f.write_str("Brood War"),
            Engine::Unknown(value) => write!(f, "Unknown({value})"),
        }
    }
}

/// The decoded replay header.
///
/// Text fields are stored as their raw fixed-width bytes; the accessor
/// methods trim them at the first NUL for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayHeader {
    /// Engine at offset 0x000.
    pub engine: Engine,

    /// Game length in frames at offset 0x001.
    pub game_frames: u32,

    /// Save time (unix seconds) at offset 0x008.
    pub save_time: u32,

    /// Game name at offset 0x018.
    pub game_name: [u8; 28],

    /// Map width at offset 0x034.
    pub map_width: u16,

    /// Map height at offset 0x036.
    pub map_height: u16,

    /// Creator name at offset 0x048.
    pub creator: [u8; 24],

    /// Map name at offset 0x061.
    pub map_name: [u8; 26],

    /// The twelve slot records at offset 0x0A1.
    pub players: Vec<PlayerSlot>,

    /// Player colors at offset 0x251.
    pub player_colors: [u32; 8],

    /// Player indices at offset 0x271.
    pub player_indices: [u8; 8],

    raw: Vec<u8>,
}

impl ReplayHeader {
    /// Parses the decoded header chunk.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::BadHeaderLength` unless `raw` is exactly 0x279
    /// bytes long.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.len() != HEADER_SIZE {
            return Err(ParserError::BadHeaderLength { length: raw.len() });
        }

        let players = (0..PLAYER_SLOT_COUNT)
            .map(|i| PlayerSlot::parse(&raw[PLAYERS_OFFSET + i * PLAYER_RECORD_SIZE..]))
            .collect::<Result<Vec<_>>>()?;

        let mut player_colors = [0u32; 8];
        for (i, color) in player_colors.iter_mut().enumerate() {
            *color = read_u32_le(raw, COLORS_OFFSET + i * 4)?;
        }

        Ok(ReplayHeader {
            engine: Engine::from_byte(read_u8(raw, ENGINE_OFFSET)?),
            game_frames: read_u32_le(raw, GAME_FRAMES_OFFSET)?,
            save_time: read_u32_le(raw, SAVE_TIME_OFFSET)?,
            game_name: read_array(raw, GAME_NAME_OFFSET)?,
            map_width: read_u16_le(raw, MAP_WIDTH_OFFSET)?,
            map_height: read_u16_le(raw, MAP_HEIGHT_OFFSET)?,
            creator: read_array(raw, CREATOR_OFFSET)?,
            map_name: read_array(raw, MAP_NAME_OFFSET)?,
            players,
            player_colors,
            player_indices: read_array(raw, INDICES_OFFSET)?,
            raw: raw.to_vec(),
        })
    }

    /// Returns the header exactly as decoded.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Returns the game name as text.
    #[must_use]
    pub fn game_name(&self) -> String {
        fixed_str_lossy(&self.game_name)
    }

    /// Returns the creator name as text.
    #[must_use]
    pub fn creator(&self) -> String {
        fixed_str_lossy(&self.creator)
    }

    /// Returns the map name as text.
    #[must_use]
    pub fn map_name(&self) -> String {
        fixed_str_lossy(&self.map_name)
    }

    /// Returns the slots that hold a named participant.
    pub fn active_players(&self) -> impl Iterator<Item = &PlayerSlot> {
        self.players.iter().filter(|p| p.is_active())
    }

    /// Returns the approximate game length in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.game_frames) * MILLIS_PER_FRAME
    }

    /// Returns the approximate game length formatted as "HH:MM:SS".
    #[must_use]
    pub fn duration_string(&self) -> String {
        let total_seconds = self.duration_ms() / 1000;
        let seconds = total_seconds % 60;
        let minutes = (total_seconds / 60) % 60;
        let hours = total_seconds / 3600;
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}
