//! # rep-parser
//!
//! A decoder for StarCraft and Brood War replay (`.rep`) files.
//!
//! A replay nests three layers:
//! - a generic **chunk** container whose sub-blocks may be zlib-compressed
//! - a fixed 0x279-byte **header** record describing the match
//! - a **command stream** of frames, each holding player commands whose
//!   lengths come from a per-opcode table
//!
//! ## Quick Start
//!
//! ```no_run
//! use rep_parser::{parse_replay, read_replay_file, Result};
//!
//! fn summarize(path: &str) -> Result<()> {
//!     let data = read_replay_file(path)?;
//!     let replay = parse_replay(&data)?;
//!
//!     println!("Map: {}", replay.header.map_name());
//!     println!("Length: {}", replay.header.duration_string());
//!     for player in replay.header.active_players() {
//!         println!("  {} ({})", player.name(), player.race);
//!     }
//!     println!("{} commands", replay.command_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and result alias for parser operations
//! - [`binary`] - Bounds-checked little-endian readers and [`ByteCursor`]
//! - [`format`] - On-disk constants
//! - [`chunk`] - The chunk container codec
//! - [`header`] - Replay id and fixed-layout header
//! - [`commands`] - Opcode table, frame and command decoding
//! - [`replay`] - Section sequencing into a [`Replay`]
//! - [`dump`] - Text rendering
//!
//! All multi-byte integers are stored in little-endian byte order.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod binary;
pub mod chunk;
pub mod commands;
pub mod dump;
pub mod error;
pub mod format;
pub mod header;
pub mod replay;

// Re-export commonly used types at the crate root
pub use binary::ByteCursor;
pub use chunk::{decode_chunk, Chunk, SubBlockInfo};
pub use commands::{
    decode_command_stream, Command, CommandKind, CommandSpec, CommandStatistics, Frame,
    FrameDecoder, TailRule, COMMAND_SPECS,
};
pub use dump::{render, DumpOptions};
pub use error::{ErrorKind, ParserError, Result, Section};
pub use header::{decode_replay_id, Engine, PlayerSlot, PlayerType, Race, ReplayHeader, ReplayId};
pub use replay::{parse_replay, parse_replay_with, read_replay_file, ParseOptions, Replay};
