//! On-disk constants for `.rep` replay files.
//!
//! A replay is a sequence of chunks followed by nothing else of interest:
//!
//! | Section | Encoding | Decoded size |
//! |---------|----------|--------------|
//! | Replay id | chunk | 4 bytes |
//! | Gap | raw `u32` | 4 bytes |
//! | Header | chunk | 0x279 bytes |
//! | Commands length | raw `u32` | 4 bytes |
//! | Commands | chunk | declared length |
//! | Map data length | raw `u32` (optional) | 4 bytes |
//! | Map data | chunk (optional) | declared length |
//!
//! # Example
//!
//! ```
//! use rep_parser::format::{is_zlib_block, HEADER_SIZE};
//!
//! assert_eq!(HEADER_SIZE, 633);
//! assert!(is_zlib_block(&[0x78, 0x9C, 0x01]));
//! assert!(!is_zlib_block(&[0x78, 0x01]));
//! ```

/// The two bytes that mark a sub-block as a zlib stream.
pub const ZLIB_MAGIC: [u8; 2] = [0x78, 0x9C];

/// Size of a chunk's checksum and sub-block count fields.
pub const CHUNK_META_SIZE: usize = 8;

/// Size of a sub-block's length prefix.
pub const SUB_BLOCK_LENGTH_SIZE: usize = 4;

/// Decoded size of the replay id chunk.
pub const REPLAY_ID_SIZE: usize = 4;

/// Size of the raw gap field that follows the replay id.
pub const GAP_SIZE: usize = 4;

/// Decoded size of the header chunk.
pub const HEADER_SIZE: usize = 0x279;

/// Size of the raw declared-length field that opens a section.
pub const SECTION_LENGTH_SIZE: usize = 4;

/// Size of a frame header: `ticks_elapsed: u32` and `command_count: u8`.
pub const FRAME_HEADER_SIZE: usize = 5;

/// Size of a command head: `player_id: u8` and `opcode: u8`.
pub const COMMAND_HEAD_SIZE: usize = 2;

/// Replay id written by StarCraft: Brood War 1.18 and earlier.
pub const MARKER_SERS: &[u8; 4] = b"seRS";

/// Replay id written by the remastered client.
pub const MARKER_RERS: &[u8; 4] = b"reRS";

/// Approximate wall-clock length of one game frame at fastest speed.
pub const MILLIS_PER_FRAME: u64 = 42;

/// Returns whether a sub-block payload starts with the zlib magic.
#[must_use]
pub fn is_zlib_block(payload: &[u8]) -> bool {
    payload.starts_with(&ZLIB_MAGIC)
}
