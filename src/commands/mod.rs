//! Player command stream decoding.
//!
//! This module turns the decompressed commands section into [`Frame`]s of
//! [`Command`]s, and decodes individual command bodies into [`CommandKind`].
//!
//! # Overview
//!
//! | Opcodes | Kind | Body |
//! |---------|------|------|
//! | 0x09-0x0B, 0x63-0x65 | Selection | count byte + unit tags |
//! | 0x06, 0x07 | Save/load | 4 bytes + NUL-terminated name |
//! | 0x0C | Build | order, position, unit type |
//! | 0x13 | Hotkey | operation, group |
//! | 0x14, 0x60 | Right click | position, target, unit type, queued |
//! | 0x15, 0x61 | Targeted order | position, target, unit type, order, queued |
//! | 0x5C | Chat | sender + 80-byte message |
//!
//! See [`opcode`] for the full table.
//!
//! # Example
//!
//! ```
//! use rep_parser::commands::{decode_command_stream, CommandKind};
//!
//! // Tick 0: player 1 stops (not queued).
//! let data = [0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x1A, 0x00];
//! let frames = decode_command_stream(&data).unwrap();
//! let kind = frames[0].commands[0].kind().unwrap();
//! assert_eq!(kind, CommandKind::Stop { queued: false });
//! ```

mod hotkey;
pub mod opcode;
mod order;
mod selection;
mod stream;
mod types;

pub use hotkey::{Hotkey, HotkeyOperation};
pub use opcode::{lookup, CommandSpec, TailRule, COMMAND_SPECS};
pub use order::{Build, Position, RightClick, TargetedOrder};
pub use selection::{Selection, SelectionMode};
pub use stream::{decode_command_stream, Command, CommandStatistics, Frame, FrameDecoder};
pub use types::{ChatMessage, CommandKind, LeaveReason, CHAT_MESSAGE_SIZE};
