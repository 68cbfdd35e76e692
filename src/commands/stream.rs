//! Frame and command stream decoding.
//!
//! The decoded commands section is a sequence of frames:
//!
//! ```text
//! frame:   [ticks_elapsed: 4] [command_count: 1] command*command_count
//! command: [player_id: 1] [opcode: 1] body
//! ```
//!
//! The body length comes from the opcode table. Decoding must end exactly
//! at the end of the buffer; running short anywhere is an error.

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use super::opcode::{lookup, CommandSpec};
use super::types::CommandKind;
use crate::binary::ByteCursor;
use crate::error::{ParserError, Result};
use crate::format::{COMMAND_HEAD_SIZE, FRAME_HEADER_SIZE, MILLIS_PER_FRAME};

/// One player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Player id from the command head.
    pub player_id: u8,
    /// Opcode from the command head.
    pub opcode: u8,
    /// Record body after the 2-byte head.
    pub payload: Vec<u8>,
}

impl Command {
    /// Returns the number of bytes the record occupied, head included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        COMMAND_HEAD_SIZE + self.payload.len()
    }

    /// Returns the table entry for this command's opcode.
    #[must_use]
    pub fn spec(&self) -> Option<&'static CommandSpec> {
        lookup(self.opcode)
    }

    /// Returns the command name, or "Unknown" for opcodes not in the table.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.spec().map_or("Unknown", |spec| spec.name)
    }

    /// Decodes the payload into its typed form.
    ///
    /// # Errors
    ///
    /// - `ParserError::UnknownOpcode` if the opcode is not in the table
    /// - `ParserError::UnexpectedEof` if the payload is shorter than its layout
    pub fn kind(&self) -> Result<CommandKind> {
        CommandKind::decode(self.opcode, &self.payload).map_err(|err| match err {
            ParserError::UnknownOpcode { offset, opcode, .. } => ParserError::UnknownOpcode {
                offset,
                opcode,
                player_id: self.player_id,
            },
            other => other,
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Ok(kind) => write!(f, "P{} {kind}", self.player_id),
            Err(_) => write!(
                f,
                "P{} {} (0x{:02X}, {} bytes)",
                self.player_id,
                self.name(),
                self.opcode,
                self.payload.len()
            ),
        }
    }
}

/// A frame and the commands issued in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Game tick of the frame.
    pub ticks_elapsed: u32,
    /// Commands in record order.
    pub commands: Vec<Command>,
}

impl Frame {
    /// Returns the number of bytes the frame occupied.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_SIZE + self.commands.iter().map(Command::encoded_len).sum::<usize>()
    }
}

/// An iterator that decodes frames from a commands payload.
///
/// After the first error the iterator yields nothing more.
///
/// # Example
///
/// ```
/// use rep_parser::commands::FrameDecoder;
///
/// // Tick 10, one keep-alive from player 0.
/// let data = [0x0A, 0x00, 0x00, 0x00, 0x01, 0x00, 0x05];
/// let frames: Vec<_> = FrameDecoder::new(&data).collect::<Result<_, _>>().unwrap();
/// assert_eq!(frames.len(), 1);
/// assert_eq!(frames[0].ticks_elapsed, 10);
/// ```
#[derive(Debug, Clone)]
pub struct FrameDecoder<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> FrameDecoder<'a> {
    /// Creates a decoder over a decompressed commands payload.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            failed: false,
        }
    }

    /// Returns the offset of the next frame.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of bytes not yet decoded.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Returns whether decoding has finished, successfully or not.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.failed || self.offset >= self.data.len()
    }

    fn decode_frame(&mut self) -> Result<Frame> {
        let start = self.offset;
        let mut cursor = ByteCursor::at(self.data, start);
        if cursor.remaining() < FRAME_HEADER_SIZE {
            return Err(ParserError::TruncatedFrameHeader {
                offset: start,
                available: cursor.remaining(),
            });
        }

        let ticks_elapsed = cursor.read_u32_le()?;
        let command_count = cursor.read_u8()?;

        let mut commands = Vec::with_capacity(usize::from(command_count));
        for _ in 0..command_count {
            commands.push(decode_command(&mut cursor)?);
        }

        trace!(
            offset = start,
            ticks_elapsed,
            command_count,
            "decoded frame"
        );

        self.offset = cursor.offset();
        Ok(Frame {
            ticks_elapsed,
            commands,
        })
    }
}

impl Iterator for FrameDecoder<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }

        let result = self.decode_frame();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

fn decode_command(cursor: &mut ByteCursor<'_>) -> Result<Command> {
    let start = cursor.offset();
    let rest = cursor.rest();

    let (player_id, opcode) = match rest {
        [player_id, opcode, ..] => (*player_id, *opcode),
        _ => {
            return Err(ParserError::TruncatedCommand {
                offset: start,
                opcode: None,
                needed: COMMAND_HEAD_SIZE,
                available: rest.len(),
            })
        }
    };

    let spec = lookup(opcode).ok_or(ParserError::UnknownOpcode {
        offset: start,
        opcode,
        player_id,
    })?;

    let needed = spec.required_len(&rest[COMMAND_HEAD_SIZE..]);
    let record = cursor
        .read_bytes(needed)
        .map_err(|_| ParserError::TruncatedCommand {
            offset: start,
            opcode: Some(opcode),
            needed,
            available: rest.len(),
        })?;

    Ok(Command {
        player_id,
        opcode,
        payload: record[COMMAND_HEAD_SIZE..].to_vec(),
    })
}

/// Decodes an entire commands payload into frames.
///
/// # Errors
///
/// - `ParserError::TruncatedFrameHeader` if fewer than 5 bytes remain for a frame
/// - `ParserError::TruncatedCommand` if a command record runs past the end
/// - `ParserError::UnknownOpcode` if an opcode is not in the table
pub fn decode_command_stream(data: &[u8]) -> Result<Vec<Frame>> {
    FrameDecoder::new(data).collect()
}

/// Aggregate counts over decoded frames.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandStatistics {
    /// Number of frames seen.
    pub total_frames: usize,

    /// Number of commands seen.
    pub total_commands: usize,

    /// Commands that are unit orders (see [`CommandKind::is_unit_order`]).
    pub unit_orders: usize,

    /// Commands per player id.
    pub commands_per_player: BTreeMap<u8, usize>,

    /// Unit orders per player id.
    pub orders_per_player: BTreeMap<u8, usize>,

    /// Commands per opcode.
    pub commands_per_opcode: BTreeMap<u8, usize>,

    /// Highest frame tick seen.
    pub last_tick: u32,
}

impl CommandStatistics {
    /// Creates empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects statistics over a slice of frames.
    #[must_use]
    pub fn from_frames(frames: &[Frame]) -> Self {
        let mut stats = Self::new();
        for frame in frames {
            stats.record_frame(frame);
        }
        stats
    }

    /// Records a frame and its commands.
    pub fn record_frame(&mut self, frame: &Frame) {
        self.total_frames += 1;
        self.last_tick = self.last_tick.max(frame.ticks_elapsed);
        for command in &frame.commands {
            self.record(command);
        }
    }

    /// Records a single command.
    pub fn record(&mut self, command: &Command) {
        self.total_commands += 1;
        *self.commands_per_player.entry(command.player_id).or_insert(0) += 1;
        *self.commands_per_opcode.entry(command.opcode).or_insert(0) += 1;

        if command.kind().is_ok_and(|kind| kind.is_unit_order()) {
            self.unit_orders += 1;
            *self.orders_per_player.entry(command.player_id).or_insert(0) += 1;
        }
    }

    /// Returns the `n` most frequent opcodes, most frequent first.
    #[must_use]
    pub fn most_common(&self, n: usize) -> Vec<(u8, usize)> {
        let mut counts: Vec<_> = self
            .commands_per_opcode
            .iter()
            .map(|(&op, &count)| (op, count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts.truncate(n);
        counts
    }

    /// Returns a player's unit orders per minute over the recorded span.
    #[must_use]
    pub fn orders_per_minute(&self, player_id: u8) -> f64 {
        let orders = self.orders_per_player.get(&player_id).copied().unwrap_or(0);
        let elapsed_ms = u64::from(self.last_tick) * MILLIS_PER_FRAME;
        if elapsed_ms == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let per_minute = orders as f64 * 60_000.0 / elapsed_ms as f64;
        per_minute
    }
}
