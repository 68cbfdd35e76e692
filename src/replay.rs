//! Whole-replay decoding.
//!
//! [`parse_replay`] walks the sections of a replay in order over a single
//! advancing offset:
//!
//! 1. replay id chunk (4 bytes decoded)
//! 2. gap: a raw `u32`, not chunk-wrapped
//! 3. header chunk (0x279 bytes decoded)
//! 4. commands: a raw `u32` declared length, then a data chunk of exactly
//!    that many decoded bytes
//! 5. map data, with the same shape as the commands section, only when
//!    bytes remain
//!
//! Decoding is all-or-nothing: the first failure is returned and no partial
//! [`Replay`] is produced. Bytes after the map data section are ignored.
//!
//! # Example
//!
//! ```no_run
//! use rep_parser::replay::{parse_replay_with, read_replay_file, ParseOptions};
//!
//! let data = read_replay_file("game.rep")?;
//! let options = ParseOptions {
//!     verify_checksums: true,
//!     ..ParseOptions::default()
//! };
//! let replay = parse_replay_with(&data, &options)?;
//! println!("{} frames on {}", replay.frames.len(), replay.header.map_name());
//! # Ok::<(), rep_parser::error::ParserError>(())
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::binary::read_u32_le;
use crate::chunk::{decode_chunk, Chunk};
use crate::commands::{decode_command_stream, Command, CommandStatistics, Frame};
use crate::error::{ParserError, Result, Section};
use crate::format::{GAP_SIZE, SECTION_LENGTH_SIZE};
use crate::header::{decode_replay_id, ReplayHeader, ReplayId};

/// Options that control decoding.
///
/// The defaults decode everything and never reject input on size or
/// checksum grounds. Options deserialize from JSON with missing fields
/// taking their defaults.
///
/// # Example
///
/// ```
/// use rep_parser::replay::ParseOptions;
///
/// let options: ParseOptions = serde_json::from_str(r#"{"skip_map_data": true}"#).unwrap();
/// assert!(options.skip_map_data);
/// assert!(!options.verify_checksums);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Compare each chunk's stored checksum with the CRC-32 of its decoded
    /// bytes. Mismatches are logged, never fatal.
    pub verify_checksums: bool,

    /// Reject inputs larger than this many bytes before decoding.
    pub max_input_size: Option<usize>,

    /// Stop after the commands section.
    pub skip_map_data: bool,
}

/// A fully decoded replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    /// The replay id token.
    pub replay_id: ReplayId,
    /// The raw gap value that follows the replay id.
    pub gap: u32,
    /// The replay header.
    pub header: ReplayHeader,
    /// Frames of the command stream, in order.
    pub frames: Vec<Frame>,
    /// Opaque map data, when the section was present and decoded.
    pub map_data: Option<Vec<u8>>,
}

impl Replay {
    /// Returns the total number of commands across all frames.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.frames.iter().map(|f| f.commands.len()).sum()
    }

    /// Iterates over every command with its frame tick.
    pub fn commands(&self) -> impl Iterator<Item = (u32, &Command)> {
        self.frames
            .iter()
            .flat_map(|f| f.commands.iter().map(move |c| (f.ticks_elapsed, c)))
    }

    /// Collects command statistics over the whole stream.
    #[must_use]
    pub fn statistics(&self) -> CommandStatistics {
        CommandStatistics::from_frames(&self.frames)
    }
}

/// Reads a replay file into memory.
///
/// # Errors
///
/// - `ParserError::Open` if the file cannot be opened
/// - `ParserError::Read` if reading it fails
pub fn read_replay_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|source| ParserError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|source| ParserError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), size = data.len(), "read replay file");
    Ok(data)
}

/// Decodes a replay with default options.
///
/// # Errors
///
/// Returns the first error encountered; see [`ParserError`].
pub fn parse_replay(data: &[u8]) -> Result<Replay> {
    parse_replay_with(data, &ParseOptions::default())
}

/// Decodes a replay.
///
/// # Errors
///
/// - `ParserError::InputTooLarge` if `data` exceeds `options.max_input_size`
/// - any chunk, header, section or command stream error, see [`ParserError`]
pub fn parse_replay_with(data: &[u8], options: &ParseOptions) -> Result<Replay> {
    if let Some(limit) = options.max_input_size {
        if data.len() > limit {
            return Err(ParserError::InputTooLarge {
                size: data.len(),
                limit,
            });
        }
    }

    let mut seq = Sequencer {
        data,
        offset: 0,
        options,
    };

    let replay_id = decode_replay_id(&seq.chunk("replay id")?.raw)?;
    debug!(%replay_id, known = replay_id.is_known_marker(), "replay id");

    let gap = seq.gap()?;

    let header = ReplayHeader::parse(&seq.chunk("header")?.raw)?;
    debug!(
        engine = %header.engine,
        frames = header.game_frames,
        map = %header.map_name(),
        "header"
    );

    let commands = seq.section(Section::Commands)?;
    let frames = decode_command_stream(&commands)?;
    debug!(frames = frames.len(), "command stream");

    let map_data = if options.skip_map_data || seq.remaining() == 0 {
        None
    } else {
        Some(seq.section(Section::MapData)?)
    };

    if seq.remaining() > 0 {
        debug!(
            offset = seq.offset,
            trailing = seq.remaining(),
            "ignoring trailing bytes"
        );
    }

    Ok(Replay {
        replay_id,
        gap,
        header,
        frames,
        map_data,
    })
}

struct Sequencer<'a> {
    data: &'a [u8],
    offset: usize,
    options: &'a ParseOptions,
}

impl Sequencer<'_> {
    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    fn chunk(&mut self, what: &str) -> Result<Chunk> {
        let start = self.offset;
        let (chunk, consumed) = decode_chunk(self.data, start)?;
        self.offset += consumed;

        debug!(
            what,
            offset = start,
            encoded = consumed,
            decoded = chunk.raw.len(),
            sub_blocks = chunk.sub_block_count,
            "chunk"
        );

        if self.options.verify_checksums && !chunk.checksum_matches() {
            warn!(
                what,
                offset = start,
                stored = format_args!("0x{:08X}", chunk.checksum),
                computed = format_args!("0x{:08X}", chunk.computed_checksum()),
                "chunk checksum mismatch"
            );
        }
        Ok(chunk)
    }

    fn gap(&mut self) -> Result<u32> {
        let value = read_u32_le(self.data, self.offset).map_err(|_| ParserError::TruncatedGap {
            offset: self.offset,
            available: self.remaining(),
        })?;
        self.offset += GAP_SIZE;
        Ok(value)
    }

    fn section(&mut self, section: Section) -> Result<Vec<u8>> {
        let declared = read_u32_le(self.data, self.offset).map_err(|_| {
            ParserError::TruncatedSectionLength {
                section,
                offset: self.offset,
                available: self.remaining(),
            }
        })?;
        self.offset += SECTION_LENGTH_SIZE;

        let body = self.chunk(&section.to_string())?.raw;
        if usize::try_from(declared).ok() != Some(body.len()) {
            return Err(ParserError::SectionLengthMismatch {
                section,
                declared,
                actual: body.len(),
            });
        }
        Ok(body)
    }
}
