//! Error types for the replay parser.
//!
//! Every failure is terminal for the parse in progress: decoding stops at the
//! first error and no partially decoded replay is returned. Each variant
//! carries the byte offset at which it was detected where one is known, and
//! [`ParserError::kind`] folds the variants into the coarse [`ErrorKind`]
//! classes used for exit codes and diagnostics.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for replay parsing operations.
///
/// Offsets in chunk and section errors are absolute offsets into the replay
/// buffer. Offsets in frame and command errors are relative to the
/// decompressed commands payload.
///
/// # Example
///
/// ```
/// use rep_parser::error::{ErrorKind, ParserError};
///
/// let err = ParserError::BadHeaderLength { length: 12 };
/// assert_eq!(err.kind(), ErrorKind::LengthMismatch);
/// assert!(err.to_string().contains("12"));
/// ```
#[derive(Error, Debug)]
pub enum ParserError {
    /// The replay file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// The path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The replay file was opened but reading it failed.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The input exceeds the caller's configured size limit.
    #[error("input is {size} bytes, limit is {limit}")]
    InputTooLarge {
        /// Size of the input buffer.
        size: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// Fewer than 8 bytes remain for a chunk's checksum and sub-block count.
    #[error("truncated chunk metadata at offset {offset}: {available} of 8 bytes available")]
    TruncatedMeta {
        /// Offset where the chunk starts.
        offset: usize,
        /// Bytes remaining from that offset.
        available: usize,
    },

    /// Fewer than 4 bytes remain for a sub-block length field.
    #[error("truncated length of sub-block {index} at offset {offset}: {available} of 4 bytes available")]
    TruncatedSubBlockLength {
        /// Offset of the length field.
        offset: usize,
        /// Zero-based sub-block index within the chunk.
        index: u32,
        /// Bytes remaining from that offset.
        available: usize,
    },

    /// A sub-block declares a negative length.
    #[error("sub-block {index} at offset {offset} declares negative length {length}")]
    NegativeSubBlockLength {
        /// Offset of the length field.
        offset: usize,
        /// Zero-based sub-block index within the chunk.
        index: u32,
        /// The declared length.
        length: i32,
    },

    /// A sub-block's declared length runs past the end of the buffer.
    #[error("truncated sub-block {index} at offset {offset}: needs {length} bytes, {available} available")]
    TruncatedSubBlockData {
        /// Offset of the sub-block payload.
        offset: usize,
        /// Zero-based sub-block index within the chunk.
        index: u32,
        /// The declared payload length.
        length: usize,
        /// Bytes remaining from that offset.
        available: usize,
    },

    /// A zlib-wrapped sub-block could not be inflated to its stream end.
    #[error("inflate failed for sub-block {index} at offset {offset}: {reason}")]
    InflateFailed {
        /// Offset of the sub-block payload.
        offset: usize,
        /// Zero-based sub-block index within the chunk.
        index: u32,
        /// Description of the zlib failure.
        reason: String,
    },

    /// The replay-id chunk did not decode to exactly 4 bytes.
    #[error("replay id chunk has {length} raw bytes, expected 4")]
    BadReplayIdLength {
        /// Raw length of the decoded chunk.
        length: usize,
    },

    /// The header chunk did not decode to exactly 0x279 bytes.
    #[error("header chunk has {length} raw bytes, expected 633")]
    BadHeaderLength {
        /// Raw length of the decoded chunk.
        length: usize,
    },

    /// Fewer than 4 bytes remain for the gap field after the replay id.
    #[error("truncated gap field at offset {offset}: {available} of 4 bytes available")]
    TruncatedGap {
        /// Offset of the gap field.
        offset: usize,
        /// Bytes remaining from that offset.
        available: usize,
    },

    /// Fewer than 4 bytes remain for a section's declared length.
    #[error("truncated {section} length at offset {offset}: {available} of 4 bytes available")]
    TruncatedSectionLength {
        /// The section being decoded.
        section: Section,
        /// Offset of the length field.
        offset: usize,
        /// Bytes remaining from that offset.
        available: usize,
    },

    /// A section's data chunk does not match its declared length.
    #[error("{section} data is {actual} bytes, declared {declared}")]
    SectionLengthMismatch {
        /// The section being decoded.
        section: Section,
        /// Length declared by the field before the data chunk.
        declared: u32,
        /// Raw length of the decoded data chunk.
        actual: usize,
    },

    /// Fewer than 5 bytes remain for a frame header.
    #[error("truncated frame header at offset {offset}: {available} of 5 bytes available")]
    TruncatedFrameHeader {
        /// Offset of the frame header within the commands payload.
        offset: usize,
        /// Bytes remaining from that offset.
        available: usize,
    },

    /// A command record runs past the end of the commands payload.
    #[error("truncated command at offset {offset}: needs {needed} bytes, {available} available")]
    TruncatedCommand {
        /// Offset of the command head within the commands payload.
        offset: usize,
        /// Opcode of the command, if its head could be read.
        opcode: Option<u8>,
        /// Bytes the record requires.
        needed: usize,
        /// Bytes remaining from that offset.
        available: usize,
    },

    /// A command opcode is absent from the opcode table.
    #[error("unknown opcode 0x{opcode:02X} from player {player_id} at offset {offset}")]
    UnknownOpcode {
        /// Offset of the command head within the commands payload.
        offset: usize,
        /// The unrecognized opcode.
        opcode: u8,
        /// Player id read from the command head.
        player_id: u8,
    },

    /// A fixed-width read ran past the end of its buffer.
    #[error("unexpected end of data: expected {expected} bytes, but only {available} available")]
    UnexpectedEof {
        /// Bytes required from the start of the buffer.
        expected: usize,
        /// Length of the buffer.
        available: usize,
    },
}

impl ParserError {
    /// Creates an `UnexpectedEof` error with the given sizes.
    #[must_use]
    pub fn unexpected_eof(expected: usize, available: usize) -> Self {
        ParserError::UnexpectedEof {
            expected,
            available,
        }
    }

    /// Classifies this error into its coarse kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParserError::Open { .. } | ParserError::Read { .. } => ErrorKind::Io,
            ParserError::InputTooLarge { .. } => ErrorKind::InputTooLarge,
            ParserError::TruncatedMeta { .. }
            | ParserError::TruncatedSubBlockLength { .. }
            | ParserError::NegativeSubBlockLength { .. }
            | ParserError::TruncatedSubBlockData { .. }
            | ParserError::TruncatedGap { .. }
            | ParserError::TruncatedSectionLength { .. }
            | ParserError::TruncatedFrameHeader { .. }
            | ParserError::TruncatedCommand { .. }
            | ParserError::UnexpectedEof { .. } => ErrorKind::TruncatedInput,
            ParserError::BadReplayIdLength { .. }
            | ParserError::BadHeaderLength { .. }
            | ParserError::SectionLengthMismatch { .. } => ErrorKind::LengthMismatch,
            ParserError::InflateFailed { .. } => ErrorKind::DecompressionFailed,
            ParserError::UnknownOpcode { .. } => ErrorKind::UnknownOpcode,
        }
    }

    /// Returns whether this error means the input ended too early.
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        self.kind() == ErrorKind::TruncatedInput
    }
}

/// Coarse classification of parser errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The replay file could not be opened or read.
    Io,
    /// The input exceeds the configured size limit.
    InputTooLarge,
    /// Some stage found fewer bytes than it requires.
    TruncatedInput,
    /// A decoded length differs from the expected or declared one.
    LengthMismatch,
    /// A zlib stream is malformed or incomplete.
    DecompressionFailed,
    /// The command stream holds an opcode absent from the table.
    UnknownOpcode,
}

impl ErrorKind {
    /// Process exit code reported by the command-line tool for this kind.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Io => 2,
            ErrorKind::TruncatedInput => 3,
            ErrorKind::LengthMismatch => 4,
            ErrorKind::DecompressionFailed => 5,
            ErrorKind::UnknownOpcode => 6,
            ErrorKind::InputTooLarge => 7,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Io => "I/O error",
            ErrorKind::InputTooLarge => "input too large",
            ErrorKind::TruncatedInput => "truncated input",
            ErrorKind::LengthMismatch => "length mismatch",
            ErrorKind::DecompressionFailed => "decompression failed",
            ErrorKind::UnknownOpcode => "unknown opcode",
        };
        f.write_str(name)
    }
}

/// The length-prefixed sections that follow the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// The player command stream.
    Commands,
    /// The embedded map data.
    MapData,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Commands => f.write_str("commands"),
            Section::MapData => f.write_str("map data"),
        }
    }
}

/// A specialized Result type for replay parsing operations.
pub type Result<T> = std::result::Result<T, ParserError>;
