//! The chunk container shared by every replay section.
//!
//! A chunk is laid out as:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00 | 4 | checksum (u32) |
//! | 0x04 | 4 | sub-block count (u32) |
//! | 0x08 | ... | sub-blocks |
//!
//! and each sub-block as an `i32` length followed by that many bytes. A
//! payload that starts with `78 9C` is a zlib stream and is inflated; any
//! other payload is copied as is. The decoded payloads are concatenated in
//! order into [`Chunk::raw`].
//!
//! # Example
//!
//! ```
//! use rep_parser::chunk::decode_chunk;
//!
//! // One raw sub-block holding "seRS".
//! let mut data = vec![0, 0, 0, 0, 1, 0, 0, 0, 4, 0, 0, 0];
//! data.extend_from_slice(b"seRS");
//!
//! let (chunk, consumed) = decode_chunk(&data, 0).unwrap();
//! assert_eq!(chunk.raw, b"seRS");
//! assert_eq!(consumed, data.len());
//! ```

mod inflate;

use tracing::trace;

use crate::binary::ByteCursor;
use crate::error::{ParserError, Result};
use crate::format::{is_zlib_block, CHUNK_META_SIZE, SUB_BLOCK_LENGTH_SIZE};

/// Layout information about one decoded sub-block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubBlockInfo {
    /// Absolute offset of the sub-block payload.
    pub offset: usize,
    /// Payload length as stored in the file.
    pub encoded_len: usize,
    /// Length appended to the chunk's raw bytes.
    pub decoded_len: usize,
    /// Whether the payload was a zlib stream.
    pub compressed: bool,
}

/// A decoded chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Checksum field as stored. Zero means unused.
    pub checksum: u32,
    /// Number of sub-blocks the chunk declared.
    pub sub_block_count: u32,
    /// Concatenated decoded sub-block payloads.
    pub raw: Vec<u8>,
    /// Per sub-block layout, in file order.
    pub sub_blocks: Vec<SubBlockInfo>,
}

impl Chunk {
    /// Returns the number of bytes this chunk occupies in the file.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        CHUNK_META_SIZE
            + self
                .sub_blocks
                .iter()
                .map(|b| SUB_BLOCK_LENGTH_SIZE + b.encoded_len)
                .sum::<usize>()
    }

    /// Returns whether any sub-block was zlib-compressed.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.sub_blocks.iter().any(|b| b.compressed)
    }

    /// Computes the CRC-32 of the decoded bytes.
    #[must_use]
    pub fn computed_checksum(&self) -> u32 {
        crc32fast::hash(&self.raw)
    }

    /// Returns whether the stored checksum agrees with the decoded bytes.
    ///
    /// A stored checksum of zero is treated as absent and always matches.
    #[must_use]
    pub fn checksum_matches(&self) -> bool {
        self.checksum == 0 || self.checksum == self.computed_checksum()
    }
}

/// Decodes the chunk starting at `offset` in `data`.
///
/// Returns the chunk together with the number of bytes it occupied. The
/// count is always measured on encoded lengths, so callers can advance by
/// it regardless of how much the payload inflated.
///
/// # Errors
///
/// - `ParserError::TruncatedMeta` if fewer than 8 bytes remain
/// - `ParserError::TruncatedSubBlockLength` if a length field is cut off
/// - `ParserError::NegativeSubBlockLength` if a length field is negative
/// - `ParserError::TruncatedSubBlockData` if a payload runs past the buffer
/// - `ParserError::InflateFailed` if a zlib payload is corrupt or incomplete
pub fn decode_chunk(data: &[u8], offset: usize) -> Result<(Chunk, usize)> {
    let mut cursor = ByteCursor::at(data, offset);
    if offset > data.len() || cursor.remaining() < CHUNK_META_SIZE {
        return Err(ParserError::TruncatedMeta {
            offset,
            available: data.len().saturating_sub(offset),
        });
    }

    let checksum = cursor.read_u32_le()?;
    let sub_block_count = cursor.read_u32_le()?;

    // Every sub-block needs at least its length field.
    let capacity_hint = (sub_block_count as usize).min(cursor.remaining() / SUB_BLOCK_LENGTH_SIZE);
    let mut sub_blocks = Vec::with_capacity(capacity_hint);
    let mut raw = Vec::new();

    for index in 0..sub_block_count {
        let length_offset = cursor.offset();
        let length = cursor
            .read_i32_le()
            .map_err(|_| ParserError::TruncatedSubBlockLength {
                offset: length_offset,
                index,
                available: cursor.remaining(),
            })?;

        let length = usize::try_from(length).map_err(|_| ParserError::NegativeSubBlockLength {
            offset: length_offset,
            index,
            length,
        })?;

        let payload_offset = cursor.offset();
        let payload = cursor
            .read_bytes(length)
            .map_err(|_| ParserError::TruncatedSubBlockData {
                offset: payload_offset,
                index,
                length,
                available: cursor.remaining(),
            })?;

        let compressed = is_zlib_block(payload);
        let decoded_len = if compressed {
            inflate::inflate_into(payload, &mut raw).map_err(|e| ParserError::InflateFailed {
                offset: payload_offset,
                index,
                reason: e.to_string(),
            })?
        } else {
            raw.extend_from_slice(payload);
            length
        };

        trace!(
            index,
            offset = payload_offset,
            encoded_len = length,
            decoded_len,
            compressed,
            "decoded sub-block"
        );

        sub_blocks.push(SubBlockInfo {
            offset: payload_offset,
            encoded_len: length,
            decoded_len,
            compressed,
        });
    }

    let consumed = cursor.offset() - offset;
    Ok((
        Chunk {
            checksum,
            sub_block_count,
            raw,
            sub_blocks,
        },
        consumed,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn compress(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn chunk_bytes(checksum: u32, blocks: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&checksum.to_le_bytes());
        out.extend_from_slice(&(blocks.len() as u32).to_le_bytes());
        for block in blocks {
            out.extend_from_slice(&(block.len() as i32).to_le_bytes());
            out.extend_from_slice(block);
        }
        out
    }

    #[test]
    fn test_decode_raw_sub_blocks() {
        let data = chunk_bytes(0, &[b"abc", b"", b"de"]);
        let (chunk, consumed) = decode_chunk(&data, 0).unwrap();

        assert_eq!(chunk.raw, b"abcde");
        assert_eq!(chunk.sub_block_count, 3);
        assert_eq!(consumed, data.len());
        assert_eq!(chunk.encoded_len(), consumed);
        assert!(!chunk.is_compressed());
        assert_eq!(chunk.sub_blocks[1].encoded_len, 0);
    }

    #[test]
    fn test_decode_compressed_counts_encoded_bytes() {
        let original = vec![0u8; 4096];
        let compressed = compress(&original);
        let data = chunk_bytes(0, &[&compressed]);

        let (chunk, consumed) = decode_chunk(&data, 0).unwrap();

        assert_eq!(chunk.raw, original);
        assert_eq!(consumed, 8 + 4 + compressed.len());
        assert!(consumed < original.len());
        assert!(chunk.is_compressed());
        assert_eq!(chunk.sub_blocks[0].decoded_len, 4096);
    }

    #[test]
    fn test_decode_at_offset() {
        let mut data = vec![0xEE; 3];
        data.extend(chunk_bytes(0, &[b"xy"]));
        data.extend_from_slice(&[0xEE; 5]);

        let (chunk, consumed) = decode_chunk(&data, 3).unwrap();
        assert_eq!(chunk.raw, b"xy");
        assert_eq!(consumed, 14);
        assert_eq!(chunk.sub_blocks[0].offset, 3 + 12);
    }

    #[test]
    fn test_zero_sub_blocks() {
        let data = chunk_bytes(0, &[]);
        let (chunk, consumed) = decode_chunk(&data, 0).unwrap();
        assert!(chunk.raw.is_empty());
        assert_eq!(consumed, 8);
    }

    #[test]
    fn test_truncated_meta() {
        let data = [0u8; 7];
        let result = decode_chunk(&data, 0);
        assert!(matches!(
            result,
            Err(ParserError::TruncatedMeta {
                offset: 0,
                available: 7
            })
        ));

        let result = decode_chunk(&data, 20);
        assert!(matches!(
            result,
            Err(ParserError::TruncatedMeta { available: 0, .. })
        ));
    }

    #[test]
    fn test_truncated_sub_block_length() {
        let mut data = chunk_bytes(0, &[b"ok"]);
        data[4] = 2;
        data.extend_from_slice(&[0x01, 0x00]);

        let result = decode_chunk(&data, 0);
        assert!(matches!(
            result,
            Err(ParserError::TruncatedSubBlockLength {
                index: 1,
                available: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_negative_sub_block_length() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&(-1i32).to_le_bytes());

        let err = decode_chunk(&data, 0).unwrap_err();
        assert!(matches!(
            err,
            ParserError::NegativeSubBlockLength {
                offset: 8,
                length: -1,
                ..
            }
        ));
        assert!(err.is_truncation());
    }

    #[test]
    fn test_truncated_sub_block_data() {
        let mut data = chunk_bytes(0, &[b"abcdef"]);
        data.truncate(data.len() - 1);

        let result = decode_chunk(&data, 0);
        assert!(matches!(
            result,
            Err(ParserError::TruncatedSubBlockData {
                offset: 12,
                length: 6,
                available: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_huge_sub_block_count_fails_cleanly() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        data.extend_from_slice(&0i32.to_le_bytes());

        let result = decode_chunk(&data, 0);
        assert!(matches!(
            result,
            Err(ParserError::TruncatedSubBlockLength { index: 1, .. })
        ));
    }

    #[test]
    fn test_truncated_zlib_payload() {
        let compressed = compress(&b"commands".repeat(64));
        let cut = &compressed[..compressed.len() / 2];
        let data = chunk_bytes(0, &[cut]);

        let err = decode_chunk(&data, 0).unwrap_err();
        assert!(matches!(err, ParserError::InflateFailed { index: 0, .. }));
    }

    #[test]
    fn test_checksum_matches() {
        let data = chunk_bytes(0, &[b"seRS"]);
        let (mut chunk, _) = decode_chunk(&data, 0).unwrap();
        assert!(chunk.checksum_matches());

        chunk.checksum = crc32fast::hash(b"seRS");
        assert!(chunk.checksum_matches());

        chunk.checksum ^= 1;
        assert!(!chunk.checksum_matches());
    }
}
