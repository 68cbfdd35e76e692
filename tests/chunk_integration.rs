//! Integration tests for the chunk container codec.

mod common;

use proptest::prelude::*;

use common::{chunk_from_blocks, compress, raw_chunk, zlib_chunk};
use rep_parser::format::ZLIB_MAGIC;
use rep_parser::{decode_chunk, ErrorKind, ParserError};

// ============================================================================
// Round Trips
// ============================================================================

fn sub_block() -> impl Strategy<Value = (Vec<u8>, bool)> {
    (prop::collection::vec(any::<u8>(), 0..512), any::<bool>())
}

proptest! {
    #[test]
    fn mixed_sub_blocks_round_trip(
        blocks in prop::collection::vec(sub_block(), 0..8),
        trailing in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        // A raw payload that happens to open with the zlib magic would be
        // inflated, so it cannot stand for itself.
        prop_assume!(blocks
            .iter()
            .all(|(data, compressed)| *compressed || !data.starts_with(&ZLIB_MAGIC)));

        let encoded: Vec<Vec<u8>> = blocks
            .iter()
            .map(|(data, compressed)| if *compressed { compress(data) } else { data.clone() })
            .collect();
        let expected: Vec<u8> = blocks.iter().flat_map(|(data, _)| data.iter().copied()).collect();

        let mut file = chunk_from_blocks(0, &encoded);
        let span = file.len();
        file.extend_from_slice(&trailing);

        let (chunk, consumed) = decode_chunk(&file, 0).unwrap();
        prop_assert_eq!(consumed, span);
        prop_assert_eq!(chunk.encoded_len(), span);
        prop_assert_eq!(&chunk.raw, &expected);
        prop_assert_eq!(chunk.sub_blocks.len(), blocks.len());
        for (info, (data, compressed)) in chunk.sub_blocks.iter().zip(&blocks) {
            prop_assert_eq!(info.compressed, *compressed);
            prop_assert_eq!(info.decoded_len, data.len());
        }
    }

    #[test]
    fn every_proper_prefix_is_truncation(
        payload in prop::collection::vec(any::<u8>(), 1..256),
        compressed in any::<bool>(),
    ) {
        prop_assume!(compressed || !payload.starts_with(&ZLIB_MAGIC));
        let file = if compressed { zlib_chunk(&payload) } else { raw_chunk(&payload) };

        for cut in 0..file.len() {
            let err = decode_chunk(&file[..cut], 0).unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        }
    }
}

// ============================================================================
// Offsets and Sequencing
// ============================================================================

#[test]
fn test_consecutive_chunks_advance_by_encoded_length() {
    let first = zlib_chunk(&[0xAB; 4096]);
    let second = raw_chunk(b"next");

    let mut file = first.clone();
    file.extend_from_slice(&second);

    let (chunk, consumed) = decode_chunk(&file, 0).unwrap();
    assert_eq!(chunk.raw.len(), 4096);
    assert_eq!(consumed, first.len());
    assert!(consumed < 4096);

    let (chunk, consumed) = decode_chunk(&file, consumed).unwrap();
    assert_eq!(chunk.raw, b"next");
    assert_eq!(consumed, second.len());
}

#[test]
fn test_offset_past_end_is_truncation() {
    let file = raw_chunk(b"abcd");
    let err = decode_chunk(&file, file.len() + 10).unwrap_err();
    assert!(matches!(err, ParserError::TruncatedMeta { available: 0, .. }));
}

#[test]
fn test_zero_sub_blocks() {
    let file = chunk_from_blocks(0, &[]);
    let (chunk, consumed) = decode_chunk(&file, 0).unwrap();
    assert!(chunk.raw.is_empty());
    assert_eq!(consumed, 8);
}

// ============================================================================
// Corruption
// ============================================================================

#[test]
fn test_corrupt_zlib_payload() {
    let mut payload = compress(&[7u8; 200]);
    // Keep the magic, clobber the deflate data.
    for byte in &mut payload[2..] {
        *byte = 0xFF;
    }
    let file = chunk_from_blocks(0, &[payload]);

    let err = decode_chunk(&file, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecompressionFailed);
}

#[test]
fn test_zlib_stream_cut_inside_sub_block() {
    let full = compress(&(0..=255u8).cycle().take(2000).collect::<Vec<_>>());
    let cut = full[..full.len() / 2].to_vec();
    let file = chunk_from_blocks(0, &[cut]);

    let err = decode_chunk(&file, 0).unwrap_err();
    assert!(matches!(err, ParserError::InflateFailed { index: 0, .. }));
}

#[test]
fn test_negative_length_field() {
    let mut file = Vec::new();
    file.extend_from_slice(&0u32.to_le_bytes());
    file.extend_from_slice(&1u32.to_le_bytes());
    file.extend_from_slice(&(-4i32).to_le_bytes());
    file.extend_from_slice(&[0u8; 4]);

    let err = decode_chunk(&file, 0).unwrap_err();
    assert!(matches!(
        err,
        ParserError::NegativeSubBlockLength { length: -4, .. }
    ));
    assert!(err.is_truncation());
}

#[test]
fn test_sub_block_count_larger_than_data() {
    let mut file = raw_chunk(b"only one");
    file[4..8].copy_from_slice(&u32::MAX.to_le_bytes());

    let err = decode_chunk(&file, 0).unwrap_err();
    assert!(matches!(
        err,
        ParserError::TruncatedSubBlockLength { index: 1, .. }
    ));
}

// ============================================================================
// Checksums
// ============================================================================

#[test]
fn test_checksum_matches_crc32_of_decoded_bytes() {
    let payload = b"checksummed payload".to_vec();
    let crc = crc32fast::hash(&payload);

    let good = chunk_from_blocks(crc, &[compress(&payload)]);
    let (chunk, _) = decode_chunk(&good, 0).unwrap();
    assert_eq!(chunk.checksum, crc);
    assert!(chunk.checksum_matches());

    let bad = chunk_from_blocks(crc ^ 1, &[payload]);
    let (chunk, _) = decode_chunk(&bad, 0).unwrap();
    assert!(!chunk.checksum_matches());
    assert_eq!(chunk.computed_checksum(), crc);
}
