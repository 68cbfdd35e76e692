//! Builders for synthetic replay files shared by the integration tests.

#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use rep_parser::format::HEADER_SIZE;

/// Compresses `data` into a zlib stream starting with `78 9C`.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Encodes a chunk from already-encoded sub-block payloads.
pub fn chunk_from_blocks(checksum: u32, blocks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&checksum.to_le_bytes());
    out.extend_from_slice(&u32::try_from(blocks.len()).unwrap().to_le_bytes());
    for block in blocks {
        out.extend_from_slice(&i32::try_from(block.len()).unwrap().to_le_bytes());
        out.extend_from_slice(block);
    }
    out
}

/// Encodes a chunk with one uncompressed sub-block.
pub fn raw_chunk(payload: &[u8]) -> Vec<u8> {
    chunk_from_blocks(0, &[payload.to_vec()])
}

/// Encodes a chunk with one zlib sub-block.
pub fn zlib_chunk(payload: &[u8]) -> Vec<u8> {
    chunk_from_blocks(0, &[compress(payload)])
}

/// Builds a header record for a Brood War game on a 128x128 map with two
/// human players.
pub fn header_bytes() -> Vec<u8> {
    let mut raw = vec![0u8; HEADER_SIZE];
    raw[0x000] = 1;
    raw[0x001..0x005].copy_from_slice(&2400u32.to_le_bytes());
    raw[0x018..0x018 + 9].copy_from_slice(b"Test Game");
    raw[0x034..0x036].copy_from_slice(&128u16.to_le_bytes());
    raw[0x036..0x038].copy_from_slice(&128u16.to_le_bytes());
    raw[0x048..0x048 + 5].copy_from_slice(b"Alice");
    raw[0x061..0x061 + 13].copy_from_slice(b"Lost Temple\0\0");

    player(&mut raw, 0, 0, 0, b"Alice");
    player(&mut raw, 1, 1, 1, b"Bob");
    raw
}

fn player(raw: &mut [u8], slot: u32, id: u32, race: u8, name: &[u8]) {
    let base = 0x0A1 + slot as usize * 36;
    raw[base..base + 4].copy_from_slice(&slot.to_le_bytes());
    raw[base + 4..base + 8].copy_from_slice(&id.to_le_bytes());
    raw[base + 8] = 2;
    raw[base + 9] = race;
    raw[base + 10] = u8::try_from(slot).unwrap() + 1;
    raw[base + 11..base + 11 + name.len()].copy_from_slice(name);
}

/// Encodes one frame holding the given command records (head included).
pub fn frame(tick: u32, commands: &[&[u8]]) -> Vec<u8> {
    let mut out = tick.to_le_bytes().to_vec();
    out.push(u8::try_from(commands.len()).unwrap());
    for command in commands {
        out.extend_from_slice(command);
    }
    out
}

/// Encodes a section: a raw `u32` declaring `payload.len()`, then the
/// payload chunk.
pub fn section(payload: &[u8], compressed: bool) -> Vec<u8> {
    let mut out = u32::try_from(payload.len()).unwrap().to_le_bytes().to_vec();
    if compressed {
        out.extend(zlib_chunk(payload));
    } else {
        out.extend(raw_chunk(payload));
    }
    out
}

/// Assembles a replay file piece by piece.
#[derive(Debug, Clone)]
pub struct ReplayBuilder {
    pub replay_id: Vec<u8>,
    pub gap: u32,
    pub header: Vec<u8>,
    pub commands: Vec<u8>,
    pub map_data: Option<Vec<u8>>,
    pub compressed: bool,
    pub trailing: Vec<u8>,
}

impl Default for ReplayBuilder {
    fn default() -> Self {
        Self {
            replay_id: b"seRS".to_vec(),
            gap: 0,
            header: header_bytes(),
            // One frame at tick 0 with a single keep-alive from player 0.
            commands: frame(0, &[&[0x00, 0x05]]),
            map_data: None,
            compressed: true,
            trailing: Vec::new(),
        }
    }
}

impl ReplayBuilder {
    /// Encodes everything up to and including the gap.
    pub fn preamble(&self) -> Vec<u8> {
        let mut out = raw_chunk(&self.replay_id);
        out.extend_from_slice(&self.gap.to_le_bytes());
        out
    }

    /// Encodes the replay id, gap and header.
    pub fn through_header(&self) -> Vec<u8> {
        let mut out = self.preamble();
        if self.compressed {
            out.extend(zlib_chunk(&self.header));
        } else {
            out.extend(raw_chunk(&self.header));
        }
        out
    }

    /// Encodes the full file.
    pub fn build(&self) -> Vec<u8> {
        let mut out = self.through_header();
        out.extend(section(&self.commands, self.compressed));
        if let Some(map) = &self.map_data {
            out.extend(section(map, self.compressed));
        }
        out.extend_from_slice(&self.trailing);
        out
    }
}
