//! Integration tests for command stream decoding.

mod common;

use common::frame;
use rep_parser::commands::opcode::{self, SAVE_NAME_MAX};
use rep_parser::commands::{
    Hotkey, HotkeyOperation, Position, RightClick, Selection, SelectionMode,
};
use rep_parser::{
    decode_command_stream, CommandKind, CommandStatistics, FrameDecoder, ParserError,
    COMMAND_SPECS,
};

/// Builds one command record for every opcode in the table, with a minimal
/// body: zero-filled fixed bodies, empty counted tails and an empty name.
fn minimal_record(player_id: u8, op: u8) -> Vec<u8> {
    let spec = rep_parser::commands::lookup(op).unwrap();
    let mut record = vec![player_id, op];
    // Fixed bodies are zeros; a zero count byte or a leading NUL name also
    // ends a variable tail immediately.
    let filler = spec.required_len(&[0u8; 64]) - 2;
    record.resize(2 + filler, 0);
    record
}

// ============================================================================
// Whole-stream Decoding
// ============================================================================

#[test]
fn test_every_opcode_in_one_stream() {
    let records: Vec<Vec<u8>> = COMMAND_SPECS
        .iter()
        .enumerate()
        .map(|(i, spec)| minimal_record(u8::try_from(i % 8).unwrap(), spec.opcode))
        .collect();
    let refs: Vec<&[u8]> = records.iter().map(Vec::as_slice).collect();

    let mut data = Vec::new();
    for (tick, chunk) in refs.chunks(10).enumerate() {
        data.extend(frame(u32::try_from(tick).unwrap() * 8, chunk));
    }

    let frames = decode_command_stream(&data).unwrap();
    let decoded: Vec<_> = frames.iter().flat_map(|f| &f.commands).collect();
    assert_eq!(decoded.len(), COMMAND_SPECS.len());

    for (command, spec) in decoded.iter().zip(COMMAND_SPECS.iter()) {
        assert_eq!(command.opcode, spec.opcode);
        assert_eq!(command.name(), spec.name);
        assert!(command.kind().is_ok(), "{} failed to decode", spec.name);
    }

    let consumed: usize = frames.iter().map(|f| f.encoded_len()).sum();
    assert_eq!(consumed, data.len());
}

#[test]
fn test_mixed_stream() {
    let select: &[u8] = &[0x00, opcode::SELECT, 2, 0x34, 0x12, 0x78, 0x56];
    let right_click: &[u8] = &[
        0x00,
        opcode::RIGHT_CLICK,
        0x10, 0x00, 0x20, 0x00, // position
        0x00, 0x00, // target
        0xE4, 0x00, // unit type
        0x01, // queued
    ];
    let hotkey: &[u8] = &[0x01, opcode::HOTKEY, 0x00, 0x04];
    let save: &[u8] = &[0x00, opcode::SAVE_GAME, 0x01, 0x00, 0x00, 0x00, b'a', b'b', 0x00];

    let mut data = frame(0, &[select, right_click]);
    data.extend(frame(12, &[hotkey, save]));

    let frames = decode_command_stream(&data).unwrap();
    assert_eq!(frames.len(), 2);

    let kinds: Vec<CommandKind> = frames
        .iter()
        .flat_map(|f| &f.commands)
        .map(|c| c.kind().unwrap())
        .collect();

    assert_eq!(
        kinds[0],
        CommandKind::Select(Selection {
            mode: SelectionMode::Replace,
            wide: false,
            unit_tags: vec![0x1234, 0x5678],
        })
    );
    assert_eq!(
        kinds[1],
        CommandKind::RightClick(RightClick {
            position: Position { x: 0x10, y: 0x20 },
            target_tag: 0,
            unit_type: 0xE4,
            queued: true,
        })
    );
    assert_eq!(
        kinds[2],
        CommandKind::Hotkey(Hotkey {
            operation: HotkeyOperation::Assign,
            group: 4,
        })
    );
    assert_eq!(
        kinds[3],
        CommandKind::SaveGame {
            save_info: 1,
            file_name: b"ab".to_vec(),
        }
    );

    assert_eq!(frames[0].commands[0].payload, vec![2, 0x34, 0x12, 0x78, 0x56]);
    assert_eq!(frames[1].commands[1].encoded_len(), save.len());
}

#[test]
fn test_wide_selection_keeps_tags() {
    let record: &[u8] = &[
        0x03,
        opcode::SELECT_REMOVE_121,
        2,
        0x01, 0x00, 0xAA, 0xBB,
        0x02, 0x00, 0xCC, 0xDD,
    ];
    let frames = decode_command_stream(&frame(5, &[record])).unwrap();
    let command = &frames[0].commands[0];

    assert_eq!(command.player_id, 3);
    assert_eq!(
        command.kind().unwrap(),
        CommandKind::Select(Selection {
            mode: SelectionMode::Remove,
            wide: true,
            unit_tags: vec![1, 2],
        })
    );
}

#[test]
fn test_counted_tail_uses_live_count() {
    // Count 3 but only two elements before the stream ends.
    let record: &[u8] = &[0x00, opcode::SELECT_ADD, 3, 0x01, 0x00, 0x02, 0x00];
    let err = decode_command_stream(&frame(0, &[record])).unwrap_err();

    assert!(matches!(
        err,
        ParserError::TruncatedCommand {
            offset: 5,
            opcode: Some(opcode::SELECT_ADD),
            needed: 9,
            available: 7,
        }
    ));
    assert!(err.is_truncation());
}

#[test]
fn test_save_name_without_terminator() {
    let mut record = vec![0x00, opcode::LOAD_GAME, 0, 0, 0, 0];
    record.extend(std::iter::repeat(b'x').take(usize::from(SAVE_NAME_MAX)));
    let frames = decode_command_stream(&frame(0, &[&record])).unwrap();

    match frames[0].commands[0].kind().unwrap() {
        CommandKind::LoadGame { file_name, .. } => {
            assert_eq!(file_name.len(), usize::from(SAVE_NAME_MAX));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_save_name_cut_short() {
    let record: &[u8] = &[0x00, opcode::SAVE_GAME, 0, 0, 0, 0, b'a', b'b'];
    let err = decode_command_stream(&frame(0, &[record])).unwrap_err();
    assert!(matches!(
        err,
        ParserError::TruncatedCommand {
            opcode: Some(opcode::SAVE_GAME),
            ..
        }
    ));
}

// ============================================================================
// Frame Boundaries
// ============================================================================

#[test]
fn test_partial_frame_header() {
    let mut data = frame(0, &[&[0x00, opcode::KEEP_ALIVE]]);
    data.extend_from_slice(&[0x01, 0x00, 0x00]);

    let mut decoder = FrameDecoder::new(&data);
    assert!(decoder.next().unwrap().is_ok());
    assert_eq!(decoder.offset(), 7);

    let err = decoder.next().unwrap().unwrap_err();
    assert!(matches!(
        err,
        ParserError::TruncatedFrameHeader {
            offset: 7,
            available: 3,
        }
    ));
    assert!(decoder.next().is_none());
}

#[test]
fn test_missing_command_head() {
    let mut data = 0u32.to_le_bytes().to_vec();
    data.push(2);
    data.extend_from_slice(&[0x00, opcode::PAUSE, 0x01]);

    let err = decode_command_stream(&data).unwrap_err();
    assert!(matches!(
        err,
        ParserError::TruncatedCommand {
            offset: 7,
            opcode: None,
            needed: 2,
            available: 1,
        }
    ));
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_statistics_over_stream() {
    let stop: &[u8] = &[0x00, opcode::STOP, 0x00];
    let keep_alive: &[u8] = &[0x01, opcode::KEEP_ALIVE];
    let train: &[u8] = &[0x01, opcode::TRAIN, 0x40, 0x00];

    let mut data = frame(0, &[stop, keep_alive]);
    data.extend(frame(714, &[stop, train, keep_alive]));

    let frames = decode_command_stream(&data).unwrap();
    let stats = CommandStatistics::from_frames(&frames);

    assert_eq!(stats.total_frames, 2);
    assert_eq!(stats.total_commands, 5);
    assert_eq!(stats.unit_orders, 3);
    assert_eq!(stats.commands_per_player.get(&0), Some(&2));
    assert_eq!(stats.commands_per_player.get(&1), Some(&3));
    assert_eq!(stats.orders_per_player.get(&1), Some(&1));
    assert_eq!(stats.last_tick, 714);
    assert_eq!(
        stats.most_common(2),
        vec![(opcode::KEEP_ALIVE, 2), (opcode::STOP, 2)]
    );

    // 714 frames * 42 ms = 29.988 s, so two orders come to just over 4 per minute.
    let opm = stats.orders_per_minute(0);
    assert!((opm - 4.0016).abs() < 0.001, "{opm}");
}
