//! The static opcode table.
//!
//! Every command record starts with a 2-byte head (`player_id`, `opcode`).
//! The opcode selects a [`CommandSpec`] that tells the stream decoder how
//! many bytes the record occupies. Most records are fixed-size; the
//! selection commands end in a count byte followed by that many elements,
//! and the save/load commands end in a NUL-terminated file name.
//!
//! Lookups go through a 256-entry index built at compile time, so
//! [`lookup`] is a single array access.
//!
//! # Example
//!
//! ```
//! use rep_parser::commands::opcode::{lookup, TailRule, SELECT};
//!
//! let spec = lookup(SELECT).unwrap();
//! assert_eq!(spec.name, "Select");
//! assert!(matches!(spec.variable_tail, Some(TailRule::Counted { .. })));
//! assert!(lookup(0xEE).is_none());
//! ```

use crate::format::COMMAND_HEAD_SIZE;

/// Keep-alive.
pub const KEEP_ALIVE: u8 = 0x05;
/// Save game.
pub const SAVE_GAME: u8 = 0x06;
/// Load game.
pub const LOAD_GAME: u8 = 0x07;
/// Restart game.
pub const RESTART_GAME: u8 = 0x08;
/// Select units.
pub const SELECT: u8 = 0x09;
/// Add units to the selection.
pub const SELECT_ADD: u8 = 0x0A;
/// Remove units from the selection.
pub const SELECT_REMOVE: u8 = 0x0B;
/// Place a building.
pub const BUILD: u8 = 0x0C;
/// Shared vision.
pub const VISION: u8 = 0x0D;
/// Alliance settings.
pub const ALLIANCE: u8 = 0x0E;
/// Game speed.
pub const GAME_SPEED: u8 = 0x0F;
/// Pause.
pub const PAUSE: u8 = 0x10;
/// Resume.
pub const RESUME: u8 = 0x11;
/// Cheat flags.
pub const CHEAT: u8 = 0x12;
/// Control group hotkey.
pub const HOTKEY: u8 = 0x13;
/// Right click.
pub const RIGHT_CLICK: u8 = 0x14;
/// Targeted order.
pub const TARGETED_ORDER: u8 = 0x15;
/// Cancel construction.
pub const CANCEL_BUILD: u8 = 0x18;
/// Cancel morph.
pub const CANCEL_MORPH: u8 = 0x19;
/// Stop.
pub const STOP: u8 = 0x1A;
/// Carrier stop.
pub const CARRIER_STOP: u8 = 0x1B;
/// Reaver stop.
pub const REAVER_STOP: u8 = 0x1C;
/// Order nothing.
pub const ORDER_NOTHING: u8 = 0x1D;
/// Return cargo.
pub const RETURN_CARGO: u8 = 0x1E;
/// Train a unit.
pub const TRAIN: u8 = 0x1F;
/// Cancel training.
pub const CANCEL_TRAIN: u8 = 0x20;
/// Cloak.
pub const CLOAK: u8 = 0x21;
/// Decloak.
pub const DECLOAK: u8 = 0x22;
/// Morph a unit.
pub const UNIT_MORPH: u8 = 0x23;
/// Unsiege.
pub const UNSIEGE: u8 = 0x25;
/// Siege.
pub const SIEGE: u8 = 0x26;
/// Build an interceptor or scarab.
pub const TRAIN_FIGHTER: u8 = 0x27;
/// Unload all.
pub const UNLOAD_ALL: u8 = 0x28;
/// Unload one unit.
pub const UNLOAD: u8 = 0x29;
/// Merge archon.
pub const MERGE_ARCHON: u8 = 0x2A;
/// Hold position.
pub const HOLD_POSITION: u8 = 0x2B;
/// Burrow.
pub const BURROW: u8 = 0x2C;
/// Unburrow.
pub const UNBURROW: u8 = 0x2D;
/// Cancel nuke.
pub const CANCEL_NUKE: u8 = 0x2E;
/// Lift off.
pub const LIFT_OFF: u8 = 0x2F;
/// Research a tech.
pub const TECH: u8 = 0x30;
/// Cancel research.
pub const CANCEL_TECH: u8 = 0x31;
/// Start an upgrade.
pub const UPGRADE: u8 = 0x32;
/// Cancel upgrade.
pub const CANCEL_UPGRADE: u8 = 0x33;
/// Cancel addon.
pub const CANCEL_ADDON: u8 = 0x34;
/// Morph a building.
pub const BUILDING_MORPH: u8 = 0x35;
/// Stim pack.
pub const STIM: u8 = 0x36;
/// Synchronization.
pub const SYNC: u8 = 0x37;
/// Voice enable.
pub const VOICE_ENABLE: u8 = 0x38;
/// Voice disable.
pub const VOICE_DISABLE: u8 = 0x39;
/// Voice squelch.
pub const VOICE_SQUELCH: u8 = 0x3A;
/// Voice unsquelch.
pub const VOICE_UNSQUELCH: u8 = 0x3B;
/// Lobby: start game.
pub const START_GAME: u8 = 0x3C;
/// Lobby: map download percentage.
pub const DOWNLOAD_PERCENTAGE: u8 = 0x3D;
/// Lobby: change game slot.
pub const CHANGE_GAME_SLOT: u8 = 0x3E;
/// Lobby: new net player.
pub const NEW_NET_PLAYER: u8 = 0x3F;
/// Lobby: joined game.
pub const JOINED_GAME: u8 = 0x40;
/// Lobby: change race.
pub const CHANGE_RACE: u8 = 0x41;
/// Lobby: team game team.
pub const TEAM_GAME_TEAM: u8 = 0x42;
/// Lobby: use-map-settings team.
pub const UMS_TEAM: u8 = 0x43;
/// Lobby: melee team.
pub const MELEE_TEAM: u8 = 0x44;
/// Lobby: swap players.
pub const SWAP_PLAYERS: u8 = 0x45;
/// Lobby: saved data.
pub const SAVED_DATA: u8 = 0x48;
/// Briefing start.
pub const BRIEFING_START: u8 = 0x54;
/// Latency setting.
pub const LATENCY: u8 = 0x55;
/// Replay speed.
pub const REPLAY_SPEED: u8 = 0x56;
/// Leave game.
pub const LEAVE_GAME: u8 = 0x57;
/// Minimap ping.
pub const MINIMAP_PING: u8 = 0x58;
/// Merge dark archon.
pub const MERGE_DARK_ARCHON: u8 = 0x5A;
/// Make game public.
pub const MAKE_GAME_PUBLIC: u8 = 0x5B;
/// Chat message.
pub const CHAT: u8 = 0x5C;
/// Right click (1.21 layout).
pub const RIGHT_CLICK_121: u8 = 0x60;
/// Targeted order (1.21 layout).
pub const TARGETED_ORDER_121: u8 = 0x61;
/// Unload one unit (1.21 layout).
pub const UNLOAD_121: u8 = 0x62;
/// Select units (1.21 layout).
pub const SELECT_121: u8 = 0x63;
/// Add units to the selection (1.21 layout).
pub const SELECT_ADD_121: u8 = 0x64;
/// Remove units from the selection (1.21 layout).
pub const SELECT_REMOVE_121: u8 = 0x65;

/// Maximum file name length for save/load, terminator included.
pub const SAVE_NAME_MAX: u16 = 0x100;

/// How a variable-length record ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailRule {
    /// `prefix` fixed bytes, a count byte `k`, then `k * element_size` bytes.
    Counted {
        /// Fixed bytes before the count byte.
        prefix: u8,
        /// Size of each counted element.
        element_size: u8,
    },
    /// `prefix` fixed bytes, then a NUL-terminated string of at most
    /// `max_len` bytes including the terminator.
    NulTerminated {
        /// Fixed bytes before the string.
        prefix: u8,
        /// Longest string the record may carry.
        max_len: u16,
    },
}

/// Schema for one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// The opcode byte.
    pub opcode: u8,
    /// Command name.
    pub name: &'static str,
    /// Record size including the 2-byte head. For variable-length records
    /// this is the largest size the tail rule admits.
    pub encoded_size: u32,
    /// Tail rule for variable-length records.
    pub variable_tail: Option<TailRule>,
}

impl CommandSpec {
    const fn fixed(opcode: u8, name: &'static str, body: u32) -> Self {
        Self {
            opcode,
            name,
            encoded_size: COMMAND_HEAD_SIZE as u32 + body,
            variable_tail: None,
        }
    }

    const fn counted(opcode: u8, name: &'static str, element_size: u8) -> Self {
        Self {
            opcode,
            name,
            encoded_size: COMMAND_HEAD_SIZE as u32 + 1 + 255 * element_size as u32,
            variable_tail: Some(TailRule::Counted {
                prefix: 0,
                element_size,
            }),
        }
    }

    const fn nul_terminated(opcode: u8, name: &'static str, prefix: u8) -> Self {
        Self {
            opcode,
            name,
            encoded_size: COMMAND_HEAD_SIZE as u32 + prefix as u32 + SAVE_NAME_MAX as u32,
            variable_tail: Some(TailRule::NulTerminated {
                prefix,
                max_len: SAVE_NAME_MAX,
            }),
        }
    }

    /// Returns whether the record length depends on its content.
    #[must_use]
    pub fn is_variable(&self) -> bool {
        self.variable_tail.is_some()
    }

    /// Computes the full record length (head included) implied by `body`,
    /// the bytes available after the head.
    ///
    /// The result may exceed `COMMAND_HEAD_SIZE + body.len()`; the caller
    /// treats that as truncation. For counted tails the length comes from
    /// the live count byte, never from [`CommandSpec::encoded_size`]. A
    /// NUL-terminated string that reaches `max_len` without a terminator
    /// occupies exactly `max_len` bytes.
    #[must_use]
    pub fn required_len(&self, body: &[u8]) -> usize {
        match self.variable_tail {
            None => self.encoded_size as usize,
            Some(TailRule::Counted {
                prefix,
                element_size,
            }) => {
                let prefix = usize::from(prefix);
                match body.get(prefix) {
                    Some(&count) => {
                        COMMAND_HEAD_SIZE
                            + prefix
                            + 1
                            + usize::from(count) * usize::from(element_size)
                    }
                    None => COMMAND_HEAD_SIZE + prefix + 1,
                }
            }
            Some(TailRule::NulTerminated { prefix, max_len }) => {
                let prefix = usize::from(prefix);
                let max_len = usize::from(max_len);
                let text = body.get(prefix..).unwrap_or(&[]);
                let window = &text[..text.len().min(max_len)];
                match window.iter().position(|&b| b == 0) {
                    Some(nul) => COMMAND_HEAD_SIZE + prefix + nul + 1,
                    None if window.len() == max_len => COMMAND_HEAD_SIZE + prefix + max_len,
                    // The terminator is beyond the available bytes.
                    None => COMMAND_HEAD_SIZE + prefix.max(body.len()) + 1,
                }
            }
        }
    }
}

const NO_ENTRY: u8 = u8::MAX;

const SPECS: [CommandSpec; 77] = [
    CommandSpec::fixed(KEEP_ALIVE, "KeepAlive", 0),
    CommandSpec::nul_terminated(SAVE_GAME, "SaveGame", 4),
    CommandSpec::nul_terminated(LOAD_GAME, "LoadGame", 4),
    CommandSpec::fixed(RESTART_GAME, "RestartGame", 0),
    CommandSpec::counted(SELECT, "Select", 2),
    CommandSpec::counted(SELECT_ADD, "SelectAdd", 2),
    CommandSpec::counted(SELECT_REMOVE, "SelectRemove", 2),
    CommandSpec::fixed(BUILD, "Build", 7),
    CommandSpec::fixed(VISION, "Vision", 2),
    CommandSpec::fixed(ALLIANCE, "Alliance", 4),
    CommandSpec::fixed(GAME_SPEED, "GameSpeed", 1),
    CommandSpec::fixed(PAUSE, "Pause", 0),
    CommandSpec::fixed(RESUME, "Resume", 0),
    CommandSpec::fixed(CHEAT, "Cheat", 4),
    CommandSpec::fixed(HOTKEY, "Hotkey", 2),
    CommandSpec::fixed(RIGHT_CLICK, "RightClick", 9),
    CommandSpec::fixed(TARGETED_ORDER, "TargetedOrder", 10),
    CommandSpec::fixed(CANCEL_BUILD, "CancelBuild", 0),
    CommandSpec::fixed(CANCEL_MORPH, "CancelMorph", 0),
    CommandSpec::fixed(STOP, "Stop", 1),
    CommandSpec::fixed(CARRIER_STOP, "CarrierStop", 0),
    CommandSpec::fixed(REAVER_STOP, "ReaverStop", 0),
    CommandSpec::fixed(ORDER_NOTHING, "OrderNothing", 0),
    CommandSpec::fixed(RETURN_CARGO, "ReturnCargo", 1),
    CommandSpec::fixed(TRAIN, "Train", 2),
    CommandSpec::fixed(CANCEL_TRAIN, "CancelTrain", 2),
    CommandSpec::fixed(CLOAK, "Cloak", 1),
    CommandSpec::fixed(DECLOAK, "Decloak", 1),
    CommandSpec::fixed(UNIT_MORPH, "UnitMorph", 2),
    CommandSpec::fixed(UNSIEGE, "Unsiege", 1),
    CommandSpec::fixed(SIEGE, "Siege", 1),
    CommandSpec::fixed(TRAIN_FIGHTER, "TrainFighter", 0),
    CommandSpec::fixed(UNLOAD_ALL, "UnloadAll", 1),
    CommandSpec::fixed(UNLOAD, "Unload", 2),
    CommandSpec::fixed(MERGE_ARCHON, "MergeArchon", 0),
    CommandSpec::fixed(HOLD_POSITION, "HoldPosition", 1),
    CommandSpec::fixed(BURROW, "Burrow", 1),
    CommandSpec::fixed(UNBURROW, "Unburrow", 1),
    CommandSpec::fixed(CANCEL_NUKE, "CancelNuke", 0),
    CommandSpec::fixed(LIFT_OFF, "LiftOff", 4),
    CommandSpec::fixed(TECH, "Tech", 1),
    CommandSpec::fixed(CANCEL_TECH, "CancelTech", 0),
    CommandSpec::fixed(UPGRADE, "Upgrade", 1),
    CommandSpec::fixed(CANCEL_UPGRADE, "CancelUpgrade", 0),
    CommandSpec::fixed(CANCEL_ADDON, "CancelAddon", 0),
    CommandSpec::fixed(BUILDING_MORPH, "BuildingMorph", 2),
    CommandSpec::fixed(STIM, "Stim", 0),
    CommandSpec::fixed(SYNC, "Sync", 6),
    CommandSpec::fixed(VOICE_ENABLE, "VoiceEnable", 0),
    CommandSpec::fixed(VOICE_DISABLE, "VoiceDisable", 0),
    CommandSpec::fixed(VOICE_SQUELCH, "VoiceSquelch", 1),
    CommandSpec::fixed(VOICE_UNSQUELCH, "VoiceUnsquelch", 1),
    CommandSpec::fixed(START_GAME, "StartGame", 0),
    CommandSpec::fixed(DOWNLOAD_PERCENTAGE, "DownloadPercentage", 1),
    CommandSpec::fixed(CHANGE_GAME_SLOT, "ChangeGameSlot", 5),
    CommandSpec::fixed(NEW_NET_PLAYER, "NewNetPlayer", 7),
    CommandSpec::fixed(JOINED_GAME, "JoinedGame", 17),
    CommandSpec::fixed(CHANGE_RACE, "ChangeRace", 2),
    CommandSpec::fixed(TEAM_GAME_TEAM, "TeamGameTeam", 1),
    CommandSpec::fixed(UMS_TEAM, "UmsTeam", 1),
    CommandSpec::fixed(MELEE_TEAM, "MeleeTeam", 2),
    CommandSpec::fixed(SWAP_PLAYERS, "SwapPlayers", 2),
    CommandSpec::fixed(SAVED_DATA, "SavedData", 12),
    CommandSpec::fixed(BRIEFING_START, "BriefingStart", 0),
    CommandSpec::fixed(LATENCY, "Latency", 1),
    CommandSpec::fixed(REPLAY_SPEED, "ReplaySpeed", 9),
    CommandSpec::fixed(LEAVE_GAME, "LeaveGame", 1),
    CommandSpec::fixed(MINIMAP_PING, "MinimapPing", 4),
    CommandSpec::fixed(MERGE_DARK_ARCHON, "MergeDarkArchon", 0),
    CommandSpec::fixed(MAKE_GAME_PUBLIC, "MakeGamePublic", 0),
    CommandSpec::fixed(CHAT, "Chat", 81),
    CommandSpec::fixed(RIGHT_CLICK_121, "RightClick121", 11),
    CommandSpec::fixed(TARGETED_ORDER_121, "TargetedOrder121", 12),
    CommandSpec::fixed(UNLOAD_121, "Unload121", 4),
    CommandSpec::counted(SELECT_121, "Select121", 4),
    CommandSpec::counted(SELECT_ADD_121, "SelectAdd121", 4),
    CommandSpec::counted(SELECT_REMOVE_121, "SelectRemove121", 4),
];

/// Every known opcode, in opcode order.
pub static COMMAND_SPECS: [CommandSpec; 77] = SPECS;

const fn build_index(specs: &[CommandSpec]) -> [u8; 256] {
    let mut index = [NO_ENTRY; 256];
    let mut i = 0;
    while i < specs.len() {
        let opcode = specs[i].opcode as usize;
        if index[opcode] != NO_ENTRY {
            panic!("duplicate opcode in command table");
        }
        index[opcode] = i as u8;
        i += 1;
    }
    index
}

static INDEX: [u8; 256] = build_index(&SPECS);

/// Looks up the schema for an opcode.
#[must_use]
pub fn lookup(opcode: u8) -> Option<&'static CommandSpec> {
    match INDEX[usize::from(opcode)] {
        NO_ENTRY => None,
        slot => COMMAND_SPECS.get(usize::from(slot)),
    }
}

/// Returns the command name for an opcode, if it is known.
#[must_use]
pub fn opcode_name(opcode: u8) -> Option<&'static str> {
    lookup(opcode).map(|spec| spec.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_every_entry() {
        for spec in &COMMAND_SPECS {
            let found = lookup(spec.opcode).unwrap();
            assert_eq!(found.opcode, spec.opcode);
            assert_eq!(found.name, spec.name);
        }
    }

    #[test]
    fn test_table_is_sorted_and_unique() {
        for pair in COMMAND_SPECS.windows(2) {
            assert!(pair[0].opcode < pair[1].opcode);
        }
    }

    #[test]
    fn test_unknown_opcodes() {
        let found = (0..=255u8).filter(|&op| lookup(op).is_some()).count();
        assert_eq!(found, COMMAND_SPECS.len());

        for op in [0x00, 0x04, 0x16, 0x17, 0x24, 0x46, 0x59, 0x5D, 0x66, 0xFF] {
            assert!(lookup(op).is_none(), "0x{op:02X} should be unknown");
        }
    }

    #[test]
    fn test_table_covers_known_range() {
        const GAPS: [u8; 20] = [
            0x16, 0x17, 0x24, 0x46, 0x47, 0x49, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, 0x50, 0x51,
            0x52, 0x53, 0x59, 0x5D, 0x5E, 0x5F,
        ];
        let expected: Vec<u8> = (KEEP_ALIVE..=SELECT_REMOVE_121)
            .filter(|op| !GAPS.contains(op))
            .collect();
        let actual: Vec<u8> = COMMAND_SPECS.iter().map(|spec| spec.opcode).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_fixed_sizes_include_head() {
        assert_eq!(lookup(KEEP_ALIVE).unwrap().encoded_size, 2);
        assert_eq!(lookup(BUILD).unwrap().encoded_size, 9);
        assert_eq!(lookup(RIGHT_CLICK).unwrap().encoded_size, 11);
        assert_eq!(lookup(TARGETED_ORDER_121).unwrap().encoded_size, 14);
        assert_eq!(lookup(CHAT).unwrap().encoded_size, 83);
        assert_eq!(lookup(JOINED_GAME).unwrap().encoded_size, 19);
    }

    #[test]
    fn test_counted_encoded_size_is_maximum() {
        let spec = lookup(SELECT).unwrap();
        assert_eq!(spec.encoded_size, 2 + 1 + 255 * 2);
        let spec = lookup(SELECT_121).unwrap();
        assert_eq!(spec.encoded_size, 2 + 1 + 255 * 4);
    }

    #[test]
    fn test_required_len_counted_uses_live_count() {
        let spec = lookup(SELECT).unwrap();
        assert_eq!(spec.required_len(&[3, 1, 0, 2, 0, 3, 0]), 2 + 1 + 6);
        assert_eq!(spec.required_len(&[0]), 3);
        // Count byte present but elements missing: length still from count.
        assert_eq!(spec.required_len(&[12]), 2 + 1 + 24);
        // Count byte missing.
        assert_eq!(spec.required_len(&[]), 3);
    }

    #[test]
    fn test_required_len_fixed() {
        let spec = lookup(HOTKEY).unwrap();
        assert_eq!(spec.required_len(&[]), 4);
        assert_eq!(spec.required_len(&[0; 100]), 4);
    }

    #[test]
    fn test_required_len_nul_terminated() {
        let spec = lookup(SAVE_GAME).unwrap();

        let mut body = vec![0u8; 4];
        body.extend_from_slice(b"save1\0trailing");
        assert_eq!(spec.required_len(&body), 2 + 4 + 6);

        // No terminator in the available bytes.
        let mut body = vec![0u8; 4];
        body.extend_from_slice(b"sav");
        assert!(spec.required_len(&body) > 2 + body.len());

        // Prefix itself cut short.
        assert!(spec.required_len(&[0, 0]) > 4);

        // Unterminated name filling the whole field.
        let mut body = vec![0u8; 4];
        body.extend(std::iter::repeat(b'a').take(usize::from(SAVE_NAME_MAX) + 10));
        assert_eq!(
            spec.required_len(&body),
            2 + 4 + usize::from(SAVE_NAME_MAX)
        );
    }

    #[test]
    fn test_opcode_name() {
        assert_eq!(opcode_name(LEAVE_GAME), Some("LeaveGame"));
        assert_eq!(opcode_name(0x01), None);
    }
}
