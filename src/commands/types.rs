//! Typed command bodies.
//!
//! [`CommandKind`] has one variant per opcode in the table; each variant
//! holds only the fields its record carries.

use std::fmt;

use super::hotkey::Hotkey;
use super::opcode::{self, opcode_name};
use super::order::{Build, Position, RightClick, TargetedOrder};
use super::selection::{Selection, SelectionMode};
use crate::binary::{fixed_str_lossy, ByteCursor};
use crate::error::{ParserError, Result};
use crate::header::Race;

/// Width of the chat message field.
pub const CHAT_MESSAGE_SIZE: usize = 80;

/// Why a player left the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveReason {
    /// The player quit (0x01).
    Quit,
    /// The player was dropped (0x06).
    Dropped,
    /// Any other value.
    Unknown(u8),
}

impl From<u8> for LeaveReason {
    fn from(value: u8) -> Self {
        match value {
            0x01 => LeaveReason::Quit,
            0x06 => LeaveReason::Dropped,
            other => LeaveReason::Unknown(other),
        }
    }
}

impl fmt::Display for LeaveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveReason::Quit => f.write_str("quit"),
            LeaveReason::Dropped => f.write_str("dropped"),
            LeaveReason::Unknown(value) => write!(f, "reason 0x{value:02X}"),
        }
    }
}

/// A chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Slot of the sender.
    pub sender: u8,
    /// Message bytes as stored (NUL padded).
    pub message: [u8; CHAT_MESSAGE_SIZE],
}

impl ChatMessage {
    /// Returns the message as text, cut at the first NUL.
    #[must_use]
    pub fn text(&self) -> String {
        fixed_str_lossy(&self.message)
    }
}

/// A decoded command body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// 0x05.
    KeepAlive,
    /// 0x06.
    SaveGame {
        /// Save parameters.
        save_info: u32,
        /// File name without its terminator.
        file_name: Vec<u8>,
    },
    /// 0x07.
    LoadGame {
        /// Load parameters.
        save_info: u32,
        /// File name without its terminator.
        file_name: Vec<u8>,
    },
    /// 0x08.
    RestartGame,
    /// 0x09, 0x0A, 0x0B, 0x63, 0x64 and 0x65.
    Select(Selection),
    /// 0x0C.
    Build(Build),
    /// 0x0D.
    Vision {
        /// Shared vision bitmask.
        flags: u16,
    },
    /// 0x0E.
    Alliance {
        /// Alliance bitmask.
        flags: u32,
    },
    /// 0x0F.
    GameSpeed {
        /// Speed setting.
        speed: u8,
    },
    /// 0x10.
    Pause,
    /// 0x11.
    Resume,
    /// 0x12.
    Cheat {
        /// Cheat bitmask.
        flags: u32,
    },
    /// 0x13.
    Hotkey(Hotkey),
    /// 0x14 and 0x60.
    RightClick(RightClick),
    /// 0x15 and 0x61.
    TargetedOrder(TargetedOrder),
    /// 0x18.
    CancelBuild,
    /// 0x19.
    CancelMorph,
    /// 0x1A.
    Stop {
        /// Queued flag.
        queued: bool,
    },
    /// 0x1B.
    CarrierStop,
    /// 0x1C.
    ReaverStop,
    /// 0x1D.
    OrderNothing,
    /// 0x1E.
    ReturnCargo {
        /// Queued flag.
        queued: bool,
    },
    /// 0x1F.
    Train {
        /// Unit type to train.
        unit_type: u16,
    },
    /// 0x20.
    CancelTrain {
        /// Tag of the queued unit.
        unit_tag: u16,
    },
    /// 0x21.
    Cloak {
        /// Queued flag.
        queued: bool,
    },
    /// 0x22.
    Decloak {
        /// Queued flag.
        queued: bool,
    },
    /// 0x23.
    UnitMorph {
        /// Target unit type.
        unit_type: u16,
    },
    /// 0x25.
    Unsiege {
        /// Queued flag.
        queued: bool,
    },
    /// 0x26.
    Siege {
        /// Queued flag.
        queued: bool,
    },
    /// 0x27.
    TrainFighter,
    /// 0x28.
    UnloadAll {
        /// Queued flag.
        queued: bool,
    },
    /// 0x29 and 0x62.
    Unload {
        /// Tag of the unloaded unit.
        unit_tag: u16,
    },
    /// 0x2A.
    MergeArchon,
    /// 0x2B.
    HoldPosition {
        /// Queued flag.
        queued: bool,
    },
    /// 0x2C.
    Burrow {
        /// Queued flag.
        queued: bool,
    },
    /// 0x2D.
    Unburrow {
        /// Queued flag.
        queued: bool,
    },
    /// 0x2E.
    CancelNuke,
    /// 0x2F.
    LiftOff {
        /// Landing position.
        position: Position,
    },
    /// 0x30.
    Tech {
        /// Tech id.
        tech: u8,
    },
    /// 0x31.
    CancelTech,
    /// 0x32.
    Upgrade {
        /// Upgrade id.
        upgrade: u8,
    },
    /// 0x33.
    CancelUpgrade,
    /// 0x34.
    CancelAddon,
    /// 0x35.
    BuildingMorph {
        /// Target building type.
        unit_type: u16,
    },
    /// 0x36.
    Stim,
    /// 0x37.
    Sync {
        /// Opaque sync bytes.
        data: [u8; 6],
    },
    /// 0x38.
    VoiceEnable,
    /// 0x39.
    VoiceDisable,
    /// 0x3A.
    VoiceSquelch {
        /// Affected slot.
        slot: u8,
    },
    /// 0x3B.
    VoiceUnsquelch {
        /// Affected slot.
        slot: u8,
    },
    /// 0x3C.
    StartGame,
    /// 0x3D.
    DownloadPercentage {
        /// Percentage downloaded.
        percent: u8,
    },
    /// 0x3E.
    ChangeGameSlot {
        /// Opaque slot data.
        data: [u8; 5],
    },
    /// 0x3F.
    NewNetPlayer {
        /// Opaque player data.
        data: [u8; 7],
    },
    /// 0x40.
    JoinedGame {
        /// Opaque join data.
        data: [u8; 17],
    },
    /// 0x41.
    ChangeRace {
        /// Affected slot.
        slot: u8,
        /// New race.
        race: Race,
    },
    /// 0x42.
    TeamGameTeam {
        /// Team number.
        team: u8,
    },
    /// 0x43.
    UmsTeam {
        /// Team number.
        team: u8,
    },
    /// 0x44.
    MeleeTeam {
        /// Affected slot.
        slot: u8,
        /// Team number.
        team: u8,
    },
    /// 0x45.
    SwapPlayers {
        /// First slot.
        slot_a: u8,
        /// Second slot.
        slot_b: u8,
    },
    /// 0x48.
    SavedData {
        /// Opaque saved data.
        data: [u8; 12],
    },
    /// 0x54.
    BriefingStart,
    /// 0x55.
    Latency {
        /// Latency setting.
        latency: u8,
    },
    /// 0x56.
    ReplaySpeed {
        /// Whether playback was paused.
        paused: bool,
        /// Speed setting.
        speed: u32,
        /// Speed multiplier.
        multiplier: u32,
    },
    /// 0x57.
    LeaveGame {
        /// Why the player left.
        reason: LeaveReason,
    },
    /// 0x58.
    MinimapPing {
        /// Pinged position.
        position: Position,
    },
    /// 0x5A.
    MergeDarkArchon,
    /// 0x5B.
    MakeGamePublic,
    /// 0x5C.
    Chat(ChatMessage),
}

fn queued(cursor: &mut ByteCursor<'_>) -> Result<bool> {
    Ok(cursor.read_u8()? != 0)
}

fn save_name(cursor: &ByteCursor<'_>) -> Vec<u8> {
    let rest = cursor.rest();
    let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
    rest[..end].to_vec()
}

impl CommandKind {
    /// Decodes a command body for opcode `op`.
    ///
    /// # Errors
    ///
    /// - `ParserError::UnknownOpcode` if the opcode is not in the table
    ///   (reported at offset 0 with player 0)
    /// - `ParserError::UnexpectedEof` if the body is shorter than the layout
    pub fn decode(op: u8, body: &[u8]) -> Result<Self> {
        let mut c = ByteCursor::new(body);
        let kind = match op {
            opcode::KEEP_ALIVE => CommandKind::KeepAlive,
            opcode::SAVE_GAME => CommandKind::SaveGame {
                save_info: c.read_u32_le()?,
                file_name: save_name(&c),
            },
            opcode::LOAD_GAME => CommandKind::LoadGame {
                save_info: c.read_u32_le()?,
                file_name: save_name(&c),
            },
            opcode::RESTART_GAME => CommandKind::RestartGame,
            opcode::SELECT | opcode::SELECT_121 => {
                let wide = op == opcode::SELECT_121;
                CommandKind::Select(Selection::parse(body, SelectionMode::Replace, wide)?)
            }
            opcode::SELECT_ADD | opcode::SELECT_ADD_121 => {
                let wide = op == opcode::SELECT_ADD_121;
                CommandKind::Select(Selection::parse(body, SelectionMode::Add, wide)?)
            }
            opcode::SELECT_REMOVE | opcode::SELECT_REMOVE_121 => {
                let wide = op == opcode::SELECT_REMOVE_121;
                CommandKind::Select(Selection::parse(body, SelectionMode::Remove, wide)?)
            }
            opcode::BUILD => CommandKind::Build(Build::parse(body)?),
            opcode::VISION => CommandKind::Vision {
                flags: c.read_u16_le()?,
            },
            opcode::ALLIANCE => CommandKind::Alliance {
                flags: c.read_u32_le()?,
            },
            opcode::GAME_SPEED => CommandKind::GameSpeed {
                speed: c.read_u8()?,
            },
            opcode::PAUSE => CommandKind::Pause,
            opcode::RESUME => CommandKind::Resume,
            opcode::CHEAT => CommandKind::Cheat {
                flags: c.read_u32_le()?,
            },
            opcode::HOTKEY => CommandKind::Hotkey(Hotkey::parse(body)?),
            opcode::RIGHT_CLICK => CommandKind::RightClick(RightClick::parse(body, false)?),
            opcode::RIGHT_CLICK_121 => CommandKind::RightClick(RightClick::parse(body, true)?),
            opcode::TARGETED_ORDER => CommandKind::TargetedOrder(TargetedOrder::parse(body, false)?),
            opcode::TARGETED_ORDER_121 => {
                CommandKind::TargetedOrder(TargetedOrder::parse(body, true)?)
            }
            opcode::CANCEL_BUILD => CommandKind::CancelBuild,
            opcode::CANCEL_MORPH => CommandKind::CancelMorph,
            opcode::STOP => CommandKind::Stop {
                queued: queued(&mut c)?,
            },
            opcode::CARRIER_STOP => CommandKind::CarrierStop,
            opcode::REAVER_STOP => CommandKind::ReaverStop,
            opcode::ORDER_NOTHING => CommandKind::OrderNothing,
            opcode::RETURN_CARGO => CommandKind::ReturnCargo {
                queued: queued(&mut c)?,
            },
            opcode::TRAIN => CommandKind::Train {
                unit_type: c.read_u16_le()?,
            },
            opcode::CANCEL_TRAIN => CommandKind::CancelTrain {
                unit_tag: c.read_u16_le()?,
            },
            opcode::CLOAK => CommandKind::Cloak {
                queued: queued(&mut c)?,
            },
            opcode::DECLOAK => CommandKind::Decloak {
                queued: queued(&mut c)?,
            },
            opcode::UNIT_MORPH => CommandKind::UnitMorph {
                unit_type: c.read_u16_le()?,
            },
            opcode::UNSIEGE => CommandKind::Unsiege {
                queued: queued(&mut c)?,
            },
            opcode::SIEGE => CommandKind::Siege {
                queued: queued(&mut c)?,
            },
            opcode::TRAIN_FIGHTER => CommandKind::TrainFighter,
            opcode::UNLOAD_ALL => CommandKind::UnloadAll {
                queued: queued(&mut c)?,
            },
            opcode::UNLOAD => CommandKind::Unload {
                unit_tag: c.read_u16_le()?,
            },
            opcode::UNLOAD_121 => {
                let unit_tag = c.read_u16_le()?;
                c.skip(2)?;
                CommandKind::Unload { unit_tag }
            }
            opcode::MERGE_ARCHON => CommandKind::MergeArchon,
            opcode::HOLD_POSITION => CommandKind::HoldPosition {
                queued: queued(&mut c)?,
            },
            opcode::BURROW => CommandKind::Burrow {
                queued: queued(&mut c)?,
            },
            opcode::UNBURROW => CommandKind::Unburrow {
                queued: queued(&mut c)?,
            },
            opcode::CANCEL_NUKE => CommandKind::CancelNuke,
            opcode::LIFT_OFF => CommandKind::LiftOff {
                position: Position::parse(&mut c)?,
            },
            opcode::TECH => CommandKind::Tech { tech: c.read_u8()? },
            opcode::CANCEL_TECH => CommandKind::CancelTech,
            opcode::UPGRADE => CommandKind::Upgrade {
                upgrade: c.read_u8()?,
            },
            opcode::CANCEL_UPGRADE => CommandKind::CancelUpgrade,
            opcode::CANCEL_ADDON => CommandKind::CancelAddon,
            opcode::BUILDING_MORPH => CommandKind::BuildingMorph {
                unit_type: c.read_u16_le()?,
            },
            opcode::STIM => CommandKind::Stim,
            opcode::SYNC => CommandKind::Sync {
                data: c.read_array()?,
            },
            opcode::VOICE_ENABLE => CommandKind::VoiceEnable,
            opcode::VOICE_DISABLE => CommandKind::VoiceDisable,
            opcode::VOICE_SQUELCH => CommandKind::VoiceSquelch { slot: c.read_u8()? },
            opcode::VOICE_UNSQUELCH => CommandKind::VoiceUnsquelch { slot: c.read_u8()? },
            opcode::START_GAME => CommandKind::StartGame,
            opcode::DOWNLOAD_PERCENTAGE => CommandKind::DownloadPercentage {
                percent: c.read_u8()?,
            },
            opcode::CHANGE_GAME_SLOT => CommandKind::ChangeGameSlot {
                data: c.read_array()?,
            },
            opcode::NEW_NET_PLAYER => CommandKind::NewNetPlayer {
                data: c.read_array()?,
            },
            opcode::JOINED_GAME => CommandKind::JoinedGame {
                data: c.read_array()?,
            },
            opcode::CHANGE_RACE => CommandKind::ChangeRace {
                slot: c.read_u8()?,
                race: Race::from_byte(c.read_u8()?),
            },
            opcode::TEAM_GAME_TEAM => CommandKind::TeamGameTeam { team: c.read_u8()? },
            opcode::UMS_TEAM => CommandKind::UmsTeam { team: c.read_u8()? },
            opcode::MELEE_TEAM => CommandKind::MeleeTeam {
                slot: c.read_u8()?,
                team: c.read_u8()?,
            },
            opcode::SWAP_PLAYERS => CommandKind::SwapPlayers {
                slot_a: c.read_u8()?,
                slot_b: c.read_u8()?,
            },
            opcode::SAVED_DATA => CommandKind::SavedData {
                data: c.read_array()?,
            },
            opcode::BRIEFING_START => CommandKind::BriefingStart,
            opcode::LATENCY => CommandKind::Latency {
                latency: c.read_u8()?,
            },
            opcode::REPLAY_SPEED => CommandKind::ReplaySpeed {
                paused: c.read_u8()? != 0,
                speed: c.read_u32_le()?,
                multiplier: c.read_u32_le()?,
            },
            opcode::LEAVE_GAME => CommandKind::LeaveGame {
                reason: LeaveReason::from(c.read_u8()?),
            },
            opcode::MINIMAP_PING => CommandKind::MinimapPing {
                position: Position::parse(&mut c)?,
            },
            opcode::MERGE_DARK_ARCHON => CommandKind::MergeDarkArchon,
            opcode::MAKE_GAME_PUBLIC => CommandKind::MakeGamePublic,
            opcode::CHAT => CommandKind::Chat(ChatMessage {
                sender: c.read_u8()?,
                message: c.read_array()?,
            }),
            unknown => {
                return Err(ParserError::UnknownOpcode {
                    offset: 0,
                    opcode: unknown,
                    player_id: 0,
                })
            }
        };
        Ok(kind)
    }

    /// Returns the command name as listed in the opcode table.
    ///
    /// Variants shared by several opcodes report the classic name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Select(sel) => match sel.mode {
                SelectionMode::Replace => "Select",
                SelectionMode::Add => "SelectAdd",
                SelectionMode::Remove => "SelectRemove",
            },
            other => opcode_name(other.base_opcode()).unwrap_or("Unknown"),
        }
    }

    fn base_opcode(&self) -> u8 {
        match self {
            CommandKind::KeepAlive => opcode::KEEP_ALIVE,
            CommandKind::SaveGame { .. } => opcode::SAVE_GAME,
            CommandKind::LoadGame { .. } => opcode::LOAD_GAME,
            CommandKind::RestartGame => opcode::RESTART_GAME,
            CommandKind::Select(_) => opcode::SELECT,
            CommandKind::Build(_) => opcode::BUILD,
            CommandKind::Vision { .. } => opcode::VISION,
            CommandKind::Alliance { .. } => opcode::ALLIANCE,
            CommandKind::GameSpeed { .. } => opcode::GAME_SPEED,
            CommandKind::Pause => opcode::PAUSE,
            CommandKind::Resume => opcode::RESUME,
            CommandKind::Cheat { .. } => opcode::CHEAT,
            CommandKind::Hotkey(_) => opcode::HOTKEY,
            CommandKind::RightClick(_) => opcode::RIGHT_CLICK,
            CommandKind::TargetedOrder(_) => opcode::TARGETED_ORDER,
            CommandKind::CancelBuild => opcode::CANCEL_BUILD,
            CommandKind::CancelMorph => opcode::CANCEL_MORPH,
            CommandKind::Stop { .. } => opcode::STOP,
            CommandKind::CarrierStop => opcode::CARRIER_STOP,
            CommandKind::ReaverStop => opcode::REAVER_STOP,
            CommandKind::OrderNothing => opcode::ORDER_NOTHING,
            CommandKind::ReturnCargo { .. } => opcode::RETURN_CARGO,
            CommandKind::Train { .. } => opcode::TRAIN,
            CommandKind::CancelTrain { .. } => opcode::CANCEL_TRAIN,
            CommandKind::Cloak { .. } => opcode::CLOAK,
            CommandKind::Decloak { .. } => opcode::DECLOAK,
            CommandKind::UnitMorph { .. } => opcode::UNIT_MORPH,
            CommandKind::Unsiege { .. } => opcode::UNSIEGE,
            CommandKind::Siege { .. } => opcode::SIEGE,
            CommandKind::TrainFighter => opcode::TRAIN_FIGHTER,
            CommandKind::UnloadAll { .. } => opcode::UNLOAD_ALL,
            CommandKind::Unload { .. } => opcode::UNLOAD,
            CommandKind::MergeArchon => opcode::MERGE_ARCHON,
            CommandKind::HoldPosition { .. } => opcode::HOLD_POSITION,
            CommandKind::Burrow { .. } => opcode::BURROW,
            CommandKind::Unburrow { .. } => opcode::UNBURROW,
            CommandKind::CancelNuke => opcode::CANCEL_NUKE,
            CommandKind::LiftOff { .. } => opcode::LIFT_OFF,
            CommandKind::Tech { .. } => opcode::TECH,
            CommandKind::CancelTech => opcode::CANCEL_TECH,
            CommandKind::Upgrade { .. } => opcode::UPGRADE,
            CommandKind::CancelUpgrade => opcode::CANCEL_UPGRADE,
            CommandKind::CancelAddon => opcode::CANCEL_ADDON,
            CommandKind::BuildingMorph { .. } => opcode::BUILDING_MORPH,
            CommandKind::Stim => opcode::STIM,
            CommandKind::Sync { .. } => opcode::SYNC,
            CommandKind::VoiceEnable => opcode::VOICE_ENABLE,
            CommandKind::VoiceDisable => opcode::VOICE_DISABLE,
            CommandKind::VoiceSquelch { .. } => opcode::VOICE_SQUELCH,
            CommandKind::VoiceUnsquelch { .. } => opcode::VOICE_UNSQUELCH,
            CommandKind::StartGame => opcode::START_GAME,
            CommandKind::DownloadPercentage { .. } => opcode::DOWNLOAD_PERCENTAGE,
            CommandKind::ChangeGameSlot { .. } => opcode::CHANGE_GAME_SLOT,
            CommandKind::NewNetPlayer { .. } => opcode::NEW_NET_PLAYER,
            CommandKind::JoinedGame { .. } => opcode::JOINED_GAME,
            CommandKind::ChangeRace { .. } => opcode::CHANGE_RACE,
            CommandKind::TeamGameTeam { .. } => opcode::TEAM_GAME_TEAM,
            CommandKind::UmsTeam { .. } => opcode::UMS_TEAM,
            CommandKind::MeleeTeam { .. } => opcode::MELEE_TEAM,
            CommandKind::SwapPlayers { .. } => opcode::SWAP_PLAYERS,
            CommandKind::SavedData { .. } => opcode::SAVED_DATA,
            CommandKind::BriefingStart => opcode::BRIEFING_START,
            CommandKind::Latency { .. } => opcode::LATENCY,
            CommandKind::ReplaySpeed { .. } => opcode::REPLAY_SPEED,
            CommandKind::LeaveGame { .. } => opcode::LEAVE_GAME,
            CommandKind::MinimapPing { .. } => opcode::MINIMAP_PING,
            CommandKind::MergeDarkArchon => opcode::MERGE_DARK_ARCHON,
            CommandKind::MakeGamePublic => opcode::MAKE_GAME_PUBLIC,
            CommandKind::Chat(_) => opcode::CHAT,
        }
    }

    /// Returns whether this command is a unit order issued during play.
    #[must_use]
    pub fn is_unit_order(&self) -> bool {
        matches!(
            self,
            CommandKind::Build(_)
                | CommandKind::RightClick(_)
                | CommandKind::TargetedOrder(_)
                | CommandKind::Stop { .. }
                | CommandKind::HoldPosition { .. }
                | CommandKind::Train { .. }
                | CommandKind::UnitMorph { .. }
                | CommandKind::BuildingMorph { .. }
                | CommandKind::Tech { .. }
                | CommandKind::Upgrade { .. }
                | CommandKind::Siege { .. }
                | CommandKind::Unsiege { .. }
                | CommandKind::Burrow { .. }
                | CommandKind::Unburrow { .. }
                | CommandKind::Cloak { .. }
                | CommandKind::Decloak { .. }
                | CommandKind::LiftOff { .. }
                | CommandKind::ReturnCargo { .. }
                | CommandKind::Unload { .. }
                | CommandKind::UnloadAll { .. }
                | CommandKind::Stim
                | CommandKind::MergeArchon
                | CommandKind::MergeDarkArchon
                | CommandKind::TrainFighter
        )
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::SaveGame { file_name, .. } | CommandKind::LoadGame { file_name, .. } => {
                write!(f, "{} \"{}\"", self.name(), String::from_utf8_lossy(file_name))
            }
            CommandKind::Select(sel) => write!(f, "{} {:?}", self.name(), sel.unit_tags),
            CommandKind::Build(b) => write!(
                f,
                "Build unit=0x{:02X} at {} order=0x{:02X}",
                b.unit_type, b.position, b.order
            ),
            CommandKind::Hotkey(hk) => write!(f, "Hotkey {} {}", hk.operation, hk.group),
            CommandKind::RightClick(rc) => {
                write!(f, "RightClick {} target={}", rc.position, rc.target_tag)?;
                if rc.queued {
                    f.write_str(" queued")?;
                }
                Ok(())
            }
            CommandKind::TargetedOrder(o) => {
                write!(
                    f,
                    "TargetedOrder order=0x{:02X} {} target={}",
                    o.order, o.position, o.target_tag
                )?;
                if o.queued {
                    f.write_str(" queued")?;
                }
                Ok(())
            }
            CommandKind::Train { unit_type }
            | CommandKind::UnitMorph { unit_type }
            | CommandKind::BuildingMorph { unit_type } => {
                write!(f, "{} unit=0x{unit_type:02X}", self.name())
            }
            CommandKind::Tech { tech } => write!(f, "Tech 0x{tech:02X}"),
            CommandKind::Upgrade { upgrade } => write!(f, "Upgrade 0x{upgrade:02X}"),
            CommandKind::LiftOff { position } | CommandKind::MinimapPing { position } => {
                write!(f, "{} {position}", self.name())
            }
            CommandKind::LeaveGame { reason } => write!(f, "LeaveGame ({reason})"),
            CommandKind::ChangeRace { slot, race } => write!(f, "ChangeRace slot={slot} {race}"),
            CommandKind::Chat(chat) => write!(f, "Chat [{}] {}", chat.sender, chat.text()),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::opcode::COMMAND_SPECS;

    /// Produces a zero-filled body of the size the table gives each opcode,
    /// with count bytes set to zero and names left empty.
    fn minimal_body(spec: &opcode::CommandSpec) -> Vec<u8> {
        match spec.variable_tail {
            None => vec![0; spec.encoded_size as usize - 2],
            Some(opcode::TailRule::Counted { prefix, .. }) => vec![0; usize::from(prefix) + 1],
            Some(opcode::TailRule::NulTerminated { prefix, .. }) => vec![0; usize::from(prefix) + 1],
        }
    }

    #[test]
    fn test_every_opcode_decodes() {
        for spec in &COMMAND_SPECS {
            let body = minimal_body(spec);
            let kind = CommandKind::decode(spec.opcode, &body)
                .unwrap_or_else(|e| panic!("{} failed: {e}", spec.name));
            assert!(!kind.to_string().is_empty());
        }
    }

    #[test]
    fn test_names_match_table_for_classic_opcodes() {
        for spec in COMMAND_SPECS.iter().filter(|s| s.opcode < 0x60) {
            let kind = CommandKind::decode(spec.opcode, &minimal_body(spec)).unwrap();
            assert_eq!(kind.name(), spec.name);
        }
    }

    #[test]
    fn test_fixed_bodies_are_fully_described() {
        // Each fixed-size body must be exactly what its decoder reads.
        for spec in COMMAND_SPECS.iter().filter(|s| !s.is_variable()) {
            let body = minimal_body(spec);
            if body.is_empty() {
                continue;
            }
            let short = &body[..body.len() - 1];
            assert!(
                CommandKind::decode(spec.opcode, short).is_err(),
                "{} decoded from a short body",
                spec.name
            );
        }
    }

    #[test]
    fn test_decode_unknown_opcode() {
        let result = CommandKind::decode(0xEE, &[]);
        assert!(matches!(
            result,
            Err(ParserError::UnknownOpcode { opcode: 0xEE, .. })
        ));
    }

    #[test]
    fn test_decode_leave_game() {
        let kind = CommandKind::decode(opcode::LEAVE_GAME, &[0x06]).unwrap();
        assert_eq!(
            kind,
            CommandKind::LeaveGame {
                reason: LeaveReason::Dropped
            }
        );
        assert_eq!(kind.to_string(), "LeaveGame (dropped)");
    }

    #[test]
    fn test_decode_save_game_name() {
        let mut body = 7u32.to_le_bytes().to_vec();
        body.extend_from_slice(b"mysave\0");
        let kind = CommandKind::decode(opcode::SAVE_GAME, &body).unwrap();
        assert_eq!(
            kind,
            CommandKind::SaveGame {
                save_info: 7,
                file_name: b"mysave".to_vec()
            }
        );
    }

    #[test]
    fn test_decode_chat() {
        let mut body = vec![3];
        let mut message = [0u8; CHAT_MESSAGE_SIZE];
        message[..5].copy_from_slice(b"gg wp");
        body.extend_from_slice(&message);

        let kind = CommandKind::decode(opcode::CHAT, &body).unwrap();
        match &kind {
            CommandKind::Chat(chat) => {
                assert_eq!(chat.sender, 3);
                assert_eq!(chat.text(), "gg wp");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(kind.to_string(), "Chat [3] gg wp");
    }

    #[test]
    fn test_decode_replay_speed() {
        let mut body = vec![1];
        body.extend_from_slice(&6u32.to_le_bytes());
        body.extend_from_slice(&2u32.to_le_bytes());
        let kind = CommandKind::decode(opcode::REPLAY_SPEED, &body).unwrap();
        assert_eq!(
            kind,
            CommandKind::ReplaySpeed {
                paused: true,
                speed: 6,
                multiplier: 2
            }
        );
    }

    #[test]
    fn test_wide_variants_share_kinds() {
        let kind = CommandKind::decode(opcode::UNLOAD_121, &[0x09, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(kind, CommandKind::Unload { unit_tag: 9 });

        let kind = CommandKind::decode(opcode::SELECT_ADD_121, &[1, 0x02, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(kind.name(), "SelectAdd");
    }

    #[test]
    fn test_unit_order_classification() {
        assert!(CommandKind::Stim.is_unit_order());
        assert!(!CommandKind::KeepAlive.is_unit_order());
        assert!(!CommandKind::Hotkey(Hotkey::parse(&[1, 1]).unwrap()).is_unit_order());
    }
}
