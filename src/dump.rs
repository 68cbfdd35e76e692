//! Human-readable rendering of a decoded replay.

use std::fmt;

use crate::replay::Replay;

/// Controls what [`render`] includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpOptions {
    /// List every command under its frame.
    pub commands: bool,
    /// Include slots that hold no participant.
    pub all_slots: bool,
}

/// Renders a replay as text.
///
/// # Example
///
/// ```no_run
/// use rep_parser::dump::{render, DumpOptions};
/// use rep_parser::replay::{parse_replay, read_replay_file};
///
/// let replay = parse_replay(&read_replay_file("game.rep")?)?;
/// print!("{}", render(&replay, &DumpOptions::default()));
/// # Ok::<(), rep_parser::error::ParserError>(())
/// ```
#[must_use]
pub fn render(replay: &Replay, options: &DumpOptions) -> String {
    Dump { replay, options }.to_string()
}

struct Dump<'a> {
    replay: &'a Replay,
    options: &'a DumpOptions,
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let replay = self.replay;
        let header = &replay.header;

        writeln!(f, "=== Replay ===")?;
        writeln!(f, "Replay ID: {}", replay.replay_id)?;
        writeln!(f, "Gap: 0x{:08X}", replay.gap)?;
        writeln!(f, "Engine: {}", header.engine)?;
        writeln!(
            f,
            "Length: {} frames ({})",
            header.game_frames,
            header.duration_string()
        )?;
        writeln!(f, "Saved: {}", header.save_time)?;
        writeln!(f, "Game: {}", header.game_name())?;
        writeln!(f, "Creator: {}", header.creator())?;
        writeln!(
            f,
            "Map: {} ({}x{})",
            header.map_name(),
            header.map_width,
            header.map_height
        )?;
        writeln!(f)?;

        let slots: Vec<_> = header
            .players
            .iter()
            .filter(|p| self.options.all_slots || p.is_active())
            .collect();
        writeln!(f, "=== Players ({}) ===", slots.len())?;
        for slot in slots {
            writeln!(
                f,
                "  Slot {} [id {}]: {} ({}, {}, team {})",
                slot.slot_id,
                slot.player_id,
                slot.name(),
                slot.race,
                slot.player_type,
                slot.team
            )?;
        }
        writeln!(f)?;

        writeln!(f, "=== Commands ===")?;
        writeln!(f, "Frames: {}", replay.frames.len())?;
        writeln!(f, "Commands: {}", replay.command_count())?;
        for frame in &replay.frames {
            writeln!(
                f,
                "  tick {}: {} command(s)",
                frame.ticks_elapsed,
                frame.commands.len()
            )?;
            if self.options.commands {
                for command in &frame.commands {
                    writeln!(f, "    {command}")?;
                }
            }
        }
        writeln!(f)?;

        match &replay.map_data {
            Some(map) => writeln!(f, "Map data: {} bytes", map.len()),
            None => writeln!(f, "Map data: absent"),
        }
    }
}
