//! StarCraft replay (.rep) parser CLI
//!
//! Decodes a replay and prints a summary, or JSON with `--json`.
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Usage error |
//! | 2 | File could not be opened or read |
//! | 3 | Truncated input |
//! | 4 | Length mismatch |
//! | 5 | Decompression failed |
//! | 6 | Unknown opcode |
//! | 7 | Input larger than `--max-size` |

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use rep_parser::commands::opcode::opcode_name;
use rep_parser::{parse_replay_with, read_replay_file, render, DumpOptions, ParseOptions, Replay};

/// StarCraft replay (.rep) parser
#[derive(Parser)]
#[command(name = "rep-parser")]
#[command(about = "StarCraft replay (.rep) parser", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the replay file
    file: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// List every command
    #[arg(long)]
    commands: bool,

    /// Include empty player slots
    #[arg(long)]
    all_slots: bool,

    /// Warn about chunks whose checksum does not match their contents
    #[arg(long)]
    verify_checksums: bool,

    /// Refuse inputs larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    max_size: Option<usize>,

    /// Do not decode the map data section
    #[arg(long)]
    skip_map_data: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ============================================================================
// Serializable Output Structures
// ============================================================================

#[derive(Serialize)]
struct ReplayOutput {
    replay_id: String,
    known_marker: bool,
    gap: u32,
    header: HeaderInfo,
    players: Vec<PlayerInfo>,
    statistics: Statistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    map_data_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commands: Option<Vec<CommandInfo>>,
}

#[derive(Serialize)]
struct HeaderInfo {
    engine: String,
    game_frames: u32,
    duration: String,
    save_time: u32,
    game_name: String,
    creator: String,
    map_name: String,
    map_width: u16,
    map_height: u16,
}

#[derive(Serialize)]
struct PlayerInfo {
    slot_id: u32,
    player_id: u32,
    name: String,
    race: String,
    player_type: String,
    team: u8,
}

#[derive(Serialize)]
struct Statistics {
    total_frames: usize,
    total_commands: usize,
    unit_orders: usize,
    commands_by_player: BTreeMap<u8, usize>,
    commands_by_type: BTreeMap<String, usize>,
}

#[derive(Serialize)]
struct CommandInfo {
    tick: u32,
    player_id: u8,
    opcode: u8,
    name: &'static str,
    description: String,
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(cli.verbose);

    let options = ParseOptions {
        verify_checksums: cli.verify_checksums,
        max_input_size: cli.max_size,
        skip_map_data: cli.skip_map_data,
    };

    let replay = match read_replay_file(&cli.file).and_then(|data| parse_replay_with(&data, &options))
    {
        Ok(replay) => replay,
        Err(err) => {
            eprintln!("Error: {err} ({})", err.kind());
            return ExitCode::from(err.kind().exit_code());
        }
    };

    if cli.json {
        let output = build_output(&replay, &cli);
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("Error serializing output: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        let dump_options = DumpOptions {
            commands: cli.commands,
            all_slots: cli.all_slots,
        };
        print!("{}", render(&replay, &dump_options));
    }

    ExitCode::SUCCESS
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_output(replay: &Replay, cli: &Cli) -> ReplayOutput {
    let header = &replay.header;
    let stats = replay.statistics();

    let players = header
        .players
        .iter()
        .filter(|p| cli.all_slots || p.is_active())
        .map(|p| PlayerInfo {
            slot_id: p.slot_id,
            player_id: p.player_id,
            name: p.name(),
            race: p.race.to_string(),
            player_type: p.player_type.to_string(),
            team: p.team,
        })
        .collect();

    let commands_by_type = stats
        .commands_per_opcode
        .iter()
        .map(|(&op, &count)| {
            let name = opcode_name(op)
                .map_or_else(|| format!("0x{op:02X}"), str::to_string);
            (name, count)
        })
        .collect();

    let commands = cli.commands.then(|| {
        replay
            .commands()
            .map(|(tick, cmd)| CommandInfo {
                tick,
                player_id: cmd.player_id,
                opcode: cmd.opcode,
                name: cmd.name(),
                description: cmd.to_string(),
            })
            .collect()
    });

    ReplayOutput {
        replay_id: replay.replay_id.to_string(),
        known_marker: replay.replay_id.is_known_marker(),
        gap: replay.gap,
        header: HeaderInfo {
            engine: header.engine.to_string(),
            game_frames: header.game_frames,
            duration: header.duration_string(),
            save_time: header.save_time,
            game_name: header.game_name(),
            creator: header.creator(),
            map_name: header.map_name(),
            map_width: header.map_width,
            map_height: header.map_height,
        },
        players,
        statistics: Statistics {
            total_frames: stats.total_frames,
            total_commands: stats.total_commands,
            unit_orders: stats.unit_orders,
            commands_by_player: stats.commands_per_player,
            commands_by_type,
        },
        map_data_size: replay.map_data.as_ref().map(Vec::len),
        commands,
    }
}
