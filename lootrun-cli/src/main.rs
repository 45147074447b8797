mod commands;
mod render;
mod workspace;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use lootrun_core::{MoveDirection, SelectionKind};

/// Catalog a `list` command shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Boons,
    Beacons,
    Missions,
    Stats,
    Trials,
    Camps,
    Curses,
    Challenges,
}

#[derive(Debug, Parser)]
#[command(name = "lootrun", version)]
#[command(about = "Plan lootruns: browse catalogs, rank picks, save beacon combos")]
pub struct Args {
    /// Working loadout file (a save document)
    #[arg(long, global = true, default_value = "lootrun-loadout.json")]
    loadout: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a catalog through the active filters
    List {
        #[arg(value_enum)]
        kind: ListKind,
        /// Category key, or `all`
        #[arg(long)]
        category: Option<String>,
        /// Tier (S, A, B, C), or `all`
        #[arg(long)]
        tier: Option<String>,
        /// Mission combo key, or `all`
        #[arg(long)]
        combo: Option<String>,
    },
    /// Select or deselect a boon, beacon or mission
    Toggle {
        #[arg(value_parser = parse_kind)]
        kind: SelectionKind,
        id: String,
    },
    /// Add or remove a stat from the overview
    Stat { id: String },
    /// Apply a focus preset, replacing current selections
    Focus {
        preset: Option<String>,
        /// List available presets and exit
        #[arg(long, conflicts_with = "preset")]
        list: bool,
    },
    /// Manage named beacon combos
    Combo {
        #[command(subcommand)]
        action: ComboCommand,
    },
    /// Print the loadout with ranks, warnings and combos
    Show,
    /// Write the loadout as a save document
    Export {
        /// Output path (defaults to lootrunner-<date>.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the loadout with a save document
    Import { path: PathBuf },
    /// Clear every selection, stat and combo
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum ComboCommand {
    /// Save the current beacon selection under a name
    Create { name: String },
    Rename { id: String, name: String },
    Delete { id: String },
    /// Move the combo at a 1-based position
    Move {
        index: usize,
        #[arg(value_parser = parse_direction)]
        direction: MoveDirection,
    },
}

fn parse_kind(raw: &str) -> Result<SelectionKind, String> {
    raw.to_ascii_lowercase()
        .parse()
        .map_err(|()| format!("expected boon, beacon or mission, got `{raw}`"))
}

fn parse_direction(raw: &str) -> Result<MoveDirection, String> {
    raw.parse()
        .map_err(|()| format!("expected up or down, got `{raw}`"))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    commands::run(&args, &mut std::io::stdout().lock())
}
