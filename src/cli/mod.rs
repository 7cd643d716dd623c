//! CLI argument parsing for migsize
//!
//! Global flags: --format, --quiet, --verbose, --log-level, --log-json, --config

pub mod args;
pub mod format;
pub mod output;
pub mod parse;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{CostArgs, EstimateArgs, PlatformsArgs, PolicyArgs, SizeArgs};
pub use output::OutputFormat;

/// Migsize - estimate VM storage after leaving vSAN/VxRail
#[derive(Parser, Debug)]
#[command(name = "migsize")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = RAID_HELP)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (e.g. debug, migsize_core=trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (default: ./migsize.toml, then the user config dir)
    #[arg(long, global = true, env = "MIGSIZE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

const RAID_HELP: &str = "RAID policies:
  raid1, raid1_ftt1    RAID-1 FTT=1 (2x overhead)
  raid1_ftt2           RAID-1 FTT=2 (3x overhead)
  raid5, raid5_ftt1    RAID-5 FTT=1 (1.33x overhead)
  raid6, raid6_ftt2    RAID-6 FTT=2 (1.5x overhead)
  none                 FTT=0 (no overhead)";

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate target sizes for every VM in an inventory
    Estimate(EstimateArgs),

    /// Estimate a single reported size, step by step
    Size(SizeArgs),

    /// List platform rules and RAID overheads, or resolve one identifier
    Platforms(PlatformsArgs),

    /// Monthly cost of a VM on a platform
    Cost(CostArgs),

    /// Show the effective configuration and where it was loaded from
    Config,
}
