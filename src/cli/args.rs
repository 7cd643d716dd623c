use std::path::PathBuf;

use clap::Args;
use migsize_core::config::{EstimatorConfig, SizeUnit};
use migsize_core::error::Result;
use migsize_core::policy::SizeBasis;

use super::parse::{parse_size_basis, parse_unit};

/// Source storage policy flags shared by `estimate` and `size`.
///
/// Every flag is optional; unset flags keep the configured defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Target platform (repeatable): vmware, aws, gcp, azure
    #[arg(long = "target", short = 't', action = clap::ArgAction::Append)]
    pub targets: Vec<String>,

    /// Source RAID/FTT policy (raid1_ftt1, raid1_ftt2, raid5, raid6, none)
    #[arg(long)]
    pub raid: Option<String>,

    /// Whether sizes are provisioned or used
    #[arg(long = "size-type", value_parser = parse_size_basis)]
    pub size_type: Option<SizeBasis>,

    /// Fraction of provisioned space actually written, in (0, 1]
    #[arg(long = "thin-ratio")]
    pub thin_ratio: Option<f64>,

    /// Source had deduplication enabled (heuristic ratio unless measured)
    #[arg(long)]
    pub dedup: bool,

    /// Source had compression enabled (heuristic ratio unless measured)
    #[arg(long)]
    pub compression: bool,

    /// Measured deduplication ratio, e.g. 1.5 for 1.5:1
    #[arg(long = "dedup-ratio")]
    pub dedup_ratio: Option<f64>,

    /// Measured compression ratio, e.g. 1.3 for 1.3:1
    #[arg(long = "compression-ratio")]
    pub compression_ratio: Option<f64>,

    /// Dead blocks were never reclaimed (UNMAP/TRIM off)
    #[arg(long = "no-reclaim")]
    pub no_reclaim: bool,

    /// VMs carry snapshot chains that will be consolidated
    #[arg(long)]
    pub snapshots: bool,
}

impl PolicyArgs {
    /// Overlay the flags onto the configured defaults and revalidate
    pub fn apply(&self, config: &mut EstimatorConfig) -> Result<()> {
        let defaults = &mut config.defaults;

        if !self.targets.is_empty() {
            defaults.targets = self.targets.clone();
        }
        if let Some(raid) = &self.raid {
            defaults.raid_policy = raid.clone();
        }
        if let Some(basis) = self.size_type {
            defaults.size_basis = basis;
        }
        if let Some(ratio) = self.thin_ratio {
            defaults.thin_fill_ratio = Some(ratio);
        }
        if self.dedup {
            defaults.dedup_enabled = true;
        }
        if self.compression {
            defaults.compression_enabled = true;
        }
        if let Some(ratio) = self.dedup_ratio {
            defaults.dedup_ratio = Some(ratio);
        }
        if let Some(ratio) = self.compression_ratio {
            defaults.compression_ratio = Some(ratio);
        }
        if self.no_reclaim {
            defaults.reclaim_enabled = false;
        }
        if self.snapshots {
            defaults.has_snapshots = true;
        }

        config.validate()
    }
}

#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    /// Inventory file (CSV with host,size columns, or a JSON array)
    pub input: PathBuf,

    /// Write the estimate CSV to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Unit of the size column
    #[arg(long, value_parser = parse_unit)]
    pub unit: Option<SizeUnit>,

    /// Decimal places for sizes in CSV output
    #[arg(long)]
    pub precision: Option<u32>,

    /// Show the adjustments applied to every host
    #[arg(long)]
    pub breakdown: bool,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SizeArgs {
    /// Reported size in GB
    #[arg(allow_negative_numbers = true)]
    pub size: f64,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PlatformsArgs {
    /// Platform name, alias, or RAID policy token to resolve
    pub identifier: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CostArgs {
    /// Destination platform
    #[arg(long = "target", short = 't')]
    pub target: String,

    /// Number of vCPUs
    #[arg(long)]
    pub cpus: u32,

    /// Allocated disk in GB
    #[arg(long)]
    pub disk: f64,
}
