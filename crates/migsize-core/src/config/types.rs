//! Configuration type definitions

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MigsizeError;
use crate::platform::registry::{DEFAULT_PLATFORM, DEFAULT_RAID_POLICY};
use crate::platform::SizingTransform;
use crate::policy::{
    SizeBasis, DEFAULT_COMPRESSION_RATIO, DEFAULT_DEDUP_RATIO, DEFAULT_SWAP_DEFLATION,
};

/// Bytes in one GiB, the unit every size is expressed in internally
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Unit of the sizes in an inventory file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    #[default]
    Gb,
    Bytes,
}

impl SizeUnit {
    /// Convert a size in this unit to GB
    pub fn to_gb(self, value: f64) -> f64 {
        match self {
            SizeUnit::Gb => value,
            SizeUnit::Bytes => value / BYTES_PER_GB,
        }
    }
}

impl FromStr for SizeUnit {
    type Err = MigsizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gb" | "gib" => Ok(SizeUnit::Gb),
            "bytes" | "b" => Ok(SizeUnit::Bytes),
            other => Err(MigsizeError::invalid_value("size unit", other)),
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeUnit::Gb => write!(f, "gb"),
            SizeUnit::Bytes => write!(f, "bytes"),
        }
    }
}

/// Run-wide defaults applied to every inventory record that does not
/// carry its own value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyDefaults {
    pub raid_policy: String,
    pub size_basis: SizeBasis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thin_fill_ratio: Option<f64>,

    pub dedup_enabled: bool,
    pub compression_enabled: bool,
    /// Measured ratios that apply to the whole inventory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedup_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
    /// Used when a reduction is enabled but nothing was measured
    pub heuristic_dedup_ratio: f64,
    pub heuristic_compression_ratio: f64,

    pub reclaim_enabled: bool,
    pub has_snapshots: bool,
    pub swap_deflation: f64,

    /// Destination platforms estimated when none are given on the CLI
    pub targets: Vec<String>,
    pub unit: SizeUnit,
    /// Decimal places used when serializing sizes
    pub precision: u32,
    /// Platform that unknown names fall back to
    pub default_platform: String,
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self {
            raid_policy: DEFAULT_RAID_POLICY.to_string(),
            size_basis: SizeBasis::Provisioned,
            thin_fill_ratio: None,
            dedup_enabled: false,
            compression_enabled: false,
            dedup_ratio: None,
            compression_ratio: None,
            heuristic_dedup_ratio: DEFAULT_DEDUP_RATIO,
            heuristic_compression_ratio: DEFAULT_COMPRESSION_RATIO,
            reclaim_enabled: true,
            has_snapshots: false,
            swap_deflation: DEFAULT_SWAP_DEFLATION,
            targets: vec![DEFAULT_PLATFORM.to_string()],
            unit: SizeUnit::Gb,
            precision: 2,
            default_platform: DEFAULT_PLATFORM.to_string(),
        }
    }
}

/// A platform defined or overridden in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reexpansion_factor: Option<f64>,
    pub transform: SizingTransform,
}

/// Flat per-resource prices for one platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceConfig {
    pub vcpu_hourly: f64,
    pub storage_gb_monthly: f64,
}

/// Top-level estimator configuration (`migsize.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    #[serde(default)]
    pub defaults: PolicyDefaults,

    /// Extra or overriding `token = multiplier` entries
    #[serde(default)]
    pub raid_overheads: BTreeMap<String, f64>,

    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformConfig>,

    #[serde(default)]
    pub pricing: BTreeMap<String, PriceConfig>,
}
