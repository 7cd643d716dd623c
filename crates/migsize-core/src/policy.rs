//! Source-platform storage policy
//!
//! A [`StoragePolicy`] describes how the hyperconverged source platform
//! stored a VM's data: replication/parity overhead, thin-provisioning
//! accounting, data reduction, and the inflation effects that make the
//! reported figure larger than the data that will actually migrate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MigsizeError, Result};

/// Fraction of reported blocks that are live data when space reclamation
/// (UNMAP/TRIM) is disabled on the source.
pub const RECLAIM_DEFLATION: f64 = 0.90;

/// Size retained after snapshot chains consolidate into the base disk.
pub const SNAPSHOT_DEFLATION: f64 = 0.90;

/// Size retained once VM swap files are dropped (they are regenerated on
/// the destination). Applied by configured defaults, not by bare policies.
pub const DEFAULT_SWAP_DEFLATION: f64 = 0.95;

/// Heuristic dedup expansion when dedup is on but no ratio was measured.
pub const DEFAULT_DEDUP_RATIO: f64 = 1.4;

/// Heuristic compression expansion when compression is on but no ratio
/// was measured.
pub const DEFAULT_COMPRESSION_RATIO: f64 = 1.25;

/// Whether a reported size counts the whole provisioned disk or only
/// written blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeBasis {
    /// The declared maximum size of the virtual disks
    #[default]
    Provisioned,
    /// Blocks actually written
    Used,
}

impl FromStr for SizeBasis {
    type Err = MigsizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "provisioned" => Ok(SizeBasis::Provisioned),
            "used" => Ok(SizeBasis::Used),
            other => Err(MigsizeError::invalid_value("size basis", other)),
        }
    }
}

impl fmt::Display for SizeBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeBasis::Provisioned => write!(f, "provisioned"),
            SizeBasis::Used => write!(f, "used"),
        }
    }
}

/// Immutable description of how the source platform stores a VM's data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoragePolicy {
    /// Physical bytes consumed per logical byte (mirroring/erasure coding)
    pub raid_overhead: f64,
    pub size_basis: SizeBasis,
    /// Written fraction of a provisioned disk; ignored for `used` sizes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thin_fill_ratio: Option<f64>,
    pub dedup_ratio: f64,
    pub compression_ratio: f64,
    pub reclaim_enabled: bool,
    pub has_snapshots: bool,
    /// Size retained after swap files are dropped; 1.0 means no swap content
    #[serde(default = "one")]
    pub swap_deflation: f64,
}

fn one() -> f64 {
    1.0
}

impl Default for StoragePolicy {
    /// The identity policy: a single copy, no reduction, nothing to deflate.
    fn default() -> Self {
        Self {
            raid_overhead: 1.0,
            size_basis: SizeBasis::Used,
            thin_fill_ratio: None,
            dedup_ratio: 1.0,
            compression_ratio: 1.0,
            reclaim_enabled: true,
            has_snapshots: false,
            swap_deflation: 1.0,
        }
    }
}

impl StoragePolicy {
    /// Identity policy with the given overhead on a `used` size
    pub fn with_overhead(raid_overhead: f64) -> Self {
        Self {
            raid_overhead,
            ..Self::default()
        }
    }

    /// Combined dedup × compression expansion, or `None` when neither
    /// reduction was in effect.
    pub fn reduction_expansion(&self) -> Option<f64> {
        if self.dedup_ratio > 1.0 || self.compression_ratio > 1.0 {
            Some(self.dedup_ratio * self.compression_ratio)
        } else {
            None
        }
    }

    /// Check every ratio against its domain. Out-of-range values are
    /// rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        if !self.raid_overhead.is_finite() || self.raid_overhead < 1.0 {
            return Err(MigsizeError::invalid_policy(
                "raid_overhead",
                self.raid_overhead,
                "must be >= 1.0",
            ));
        }
        if let Some(fill) = self.thin_fill_ratio {
            if !fill.is_finite() || fill <= 0.0 || fill > 1.0 {
                return Err(MigsizeError::invalid_policy(
                    "thin_fill_ratio",
                    fill,
                    "must be in (0, 1]",
                ));
            }
        }
        for (field, value) in [
            ("dedup_ratio", self.dedup_ratio),
            ("compression_ratio", self.compression_ratio),
        ] {
            if !value.is_finite() || value < 1.0 {
                return Err(MigsizeError::invalid_policy(field, value, "must be >= 1.0"));
            }
        }
        if !self.swap_deflation.is_finite()
            || self.swap_deflation <= 0.0
            || self.swap_deflation > 1.0
        {
            return Err(MigsizeError::invalid_policy(
                "swap_deflation",
                self.swap_deflation,
                "must be in (0, 1]",
            ));
        }
        Ok(())
    }
}
