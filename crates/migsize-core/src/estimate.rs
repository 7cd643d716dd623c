//! Size-estimation records and the adjustments that produce them

use std::fmt;

use serde::{Serialize, Serializer};

/// One adjustment applied while estimating, kept in application order so
/// every number in a [`SizeEstimate`] can be audited.
#[derive(Debug, Clone, PartialEq)]
pub enum Adjustment {
    /// Reported size was zero; every figure is zero
    ZeroSize,
    /// RAID token not in the table; the default overhead was used
    RaidFallback { token: String, overhead: f64 },
    /// Platform name not in the registry; the default rule was used
    PlatformFallback { requested: String, fallback: String },
    /// Provisioned size scaled down to written data
    ThinFill { ratio: f64 },
    /// Replica/parity overhead divided out
    RaidRemoved { overhead: f64 },
    /// Unreclaimed dead blocks deflated
    Reclaim { factor: f64 },
    /// Lost dedup/compression re-inflated
    ReductionExpansion { dedup: f64, compression: f64 },
    /// Platform-specific re-expansion factor
    FixedExpansion { factor: f64 },
    /// Snapshot chains consolidated
    SnapshotConsolidation { factor: f64 },
    /// Swap files excluded
    SwapExcluded { factor: f64 },
    /// Sub-minimum size raised to the platform minimum
    MinimumRaised { minimum: f64 },
    /// Platform sizing transform applied
    Platform { label: String },
    /// Size exceeded the largest tier; the largest tier was used
    TierCapped { largest: f64 },
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adjustment::ZeroSize => write!(f, "Zero reported size"),
            Adjustment::RaidFallback { token, overhead } => write!(
                f,
                "Unknown RAID policy '{}', assumed ×{:.2}",
                token, overhead
            ),
            Adjustment::PlatformFallback {
                requested,
                fallback,
            } => write!(
                f,
                "Unknown platform '{}', used {} rules",
                requested, fallback
            ),
            Adjustment::ThinFill { ratio } => {
                write!(f, "Thin provisioned ({:.0}% used)", ratio * 100.0)
            }
            Adjustment::RaidRemoved { overhead } => {
                write!(f, "Primary data (÷{:.2} RAID)", overhead)
            }
            Adjustment::Reclaim { factor } => {
                write!(f, "Unreclaimed blocks ×{:.2}", factor)
            }
            Adjustment::ReductionExpansion { dedup, compression } => write!(
                f,
                "Dedup/compression expansion ×{:.2} (dedup {:.2}, compression {:.2})",
                dedup * compression,
                dedup,
                compression
            ),
            Adjustment::FixedExpansion { factor } => {
                write!(f, "Platform expansion ×{:.2}", factor)
            }
            Adjustment::SnapshotConsolidation { factor } => {
                write!(f, "Snapshot consolidation ×{:.2}", factor)
            }
            Adjustment::SwapExcluded { factor } => write!(f, "Swap excluded ×{:.2}", factor),
            Adjustment::MinimumRaised { minimum } => {
                write!(f, "Raised to minimum {} GiB", minimum)
            }
            Adjustment::Platform { label } => write!(f, "{}", label),
            Adjustment::TierCapped { largest } => write!(
                f,
                "Exceeds largest tier; capped at {} GiB (split across disks)",
                largest
            ),
        }
    }
}

impl Serialize for Adjustment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The estimate for one (VM, target platform) pair.
///
/// Constructed once per estimation call and never mutated. `delta` and
/// `delta_pct` compare against the reported size, since the question being
/// answered is how the migrated footprint compares with what is seen today.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeEstimate {
    pub platform: String,
    pub reported_size: f64,
    pub logical_size: f64,
    pub target_size: f64,
    pub delta: f64,
    /// Percentage change; zero when the reported size is zero
    pub delta_pct: f64,
    pub notes: Vec<Adjustment>,
}

impl SizeEstimate {
    pub(crate) fn new(
        platform: impl Into<String>,
        reported_size: f64,
        logical_size: f64,
        target_size: f64,
        notes: Vec<Adjustment>,
    ) -> Self {
        let delta = target_size - reported_size;
        let delta_pct = if reported_size > 0.0 {
            delta / reported_size * 100.0
        } else {
            0.0
        };
        Self {
            platform: platform.into(),
            reported_size,
            logical_size,
            target_size,
            delta,
            delta_pct,
            notes,
        }
    }

    /// Notes joined for single-field output
    pub fn notes_text(&self) -> String {
        self.notes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Whether an estimate fell back to a default or hit a cap
    pub fn has_caution(&self) -> bool {
        self.notes.iter().any(|note| {
            matches!(
                note,
                Adjustment::RaidFallback { .. }
                    | Adjustment::PlatformFallback { .. }
                    | Adjustment::TierCapped { .. }
            )
        })
    }
}
