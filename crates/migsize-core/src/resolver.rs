//! Logical-size resolution
//!
//! Strips the source platform's storage overhead from a reported size:
//! thin-provisioning accounting, replica/parity overhead, and unreclaimed
//! dead blocks. What remains is the best estimate of the unique, durable
//! data the VM actually holds.

use tracing::debug;

use crate::error::{MigsizeError, Result};
use crate::estimate::Adjustment;
use crate::policy::{SizeBasis, StoragePolicy, RECLAIM_DEFLATION};

/// A resolved logical size and the adjustments that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub reported_size: f64,
    pub logical_size: f64,
    pub notes: Vec<Adjustment>,
}

impl Resolution {
    /// Start from an already-known logical size (reported == logical)
    pub fn from_logical(logical_size: f64) -> Result<Self> {
        check_size(logical_size)?;
        Ok(Self {
            reported_size: logical_size,
            logical_size,
            notes: Vec::new(),
        })
    }

    pub fn is_zero(&self) -> bool {
        self.reported_size == 0.0
    }
}

/// Reject negative and non-finite sizes
pub fn check_size(value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(MigsizeError::InvalidSize { value });
    }
    Ok(())
}

/// Resolve the logical size of a reported size.
pub fn resolve(reported_size: f64, policy: &StoragePolicy) -> Result<f64> {
    resolve_detailed(reported_size, policy).map(|resolution| resolution.logical_size)
}

/// Resolve the logical size, keeping the adjustments that fired.
///
/// Steps run strictly in order: basis normalization, overhead removal,
/// reclaim deflation. No intermediate value is rounded.
pub fn resolve_detailed(reported_size: f64, policy: &StoragePolicy) -> Result<Resolution> {
    check_size(reported_size)?;
    policy.validate()?;

    let mut notes = Vec::new();

    if reported_size == 0.0 {
        notes.push(Adjustment::ZeroSize);
        return Ok(Resolution {
            reported_size,
            logical_size: 0.0,
            notes,
        });
    }

    let mut working = reported_size;

    if let (SizeBasis::Provisioned, Some(fill)) = (policy.size_basis, policy.thin_fill_ratio) {
        working *= fill;
        notes.push(Adjustment::ThinFill { ratio: fill });
    }

    // Replicas and parity scale with the data, so they divide out.
    working /= policy.raid_overhead;
    if policy.raid_overhead > 1.0 {
        notes.push(Adjustment::RaidRemoved {
            overhead: policy.raid_overhead,
        });
    }

    if !policy.reclaim_enabled {
        working *= RECLAIM_DEFLATION;
        notes.push(Adjustment::Reclaim {
            factor: RECLAIM_DEFLATION,
        });
    }

    debug!(
        reported_size,
        logical_size = working,
        raid_overhead = policy.raid_overhead,
        "resolve"
    );

    Ok(Resolution {
        reported_size,
        logical_size: working,
        notes,
    })
}
