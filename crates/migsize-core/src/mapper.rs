//! Target-platform mapping
//!
//! Re-expresses a logical size under a destination platform's rules:
//! re-inflation of data the source had deduplicated or compressed,
//! snapshot and swap deflation, then the platform's sizing transform.

use tracing::debug;

use crate::error::Result;
use crate::estimate::{Adjustment, SizeEstimate};
use crate::platform::PlatformRule;
use crate::policy::{StoragePolicy, SNAPSHOT_DEFLATION};
use crate::resolver::Resolution;

/// Map a resolved size onto a destination platform.
pub fn map_to_target(
    resolution: &Resolution,
    policy: &StoragePolicy,
    rule: &PlatformRule,
) -> Result<SizeEstimate> {
    policy.validate()?;
    rule.validate()?;

    let mut notes = resolution.notes.clone();

    if resolution.is_zero() {
        if !notes.contains(&Adjustment::ZeroSize) {
            notes.push(Adjustment::ZeroSize);
        }
        return Ok(SizeEstimate::new(&rule.name, 0.0, 0.0, 0.0, notes));
    }

    let expanded = reexpand(resolution.logical_size, policy, rule, &mut notes);
    let (target_size, transform_notes) = rule.transform.apply(expanded);
    notes.push(Adjustment::Platform {
        label: rule.label.clone(),
    });
    notes.extend(transform_notes);

    debug!(
        platform = %rule.name,
        logical_size = resolution.logical_size,
        expanded,
        target_size,
        "map_to_target"
    );

    Ok(SizeEstimate::new(
        &rule.name,
        resolution.reported_size,
        resolution.logical_size,
        target_size,
        notes,
    ))
}

/// Step A: undo data reduction, then drop snapshot and swap content.
fn reexpand(
    logical_size: f64,
    policy: &StoragePolicy,
    rule: &PlatformRule,
    notes: &mut Vec<Adjustment>,
) -> f64 {
    let mut value = logical_size;

    match rule.reexpansion_factor {
        Some(factor) => {
            value *= factor;
            if factor != 1.0 {
                notes.push(Adjustment::FixedExpansion { factor });
            }
        }
        None => {
            if let Some(expansion) = policy.reduction_expansion() {
                value *= expansion;
                notes.push(Adjustment::ReductionExpansion {
                    dedup: policy.dedup_ratio,
                    compression: policy.compression_ratio,
                });
            }
        }
    }

    // Snapshots consolidate to current state regardless of dedup accounting.
    if policy.has_snapshots {
        value *= SNAPSHOT_DEFLATION;
        notes.push(Adjustment::SnapshotConsolidation {
            factor: SNAPSHOT_DEFLATION,
        });
    }

    value *= policy.swap_deflation;
    if policy.swap_deflation < 1.0 {
        notes.push(Adjustment::SwapExcluded {
            factor: policy.swap_deflation,
        });
    }

    value
}
