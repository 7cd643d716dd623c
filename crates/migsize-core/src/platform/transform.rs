//! Platform sizing transforms
//!
//! The set of strategies is closed: every destination either keeps the
//! fractional size, rounds it up to an allocation granularity (optionally
//! after a minimum floor), or snaps it to a discrete tier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MigsizeError, Result};
use crate::estimate::Adjustment;

/// How a destination platform turns a required size into an allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SizingTransform {
    /// Thin-provisioned target; the value is kept as is
    Identity,
    /// Round up to the next multiple of `granularity`
    Ceiling { granularity: f64 },
    /// Raise to `minimum` first, then round up to `granularity`
    FloorCeiling { minimum: f64, granularity: f64 },
    /// Smallest tier at or above the value, capped at the largest tier
    Tier { tiers: Vec<f64> },
}

impl SizingTransform {
    /// Apply the transform, returning the allocated size and any
    /// adjustments that fired.
    pub fn apply(&self, value: f64) -> (f64, Vec<Adjustment>) {
        match self {
            SizingTransform::Identity => (value, Vec::new()),
            SizingTransform::Ceiling { granularity } => (ceil_to(value, *granularity), Vec::new()),
            SizingTransform::FloorCeiling {
                minimum,
                granularity,
            } => {
                // Minimum applies before rounding
                if value < *minimum {
                    (
                        ceil_to(*minimum, *granularity),
                        vec![Adjustment::MinimumRaised { minimum: *minimum }],
                    )
                } else {
                    (ceil_to(value, *granularity), Vec::new())
                }
            }
            SizingTransform::Tier { tiers } => select_tier(tiers, value),
        }
    }

    /// Check the transform's parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            SizingTransform::Identity => Ok(()),
            SizingTransform::Ceiling { granularity } => check_granularity(*granularity),
            SizingTransform::FloorCeiling {
                minimum,
                granularity,
            } => {
                check_granularity(*granularity)?;
                if !minimum.is_finite() || *minimum < 0.0 {
                    return Err(MigsizeError::invalid_value("minimum", minimum));
                }
                Ok(())
            }
            SizingTransform::Tier { tiers } => {
                if tiers.is_empty() {
                    return Err(MigsizeError::invalid_value("tiers", "[] (empty)"));
                }
                if tiers.iter().any(|t| !t.is_finite() || *t <= 0.0)
                    || tiers.windows(2).any(|w| w[0] >= w[1])
                {
                    return Err(MigsizeError::invalid_value(
                        "tiers",
                        format!("{:?} (must be positive and strictly ascending)", tiers),
                    ));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for SizingTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizingTransform::Identity => write!(f, "identity"),
            SizingTransform::Ceiling { granularity } => write!(f, "ceiling({})", granularity),
            SizingTransform::FloorCeiling {
                minimum,
                granularity,
            } => write!(f, "minimum({}) + ceiling({})", minimum, granularity),
            SizingTransform::Tier { tiers } => {
                let list: Vec<String> = tiers.iter().map(|t| t.to_string()).collect();
                write!(f, "tier[{}]", list.join(","))
            }
        }
    }
}

fn check_granularity(granularity: f64) -> Result<()> {
    if !granularity.is_finite() || granularity <= 0.0 {
        return Err(MigsizeError::invalid_value("granularity", granularity));
    }
    Ok(())
}

fn ceil_to(value: f64, granularity: f64) -> f64 {
    granularity * (value / granularity).ceil()
}

fn select_tier(tiers: &[f64], value: f64) -> (f64, Vec<Adjustment>) {
    match tiers.iter().find(|tier| **tier >= value) {
        Some(tier) => (*tier, Vec::new()),
        None => {
            let largest = tiers.last().copied().unwrap_or(value);
            (largest, vec![Adjustment::TierCapped { largest }])
        }
    }
}
