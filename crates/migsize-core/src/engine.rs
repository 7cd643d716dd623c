//! Estimator: resolver + registry + mapper
//!
//! Holds nothing but an immutable [`PlatformRegistry`], so one estimator
//! can be shared freely across threads and every call is independent.

use crate::error::Result;
use crate::estimate::{Adjustment, SizeEstimate};
use crate::mapper::map_to_target;
use crate::platform::{PlatformRegistry, PlatformRule};
use crate::policy::StoragePolicy;
use crate::resolver::{resolve_detailed, Resolution};

/// Resolve and map a reported size onto one platform rule.
pub fn estimate(
    reported_size: f64,
    policy: &StoragePolicy,
    rule: &PlatformRule,
) -> Result<SizeEstimate> {
    let resolution = resolve_detailed(reported_size, policy)?;
    map_to_target(&resolution, policy, rule)
}

#[derive(Debug, Clone, Default)]
pub struct Estimator {
    registry: PlatformRegistry,
}

impl Estimator {
    pub fn new(registry: PlatformRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// Estimate one reported size for each named platform.
    ///
    /// The logical size is resolved once and mapped per platform. `prior`
    /// notes (e.g. a RAID fallback made while building the policy) lead
    /// every estimate's notes; unknown platform names use the registry
    /// default and say so.
    pub fn estimate_targets<S: AsRef<str>>(
        &self,
        reported_size: f64,
        policy: &StoragePolicy,
        prior: &[Adjustment],
        targets: &[S],
    ) -> Result<Vec<SizeEstimate>> {
        let mut resolution = resolve_detailed(reported_size, policy)?;
        resolution.notes.splice(0..0, prior.iter().cloned());

        targets
            .iter()
            .map(|target| self.estimate_resolved(&resolution, policy, target.as_ref()))
            .collect()
    }

    /// Map an existing resolution onto a named platform
    pub fn estimate_resolved(
        &self,
        resolution: &Resolution,
        policy: &StoragePolicy,
        target: &str,
    ) -> Result<SizeEstimate> {
        let lookup = self.registry.platform(target);
        match lookup.fallback {
            Some(note) => {
                let mut noted = resolution.clone();
                noted.notes.insert(0, note);
                map_to_target(&noted, policy, lookup.value)
            }
            None => map_to_target(resolution, policy, lookup.value),
        }
    }
}
