//! Destination platforms and the registry that names them

pub mod registry;
pub mod transform;

use serde::{Deserialize, Serialize};

use crate::error::{MigsizeError, Result};

pub use registry::{Lookup, PlatformRegistry, RegistryEntry};
pub use transform::SizingTransform;

/// Disk sizes Azure managed disks are sold in (GiB)
pub const AZURE_DISK_TIERS: [f64; 14] = [
    4.0, 8.0, 16.0, 32.0, 64.0, 128.0, 256.0, 512.0, 1024.0, 2048.0, 4096.0, 8192.0, 16384.0,
    32767.0,
];

/// Per-destination sizing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRule {
    pub name: String,
    /// Human label recorded in estimate notes
    pub label: String,
    /// Fixed re-expansion factor. `None` derives it from the source
    /// policy's dedup and compression ratios; `Some(1.0)` suits targets
    /// that reduce data themselves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reexpansion_factor: Option<f64>,
    pub transform: SizingTransform,
}

impl PlatformRule {
    pub fn new(name: &str, label: &str, transform: SizingTransform) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            reexpansion_factor: None,
            transform,
        }
    }

    pub fn with_reexpansion_factor(mut self, factor: f64) -> Self {
        self.reexpansion_factor = Some(factor);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(factor) = self.reexpansion_factor {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(MigsizeError::invalid_value(
                    &format!("reexpansion_factor for {}", self.name),
                    factor,
                ));
            }
        }
        self.transform.validate()
    }

    /// VMware/ESXi datastore: thin provisioned, no rounding
    pub fn vmware() -> Self {
        Self::new(
            "vmware",
            "VMware thin provisioning",
            SizingTransform::Identity,
        )
    }

    /// AWS EBS gp3: whole GiB volumes
    pub fn aws() -> Self {
        Self::new(
            "aws",
            "AWS EBS gp3 (rounded up to 1 GiB)",
            SizingTransform::Ceiling { granularity: 1.0 },
        )
    }

    /// GCP Persistent Disk: 10 GiB minimum, whole GiB
    pub fn gcp() -> Self {
        Self::new(
            "gcp",
            "GCP Persistent Disk (min 10 GiB)",
            SizingTransform::FloorCeiling {
                minimum: 10.0,
                granularity: 1.0,
            },
        )
    }

    /// Azure managed disks: fixed size tiers
    pub fn azure() -> Self {
        Self::new(
            "azure",
            "Azure Managed Disk tier",
            SizingTransform::Tier {
                tiers: AZURE_DISK_TIERS.to_vec(),
            },
        )
    }
}
