//! Flat monthly cost heuristics
//!
//! Rough list-price arithmetic: an hourly rate per vCPU and a monthly rate
//! per GB of allocated storage. Good enough to compare destinations, not to
//! quote a bill.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::PriceConfig;
use crate::platform::registry::normalize_token;

const HOURS_PER_MONTH: f64 = 24.0 * 30.0;

/// Built-in per-platform prices (USD)
const BUILTIN_PRICES: [(&str, PriceConfig); 4] = [
    (
        "aws",
        PriceConfig {
            vcpu_hourly: 0.048,
            storage_gb_monthly: 0.10,
        },
    ),
    (
        "gcp",
        PriceConfig {
            vcpu_hourly: 0.0475,
            storage_gb_monthly: 0.17,
        },
    ),
    (
        "azure",
        PriceConfig {
            vcpu_hourly: 0.05,
            storage_gb_monthly: 0.15,
        },
    ),
    (
        "vmware",
        PriceConfig {
            vcpu_hourly: 0.0,
            storage_gb_monthly: 0.0,
        },
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    pub platform: String,
    pub compute_monthly: f64,
    pub storage_monthly: f64,
    pub total_monthly: f64,
    /// False when the platform has no price entry and all figures are zero
    pub priced: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceList {
    prices: BTreeMap<String, PriceConfig>,
}

impl Default for PriceList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PriceList {
    pub fn builtin() -> Self {
        Self {
            prices: BUILTIN_PRICES
                .iter()
                .map(|(name, price)| (name.to_string(), *price))
                .collect(),
        }
    }

    /// Built-in prices overlaid with configured ones
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, PriceConfig>) -> Self {
        for (name, price) in overrides {
            self.prices.insert(normalize_token(name), *price);
        }
        self
    }

    pub fn get(&self, platform: &str) -> Option<&PriceConfig> {
        self.prices.get(&normalize_token(platform))
    }

    /// Monthly cost of running `cpus` vCPUs with `disk_gb` of storage
    pub fn estimate(&self, platform: &str, cpus: u32, disk_gb: f64) -> CostEstimate {
        match self.get(platform) {
            Some(price) => {
                let compute_monthly = price.vcpu_hourly * f64::from(cpus) * HOURS_PER_MONTH;
                let storage_monthly = disk_gb * price.storage_gb_monthly;
                CostEstimate {
                    platform: platform.to_string(),
                    compute_monthly,
                    storage_monthly,
                    total_monthly: compute_monthly + storage_monthly,
                    priced: true,
                }
            }
            None => CostEstimate {
                platform: platform.to_string(),
                compute_monthly: 0.0,
                storage_monthly: 0.0,
                total_monthly: 0.0,
                priced: false,
            },
        }
    }
}
