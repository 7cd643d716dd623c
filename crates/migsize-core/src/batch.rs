//! Batch estimation over an inventory
//!
//! Every (record, platform) pair is computed independently. A record that
//! fails is reported and skipped; it never stops the rest of the batch.
//! Totals are aggregated here, over finished estimates, not by the engine.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::PolicyDefaults;
use crate::engine::Estimator;
use crate::estimate::SizeEstimate;
use crate::inventory::{Inventory, RecordFailure, VmRecord};
use crate::trace_time;

/// One output row: a VM estimated on one platform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateRow {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
    #[serde(flatten)]
    pub estimate: SizeEstimate,
}

/// Totals for one platform across the batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformTotals {
    pub platform: String,
    pub hosts: usize,
    pub source_total: f64,
    pub logical_total: f64,
    pub target_total: f64,
    pub change: f64,
    pub change_pct: f64,
    /// Estimates that fell back to a default or hit a tier cap
    pub cautions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub records: usize,
    pub estimated: usize,
    pub failed: usize,
    pub platforms: Vec<PlatformTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub rows: Vec<EstimateRow>,
    pub failures: Vec<RecordFailure>,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

fn estimate_record(
    record: &VmRecord,
    targets: &[String],
    estimator: &Estimator,
    defaults: &PolicyDefaults,
) -> crate::error::Result<Vec<EstimateRow>> {
    let (policy, prior) = defaults.policy_for(record, estimator.registry())?;
    let estimates = estimator.estimate_targets(record.reported_size, &policy, &prior, targets)?;
    Ok(estimates
        .into_iter()
        .map(|estimate| EstimateRow {
            host: record.name.clone(),
            cluster: record.cluster.clone(),
            cpus: record.cpus,
            estimate,
        })
        .collect())
}

/// Estimate every inventory record on every target platform.
pub fn estimate_batch(
    inventory: &Inventory,
    targets: &[String],
    estimator: &Estimator,
    defaults: &PolicyDefaults,
) -> BatchReport {
    let start = Instant::now();
    let mut rows = Vec::with_capacity(inventory.records.len() * targets.len());
    let mut failures = inventory.rejected.clone();

    for failure in &inventory.rejected {
        warn!(host = %failure.host, line = ?failure.line, reason = %failure.reason, "rejected record");
    }

    for record in &inventory.records {
        match estimate_record(record, targets, estimator, defaults) {
            Ok(estimated) => rows.extend(estimated),
            Err(err) => {
                warn!(host = %record.name, error = %err, "estimate failed");
                failures.push(RecordFailure {
                    line: None,
                    host: record.name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    let summary = summarize(&rows, inventory.len(), failures.len());
    debug!(
        records = summary.records,
        failed = summary.failed,
        rows = rows.len(),
        "estimate_batch"
    );
    trace_time!(start, "estimate_batch");

    BatchReport {
        rows,
        failures,
        summary,
    }
}

/// Aggregate per-platform totals, in order of first appearance
pub fn summarize(rows: &[EstimateRow], records: usize, failed: usize) -> BatchSummary {
    let mut order: Vec<String> = Vec::new();
    let mut totals: BTreeMap<String, PlatformTotals> = BTreeMap::new();

    for row in rows {
        let estimate = &row.estimate;
        let entry = totals.entry(estimate.platform.clone()).or_insert_with(|| {
            order.push(estimate.platform.clone());
            PlatformTotals {
                platform: estimate.platform.clone(),
                hosts: 0,
                source_total: 0.0,
                logical_total: 0.0,
                target_total: 0.0,
                change: 0.0,
                change_pct: 0.0,
                cautions: 0,
            }
        });
        entry.hosts += 1;
        entry.source_total += estimate.reported_size;
        entry.logical_total += estimate.logical_size;
        entry.target_total += estimate.target_size;
        if estimate.has_caution() {
            entry.cautions += 1;
        }
    }

    let platforms = order
        .iter()
        .filter_map(|name| totals.remove(name))
        .map(|mut total| {
            total.change = total.target_total - total.source_total;
            total.change_pct = if total.source_total > 0.0 {
                total.change / total.source_total * 100.0
            } else {
                0.0
            };
            total
        })
        .collect();

    BatchSummary {
        records,
        estimated: records.saturating_sub(failed),
        failed,
        platforms,
    }
}
