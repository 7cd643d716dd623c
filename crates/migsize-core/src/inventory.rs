//! VM inventory records
//!
//! A [`VmRecord`] carries the per-VM fields handed over by the discovery
//! side (a management-plane export, a CSV sheet). Optional fields fall back
//! to the run-wide [`PolicyDefaults`]; missing ratios are substituted, never
//! treated as errors.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{PolicyDefaults, SizeUnit};
use crate::csv::{self, Row, Table};
use crate::error::{MigsizeError, Result};
use crate::estimate::Adjustment;
use crate::platform::PlatformRegistry;
use crate::policy::{SizeBasis, StoragePolicy};

/// One VM as reported by the source platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmRecord {
    pub name: String,
    pub cluster: Option<String>,
    /// Reported size in GB
    pub reported_size: f64,
    pub size_basis: Option<SizeBasis>,
    pub thin_fill_ratio: Option<f64>,
    pub raid_policy: Option<String>,
    pub dedup_enabled: Option<bool>,
    pub compression_enabled: Option<bool>,
    pub dedup_ratio: Option<f64>,
    pub compression_ratio: Option<f64>,
    pub has_snapshots: Option<bool>,
    pub reclaim_enabled: Option<bool>,
    pub cpus: Option<u32>,
}

/// A row that could not be turned into a record or an estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub host: String,
    pub reason: String,
}

/// Parsed inventory: usable records plus rejected rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub records: Vec<VmRecord>,
    pub rejected: Vec<RecordFailure>,
}

/// Pick the reduction ratio for one feature: the measured ratio when it
/// shows a reduction, else the heuristic; 1.0 when the feature is off.
fn reduction_ratio(
    field: &'static str,
    enabled: Option<bool>,
    default_enabled: bool,
    measured: Option<f64>,
    heuristic: f64,
) -> Result<f64> {
    if let Some(ratio) = measured {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(MigsizeError::invalid_policy(field, ratio, "must be > 0"));
        }
    }
    let enabled =
        enabled.unwrap_or_else(|| default_enabled || measured.is_some_and(|ratio| ratio > 1.0));
    if !enabled {
        return Ok(1.0);
    }
    Ok(match measured {
        Some(ratio) if ratio > 1.0 => ratio,
        _ => heuristic,
    })
}

impl PolicyDefaults {
    /// Build the storage policy for a record, returning any fallback notes
    /// (an unknown RAID token) alongside it.
    pub fn policy_for(
        &self,
        record: &VmRecord,
        registry: &PlatformRegistry,
    ) -> Result<(StoragePolicy, Vec<Adjustment>)> {
        let token = record.raid_policy.as_deref().unwrap_or(&self.raid_policy);
        let overhead = registry.raid_overhead(token);

        let policy = StoragePolicy {
            raid_overhead: overhead.value,
            size_basis: record.size_basis.unwrap_or(self.size_basis),
            thin_fill_ratio: record.thin_fill_ratio.or(self.thin_fill_ratio),
            dedup_ratio: reduction_ratio(
                "dedup_ratio",
                record.dedup_enabled,
                self.dedup_enabled,
                record.dedup_ratio.or(self.dedup_ratio),
                self.heuristic_dedup_ratio,
            )?,
            compression_ratio: reduction_ratio(
                "compression_ratio",
                record.compression_enabled,
                self.compression_enabled,
                record.compression_ratio.or(self.compression_ratio),
                self.heuristic_compression_ratio,
            )?,
            reclaim_enabled: record.reclaim_enabled.unwrap_or(self.reclaim_enabled),
            has_snapshots: record.has_snapshots.unwrap_or(self.has_snapshots),
            swap_deflation: self.swap_deflation,
        };
        policy.validate()?;

        Ok((policy, overhead.fallback.into_iter().collect()))
    }
}

/// Column indexes of the recognised inventory columns
struct Columns {
    host: usize,
    size: usize,
    cluster: Option<usize>,
    raid_policy: Option<usize>,
    size_basis: Option<usize>,
    thin_ratio: Option<usize>,
    dedup_enabled: Option<usize>,
    compression_enabled: Option<usize>,
    dedup_ratio: Option<usize>,
    compression_ratio: Option<usize>,
    has_snapshots: Option<usize>,
    reclaim_enabled: Option<usize>,
    cpus: Option<usize>,
}

impl Columns {
    fn locate(table: &Table) -> Result<Self> {
        Ok(Self {
            host: table.require("host")?,
            size: table.require("size")?,
            cluster: table.column("cluster"),
            raid_policy: table.column("raid_policy"),
            size_basis: table.column("size_basis"),
            thin_ratio: table.column("thin_ratio"),
            dedup_enabled: table.column("dedup_enabled"),
            compression_enabled: table.column("compression_enabled"),
            dedup_ratio: table.column("dedup_ratio"),
            compression_ratio: table.column("compression_ratio"),
            has_snapshots: table.column("has_snapshots"),
            reclaim_enabled: table.column("reclaim_enabled"),
            cpus: table.column("cpus"),
        })
    }
}

fn parse_bool(value: &str) -> std::result::Result<bool, String> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(format!("expected a boolean, got '{}'", other)),
    }
}

fn parse_f64(column: &str, value: &str) -> std::result::Result<f64, String> {
    value
        .parse::<f64>()
        .map_err(|_| format!("{} is not a number: '{}'", column, value))
}

fn optional<T>(
    value: Option<&str>,
    parse: impl Fn(&str) -> std::result::Result<T, String>,
) -> std::result::Result<Option<T>, String> {
    value.map(parse).transpose()
}

fn record_from_row(
    row: &Row,
    columns: &Columns,
    unit: SizeUnit,
) -> std::result::Result<VmRecord, String> {
    let name = row
        .get(Some(columns.host))
        .ok_or_else(|| "host is empty".to_string())?
        .to_string();
    let size = row
        .get(Some(columns.size))
        .ok_or_else(|| "size is empty".to_string())?;

    Ok(VmRecord {
        name,
        cluster: row.get(columns.cluster).map(str::to_string),
        reported_size: unit.to_gb(parse_f64("size", size)?),
        size_basis: optional(row.get(columns.size_basis), |v| {
            v.parse::<SizeBasis>().map_err(|e| e.to_string())
        })?,
        thin_fill_ratio: optional(row.get(columns.thin_ratio), |v| parse_f64("thin_ratio", v))?,
        raid_policy: row.get(columns.raid_policy).map(str::to_string),
        dedup_enabled: optional(row.get(columns.dedup_enabled), parse_bool)?,
        compression_enabled: optional(row.get(columns.compression_enabled), parse_bool)?,
        dedup_ratio: optional(row.get(columns.dedup_ratio), |v| parse_f64("dedup_ratio", v))?,
        compression_ratio: optional(row.get(columns.compression_ratio), |v| {
            parse_f64("compression_ratio", v)
        })?,
        has_snapshots: optional(row.get(columns.has_snapshots), parse_bool)?,
        reclaim_enabled: optional(row.get(columns.reclaim_enabled), parse_bool)?,
        cpus: optional(row.get(columns.cpus), |v| {
            v.parse::<u32>()
                .map_err(|_| format!("cpus is not a whole number: '{}'", v))
        })?,
    })
}

impl Inventory {
    /// Parse a CSV inventory. Header problems fail the whole parse; bad
    /// rows are collected in `rejected`.
    pub fn from_csv(text: &str, unit: SizeUnit) -> Result<Self> {
        let table = csv::parse(text)?;
        let columns = Columns::locate(&table)?;

        let mut inventory = Inventory::default();
        for row in &table.rows {
            match record_from_row(row, &columns, unit) {
                Ok(record) => inventory.records.push(record),
                Err(reason) => inventory.rejected.push(RecordFailure {
                    line: Some(row.line),
                    host: row.get(Some(columns.host)).unwrap_or_default().to_string(),
                    reason,
                }),
            }
        }
        Ok(inventory)
    }

    /// Parse a JSON array of records (sizes already in GB unless `unit`
    /// says otherwise).
    pub fn from_json(text: &str, unit: SizeUnit) -> Result<Self> {
        let mut records: Vec<VmRecord> = serde_json::from_str(text)?;
        for record in &mut records {
            record.reported_size = unit.to_gb(record.reported_size);
        }
        Ok(Inventory {
            records,
            rejected: Vec::new(),
        })
    }

    /// Read an inventory file, choosing the parser by extension
    pub fn load(path: &Path, unit: SizeUnit) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MigsizeError::io_operation("read inventory", path.display(), e))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text, unit)
        } else {
            Self::from_csv(&text, unit)
        }
    }

    pub fn len(&self) -> usize {
        self.records.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
