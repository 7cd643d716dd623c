//! Serialized estimate records
//!
//! Batch output has one row per (VM, platform) with a fixed column order.
//! Numbers are rounded here and only here.

use crate::batch::EstimateRow;
use crate::csv;
use crate::error::Result;

/// Output column order
pub const COLUMNS: [&str; 8] = [
    "host",
    "platform",
    "source_size",
    "logical_size",
    "target_size",
    "delta",
    "delta_pct",
    "notes",
];

/// Decimal places for `delta_pct`
pub const PCT_PRECISION: u32 = 1;

/// Round half away from zero to `places` decimals, folding `-0` into `0`
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Format with exactly `places` decimals
pub fn format_fixed(value: f64, places: u32) -> String {
    format!("{:.*}", places as usize, round_to(value, places))
}

/// Output fields for one estimate row, in [`COLUMNS`] order
pub fn record_fields(row: &EstimateRow, precision: u32) -> [String; 8] {
    let estimate = &row.estimate;
    [
        row.host.clone(),
        estimate.platform.clone(),
        format_fixed(estimate.reported_size, precision),
        format_fixed(estimate.logical_size, precision),
        format_fixed(estimate.target_size, precision),
        format_fixed(estimate.delta, precision),
        format_fixed(estimate.delta_pct, PCT_PRECISION),
        estimate.notes_text(),
    ]
}

/// Full CSV document (header plus rows, newline-terminated)
pub fn to_csv(rows: &[EstimateRow], precision: u32) -> Result<String> {
    csv::write(
        &COLUMNS,
        rows.iter().map(|row| record_fields(row, precision)),
    )
}
