//! `migsize estimate` command - batch estimation over an inventory file

use std::fs;
use std::io::{self, Write};
use std::time::Instant;

use chrono::Utc;
use migsize_core::batch::{estimate_batch, BatchReport, BatchSummary, EstimateRow};
use migsize_core::config::PolicyDefaults;
use migsize_core::cost::{CostEstimate, PriceList};
use migsize_core::error::{MigsizeError, Result};
use migsize_core::inventory::{Inventory, RecordFailure};
use migsize_core::records::{format_fixed, to_csv, PCT_PRECISION};
use migsize_core::trace_time;
use tracing::{debug, info};

use crate::cli::EstimateArgs;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format_result;

/// Execute the estimate command
pub fn execute(ctx: &mut CommandContext, args: &EstimateArgs) -> Result<()> {
    if let Some(unit) = args.unit {
        ctx.config.defaults.unit = unit;
    }
    if let Some(precision) = args.precision {
        ctx.config.defaults.precision = precision;
    }
    args.policy.apply(&mut ctx.config)?;

    let estimator = ctx.estimator()?;
    let defaults = &ctx.config.defaults;

    let start = Instant::now();
    let inventory = Inventory::load(&args.input, defaults.unit)?;
    trace_time!(start, "load_inventory", records = inventory.len());

    let report = estimate_batch(&inventory, &defaults.targets, &estimator, defaults);
    let prices = PriceList::builtin().with_overrides(&ctx.config.pricing);
    let costs = platform_costs(&report, &prices);
    debug!(elapsed = ?ctx.start.elapsed(), rows = report.rows.len(), "estimate");

    if let Some(path) = &args.output {
        let csv = to_csv(&report.rows, defaults.precision)?;
        fs::write(path, csv)
            .map_err(|e| MigsizeError::io_operation("write output", path.display(), e))?;
        info!(path = %path.display(), rows = report.rows.len(), "wrote estimates");
    }

    let cli = ctx.cli;
    output_by_format_result!(cli.format,
        json => {
            let output = serde_json::json!({
                "generated_at": Utc::now().to_rfc3339(),
                "input": args.input.display().to_string(),
                "parameters": defaults,
                "estimates": report.rows,
                "failures": report.failures,
                "summary": report.summary,
                "costs": costs,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok::<(), MigsizeError>(())
        },
        human => {
            let mut out = io::stdout().lock();
            if args.output.is_none() {
                write_table(&mut out, &report.rows, defaults.precision, args.breakdown)?;
            } else if let Some(path) = &args.output {
                writeln!(out, "Output written to {}", path.display())?;
            }
            if !cli.quiet {
                write_failures(&mut io::stderr().lock(), &report.failures)?;
                write_summary(&mut out, &report.summary, &costs, defaults)?;
            }
        },
        csv => {
            if args.output.is_none() {
                print!("{}", to_csv(&report.rows, defaults.precision)?);
            }
            if !cli.quiet {
                let mut err = io::stderr().lock();
                write_failures(&mut err, &report.failures)?;
                write_summary(&mut err, &report.summary, &costs, defaults)?;
            }
        }
    )?;

    if report.is_complete() {
        Ok(())
    } else {
        Err(MigsizeError::BatchIncomplete {
            failed: report.summary.failed,
            total: report.summary.records,
        })
    }
}

/// Storage plus compute cost per platform; hosts without a CPU count
/// contribute storage only
fn platform_costs(report: &BatchReport, prices: &PriceList) -> Vec<CostEstimate> {
    report
        .summary
        .platforms
        .iter()
        .map(|totals| {
            let cpus = report
                .rows
                .iter()
                .filter(|row| row.estimate.platform == totals.platform)
                .filter_map(|row| row.cpus)
                .sum();
            prices.estimate(&totals.platform, cpus, totals.target_total)
        })
        .collect()
}

fn write_table(
    out: &mut impl Write,
    rows: &[EstimateRow],
    precision: u32,
    breakdown: bool,
) -> io::Result<()> {
    let host_width = rows
        .iter()
        .map(|row| row.host.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    writeln!(
        out,
        "{:<hw$}  {:<8}  {:>12}  {:>12}  {:>12}  {:>8}",
        "HOST",
        "PLATFORM",
        "SOURCE",
        "LOGICAL",
        "TARGET",
        "CHANGE",
        hw = host_width
    )?;
    for row in rows {
        let estimate = &row.estimate;
        writeln!(
            out,
            "{:<hw$}  {:<8}  {:>12}  {:>12}  {:>12}  {:>7}%{}",
            row.host,
            estimate.platform,
            format_fixed(estimate.reported_size, precision),
            format_fixed(estimate.logical_size, precision),
            format_fixed(estimate.target_size, precision),
            format_fixed(estimate.delta_pct, PCT_PRECISION),
            if estimate.has_caution() { "  !" } else { "" },
            hw = host_width
        )?;
        if breakdown {
            for note in &estimate.notes {
                writeln!(out, "    - {}", note)?;
            }
        }
    }
    Ok(())
}

fn write_failures(out: &mut impl Write, failures: &[RecordFailure]) -> io::Result<()> {
    for failure in failures {
        match failure.line {
            Some(line) => writeln!(
                out,
                "warning: line {} ({}): {}",
                line, failure.host, failure.reason
            )?,
            None => writeln!(out, "warning: {}: {}", failure.host, failure.reason)?,
        }
    }
    Ok(())
}

fn write_summary(
    out: &mut impl Write,
    summary: &BatchSummary,
    costs: &[CostEstimate],
    defaults: &PolicyDefaults,
) -> io::Result<()> {
    let rule = "=".repeat(60);
    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "ESTIMATION SUMMARY")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "Parameters:")?;
    writeln!(out, "  RAID policy: {}", defaults.raid_policy)?;
    writeln!(out, "  Size type: {}", defaults.size_basis)?;
    if let Some(fill) = defaults.thin_fill_ratio {
        writeln!(out, "  Thin provisioning: {:.0}% used", fill * 100.0)?;
    }
    if let Some(ratio) = defaults.dedup_ratio.filter(|r| *r > 1.0) {
        writeln!(out, "  Dedup ratio: {}:1 (data will expand)", ratio)?;
    } else if defaults.dedup_enabled {
        writeln!(
            out,
            "  Dedup: enabled (assumed {}:1)",
            defaults.heuristic_dedup_ratio
        )?;
    }
    if let Some(ratio) = defaults.compression_ratio.filter(|r| *r > 1.0) {
        writeln!(out, "  Compression ratio: {}:1 (data will expand)", ratio)?;
    } else if defaults.compression_enabled {
        writeln!(
            out,
            "  Compression: enabled (assumed {}:1)",
            defaults.heuristic_compression_ratio
        )?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Hosts: {} ({} estimated, {} failed)",
        summary.records, summary.estimated, summary.failed
    )?;
    for totals in &summary.platforms {
        writeln!(out)?;
        writeln!(out, "  {}:", totals.platform)?;
        writeln!(
            out,
            "    Source total: {} GB",
            format_fixed(totals.source_total, 2)
        )?;
        writeln!(
            out,
            "    Target total: {} GB",
            format_fixed(totals.target_total, 2)
        )?;
        if totals.change < 0.0 {
            writeln!(
                out,
                "    Size reduction: {} GB ({}% smaller)",
                format_fixed(-totals.change, 2),
                format_fixed(-totals.change_pct, PCT_PRECISION)
            )?;
        } else {
            writeln!(
                out,
                "    Size increase: {} GB ({}% larger)",
                format_fixed(totals.change, 2),
                format_fixed(totals.change_pct, PCT_PRECISION)
            )?;
        }
        if totals.cautions > 0 {
            writeln!(out, "    Cautions: {} (see notes)", totals.cautions)?;
        }
        if let Some(cost) = costs
            .iter()
            .find(|cost| cost.platform == totals.platform && cost.total_monthly > 0.0)
        {
            writeln!(
                out,
                "    Monthly cost: ${} (compute ${}, storage ${})",
                format_fixed(cost.total_monthly, 2),
                format_fixed(cost.compute_monthly, 2),
                format_fixed(cost.storage_monthly, 2)
            )?;
        }
    }
    writeln!(out, "{}", rule)?;
    Ok(())
}
