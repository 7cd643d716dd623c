//! `migsize size` command - estimate one reported size with a full breakdown

use migsize_core::batch::EstimateRow;
use migsize_core::error::{MigsizeError, Result};
use migsize_core::inventory::VmRecord;
use migsize_core::records::{format_fixed, round_to, to_csv, PCT_PRECISION};
use migsize_core::SizeEstimate;

use crate::cli::SizeArgs;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format_result;

/// Host name used for the single row in CSV output
const SIZE_HOST: &str = "-";

/// Execute the size command
pub fn execute(ctx: &mut CommandContext, args: &SizeArgs) -> Result<()> {
    args.policy.apply(&mut ctx.config)?;
    let estimator = ctx.estimator()?;
    let defaults = &ctx.config.defaults;

    let record = VmRecord {
        name: SIZE_HOST.to_string(),
        reported_size: args.size,
        ..VmRecord::default()
    };
    let (policy, prior) = defaults.policy_for(&record, estimator.registry())?;
    let estimates = estimator.estimate_targets(args.size, &policy, &prior, &defaults.targets)?;

    let cli = ctx.cli;
    output_by_format_result!(cli.format,
        json => {
            let output = serde_json::json!({
                "reported_size": args.size,
                "policy": policy,
                "estimates": estimates,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok::<(), MigsizeError>(())
        },
        human => {
            println!(
                "Reported size: {} GB ({}, {})",
                format_fixed(args.size, defaults.precision),
                policy.size_basis,
                defaults.raid_policy
            );
            for estimate in &estimates {
                print_breakdown(estimate, defaults.precision, cli.quiet);
            }
        },
        csv => {
            let rows: Vec<EstimateRow> = estimates
                .into_iter()
                .map(|estimate| EstimateRow {
                    host: SIZE_HOST.to_string(),
                    cluster: None,
                    cpus: None,
                    estimate,
                })
                .collect();
            print!("{}", to_csv(&rows, defaults.precision)?);
        }
    )
}

fn print_breakdown(estimate: &SizeEstimate, precision: u32, quiet: bool) {
    println!();
    println!("{}", estimate.platform);
    println!(
        "  Logical size: {} GB",
        format_fixed(estimate.logical_size, precision)
    );
    println!(
        "  Target size:  {} GB ({:+.1}%)",
        format_fixed(estimate.target_size, precision),
        round_to(estimate.delta_pct, PCT_PRECISION)
    );
    if quiet || estimate.notes.is_empty() {
        return;
    }
    println!("  Steps:");
    for note in &estimate.notes {
        println!("    - {}", note);
    }
}
