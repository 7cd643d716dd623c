//! `migsize cost` command - flat monthly cost of one VM

use migsize_core::cost::PriceList;
use migsize_core::error::{MigsizeError, Result};
use migsize_core::records::format_fixed;
use migsize_core::resolver::check_size;

use crate::cli::CostArgs;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format_result;

/// Execute the cost command
pub fn execute(ctx: &mut CommandContext, args: &CostArgs) -> Result<()> {
    check_size(args.disk)?;
    let registry = ctx.config.registry()?;
    let rule = registry.platform_strict(&args.target)?;

    let prices = PriceList::builtin().with_overrides(&ctx.config.pricing);
    let cost = prices.estimate(&rule.name, args.cpus, args.disk);

    output_by_format_result!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&cost)?);
            Ok::<(), MigsizeError>(())
        },
        human => {
            if !cost.priced {
                println!("{}: no pricing configured", cost.platform);
            } else {
                println!(
                    "{}: ${}/month",
                    cost.platform,
                    format_fixed(cost.total_monthly, 2)
                );
                if !ctx.cli.quiet {
                    println!(
                        "  compute: ${} ({} vCPU)",
                        format_fixed(cost.compute_monthly, 2),
                        args.cpus
                    );
                    println!(
                        "  storage: ${} ({} GB)",
                        format_fixed(cost.storage_monthly, 2),
                        args.disk
                    );
                }
            }
        },
        csv => {
            println!("platform,compute_monthly,storage_monthly,total_monthly");
            println!(
                "{},{},{},{}",
                cost.platform,
                format_fixed(cost.compute_monthly, 2),
                format_fixed(cost.storage_monthly, 2),
                format_fixed(cost.total_monthly, 2)
            );
        }
    )
}
