//! `migsize platforms` command - show the platform and RAID registry

use migsize_core::csv;
use migsize_core::error::{MigsizeError, Result};
use migsize_core::platform::{Lookup, PlatformRegistry, RegistryEntry};
use serde_json::json;

use crate::cli::PlatformsArgs;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format_result;

const CSV_COLUMNS: [&str; 3] = ["kind", "name", "value"];

/// Execute the platforms command
pub fn execute(ctx: &mut CommandContext, args: &PlatformsArgs) -> Result<()> {
    let registry = ctx.config.registry()?;
    match &args.identifier {
        Some(identifier) => resolve_identifier(ctx, &registry, identifier),
        None => list(ctx, &registry),
    }
}

fn list(ctx: &CommandContext, registry: &PlatformRegistry) -> Result<()> {
    output_by_format_result!(ctx.cli.format,
        json => {
            let raid: Vec<_> = registry
                .raid_policies()
                .map(|(policy, overhead)| json!({ "policy": policy, "overhead": overhead }))
                .collect();
            let output = json!({
                "default_platform": registry.default_platform(),
                "platforms": registry.platforms().collect::<Vec<_>>(),
                "raid_policies": raid,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok::<(), MigsizeError>(())
        },
        human => {
            println!("Platforms (default: {}):", registry.default_platform());
            for rule in registry.platforms() {
                println!("  {:<8} {}", rule.name, rule.label);
                if !ctx.cli.quiet {
                    println!("           sizing: {}", rule.transform);
                    if let Some(factor) = rule.reexpansion_factor {
                        println!("           re-expansion: ×{}", factor);
                    }
                }
            }
            println!();
            println!("RAID policies:");
            for (policy, overhead) in registry.raid_policies() {
                println!("  {:<12} ×{}", policy, overhead);
            }
        },
        csv => {
            let platforms = registry.platforms().map(|rule| {
                [
                    "platform".to_string(),
                    rule.name.clone(),
                    rule.transform.to_string(),
                ]
            });
            let raid = registry.raid_policies().map(|(policy, overhead)| {
                [
                    "raid_policy".to_string(),
                    policy.to_string(),
                    overhead.to_string(),
                ]
            });
            print!("{}", csv::write(&CSV_COLUMNS, platforms.chain(raid))?);
        }
    )
}

fn resolve_identifier(
    ctx: &CommandContext,
    registry: &PlatformRegistry,
    identifier: &str,
) -> Result<()> {
    let Lookup { value, fallback } = registry.lookup(identifier);
    let note = fallback.map(|note| note.to_string());

    output_by_format_result!(ctx.cli.format,
        json => {
            let output = match &value {
                RegistryEntry::Platform(rule) => json!({
                    "identifier": identifier,
                    "kind": "platform",
                    "platform": rule,
                    "note": note,
                }),
                RegistryEntry::RaidOverhead(overhead) => json!({
                    "identifier": identifier,
                    "kind": "raid_policy",
                    "overhead": overhead,
                    "note": note,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok::<(), MigsizeError>(())
        },
        human => {
            match &value {
                RegistryEntry::Platform(rule) => {
                    println!("{}: platform {} ({})", identifier, rule.name, rule.label);
                    println!("  sizing: {}", rule.transform);
                }
                RegistryEntry::RaidOverhead(overhead) => {
                    println!("{}: RAID policy, overhead ×{}", identifier, overhead);
                }
            }
            if let Some(note) = &note {
                println!("  note: {}", note);
            }
        },
        csv => {
            let row = match &value {
                RegistryEntry::Platform(rule) => [
                    "platform".to_string(),
                    rule.name.clone(),
                    rule.transform.to_string(),
                ],
                RegistryEntry::RaidOverhead(overhead) => [
                    "raid_policy".to_string(),
                    identifier.to_string(),
                    overhead.to_string(),
                ],
            };
            print!("{}", csv::write(&CSV_COLUMNS, [row])?);
        }
    )
}
