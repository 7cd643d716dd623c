//! `migsize config` command - print the effective configuration

use migsize_core::error::{MigsizeError, Result};

use crate::commands::dispatch::CommandContext;
use crate::output_by_format_result;

/// Execute the config command
pub fn execute(ctx: &mut CommandContext) -> Result<()> {
    let source = ctx
        .config_path
        .as_ref()
        .map(|path| path.display().to_string());

    output_by_format_result!(ctx.cli.format,
        json => {
            let output = serde_json::json!({
                "source": source,
                "config": ctx.config,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok::<(), MigsizeError>(())
        },
        human => {
            print_toml(ctx, source.as_deref())?;
        },
        csv => {
            print_toml(ctx, source.as_deref())?;
        }
    )
}

fn print_toml(ctx: &CommandContext, source: Option<&str>) -> Result<()> {
    if !ctx.cli.quiet {
        match source {
            Some(path) => println!("# loaded from {}", path),
            None => println!("# built-in defaults"),
        }
    }
    print!("{}", ctx.config.to_toml()?);
    Ok(())
}
