//! Command dispatch logic for migsize

use std::path::PathBuf;
use std::time::Instant;

use migsize_core::config::EstimatorConfig;
use migsize_core::error::Result;
use migsize_core::Estimator;
use tracing::debug;

use crate::cli::{Cli, Commands};

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub config: EstimatorConfig,
    /// File the configuration came from, if any
    pub config_path: Option<PathBuf>,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn load(cli: &'a Cli, start: Instant) -> Result<Self> {
        let (config, config_path) = EstimatorConfig::discover(cli.config.as_deref())?;
        debug!(elapsed = ?start.elapsed(), "load_config");
        Ok(Self {
            cli,
            config,
            config_path,
            start,
        })
    }

    /// Build an estimator over the registry the current config describes
    pub fn estimator(&self) -> Result<Estimator> {
        Ok(Estimator::new(self.config.registry()?))
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &mut CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &mut CommandContext) -> Result<()> {
        println!("migsize {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Estimate VM storage after migrating off vSAN/VxRail.");
        println!();
        println!("Run `migsize --help` for usage information.");
        Ok(())
    }
}

impl Command for Commands {
    fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        match self {
            Commands::Estimate(args) => super::estimate::execute(ctx, args),
            Commands::Size(args) => super::size::execute(ctx, args),
            Commands::Platforms(args) => super::platforms::execute(ctx, args),
            Commands::Cost(args) => super::cost::execute(ctx, args),
            Commands::Config => super::config::execute(ctx),
        }
    }
}

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let mut ctx = CommandContext::load(cli, start)?;

    match &cli.command {
        None => NoCommand.execute(&mut ctx),
        Some(cmd) => cmd.execute(&mut ctx),
    }
}
