//! Integration tests for the migsize subcommands

mod config;
mod cost;
mod estimate;
mod logging;
mod platforms;
mod size;
mod support;
