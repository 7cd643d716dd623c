//! CLI commands for migsize

pub mod config;
pub mod cost;
pub mod dispatch;
pub mod estimate;
pub mod platforms;
pub mod size;
