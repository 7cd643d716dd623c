//! Migsize Core Library
//!
//! Estimates the storage a VM will occupy after leaving a replicated,
//! deduplicating hyperconverged platform. Reported sizes are first reduced
//! to a logical size ([`resolver`]), then re-expressed under a destination
//! platform's allocation rules ([`mapper`]).

pub mod batch;
pub mod config;
pub mod cost;
pub mod csv;
pub mod engine;
pub mod error;
pub mod estimate;
pub mod inventory;
pub mod logging;
pub mod mapper;
pub mod platform;
pub mod policy;
pub mod records;
pub mod resolver;

pub use engine::{estimate, Estimator};
pub use estimate::{Adjustment, SizeEstimate};
pub use mapper::map_to_target;
pub use platform::{PlatformRegistry, PlatformRule, SizingTransform};
pub use policy::{SizeBasis, StoragePolicy};
pub use resolver::{resolve, resolve_detailed, Resolution};
