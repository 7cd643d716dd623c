//! Estimator configuration
//!
//! Configuration is a TOML file. It is looked up, in order, at the path
//! given on the command line, the path in `MIGSIZE_CONFIG`, `./migsize.toml`,
//! and `<config dir>/migsize/config.toml`. Without any of them the built-in
//! defaults apply.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MigsizeError, Result};
use crate::platform::{PlatformRegistry, PlatformRule};

pub use types::{
    EstimatorConfig, PlatformConfig, PolicyDefaults, PriceConfig, SizeUnit, BYTES_PER_GB,
};

const CONFIG_DIR: &str = "migsize";
const CONFIG_FILE: &str = "config.toml";
const LOCAL_CONFIG_FILE: &str = "migsize.toml";
pub const CONFIG_ENV_VAR: &str = "MIGSIZE_CONFIG";

/// Highest number of decimal places accepted for serialized sizes
const MAX_PRECISION: u32 = 6;

impl EstimatorConfig {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| MigsizeError::io_operation("read config", path.display(), e))?;
        let config: EstimatorConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Find and load the configuration.
    ///
    /// An explicit path (argument or environment) must exist; the implicit
    /// locations are optional. Returns the config and the file it came from.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        if let Some(path) = explicit {
            let config = Self::load(&path)?;
            debug!(path = %path.display(), "loaded config");
            return Ok((config, Some(path)));
        }

        for path in implicit_paths() {
            if path.is_file() {
                let config = Self::load(&path)?;
                debug!(path = %path.display(), "loaded config");
                return Ok((config, Some(path)));
            }
        }

        debug!("no config file, using defaults");
        Ok((Self::default(), None))
    }

    /// Serialize the effective configuration
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| MigsizeError::Other(format!("failed to serialize config: {}", e)))
    }

    /// Check every configured value against its domain
    pub fn validate(&self) -> Result<()> {
        self.validate_defaults()?;

        for (token, overhead) in &self.raid_overheads {
            if !overhead.is_finite() || *overhead < 1.0 {
                return Err(MigsizeError::invalid_value(
                    &format!("raid_overheads.{}", token),
                    overhead,
                ));
            }
        }

        for (name, platform) in &self.platforms {
            self.platform_rule(name, platform).validate()?;
        }

        for (name, price) in &self.pricing {
            if price.vcpu_hourly < 0.0 || price.storage_gb_monthly < 0.0 {
                return Err(MigsizeError::invalid_value(
                    &format!("pricing.{}", name),
                    "prices must be >= 0",
                ));
            }
        }

        Ok(())
    }

    fn validate_defaults(&self) -> Result<()> {
        let defaults = &self.defaults;

        if let Some(fill) = defaults.thin_fill_ratio {
            if !(fill > 0.0 && fill <= 1.0) {
                return Err(MigsizeError::invalid_policy(
                    "thin_fill_ratio",
                    fill,
                    "must be in (0, 1]",
                ));
            }
        }
        for (field, value) in [
            ("dedup_ratio", defaults.dedup_ratio),
            ("compression_ratio", defaults.compression_ratio),
            ("heuristic_dedup_ratio", Some(defaults.heuristic_dedup_ratio)),
            (
                "heuristic_compression_ratio",
                Some(defaults.heuristic_compression_ratio),
            ),
        ] {
            if let Some(value) = value {
                if !(value.is_finite() && value >= 1.0) {
                    return Err(MigsizeError::invalid_policy(field, value, "must be >= 1.0"));
                }
            }
        }
        if !(defaults.swap_deflation > 0.0 && defaults.swap_deflation <= 1.0) {
            return Err(MigsizeError::invalid_policy(
                "swap_deflation",
                defaults.swap_deflation,
                "must be in (0, 1]",
            ));
        }
        if defaults.precision > MAX_PRECISION {
            return Err(MigsizeError::invalid_value(
                "precision",
                format!("{} (maximum {})", defaults.precision, MAX_PRECISION),
            ));
        }
        if defaults.targets.is_empty() {
            return Err(MigsizeError::invalid_value("targets", "[] (empty)"));
        }
        Ok(())
    }

    fn platform_rule(&self, name: &str, platform: &PlatformConfig) -> PlatformRule {
        PlatformRule {
            name: name.to_string(),
            label: platform.label.clone().unwrap_or_else(|| name.to_string()),
            reexpansion_factor: platform.reexpansion_factor,
            transform: platform.transform.clone(),
        }
    }

    /// Build the immutable registry: built-ins overlaid with this config
    pub fn registry(&self) -> Result<PlatformRegistry> {
        let mut registry = PlatformRegistry::builtin();
        for (token, overhead) in &self.raid_overheads {
            registry = registry.with_raid_overhead(token, *overhead)?;
        }
        for (name, platform) in &self.platforms {
            registry = registry.with_platform(self.platform_rule(name, platform))?;
        }
        registry.with_default_platform(&self.defaults.default_platform)
    }
}

fn implicit_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(CONFIG_DIR).join(CONFIG_FILE));
    }
    paths
}
