//! Name → rule registry for destination platforms and RAID policies
//!
//! The registry is built once (from the built-in tables, optionally
//! overlaid with configuration) and then only read. Unknown identifiers
//! resolve to an explicit default; the substitution is handed back as an
//! [`Adjustment`] so it ends up in the estimate's notes.

use std::collections::BTreeMap;

use tracing::warn;

use super::PlatformRule;
use crate::error::{MigsizeError, Result};
use crate::estimate::Adjustment;

/// Default platform for unknown identifiers
pub const DEFAULT_PLATFORM: &str = "vmware";

/// Default RAID policy for unknown tokens
pub const DEFAULT_RAID_POLICY: &str = "raid1_ftt1";

const BUILTIN_RAID_OVERHEADS: [(&str, f64); 6] = [
    ("raid1_ftt1", 2.0),  // full mirror, 2 copies
    ("raid1_ftt2", 3.0),  // triple mirror
    ("raid1_ftt3", 4.0),  // quad mirror
    ("raid5_ftt1", 1.33), // 3+1 erasure coding
    ("raid6_ftt2", 1.5),  // 4+2 erasure coding
    ("none", 1.0),        // FTT=0
];

const BUILTIN_RAID_ALIASES: [(&str, &str); 6] = [
    ("raid1", "raid1_ftt1"),
    ("mirror", "raid1_ftt1"),
    ("ftt1", "raid1_ftt1"),
    ("ftt2", "raid1_ftt2"),
    ("raid5", "raid5_ftt1"),
    ("raid6", "raid6_ftt2"),
];

const BUILTIN_PLATFORM_ALIASES: [(&str, &str); 3] =
    [("esxi", "vmware"), ("ebs", "aws"), ("gce", "gcp")];

/// Result of a lenient lookup: the value plus the fallback note, if the
/// identifier was unknown.
#[derive(Debug, Clone)]
pub struct Lookup<T> {
    pub value: T,
    pub fallback: Option<Adjustment>,
}

impl<T> Lookup<T> {
    fn exact(value: T) -> Self {
        Self {
            value,
            fallback: None,
        }
    }
}

/// What a registry identifier names
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEntry<'a> {
    Platform(&'a PlatformRule),
    RaidOverhead(f64),
}

/// Immutable registry of platform rules and RAID overhead multipliers.
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    platforms: BTreeMap<String, PlatformRule>,
    platform_aliases: BTreeMap<String, String>,
    raid_overheads: BTreeMap<String, f64>,
    raid_aliases: BTreeMap<String, String>,
    default_platform: String,
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lower-case, with `-` and spaces folded to `_`
pub fn normalize_token(token: &str) -> String {
    token.trim().to_lowercase().replace(['-', ' '], "_")
}

impl PlatformRegistry {
    /// Registry with the built-in platforms and RAID policies
    pub fn builtin() -> Self {
        let platforms = [
            PlatformRule::vmware(),
            PlatformRule::aws(),
            PlatformRule::gcp(),
            PlatformRule::azure(),
        ]
        .into_iter()
        .map(|rule| (rule.name.clone(), rule))
        .collect();

        Self {
            platforms,
            platform_aliases: owned_pairs(&BUILTIN_PLATFORM_ALIASES),
            raid_overheads: BUILTIN_RAID_OVERHEADS
                .iter()
                .map(|(token, overhead)| (token.to_string(), *overhead))
                .collect(),
            raid_aliases: owned_pairs(&BUILTIN_RAID_ALIASES),
            default_platform: DEFAULT_PLATFORM.to_string(),
        }
    }

    /// Add or replace a platform rule
    pub fn with_platform(mut self, mut rule: PlatformRule) -> Result<Self> {
        rule.validate()?;
        rule.name = normalize_token(&rule.name);
        self.platform_aliases.remove(&rule.name);
        self.platforms.insert(rule.name.clone(), rule);
        Ok(self)
    }

    /// Add or replace a RAID overhead multiplier
    pub fn with_raid_overhead(mut self, token: &str, overhead: f64) -> Result<Self> {
        if !overhead.is_finite() || overhead < 1.0 {
            return Err(MigsizeError::invalid_policy(
                "raid_overhead",
                overhead,
                "must be >= 1.0",
            ));
        }
        let token = normalize_token(token);
        self.raid_aliases.remove(&token);
        self.raid_overheads.insert(token, overhead);
        Ok(self)
    }

    /// Change the platform unknown names fall back to
    pub fn with_default_platform(mut self, name: &str) -> Result<Self> {
        let canonical = self.canonical_platform(name).ok_or_else(|| {
            MigsizeError::invalid_value("default platform", name)
        })?;
        self.default_platform = canonical;
        Ok(self)
    }

    pub fn default_platform(&self) -> &str {
        &self.default_platform
    }

    fn canonical_platform(&self, name: &str) -> Option<String> {
        let token = normalize_token(name);
        let token = self.platform_aliases.get(&token).cloned().unwrap_or(token);
        self.platforms.contains_key(&token).then_some(token)
    }

    fn canonical_raid(&self, token: &str) -> Option<String> {
        let token = normalize_token(token);
        let token = self.raid_aliases.get(&token).cloned().unwrap_or(token);
        self.raid_overheads.contains_key(&token).then_some(token)
    }

    /// Look up a platform rule, substituting the default for unknown names
    pub fn platform(&self, name: &str) -> Lookup<&PlatformRule> {
        if let Some(rule) = self
            .canonical_platform(name)
            .and_then(|key| self.platforms.get(&key))
        {
            return Lookup::exact(rule);
        }

        warn!(requested = name, fallback = %self.default_platform, "unknown platform");
        Lookup {
            value: &self.platforms[&self.default_platform],
            fallback: Some(Adjustment::PlatformFallback {
                requested: name.to_string(),
                fallback: self.default_platform.clone(),
            }),
        }
    }

    /// Look up a platform rule, failing for unknown names
    pub fn platform_strict(&self, name: &str) -> Result<&PlatformRule> {
        self.canonical_platform(name)
            .and_then(|key| self.platforms.get(&key))
            .ok_or_else(|| MigsizeError::UnknownPlatform {
                name: name.to_string(),
                known: self.platform_names().join(", "),
            })
    }

    /// Look up a RAID overhead, substituting RAID-1 FTT=1 for unknown tokens
    pub fn raid_overhead(&self, token: &str) -> Lookup<f64> {
        if let Some(overhead) = self
            .canonical_raid(token)
            .and_then(|key| self.raid_overheads.get(&key))
        {
            return Lookup::exact(*overhead);
        }

        let overhead = self
            .raid_overheads
            .get(DEFAULT_RAID_POLICY)
            .copied()
            .unwrap_or(2.0);
        warn!(token, overhead, "unknown RAID policy");
        Lookup {
            value: overhead,
            fallback: Some(Adjustment::RaidFallback {
                token: token.to_string(),
                overhead,
            }),
        }
    }

    /// Resolve any identifier: a platform name, or a RAID policy token.
    /// Unknown identifiers resolve to the default platform, with a note.
    pub fn lookup(&self, identifier: &str) -> Lookup<RegistryEntry<'_>> {
        if let Some(rule) = self
            .canonical_platform(identifier)
            .and_then(|key| self.platforms.get(&key))
        {
            return Lookup::exact(RegistryEntry::Platform(rule));
        }
        if let Some(overhead) = self
            .canonical_raid(identifier)
            .and_then(|key| self.raid_overheads.get(&key))
        {
            return Lookup::exact(RegistryEntry::RaidOverhead(*overhead));
        }
        let Lookup { value, fallback } = self.platform(identifier);
        Lookup {
            value: RegistryEntry::Platform(value),
            fallback,
        }
    }

    pub fn platform_names(&self) -> Vec<String> {
        self.platforms.keys().cloned().collect()
    }

    pub fn platforms(&self) -> impl Iterator<Item = &PlatformRule> {
        self.platforms.values()
    }

    /// RAID tokens with their overheads, in token order
    pub fn raid_policies(&self) -> impl Iterator<Item = (&str, f64)> {
        self.raid_overheads
            .iter()
            .map(|(token, overhead)| (token.as_str(), *overhead))
    }
}

fn owned_pairs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
        .collect()
}
