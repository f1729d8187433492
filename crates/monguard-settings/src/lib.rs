//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{ConventionsConfig, MonguardConfigV1, RuleConfig, SCHEMA_CONFIG_V1};
pub use presets::PROFILES;
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `.monguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<MonguardConfigV1> {
    let cfg: MonguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (profile + file + overrides + conventions).
pub fn resolve_config(
    cfg: MonguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
