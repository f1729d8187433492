use monguard_domain::policy::{EffectiveConfig, FailOn};
use std::collections::BTreeMap;

pub const PROFILES: &[&str] = &["default", "strict", "advisory"];

/// Preset profiles only pick how strict the verdict is.
///
/// Rule enablement and severity stay with the rules unless configured.
pub fn preset(profile: &str) -> anyhow::Result<EffectiveConfig> {
    let fail_on = match profile {
        "default" => FailOn::Error,
        "strict" => FailOn::Notice,
        "advisory" => FailOn::Never,
        other => anyhow::bail!(
            "unknown profile: {other} (expected one of {})",
            PROFILES.join(", ")
        ),
    };
    Ok(EffectiveConfig {
        profile: profile.to_string(),
        fail_on,
        max_diagnostics: 200,
        rules: BTreeMap::new(),
    })
}
