use crate::{model::ConventionsConfig, model::MonguardConfigV1, presets};
use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use monguard_domain::Conventions;
use monguard_domain::policy::{EffectiveConfig, FailOn};
use monguard_types::Severity;
use monguard_types::explain::all_rule_names;

/// Command-line overrides; they win over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub fail_on: Option<String>,
    pub max_diagnostics: Option<u32>,
    pub enable_rules: Vec<String>,
    pub disable_rules: Vec<String>,
    /// When non-empty, every rule not listed is disabled.
    pub only_rules: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    pub conventions: Conventions,
    /// Compiled `exclude` patterns, if any.
    pub exclude: Option<GlobSet>,
}

pub fn resolve_config(
    cfg: MonguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "default".to_string());

    let mut effective = presets::preset(&profile)?;

    if let Some(fail_on) = overrides.fail_on.as_deref().or(cfg.fail_on.as_deref()) {
        effective.fail_on = parse_fail_on(fail_on)?;
    }

    if let Some(max) = overrides.max_diagnostics.or(cfg.max_diagnostics) {
        effective.max_diagnostics = max as usize;
    }

    // per-rule config
    for (rule, rc) in &cfg.rules {
        ensure_known_rule(rule).context("in [rules]")?;
        let entry = effective.rules.entry(rule.clone()).or_default();
        if let Some(enabled) = rc.enabled {
            entry.enabled = Some(enabled);
        }
        if let Some(sev) = rc.severity.as_deref() {
            entry.severity =
                Some(parse_severity(sev).with_context(|| format!("invalid severity for {rule}"))?);
        }
    }

    // command-line rule selection: --only, then --enable-rule, then --disable-rule
    if !overrides.only_rules.is_empty() {
        for rule in &overrides.only_rules {
            ensure_known_rule(rule).context("in --only")?;
        }
        for rule in all_rule_names() {
            let enabled = overrides.only_rules.iter().any(|r| r == rule);
            effective.rules.entry(rule.to_string()).or_default().enabled = Some(enabled);
        }
    }
    for rule in &overrides.enable_rules {
        ensure_known_rule(rule).context("in --enable-rule")?;
        effective.rules.entry(rule.clone()).or_default().enabled = Some(true);
    }
    for rule in &overrides.disable_rules {
        ensure_known_rule(rule).context("in --disable-rule")?;
        effective.rules.entry(rule.clone()).or_default().enabled = Some(false);
    }

    let exclude = build_exclude(&cfg.exclude)?;
    let conventions = merge_conventions(cfg.conventions);

    Ok(ResolvedConfig {
        effective,
        conventions,
        exclude,
    })
}

fn ensure_known_rule(rule: &str) -> anyhow::Result<()> {
    if all_rule_names().contains(&rule) {
        return Ok(());
    }
    anyhow::bail!(
        "unknown rule: {rule} (expected one of {})",
        all_rule_names().join(", ")
    )
}

fn build_exclude(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("invalid exclude glob: {pattern}"))?;
        builder.add(glob);
    }
    Ok(Some(builder.build().context("failed to compile exclude globs")?))
}

/// Overlay configured conventions on the built-in ones. Patterns are compiled later, when
/// the rules are built.
fn merge_conventions(cfg: ConventionsConfig) -> Conventions {
    let mut c = Conventions::default();
    if let Some(v) = cfg.resource_type {
        c.resource_type = v;
    }
    if let Some(v) = cfg.name_pattern {
        c.name_pattern = v;
    }
    if let Some(v) = cfg.name_hint {
        c.name_hint = v;
    }
    if let Some(v) = cfg.priority_min {
        c.priority_min = v;
    }
    if let Some(v) = cfg.priority_max {
        c.priority_max = v;
    }
    if let Some(v) = cfg.expected_properties {
        c.expected_properties = v;
    }
    if let Some(v) = cfg.message_layout_pattern {
        c.message_layout_pattern = v;
    }
    if let Some(v) = cfg.required_sections {
        c.required_sections = v;
    }
    if let Some(v) = cfg.message_docs_url {
        c.message_docs_url = Some(v);
    }
    if let Some(v) = cfg.required_tag {
        c.required_tag = v;
    }
    if let Some(v) = cfg.product_tag_pattern {
        c.product_tag_pattern = v;
    }
    c
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "notice" | "info" => Ok(Severity::Notice),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected notice|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        "notice" => Ok(FailOn::Notice),
        "never" => Ok(FailOn::Never),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning|notice|never)"),
    }
}
