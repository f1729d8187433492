//! The `rules` use case: the catalogue with effective enablement and severity.

use anyhow::Context;
use monguard_settings::Overrides;
use monguard_types::Severity;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleListing {
    pub name: String,
    pub enabled: bool,
    pub severity: Severity,
    pub link: Option<String>,
}

/// List built-in rules in registration order, as configured by `config_text` and `overrides`.
pub fn list_rules(config_text: &str, overrides: Overrides) -> anyhow::Result<Vec<RuleListing>> {
    let cfg = if config_text.trim().is_empty() {
        monguard_settings::MonguardConfigV1::default()
    } else {
        monguard_settings::parse_config_toml(config_text).context("parse config")?
    };
    let resolved = monguard_settings::resolve_config(cfg, overrides).context("resolve config")?;
    let registry =
        monguard_domain::builtin(&resolved.conventions).context("invalid [conventions]")?;

    let effective = &resolved.effective;
    Ok(registry
        .rules()
        .map(|rule| RuleListing {
            name: rule.name().to_string(),
            enabled: effective.is_enabled(rule.name(), rule.enabled_by_default()),
            severity: effective.severity(rule.name(), rule.severity()),
            link: rule.link().map(str::to_string),
        })
        .collect())
}

pub fn format_rules(rules: &[RuleListing]) -> String {
    let width = rules.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for r in rules {
        let state = if r.enabled { "enabled" } else { "disabled" };
        out.push_str(&format!(
            "{:<width$}  {:<8}  {}",
            r.name,
            state,
            r.severity.as_str()
        ));
        if let Some(link) = &r.link {
            out.push_str(&format!("  {link}"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use monguard_types::ids;

    #[test]
    fn defaults_enable_everything_at_error() {
        let rules = list_rules("", Overrides::default()).expect("list");
        let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, monguard_types::explain::all_rule_names());
        assert!(rules.iter().all(|r| r.enabled && r.severity == Severity::Error));
        assert!(rules.iter().all(|r| r.link.is_none()));
    }

    #[test]
    fn config_and_overrides_are_applied() {
        let config = r#"
[rules.monitor_tags_format]
severity = "warning"

[conventions]
message_docs_url = "https://wiki.example.com/alerts"
"#;
        let overrides = Overrides {
            disable_rules: vec![ids::RULE_MONITOR_NAME_FORMAT.to_string()],
            ..Overrides::default()
        };
        let rules = list_rules(config, overrides).expect("list");
        let by_name = |name: &str| rules.iter().find(|r| r.name == name).expect("rule");

        assert!(!by_name(ids::RULE_MONITOR_NAME_FORMAT).enabled);
        assert_eq!(by_name(ids::RULE_MONITOR_TAGS_FORMAT).severity, Severity::Warning);
        assert_eq!(
            by_name(ids::RULE_MONITOR_MESSAGE_FORMAT).link.as_deref(),
            Some("https://wiki.example.com/alerts")
        );
    }

    #[test]
    fn format_aligns_columns() {
        let text = format_rules(&[
            RuleListing {
                name: "short".to_string(),
                enabled: true,
                severity: Severity::Error,
                link: None,
            },
            RuleListing {
                name: "much_longer".to_string(),
                enabled: false,
                severity: Severity::Notice,
                link: Some("https://x".to_string()),
            },
        ]);
        assert_eq!(
            text,
            "short        enabled   error\nmuch_longer  disabled  notice  https://x\n"
        );
    }
}
