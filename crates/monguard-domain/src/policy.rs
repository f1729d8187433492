use monguard_types::Severity;
use std::collections::BTreeMap;

/// Diagnostic severity at which a run's verdict becomes `Fail`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
    Notice,
    /// Diagnostics never fail the run (advisory mode).
    Never,
}

impl FailOn {
    pub fn threshold(self) -> Option<Severity> {
        match self {
            FailOn::Error => Some(Severity::Error),
            FailOn::Warning => Some(Severity::Warning),
            FailOn::Notice => Some(Severity::Notice),
            FailOn::Never => None,
        }
    }
}

/// Host-level override for one rule. `None` keeps the rule's own default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RulePolicy {
    pub enabled: Option<bool>,
    pub severity: Option<Severity>,
}

impl RulePolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: Some(false),
            severity: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    pub max_diagnostics: usize,
    pub rules: BTreeMap<String, RulePolicy>,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            profile: "default".to_string(),
            fail_on: FailOn::Error,
            max_diagnostics: 200,
            rules: BTreeMap::new(),
        }
    }
}

impl EffectiveConfig {
    pub fn rule_policy(&self, rule: &str) -> RulePolicy {
        self.rules.get(rule).copied().unwrap_or_default()
    }

    pub fn is_enabled(&self, rule: &str, enabled_by_default: bool) -> bool {
        self.rule_policy(rule).enabled.unwrap_or(enabled_by_default)
    }

    pub fn severity(&self, rule: &str, default: Severity) -> Severity {
        self.rule_policy(rule).severity.unwrap_or(default)
    }
}
