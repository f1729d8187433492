use crate::emit::Emitter;
use crate::extract::Extractor;
use crate::model::ConfigTree;
use crate::policy::EffectiveConfig;
use crate::report::RunReport;
use crate::resolve::Resolver;
use crate::rule::Rule;
use monguard_types::{Diagnostic, RuleOutcome, RuleStatus, RunData, SeverityCounts, Verdict};
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("rule \"{0}\" is registered more than once")]
    DuplicateRule(String),
}

/// Ordered, fixed set of rules. Registration order is reporting order.
pub struct Registry {
    rules: Vec<Box<dyn Rule>>,
}

impl Registry {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Result<Self, RegistryError> {
        let mut seen = BTreeSet::new();
        for rule in &rules {
            if !seen.insert(rule.name().to_string()) {
                return Err(RegistryError::DuplicateRule(rule.name().to_string()));
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Run every enabled rule over `tree`.
    ///
    /// A rule that fails is recorded as failed; the remaining rules still run and the
    /// diagnostics it emitted before failing are kept.
    pub fn run_all(&self, tree: &ConfigTree, cfg: &EffectiveConfig) -> RunReport {
        let extractor = Extractor::new(tree);
        let resolver = Resolver::new(tree);

        let mut outcomes: Vec<RuleOutcome> = Vec::with_capacity(self.rules.len());
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut suppressed_total = 0u32;

        for rule in self.rules() {
            let name = rule.name();
            let severity = cfg.severity(name, rule.severity());

            if !cfg.is_enabled(name, rule.enabled_by_default()) {
                tracing::debug!(rule = name, "rule disabled");
                outcomes.push(RuleOutcome {
                    rule: name.to_string(),
                    status: RuleStatus::Disabled,
                    severity,
                    error: None,
                    diagnostics: 0,
                });
                continue;
            }

            tracing::debug!(rule = name, %severity, "running rule");
            let mut emitter = Emitter::new(name, severity, rule.link(), &tree.annotations);
            let result = rule.check(&extractor, &resolver, &mut emitter);
            let (emitted, suppressed) = emitter.into_parts();

            let count = emitted.len() as u32;
            suppressed_total += suppressed;
            diagnostics.extend(emitted);

            let (status, error) = match result {
                Ok(()) => {
                    tracing::debug!(rule = name, diagnostics = count, suppressed, "rule completed");
                    (RuleStatus::Completed, None)
                }
                Err(err) => {
                    tracing::warn!(rule = name, error = %err, "rule failed");
                    (RuleStatus::Failed, Some(err.to_string()))
                }
            };
            outcomes.push(RuleOutcome {
                rule: name.to_string(),
                status,
                severity,
                error,
                diagnostics: count,
            });
        }

        let total = diagnostics.len() as u32;
        let verdict = compute_verdict(&diagnostics, cfg);

        let mut truncated_reason: Option<String> = None;
        if diagnostics.len() > cfg.max_diagnostics {
            diagnostics.truncate(cfg.max_diagnostics);
            truncated_reason = Some(format!(
                "diagnostics truncated to max_diagnostics={}",
                cfg.max_diagnostics
            ));
        }

        let counts = SeverityCounts::from_diagnostics(&diagnostics);
        let data = RunData {
            profile: cfg.profile.clone(),
            files_scanned: tree.files.len() as u32,
            resources_scanned: tree.resources.len() as u32,
            rules_enabled: outcomes
                .iter()
                .filter(|o| o.status != RuleStatus::Disabled)
                .count() as u32,
            rules_failed: outcomes
                .iter()
                .filter(|o| o.status == RuleStatus::Failed)
                .count() as u32,
            diagnostics_total: total,
            diagnostics_emitted: diagnostics.len() as u32,
            diagnostics_suppressed: suppressed_total,
            counts: counts.clone(),
            truncated_reason,
        };

        RunReport {
            verdict,
            rules: outcomes,
            diagnostics,
            data,
            counts,
        }
    }
}

/// Computed before truncation so a capped report never hides a failing diagnostic.
fn compute_verdict(diagnostics: &[Diagnostic], cfg: &EffectiveConfig) -> Verdict {
    if diagnostics.is_empty() {
        return Verdict::Pass;
    }
    match cfg.fail_on.threshold() {
        Some(threshold) if diagnostics.iter().any(|d| d.severity.at_least(threshold)) => {
            Verdict::Fail
        }
        _ => Verdict::Warn,
    }
}
