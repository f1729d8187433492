use monguard_types::{Diagnostic, RuleOutcome, RuleStatus, RunData, SeverityCounts, Verdict};

/// Aggregate result of one run over a configuration tree.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub verdict: Verdict,
    /// One entry per registered rule, in registration order.
    pub rules: Vec<RuleOutcome>,
    /// Recorded diagnostics in registration-then-emission order.
    pub diagnostics: Vec<Diagnostic>,
    pub data: RunData,
    pub counts: SeverityCounts,
}

impl RunReport {
    /// True when every enabled rule completed without a hard error.
    ///
    /// Independent of the verdict: a successful run may still carry diagnostics.
    pub fn success(&self) -> bool {
        self.rules.iter().all(|r| r.status != RuleStatus::Failed)
    }

    pub fn failed_rules(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.rules.iter().filter(|r| r.status == RuleStatus::Failed)
    }
}
