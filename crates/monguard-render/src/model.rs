#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Notice,
    Warning,
    Error,
}

impl RenderableSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderableSeverity::Notice => "notice",
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableLocation {
    pub path: String,
    pub line: u32,
    pub col: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableDiagnostic {
    pub severity: RenderableSeverity,
    pub rule: String,
    pub message: String,
    pub location: Option<RenderableLocation>,
    pub link: Option<String>,
}

/// A rule whose pass aborted with a hard error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableRuleFailure {
    pub rule: String,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub diagnostics_emitted: u32,
    pub diagnostics_total: u32,
    pub diagnostics_suppressed: u32,
    pub truncated_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub diagnostics: Vec<RenderableDiagnostic>,
    pub failures: Vec<RenderableRuleFailure>,
    pub data: RenderableData,
}
