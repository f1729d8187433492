use anyhow::Context;
use monguard_render::{
    RenderableData, RenderableDiagnostic, RenderableLocation, RenderableReport,
    RenderableRuleFailure, RenderableSeverity, RenderableVerdictStatus,
};
use monguard_types::{Diagnostic, MonguardReport, RuleStatus, SCHEMA_REPORT_V1, Severity, Verdict};

/// Parse a report written by `monguard check --report-out`.
pub fn parse_report_json(text: &str) -> anyhow::Result<MonguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse monguard report")
}

pub fn serialize_report(report: &MonguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &MonguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        diagnostics: report.diagnostics.iter().map(renderable_diagnostic).collect(),
        failures: report
            .rules
            .iter()
            .filter(|r| r.status == RuleStatus::Failed)
            .map(|r| RenderableRuleFailure {
                rule: r.rule.clone(),
                error: r.error.clone().unwrap_or_default(),
            })
            .collect(),
        data: RenderableData {
            diagnostics_emitted: report.data.diagnostics_emitted,
            diagnostics_total: report.data.diagnostics_total,
            diagnostics_suppressed: report.data.diagnostics_suppressed,
            truncated_reason: report.data.truncated_reason.clone(),
        },
    }
}

fn renderable_diagnostic(d: &Diagnostic) -> RenderableDiagnostic {
    RenderableDiagnostic {
        severity: match d.severity {
            Severity::Notice => RenderableSeverity::Notice,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        rule: d.rule.clone(),
        message: d.message.clone(),
        location: d.range.is_traceable().then(|| RenderableLocation {
            path: d.range.filename.clone(),
            line: d.range.start.line,
            col: d.range.start.column,
        }),
        link: d.link.clone(),
    }
}
