use crate::{RenderableReport, RenderableVerdictStatus};

/// Compact terminal output, one line per diagnostic:
/// `{path}:{line}:{col}: {severity}: {message} ({rule})`.
pub fn render_text(report: &RenderableReport) -> String {
    let mut out = String::new();

    for d in &report.diagnostics {
        match &d.location {
            Some(loc) => out.push_str(&format!("{}:{}:{}: ", loc.path, loc.line, loc.col)),
            None => out.push_str("<unknown>: "),
        }
        out.push_str(&format!("{}: {} ({})\n", d.severity.as_str(), d.message, d.rule));
        if let Some(link) = &d.link {
            out.push_str(&format!("  see {link}\n"));
        }
    }

    for f in &report.failures {
        out.push_str(&format!("rule {} failed: {}\n", f.rule, f.error));
    }

    if let Some(reason) = &report.data.truncated_reason {
        out.push_str(&format!("note: {reason}\n"));
    }

    let summary = match report.data.diagnostics_total {
        0 => "no issues found".to_string(),
        1 => "1 issue found".to_string(),
        n => format!("{n} issues found"),
    };
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "pass",
        RenderableVerdictStatus::Warn => "warn",
        RenderableVerdictStatus::Fail => "fail",
    };
    out.push_str(&format!("{summary} ({verdict})"));
    if report.data.diagnostics_suppressed > 0 {
        out.push_str(&format!(
            ", {} suppressed",
            report.data.diagnostics_suppressed
        ));
    }
    out.push('\n');

    out
}
