use crate::{RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Monguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Diagnostics: {} (emitted) / {} (total), {} suppressed\n\n",
        verdict,
        report.data.diagnostics_emitted,
        report.data.diagnostics_total,
        report.data.diagnostics_suppressed
    ));

    if let Some(r) = &report.data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if !report.failures.is_empty() {
        out.push_str("## Failed rules\n\n");
        for f in &report.failures {
            out.push_str(&format!("- `{}`: {}\n", f.rule, f.error));
        }
        out.push('\n');
    }

    if report.diagnostics.is_empty() {
        out.push_str("No diagnostics.\n");
        return out;
    }

    out.push_str("## Diagnostics\n\n");
    out.push_str("| Severity | Rule | Location | Message |\n");
    out.push_str("|---|---|---|---|\n");

    for d in &report.diagnostics {
        let sev = match d.severity {
            RenderableSeverity::Notice => "NOTICE",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        };
        let location = d
            .location
            .as_ref()
            .map(|loc| format!("`{}:{}:{}`", loc.path, loc.line, loc.col))
            .unwrap_or_default();
        let mut message = escape_cell(&d.message);
        if let Some(link) = &d.link {
            message.push_str(&format!(" ([docs]({link}))"));
        }
        out.push_str(&format!(
            "| {} | `{}` | {} | {} |\n",
            sev, d.rule, location, message
        ));
    }

    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
