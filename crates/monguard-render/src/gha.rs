use crate::RenderableReport;

/// Render diagnostics as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path},line={line},col={col},title={rule}::{message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for d in &report.diagnostics {
        let level = d.severity.as_str();

        let mut meta = String::new();
        if let Some(loc) = &d.location {
            meta.push_str(&format!(
                "file={},line={},col={},",
                escape_property(&loc.path),
                loc.line,
                loc.col
            ));
        }
        meta.push_str(&format!("title={}", escape_property(&d.rule)));

        let mut message = d.message.clone();
        if let Some(link) = &d.link {
            message.push_str(&format!(" ({link})"));
        }

        out.push(format!("::{} {}::{}", level, meta, escape_data(&message)));
    }

    for f in &report.failures {
        out.push(format!(
            "::error title={}::{}",
            escape_property(&f.rule),
            escape_data(&format!("rule failed: {}", f.error))
        ));
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{diagnostic, report};
    use crate::{RenderableRuleFailure, RenderableSeverity, RenderableVerdictStatus};

    #[test]
    fn annotation_per_diagnostic() {
        let r = report(
            RenderableVerdictStatus::Fail,
            vec![
                diagnostic(
                    RenderableSeverity::Error,
                    "monitor_priority_range",
                    "priority must be between 1 and 5, found 9",
                    3,
                ),
                diagnostic(RenderableSeverity::Notice, "monitor_tags_format", "tags", 7),
            ],
        );

        let lines = render_github_annotations(&r);
        assert_eq!(
            lines,
            vec![
                "::error file=main.tf,line=3,col=14,title=monitor_priority_range::priority must be between 1 and 5, found 9",
                "::notice file=main.tf,line=7,col=14,title=monitor_tags_format::tags",
            ]
        );
    }

    #[test]
    fn messages_are_escaped() {
        let mut d = diagnostic(
            RenderableSeverity::Warning,
            "monitor_name_format",
            "100% wrong\nsecond line",
            1,
        );
        d.location = None;
        let lines = render_github_annotations(&report(RenderableVerdictStatus::Warn, vec![d]));
        assert_eq!(
            lines,
            vec!["::warning title=monitor_name_format::100%25 wrong%0Asecond line"]
        );
    }

    #[test]
    fn rule_failures_become_errors() {
        let mut r = report(RenderableVerdictStatus::Pass, Vec::new());
        r.failures.push(RenderableRuleFailure {
            rule: "monitor_properties".to_string(),
            error: "boom".to_string(),
        });
        assert_eq!(
            render_github_annotations(&r),
            vec!["::error title=monitor_properties::rule failed: boom"]
        );
    }
}
