//! Diagnostic sink for a single rule pass.

use crate::fingerprint::fingerprint_for_diagnostic;
use crate::model::IgnoreAnnotation;
use crate::rule::RuleError;
use monguard_types::{Diagnostic, Severity, SourceRange};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emission {
    Recorded,
    /// Matched an ignore annotation; counted but not reported.
    Suppressed,
}

/// Append-only collector bound to one rule's name, severity and link.
///
/// Single writer: the runner creates one per pass and reads it back afterwards.
#[derive(Debug)]
pub struct Emitter<'a> {
    rule: &'a str,
    severity: Severity,
    link: Option<&'a str>,
    annotations: &'a [IgnoreAnnotation],
    diagnostics: Vec<Diagnostic>,
    suppressed: u32,
}

impl<'a> Emitter<'a> {
    pub fn new(
        rule: &'a str,
        severity: Severity,
        link: Option<&'a str>,
        annotations: &'a [IgnoreAnnotation],
    ) -> Self {
        Self {
            rule,
            severity,
            link,
            annotations,
            diagnostics: Vec::new(),
            suppressed: 0,
        }
    }

    /// Record a violation at `range`.
    ///
    /// A range without a filename cannot be traced back to the configuration and is rejected.
    pub fn emit(
        &mut self,
        message: impl Into<String>,
        range: &SourceRange,
    ) -> Result<Emission, RuleError> {
        let message = message.into();
        if !range.is_traceable() {
            return Err(RuleError::UntraceableDiagnostic { message });
        }

        if self.annotations.iter().any(|a| a.covers(self.rule, range)) {
            tracing::debug!(rule = self.rule, %range, "diagnostic suppressed by annotation");
            self.suppressed += 1;
            return Ok(Emission::Suppressed);
        }

        let fingerprint =
            fingerprint_for_diagnostic(self.rule, &range.filename, range.start.line, &message);
        self.diagnostics.push(Diagnostic {
            rule: self.rule.to_string(),
            severity: self.severity,
            message,
            range: range.clone(),
            link: self.link.map(str::to_string),
            fingerprint: Some(fingerprint),
        });
        Ok(Emission::Recorded)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn suppressed(&self) -> u32 {
        self.suppressed
    }

    pub fn into_parts(self) -> (Vec<Diagnostic>, u32) {
        (self.diagnostics, self.suppressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line_range;

    #[test]
    fn records_in_emission_order_with_rule_identity() {
        let mut emitter = Emitter::new(
            "monitor_priority_range",
            Severity::Warning,
            Some("https://docs"),
            &[],
        );
        emitter.emit("first", &line_range("main.tf", 9, 3, 10)).expect("emit");
        emitter.emit("second", &line_range("main.tf", 2, 3, 10)).expect("emit");

        let (diagnostics, suppressed) = emitter.into_parts();
        assert_eq!(suppressed, 0);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].message, "first");
        assert_eq!(diagnostics[1].message, "second");
        assert_eq!(diagnostics[0].rule, "monitor_priority_range");
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].link.as_deref(), Some("https://docs"));
        assert!(diagnostics[0].fingerprint.is_some());
    }

    #[test]
    fn untraceable_range_is_an_error() {
        let mut emitter = Emitter::new("monitor_tags_format", Severity::Error, None, &[]);
        let err = emitter
            .emit("nowhere", &SourceRange::default())
            .expect_err("untraceable");
        assert!(matches!(err, RuleError::UntraceableDiagnostic { .. }));
        assert!(emitter.diagnostics().is_empty());
    }

    #[test]
    fn annotations_suppress_matching_rule_only() {
        let annotations = vec![IgnoreAnnotation {
            rules: vec!["monitor_tags_format".to_string()],
            range: line_range("main.tf", 4, 3, 30),
        }];

        let mut tags = Emitter::new("monitor_tags_format", Severity::Error, None, &annotations);
        assert_eq!(
            tags.emit("x", &line_range("main.tf", 5, 3, 10)).expect("emit"),
            Emission::Suppressed
        );
        assert_eq!(
            tags.emit("y", &line_range("main.tf", 7, 3, 10)).expect("emit"),
            Emission::Recorded
        );
        assert_eq!(tags.suppressed(), 1);

        let mut name = Emitter::new("monitor_name_format", Severity::Error, None, &annotations);
        assert_eq!(
            name.emit("z", &line_range("main.tf", 5, 3, 10)).expect("emit"),
            Emission::Recorded
        );
    }
}
