use super::{Conventions, RuleBuildError, search};
use crate::emit::Emitter;
use crate::extract::Extractor;
use crate::resolve::{Resolved, Resolver};
use crate::rule::{Rule, RuleError};
use crate::schema::BodySchema;
use monguard_types::{Severity, ids};
use regex::Regex;

/// Alert message layout, then required section headers.
///
/// Headers are plain case-sensitive substrings; their content is not inspected. The first
/// missing element is the only diagnostic for that monitor.
#[derive(Clone, Debug)]
pub struct MonitorMessageFormat {
    resource_type: String,
    layout: Regex,
    sections: Vec<String>,
    docs_url: Option<String>,
}

impl MonitorMessageFormat {
    pub fn new(conventions: &Conventions) -> Result<Self, RuleBuildError> {
        Ok(Self {
            resource_type: conventions.resource_type.clone(),
            layout: search("message_layout_pattern", &conventions.message_layout_pattern)?,
            sections: conventions.required_sections.clone(),
            docs_url: conventions.message_docs_url.clone(),
        })
    }

    /// Describe the first problem with `message`, if any.
    fn first_violation(&self, message: &str) -> Option<String> {
        if !self.layout.is_match(message) {
            let mut text = "message does not follow the expected layout: it needs alert and \
                            recovery sections that notify an @opsgenie- handle"
                .to_string();
            if let Some(url) = &self.docs_url {
                text.push_str(&format!(" (see {url})"));
            }
            return Some(text);
        }
        self.sections
            .iter()
            .find(|section| !message.contains(section.as_str()))
            .map(|section| format!("message is missing the \"{section}\" section"))
    }
}

impl Rule for MonitorMessageFormat {
    fn name(&self) -> &str {
        ids::RULE_MONITOR_MESSAGE_FORMAT
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn link(&self) -> Option<&str> {
        self.docs_url.as_deref()
    }

    fn check(
        &self,
        extractor: &Extractor<'_>,
        resolver: &Resolver<'_>,
        emitter: &mut Emitter<'_>,
    ) -> Result<(), RuleError> {
        let blocks =
            extractor.fetch(&self.resource_type, &BodySchema::with_attributes(&["message"]))?;

        for block in &blocks {
            let Some(attr) = block.body.attribute("message") else {
                continue;
            };
            let Resolved::Known(message) = resolver.resolve::<String>(&attr.expr)? else {
                continue;
            };
            if let Some(violation) = self.first_violation(&message) {
                emitter.emit(violation, &attr.expr.range)?;
            }
        }
        Ok(())
    }
}
