use super::{Conventions, RuleBuildError, full_match};
use crate::emit::Emitter;
use crate::extract::Extractor;
use crate::resolve::Resolver;
use crate::rule::{Rule, RuleError};
use crate::schema::BodySchema;
use monguard_types::{Severity, ids};
use regex::Regex;

#[derive(Clone, Debug)]
pub struct MonitorNameFormat {
    resource_type: String,
    pattern: Regex,
    hint: String,
}

impl MonitorNameFormat {
    pub fn new(conventions: &Conventions) -> Result<Self, RuleBuildError> {
        Ok(Self {
            resource_type: conventions.resource_type.clone(),
            pattern: full_match("name_pattern", &conventions.name_pattern)?,
            hint: conventions.name_hint.clone(),
        })
    }
}

impl Rule for MonitorNameFormat {
    fn name(&self) -> &str {
        ids::RULE_MONITOR_NAME_FORMAT
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(
        &self,
        extractor: &Extractor<'_>,
        resolver: &Resolver<'_>,
        emitter: &mut Emitter<'_>,
    ) -> Result<(), RuleError> {
        let blocks = extractor.fetch(&self.resource_type, &BodySchema::with_attributes(&["name"]))?;

        for block in &blocks {
            let Some(attr) = block.body.attribute("name") else {
                continue;
            };
            resolver.resolve_with(&attr.expr, |name: String| -> Result<(), RuleError> {
                if !self.pattern.is_match(&name) {
                    emitter.emit(
                        format!("monitor name \"{name}\" does not follow {}", self.hint),
                        &attr.expr.range,
                    )?;
                }
                Ok(())
            })?;
        }
        Ok(())
    }
}
