use super::Conventions;
use crate::emit::Emitter;
use crate::extract::Extractor;
use crate::resolve::Resolver;
use crate::rule::{Rule, RuleError};
use crate::schema::BodySchema;
use monguard_types::{Severity, ids};

/// Exact-value constraints on notification properties. Absent properties are not checked.
#[derive(Clone, Debug)]
pub struct MonitorProperties {
    resource_type: String,
    expected: Vec<(String, i64)>,
}

impl MonitorProperties {
    pub fn new(conventions: &Conventions) -> Self {
        Self {
            resource_type: conventions.resource_type.clone(),
            expected: conventions
                .expected_properties
                .iter()
                .map(|(name, value)| (name.clone(), *value))
                .collect(),
        }
    }
}

impl Rule for MonitorProperties {
    fn name(&self) -> &str {
        ids::RULE_MONITOR_PROPERTIES
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
        let names: Vec<&str> = self.expected.iter().map(|(name, _)| name.as_str()).collect();
        let blocks = extractor.fetch(&self.resource_type, &BodySchema::with_attributes(&names))?;

        for block in &blocks {
            for (name, expected) in &self.expected {
                let Some(attr) = block.body.attribute(name) else {
                    continue;
                };
                resolver.resolve_with(&attr.expr, |value: i64| -> Result<(), RuleError> {
                    if value != *expected {
                        emitter.emit(
                            format!("property {name} must be {expected}, found {value}"),
                            &attr.expr.range,
                        )?;
                    }
                    Ok(())
                })?;
            }
        }
        Ok(())
    }
}
