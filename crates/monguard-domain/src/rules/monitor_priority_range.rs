use super::{Conventions, RuleBuildError};
use crate::emit::Emitter;
use crate::extract::Extractor;
use crate::resolve::{Resolved, Resolver};
use crate::rule::{Rule, RuleError};
use crate::schema::BodySchema;
use monguard_types::{Severity, ids};

/// `priority` must lie within an inclusive range.
#[derive(Clone, Debug)]
pub struct MonitorPriorityRange {
    resource_type: String,
    min: i64,
    max: i64,
}

impl MonitorPriorityRange {
    pub fn new(conventions: &Conventions) -> Result<Self, RuleBuildError> {
        let (min, max) = (conventions.priority_min, conventions.priority_max);
        if min > max {
            return Err(RuleBuildError::EmptyRange { min, max });
        }
        Ok(Self {
            resource_type: conventions.resource_type.clone(),
            min,
            max,
        })
    }
}

impl Rule for MonitorPriorityRange {
    fn name(&self) -> &str {
        ids::RULE_MONITOR_PRIORITY_RANGE
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
        let blocks =
            extractor.fetch(&self.resource_type, &BodySchema::with_attributes(&["priority"]))?;

        for block in &blocks {
            let Some(attr) = block.body.attribute("priority") else {
                continue;
            };
            let Resolved::Known(priority) = resolver.resolve::<i64>(&attr.expr)? else {
                continue;
            };
            if !(self.min..=self.max).contains(&priority) {
                emitter.emit(
                    format!(
                        "priority must be between {} and {}, found {priority}",
                        self.min, self.max
                    ),
                    &attr.expr.range,
                )?;
            }
        }
        Ok(())
    }
}
