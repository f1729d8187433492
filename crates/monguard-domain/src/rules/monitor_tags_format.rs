use super::{Conventions, RuleBuildError, full_match};
use crate::emit::Emitter;
use crate::extract::Extractor;
use crate::resolve::Resolver;
use crate::rule::{Rule, RuleError};
use crate::schema::BodySchema;
use monguard_types::{Severity, ids};
use regex::Regex;

/// `tags` must hold the required tag and a product tag. One diagnostic per monitor.
#[derive(Clone, Debug)]
pub struct MonitorTagsFormat {
    resource_type: String,
    required_tag: String,
    product: Regex,
    product_pattern: String,
}

impl MonitorTagsFormat {
    pub fn new(conventions: &Conventions) -> Result<Self, RuleBuildError> {
        Ok(Self {
            resource_type: conventions.resource_type.clone(),
            required_tag: conventions.required_tag.clone(),
            product: full_match("product_tag_pattern", &conventions.product_tag_pattern)?,
            product_pattern: conventions.product_tag_pattern.clone(),
        })
    }

    fn satisfied_by(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| *t == self.required_tag) && tags.iter().any(|t| self.product.is_match(t))
    }
}

impl Rule for MonitorTagsFormat {
    fn name(&self) -> &str {
        ids::RULE_MONITOR_TAGS_FORMAT
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
        let blocks = extractor.fetch(&self.resource_type, &BodySchema::with_attributes(&["tags"]))?;

        for block in &blocks {
            let Some(attr) = block.body.attribute("tags") else {
                continue;
            };
            resolver.resolve_with(&attr.expr, |tags: Vec<String>| -> Result<(), RuleError> {
                if !self.satisfied_by(&tags) {
                    emitter.emit(
                        format!(
                            "tags must include \"{}\" and a tag matching {}",
                            self.required_tag, self.product_pattern
                        ),
                        &attr.expr.range,
                    )?;
                }
                Ok(())
            })?;
        }
        Ok(())
    }
}
