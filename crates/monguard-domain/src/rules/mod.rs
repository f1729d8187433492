//! Built-in rule catalogue and its composition root.

use crate::engine::{Registry, RegistryError};
use crate::rule::Rule;
use regex::Regex;

mod conventions;
mod monitor_message_format;
mod monitor_name_format;
mod monitor_priority_range;
mod monitor_properties;
mod monitor_tags_format;


pub use conventions::Conventions;
pub use monitor_message_format::MonitorMessageFormat;
pub use monitor_name_format::MonitorNameFormat;
pub use monitor_priority_range::MonitorPriorityRange;
pub use monitor_properties::MonitorProperties;
pub use monitor_tags_format::MonitorTagsFormat;

#[derive(Debug, thiserror::Error)]
pub enum RuleBuildError {
    #[error("invalid {field}: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("empty priority range: priority_min {min} is greater than priority_max {max}")]
    EmptyRange { min: i64, max: i64 },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Build the built-in rules, in registration order, with every pattern compiled once.
pub fn builtin(conventions: &Conventions) -> Result<Registry, RuleBuildError> {
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(MonitorProperties::new(conventions)),
        Box::new(MonitorNameFormat::new(conventions)?),
        Box::new(MonitorPriorityRange::new(conventions)?),
        Box::new(MonitorMessageFormat::new(conventions)?),
        Box::new(MonitorTagsFormat::new(conventions)?),
    ];
    Ok(Registry::new(rules)?)
}

/// Compile `pattern` so it must match the whole input.
fn full_match(field: &'static str, pattern: &str) -> Result<Regex, RuleBuildError> {
    search(field, &format!("^(?:{pattern})$"))
}

fn search(field: &'static str, pattern: &str) -> Result<Regex, RuleBuildError> {
    Regex::new(pattern).map_err(|source| RuleBuildError::InvalidPattern {
        field,
        source: Box::new(source),
    })
}
