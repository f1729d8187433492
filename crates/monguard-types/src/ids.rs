//! Stable identifiers for rules and the resource kinds they inspect.
//!
//! Rule names are snake_case and never change once released: they are the keys used by
//! configuration, ignore annotations, and report consumers.

// Rules
pub const RULE_MONITOR_PROPERTIES: &str = "monitor_properties";
pub const RULE_MONITOR_NAME_FORMAT: &str = "monitor_name_format";
pub const RULE_MONITOR_PRIORITY_RANGE: &str = "monitor_priority_range";
pub const RULE_MONITOR_MESSAGE_FORMAT: &str = "monitor_message_format";
pub const RULE_MONITOR_TAGS_FORMAT: &str = "monitor_tags_format";

// Resource kinds
pub const RESOURCE_DATADOG_MONITOR: &str = "datadog_monitor";

// Annotation marker: `# monguard-ignore: <rule>[, <rule>...]`
pub const IGNORE_ANNOTATION: &str = "monguard-ignore";
pub const IGNORE_ALL: &str = "all";
