use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_CONFIG_V1: &str = "monguard.config.v1";

/// `.monguard.toml` schema v1.
///
/// Permissive at the top level; rule names and values are validated during resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonguardConfigV1 {
    /// Optional schema string for tooling (`monguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Preset to start from: `default`, `strict` or `advisory`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Lowest diagnostic severity that fails the run: `error`, `warning`, `notice` or `never`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// How many diagnostics to emit before truncating the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_diagnostics: Option<u32>,

    /// Glob patterns of `.tf` file names to skip.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Map of rule name -> config.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,

    #[serde(default)]
    pub conventions: ConventionsConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    /// Override the rule's default enablement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override the rule's severity: `error`, `warning` or `notice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

/// Overrides for the organizational constants the built-in rules compare against.
/// Unset keys keep the built-in value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ConventionsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    /// Regular expression the whole monitor name must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_pattern: Option<String>,

    /// Human-readable form of `name_pattern`, quoted in diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_hint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_min: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_max: Option<i64>,

    /// Replaces the whole attribute -> value table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_properties: Option<BTreeMap<String, i64>>,

    /// Regular expression searched in the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_layout_pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_sections: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_docs_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_tag: Option<String>,

    /// Regular expression a product tag must match as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_tag_pattern: Option<String>,
}
