//! Organizational policy constants, injected into the built-in rules at construction.

use monguard_types::ids;
use std::collections::BTreeMap;

/// Every literal the built-in rules compare against.
///
/// Patterns marked "full match" are anchored at both ends when compiled; the message layout
/// pattern is searched anywhere in the message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conventions {
    /// Resource kind the rules inspect.
    pub resource_type: String,

    /// Monitor name, full match.
    pub name_pattern: String,
    /// Human-readable form of `name_pattern`, quoted in diagnostics.
    pub name_hint: String,

    pub priority_min: i64,
    pub priority_max: i64,

    /// Attribute name -> required value. Checked in name order.
    pub expected_properties: BTreeMap<String, i64>,

    pub message_layout_pattern: String,
    /// Section headers the message must contain, checked in order.
    pub required_sections: Vec<String>,
    pub message_docs_url: Option<String>,

    pub required_tag: String,
    /// Product tag, full match.
    pub product_tag_pattern: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            resource_type: ids::RESOURCE_DATADOG_MONITOR.to_string(),
            name_pattern: r"\[P[0-4]\]\[[A-Z0-9]+\]\[[A-Z0-9]+\]\[[A-Z0-9]+\]\[(PRODUCTION|STAGING)\] .+"
                .to_string(),
            name_hint: "[PRIORITY][PRODUCT][DOMAIN][TEAM][ENVIRONMENT] Alert title".to_string(),
            priority_min: 1,
            priority_max: 5,
            expected_properties: BTreeMap::from([
                ("renotify_interval".to_string(), 60),
                ("renotify_occurrences".to_string(), 72),
                ("timeout_h".to_string(), 1),
            ]),
            message_layout_pattern:
                r"(?s).*\{\{#is_alert\}\}.*@opsgenie-.*\{\{/is_alert\}\}.*\{\{#is_recovery\}\}.*@opsgenie-.*\{\{/is_recovery\}\}.*"
                    .to_string(),
            required_sections: [
                "Impacto no Negócio",
                "Descrição técnica do problema",
                "Links úteis",
                "Possíveis causas",
                "Acionáveis",
                "Integração AlertManager",
                "Integração para recuperação do AlertManager",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            message_docs_url: None,
            required_tag: "playbook-ops".to_string(),
            product_tag_pattern: "product:[a-zA-Z0-9_-]+".to_string(),
        }
    }
}
