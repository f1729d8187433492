//! Explain registry for rules.
//!
//! Maps rule names to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a rule.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule.
    pub title: &'static str,
    /// What the rule does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after configuration examples.
    pub examples: ExamplePair,
}

/// Before and after configuration examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Configuration that would trigger a diagnostic.
    pub before: &'static str,
    /// Configuration that passes the rule.
    pub after: &'static str,
}

/// Look up an explanation by rule name.
///
/// Returns `None` if the rule is not recognized.
pub fn lookup_explanation(rule: &str) -> Option<Explanation> {
    match rule {
        ids::RULE_MONITOR_PROPERTIES => Some(explain_monitor_properties()),
        ids::RULE_MONITOR_NAME_FORMAT => Some(explain_monitor_name_format()),
        ids::RULE_MONITOR_PRIORITY_RANGE => Some(explain_monitor_priority_range()),
        ids::RULE_MONITOR_MESSAGE_FORMAT => Some(explain_monitor_message_format()),
        ids::RULE_MONITOR_TAGS_FORMAT => Some(explain_monitor_tags_format()),
        _ => None,
    }
}

/// List all known rule names, in registration order.
pub fn all_rule_names() -> &'static [&'static str] {
    &[
        ids::RULE_MONITOR_PROPERTIES,
        ids::RULE_MONITOR_NAME_FORMAT,
        ids::RULE_MONITOR_PRIORITY_RANGE,
        ids::RULE_MONITOR_MESSAGE_FORMAT,
        ids::RULE_MONITOR_TAGS_FORMAT,
    ]
}

fn explain_monitor_properties() -> Explanation {
    Explanation {
        title: "Monitor Notification Properties",
        description: "\
Checks that notification-related properties of a monitor use the organization's standard values:
`renotify_interval = 60`, `renotify_occurrences = 72` and `timeout_h = 1`.

The rule is opt-in per monitor: a property that is not set is not reported. Each property that is
set to a different value produces its own diagnostic.",
        remediation: "\
Set the property to the expected value, or remove it if the monitor should not re-notify.",
        examples: ExamplePair {
            before: r#"resource "datadog_monitor" "cpu" {
  renotify_interval = 30
  timeout_h         = 4
}"#,
            after: r#"resource "datadog_monitor" "cpu" {
  renotify_interval = 60
  timeout_h         = 1
}"#,
        },
    }
}

fn explain_monitor_name_format() -> Explanation {
    Explanation {
        title: "Monitor Name Format",
        description: "\
Checks that the monitor name follows `[PRIORITY][PRODUCT][DOMAIN][TEAM][ENVIRONMENT] Title`.

PRIORITY is `P0` to `P4`, PRODUCT, DOMAIN and TEAM are upper-case alphanumeric codes, and
ENVIRONMENT is `PRODUCTION` or `STAGING`. A non-empty title must follow after a single space.",
        remediation: "\
Rename the monitor so the whole name matches the pattern.",
        examples: ExamplePair {
            before: r#"resource "datadog_monitor" "cpu" {
  name = "CPU usage is high"
}"#,
            after: r#"resource "datadog_monitor" "cpu" {
  name = "[P2][BILLING][PAYMENTS][SRE][PRODUCTION] CPU usage is high"
}"#,
        },
    }
}

fn explain_monitor_priority_range() -> Explanation {
    Explanation {
        title: "Monitor Priority Range",
        description: "\
Checks that the monitor `priority` lies within the inclusive range 1 to 5.",
        remediation: "\
Pick a priority between 1 (most urgent) and 5 (least urgent).",
        examples: ExamplePair {
            before: r#"resource "datadog_monitor" "cpu" {
  priority = 0
}"#,
            after: r#"resource "datadog_monitor" "cpu" {
  priority = 1
}"#,
        },
    }
}

fn explain_monitor_message_format() -> Explanation {
    Explanation {
        title: "Monitor Message Format",
        description: "\
Checks that the monitor `message` contains an `{{#is_alert}}` section and an `{{#is_recovery}}`
section that each notify an `@opsgenie-` handle, followed by every required section header:
\"Impacto no Negócio\", \"Descrição técnica do problema\", \"Links úteis\", \"Possíveis causas\",
\"Acionáveis\", \"Integração AlertManager\" and \"Integração para recuperação do AlertManager\".

Section headers are matched as plain, case-sensitive substrings: the rule checks that each header
is present, not what the section contains. The first missing element is reported, once per
monitor.",
        remediation: "\
Start from the team message template and fill in every section.

No documentation link is attached by default. Set `message_docs_url` under `[conventions]` in
`.monguard.toml` to point layout violations at your message guide; the URL is then quoted in the
diagnostic and reported as its link.",
        examples: ExamplePair {
            before: r#"resource "datadog_monitor" "cpu" {
  message = "CPU is high @opsgenie-sre"
}"#,
            after: r#"resource "datadog_monitor" "cpu" {
  message = <<-EOT
    ## Impacto no Negócio
    ## Descrição técnica do problema
    ## Links úteis
    ## Possíveis causas
    ## Acionáveis
    ## Integração AlertManager
    {{#is_alert}} @opsgenie-sre {{/is_alert}}
    ## Integração para recuperação do AlertManager
    {{#is_recovery}} @opsgenie-sre {{/is_recovery}}
  EOT
}"#,
        },
    }
}

fn explain_monitor_tags_format() -> Explanation {
    Explanation {
        title: "Monitor Tags Format",
        description: "\
Checks that the monitor `tags` contain the `playbook-ops` tag and a `product:<name>` tag where
<name> is made of letters, digits, `_` or `-`. Both are required; a monitor missing either gets a
single diagnostic.",
        remediation: "\
Add the missing tags.",
        examples: ExamplePair {
            before: r#"resource "datadog_monitor" "cpu" {
  tags = ["product:billing"]
}"#,
            after: r#"resource "datadog_monitor" "cpu" {
  tags = ["playbook-ops", "product:billing"]
}"#,
        },
    }
}
