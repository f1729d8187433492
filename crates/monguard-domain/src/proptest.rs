//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - range and exact-value rule boundaries
//! - pattern conformance of names and tags
//! - required-section short-circuiting
//! - run determinism

use crate::model::ConfigTree;
use crate::policy::{EffectiveConfig, RulePolicy};
use crate::report::RunReport;
use crate::rules::{Conventions, builtin};
use crate::test_support::{TreeBuilder, int, string, strings};
use monguard_types::ids;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Upper-case alphanumeric code, as used for PRODUCT, DOMAIN and TEAM.
fn arb_code() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z0-9]{1,12}").unwrap()
}

/// Names that follow `[Pn][PRODUCT][DOMAIN][TEAM][ENV] Title`.
fn arb_valid_name() -> impl Strategy<Value = String> {
    (
        0u8..=4,
        arb_code(),
        arb_code(),
        arb_code(),
        prop_oneof![Just("PRODUCTION"), Just("STAGING")],
        prop::string::string_regex("[A-Za-z0-9 %:-]{1,40}").unwrap(),
    )
        .prop_map(|(p, product, domain, team, env, title)| {
            format!("[P{p}][{product}][{domain}][{team}][{env}] {title}")
        })
}

fn arb_product() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_-]{1,20}").unwrap()
}

fn arb_other_tags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::string::string_regex("(env|team|service):[a-z]{1,8}").unwrap(),
        0..4,
    )
}

// ============================================================================
// Helpers
// ============================================================================

fn run_only(rule: &str, tree: &ConfigTree) -> RunReport {
    let registry = builtin(&Conventions::default()).unwrap();
    let mut cfg = EffectiveConfig::default();
    for name in ids_except(rule) {
        cfg.rules.insert(name.to_string(), RulePolicy::disabled());
    }
    registry.run_all(tree, &cfg)
}

fn ids_except(rule: &str) -> Vec<&'static str> {
    monguard_types::explain::all_rule_names()
        .iter()
        .copied()
        .filter(|r| *r != rule)
        .collect()
}

fn monitor_with(attr: &str, expr: crate::model::Expr) -> ConfigTree {
    TreeBuilder::new("main.tf")
        .resource("datadog_monitor", "m", |r| r.attr(attr, expr))
        .build()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn priority_in_range_never_reported(p in 1i64..=5) {
        let report = run_only(ids::RULE_MONITOR_PRIORITY_RANGE, &monitor_with("priority", int(p)));
        prop_assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn priority_out_of_range_reported_once(
        p in prop_oneof![i64::MIN..1i64, 6i64..=i64::MAX]
    ) {
        let report = run_only(ids::RULE_MONITOR_PRIORITY_RANGE, &monitor_with("priority", int(p)));
        prop_assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn renotify_interval_exact_value(v in -1000i64..1000) {
        let report = run_only(ids::RULE_MONITOR_PROPERTIES, &monitor_with("renotify_interval", int(v)));
        let expected = usize::from(v != 60);
        prop_assert_eq!(report.diagnostics.len(), expected);
    }

    #[test]
    fn conforming_names_pass(name in arb_valid_name()) {
        let report = run_only(ids::RULE_MONITOR_NAME_FORMAT, &monitor_with("name", string(&name)));
        prop_assert!(report.diagnostics.is_empty(), "{}", name);
    }

    #[test]
    fn names_without_bracket_prefix_fail(name in "[a-z][a-zA-Z0-9 ]{0,40}") {
        let report = run_only(ids::RULE_MONITOR_NAME_FORMAT, &monitor_with("name", string(&name)));
        prop_assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn tags_pass_iff_both_markers_present(
        product in arb_product(),
        others in arb_other_tags(),
        with_playbook in any::<bool>(),
        with_product in any::<bool>(),
    ) {
        let mut tags = others;
        if with_playbook {
            tags.push("playbook-ops".to_string());
        }
        if with_product {
            tags.insert(0, format!("product:{product}"));
        }
        let refs: Vec<&str> = tags.iter().map(String::as_str).collect();
        let report = run_only(ids::RULE_MONITOR_TAGS_FORMAT, &monitor_with("tags", strings(&refs)));

        let expected = usize::from(!(with_playbook && with_product));
        prop_assert_eq!(report.diagnostics.len(), expected);
    }

    #[test]
    fn missing_sections_yield_one_diagnostic(mask in prop::collection::vec(any::<bool>(), 7)) {
        let conventions = Conventions::default();
        let mut message = String::from(
            "{{#is_alert}} @opsgenie-sre {{/is_alert}}\n{{#is_recovery}} @opsgenie-sre {{/is_recovery}}\n",
        );
        for (section, keep) in conventions.required_sections.iter().zip(&mask) {
            if *keep {
                message.push_str(&format!("## {section}\n"));
            }
        }
        let report = run_only(ids::RULE_MONITOR_MESSAGE_FORMAT, &monitor_with("message", string(&message)));

        let expected = usize::from(mask.iter().any(|keep| !keep));
        prop_assert_eq!(report.diagnostics.len(), expected);
    }

    #[test]
    fn runs_are_deterministic(
        priorities in prop::collection::vec(-3i64..9, 1..6),
        interval in 0i64..120,
    ) {
        let mut builder = TreeBuilder::new("main.tf");
        for (i, p) in priorities.iter().enumerate() {
            builder = builder.resource("datadog_monitor", &format!("m{i}"), |r| {
                r.attr("priority", int(*p))
                    .attr("renotify_interval", int(interval))
                    .attr("name", string("plain"))
            });
        }
        let tree = builder.build();
        let registry = builtin(&Conventions::default()).unwrap();
        let cfg = EffectiveConfig::default();

        let first = registry.run_all(&tree, &cfg);
        let second = registry.run_all(&tree, &cfg);
        prop_assert_eq!(&first.diagnostics, &second.diagnostics);

        for d in &first.diagnostics {
            let owner = tree
                .resources
                .iter()
                .find(|r| r.range.contains(&d.range));
            prop_assert!(owner.is_some(), "diagnostic outside any resource: {:?}", d.range);
        }
    }
}
