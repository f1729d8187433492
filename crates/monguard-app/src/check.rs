//! The `check` use case: load a module, evaluate the rules and produce a report.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use monguard_hcl::LoadOptions;
use monguard_settings::{Overrides, ResolvedConfig};
use monguard_types::{MonguardReport, SCHEMA_REPORT_V1, ToolMeta, Verdict};
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Terraform module directory.
    pub module_dir: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    /// Explicit `--var-file`s, applied after the module's own tfvars files.
    pub var_files: Vec<Utf8PathBuf>,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: MonguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, build the rules, load the module, evaluate.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        monguard_settings::MonguardConfigV1::default()
    } else {
        monguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = monguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let registry =
        monguard_domain::builtin(&resolved.conventions).context("invalid [conventions]")?;

    let opts = LoadOptions {
        var_files: input.var_files.clone(),
        exclude: resolved.exclude.clone(),
    };
    let tree = monguard_hcl::load_module(input.module_dir, &opts)
        .with_context(|| format!("load module {}", input.module_dir))?;

    let run = registry.run_all(&tree, &resolved.effective);
    tracing::debug!(
        verdict = ?run.verdict,
        diagnostics = run.diagnostics.len(),
        failed = run.failed_rules().count(),
        "check finished"
    );

    let report = MonguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "monguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict: run.verdict,
        rules: run.rules,
        diagnostics: run.diagnostics,
        data: run.data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map a finished run to an exit code: 1 = a rule failed, 2 = fail verdict, 0 = pass/warn.
///
/// A failed rule wins over the verdict: its diagnostics are incomplete.
pub fn exit_code(report: &MonguardReport) -> i32 {
    if !report.success() {
        return 1;
    }
    match report.verdict {
        Verdict::Pass | Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monguard_types::{RuleStatus, ids};

    const MONITOR: &str = r#"
resource "datadog_monitor" "latency" {
  name                 = "[P1][CHECKOUT][API][SRE][PRODUCTION] Latency"
  priority             = 9
  renotify_interval    = 60
  renotify_occurrences = 72
  timeout_h            = 1
  tags                 = ["playbook-ops", "product:checkout"]
}
"#;

    fn module(files: &[(&str, &str)]) -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
        for (name, text) in files {
            std::fs::write(root.join(name), text).expect("write file");
        }
        (tmp, root)
    }

    fn input<'a>(dir: &'a Utf8Path, config_text: &'a str) -> CheckInput<'a> {
        CheckInput {
            module_dir: dir,
            config_text,
            overrides: Overrides::default(),
            var_files: Vec::new(),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let (_tmp, root) = module(&[("main.tf", MONITOR)]);
        let output = run_check(input(&root, "")).expect("run_check");

        assert_eq!(output.resolved_config.effective.profile, "default");
        let report = &output.report;
        assert_eq!(report.schema, SCHEMA_REPORT_V1);
        assert_eq!(report.tool.name, "monguard");
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].rule, ids::RULE_MONITOR_PRIORITY_RANGE);
        assert_eq!(report.data.files_scanned, 1);
        assert_eq!(report.data.resources_scanned, 1);
        assert_eq!(exit_code(report), 2);
    }

    #[test]
    fn config_can_disable_rules_and_relax_verdict() {
        let (_tmp, root) = module(&[("main.tf", MONITOR)]);
        let config = "profile = \"advisory\"\n";
        let output = run_check(input(&root, config)).expect("run_check");
        assert_eq!(output.report.verdict, Verdict::Warn);
        assert_eq!(exit_code(&output.report), 0);

        let config = "[rules.monitor_priority_range]\nenabled = false\n";
        let output = run_check(input(&root, config)).expect("run_check");
        assert_eq!(output.report.verdict, Verdict::Pass);
        let outcome = output
            .report
            .rules
            .iter()
            .find(|r| r.rule == ids::RULE_MONITOR_PRIORITY_RANGE)
            .expect("outcome");
        assert_eq!(outcome.status, RuleStatus::Disabled);
    }

    #[test]
    fn invalid_convention_pattern_is_a_config_error() {
        let (_tmp, root) = module(&[("main.tf", MONITOR)]);
        let config = "[conventions]\nname_pattern = \"[unclosed\"\n";
        let err = run_check(input(&root, config)).expect_err("bad pattern");
        assert!(format!("{err:#}").contains("invalid [conventions]"));
    }

    #[test]
    fn unparsable_module_is_an_error() {
        let (_tmp, root) = module(&[("main.tf", "resource {")]);
        let err = run_check(input(&root, "")).expect_err("parse error");
        assert!(format!("{err:#}").contains("load module"));
    }

    #[test]
    fn type_mismatch_fails_the_rule() {
        let (_tmp, root) = module(&[(
            "main.tf",
            "resource \"datadog_monitor\" \"m\" {\n  priority = \"high\"\n}\n",
        )]);
        let output = run_check(input(&root, "")).expect("run_check");
        assert!(!output.report.success());
        assert_eq!(exit_code(&output.report), 1);
    }

    #[test]
    fn malformed_block_fails_only_the_rules_that_read_it() {
        let (_tmp, root) = module(&[
            (
                "a.tf",
                "resource \"datadog_monitor\" \"tagged\" {\n  tags {\n    team = \"sre\"\n  }\n}\n",
            ),
            (
                "b.tf",
                "resource \"datadog_monitor\" \"cpu\" {\n  name     = \"High CPU\"\n  priority = 9\n}\n",
            ),
        ]);
        let output = run_check(input(&root, "")).expect("run_check");
        let report = &output.report;

        let failed: Vec<&str> = report
            .rules
            .iter()
            .filter(|r| r.status == RuleStatus::Failed)
            .map(|r| r.rule.as_str())
            .collect();
        assert_eq!(failed, vec![ids::RULE_MONITOR_TAGS_FORMAT]);

        let rules: Vec<&str> = report.diagnostics.iter().map(|d| d.rule.as_str()).collect();
        assert_eq!(
            rules,
            vec![ids::RULE_MONITOR_NAME_FORMAT, ids::RULE_MONITOR_PRIORITY_RANGE]
        );
        assert!(report.diagnostics.iter().all(|d| d.range.filename.ends_with("b.tf")));
        assert_eq!(exit_code(report), 1);
    }

    #[test]
    fn single_label_monitor_fails_rules_without_aborting_the_run() {
        let (_tmp, root) = module(&[
            ("a.tf", "resource \"datadog_monitor\" {\n  priority = 9\n}\n"),
            ("b.tf", MONITOR),
        ]);
        let output = run_check(input(&root, "")).expect("run_check");
        let report = &output.report;

        assert!(report.rules.iter().all(|r| r.status == RuleStatus::Failed));
        assert!(
            report.rules[0]
                .error
                .as_deref()
                .unwrap_or_default()
                .contains("exactly two labels")
        );
        assert_eq!(report.data.rules_failed, 5);
        assert_eq!(exit_code(report), 1);
    }

    #[test]
    fn redefined_attribute_names_the_file() {
        let (_tmp, root) = module(&[
            (
                "a.tf",
                "resource \"datadog_monitor\" \"cpu\" {\n  priority = 1\n  priority = 2\n}\n",
            ),
            ("b.tf", MONITOR),
        ]);
        let err = run_check(input(&root, "")).expect_err("parse error");
        let message = format!("{err:#}");
        assert!(message.contains("a.tf"));
        assert!(message.contains("redefined attribute"));
    }
}
