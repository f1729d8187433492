//! CLI entry point for monguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup and
//! exit codes. All business logic lives in the `monguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use monguard_app::{
    CheckInput, ExplainOutput, exit_code, format_explanation, format_not_found, format_rules,
    list_rules, parse_report_json, render_annotations, render_markdown, render_text, run_check,
    run_explain, serialize_report,
};
use monguard_settings::Overrides;
use monguard_types::MonguardReport;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = ".monguard.toml";

#[derive(Parser, Debug)]
#[command(
    name = "monguard",
    version,
    about = "Policy linter for Terraform Datadog monitor resources"
)]
struct Cli {
    /// Path to the config TOML (default: `.monguard.toml` in the module directory, if present).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Override profile (default|strict|advisory).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Lowest severity that fails the run (error|warning|notice|never).
    #[arg(long, global = true)]
    fail_on: Option<String>,

    /// Override maximum diagnostics to emit.
    #[arg(long, global = true)]
    max_diagnostics: Option<u32>,

    /// Enable a rule (repeatable).
    #[arg(long = "enable-rule", value_name = "RULE", global = true)]
    enable_rules: Vec<String>,

    /// Disable a rule (repeatable); wins over --enable-rule and --only.
    #[arg(long = "disable-rule", value_name = "RULE", global = true)]
    disable_rules: Vec<String>,

    /// Run only the listed rules (comma separated or repeatable).
    #[arg(long, value_name = "RULE", value_delimiter = ',', global = true)]
    only: Vec<String>,

    /// Log at debug level (`MONGUARD_LOG` takes a full filter directive instead).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Markdown,
    Gha,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lint a Terraform module directory.
    Check {
        /// Module directory containing `*.tf` files.
        #[arg(default_value = ".")]
        dir: Utf8PathBuf,

        /// Extra variable file, applied after `terraform.tfvars` and `*.auto.tfvars` (repeatable).
        #[arg(long = "var-file", value_name = "PATH")]
        var_files: Vec<Utf8PathBuf>,

        /// Output format on stdout.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Also write the JSON report to this path.
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/monguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/monguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a rule with remediation guidance.
    Explain {
        /// Rule name, e.g. "monitor_priority_range".
        rule: String,
    },

    /// List the built-in rules with their effective state.
    Rules,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("monguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("MONGUARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let overrides = Overrides {
        profile: cli.profile.clone(),
        fail_on: cli.fail_on.clone(),
        max_diagnostics: cli.max_diagnostics,
        enable_rules: cli.enable_rules.clone(),
        disable_rules: cli.disable_rules.clone(),
        only_rules: cli.only.clone(),
    };

    match cli.cmd {
        Commands::Check {
            ref dir,
            ref var_files,
            format,
            ref report_out,
        } => {
            let cfg_text = read_config(cli.config.as_deref(), dir)?;
            cmd_check(
                dir,
                &cfg_text,
                overrides,
                var_files.clone(),
                format,
                report_out.as_deref(),
            )
        }
        Commands::Md { report, output } => cmd_md(&report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(&report, max),
        Commands::Explain { ref rule } => Ok(cmd_explain(rule)),
        Commands::Rules => {
            let cfg_text = read_config(cli.config.as_deref(), Utf8Path::new("."))?;
            let rules = list_rules(&cfg_text, overrides)?;
            print!("{}", format_rules(&rules));
            Ok(0)
        }
    }
}

/// An explicit `--config` must exist; the implicit one may be absent (defaults apply).
fn read_config(explicit: Option<&Utf8Path>, dir: &Utf8Path) -> anyhow::Result<String> {
    match explicit {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("read config: {}", path))
        }
        None => {
            let path = dir.join(DEFAULT_CONFIG);
            if path.is_file() {
                tracing::debug!(config = %path, "using config file");
                std::fs::read_to_string(&path).with_context(|| format!("read config: {}", path))
            } else {
                Ok(String::new())
            }
        }
    }
}

fn cmd_check(
    dir: &Utf8Path,
    cfg_text: &str,
    overrides: Overrides,
    var_files: Vec<Utf8PathBuf>,
    format: Format,
    report_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let output = run_check(CheckInput {
        module_dir: dir,
        config_text: cfg_text,
        overrides,
        var_files,
    })?;
    let report = &output.report;

    if let Some(path) = report_out {
        let data = serialize_report(report)?;
        write_file(path, &data).context("write report json")?;
    }

    match format {
        Format::Text => print!("{}", render_text(report)),
        Format::Json => {
            let data = serialize_report(report)?;
            println!("{}", String::from_utf8_lossy(&data));
        }
        Format::Markdown => print!("{}", render_markdown(report)),
        Format::Gha => {
            for annotation in render_annotations(report, usize::MAX) {
                println!("{}", annotation);
            }
        }
    }

    Ok(exit_code(report))
}

fn write_file(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, data).with_context(|| format!("write: {}", path))?;
    Ok(())
}

fn read_report(path: &Utf8Path) -> anyhow::Result<MonguardReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {}", path))?;
    parse_report_json(&text)
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let report = read_report(report_path)?;
    let md = render_markdown(&report);

    match output {
        Some(out_path) => write_file(out_path, md.as_bytes()).context("write markdown output")?,
        None => print!("{}", md),
    }

    Ok(0)
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<i32> {
    let report = read_report(report_path)?;
    for annotation in render_annotations(&report, max) {
        println!("{}", annotation);
    }
    Ok(0)
}

fn cmd_explain(rule: &str) -> i32 {
    match run_explain(rule) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            0
        }
        ExplainOutput::NotFound {
            identifier,
            available_rules,
        } => {
            eprint!("{}", format_not_found(&identifier, available_rules));
            1
        }
    }
}
