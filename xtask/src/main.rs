//! Developer tasks (schema generation, conformance checks).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::current_dir().expect("Cannot determine current directory"));

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .expect("xtask has no parent")
            .to_path_buf()
    } else {
        manifest_dir
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(monguard_types::MonguardReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(monguard_settings::MonguardConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "monguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "monguard.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Check every fixture's report against the report schema");
    eprintln!("  explain-coverage  Validate all rules have explanations");
}

/// Relative, forward slashes only, no parent segments.
fn is_clean_path(path: &str) -> bool {
    !(path.starts_with('/')
        || path.contains("..")
        || path.contains('\\')
        || (path.len() >= 2 && path.as_bytes()[1] == b':'))
}

/// Run every fixture module in-process and validate the report it produces.
///
/// This checks:
/// 1. Schema validation against the generated report schema
/// 2. Path hygiene: diagnostic file names are relative to the module
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(generate_report_schema())
        .context("Failed to convert report schema")?;
    let compiled = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {}", e))?;
    println!("✓ monguard.report.v1 schema compiles");

    let mut fixture_count = 0;
    let mut errors = Vec::new();

    let mut entries: Vec<PathBuf> = fs::read_dir(fixtures_dir())
        .context("Failed to read tests/fixtures/")?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    entries.sort();

    for fixture_dir in entries {
        if !fixture_dir.is_dir() {
            continue;
        }
        let dir = Utf8PathBuf::from_path_buf(fixture_dir)
            .map_err(|p| anyhow::anyhow!("non-UTF-8 fixture path: {}", p.display()))?;
        let name = dir.file_name().unwrap_or_default().to_string();

        let config_path = dir.join(".monguard.toml");
        let config_text = if config_path.is_file() {
            fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {config_path}"))?
        } else {
            String::new()
        };

        let output = monguard_app::run_check(monguard_app::CheckInput {
            module_dir: &dir,
            config_text: &config_text,
            overrides: Default::default(),
            var_files: Vec::new(),
        })
        .with_context(|| format!("fixture '{name}': check failed"))?;

        let value = serde_json::to_value(&output.report)?;
        for err in compiled.iter_errors(&value) {
            errors.push(format!("fixture '{}': schema validation: {}", name, err));
        }

        if let Some(diagnostics) = value.get("diagnostics").and_then(|v| v.as_array()) {
            for (i, diagnostic) in diagnostics.iter().enumerate() {
                let Some(filename) = diagnostic
                    .get("range")
                    .and_then(|r| r.get("filename"))
                    .and_then(|v| v.as_str())
                else {
                    continue;
                };
                let relative = filename
                    .strip_prefix(dir.as_str())
                    .map(|s| s.trim_start_matches('/'))
                    .unwrap_or(filename);
                if !is_clean_path(relative) {
                    errors.push(format!(
                        "fixture '{}': diagnostics[{}].range.filename '{}' is not clean",
                        name, i, filename
                    ));
                }
            }
        }

        fixture_count += 1;
        println!("  ✓ {} validates", name);
    }

    if fixture_count == 0 {
        bail!("No fixtures found in {}", fixtures_dir().display());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {} fixtures pass conformance checks!", fixture_count);
    Ok(())
}

/// Validate that all rules have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let rules = monguard_types::explain::all_rule_names();
    let mut errors = Vec::new();

    for rule in rules {
        match monguard_types::explain::lookup_explanation(rule) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("Rule '{}' has empty title", rule));
                }
                if exp.description.is_empty() {
                    errors.push(format!("Rule '{}' has empty description", rule));
                }
                if exp.remediation.is_empty() {
                    errors.push(format!("Rule '{}' has empty remediation", rule));
                }
                if exp.examples.before.is_empty() || exp.examples.after.is_empty() {
                    errors.push(format!("Rule '{}' is missing an example", rule));
                }
            }
            None => errors.push(format!("Rule '{}' has no explanation", rule)),
        }
    }

    if errors.is_empty() {
        println!("✓ {} rules have explanations", rules.len());
        return Ok(());
    }
    for error in &errors {
        eprintln!("  - {}", error);
    }
    bail!(
        "Explain coverage validation failed with {} errors",
        errors.len()
    )
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            println!("{}", monguard_types::SCHEMA_REPORT_V1);
            println!("{}", monguard_settings::SCHEMA_CONFIG_V1);
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
