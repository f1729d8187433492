use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Files of one Terraform module directory, by file name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleFiles {
    /// `*.tf`, sorted by name.
    pub configs: Vec<String>,
    /// `terraform.tfvars` first if present, then `*.auto.tfvars` sorted by name.
    pub tfvars: Vec<String>,
}

/// List the configuration and variable files directly inside `dir`.
///
/// Subdirectories are not entered: nested modules are separate modules.
pub fn discover_module(dir: &Utf8Path) -> anyhow::Result<ModuleFiles> {
    if !dir.is_dir() {
        anyhow::bail!("{dir} is not a directory");
    }

    let mut out = ModuleFiles::default();
    let mut auto_vars = Vec::new();
    let mut has_default_vars = false;

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("list {dir}"))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(path) = pathbuf_to_utf8(entry.path().to_path_buf()) else {
            tracing::debug!(path = %entry.path().display(), "skipping non-UTF-8 file name");
            continue;
        };
        let Some(name) = path.file_name() else {
            continue;
        };

        if name == "terraform.tfvars" {
            has_default_vars = true;
        } else if name.ends_with(".auto.tfvars") {
            auto_vars.push(name.to_string());
        } else if name.ends_with(".tf") {
            out.configs.push(name.to_string());
        }
    }

    // Stable order.
    out.configs.sort();
    auto_vars.sort();
    if has_default_vars {
        out.tfvars.push("terraform.tfvars".to_string());
    }
    out.tfvars.extend(auto_vars);

    Ok(out)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    #[test]
    fn lists_top_level_files_in_order() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        for name in [
            "variables.tf",
            "main.tf",
            "b.auto.tfvars",
            "a.auto.tfvars",
            "terraform.tfvars",
            "README.md",
            "main.tf.json",
            "nested/other.tf",
        ] {
            write_file(&root.join(name), "");
        }

        let files = discover_module(&root).expect("discover");
        assert_eq!(files.configs, vec!["main.tf", "variables.tf"]);
        assert_eq!(
            files.tfvars,
            vec!["terraform.tfvars", "a.auto.tfvars", "b.auto.tfvars"]
        );
    }

    #[test]
    fn empty_directory_has_no_files() {
        let tmp = TempDir::new().expect("temp dir");
        let files = discover_module(&utf8_root(&tmp)).expect("discover");
        assert_eq!(files, ModuleFiles::default());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = TempDir::new().expect("temp dir");
        let err = discover_module(&utf8_root(&tmp).join("absent")).expect_err("missing");
        assert!(err.to_string().contains("is not a directory"));
    }
}
