//! Host adapter: discover a Terraform module directory, parse its files and lower them
//! into the domain's configuration tree.
//!
//! This crate is allowed to do filesystem IO. Rules never see `hcl-edit` types; everything
//! they touch is the domain model built here.

#![forbid(unsafe_code)]

mod annotations;
mod discover;
mod lower;
mod sourcemap;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use globset::GlobSet;
use monguard_domain::model::{ConfigTree, Expr, Variable};
use rayon::prelude::*;
use std::collections::BTreeMap;

pub use discover::{ModuleFiles, discover_module};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    /// Parse and lower arbitrary text as a `.tf` file.
    ///
    /// Returns `Err(...)` on invalid HCL. **Never panics** on any input.
    pub fn parse_config(text: &str) -> anyhow::Result<()> {
        let _ = super::lower::lower_config("fuzz.tf", text)?;
        Ok(())
    }

    /// Parse and lower arbitrary text as a `.tfvars` file.
    ///
    /// **Never panics** on any input.
    pub fn parse_tfvars(text: &str) -> anyhow::Result<()> {
        let _ = super::lower::lower_tfvars("fuzz.tfvars", text)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Extra variable files, applied after `terraform.tfvars` and `*.auto.tfvars`.
    pub var_files: Vec<Utf8PathBuf>,
    /// Configuration file names to skip.
    pub exclude: Option<GlobSet>,
}

/// Load every `*.tf` file directly inside `dir` into one configuration tree.
///
/// Files are parsed in parallel and merged in file-name order, so the tree (and every
/// diagnostic computed from it) does not depend on scheduling.
pub fn load_module(dir: &Utf8Path, opts: &LoadOptions) -> anyhow::Result<ConfigTree> {
    let files = discover_module(dir).context("discover module files")?;

    let configs: Vec<(Utf8PathBuf, String)> = files
        .configs
        .iter()
        .filter(|name| {
            let skip = opts
                .exclude
                .as_ref()
                .is_some_and(|set| set.is_match(name.as_str()));
            if skip {
                tracing::debug!(file = %name, "excluded");
            }
            !skip
        })
        .map(|name| (dir.join(name), display_name(dir, name)))
        .collect();

    let fragments = configs
        .par_iter()
        .map(|(path, shown)| {
            let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
            tracing::debug!(file = %shown, bytes = text.len(), "parsing configuration file");
            lower::lower_config(shown, &text).with_context(|| format!("parse {shown}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut tree = ConfigTree::default();
    for ((_, shown), fragment) in configs.into_iter().zip(fragments) {
        tree.files.push(shown);
        tree.resources.extend(fragment.resources);
        tree.annotations.extend(fragment.annotations);

        for variable in fragment.variables {
            if let Some(prev) = tree.variables.get(&variable.name) {
                anyhow::bail!(
                    "{}: duplicate variable \"{}\" (first declared at {})",
                    variable.range,
                    variable.name,
                    prev.range
                );
            }
            tree.variables.insert(variable.name.clone(), variable);
        }
        for (name, expr) in fragment.locals {
            if let Some(prev) = tree.locals.get(&name) {
                anyhow::bail!(
                    "{}: duplicate local \"{name}\" (first defined at {})",
                    expr.range,
                    prev.range
                );
            }
            tree.locals.insert(name, expr);
        }
    }

    let var_files = files
        .tfvars
        .iter()
        .map(|name| (dir.join(name), display_name(dir, name)))
        .chain(opts.var_files.iter().map(|p| (p.clone(), p.to_string())));
    for (path, shown) in var_files {
        let text = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
        let values =
            lower::lower_tfvars(&shown, &text).with_context(|| format!("parse {shown}"))?;
        tracing::debug!(file = %shown, values = values.len(), "applying variable values");
        apply_values(&mut tree, values);
    }

    tracing::debug!(
        files = tree.files.len(),
        resources = tree.resources.len(),
        variables = tree.variables.len(),
        "module loaded"
    );
    Ok(tree)
}

fn display_name(dir: &Utf8Path, name: &str) -> String {
    if matches!(dir.as_str(), "" | ".") {
        name.to_string()
    } else {
        dir.join(name).to_string()
    }
}

/// Later files win. A value for an undeclared variable still declares it, so references
/// to it resolve the way Terraform would report them rather than as unset.
fn apply_values(tree: &mut ConfigTree, values: BTreeMap<String, Expr>) {
    for (name, expr) in values {
        match tree.variables.get_mut(&name) {
            Some(variable) => variable.value = Some(expr),
            None => {
                tracing::debug!(variable = %name, "value for undeclared variable");
                let range = expr.range.clone();
                tree.variables.insert(
                    name.clone(),
                    Variable {
                        name,
                        default: None,
                        value: Some(expr),
                        range,
                    },
                );
            }
        }
    }
}
