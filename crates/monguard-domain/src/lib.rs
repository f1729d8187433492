//! Pure rule evaluation (no IO).
//!
//! Input: a configuration tree constructed elsewhere.
//! Output: diagnostics + per-rule outcomes + verdict.
//!
//! Rules only see the configuration through three narrow capabilities:
//! [`extract::Extractor`] to fetch resource blocks, [`resolve::Resolver`] to turn
//! expressions into typed values, and [`emit::Emitter`] to report violations.

#![forbid(unsafe_code)]

pub mod emit;
pub mod extract;
pub mod model;
pub mod policy;
pub mod report;
pub mod resolve;
pub mod rule;
pub mod rules;
pub mod schema;

mod engine;
mod fingerprint;

pub use engine::{Registry, RegistryError};
pub use rule::{Rule, RuleError};
pub use rules::{Conventions, RuleBuildError, builtin};

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod proptest;
