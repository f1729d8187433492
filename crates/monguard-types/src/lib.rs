//! Stable DTOs and IDs used across the monguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable rule names
//! - source positions and ranges
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod range;
pub mod receipt;

pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use range::{SourcePos, SourceRange};
pub use receipt::{
    Diagnostic, MonguardReport, RuleOutcome, RuleStatus, RunData, SCHEMA_REPORT_V1, Severity,
    SeverityCounts, ToolMeta, Verdict,
};
