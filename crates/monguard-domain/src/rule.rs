//! The contract every policy unit implements.

use crate::emit::Emitter;
use crate::extract::{ExtractionError, Extractor};
use crate::resolve::{ResolveError, Resolver};
use monguard_types::Severity;

/// A named, independent policy check.
///
/// A pass goes Fetch (via the extractor), Resolve, Evaluate, Emit. Returning an error
/// aborts the remainder of this rule's pass only; other rules still run, and diagnostics
/// already emitted are kept.
pub trait Rule: Send + Sync {
    /// Unique, stable identifier used in configuration, output and ignore annotations.
    fn name(&self) -> &str;

    fn enabled_by_default(&self) -> bool {
        true
    }

    fn severity(&self) -> Severity;

    /// Documentation URL attached to every diagnostic of this rule.
    fn link(&self) -> Option<&str> {
        None
    }

    fn check(
        &self,
        extractor: &Extractor<'_>,
        resolver: &Resolver<'_>,
        emitter: &mut Emitter<'_>,
    ) -> Result<(), RuleError>;
}

/// Hard failure of one rule pass. Policy violations are diagnostics, never errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Resolution(#[from] ResolveError),

    #[error("diagnostic has no source location: {message}")]
    UntraceableDiagnostic { message: String },
}
