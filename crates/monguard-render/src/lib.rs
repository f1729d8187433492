//! Rendering utilities for terminals and CI surfaces (text, Markdown, GitHub annotations).
//!
//! Renderers are pure functions over [`RenderableReport`]; the same report always renders
//! to the same bytes.

#![forbid(unsafe_code)]

mod gha;
mod markdown;
mod model;
mod text;

pub use gha::render_github_annotations;
pub use markdown::render_markdown;
pub use model::{
    RenderableData, RenderableDiagnostic, RenderableLocation, RenderableReport,
    RenderableRuleFailure, RenderableSeverity, RenderableVerdictStatus,
};
pub use text::render_text;
