//! Render use cases over in-memory reports.

use crate::report::to_renderable;
use monguard_types::MonguardReport;

pub fn render_text(report: &MonguardReport) -> String {
    monguard_render::render_text(&to_renderable(report))
}

pub fn render_markdown(report: &MonguardReport) -> String {
    monguard_render::render_markdown(&to_renderable(report))
}

pub fn render_annotations(report: &MonguardReport, max: usize) -> Vec<String> {
    monguard_render::render_github_annotations(&to_renderable(report))
        .into_iter()
        .take(max)
        .collect()
}
