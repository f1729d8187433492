use crate::sourcemap::SourceMap;
use monguard_domain::model::IgnoreAnnotation;
use monguard_types::ids;
use regex::Regex;
use std::sync::LazyLock;

static IGNORE_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:#|//)\s*{}:\s*([A-Za-z0-9_\-]+(?:\s*,\s*[A-Za-z0-9_\-]+)*)",
        ids::IGNORE_ANNOTATION
    ))
    .expect("ignore annotation pattern is valid")
});

/// Collect `# monguard-ignore: rule_a, rule_b` comments (`//` works too).
pub fn collect(text: &str, map: &SourceMap<'_>) -> Vec<IgnoreAnnotation> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let caps = IGNORE_COMMENT.captures(line)?;
            let rules = caps
                .get(1)?
                .as_str()
                .split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
            Some(IgnoreAnnotation {
                rules,
                range: map.line_range(i + 1),
            })
        })
        .collect()
}
