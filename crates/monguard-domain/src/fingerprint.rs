use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a diagnostic.
///
/// Identity fields:
/// - rule name
/// - filename (as loaded)
/// - start line
/// - message
pub fn fingerprint_for_diagnostic(rule: &str, filename: &str, line: u32, message: &str) -> String {
    let line = line.to_string();
    let canonical = [rule, filename, line.as_str(), message].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_field_sensitive() {
        let a = fingerprint_for_diagnostic("monitor_priority_range", "main.tf", 3, "out of range");
        let b = fingerprint_for_diagnostic("monitor_priority_range", "main.tf", 3, "out of range");
        let c = fingerprint_for_diagnostic("monitor_priority_range", "main.tf", 4, "out of range");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
