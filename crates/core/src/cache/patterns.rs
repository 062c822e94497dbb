//! Glob matching for cache keys.
//!
//! Only `*` is special. Backends use this to resolve invalidation patterns
//! against the keys they hold.

/// Checks if a cache key matches a glob pattern.
///
/// The pattern supports `*` as a wildcard that matches any sequence
/// of characters (including empty strings).
///
/// # Examples
///
/// ```
/// use stockroom_core::cache::pattern_matches;
///
/// // Exact match
/// assert!(pattern_matches("user:123", "user:123"));
///
/// // Wildcard at end
/// assert!(pattern_matches("dashboard:summary:*", "dashboard:summary:global:default"));
///
/// // Wildcard in middle
/// assert!(pattern_matches("dashboard:*:global:*", "dashboard:sales:global:period:30d"));
///
/// // No match
/// assert!(!pattern_matches("dashboard:summary:*", "other:X"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    let (head, rest) = match parts.split_first() {
        Some((head, rest)) if !rest.is_empty() => (*head, rest),
        // No wildcard at all.
        _ => return pattern == key,
    };
    let (tail, middle) = match rest.split_last() {
        Some((tail, middle)) => (*tail, middle),
        None => return pattern == key,
    };

    // Head and tail are anchored and may not overlap.
    if key.len() < head.len() + tail.len() || !key.starts_with(head) || !key.ends_with(tail) {
        return false;
    }

    // Middle parts must appear in order between the anchors.
    let mut window = &key[head.len()..key.len() - tail.len()];
    for part in middle.iter().filter(|part| !part.is_empty()) {
        match window.find(part) {
            Some(pos) => window = &window[pos + part.len()..],
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_wildcards() {
        assert!(pattern_matches(
            "dashboard:composed:global:default",
            "dashboard:composed:global:default"
        ));
        assert!(!pattern_matches("other:X", "other:Y"));
        assert!(pattern_matches("", ""));
        assert!(!pattern_matches("", "non-empty"));
    }

    #[test]
    fn test_anchored_wildcards() {
        assert!(pattern_matches("dashboard:summary:*", "dashboard:summary:"));
        assert!(!pattern_matches("dashboard:summary:*", "dashboard:sales:A"));
        assert!(pattern_matches("*:period:30d", "dashboard:sales:global:period:30d"));
        assert!(!pattern_matches("*:period:30d", "dashboard:sales:global:period:7d"));
        assert!(!pattern_matches("prefix:*", ""));
    }

    #[test]
    fn test_scope_patterns() {
        assert!(pattern_matches(
            "dashboard:*:global:*",
            "dashboard:inventory:global:default"
        ));
        assert!(!pattern_matches(
            "dashboard:*:global:*",
            "dashboard:inventory:0b6e2c1a:default"
        ));
        assert!(!pattern_matches("*:middle:*", "start:other:end"));
    }

    #[test]
    fn test_degenerate_wildcards() {
        assert!(pattern_matches("*", ""));
        assert!(pattern_matches("**", "anything"));
        assert!(pattern_matches("dashboard:**:default", "dashboard:a:b:default"));
    }

    #[test]
    fn test_anchors_do_not_overlap() {
        assert!(!pattern_matches("ab*ba", "aba"));
        assert!(pattern_matches("ab*ba", "abba"));
        assert!(pattern_matches("a*b*a", "aba"));
        assert!(!pattern_matches("a*b*a", "aa"));
    }
}
