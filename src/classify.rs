/// Default gate for subscription detection. Intentionally a single keyword:
/// the upstream product shipped several divergent keyword sets and never
/// reconciled them, so anything wider is opt-in via configuration.
pub const DEFAULT_SUBSCRIPTION_KEYWORDS: &[&str] = &["subscription"];

/// Returns true iff any keyword occurs as a substring of the normalized
/// text. Pure predicate, no side effects.
pub fn is_subscription_candidate(normalized_text: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|keyword| normalized_text.contains(keyword.as_str()))
}

pub fn default_keywords() -> Vec<String> {
    DEFAULT_SUBSCRIPTION_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_text_containing_keyword() {
        assert!(is_subscription_candidate(
            "your netflix subscription is active",
            &default_keywords()
        ));
    }

    #[test]
    fn test_rejects_text_without_keyword() {
        assert!(!is_subscription_candidate(
            "thanks for subscribing",
            &default_keywords()
        ));
    }

    #[test]
    fn test_custom_keywords_widen_the_gate() {
        let keywords = vec!["subscription".to_string(), "membership".to_string()];
        assert!(is_subscription_candidate(
            "your gym membership renews soon",
            &keywords
        ));
    }

    #[test]
    fn test_empty_keyword_list_rejects_everything() {
        assert!(!is_subscription_candidate("subscription", &[]));
    }
}
