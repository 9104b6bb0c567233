use once_cell::sync::Lazy;
use regex::Regex;

pub const UNKNOWN_SUBSCRIPTION: &str = "Unknown Subscription";

/// Which view of the email a rule matches against. Subject and sender are
/// matched raw because their patterns rely on capitalization; the rest run
/// over the normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
    RawSubject,
    NormalizedText,
    RawFrom,
}

pub struct NameRule {
    pub source: RuleSource,
    pattern: Regex,
}

impl NameRule {
    fn new(source: RuleSource, pattern: &str) -> Self {
        Self {
            source,
            pattern: Regex::new(pattern).expect("invalid name rule pattern"),
        }
    }

    pub fn apply(&self, text: &str) -> Option<String> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|name| !name.is_empty())
    }
}

/// Ordered fallback chain for the subscription service name. Sender and
/// subject conventions vary by provider, so the rules run from most to
/// least specific and the first capture wins. Reordering changes the output
/// on ambiguous inputs.
static SUBSCRIPTION_NAME_RULES: Lazy<Vec<NameRule>> = Lazy::new(|| {
    vec![
        NameRule::new(
            RuleSource::RawSubject,
            r"(?i)welcome (?:to|back to|to your)\s+([A-Za-z0-9+&\-\s]+)",
        ),
        NameRule::new(
            RuleSource::NormalizedText,
            r"(?i)enjoying your\s+([a-z0-9+&\-\s]+)\s+subscription",
        ),
        NameRule::new(
            RuleSource::NormalizedText,
            r"(?i)your\s+([a-z0-9+&\-\s]+)\s+subscription",
        ),
        NameRule::new(RuleSource::RawFrom, r"([A-Z][a-zA-Z0-9+&\-\s]+)"),
    ]
});

static TRAILING_SUBSCRIPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+subscription$").expect("invalid pattern"));

/// Extracts the service name behind a subscription confirmation, walking
/// the fallback chain. A trailing "subscription" word is stripped from any
/// captured name; the fallback literal is returned as-is.
pub fn extract_subscription_name(
    raw_subject: &str,
    normalized_text: &str,
    raw_from: &str,
) -> String {
    for rule in SUBSCRIPTION_NAME_RULES.iter() {
        let haystack = match rule.source {
            RuleSource::RawSubject => raw_subject,
            RuleSource::NormalizedText => normalized_text,
            RuleSource::RawFrom => raw_from,
        };
        if let Some(name) = rule.apply(haystack) {
            return TRAILING_SUBSCRIPTION.replace(&name, "").trim().to_string();
        }
    }
    UNKNOWN_SUBSCRIPTION.to_string()
}

static ANGLE_ADDR: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(.+?)>").expect("invalid pattern"));

/// Pulls the address out of a From header like `Netflix <info@netflix.com>`;
/// headers without angle brackets are used verbatim.
pub fn extract_sender_email(from: &str) -> String {
    ANGLE_ADDR
        .captures(from)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| from.to_string())
}

static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("invalid pattern"));

/// Collects every http/https URL in the given text, in order of appearance.
pub fn extract_links(text: &str) -> Vec<String> {
    URL.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Submission-confirmation pattern. The match itself is the classification
/// signal for the job category: no match means no record, not a record with
/// empty fields.
static JOB_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)application for\s+(.+?)\s+(?:was|has)\s+(?:successfully\s+)?submitted\s+to\s+(.+)")
        .expect("invalid pattern")
});

static COMPANY_SEEK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)seek").expect("invalid pattern"));
static COMPANY_SALUTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?i:hi)\s+[A-Z][a-zA-Z]*").expect("invalid pattern"));
static COMPANY_THANKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)thanks").expect("invalid pattern"));

/// Extracts (position, company) from a whitespace-collapsed subject+snippet.
/// The input keeps its original case: the salutation cleanup needs it.
pub fn extract_job(combined: &str) -> Option<(String, String)> {
    let caps = JOB_PATTERN.captures(combined)?;
    let position = caps.get(1)?.as_str().trim().to_string();
    let company = clean_company(caps.get(2)?.as_str());
    Some((position, company))
}

/// Strips provider boilerplate the pattern's open-ended company capture
/// drags along: a trailing "seek..." fragment, a "Hi <Name>" salutation,
/// a "Thanks" sign-off, then trailing punctuation.
fn clean_company(raw: &str) -> String {
    let mut company = raw.to_string();
    for pattern in [&*COMPANY_SEEK, &*COMPANY_SALUTATION, &*COMPANY_THANKS] {
        if let Some(found) = pattern.find(&company) {
            company.truncate(found.start());
        }
    }
    company
        .trim_end_matches(|c: char| c == ',' || c == '.' || c == '-' || c.is_whitespace())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_subject_takes_precedence() {
        let name = extract_subscription_name(
            "Welcome to Netflix Premium",
            "welcome to netflix premium enjoying your spotify subscription",
            "Spotify <no-reply@spotify.com>",
        );
        assert_eq!(name, "Netflix Premium");
    }

    #[test]
    fn test_welcome_back_to_variant() {
        let name = extract_subscription_name("Welcome back to Hulu", "", "");
        assert_eq!(name, "Hulu");
    }

    #[test]
    fn test_enjoying_your_fallback() {
        let name = extract_subscription_name(
            "Receipt",
            "hope you are enjoying your prime video subscription",
            "",
        );
        assert_eq!(name, "prime video");
    }

    #[test]
    fn test_generic_your_subscription_fallback() {
        let name =
            extract_subscription_name("Receipt", "your spotify subscription has renewed", "");
        assert_eq!(name, "spotify");
    }

    #[test]
    fn test_enjoying_tried_before_generic() {
        // The generic rule would capture "friend enjoying your hulu" here;
        // the more specific rule must win.
        let name = extract_subscription_name(
            "",
            "is your friend enjoying your hulu subscription",
            "",
        );
        assert_eq!(name, "hulu");
    }

    #[test]
    fn test_sender_brand_fallback() {
        let name = extract_subscription_name(
            "Payment received",
            "subscription payment received",
            "Netflix <info@netflix.com>",
        );
        assert_eq!(name, "Netflix");
    }

    #[test]
    fn test_unknown_subscription_fallback() {
        let name = extract_subscription_name("receipt", "subscription", "info@netflix.com");
        assert_eq!(name, UNKNOWN_SUBSCRIPTION);
    }

    #[test]
    fn test_trailing_subscription_word_stripped() {
        let name = extract_subscription_name("Welcome to Netflix Subscription", "", "");
        assert_eq!(name, "Netflix");
    }

    #[test]
    fn test_extract_sender_email() {
        assert_eq!(
            extract_sender_email("Netflix <info@netflix.com>"),
            "info@netflix.com"
        );
        assert_eq!(extract_sender_email("info@netflix.com"), "info@netflix.com");
    }

    #[test]
    fn test_extract_links() {
        let links = extract_links("see https://example.com/a and http://example.org/b.");
        assert_eq!(
            links,
            vec!["https://example.com/a", "http://example.org/b."]
        );
        assert!(extract_links("no links here").is_empty());
    }

    #[test]
    fn test_job_extraction_with_seek_boilerplate() {
        let (position, company) = extract_job(
            "Your application for Senior Engineer was successfully submitted to Acme Corp seek.com.au",
        )
        .unwrap();
        assert_eq!(position, "Senior Engineer");
        assert_eq!(company, "Acme Corp");
    }

    #[test]
    fn test_job_extraction_has_variant_without_successfully() {
        let (position, company) =
            extract_job("application for Data Analyst has submitted to Globex").unwrap();
        assert_eq!(position, "Data Analyst");
        assert_eq!(company, "Globex");
    }

    #[test]
    fn test_job_company_salutation_stripped() {
        let (_, company) =
            extract_job("Your application for QA Tester was submitted to Initech Hi Chris,")
                .unwrap();
        assert_eq!(company, "Initech");
    }

    #[test]
    fn test_job_company_thanks_stripped() {
        let (_, company) =
            extract_job("Your application for QA Tester was submitted to Initech. Thanks for applying")
                .unwrap();
        assert_eq!(company, "Initech");
    }

    #[test]
    fn test_job_no_match_yields_none() {
        assert!(extract_job("Your application is under review at Acme").is_none());
    }
}
