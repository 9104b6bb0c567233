use crate::traits::RawEmail;
use chrono::{DateTime, Utc};

/// Lowercased, whitespace-collapsed working copy of an email, plus its
/// best-effort parsed date.
#[derive(Debug, Clone)]
pub struct NormalizedEmail {
    pub text: String,
    pub parsed_date: DateTime<Utc>,
}

/// Builds the search text used for subscription matching: subject, snippet
/// and sender concatenated, curly quotes straightened, whitespace runs
/// collapsed, lowercased. Malformed input never fails; absent fields are
/// already empty strings.
pub fn normalize(email: &RawEmail) -> NormalizedEmail {
    let combined = format!("{} {} {}", email.subject, email.snippet, email.from);
    NormalizedEmail {
        text: collapse_ws(&straighten_quotes(&combined)).to_lowercase(),
        parsed_date: parse_date(&email.date),
    }
}

/// Collapses every whitespace run to a single space and trims the ends.
pub fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn straighten_quotes(text: &str) -> String {
    text.replace(['\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'], "'")
}

/// Parses an email Date header, RFC 2822 first, then RFC 3339. An
/// unparseable date falls back to the current instant rather than erroring.
pub fn parse_date(date: &str) -> DateTime<Utc> {
    if let Ok(parsed) = DateTime::parse_from_rfc2822(date) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return parsed.with_timezone(&Utc);
    }
    Utc::now()
}
