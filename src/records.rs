use chrono::{DateTime, Months, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A tracked subscription derived from a confirmation email. Identifiers are
/// freshly generated on every scan; only the content is stable across runs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub next_renewal: DateTime<Utc>,
    pub links: Vec<String>,
    #[serde(skip)]
    pub sender_email: String,
}

impl Subscription {
    pub fn new(
        name: String,
        start_date: DateTime<Utc>,
        links: Vec<String>,
        sender_email: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            start_date,
            next_renewal: add_one_year(start_date),
            links,
            sender_email,
        }
    }

    /// Composite key used to collapse repeat confirmations from the same
    /// sender about the same service.
    pub fn dedup_key(&self) -> String {
        format!("{}-{}", self.sender_email, self.name)
    }
}

/// A job application inferred from a submission-confirmation email. The
/// status is always "Applied"; no further state is read from the message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: Uuid,
    pub position: String,
    pub company: String,
    pub status: String,
    pub date_applied: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
}

impl JobApplication {
    pub fn new(position: String, company: String, applied: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            company,
            status: "Applied".to_string(),
            date_applied: applied,
            last_update: applied,
        }
    }
}

/// Renewal is one calendar year after the start date. chrono clamps a
/// Feb 29 start to Feb 28 of the following year.
fn add_one_year(start: DateTime<Utc>) -> DateTime<Utc> {
    start
        .checked_add_months(Months::new(12))
        .unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_renewal_is_one_year_later() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let sub = Subscription::new("Netflix".into(), start, vec![], "a@b.com".into());
        assert_eq!(
            sub.next_renewal,
            Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_renewal_clamps_leap_day() {
        let start = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        let sub = Subscription::new("Leap".into(), start, vec![], "a@b.com".into());
        assert_eq!(
            sub.next_renewal,
            Utc.with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_job_application_defaults() {
        let applied = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        let job = JobApplication::new("Senior Engineer".into(), "Acme Corp".into(), applied);
        assert_eq!(job.status, "Applied");
        assert_eq!(job.date_applied, applied);
        assert_eq!(job.last_update, applied);
    }

    #[test]
    fn test_subscription_serializes_camel_case() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let sub = Subscription::new("Netflix".into(), start, vec![], "a@b.com".into());
        let json = serde_json::to_value(&sub).unwrap();
        assert!(json.get("startDate").is_some());
        assert!(json.get("nextRenewal").is_some());
        assert!(json.get("senderEmail").is_none());
    }
}
