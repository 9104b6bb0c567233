use crate::classify::is_subscription_candidate;
use crate::extract::{extract_job, extract_links, extract_sender_email, extract_subscription_name};
use crate::normalize::{collapse_ws, normalize, parse_date};
use crate::records::{JobApplication, Subscription};
use crate::traits::RawEmail;
use log::debug;
use std::collections::HashSet;

/// Runs the full subscription pass over a fetched batch: normalize, gate on
/// `keywords`, extract, then collapse duplicates per sender/service pair
/// (first-seen wins) and sort most recent first. Each email is processed
/// independently; a non-match never affects the rest of the batch.
pub fn scan_subscriptions(emails: &[RawEmail], keywords: &[String]) -> Vec<Subscription> {
    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut subscriptions = Vec::new();

    for email in emails {
        let normalized = normalize(email);
        if !is_subscription_candidate(&normalized.text, keywords) {
            continue;
        }

        let name = extract_subscription_name(&email.subject, &normalized.text, &email.from);
        let subscription = Subscription::new(
            name,
            normalized.parsed_date,
            extract_links(&email.snippet),
            extract_sender_email(&email.from),
        );

        if !seen_keys.insert(subscription.dedup_key()) {
            debug!(
                "Skipping duplicate subscription {} from message {}",
                subscription.name, email.id
            );
            continue;
        }
        subscriptions.push(subscription);
    }

    // Stable sort keeps input order for equal dates.
    subscriptions.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    subscriptions
}

/// Runs the job-application pass. Classification and extraction are fused:
/// an email that does not match the submission pattern produces nothing.
pub fn scan_jobs(emails: &[RawEmail]) -> Vec<JobApplication> {
    let mut jobs = Vec::new();

    for email in emails {
        let combined = collapse_ws(&format!("{} {}", email.subject, email.snippet));
        if let Some((position, company)) = extract_job(&combined) {
            jobs.push(JobApplication::new(
                position,
                company,
                parse_date(&email.date),
            ));
        }
    }

    jobs.sort_by(|a, b| b.date_applied.cmp(&a.date_applied));
    jobs
}
