use crate::records::{JobApplication, Subscription};
use async_trait::async_trait;

/// A raw message as handed over by the mail provider. Missing headers are
/// represented as empty strings, never as an error.
#[derive(Debug, Clone, Default)]
pub struct RawEmail {
    pub id: String,
    pub from: String,
    pub subject: String,
    pub snippet: String,
    pub date: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetches up to `max_results` recent messages, expanded into header fields.
    /// Messages that cannot be fetched are skipped, not retried.
    async fn fetch_batch(&self, max_results: u32) -> anyhow::Result<Vec<RawEmail>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Replaces the stored subscription snapshot with `records`.
    async fn save_subscriptions(&self, records: &[Subscription]) -> anyhow::Result<()>;

    /// Replaces the stored job-application snapshot with `records`.
    async fn save_jobs(&self, records: &[JobApplication]) -> anyhow::Result<()>;
}
