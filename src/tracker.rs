use crate::classify::default_keywords;
use crate::config::{DEFAULT_MAX_RESULTS, TrackerConfig};
use crate::pipeline::{scan_jobs, scan_subscriptions};
use crate::traits::{MessageSource, RecordStore};
use log::info;
use std::sync::Arc;

/// One fetch-classify-save pass for a single tracker. Fetch errors bubble
/// up to the task loop; classification itself cannot fail.
pub async fn run_tracker_cycle(
    source: &Arc<dyn MessageSource>,
    store: &Arc<dyn RecordStore>,
    tracker: &TrackerConfig,
    max_results: u32,
) -> anyhow::Result<()> {
    let emails = source.fetch_batch(max_results).await?;
    info!(
        "[{}] Fetched {} message(s)",
        tracker.category,
        emails.len()
    );

    #[allow(clippy::wildcard_in_or_patterns)]
    match tracker.category.as_str() {
        "job" => {
            let jobs = scan_jobs(&emails);
            info!("[{}] Detected {} application(s)", tracker.category, jobs.len());
            store.save_jobs(&jobs).await
        }
        "subscription" | _ => {
            let keywords = tracker.keywords.clone().unwrap_or_else(default_keywords);
            let subscriptions = scan_subscriptions(&emails, &keywords);
            info!(
                "[{}] Detected {} subscription(s)",
                tracker.category,
                subscriptions.len()
            );
            store.save_subscriptions(&subscriptions).await
        }
    }
}

pub fn effective_max_results(configured: Option<u32>) -> u32 {
    configured.unwrap_or(DEFAULT_MAX_RESULTS).max(1)
}
