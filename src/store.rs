use crate::records::{JobApplication, Subscription};
use crate::traits::RecordStore;
use async_trait::async_trait;
use log::info;
use serde::Serialize;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Writes each snapshot as pretty-printed JSON to a file, replacing the
/// previous contents.
pub struct JsonFileStore {
    file_path: String,
    // Prevents interleaved writes when several trackers share one file path
    lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(file_path: String) -> Self {
        Self {
            file_path,
            lock: Arc::new(Mutex::new(())),
        }
    }

    async fn write_snapshot<T: Serialize>(&self, label: &str, records: &[T]) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(records)?;

        let _guard = self.lock.lock().await;
        let mut file = tokio::fs::File::create(&self.file_path).await?;
        file.write_all(&json).await?;
        file.flush().await?;

        info!(
            "Wrote {} {} record(s) to {}",
            records.len(),
            label,
            self.file_path
        );
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn save_subscriptions(&self, records: &[Subscription]) -> anyhow::Result<()> {
        self.write_snapshot("subscription", records).await
    }

    async fn save_jobs(&self, records: &[JobApplication]) -> anyhow::Result<()> {
        self.write_snapshot("job", records).await
    }
}

/// Prints each snapshot as pretty-printed JSON to stdout. Default sink for
/// one-shot runs.
pub struct StdoutStore;

#[async_trait]
impl RecordStore for StdoutStore {
    async fn save_subscriptions(&self, records: &[Subscription]) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(records)?);
        Ok(())
    }

    async fn save_jobs(&self, records: &[JobApplication]) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(records)?);
        Ok(())
    }
}
