use crate::config::GmailConfig;
use crate::traits::{MessageSource, RawEmail};
use async_trait::async_trait;
use futures::future::join_all;
use log::{error, warn};
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://gmail.googleapis.com/gmail/v1";

#[derive(Debug, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MessageDetail {
    id: String,
    #[serde(default)]
    snippet: String,
    payload: Option<MessagePayload>,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    headers: Vec<MessageHeader>,
}

#[derive(Debug, Deserialize)]
struct MessageHeader {
    name: String,
    value: String,
}

impl MessageDetail {
    fn header(&self, name: &str) -> String {
        self.payload
            .as_ref()
            .and_then(|p| p.headers.iter().find(|h| h.name == name))
            .map(|h| h.value.clone())
            .unwrap_or_default()
    }

    fn into_raw_email(self) -> RawEmail {
        RawEmail {
            from: self.header("From"),
            subject: self.header("Subject"),
            date: self.header("Date"),
            snippet: self.snippet.clone(),
            id: self.id,
        }
    }
}

/// Gmail REST API collaborator. Lists recent message ids, then expands each
/// id into header fields with one request per message, issued concurrently.
pub struct GmailSource {
    access_token: String,
    client: Client,
    api_url: String,
}

impl GmailSource {
    pub fn new(config: &GmailConfig) -> Self {
        Self {
            access_token: config.access_token.clone(),
            client: Client::new(),
            api_url: config
                .api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    #[cfg(test)]
    pub fn with_api_url(access_token: String, api_url: String) -> Self {
        Self {
            access_token,
            client: Client::new(),
            api_url,
        }
    }

    async fn list_message_ids(&self, max_results: u32) -> anyhow::Result<Vec<String>> {
        let url = format!(
            "{}/users/me/messages?maxResults={}",
            self.api_url, max_results
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!("Gmail list request failed: {} - {}", status, text);
            return Err(anyhow::anyhow!("Gmail API error: {}", status));
        }

        // An absent `messages` field means an empty inbox, not an error.
        let list: MessageList = response.json().await?;
        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    async fn fetch_message(&self, id: &str) -> anyhow::Result<RawEmail> {
        let url = format!("{}/users/me/messages/{}?format=full", self.api_url, id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Gmail message request for {} failed: {}",
                id,
                response.status()
            ));
        }

        let detail: MessageDetail = response.json().await?;
        Ok(detail.into_raw_email())
    }
}

#[async_trait]
impl MessageSource for GmailSource {
    async fn fetch_batch(&self, max_results: u32) -> anyhow::Result<Vec<RawEmail>> {
        let ids = self.list_message_ids(max_results).await?;

        let fetches = ids.iter().map(|id| self.fetch_message(id));
        let results = join_all(fetches).await;

        let mut emails = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(email) => emails.push(email),
                // A failed per-message fetch is dropped from the batch,
                // never retried.
                Err(e) => warn!("Skipping message: {:?}", e),
            }
        }

        Ok(emails)
    }
}

#[cfg(test)]
#[path = "./gmail_source_tests.rs"]
mod gmail_source_tests;
