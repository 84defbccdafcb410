// HTTP snapshot source: one GET against a bazaar endpoint

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use super::{SnapshotSource, SourceError};

pub struct HttpSource {
    pub url: String,         // e.g. "https://api.hypixel.net/skyblock/bazaar"
    pub description: String, // e.g. "Hypixel Direct API (skyblock/bazaar)"
    timeout: Duration,
    client: Client,
}

impl HttpSource {
    pub fn new(url: &str, description: &str, timeout: Duration, user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            description: description.to_string(),
            timeout,
            client,
        })
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout(self.timeout)
        } else {
            SourceError::Transport(e.to_string())
        }
    }
}

#[async_trait::async_trait]
impl SnapshotSource for HttpSource {
    fn describe(&self) -> String {
        format!("{} - {}", self.description, self.url)
    }

    async fn fetch(&self) -> Result<Value, SourceError> {
        info!(url = %self.url, "Requesting bazaar snapshot");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        debug!(url = %self.url, status = status.as_u16(), "Response received");
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        // Read the body first so a bad payload is reported as a parse failure
        let body = response.text().await.map_err(|e| self.map_reqwest_error(e))?;
        serde_json::from_str(&body).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_includes_url() {
        let src = HttpSource::new(
            "https://api.hypixel.net/skyblock/bazaar",
            "Hypixel Direct API (skyblock/bazaar)",
            Duration::from_secs(10),
            "bazaar-rs/0.1",
        )
        .unwrap();
        assert_eq!(
            src.describe(),
            "Hypixel Direct API (skyblock/bazaar) - https://api.hypixel.net/skyblock/bazaar"
        );
    }

    #[test]
    fn test_invalid_user_agent_is_an_error() {
        let result = HttpSource::new(
            "https://api.hypixel.net/skyblock/bazaar",
            "Hypixel Direct API (skyblock/bazaar)",
            Duration::from_secs(10),
            "bazaar-rs\n0.1",
        );
        assert!(matches!(result, Err(SourceError::Client(_))));
    }
}
