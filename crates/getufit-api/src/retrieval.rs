use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::coach::check_status;
use crate::error::{ApiError, ApiResult};
use crate::types::{ChatReply, IngestDocument, IngestRequest, PersonalChatRequest};

/// Client for the retrieval service backing the personal ("own data") bot.
#[derive(Debug, Clone)]
pub struct RetrievalClient {
    base_url: String,
    client: Client,
}

impl RetrievalClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Build a client with a per-request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// One personal-bot round trip. The query goes out verbatim; the reply
    /// may embed fenced day records, which the caller renders.
    pub async fn chat(&self, patient_id: &str, query: &str) -> ApiResult<ChatReply> {
        let request = PersonalChatRequest {
            patient_id: patient_id.to_string(),
            query: query.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(&request)
            .send()
            .await?;

        let reply: ChatReply = check_status(response).await?.json().await?;
        Ok(reply)
    }

    /// Forward a freshly parsed plan into the retrieval corpus.
    ///
    /// The document is the parsed plan object verbatim. Fire-and-forget at
    /// the call site: the plan view never awaits this on its render path.
    pub async fn ingest(&self, patient_id: &str, document: Value) -> ApiResult<()> {
        debug!("Ingesting plan document for {}", patient_id);
        let request = IngestRequest {
            patient_id: patient_id.to_string(),
            documents: vec![IngestDocument { text: document }],
        };

        let response = self
            .client
            .post(format!("{}/add_data", self.base_url))
            .json(&request)
            .send()
            .await?;

        // 2xx is all that matters; the body is unused.
        check_status(response).await?;
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = RetrievalClient::new("http://localhost:8000///");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
