use std::time::Duration;

use getufit_core::{SessionRecord, UserProfile};
use reqwest::{Client, Response};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::types::{ChatReply, CoachChatRequest, PdfRequest, PdfResponse, PlanResponse};

/// Client for the coach service: onboarding, plan generation, general chat,
/// and the co-hosted PDF export endpoint.
#[derive(Debug, Clone)]
pub struct CoachClient {
    base_url: String,
    client: Client,
}

impl CoachClient {
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

    /// Submit the onboarding profile. The response is persisted whole by the
    /// caller; this client only guarantees it carries `user_data.user_id`.
    pub async fn onboard(&self, profile: &UserProfile) -> ApiResult<SessionRecord> {
        debug!("Onboarding user {}", profile.user_id);
        let response = self
            .client
            .post(format!("{}/onboard_user", self.base_url))
            .json(profile)
            .send()
            .await?;

        let record: SessionRecord = check_status(response).await?.json().await?;
        Ok(record)
    }

    /// Fetch the generated weekly plan for a user. The reply is free text
    /// embedding fenced JSON; de-fencing happens in `getufit_core::fence`.
    pub async fn generate_plan(&self, user_id: &str) -> ApiResult<PlanResponse> {
        debug!("Fetching fitness plan for {}", user_id);
        let response = self
            .client
            .get(format!(
                "{}/generate_fitness_plan_from_bigquery",
                self.base_url
            ))
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        let plan: PlanResponse = check_status(response).await?.json().await?;
        Ok(plan)
    }

    /// One general-chat round trip
    pub async fn chat(&self, user_id: &str, query: &str) -> ApiResult<ChatReply> {
        let request = CoachChatRequest {
            user_id: user_id.to_string(),
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

    /// Request the chat-history PDF export
    pub async fn generate_pdf(&self, user_id: &str) -> ApiResult<PdfResponse> {
        debug!("Requesting PDF export for {}", user_id);
        let request = PdfRequest {
            user_id: user_id.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/generate_pdf", self.base_url))
            .json(&request)
            .send()
            .await?;

        let pdf: PdfResponse = check_status(response).await?.json().await?;
        Ok(pdf)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Map a non-success status to [`ApiError::Api`] with best-effort body text.
pub(crate) async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = CoachClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_with_timeout_builds() {
        assert!(CoachClient::with_timeout("http://localhost:5000", Duration::from_secs(30)).is_ok());
    }
}
