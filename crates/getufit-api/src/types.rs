use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Plan generation response; the string embeds fenced JSON
#[derive(Debug, Clone, Deserialize)]
pub struct PlanResponse {
    pub raw_ai_response: String,
}

/// Chat response shape shared by both bots.
///
/// The field is optional because the retrieval service has been observed to
/// return 2xx bodies without it; callers decide what a missing reply means.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: Option<String>,
}

/// PDF export response
#[derive(Debug, Clone, Deserialize)]
pub struct PdfResponse {
    pub pdf_url: String,
}

/// General coach chat request body
#[derive(Debug, Clone, Serialize)]
pub struct CoachChatRequest {
    pub user_id: String,
    pub query: String,
}

/// Personal bot chat request body
#[derive(Debug, Clone, Serialize)]
pub struct PersonalChatRequest {
    pub patient_id: String,
    pub query: String,
}

/// PDF export request body
#[derive(Debug, Clone, Serialize)]
pub struct PdfRequest {
    pub user_id: String,
}

/// Plan ingestion request body
#[derive(Debug, Clone, Serialize)]
pub struct IngestRequest {
    pub patient_id: String,
    pub documents: Vec<IngestDocument>,
}

/// One ingested document; `text` carries the parsed plan object verbatim
#[derive(Debug, Clone, Serialize)]
pub struct IngestDocument {
    pub text: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_reply_tolerates_missing_response() {
        let reply: ChatReply = serde_json::from_str("{}").unwrap();
        assert!(reply.response.is_none());

        let reply: ChatReply = serde_json::from_str(r#"{"response":"3 sets of 12"}"#).unwrap();
        assert_eq!(reply.response.as_deref(), Some("3 sets of 12"));
    }

    #[test]
    fn test_ingest_request_shape() {
        let request = IngestRequest {
            patient_id: "u-42".to_string(),
            documents: vec![IngestDocument {
                text: serde_json::json!({"activities": []}),
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["patient_id"], "u-42");
        assert_eq!(value["documents"][0]["text"]["activities"], serde_json::json!([]));
    }
}
