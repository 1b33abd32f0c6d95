use thiserror::Error;

/// Unified error type for backend calls
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("contract error: {0}")]
    Contract(String),
}

impl ApiError {
    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract(message.into())
    }

    /// User-facing summary for toast rendering
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Could not reach the server".to_string(),
            ApiError::Api { status, message } if message.is_empty() => {
                format!("Server returned status {}", status)
            }
            ApiError::Api { message, .. } => message.clone(),
            ApiError::Contract(message) => message.clone(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Contract(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Result type for backend calls
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 404,
            message: "No history found".to_string(),
        };
        assert_eq!(err.to_string(), "api error: 404 - No history found");
        assert_eq!(err.user_message(), "No history found");
    }

    #[test]
    fn test_empty_body_falls_back_to_status() {
        let err = ApiError::Api {
            status: 502,
            message: String::new(),
        };
        assert_eq!(err.user_message(), "Server returned status 502");
    }
}
