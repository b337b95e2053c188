use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("rate limited")]
    RateLimited,
    #[error("server responded with status {status}")]
    Server {
        status: u16,
        message: Option<String>,
    },
    #[error("malformed payload: {0}")]
    Payload(String),
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// Builds the error for a non-2xx response body.
    pub(crate) fn from_status(status: u16, body: &[u8]) -> Self {
        if status == 429 {
            return ApiError::RateLimited;
        }
        #[derive(Deserialize)]
        struct ErrorBody {
            message: String,
        }
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .map(|body| body.message);
        ApiError::Server { status, message }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    if err.is_builder() {
        return ApiError::InvalidUrl(err.to_string());
    }
    ApiError::Network(err.to_string())
}
