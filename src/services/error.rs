use thiserror::Error;

/// Non-success HTTP answer from an upstream service.
#[derive(Debug, Error)]
#[error("{provider} API error ({status}): {body}")]
pub struct ApiError {
    pub provider: &'static str,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    RateLimited,
    Unauthorized,
    Forbidden,
    Server,
    Client,
}

impl ApiError {
    pub async fn from_response(provider: &'static str, resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Self { provider, status, body }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self.status {
            429 => ApiErrorKind::RateLimited,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            s if s >= 500 => ApiErrorKind::Server,
            _ if self.body.to_lowercase().contains("quota") => ApiErrorKind::RateLimited,
            _ => ApiErrorKind::Client,
        }
    }
}

/// Finds the upstream status classification anywhere in the error chain.
pub fn api_error_kind(err: &anyhow::Error) -> Option<ApiErrorKind> {
    err.chain()
        .find_map(|e| e.downcast_ref::<ApiError>())
        .map(ApiError::kind)
}

pub fn is_rate_limited(err: &anyhow::Error) -> bool {
    api_error_kind(err) == Some(ApiErrorKind::RateLimited)
}

/// Failures worth another attempt: upstream 5xx, timeouts and connection
/// problems. Quota, credential and request errors are final.
pub fn is_transient(err: &anyhow::Error) -> bool {
    if let Some(kind) = api_error_kind(err) {
        return kind == ApiErrorKind::Server;
    }
    err.chain()
        .find_map(|e| e.downcast_ref::<reqwest::Error>())
        .is_some_and(|e| e.is_timeout() || e.is_connect())
}

/// Why an audio render failed, worded for the person waiting on it.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("OpenAI API quota exceeded. Please check your plan and billing details at https://platform.openai.com/account/billing")]
    QuotaExceeded,
    #[error("Invalid OpenAI API key. Please check your API key configuration.")]
    InvalidApiKey,
    #[error("Access denied. Please check your OpenAI API permissions.")]
    AccessDenied,
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("Failed to generate audio. Please try again later.")]
    Failed(String),
}

impl SynthesisError {
    pub fn classify(err: &anyhow::Error) -> Self {
        match api_error_kind(err) {
            Some(ApiErrorKind::RateLimited) => SynthesisError::QuotaExceeded,
            Some(ApiErrorKind::Unauthorized) => SynthesisError::InvalidApiKey,
            Some(ApiErrorKind::Forbidden) => SynthesisError::AccessDenied,
            Some(ApiErrorKind::Server | ApiErrorKind::Client) => {
                SynthesisError::Synthesis(format!("{:#}", err))
            }
            None => SynthesisError::Failed(format!("{:#}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn api(status: u16, body: &str) -> anyhow::Error {
        anyhow::Error::new(ApiError {
            provider: "OpenAI",
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(api_error_kind(&api(429, "")), Some(ApiErrorKind::RateLimited));
        assert_eq!(api_error_kind(&api(401, "")), Some(ApiErrorKind::Unauthorized));
        assert_eq!(api_error_kind(&api(403, "")), Some(ApiErrorKind::Forbidden));
        assert_eq!(api_error_kind(&api(503, "")), Some(ApiErrorKind::Server));
        assert_eq!(api_error_kind(&api(400, "bad input")), Some(ApiErrorKind::Client));
        assert_eq!(
            api_error_kind(&api(400, "You exceeded your current Quota")),
            Some(ApiErrorKind::RateLimited)
        );
        assert_eq!(api_error_kind(&anyhow::anyhow!("boom")), None);
    }

    #[test]
    fn test_classification_sees_through_context() {
        let err = Err::<(), _>(api(429, "")).context("chunk 2").unwrap_err();
        assert!(is_rate_limited(&err));
        assert!(matches!(SynthesisError::classify(&err), SynthesisError::QuotaExceeded));
    }

    #[test]
    fn test_synthesis_error_mapping() {
        assert!(matches!(SynthesisError::classify(&api(401, "")), SynthesisError::InvalidApiKey));
        assert!(matches!(SynthesisError::classify(&api(403, "")), SynthesisError::AccessDenied));
        assert!(matches!(SynthesisError::classify(&api(500, "")), SynthesisError::Synthesis(_)));
        let generic = SynthesisError::classify(&anyhow::anyhow!("connection reset"));
        assert_eq!(
            generic.to_string(),
            "Failed to generate audio. Please try again later."
        );
    }

    #[test]
    fn test_transient() {
        assert!(is_transient(&api(502, "")));
        assert!(!is_transient(&api(429, "")));
        assert!(!is_transient(&anyhow::anyhow!("parse failure")));
    }
}
