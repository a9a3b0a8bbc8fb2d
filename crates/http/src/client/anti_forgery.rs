//! Anti-forgery (CSRF) token contract

use super::error::{ApiError, ErrorPayload};
use reqwest::header::HeaderName;
use serde::Deserialize;
use steamlite_core::AntiForgeryConfig;

/// How the backend hands out and rejects anti-forgery tokens
#[derive(Debug, Clone)]
pub struct AntiForgeryPolicy {
    header: HeaderName,
    endpoint: String,
    error_code: String,
    message_marker: String,
}

impl AntiForgeryPolicy {
    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// A 403 payload means "token rejected" when its `code` matches, or,
    /// for backends without codes, when the message carries the marker.
    pub(crate) fn is_rejection(&self, payload: &ErrorPayload) -> bool {
        if payload.code.as_deref() == Some(self.error_code.as_str()) {
            return true;
        }

        if self.message_marker.is_empty() {
            return false;
        }

        [&payload.error, &payload.message]
            .into_iter()
            .flatten()
            .any(|text| text.contains(&self.message_marker))
    }
}

impl TryFrom<&AntiForgeryConfig> for AntiForgeryPolicy {
    type Error = ApiError;

    fn try_from(config: &AntiForgeryConfig) -> Result<Self, Self::Error> {
        let header = HeaderName::from_bytes(config.header.as_bytes()).map_err(|err| {
            ApiError::Configuration(format!(
                "invalid anti-forgery header '{}': {err}",
                config.header
            ))
        })?;

        if !config.endpoint.starts_with('/') {
            return Err(ApiError::Configuration(format!(
                "anti-forgery endpoint must start with '/': {}",
                config.endpoint
            )));
        }

        Ok(Self {
            header,
            endpoint: config.endpoint.clone(),
            error_code: config.error_code.clone(),
            message_marker: config.message_marker.clone(),
        })
    }
}

/// Body of the token endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct AntiForgeryTokenResponse {
    #[serde(alias = "csrfToken")]
    pub csrf_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_header_name() {
        let config = AntiForgeryConfig {
            header: "bad header".to_string(),
            ..AntiForgeryConfig::default()
        };
        assert!(matches!(
            AntiForgeryPolicy::try_from(&config),
            Err(ApiError::Configuration(_))
        ));
    }

    #[test]
    fn test_custom_code_and_marker() {
        let config = AntiForgeryConfig {
            error_code: "EBADCSRFTOKEN".to_string(),
            message_marker: "forgery".to_string(),
            ..AntiForgeryConfig::default()
        };
        let policy = AntiForgeryPolicy::try_from(&config).expect("policy");

        let coded = ErrorPayload {
            code: Some("EBADCSRFTOKEN".to_string()),
            ..ErrorPayload::default()
        };
        let marked = ErrorPayload {
            message: Some("forgery suspected".to_string()),
            ..ErrorPayload::default()
        };
        let default_marker = ErrorPayload {
            error: Some("Invalid CSRF token".to_string()),
            ..ErrorPayload::default()
        };

        assert!(policy.is_rejection(&coded));
        assert!(policy.is_rejection(&marked));
        assert!(!policy.is_rejection(&default_marker));
    }

    #[test]
    fn test_token_response_accepts_both_spellings() {
        let snake: AntiForgeryTokenResponse =
            serde_json::from_str(r#"{"csrf_token":"abc"}"#).expect("snake");
        let camel: AntiForgeryTokenResponse =
            serde_json::from_str(r#"{"csrfToken":"xyz"}"#).expect("camel");
        assert_eq!(snake.csrf_token, "abc");
        assert_eq!(camel.csrf_token, "xyz");
    }
}
