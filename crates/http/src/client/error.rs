//! Client error types

use super::anti_forgery::AntiForgeryPolicy;
use super::storage::StorageError;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors surfaced by [`ApiClient`](super::ApiClient)
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: the server never produced a response
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The bearer credential was rejected; local credentials have been cleared
    #[error("Session expired: {message}")]
    AuthExpired { message: String },

    /// The anti-forgery token was rejected, after the single retry
    #[error("Anti-forgery token rejected: {message}")]
    AntiForgeryRejected { message: String },

    /// The server rejected the payload, optionally per field
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    /// Any other non-success response
    #[error("Server error {status}: {message}")]
    UnknownServer { status: u16, message: String },

    /// The operation needs a signed-in user and there is none
    #[error("No user is signed in")]
    NotSignedIn,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Durable credential storage failed
    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ApiError {
    /// HTTP status behind the error, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthExpired { .. } => Some(401),
            Self::AntiForgeryRejected { .. } => Some(403),
            Self::UnknownServer { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownServer { status: 404, .. })
    }

    /// Field-level messages of a validation failure
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Classify a non-success response.
    ///
    /// 401 wins over everything else, so a response that is both an
    /// authentication failure and carries an anti-forgery marker is treated
    /// as an expired session.
    pub(crate) fn from_response(status: StatusCode, body: &[u8], policy: &AntiForgeryPolicy) -> Self {
        let payload = ErrorPayload::parse(body);
        let message = payload.display_message(status, body);

        match status {
            StatusCode::UNAUTHORIZED => Self::AuthExpired { message },
            StatusCode::FORBIDDEN if policy.is_rejection(&payload) => {
                Self::AntiForgeryRejected { message }
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Validation {
                message,
                fields: payload.fields,
            },
            _ => Self::UnknownServer {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// The parts of an error body the client looks at.
///
/// Backends answer with `{error}`, `{message}`, `{code, message}` and either
/// an object or a list for `errors`; anything unparseable yields an empty
/// payload.
#[derive(Debug, Default)]
pub(crate) struct ErrorPayload {
    pub code: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl ErrorPayload {
    pub(crate) fn parse(body: &[u8]) -> Self {
        let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };

        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_owned);

        Self {
            code: text("code"),
            error: text("error"),
            message: text("message"),
            fields: object.get("errors").map(parse_fields).unwrap_or_default(),
        }
    }

    fn display_message(&self, status: StatusCode, body: &[u8]) -> String {
        if let Some(message) = self.error.as_ref().or(self.message.as_ref()) {
            return message.clone();
        }

        let raw = String::from_utf8_lossy(body);
        let raw = raw.trim();
        if !raw.is_empty() && !raw.starts_with('{') {
            return raw.to_string();
        }

        status
            .canonical_reason()
            .map_or_else(|| status.to_string(), str::to_owned)
    }
}

fn parse_fields(errors: &Value) -> BTreeMap<String, String> {
    match errors {
        Value::Object(map) => map
            .iter()
            .filter_map(|(field, messages)| Some((field.clone(), join_messages(messages)?)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let field = item.get("field").or_else(|| item.get("path"))?.as_str()?;
                let message = item.get("message").or_else(|| item.get("msg"))?.as_str()?;
                Some((field.to_string(), message.to_string()))
            })
            .collect(),
        _ => BTreeMap::new(),
    }
}

fn join_messages(messages: &Value) -> Option<String> {
    match messages {
        Value::String(message) => Some(message.clone()),
        Value::Array(list) => {
            let joined = list
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steamlite_core::AntiForgeryConfig;

    fn policy() -> AntiForgeryPolicy {
        AntiForgeryPolicy::try_from(&AntiForgeryConfig::default()).expect("default policy")
    }

    fn classify(status: u16, body: &str) -> ApiError {
        let status = StatusCode::from_u16(status).expect("status");
        ApiError::from_response(status, body.as_bytes(), &policy())
    }

    #[test]
    fn test_unauthorized_wins_over_csrf_marker() {
        let err = classify(401, r#"{"error":"CSRF token missing","code":"csrf_invalid"}"#);
        assert!(err.is_auth_expired());
    }

    #[test]
    fn test_forbidden_with_marker_is_anti_forgery() {
        let err = classify(403, r#"{"error":"Invalid CSRF token"}"#);
        assert!(matches!(err, ApiError::AntiForgeryRejected { message } if message == "Invalid CSRF token"));
    }

    #[test]
    fn test_forbidden_with_code_is_anti_forgery() {
        let err = classify(403, r#"{"code":"csrf_invalid","message":"token expired"}"#);
        assert!(matches!(err, ApiError::AntiForgeryRejected { .. }));
    }

    #[test]
    fn test_forbidden_without_marker_is_unknown() {
        let err = classify(403, r#"{"error":"Admins only"}"#);
        assert_eq!(err.status(), Some(403));
        assert!(matches!(err, ApiError::UnknownServer { .. }));
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let err = classify(403, r#"{"error":"invalid csrf token"}"#);
        assert!(matches!(err, ApiError::UnknownServer { status: 403, .. }));
    }

    #[test]
    fn test_validation_fields_from_object() {
        let err = classify(
            422,
            r#"{"error":"Validation failed","errors":{"name":["too short","reserved"],"price":"must be positive"}}"#,
        );
        let fields = err.field_errors().expect("validation");
        assert_eq!(fields["name"], "too short; reserved");
        assert_eq!(fields["price"], "must be positive");
    }

    #[test]
    fn test_validation_fields_from_list() {
        let err = classify(
            400,
            r#"{"message":"bad input","errors":[{"field":"email","message":"invalid"}]}"#,
        );
        assert!(matches!(&err, ApiError::Validation { message, .. } if message == "bad input"));
        assert_eq!(err.field_errors().expect("validation")["email"], "invalid");
    }

    #[test]
    fn test_plain_text_body_becomes_message() {
        let err = classify(502, "upstream unavailable");
        assert!(matches!(err, ApiError::UnknownServer { status: 502, message } if message == "upstream unavailable"));
    }

    #[test]
    fn test_empty_body_uses_reason_phrase() {
        let err = classify(404, "");
        assert!(err.is_not_found());
        assert!(matches!(err, ApiError::UnknownServer { message, .. } if message == "Not Found"));
    }
}
