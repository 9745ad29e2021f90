use serde::{Deserialize, Serialize};

/// Body of a failed API response: `{"type": "...", "message": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorPayload {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: Some(error_type.into()),
            message: Some(message.into()),
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        ApiErrorKind::from_type(self.error_type.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    AlreadyExistingUsername,
    AlreadyExistingEmail,
    RequestNotFound,
    Validation,
    Forbidden,
    Other(String),
    /// No payload, or a payload without a `type`.
    Unclassified,
}

impl ApiErrorKind {
    pub fn from_type(error_type: Option<&str>) -> Self {
        match error_type {
            Some("AlreadyExistingUsername") => Self::AlreadyExistingUsername,
            Some("AlreadyExistingEmail") => Self::AlreadyExistingEmail,
            Some("RequestNotFound") => Self::RequestNotFound,
            Some("ValidationError") => Self::Validation,
            Some("ForbiddenError") => Self::Forbidden,
            Some(other) if !other.is_empty() => Self::Other(other.to_string()),
            _ => Self::Unclassified,
        }
    }
}
