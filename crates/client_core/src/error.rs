use shared::error::{ApiErrorKind, ErrorPayload};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {path} failed with status {status}: {}", payload.error_type.as_deref().unwrap_or("untyped error"))]
    Api {
        path: String,
        status: u16,
        payload: ErrorPayload,
    },
    #[error("transport error on {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid url for {path}: {source}")]
    Url {
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    /// The typed error payload, when the server sent one.
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            Self::Api { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Non-API failures classify as unclassified, which selects generic messages.
    pub fn kind(&self) -> ApiErrorKind {
        self.payload()
            .map(ErrorPayload::kind)
            .unwrap_or(ApiErrorKind::Unclassified)
    }
}
