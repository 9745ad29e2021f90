//! Flow failure modeling shared by the controllers.

use client_core::ClientError;
use shared::error::ApiErrorKind;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// Caught locally, before any remote call.
    Validation,
    /// Typed domain conflict reported by the server.
    Conflict,
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowContext {
    RegisterRequest,
    ApproveRequest,
    RejectRequest,
    LoadUsers,
    LoadRequests,
    LoadFiles,
    LoadFileVersions,
    TranslateFile,
    OpenFile,
    PrintFile,
}

impl FlowContext {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RegisterRequest => "register_request",
            Self::ApproveRequest => "approve_request",
            Self::RejectRequest => "reject_request",
            Self::LoadUsers => "load_users",
            Self::LoadRequests => "load_requests",
            Self::LoadFiles => "load_files",
            Self::LoadFileVersions => "load_file_versions",
            Self::TranslateFile => "translate_file",
            Self::OpenFile => "open_file",
            Self::PrintFile => "print_file",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{} failed: {message}", .context.as_str())]
pub struct FlowError {
    category: FailureCategory,
    context: FlowContext,
    kind: ApiErrorKind,
    message: String,
}

impl FlowError {
    pub fn validation(context: FlowContext, message: impl Into<String>) -> Self {
        Self {
            category: FailureCategory::Validation,
            context,
            kind: ApiErrorKind::Unclassified,
            message: message.into(),
        }
    }

    pub fn from_client(context: FlowContext, err: &ClientError) -> Self {
        let kind = err.kind();
        let category = match kind {
            ApiErrorKind::AlreadyExistingUsername | ApiErrorKind::AlreadyExistingEmail => {
                FailureCategory::Conflict
            }
            _ => FailureCategory::Generic,
        };
        Self {
            category,
            context,
            kind,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: FlowContext, message: impl Into<String>) -> Self {
        Self {
            category: FailureCategory::Generic,
            context,
            kind: ApiErrorKind::Unclassified,
            message: message.into(),
        }
    }

    pub fn category(&self) -> FailureCategory {
        self.category
    }

    pub fn context(&self) -> FlowContext {
        self.context
    }

    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
