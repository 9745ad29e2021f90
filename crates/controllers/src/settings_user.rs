//! User settings page: existing users plus pending registration requests
//! awaiting approval or rejection.

use std::sync::Arc;

use client_core::DocsApi;
use shared::{
    domain::{megabytes_to_bytes, RegistrationRequest, RequestId, UserSort, UserSummary},
    error::ApiErrorKind,
};
use tracing::{info, warn};

use crate::{
    dialog::DialogService,
    events::{FlowContext, FlowError},
    i18n::{keys, Translator},
    navigation::{NavigationTarget, Navigator},
    orchestration,
};

/// A listed request plus the operator-entered fields needed to approve it.
/// `password` and `storage_quota_mb` never come from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub request: RegistrationRequest,
    pub password: String,
    /// Decimal megabytes; `None` when the operator cleared the field.
    pub storage_quota_mb: Option<u64>,
}

impl From<RegistrationRequest> for PendingRequest {
    fn from(request: RegistrationRequest) -> Self {
        Self {
            request,
            password: String::new(),
            storage_quota_mb: Some(0),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ApproveOutcome {
    Approved,
    Failed(FlowError),
}

#[derive(Debug, Clone)]
pub enum RejectOutcome {
    /// Cancelled or dismissed; nothing was sent.
    Cancelled,
    Rejected,
    Failed(FlowError),
}

pub struct SettingsUserController {
    api: Arc<dyn DocsApi>,
    dialogs: Arc<dyn DialogService>,
    translator: Arc<dyn Translator>,
    navigator: Arc<dyn Navigator>,
    sort: UserSort,
    users: Vec<UserSummary>,
    requests: Vec<PendingRequest>,
}

impl SettingsUserController {
    pub fn new(
        api: Arc<dyn DocsApi>,
        dialogs: Arc<dyn DialogService>,
        translator: Arc<dyn Translator>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            dialogs,
            translator,
            navigator,
            sort: UserSort::default(),
            users: Vec::new(),
            requests: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: UserSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn users(&self) -> &[UserSummary] {
        &self.users
    }

    pub fn requests(&self) -> &[PendingRequest] {
        &self.requests
    }

    /// Operator edits to the local-only approval fields go through here.
    pub fn request_mut(&mut self, id: &RequestId) -> Option<&mut PendingRequest> {
        self.requests.iter_mut().find(|r| &r.request.id == id)
    }

    /// Fetches users and pending requests concurrently. Each completed list
    /// replaces its collection wholesale; a failed one leaves it as it was.
    pub async fn load_data(&mut self) {
        let (users, requests) = futures::join!(
            self.api.list_users(self.sort),
            self.api.list_register_requests()
        );

        match users {
            Ok(users) => self.users = users,
            Err(err) => {
                let failure = FlowError::from_client(FlowContext::LoadUsers, &err);
                warn!(error = %failure, "user list unavailable");
            }
        }

        match requests {
            Ok(requests) => {
                self.requests = requests.into_iter().map(PendingRequest::from).collect();
            }
            Err(err) => {
                let failure = FlowError::from_client(FlowContext::LoadRequests, &err);
                warn!(error = %failure, "registration request list unavailable");
            }
        }
    }

    pub fn edit_user(&self, user: &UserSummary) {
        self.navigator.go(NavigationTarget::EditUser {
            username: user.username.clone(),
        });
    }

    pub async fn approve_request(&mut self, pending: &PendingRequest) -> ApproveOutcome {
        let context = FlowContext::ApproveRequest;
        let quota_bytes = match validate_approval(pending) {
            Ok(bytes) => bytes,
            Err(failure) => {
                warn!(error = %failure, request_id = %pending.request.id, "approval not sent");
                self.notify(keys::APPROVE_ERROR_TITLE, keys::APPROVE_ERROR_MESSAGE)
                    .await;
                return ApproveOutcome::Failed(failure);
            }
        };

        let result = self
            .api
            .approve_register_request(&pending.request.id, &pending.password, quota_bytes)
            .await;

        match result {
            Ok(()) => {
                info!(request_id = %pending.request.id, quota_bytes, "registration request approved");
                self.load_data().await;
                self.notify(keys::APPROVE_SUCCESS_TITLE, keys::APPROVE_SUCCESS_MESSAGE)
                    .await;
                ApproveOutcome::Approved
            }
            Err(err) => {
                let failure = FlowError::from_client(context, &err);
                warn!(error = %failure, request_id = %pending.request.id, "approval failed");
                self.notify(keys::APPROVE_ERROR_TITLE, approve_error_message_key(failure.kind()))
                    .await;
                ApproveOutcome::Failed(failure)
            }
        }
    }

    /// Asks for confirmation first; only an explicit "ok" sends the rejection.
    pub async fn reject_request(&mut self, pending: &PendingRequest) -> RejectOutcome {
        let context = FlowContext::RejectRequest;
        let confirmed = orchestration::confirm(
            self.dialogs.as_ref(),
            self.translator.as_ref(),
            context,
            keys::REJECT_CONFIRM_TITLE,
            keys::REJECT_CONFIRM_MESSAGE,
            &[
                ("username", pending.request.username.as_str()),
                ("email", pending.request.email.as_str()),
            ],
        )
        .await;
        if !confirmed {
            return RejectOutcome::Cancelled;
        }

        let result = self.api.reject_register_request(&pending.request.id).await;
        self.load_data().await;

        match result {
            Ok(()) => {
                info!(request_id = %pending.request.id, "registration request rejected");
                RejectOutcome::Rejected
            }
            Err(err) => {
                let failure = FlowError::from_client(context, &err);
                warn!(error = %failure, request_id = %pending.request.id, "rejection failed");
                RejectOutcome::Failed(failure)
            }
        }
    }

    async fn notify(&self, title_key: &str, message_key: &str) {
        orchestration::notify(
            self.dialogs.as_ref(),
            self.translator.as_ref(),
            FlowContext::ApproveRequest,
            title_key,
            message_key,
        )
        .await;
    }
}

/// Password must be non-empty and the quota present; a quota of 0 is valid.
pub fn validate_approval(pending: &PendingRequest) -> Result<u64, FlowError> {
    let context = FlowContext::ApproveRequest;
    if pending.password.is_empty() {
        return Err(FlowError::validation(context, "password is required"));
    }
    let Some(megabytes) = pending.storage_quota_mb else {
        return Err(FlowError::validation(context, "storage quota is required"));
    };
    megabytes_to_bytes(megabytes)
        .ok_or_else(|| FlowError::validation(context, "storage quota is too large"))
}

pub fn approve_error_message_key(kind: &ApiErrorKind) -> &'static str {
    match kind {
        ApiErrorKind::AlreadyExistingUsername => keys::APPROVE_ERROR_USERNAME_EXISTS,
        _ => keys::APPROVE_ERROR_MESSAGE,
    }
}

#[cfg(test)]
#[path = "tests/settings_user_tests.rs"]
mod tests;
