//! Registration request submission.

use std::sync::Arc;

use client_core::DocsApi;
use shared::error::ApiErrorKind;
use tracing::{info, warn};

use crate::{
    dialog::DialogService,
    events::{FlowContext, FlowError},
    i18n::{keys, Translator},
    orchestration,
    view::ViewHandle,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// `view_closed` is false when the success dialog was dismissed without a button.
    Submitted { view_closed: bool },
    Failed(FlowError),
}

pub struct RegisterRequestController {
    api: Arc<dyn DocsApi>,
    dialogs: Arc<dyn DialogService>,
    translator: Arc<dyn Translator>,
    view: Arc<dyn ViewHandle>,
    pub request: RegistrationForm,
}

impl RegisterRequestController {
    pub fn new(
        api: Arc<dyn DocsApi>,
        dialogs: Arc<dyn DialogService>,
        translator: Arc<dyn Translator>,
        view: Arc<dyn ViewHandle>,
    ) -> Self {
        Self {
            api,
            dialogs,
            translator,
            view,
            request: RegistrationForm::default(),
        }
    }

    /// Sends the form once. The form is left untouched so a failed
    /// submission can be corrected and resubmitted.
    pub async fn submit(&self) -> SubmitOutcome {
        let context = FlowContext::RegisterRequest;
        let result = self
            .api
            .submit_register_request(&self.request.username, &self.request.email)
            .await;

        match result {
            Ok(()) => {
                info!(username = %self.request.username, "registration request submitted");
                let pressed = orchestration::notify(
                    self.dialogs.as_ref(),
                    self.translator.as_ref(),
                    context,
                    keys::REGISTER_SUCCESS_TITLE,
                    keys::REGISTER_SUCCESS_MESSAGE,
                )
                .await;
                let view_closed = pressed.is_some();
                if view_closed {
                    self.view.close();
                }
                SubmitOutcome::Submitted { view_closed }
            }
            Err(err) => {
                let failure = FlowError::from_client(context, &err);
                warn!(error = %failure, "registration request rejected");
                orchestration::notify(
                    self.dialogs.as_ref(),
                    self.translator.as_ref(),
                    context,
                    keys::REGISTER_ERROR_TITLE,
                    register_error_message_key(failure.kind()),
                )
                .await;
                SubmitOutcome::Failed(failure)
            }
        }
    }

    /// Closes the view and drops whatever was entered.
    pub fn cancel(self) {
        self.view.close();
    }
}

pub fn register_error_message_key(kind: &ApiErrorKind) -> &'static str {
    match kind {
        ApiErrorKind::AlreadyExistingUsername => keys::REGISTER_ERROR_USERNAME_EXISTS,
        ApiErrorKind::AlreadyExistingEmail => keys::REGISTER_ERROR_EMAIL_EXISTS,
        _ => keys::REGISTER_ERROR_MESSAGE,
    }
}

#[cfg(test)]
#[path = "tests/register_request_tests.rs"]
mod tests;
