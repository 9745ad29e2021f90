//! View-model controllers for registration, file preview and user approval.
//!
//! Each controller owns its view state and talks to the outside world only
//! through the ports defined here: `DocsApi` for remote calls, `DialogService`
//! for outcome dialogs, `Translator` for text, `Navigator` for route changes.

pub mod dialog;
pub mod events;
pub mod file_modal;
pub mod i18n;
pub mod navigation;
pub mod orchestration;
pub mod register_request;
pub mod settings_user;
pub mod view;

pub use dialog::{ButtonStyle, Dialog, DialogButton, DialogResult, DialogService};
pub use events::{FailureCategory, FlowContext, FlowError};
pub use file_modal::{FileModalView, FileOrigin, FileRoute, PreviewState, TranslateOutcome, TrustedUrl};
pub use i18n::{MessageCatalog, Translator};
pub use navigation::{NavigationBus, NavigationEvent, NavigationTarget, Navigator, OnceSubscription};
pub use register_request::{RegisterRequestController, RegistrationForm, SubmitOutcome};
pub use settings_user::{ApproveOutcome, PendingRequest, RejectOutcome, SettingsUserController};
pub use view::{Browser, BrowserError, BrowsingContext, ModalHandle, ViewHandle};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
