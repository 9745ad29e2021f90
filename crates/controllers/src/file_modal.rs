//! File preview modal: locate the routed file, preview it, translate it,
//! and step through its siblings.

use std::sync::Arc;

use client_core::{DocsApi, FileDataVariant};
use shared::domain::{DocumentId, FileId, FileReference, DOWNLOADABLE_MIMETYPE};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    dialog::DialogService,
    events::{FlowContext, FlowError},
    i18n::{keys, Translator},
    navigation::{NavigationBus, NavigationEvent, NavigationTarget, Navigator},
    orchestration,
    view::{Browser, BrowserError, ModalHandle},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRoute {
    pub document_id: DocumentId,
    pub file_id: FileId,
}

/// Which list the routed file was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOrigin {
    Primary,
    Versions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    Loading,
    /// Found in neither list; the preview stays empty.
    Missing,
    Loaded { origin: FileOrigin },
    Translating { origin: FileOrigin },
    Translated { origin: FileOrigin },
}

/// A URL the preview frame may embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedUrl(Url);

impl TrustedUrl {
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Clone)]
pub enum TranslateOutcome {
    /// Not in a translatable state (nothing loaded, in flight, or done).
    Ignored,
    Translated,
    Failed(FlowError),
}

pub struct FileModalView {
    api: Arc<dyn DocsApi>,
    dialogs: Arc<dyn DialogService>,
    translator: Arc<dyn Translator>,
    navigator: Arc<dyn Navigator>,
    modal: Arc<dyn ModalHandle>,
    browser: Arc<dyn Browser>,
    route: FileRoute,
    files: Vec<FileReference>,
    file: Option<FileReference>,
    trusted_url: Option<TrustedUrl>,
    state: PreviewState,
}

impl FileModalView {
    pub fn new(
        route: FileRoute,
        api: Arc<dyn DocsApi>,
        dialogs: Arc<dyn DialogService>,
        translator: Arc<dyn Translator>,
        navigator: Arc<dyn Navigator>,
        modal: Arc<dyn ModalHandle>,
        browser: Arc<dyn Browser>,
    ) -> Self {
        Self {
            api,
            dialogs,
            translator,
            navigator,
            modal,
            browser,
            route,
            files: Vec::new(),
            file: None,
            trusted_url: None,
            state: PreviewState::Loading,
        }
    }

    pub fn route(&self) -> &FileRoute {
        &self.route
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn files(&self) -> &[FileReference] {
        &self.files
    }

    pub fn file(&self) -> Option<&FileReference> {
        self.file.as_ref()
    }

    pub fn trusted_url(&self) -> Option<&TrustedUrl> {
        self.trusted_url.as_ref()
    }

    pub fn is_translating(&self) -> bool {
        matches!(self.state, PreviewState::Translating { .. })
    }

    pub fn is_translated(&self) -> bool {
        matches!(self.state, PreviewState::Translated { .. })
    }

    /// Mimetype the view renders; a translation always displays as PDF.
    pub fn displayed_mimetype(&self) -> Option<&str> {
        let file = self.file.as_ref()?;
        if self.is_translated() {
            Some(DOWNLOADABLE_MIMETYPE)
        } else {
            Some(file.mimetype.as_str())
        }
    }

    pub fn can_display_preview(&self) -> bool {
        self.displayed_mimetype()
            .is_some_and(|mimetype| mimetype != DOWNLOADABLE_MIMETYPE)
    }

    /// Loads the document's file list and selects the routed file, falling
    /// back to the file's version history when it is not in the list.
    pub async fn load(&mut self) {
        self.state = PreviewState::Loading;
        self.file = None;
        self.trusted_url = None;
        self.files.clear();

        match self.api.list_files(&self.route.document_id).await {
            Ok(files) => self.files = files,
            Err(err) => {
                let failure = FlowError::from_client(FlowContext::LoadFiles, &err);
                warn!(error = %failure, document_id = %self.route.document_id, "file list unavailable");
                self.state = PreviewState::Missing;
                return;
            }
        }
        if let Some(found) = self.find_routed(&self.files) {
            self.select(found, FileOrigin::Primary);
            return;
        }

        match self.api.list_file_versions(&self.route.file_id).await {
            Ok(versions) => {
                if let Some(found) = self.find_routed(&versions) {
                    self.select(found, FileOrigin::Versions);
                    return;
                }
            }
            Err(err) => {
                let failure = FlowError::from_client(FlowContext::LoadFileVersions, &err);
                warn!(error = %failure, file_id = %self.route.file_id, "file versions unavailable");
            }
        }

        debug!(file_id = %self.route.file_id, "file not found in list or versions");
        self.state = PreviewState::Missing;
    }

    fn find_routed(&self, candidates: &[FileReference]) -> Option<FileReference> {
        candidates
            .iter()
            .find(|f| f.id == self.route.file_id)
            .cloned()
    }

    fn select(&mut self, file: FileReference, origin: FileOrigin) {
        self.file = Some(file);
        self.trusted_url = self.raw_data_url();
        self.state = PreviewState::Loaded { origin };
    }

    fn raw_data_url(&self) -> Option<TrustedUrl> {
        match self
            .api
            .file_data_url(&self.route.file_id, FileDataVariant::Original)
        {
            Ok(url) => Some(TrustedUrl(url)),
            Err(err) => {
                warn!(error = %err, "cannot build file data url");
                None
            }
        }
    }

    pub async fn translate_file(&mut self) -> TranslateOutcome {
        let PreviewState::Loaded { origin } = self.state else {
            debug!(state = ?self.state, "translate ignored");
            return TranslateOutcome::Ignored;
        };
        let context = FlowContext::TranslateFile;
        self.state = PreviewState::Translating { origin };

        match self.api.translate_file(&self.route.file_id).await {
            Ok(url) => {
                self.state = PreviewState::Translated { origin };
                self.trusted_url = Some(TrustedUrl(url));
                info!(file_id = %self.route.file_id, "file translated");
                orchestration::notify(
                    self.dialogs.as_ref(),
                    self.translator.as_ref(),
                    context,
                    keys::TRANSLATE_SUCCESS_TITLE,
                    keys::TRANSLATE_SUCCESS_MESSAGE,
                )
                .await;
                TranslateOutcome::Translated
            }
            Err(err) => {
                self.state = PreviewState::Loaded { origin };
                let failure = FlowError::from_client(context, &err);
                warn!(error = %failure, "file translation failed");
                orchestration::notify(
                    self.dialogs.as_ref(),
                    self.translator.as_ref(),
                    context,
                    keys::TRANSLATE_ERROR_TITLE,
                    keys::TRANSLATE_ERROR_MESSAGE,
                )
                .await;
                TranslateOutcome::Failed(failure)
            }
        }
    }

    /// Undoes a translation view after any completed navigation. A move to
    /// another file re-selects it from the loaded list.
    pub fn on_state_change_success(&mut self, current: &NavigationTarget) {
        if let NavigationTarget::File {
            document_id,
            file_id,
        } = current
        {
            if *file_id != self.route.file_id || *document_id != self.route.document_id {
                self.route = FileRoute {
                    document_id: document_id.clone(),
                    file_id: file_id.clone(),
                };
                match self.find_routed(&self.files) {
                    Some(found) => self.select(found, FileOrigin::Primary),
                    None => {
                        debug!(file_id = %self.route.file_id, "routed file not in loaded list");
                        self.file = None;
                        self.trusted_url = None;
                        self.state = PreviewState::Missing;
                    }
                }
                return;
            }
        }
        if let PreviewState::Translated { origin } = self.state {
            self.state = PreviewState::Loaded { origin };
        }
        if self.file.is_some() {
            self.trusted_url = self.raw_data_url();
        }
    }

    fn current_position(&self) -> Option<usize> {
        self.files.iter().position(|f| f.id == self.route.file_id)
    }

    pub fn next_file(&self) -> Option<&FileReference> {
        self.files.get(self.current_position()? + 1)
    }

    pub fn previous_file(&self) -> Option<&FileReference> {
        let position = self.current_position()?.checked_sub(1)?;
        self.files.get(position)
    }

    /// Returns whether a navigation was requested.
    pub fn go_next_file(&self) -> bool {
        let target = self.next_file().map(|f| f.id.clone());
        self.go_sibling(target)
    }

    pub fn go_previous_file(&self) -> bool {
        let target = self.previous_file().map(|f| f.id.clone());
        self.go_sibling(target)
    }

    fn go_sibling(&self, file_id: Option<FileId>) -> bool {
        let Some(file_id) = file_id else {
            return false;
        };
        self.navigator.go(NavigationTarget::File {
            document_id: self.route.document_id.clone(),
            file_id,
        });
        true
    }

    pub fn open_file(&self) -> Result<(), FlowError> {
        self.open_variant(FileDataVariant::Original)
    }

    pub fn open_file_content(&self) -> Result<(), FlowError> {
        self.open_variant(FileDataVariant::Content)
    }

    fn open_variant(&self, variant: FileDataVariant) -> Result<(), FlowError> {
        let context = FlowContext::OpenFile;
        let url = self
            .api
            .file_data_url(&self.route.file_id, variant)
            .map_err(|err| FlowError::from_client(context, &err))?;
        self.browser
            .open(&url)
            .map_err(|err| browser_failure(context, err))?;
        Ok(())
    }

    /// Opens the raw data, prints it once loaded, then closes the context.
    pub async fn print_file(&self) -> Result<(), FlowError> {
        let context = FlowContext::PrintFile;
        let url = self
            .api
            .file_data_url(&self.route.file_id, FileDataVariant::Original)
            .map_err(|err| FlowError::from_client(context, &err))?;
        let mut popup = self
            .browser
            .open(&url)
            .map_err(|err| browser_failure(context, err))?;
        let printed = match popup.loaded().await {
            Ok(()) => popup.print(),
            Err(err) => Err(err),
        };
        popup.close();
        printed.map_err(|err| browser_failure(context, err))
    }

    pub fn close_file(&self) {
        self.modal.dismiss();
    }

    /// Closes the modal on the next transition start, then drops the subscription.
    pub fn watch_transitions(&self, bus: &NavigationBus) -> JoinHandle<()> {
        let subscription = bus.subscribe_once(NavigationEvent::is_transition_start);
        let modal = Arc::clone(&self.modal);
        let navigator = Arc::clone(&self.navigator);
        tokio::spawn(async move {
            if let Some(NavigationEvent::TransitionStart { to }) = subscription.recv().await {
                close_for_transition(modal.as_ref(), navigator.as_ref(), &to);
            }
        })
    }
}

/// Moving to another file of the same page confirms the modal; leaving the
/// page dismisses it.
pub fn close_for_transition(modal: &dyn ModalHandle, navigator: &dyn Navigator, to: &NavigationTarget) {
    if modal.is_closed() {
        return;
    }
    if to.state_name() == navigator.current_state() {
        modal.close();
    } else {
        modal.dismiss();
    }
}

fn browser_failure(context: FlowContext, err: BrowserError) -> FlowError {
    warn!(flow = context.as_str(), error = %err, "browser action failed");
    FlowError::from_message(context, err.to_string())
}

#[cfg(test)]
#[path = "tests/file_modal_tests.rs"]
mod tests;
