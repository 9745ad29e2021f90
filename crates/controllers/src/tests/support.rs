//! In-memory doubles for every controller port.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use client_core::{ClientError, ClientResult, DocsApi, FileDataVariant};
use shared::{
    domain::{
        DocumentId, FileId, FileReference, RegistrationRequest, RequestId, UserId, UserSort,
        UserSummary,
    },
    error::ErrorPayload,
};
use url::Url;

use crate::{
    dialog::{Dialog, DialogResult, DialogService},
    navigation::{NavigationTarget, Navigator},
    view::{Browser, BrowserError, BrowsingContext, ModalHandle, ViewHandle},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    SubmitRegisterRequest {
        username: String,
        email: String,
    },
    ListRegisterRequests,
    ApproveRegisterRequest {
        request_id: RequestId,
        password: String,
        storage_quota_bytes: u64,
    },
    RejectRegisterRequest {
        request_id: RequestId,
    },
    ListUsers {
        sort: UserSort,
    },
    ListFiles {
        document_id: DocumentId,
    },
    ListFileVersions {
        file_id: FileId,
    },
    TranslateFile {
        file_id: FileId,
    },
}

pub const SUBMIT: &str = "submit";
pub const LIST_REQUESTS: &str = "list_requests";
pub const APPROVE: &str = "approve";
pub const REJECT: &str = "reject";
pub const LIST_USERS: &str = "list_users";
pub const LIST_FILES: &str = "list_files";
pub const LIST_VERSIONS: &str = "list_versions";
pub const TRANSLATE: &str = "translate";

pub struct FakeDocsApi {
    calls: Mutex<Vec<ApiCall>>,
    failures: Mutex<HashMap<&'static str, ErrorPayload>>,
    pub users: Mutex<Vec<UserSummary>>,
    pub requests: Mutex<Vec<RegistrationRequest>>,
    pub files: Mutex<Vec<FileReference>>,
    pub versions: Mutex<Vec<FileReference>>,
    pub translated_url: Url,
}

impl Default for FakeDocsApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            users: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            files: Mutex::new(Vec::new()),
            versions: Mutex::new(Vec::new()),
            translated_url: Url::parse("http://docs.test/translated/out.pdf").expect("url"),
        }
    }
}

impl FakeDocsApi {
    pub fn fail(&self, op: &'static str, payload: ErrorPayload) {
        self.failures.lock().expect("lock").insert(op, payload);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().expect("lock").push(call);
    }

    fn outcome(&self, op: &'static str) -> ClientResult<()> {
        match self.failures.lock().expect("lock").get(op) {
            Some(payload) => Err(ClientError::Api {
                path: op.to_string(),
                status: 400,
                payload: payload.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocsApi for FakeDocsApi {
    async fn submit_register_request(&self, username: &str, email: &str) -> ClientResult<()> {
        self.record(ApiCall::SubmitRegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
        });
        self.outcome(SUBMIT)
    }

    async fn list_register_requests(&self) -> ClientResult<Vec<RegistrationRequest>> {
        self.record(ApiCall::ListRegisterRequests);
        self.outcome(LIST_REQUESTS)?;
        Ok(self.requests.lock().expect("lock").clone())
    }

    async fn approve_register_request(
        &self,
        request_id: &RequestId,
        password: &str,
        storage_quota_bytes: u64,
    ) -> ClientResult<()> {
        self.record(ApiCall::ApproveRegisterRequest {
            request_id: request_id.clone(),
            password: password.to_string(),
            storage_quota_bytes,
        });
        self.outcome(APPROVE)
    }

    async fn reject_register_request(&self, request_id: &RequestId) -> ClientResult<()> {
        self.record(ApiCall::RejectRegisterRequest {
            request_id: request_id.clone(),
        });
        self.outcome(REJECT)
    }

    async fn list_users(&self, sort: UserSort) -> ClientResult<Vec<UserSummary>> {
        self.record(ApiCall::ListUsers { sort });
        self.outcome(LIST_USERS)?;
        Ok(self.users.lock().expect("lock").clone())
    }

    async fn list_files(&self, document_id: &DocumentId) -> ClientResult<Vec<FileReference>> {
        self.record(ApiCall::ListFiles {
            document_id: document_id.clone(),
        });
        self.outcome(LIST_FILES)?;
        Ok(self.files.lock().expect("lock").clone())
    }

    async fn list_file_versions(&self, file_id: &FileId) -> ClientResult<Vec<FileReference>> {
        self.record(ApiCall::ListFileVersions {
            file_id: file_id.clone(),
        });
        self.outcome(LIST_VERSIONS)?;
        Ok(self.versions.lock().expect("lock").clone())
    }

    async fn translate_file(&self, file_id: &FileId) -> ClientResult<Url> {
        self.record(ApiCall::TranslateFile {
            file_id: file_id.clone(),
        });
        self.outcome(TRANSLATE)?;
        Ok(self.translated_url.clone())
    }

    fn file_data_url(&self, file_id: &FileId, variant: FileDataVariant) -> ClientResult<Url> {
        let mut url =
            Url::parse(&format!("http://docs.test/api/file/{file_id}/data")).expect("url");
        if variant == FileDataVariant::Content {
            url.query_pairs_mut().append_pair("size", "content");
        }
        Ok(url)
    }
}

/// Answers dialogs from a queue; an empty queue presses "ok".
#[derive(Default)]
pub struct FakeDialogs {
    answers: Mutex<VecDeque<Option<DialogResult>>>,
    shown: Mutex<Vec<Dialog>>,
}

impl FakeDialogs {
    pub fn answer(&self, result: Option<DialogResult>) {
        self.answers.lock().expect("lock").push_back(result);
    }

    pub fn shown(&self) -> Vec<Dialog> {
        self.shown.lock().expect("lock").clone()
    }
}

#[async_trait]
impl DialogService for FakeDialogs {
    async fn show(&self, dialog: Dialog) -> Option<DialogResult> {
        self.shown.lock().expect("lock").push(dialog);
        self.answers
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Some(DialogResult::Ok))
    }
}

#[derive(Default)]
pub struct FakeView {
    closes: AtomicUsize,
}

impl FakeView {
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl ViewHandle for FakeView {
    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalExit {
    Closed,
    Dismissed,
}

#[derive(Default)]
pub struct FakeModal {
    exits: Mutex<Vec<ModalExit>>,
}

impl FakeModal {
    pub fn exits(&self) -> Vec<ModalExit> {
        self.exits.lock().expect("lock").clone()
    }
}

impl ModalHandle for FakeModal {
    fn close(&self) {
        self.exits.lock().expect("lock").push(ModalExit::Closed);
    }

    fn dismiss(&self) {
        self.exits.lock().expect("lock").push(ModalExit::Dismissed);
    }

    fn is_closed(&self) -> bool {
        !self.exits.lock().expect("lock").is_empty()
    }
}

pub struct FakeNavigator {
    current: String,
    visits: Mutex<Vec<NavigationTarget>>,
}

impl FakeNavigator {
    pub fn at(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            visits: Mutex::new(Vec::new()),
        }
    }

    pub fn visits(&self) -> Vec<NavigationTarget> {
        self.visits.lock().expect("lock").clone()
    }
}

impl Navigator for FakeNavigator {
    fn go(&self, target: NavigationTarget) {
        self.visits.lock().expect("lock").push(target);
    }

    fn current_state(&self) -> String {
        self.current.clone()
    }
}

/// Records opened URLs and the lifecycle of every opened context.
#[derive(Default)]
pub struct FakeBrowser {
    pub opened: Mutex<Vec<Url>>,
    pub lifecycle: Arc<Mutex<Vec<&'static str>>>,
    pub fail_load: bool,
}

struct FakeContext {
    lifecycle: Arc<Mutex<Vec<&'static str>>>,
    fail_load: bool,
}

#[async_trait]
impl BrowsingContext for FakeContext {
    async fn loaded(&mut self) -> Result<(), BrowserError> {
        self.lifecycle.lock().expect("lock").push("loaded");
        if self.fail_load {
            return Err(BrowserError::Load("blocked".into()));
        }
        Ok(())
    }

    fn print(&mut self) -> Result<(), BrowserError> {
        self.lifecycle.lock().expect("lock").push("print");
        Ok(())
    }

    fn close(self: Box<Self>) {
        self.lifecycle.lock().expect("lock").push("close");
    }
}

impl Browser for FakeBrowser {
    fn open(&self, url: &Url) -> Result<Box<dyn BrowsingContext>, BrowserError> {
        self.opened.lock().expect("lock").push(url.clone());
        Ok(Box::new(FakeContext {
            lifecycle: Arc::clone(&self.lifecycle),
            fail_load: self.fail_load,
        }))
    }
}

pub fn registration_request(id: &str, username: &str) -> RegistrationRequest {
    RegistrationRequest {
        id: RequestId::new(id),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        create_date: None,
    }
}

pub fn user(username: &str) -> UserSummary {
    UserSummary {
        id: UserId::new(format!("u-{username}")),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        storage_quota: 0,
        storage_current: 0,
        create_date: None,
        disabled: false,
    }
}

pub fn file(id: &str, mimetype: &str) -> FileReference {
    FileReference {
        id: FileId::new(id),
        mimetype: mimetype.to_string(),
        name: None,
        size: None,
        version: None,
        processing: false,
    }
}

pub fn typed_error(error_type: &str) -> ErrorPayload {
    ErrorPayload::new(error_type, "server said no")
}
