//! HTTP client for the document-management REST API.
//!
//! `DocsApi` is the seam the view-model controllers consume; `DocsClient`
//! implements it over `reqwest`, rooted at the API base URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{DocumentId, FileId, FileReference, RegistrationRequest, RequestId, UserSort, UserSummary},
    error::ErrorPayload,
    protocol::{
        ApproveRequestForm, FileListQuery, FileListResponse, RegisterRequestForm,
        RegisterRequestListResponse, TranslateResponse, UserListQuery, UserListResponse,
    },
};
use tracing::{debug, warn};
use url::Url;

pub mod error;

pub use error::ClientError;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDataVariant {
    Original,
    /// `?size=content`: the extracted content rendition.
    Content,
}

#[async_trait]
pub trait DocsApi: Send + Sync {
    async fn submit_register_request(&self, username: &str, email: &str) -> ClientResult<()>;
    async fn list_register_requests(&self) -> ClientResult<Vec<RegistrationRequest>>;
    async fn approve_register_request(
        &self,
        request_id: &RequestId,
        password: &str,
        storage_quota_bytes: u64,
    ) -> ClientResult<()>;
    async fn reject_register_request(&self, request_id: &RequestId) -> ClientResult<()>;
    async fn list_users(&self, sort: UserSort) -> ClientResult<Vec<UserSummary>>;
    async fn list_files(&self, document_id: &DocumentId) -> ClientResult<Vec<FileReference>>;
    async fn list_file_versions(&self, file_id: &FileId) -> ClientResult<Vec<FileReference>>;
    /// Returns the absolute URL of the translated rendition.
    async fn translate_file(&self, file_id: &FileId) -> ClientResult<Url>;
    /// Browser-navigated raw data endpoint; no request is issued.
    fn file_data_url(&self, file_id: &FileId, variant: FileDataVariant) -> ClientResult<Url>;
}

pub struct DocsClient {
    http: Client,
    base_url: Url,
}

impl DocsClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_http_client(base_url, Client::new())
    }

    /// No timeout is applied unless one is given; the transport default stands.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Build)?;
        Self::with_http_client(base_url, http)
    }

    pub fn with_http_client(base_url: &str, http: Client) -> ClientResult<Self> {
        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|source| ClientError::Url {
            path: base_url.to_string(),
            source,
        })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url.join(path).map_err(|source| ClientError::Url {
            path: path.to_string(),
            source,
        })
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> ClientResult<Response> {
        debug!(path, "sending api request");
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Bodies that are not a typed payload still count as a failure, just an untyped one.
        let payload = response.json::<ErrorPayload>().await.unwrap_or_default();
        warn!(
            path,
            status = status.as_u16(),
            error_type = payload.error_type.as_deref().unwrap_or("-"),
            "api request failed"
        );
        Err(ClientError::Api {
            path: path.to_string(),
            status: status.as_u16(),
            payload,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        self.send(path, request)
            .await?
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode {
                path: path.to_string(),
                source,
            })
    }
}

#[async_trait]
impl DocsApi for DocsClient {
    async fn submit_register_request(&self, username: &str, email: &str) -> ClientResult<()> {
        let path = "user/register_request";
        let request = self.http.post(self.endpoint(path)?).form(&RegisterRequestForm {
            username: username.to_string(),
            email: email.to_string(),
        });
        self.send(path, request).await?;
        Ok(())
    }

    async fn list_register_requests(&self) -> ClientResult<Vec<RegistrationRequest>> {
        let path = "user/register_request/list";
        let request = self.http.get(self.endpoint(path)?);
        let body: RegisterRequestListResponse = self.send_json(path, request).await?;
        Ok(body.requests)
    }

    async fn approve_register_request(
        &self,
        request_id: &RequestId,
        password: &str,
        storage_quota_bytes: u64,
    ) -> ClientResult<()> {
        let path = format!("user/register_request/{request_id}/approve");
        let request = self.http.post(self.endpoint(&path)?).form(&ApproveRequestForm {
            password: password.to_string(),
            storage_quota: storage_quota_bytes,
        });
        self.send(&path, request).await?;
        Ok(())
    }

    async fn reject_register_request(&self, request_id: &RequestId) -> ClientResult<()> {
        let path = format!("user/register_request/{request_id}/reject");
        let request = self.http.post(self.endpoint(&path)?);
        self.send(&path, request).await?;
        Ok(())
    }

    async fn list_users(&self, sort: UserSort) -> ClientResult<Vec<UserSummary>> {
        let path = "user/list";
        let request = self.http.get(self.endpoint(path)?).query(&UserListQuery {
            sort_column: sort.column,
            asc: sort.ascending,
        });
        let body: UserListResponse = self.send_json(path, request).await?;
        Ok(body.users)
    }

    async fn list_files(&self, document_id: &DocumentId) -> ClientResult<Vec<FileReference>> {
        let path = "file/list";
        let request = self.http.get(self.endpoint(path)?).query(&FileListQuery {
            id: document_id.to_string(),
        });
        let body: FileListResponse = self.send_json(path, request).await?;
        Ok(body.files)
    }

    async fn list_file_versions(&self, file_id: &FileId) -> ClientResult<Vec<FileReference>> {
        let path = format!("file/{file_id}/versions");
        let request = self.http.get(self.endpoint(&path)?);
        let body: FileListResponse = self.send_json(&path, request).await?;
        Ok(body.files)
    }

    async fn translate_file(&self, file_id: &FileId) -> ClientResult<Url> {
        let path = format!("file/{file_id}/translate");
        let request = self.http.post(self.endpoint(&path)?);
        let body: TranslateResponse = self.send_json(&path, request).await?;
        // Absolute URLs replace the base entirely; relative ones resolve against it.
        self.base_url
            .join(&body.translated_url)
            .map_err(|source| ClientError::Url { path, source })
    }

    fn file_data_url(&self, file_id: &FileId, variant: FileDataVariant) -> ClientResult<Url> {
        let mut url = self.endpoint(&format!("file/{file_id}/data"))?;
        if variant == FileDataVariant::Content {
            url.query_pairs_mut().append_pair("size", "content");
        }
        Ok(url)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
