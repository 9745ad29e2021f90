use serde::{Deserialize, Serialize};

use crate::domain::{FileReference, RegistrationRequest, UserSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequestForm {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveRequestForm {
    pub password: String,
    /// Bytes.
    pub storage_quota: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListQuery {
    pub sort_column: u32,
    pub asc: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListQuery {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequestListResponse {
    #[serde(default)]
    pub requests: Vec<RegistrationRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    #[serde(default)]
    pub users: Vec<UserSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Shared by `file/list` and `file/{id}/versions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<FileReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    #[serde(rename = "translatedUrl")]
    pub translated_url: String,
}
