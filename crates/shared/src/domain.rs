use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(RequestId);
id_newtype!(UserId);
id_newtype!(DocumentId);
id_newtype!(FileId);

/// Quotas are entered in decimal megabytes and stored in bytes.
pub const BYTES_PER_MEGABYTE: u64 = 1_000_000;

/// Mimetype the preview renders as a download rather than inline.
pub const DOWNLOADABLE_MIMETYPE: &str = "application/pdf";

pub fn megabytes_to_bytes(megabytes: u64) -> Option<u64> {
    megabytes.checked_mul(BYTES_PER_MEGABYTE)
}

/// A pending account creation record awaiting administrator action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub id: RequestId,
    pub username: String,
    pub email: String,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_date: Option<DateTime<Utc>>,
}

/// One entry of a document's file list. Server order is navigation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
    pub id: FileId,
    pub mimetype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default)]
    pub processing: bool,
}

impl FileReference {
    pub fn is_downloadable_only(&self) -> bool {
        self.mimetype == DOWNLOADABLE_MIMETYPE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub storage_quota: u64,
    #[serde(default)]
    pub storage_current: u64,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub disabled: bool,
}

/// Column/direction pair passed to `user/list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSort {
    pub column: u32,
    pub ascending: bool,
}

impl Default for UserSort {
    fn default() -> Self {
        Self {
            column: 1,
            ascending: true,
        }
    }
}
