use serde::{Deserialize, Serialize};

use crate::wire;

pub const SUCCESS_MESSAGE: &str = "Files uploaded successfully";
pub const FAILURE_MESSAGE: &str = "Upload failed";

/// Metadata of one decoded file part. Content is never echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
}

impl FileSummary {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size,
        }
    }
}

/// Response body of `POST /api/upload`.
///
/// Absent fields are omitted from the JSON rather than sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_files: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    /// `uploadTime` and `source` are echoed untouched; `totalFiles` follows
    /// [`wire::resolve_total_files`].
    pub fn succeeded(
        upload_time: Option<String>,
        source: Option<String>,
        declared_total: Option<&str>,
        files: Vec<FileSummary>,
    ) -> Self {
        let total_files = wire::resolve_total_files(declared_total, files.len());
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            upload_time,
            total_files: Some(total_files),
            files: Some(files),
            source,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: FAILURE_MESSAGE.to_string(),
            upload_time: None,
            total_files: None,
            files: None,
            source: None,
            error: Some(error.into()),
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.as_ref().map_or(0, Vec::len)
    }
}
