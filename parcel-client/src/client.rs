use std::time::Duration;

use parcel_core::{Asset, ParcelError, ParcelResult, UploadResult};
use tracing::{info, warn};

use crate::request::{BlobEmbedding, UploadRequest};
use crate::transfer::Transfer;

/// How long a terminal status message stays up before it clears.
pub const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(3);

pub const BLOB_LABEL: &str = "Blob";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Succeeded,
    Failed,
}

/// Terminal result of one upload call, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub status: UploadStatus,
    pub message: String,
    /// The decoded response on success.
    pub result: Option<UploadResult>,
}

impl UploadOutcome {
    fn succeeded(message: String, result: UploadResult) -> Self {
        Self {
            status: UploadStatus::Succeeded,
            message,
            result: Some(result),
        }
    }

    fn failed(label: &str, error: &ParcelError) -> Self {
        Self {
            status: UploadStatus::Failed,
            message: format!("{label} upload failed: {error}"),
            result: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == UploadStatus::Succeeded
    }

    pub fn clear_after(&self) -> Duration {
        STATUS_CLEAR_DELAY
    }
}

/// In-progress message for an upload under `label`.
pub fn uploading_message(label: &str) -> String {
    if label == BLOB_LABEL {
        "Uploading blob...".to_string()
    } else {
        format!("Uploading with {label}...")
    }
}

/// Encodes uploads and pushes them through a [`Transfer`].
///
/// Every public operation returns an [`UploadOutcome`]; nothing fails past
/// this boundary.
pub struct UploadClient<T> {
    transport: T,
    label: String,
}

impl<T: Transfer> UploadClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            label: "parcel".to_string(),
        }
    }

    /// Name used in outcome messages, e.g. `"expo/fetch upload failed: ..."`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn upload_images(&self, assets: &[Asset]) -> UploadOutcome {
        let count = assets.len();
        let sent = match UploadRequest::images(assets).await {
            Ok(request) => self.send(request).await,
            Err(e) => Err(e),
        };

        match sent {
            Ok(result) => {
                info!(label = %self.label, count, "upload succeeded");
                let message = format!("{} upload successful! {count} images uploaded", self.label);
                UploadOutcome::succeeded(message, result)
            }
            Err(e) => {
                warn!(label = %self.label, error = %e, "upload failed");
                UploadOutcome::failed(&self.label, &e)
            }
        }
    }

    pub async fn upload_generated_blob(&self, embedding: BlobEmbedding) -> UploadOutcome {
        match self.send(UploadRequest::generated_blob(embedding)).await {
            Ok(result) => {
                info!(?embedding, "blob upload succeeded");
                UploadOutcome::succeeded(format!("{BLOB_LABEL} upload successful!"), result)
            }
            Err(e) => {
                warn!(?embedding, error = %e, "blob upload failed");
                UploadOutcome::failed(BLOB_LABEL, &e)
            }
        }
    }

    /// One transfer, then the status check and response parse.
    pub async fn send(&self, request: UploadRequest) -> ParcelResult<UploadResult> {
        let response = self.transport.transfer(request).await?;
        if !response.is_success() {
            return Err(ParcelError::http_status(response.status));
        }
        Ok(serde_json::from_slice(&response.body)?)
    }
}
