use std::sync::Arc;

use parcel_core::config::{UPLOAD_MAX_FILE_BYTES, UPLOAD_MAX_TOTAL_BYTES};
use parcel_core::ParcelConfigSnapshot;

use crate::multipart::MultipartConfig;

#[derive(Clone, Default)]
pub struct UploadState {
    pub multipart: Arc<MultipartConfig>,
}

impl UploadState {
    pub fn new(multipart: MultipartConfig) -> Self {
        Self {
            multipart: Arc::new(multipart),
        }
    }

    /// Limits from `upload.max_file_bytes` / `upload.max_total_bytes`,
    /// defaults for whatever is not set.
    pub fn from_config(config: &ParcelConfigSnapshot) -> Self {
        let mut multipart = MultipartConfig::default();
        if let Some(max) = config.get_usize(UPLOAD_MAX_FILE_BYTES) {
            multipart = multipart.max_file_size(max);
        }
        if let Some(max) = config.get_usize(UPLOAD_MAX_TOTAL_BYTES) {
            multipart = multipart.max_total_size(max);
        }
        Self::new(multipart)
    }
}
