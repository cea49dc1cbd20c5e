use std::path::PathBuf;

use bytes::Bytes;

use crate::errors::{ParcelError, ParcelResult};
use crate::wire::{self, GENERATED_FILENAME, TEXT_PLAIN};

/// Where an asset's bytes live until the request is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetContent {
    Memory(Bytes),
    /// Read at encode time; a missing or unreadable file is an encode failure.
    File(PathBuf),
}

/// One binary item to upload. Owned by a single upload call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub content: AssetContent,
    pub filename: String,
    pub content_type: String,
}

impl Asset {
    pub fn new(
        content: AssetContent,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            content,
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }

    pub fn from_bytes(
        bytes: impl Into<Bytes>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self::new(AssetContent::Memory(bytes.into()), filename, content_type)
    }

    /// An image picked by URI at position `index` of the selection.
    ///
    /// `file://` URIs and bare paths stay on disk, `data:` URIs are decoded
    /// in memory. The filename is the URI's last segment unless `filename`
    /// is given, and the content type is inferred from it.
    pub fn image_from_uri(uri: &str, filename: Option<&str>, index: usize) -> ParcelResult<Self> {
        let filename = match filename {
            Some(name) if !name.is_empty() => name.to_string(),
            _ if uri.starts_with("data:") => format!("image_{index}.jpg"),
            _ => wire::filename_from_uri(uri, index),
        };
        let content_type = wire::infer_image_content_type(&filename);

        let content = if uri.starts_with("data:") {
            let (_, bytes) = wire::decode_data_uri(uri)
                .map_err(|e| ParcelError::encode(format!("Unable to read {filename}: {e}")))?;
            AssetContent::Memory(Bytes::from(bytes))
        } else {
            let path = uri.strip_prefix("file://").unwrap_or(uri);
            AssetContent::File(PathBuf::from(path))
        };

        Ok(Self::new(content, filename, content_type))
    }

    /// The synthetic text payload uploaded as `generatedFile`.
    pub fn generated_text(text: &str) -> Self {
        Self::from_bytes(
            Bytes::copy_from_slice(text.as_bytes()),
            GENERATED_FILENAME,
            TEXT_PLAIN,
        )
    }

    pub async fn read_bytes(&self) -> ParcelResult<Bytes> {
        match &self.content {
            AssetContent::Memory(bytes) => Ok(bytes.clone()),
            AssetContent::File(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|e| {
                    ParcelError::encode(format!("Unable to read {}: {e}", path.display()))
                }),
        }
    }
}
