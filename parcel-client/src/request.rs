use bytes::Bytes;
use parcel_core::wire::{self, BLOB_SOURCE, GENERATED_FILE_FIELD, SAMPLE_BLOB_TEXT};
use parcel_core::{Asset, ParcelResult};
use serde_json::json;

/// One part of the outgoing multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedPart {
    Text {
        name: String,
        value: String,
    },
    Binary {
        name: String,
        filename: String,
        content_type: String,
        bytes: Bytes,
    },
}

impl EncodedPart {
    pub fn name(&self) -> &str {
        match self {
            EncodedPart::Text { name, .. } | EncodedPart::Binary { name, .. } => name,
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        EncodedPart::Text {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// How the generated blob travels when the host cannot build a binary part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlobEmbedding {
    /// A real binary part with filename and content type.
    #[default]
    Native,
    /// A text part holding a JSON descriptor whose `uri` is a base64 data URI.
    DataUri,
}

/// Everything one upload call sends.
///
/// `total_files` is fixed when the request is built and reflects what the
/// client meant to send, not what the server ends up decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub files: Vec<EncodedPart>,
    pub total_files: usize,
    pub upload_time: String,
    pub source: Option<String>,
}

impl UploadRequest {
    /// `file0..fileN-1`, one binary part per asset, in order.
    ///
    /// File-backed assets are read here; an unreadable one fails the whole
    /// request before anything is sent.
    pub async fn images(assets: &[Asset]) -> ParcelResult<Self> {
        let mut files = Vec::with_capacity(assets.len());
        for (index, asset) in assets.iter().enumerate() {
            files.push(EncodedPart::Binary {
                name: wire::file_field_name(index),
                filename: asset.filename.clone(),
                content_type: asset.content_type.clone(),
                bytes: asset.read_bytes().await?,
            });
        }

        Ok(Self {
            total_files: files.len(),
            files,
            upload_time: wire::now_iso8601(),
            source: None,
        })
    }

    /// The single synthetic `generatedFile` upload tagged `source=blob`.
    pub fn generated_blob(embedding: BlobEmbedding) -> Self {
        Self::generated_text(SAMPLE_BLOB_TEXT, embedding)
    }

    pub fn generated_text(text: &str, embedding: BlobEmbedding) -> Self {
        let asset = Asset::generated_text(text);
        let part = match embedding {
            BlobEmbedding::Native => EncodedPart::Binary {
                name: GENERATED_FILE_FIELD.to_string(),
                filename: asset.filename,
                content_type: asset.content_type,
                bytes: Bytes::copy_from_slice(text.as_bytes()),
            },
            BlobEmbedding::DataUri => {
                let descriptor = json!({
                    "uri": wire::encode_data_uri(&asset.content_type, text.as_bytes()),
                    "name": asset.filename,
                    "type": asset.content_type,
                });
                EncodedPart::text(GENERATED_FILE_FIELD, descriptor.to_string())
            }
        };

        Self {
            files: vec![part],
            total_files: 1,
            upload_time: wire::now_iso8601(),
            source: Some(BLOB_SOURCE.to_string()),
        }
    }

    pub fn with_total_files(mut self, total_files: usize) -> Self {
        self.total_files = total_files;
        self
    }

    pub fn with_upload_time(mut self, upload_time: impl Into<String>) -> Self {
        self.upload_time = upload_time.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Parts in wire order: files, `totalFiles`, `uploadTime`, then `source`.
    pub fn parts(&self) -> Vec<EncodedPart> {
        let mut parts = self.files.clone();
        parts.push(EncodedPart::text(
            wire::TOTAL_FILES_FIELD,
            self.total_files.to_string(),
        ));
        parts.push(EncodedPart::text(wire::UPLOAD_TIME_FIELD, &self.upload_time));
        if let Some(source) = &self.source {
            parts.push(EncodedPart::text(wire::SOURCE_FIELD, source));
        }
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_core::ParcelError;

    fn names(request: &UploadRequest) -> Vec<String> {
        request.parts().iter().map(|p| p.name().to_string()).collect()
    }

    #[tokio::test]
    async fn images_are_numbered_in_order() {
        let assets = vec![
            Asset::from_bytes(&b"one"[..], "a.png", "image/png"),
            Asset::from_bytes(&b"two"[..], "b.gif", "image/gif"),
        ];
        let request = UploadRequest::images(&assets).await.unwrap();

        assert_eq!(request.total_files, 2);
        assert_eq!(request.source, None);
        assert_eq!(names(&request), ["file0", "file1", "totalFiles", "uploadTime"]);
        assert_eq!(
            request.files[1],
            EncodedPart::Binary {
                name: "file1".into(),
                filename: "b.gif".into(),
                content_type: "image/gif".into(),
                bytes: Bytes::from_static(b"two"),
            }
        );
    }

    #[tokio::test]
    async fn empty_selection_still_sends_scalars() {
        let request = UploadRequest::images(&[]).await.unwrap();
        assert_eq!(names(&request), ["totalFiles", "uploadTime"]);
        assert_eq!(request.parts()[0], EncodedPart::text("totalFiles", "0"));
    }

    #[tokio::test]
    async fn unreadable_asset_fails_encoding() {
        let assets = vec![Asset::image_from_uri("file:///no/such/photo.png", None, 0).unwrap()];
        let err = UploadRequest::images(&assets).await.unwrap_err();
        assert!(matches!(err, ParcelError::Encode { .. }));
    }

    #[test]
    fn native_blob_is_one_binary_part() {
        let request = UploadRequest::generated_blob(BlobEmbedding::Native);
        assert_eq!(names(&request), ["generatedFile", "totalFiles", "uploadTime", "source"]);
        match &request.files[0] {
            EncodedPart::Binary { filename, content_type, bytes, .. } => {
                assert_eq!(filename, "generated-file.txt");
                assert_eq!(content_type, "text/plain");
                assert_eq!(bytes.len(), SAMPLE_BLOB_TEXT.len());
            }
            other => panic!("expected a binary part, got {other:?}"),
        }
    }

    #[test]
    fn data_uri_blob_is_a_descriptor() {
        let request = UploadRequest::generated_blob(BlobEmbedding::DataUri);
        let EncodedPart::Text { value, .. } = &request.files[0] else {
            panic!("expected a text part");
        };
        let descriptor: serde_json::Value = serde_json::from_str(value).unwrap();
        assert_eq!(descriptor["name"], "generated-file.txt");
        assert_eq!(descriptor["type"], "text/plain");

        let (_, bytes) = wire::decode_data_uri(descriptor["uri"].as_str().unwrap()).unwrap();
        assert_eq!(bytes, SAMPLE_BLOB_TEXT.as_bytes());
    }

    #[test]
    fn overrides_replace_scalars() {
        let request = UploadRequest::generated_blob(BlobEmbedding::Native)
            .with_total_files(3)
            .with_upload_time("2024-01-31T12:00:00.000Z")
            .with_source("camera");
        let parts = request.parts();
        assert_eq!(parts[1], EncodedPart::text("totalFiles", "3"));
        assert_eq!(parts[2], EncodedPart::text("uploadTime", "2024-01-31T12:00:00.000Z"));
        assert_eq!(parts[3], EncodedPart::text("source", "camera"));
    }
}
