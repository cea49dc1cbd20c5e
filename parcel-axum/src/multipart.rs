use std::collections::HashSet;

use bytes::Bytes;
use futures::Stream;
use parcel_core::wire::{self, DEFAULT_CONTENT_TYPE, UNKNOWN_FILENAME};
use parcel_core::{FileSummary, ParcelError, ParcelResult, UploadResult};
use serde_json::Value;
use tracing::debug;

/// Limits applied while decoding an upload body
#[derive(Debug, Clone)]
pub struct MultipartConfig {
    /// Maximum size of a single part in bytes (None = unlimited)
    pub max_file_size: Option<usize>,
    /// Maximum size of all parts together in bytes (None = unlimited)
    pub max_total_size: Option<usize>,
    /// Allowed content types for file parts (empty = all allowed)
    pub allowed_content_types: HashSet<String>,
}

impl Default for MultipartConfig {
    fn default() -> Self {
        Self {
            max_file_size: Some(100 * 1024 * 1024),  // 100MB
            max_total_size: Some(500 * 1024 * 1024), // 500MB
            allowed_content_types: HashSet::new(),
        }
    }
}

impl MultipartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = Some(size);
        self
    }

    pub fn max_total_size(mut self, size: usize) -> Self {
        self.max_total_size = Some(size);
        self
    }

    pub fn allow_content_type(mut self, content_type: &str) -> Self {
        self.allowed_content_types.insert(content_type.to_string());
        self
    }

    fn check_type(&self, part: &str, content_type: &str) -> ParcelResult<()> {
        if !self.allowed_content_types.is_empty() && !self.allowed_content_types.contains(content_type) {
            return Err(ParcelError::decode(format!(
                "Content type '{content_type}' not allowed for file '{part}'"
            )));
        }
        Ok(())
    }
}

/// One part of a received body, already normalised.
///
/// Both wire shapes of a file (a binary part with a filename, or a text
/// part holding a JSON descriptor) come out as `FileLike`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedPart {
    Scalar { name: String, value: String },
    FileLike { name: String, file: FileSummary },
}

impl DecodedPart {
    pub fn name(&self) -> &str {
        match self {
            DecodedPart::Scalar { name, .. } | DecodedPart::FileLike { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedForm {
    pub parts: Vec<DecodedPart>,
}

impl DecodedForm {
    /// First scalar value with this name.
    pub fn scalar(&self, name: &str) -> Option<&str> {
        self.parts
            .iter()
            .filter(|part| part.name() == name)
            .find_map(|part| match part {
                DecodedPart::Scalar { value, .. } => Some(value.as_str()),
                DecodedPart::FileLike { .. } => None,
            })
    }

    /// File parts under a file field name, in the order they arrived.
    pub fn files(&self) -> Vec<FileSummary> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                DecodedPart::FileLike { name, file } if wire::is_file_field(name) => {
                    Some(file.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn summarize(&self) -> UploadResult {
        UploadResult::succeeded(
            self.scalar(wire::UPLOAD_TIME_FIELD).map(str::to_string),
            self.scalar(wire::SOURCE_FIELD).map(str::to_string),
            self.scalar(wire::TOTAL_FILES_FIELD),
            self.files(),
        )
    }
}

/// Decode a complete body held in memory.
pub async fn decode_bytes(
    content_type: &str,
    body: impl Into<Bytes>,
    config: &MultipartConfig,
) -> ParcelResult<DecodedForm> {
    let body = body.into();
    let stream = futures::stream::once(async move { Ok::<Bytes, std::io::Error>(body) });
    decode_stream(content_type, stream, config).await
}

/// Decode a `multipart/form-data` body as it streams in.
///
/// Only parts under a file field name can be files; every other part is a
/// scalar holding its raw text. Binary file parts are counted chunk by chunk
/// and never buffered. Any framing error, missing boundary or limit
/// violation fails the whole body.
pub async fn decode_stream<S, O, E>(
    content_type: &str,
    stream: S,
    config: &MultipartConfig,
) -> ParcelResult<DecodedForm>
where
    S: Stream<Item = Result<O, E>> + Send + 'static,
    O: Into<Bytes> + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| ParcelError::decode(format!("Missing boundary in multipart content-type: {e}")))?;

    let mut multipart = multer::Multipart::new(stream, boundary);
    let mut form = DecodedForm::default();
    let mut total_size = 0usize;

    while let Some(mut field) = multipart.next_field().await.map_err(multer_error)? {
        let name = field.name().unwrap_or(UNKNOWN_FILENAME).to_string();
        let filename = field.file_name().map(str::to_string);
        let part_type = field.content_type().map(|ct| ct.to_string());

        let is_file = wire::is_file_field(&name);

        // Auto-detect: has filename or content-type says it is not text
        let is_binary = is_file
            && (filename.is_some() || part_type.as_ref().is_some_and(|ct| !ct.starts_with("text/")));

        if is_binary {
            let mut size = 0usize;
            while let Some(chunk) = field.chunk().await.map_err(multer_error)? {
                size += chunk.len();
                total_size += chunk.len();
                check_limits(config, &name, size, total_size)?;
            }

            let file = FileSummary::new(
                filename.unwrap_or_else(|| UNKNOWN_FILENAME.to_string()),
                part_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
                size as u64,
            );
            config.check_type(&name, &file.content_type)?;
            debug!(part = %name, size, "binary part");
            form.parts.push(DecodedPart::FileLike { name, file });
        } else {
            let data = field.bytes().await.map_err(multer_error)?;
            total_size += data.len();
            check_limits(config, &name, data.len(), total_size)?;

            let value = String::from_utf8_lossy(&data).into_owned();
            let file = if is_file { file_value(&value)? } else { None };
            match file {
                Some(file) => {
                    config.check_type(&name, &file.content_type)?;
                    debug!(part = %name, size = file.size, "descriptor part");
                    form.parts.push(DecodedPart::FileLike { name, file });
                }
                None => form.parts.push(DecodedPart::Scalar { name, value }),
            }
        }
    }

    Ok(form)
}

fn multer_error(e: multer::Error) -> ParcelError {
    ParcelError::decode(format!("Failed to parse multipart data: {e}"))
}

fn check_limits(config: &MultipartConfig, part: &str, size: usize, total: usize) -> ParcelResult<()> {
    if let Some(max) = config.max_file_size {
        if size > max {
            return Err(ParcelError::decode(format!(
                "File '{part}' exceeds maximum size of {max} bytes"
            )));
        }
    }
    if let Some(max) = config.max_total_size {
        if total > max {
            return Err(ParcelError::decode(format!(
                "Upload exceeds maximum total size of {max} bytes"
            )));
        }
    }
    Ok(())
}

/// A text value under a file field is a file when it is a bare data URI or
/// a JSON descriptor. Anything else stays a scalar.
fn file_value(value: &str) -> ParcelResult<Option<FileSummary>> {
    let trimmed = value.trim();
    if trimmed.starts_with("data:") {
        let (mime, bytes) = wire::decode_data_uri(trimmed)?;
        return Ok(Some(FileSummary::new(UNKNOWN_FILENAME, mime, bytes.len() as u64)));
    }
    file_descriptor(trimmed)
}

/// A text value is a file descriptor when it is a JSON object, e.g.
/// `{"uri":"data:text/plain;base64,...","name":"a.txt","type":"text/plain"}`.
///
/// Missing `name`/`type` fall back to `unknown`/`application/octet-stream`.
/// Missing `size` comes from the decoded data URI when there is one, else 0.
fn file_descriptor(value: &str) -> ParcelResult<Option<FileSummary>> {
    let trimmed = value.trim_start();
    if !trimmed.starts_with('{') {
        return Ok(None);
    }
    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(trimmed) else {
        return Ok(None);
    };

    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let size = match object.get("size").and_then(Value::as_u64).filter(|n| *n > 0) {
        Some(size) => size,
        None => match text("uri") {
            Some(uri) if uri.starts_with("data:") => wire::decode_data_uri(&uri)?.1.len() as u64,
            _ => 0,
        },
    };

    Ok(Some(FileSummary::new(
        text("name").unwrap_or_else(|| UNKNOWN_FILENAME.to_string()),
        text("type").unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        size,
    )))
}
