//! The names, paths and small conversions both ends of an upload agree on.

use base64::Engine;
use chrono::{SecondsFormat, Utc};

use crate::errors::{ParcelError, ParcelResult};

/// Endpoint every upload is POSTed to.
pub const UPLOAD_PATH: &str = "/api/upload";

pub const FILE_FIELD_PREFIX: &str = "file";
pub const GENERATED_FILE_FIELD: &str = "generatedFile";
pub const TOTAL_FILES_FIELD: &str = "totalFiles";
pub const UPLOAD_TIME_FIELD: &str = "uploadTime";
pub const SOURCE_FIELD: &str = "source";

pub const BLOB_SOURCE: &str = "blob";
pub const GENERATED_FILENAME: &str = "generated-file.txt";
pub const SAMPLE_BLOB_TEXT: &str = "This is a sample text content created as a blob";

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
pub const FALLBACK_IMAGE_TYPE: &str = "image/jpeg";
pub const TEXT_PLAIN: &str = "text/plain";
pub const UNKNOWN_FILENAME: &str = "unknown";

/// `file0`, `file1`, ...
pub fn file_field_name(index: usize) -> String {
    format!("{FILE_FIELD_PREFIX}{index}")
}

/// Part names the decoder lists under `files`.
pub fn is_file_field(name: &str) -> bool {
    name.starts_with(FILE_FIELD_PREFIX) || name == GENERATED_FILE_FIELD
}

/// Last `/` segment of a URI or path, or `image_<index>.jpg` when that is empty.
pub fn filename_from_uri(uri: &str, index: usize) -> String {
    match uri.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => format!("image_{index}.jpg"),
    }
}

/// Trailing `.<word chars>` suffix of a filename, without the dot.
pub fn extension(filename: &str) -> Option<&str> {
    let (_, ext) = filename.rsplit_once('.')?;
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    if !ext.is_empty() && ext.chars().all(is_word) {
        Some(ext)
    } else {
        None
    }
}

/// `photo.png` -> `image/png`; no usable suffix -> `image/jpeg`.
pub fn infer_image_content_type(filename: &str) -> String {
    match extension(filename) {
        Some(ext) => format!("image/{ext}"),
        None => FALLBACK_IMAGE_TYPE.to_string(),
    }
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{payload}")
}

/// Split a `data:` URI into its media type and decoded payload.
///
/// The media type is everything before the first `;` (or the comma when
/// there are no parameters); an empty media type comes back as `text/plain`.
pub fn decode_data_uri(uri: &str) -> ParcelResult<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ParcelError::decode("not a data URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ParcelError::decode("data URI has no payload separator"))?;

    let mut params = header.split(';');
    let mime = match params.next() {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => TEXT_PLAIN.to_string(),
    };
    let is_base64 = params.any(|p| p.eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ParcelError::decode(format!("invalid base64 in data URI: {e}")))?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok((mime, bytes))
}

/// Lenient integer parse: leading whitespace, optional sign, then digits.
/// Anything after the digits is ignored; no digits at all means `None`.
pub fn parse_declared_count(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// The client's declared count when it parses, otherwise what was decoded.
/// A mismatch between the two is not an error. A declared `"0"` parses and
/// is kept as 0; it does not fall back to the decoded count.
pub fn resolve_total_files(declared: Option<&str>, decoded: usize) -> i64 {
    declared
        .and_then(parse_declared_count)
        .unwrap_or(decoded as i64)
}

/// Current UTC time as `2024-01-31T12:00:00.000Z`.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
