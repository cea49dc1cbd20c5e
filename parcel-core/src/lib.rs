//! parcel-core: the wire contract shared by the parcel encoder and decoder.
//!
//! An upload is one `multipart/form-data` POST to [`wire::UPLOAD_PATH`]
//! carrying `file0..fileN-1` (or a single `generatedFile`), plus the scalar
//! parts `totalFiles`, `uploadTime` and an optional `source`. The server
//! answers with an [`UploadResult`].

pub mod asset;
pub mod config;
pub mod errors;
pub mod result;
pub mod wire;

pub use asset::{Asset, AssetContent};
pub use config::{ParcelConfig, ParcelConfigSnapshot};
pub use errors::{ParcelError, ParcelResult};
pub use result::{FileSummary, UploadResult};
