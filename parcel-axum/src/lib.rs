//! parcel-axum: the receiving end of a parcel upload.
//!
//! Decodes `multipart/form-data` bodies posted to `/api/upload` into
//! tagged parts, summarises the file parts and answers with an
//! `UploadResult`. Nothing is stored.

pub mod app;
pub mod multipart;
pub mod routes;
pub mod state;
mod error;
pub use error::ParcelAxumError;
pub use state::UploadState;

pub use app::{upload_app, UploadApp};
pub use multipart::{decode_bytes, decode_stream, DecodedForm, DecodedPart, MultipartConfig};
