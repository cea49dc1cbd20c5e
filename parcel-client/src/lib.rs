//! parcel-client: the sending end of a parcel upload.
//!
//! Builds the multipart request for a list of assets (or the generated
//! text blob), pushes it through a [`Transfer`] and turns whatever comes
//! back into an [`UploadOutcome`]. [`StatusLine`] gives a presentation
//! layer the in-progress and terminal messages, clearing them after 3 s.

pub mod client;
pub mod picker;
pub mod request;
pub mod status;
pub mod transfer;

pub use client::{UploadClient, UploadOutcome, UploadStatus, STATUS_CLEAR_DELAY};
pub use picker::{collect_assets, AssetPicker, PathPicker, PickedAsset};
pub use request::{BlobEmbedding, EncodedPart, UploadRequest};
pub use status::StatusLine;
pub use transfer::{ReqwestTransport, Transfer, TransferResponse};
