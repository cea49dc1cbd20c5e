use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parcel_core::{ParcelError, UploadResult};
use tracing::error;

/// Anything that goes wrong while handling an upload.
///
/// Every failure answers 500 with the `UploadResult` failure shape; no
/// partially decoded data is ever returned.
#[derive(Debug)]
pub struct ParcelAxumError(pub anyhow::Error);

impl From<anyhow::Error> for ParcelAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<ParcelError> for ParcelAxumError {
    fn from(e: ParcelError) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ParcelAxumError {
    fn into_response(self) -> Response {
        // Prefer the ParcelError message even if wrapped by anyhow contexts
        let (message, decode) = match self.0.chain().find_map(|e| e.downcast_ref::<ParcelError>()) {
            Some(parcel) => (parcel.to_string(), parcel.is_decode()),
            None => (self.0.to_string(), false),
        };

        error!(error = %message, decode, "Upload error");

        let body = UploadResult::failed(message);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
