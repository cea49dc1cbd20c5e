use axum::{
    extract::{Request, State},
    http::header::CONTENT_TYPE,
    routing::post,
    Json, Router,
};
use parcel_core::wire::{self, UPLOAD_PATH};
use parcel_core::UploadResult;
use tracing::{info, instrument};

use crate::{multipart, ParcelAxumError, UploadState};

/// `POST /api/upload`, decoding with the limits in `state`.
pub fn upload_router(state: UploadState) -> Router<()> {
    Router::new()
        .route(UPLOAD_PATH, post(upload))
        .with_state(state)
}

#[instrument(name = "upload", skip_all)]
async fn upload(
    State(state): State<UploadState>,
    request: Request,
) -> Result<Json<UploadResult>, ParcelAxumError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let stream = request.into_body().into_data_stream();
    let form = multipart::decode_stream(&content_type, stream, &state.multipart).await?;
    let result = form.summarize();

    info!(
        total_files = ?form.scalar(wire::TOTAL_FILES_FIELD),
        upload_time = ?result.upload_time,
        source = ?result.source,
        files_count = result.file_count(),
        files = ?result.files,
        "Upload received"
    );

    Ok(Json(result))
}
