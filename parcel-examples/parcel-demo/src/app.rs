use parcel_axum::{upload_app, UploadApp};
use parcel_core::ParcelConfig;

pub fn parcel_app(config: &ParcelConfig) -> UploadApp {
    upload_app(config).use_get("/", || async { "parcel upload server: POST /api/upload" })
}
