use std::path::PathBuf;

use async_trait::async_trait;
use parcel_core::{Asset, ParcelError, ParcelResult};
use tracing::warn;

/// What an asset source hands back: a URI or path, maybe a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedAsset {
    pub uri: String,
    pub filename: Option<String>,
}

impl PickedAsset {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            filename: None,
        }
    }
}

/// A user-consented selection of assets.
///
/// Refusal is reported as `ParcelError::PermissionDenied`.
#[async_trait]
pub trait AssetPicker: Send + Sync {
    async fn pick(&self) -> ParcelResult<Vec<PickedAsset>>;
}

/// Run the picker and turn its selection into assets.
///
/// A denied permission is not an upload error: it yields no assets.
pub async fn collect_assets<P>(picker: &P) -> ParcelResult<Vec<Asset>>
where
    P: AssetPicker + ?Sized,
{
    let picked = match picker.pick().await {
        Ok(picked) => picked,
        Err(ParcelError::PermissionDenied { message }) => {
            warn!(%message, "asset access refused, nothing to upload");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    picked
        .iter()
        .enumerate()
        .map(|(index, p)| Asset::image_from_uri(&p.uri, p.filename.as_deref(), index))
        .collect()
}

/// Picks files from the local file system, in the order given.
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    paths: Vec<PathBuf>,
}

impl PathPicker {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl AssetPicker for PathPicker {
    async fn pick(&self) -> ParcelResult<Vec<PickedAsset>> {
        let mut picked = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            match tokio::fs::metadata(path).await {
                Ok(meta) if meta.is_file() => {
                    picked.push(PickedAsset::new(path.to_string_lossy()));
                }
                Ok(_) => warn!(path = %path.display(), "skipping, not a file"),
                Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                    return Err(ParcelError::permission_denied(format!(
                        "Permission to access {} is required!",
                        path.display()
                    )));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(picked)
    }
}
