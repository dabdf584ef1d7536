use crate::error::{Result, TransferError};
use crate::structs::TagSet;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Something that can embed a [`TagSet`] into a media file, overwriting it in place.
///
/// One engine is shared by every item in a batch, so implementations must accept
/// concurrent calls.
#[async_trait]
pub trait TagEngine: Send + Sync {
    async fn write_tags(&self, file: &Path, tags: &TagSet) -> Result<()>;
}

/// Writes tags to a file through the engine.
///
/// # Errors
///
/// `TagWrite` if the file is missing or the engine rejects it.
pub async fn write_tags(engine: &dyn TagEngine, file: &Path, tags: &TagSet) -> Result<()> {
    debug!("Writing Exif data to: {}", file.display());
    if !tokio::fs::try_exists(file).await.unwrap_or(false) {
        return Err(TransferError::TagWrite {
            path: file.to_path_buf(),
            detail: "file does not exist".to_string(),
        });
    }
    engine.write_tags(file, tags).await
}
