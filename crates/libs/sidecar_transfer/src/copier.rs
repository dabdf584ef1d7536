use crate::error::{Result, TransferError};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{self, AsyncWriteExt};
use tracing::{debug, warn};

/// Copies a media file, creating or truncating the destination.
///
/// The data is flushed and synced to disk before this returns. If writing fails the
/// partial destination file is removed.
///
/// # Errors
///
/// `Io` if the source can't be opened or the destination can't be written.
pub async fn copy_media(source: &Path, destination: &Path) -> Result<u64> {
    debug!(
        "Copying file from {} to {}",
        source.display(),
        destination.display()
    );
    let mut reader = File::open(source)
        .await
        .map_err(|e| TransferError::io(source, e))?;

    match write_copy(&mut reader, destination).await {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            if let Err(remove_err) = fs::remove_file(destination).await
                && remove_err.kind() != ErrorKind::NotFound
            {
                warn!(
                    "Could not remove partial copy {}: {}",
                    destination.display(),
                    remove_err
                );
            }
            Err(TransferError::io(destination, e))
        }
    }
}

async fn write_copy(reader: &mut File, destination: &Path) -> io::Result<u64> {
    let mut writer = File::create(destination).await?;
    let bytes = io::copy(reader, &mut writer).await?;
    writer.flush().await?;
    writer.sync_all().await?;
    Ok(bytes)
}
