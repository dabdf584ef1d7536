use crate::error::{Result, TransferError};
use std::fs::{FileTimes, OpenOptions};
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Sets the access time to now and the modification time to `epoch_seconds` (UTC).
///
/// # Errors
///
/// `Io` if the file doesn't exist or the filesystem refuses the new times.
pub async fn set_file_times(path: &Path, epoch_seconds: u64) -> Result<()> {
    debug!("Updating file timestamp for: {}", path.display());
    let modified = UNIX_EPOCH + Duration::from_secs(epoch_seconds);
    let owned_path = path.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let file = OpenOptions::new().write(true).open(&owned_path)?;
        let times = FileTimes::new()
            .set_accessed(SystemTime::now())
            .set_modified(modified);
        file.set_times(times)
    })
    .await
    .map_err(io::Error::other)
    .and_then(|result| result)
    .map_err(|e| TransferError::io(path, e))
}
