use crate::error::{Result, TransferError};
use crate::exiftool::ExifTool;
use crate::process_item::{TransferContext, process_entry};
use crate::structs::BatchReport;
use crate::tag_writer::TagEngine;
use futures_util::{StreamExt, stream};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub const DEFAULT_CONCURRENCY: usize = 16;

#[derive(Debug, Clone)]
pub struct TransferOptions {
    /// Maximum number of items in flight. Values below 1 are treated as 1.
    pub concurrency: usize,
    pub exiftool_path: PathBuf,
    /// Cancelling stops items that haven't started tagging yet.
    pub cancel: CancellationToken,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            exiftool_path: PathBuf::from("exiftool"),
            cancel: CancellationToken::new(),
        }
    }
}

/// Starts exiftool, transfers every sidecar in `source` to `destination`, and stops
/// exiftool again whether the batch succeeded or not.
///
/// # Errors
///
/// `Io` if exiftool can't be started, `source` can't be listed, or `destination`
/// can't be created. Per-item errors are in the returned report instead.
pub async fn transfer_directory(
    source: &Path,
    destination: &Path,
    options: &TransferOptions,
) -> Result<BatchReport> {
    let exiftool = ExifTool::spawn(&options.exiftool_path).await?;

    let result = run_batch(&exiftool, source, destination, options).await;

    if let Err(e) = exiftool.close().await {
        warn!("Failed to stop exiftool cleanly: {}", e);
    }
    result
}

/// Transfers every sidecar in `source` using the given engine.
///
/// All entries are processed, at most `options.concurrency` at a time. A failing item
/// never stops the others.
///
/// # Errors
///
/// `Io` if `source` can't be listed, or `destination` can't be created, is not a folder, or
/// is the source folder itself. Nothing is processed in that case.
pub async fn run_batch(
    engine: &dyn TagEngine,
    source: &Path,
    destination: &Path,
    options: &TransferOptions,
) -> Result<BatchReport> {
    let entries = list_entries(source).await?;
    ensure_destination(source, destination).await?;
    info!(
        "Found {} entries in {}, transferring to {}",
        entries.len(),
        source.display(),
        destination.display()
    );

    let context = TransferContext {
        engine,
        destination,
        cancel: &options.cancel,
    };
    let report = stream::iter(entries)
        .map(|entry| async move {
            let outcome = process_entry(context, &entry).await;
            (entry, outcome)
        })
        .buffer_unordered(options.concurrency.max(1))
        .fold(BatchReport::default(), |mut report, (entry, outcome)| async move {
            report.record(entry, outcome);
            report
        })
        .await;

    let result = &report.result;
    if report.has_errors() {
        warn!(
            "Done. Transferred metadata for {} files to folder: {}. {} error(s) occurred.",
            result.processed_count,
            destination.display(),
            result.error_count
        );
    } else {
        info!(
            "✅ Done. Transferred metadata for {} files to folder: {}.",
            result.processed_count,
            destination.display()
        );
    }

    Ok(report)
}

/// Lists the direct children of `source`. Fails before anything is dispatched.
async fn list_entries(source: &Path) -> Result<Vec<PathBuf>> {
    let io_error = |e| TransferError::io(source, e);
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(source).await.map_err(io_error)?;
    while let Some(entry) = read_dir.next_entry().await.map_err(io_error)? {
        entries.push(entry.path());
    }
    Ok(entries)
}

async fn ensure_destination(source: &Path, destination: &Path) -> Result<()> {
    if let Ok(metadata) = fs::metadata(destination).await {
        if !metadata.is_dir() {
            return Err(TransferError::io(
                destination,
                io::Error::new(
                    io::ErrorKind::NotADirectory,
                    "destination exists but is not a folder",
                ),
            ));
        }
        warn!("Warning! folder: {} - already exists", destination.display());
        if same_folder(source, destination).await {
            return Err(TransferError::io(
                destination,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "destination must not be the source folder",
                ),
            ));
        }
        return Ok(());
    }
    fs::create_dir_all(destination)
        .await
        .map_err(|e| TransferError::io(destination, e))
}

async fn same_folder(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a).await, fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
