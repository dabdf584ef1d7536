use crate::copier::copy_media;
use crate::error::Result;
use crate::mapper::map_tags;
use crate::sidecar::read_sidecar;
use crate::structs::{Outcome, SkipReason, TagSet, TransferItem};
use crate::tag_writer::{TagEngine, write_tags};
use crate::timestamps::set_file_times;
use std::path::Path;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Everything an item needs besides its own paths. Shared by all items of a batch.
#[derive(Clone, Copy)]
pub struct TransferContext<'a> {
    pub engine: &'a dyn TagEngine,
    pub destination: &'a Path,
    pub cancel: &'a CancellationToken,
}

/// Runs the full pipeline for one directory entry. Never fails: errors become
/// [`Outcome::Failed`].
pub async fn process_entry(context: TransferContext<'_>, entry: &Path) -> Outcome {
    let Some(item) = TransferItem::from_sidecar(entry, context.destination) else {
        return Outcome::Skipped(SkipReason::NotSidecar);
    };
    if !is_file(&item.sidecar_path).await {
        return Outcome::Skipped(SkipReason::NotSidecar);
    }
    if !is_file(&item.media_path).await {
        warn!("Media file does not exist: {}", item.media_path.display());
        return Outcome::Skipped(SkipReason::MediaMissing);
    }
    if context.cancel.is_cancelled() {
        return Outcome::Skipped(SkipReason::Cancelled);
    }

    info!("Processing file: {}", item.sidecar_path.display());
    match process_item(context, &item).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Error processing file {}: {}", item.sidecar_path.display(), e);
            Outcome::Failed(e)
        }
    }
}

/// Read, map, copy, tag, then set timestamps. The first failing step ends the item.
pub async fn process_item(context: TransferContext<'_>, item: &TransferItem) -> Result<Outcome> {
    let record = read_sidecar(&item.sidecar_path).await?;
    let tags = map_tags(&record);
    if context.cancel.is_cancelled() {
        return Ok(Outcome::Skipped(SkipReason::Cancelled));
    }

    copy_media(&item.media_path, &item.output_path).await?;
    tag_copy(
        context,
        &item.output_path,
        &tags,
        record.photo_taken_time.timestamp_seconds,
    )
    .await
}

/// Tags a finished copy and sets its times, unless the batch was cancelled meanwhile.
async fn tag_copy(
    context: TransferContext<'_>,
    output: &Path,
    tags: &TagSet,
    taken_at_seconds: u64,
) -> Result<Outcome> {
    if context.cancel.is_cancelled() {
        // An untagged copy would look like a finished one.
        remove_output(output).await;
        return Ok(Outcome::Skipped(SkipReason::Cancelled));
    }

    write_tags(context.engine, output, tags).await?;
    set_file_times(output, taken_at_seconds).await?;

    debug!("Transferred {}", output.display());
    Ok(Outcome::Transferred)
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

async fn remove_output(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        warn!("Could not remove {}: {}", path.display(), e);
    }
}
