use crate::error::TransferError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Extension that marks a directory entry as a sidecar file.
pub const SIDECAR_EXTENSION: &str = "json";

/// A parsed and validated sidecar file.
#[derive(Debug, Clone, PartialEq)]
pub struct SidecarRecord {
    pub title: String,
    pub description: String,
    pub photo_taken_time: PhotoTakenTime,
    /// Zeroed when the sidecar has no `geoData`.
    pub geo_data: GeoData,

    // Parsed for completeness, not used when building tags.
    pub creation_time: Option<SidecarTime>,
    pub geo_data_exif: Option<GeoData>,
    pub image_views: Option<String>,
    pub url: Option<String>,
    pub origin_device_type: Option<String>,
}

/// Validated capture time of a media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoTakenTime {
    pub timestamp_seconds: u64,
    pub taken_at: DateTime<Utc>,
    /// Human readable form as exported, e.g. "14 nov 2023, 22:13:20 UTC".
    pub formatted: String,
}

impl PhotoTakenTime {
    /// Returns `None` when the seconds do not fit in the calendar range chrono supports.
    #[must_use]
    pub fn from_seconds(timestamp_seconds: u64, formatted: impl Into<String>) -> Option<Self> {
        let seconds = i64::try_from(timestamp_seconds).ok()?;
        let taken_at = DateTime::from_timestamp(seconds, 0)?;
        Some(Self {
            timestamp_seconds,
            taken_at,
            formatted: formatted.into(),
        })
    }
}

/// A time entry exactly as found in the sidecar (`creationTime`, `photoTakenTime`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SidecarTime {
    pub timestamp: Option<String>,
    #[serde(default)]
    pub formatted: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoData {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub latitude_span: f64,
    pub longitude_span: f64,
}

/// Tags to embed in a media file.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSet {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DDTHH:MM:SS`, UTC.
    pub date_time_original: String,
    pub gps_latitude: f64,
    pub gps_longitude: f64,
    pub gps_altitude: f64,
}

/// One sidecar/media pair and where its tagged copy goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferItem {
    pub sidecar_path: PathBuf,
    pub media_path: PathBuf,
    pub output_path: PathBuf,
}

impl TransferItem {
    /// Builds an item for a directory entry, or `None` if the entry isn't named like a sidecar.
    ///
    /// `IMG_1.jpg.json` pairs with `IMG_1.jpg` next to it, and is written to
    /// `<destination>/IMG_1.jpg`.
    #[must_use]
    pub fn from_sidecar(sidecar_path: &Path, destination: &Path) -> Option<Self> {
        if sidecar_path.extension().and_then(|ext| ext.to_str()) != Some(SIDECAR_EXTENSION) {
            return None;
        }
        let media_name = sidecar_path.file_stem()?;
        Some(Self {
            sidecar_path: sidecar_path.to_path_buf(),
            media_path: sidecar_path.with_file_name(media_name),
            output_path: destination.join(media_name),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotSidecar,
    MediaMissing,
    Cancelled,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::NotSidecar => "not a sidecar",
            Self::MediaMissing => "media file missing",
            Self::Cancelled => "cancelled",
        };
        f.write_str(reason)
    }
}

/// The result of processing a single directory entry.
#[derive(Debug)]
pub enum Outcome {
    Transferred,
    Skipped(SkipReason),
    Failed(TransferError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchResult {
    pub processed_count: usize,
    pub error_count: usize,
    pub skipped_count: usize,
}

/// A failed item, kept so callers can report it individually.
#[derive(Debug)]
pub struct ItemFailure {
    pub entry: PathBuf,
    pub error: TransferError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub result: BatchResult,
    pub failures: Vec<ItemFailure>,
}

impl BatchReport {
    pub fn record(&mut self, entry: PathBuf, outcome: Outcome) {
        match outcome {
            Outcome::Transferred => self.result.processed_count += 1,
            Outcome::Skipped(_) => self.result.skipped_count += 1,
            Outcome::Failed(error) => {
                self.result.error_count += 1;
                self.failures.push(ItemFailure { entry, error });
            }
        }
    }

    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.result.error_count > 0
    }
}
