use crate::error::{Result, TransferError};
use crate::structs::{GeoData, PhotoTakenTime, SidecarRecord, SidecarTime};
use serde::Deserialize;
use serde_json::error::Category;
use std::path::Path;
use tokio::fs;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSidecar {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    image_views: Option<String>,
    creation_time: Option<SidecarTime>,
    photo_taken_time: Option<SidecarTime>,
    geo_data: Option<GeoData>,
    geo_data_exif: Option<GeoData>,
    url: Option<String>,
    google_photos_origin: Option<GooglePhotosOrigin>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GooglePhotosOrigin {
    mobile_upload: Option<MobileUpload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MobileUpload {
    device_type: Option<String>,
}

/// Reads a sidecar file and validates the fields the transfer depends on.
///
/// # Errors
///
/// * `Io` if the file can't be read.
/// * `Parse` if it isn't UTF-8 JSON.
/// * `Schema` if `photoTakenTime.timestamp` is missing or not a usable number of seconds, or
///   a known field has the wrong type.
pub async fn read_sidecar(path: &Path) -> Result<SidecarRecord> {
    debug!("Reading metadata from: {}", path.display());
    let bytes = fs::read(path)
        .await
        .map_err(|e| TransferError::io(path, e))?;
    parse_sidecar(path, &bytes)
}

/// Parses sidecar content. `path` is only used for error reporting.
///
/// # Errors
///
/// Same as [`read_sidecar`], minus the I/O part.
pub fn parse_sidecar(path: &Path, bytes: &[u8]) -> Result<SidecarRecord> {
    let text = std::str::from_utf8(bytes).map_err(|e| TransferError::Parse {
        path: path.to_path_buf(),
        message: format!("not valid UTF-8: {e}"),
    })?;

    let raw: RawSidecar = serde_json::from_str(text).map_err(|e| match e.classify() {
        Category::Data => TransferError::Schema {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
        Category::Io | Category::Syntax | Category::Eof => TransferError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    into_record(path, raw)
}

fn into_record(path: &Path, raw: RawSidecar) -> Result<SidecarRecord> {
    let schema_error = |message: String| TransferError::Schema {
        path: path.to_path_buf(),
        message,
    };

    let taken = raw
        .photo_taken_time
        .ok_or_else(|| schema_error("`photoTakenTime` is missing".to_string()))?;
    let timestamp = taken
        .timestamp
        .ok_or_else(|| schema_error("`photoTakenTime.timestamp` is missing".to_string()))?;
    let seconds = parse_seconds(&timestamp).ok_or_else(|| {
        schema_error(format!(
            "`photoTakenTime.timestamp` is not a non-negative integer: {timestamp:?}"
        ))
    })?;
    let photo_taken_time = PhotoTakenTime::from_seconds(seconds, taken.formatted).ok_or_else(
        || schema_error(format!("`photoTakenTime.timestamp` is out of range: {seconds}")),
    )?;

    Ok(SidecarRecord {
        title: raw.title,
        description: raw.description,
        photo_taken_time,
        geo_data: raw.geo_data.unwrap_or_default(),
        creation_time: raw.creation_time,
        geo_data_exif: raw.geo_data_exif,
        image_views: raw.image_views,
        url: raw.url,
        origin_device_type: raw
            .google_photos_origin
            .and_then(|origin| origin.mobile_upload)
            .and_then(|upload| upload.device_type),
    })
}

/// Plain ASCII digits only: no sign, no whitespace.
fn parse_seconds(timestamp: &str) -> Option<u64> {
    if timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    timestamp.parse().ok()
}
