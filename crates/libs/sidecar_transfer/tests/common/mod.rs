#![allow(dead_code)]

use async_trait::async_trait;
use sidecar_transfer::{Result, TagEngine, TagSet, TransferError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A tag write as seen by the engine, including the file content at that moment.
#[derive(Debug, Clone)]
pub struct WriteCall {
    pub file: PathBuf,
    pub tags: TagSet,
    pub content: Vec<u8>,
}

/// In-memory engine: records every call and fails for configured file names.
///
/// With a `hold`, each call stays in flight for that long, so overlapping calls can be
/// observed through [`RecordingEngine::peak_in_flight`].
#[derive(Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<WriteCall>>,
    reject: HashSet<String>,
    hold: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl RecordingEngine {
    pub fn rejecting(names: &[&str]) -> Self {
        Self {
            reject: names.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    pub fn holding(hold: Duration) -> Self {
        Self {
            hold,
            ..Self::default()
        }
    }

    /// Highest number of `write_tags` calls that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<WriteCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    pub fn call_for(&self, name: &str) -> Option<WriteCall> {
        self.calls()
            .into_iter()
            .find(|call| call.file.file_name().is_some_and(|n| n == name))
    }
}

#[async_trait]
impl TagEngine for RecordingEngine {
    async fn write_tags(&self, file: &Path, tags: &TagSet) -> Result<()> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);
        if !self.hold.is_zero() {
            tokio::time::sleep(self.hold).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let content = tokio::fs::read(file).await.unwrap_or_default();
        self.calls.lock().expect("lock poisoned").push(WriteCall {
            file: file.to_path_buf(),
            tags: tags.clone(),
            content,
        });

        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.reject.contains(&name) {
            return Err(TransferError::TagWrite {
                path: file.to_path_buf(),
                detail: "Error: Not a valid JPG".to_string(),
            });
        }
        Ok(())
    }
}

pub fn sidecar_json(title: &str, timestamp: &str, lat: f64, lon: f64, alt: f64) -> String {
    format!(
        r#"{{"title":"{title}","description":"","photoTakenTime":{{"timestamp":"{timestamp}","formatted":""}},"geoData":{{"latitude":{lat},"longitude":{lon},"altitude":{alt},"latitudeSpan":0.0,"longitudeSpan":0.0}}}}"#
    )
}

/// Writes a media file and, optionally, its sidecar into `dir`.
pub fn write_pair(dir: &Path, media_name: &str, media: &[u8], sidecar: Option<&str>) {
    std::fs::write(dir.join(media_name), media).expect("write media");
    if let Some(sidecar) = sidecar {
        std::fs::write(dir.join(format!("{media_name}.json")), sidecar).expect("write sidecar");
    }
}
