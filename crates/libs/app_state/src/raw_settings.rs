use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub transfer: RawTransferSettings,
    pub logging: LoggingSettings,
}

/// Folders and tuning for a sidecar transfer run, as written in the settings file.
#[derive(Debug, Deserialize, Clone)]
pub struct RawTransferSettings {
    /// Folder with source photos and videos plus their `.json` sidecars.
    #[serde(default)]
    pub source_folder: String,
    /// Output folder. Empty means `<source_folder>/ready`.
    #[serde(default)]
    pub destination_folder: String,
    /// Maximum number of items in flight at once.
    pub concurrency: usize,
    /// Executable used as the tagging engine.
    pub exiftool_path: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}
