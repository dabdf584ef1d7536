use crate::{LoggingSettings, RawSettings, absolute_or_none};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use std::path::{Path, PathBuf};

/// Name of the folder created inside the source folder when no destination is configured.
pub const DEFAULT_DESTINATION_NAME: &str = "ready";

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub transfer: TransferSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub source_folder: Option<PathBuf>,
    pub destination_folder: Option<PathBuf>,
    pub concurrency: usize,
    pub exiftool_path: PathBuf,
}

impl TryFrom<RawSettings> for AppSettings {
    type Error = color_eyre::Report;

    fn try_from(raw: RawSettings) -> Result<Self> {
        if raw.transfer.concurrency == 0 {
            return Err(eyre!("transfer.concurrency must be at least 1"));
        }
        let transfer = TransferSettings {
            source_folder: absolute_or_none(&raw.transfer.source_folder)?,
            destination_folder: absolute_or_none(&raw.transfer.destination_folder)?,
            concurrency: raw.transfer.concurrency,
            exiftool_path: PathBuf::from(raw.transfer.exiftool_path),
        };

        Ok(Self {
            transfer,
            logging: raw.logging,
        })
    }
}

impl TransferSettings {
    /// Picks the destination folder: the explicit one if given, else the configured one,
    /// else `<source>/ready`.
    #[must_use]
    pub fn destination_for(&self, source: &Path, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.destination_folder.clone())
            .unwrap_or_else(|| source.join(DEFAULT_DESTINATION_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer_settings(destination_folder: Option<PathBuf>) -> TransferSettings {
        TransferSettings {
            source_folder: None,
            destination_folder,
            concurrency: 4,
            exiftool_path: PathBuf::from("exiftool"),
        }
    }

    #[test]
    fn explicit_destination_wins() {
        let settings = transfer_settings(Some(PathBuf::from("/configured")));
        let dest = settings.destination_for(Path::new("/src"), Some(Path::new("/cli")));
        assert_eq!(dest, PathBuf::from("/cli"));
    }

    #[test]
    fn configured_destination_before_default() {
        let settings = transfer_settings(Some(PathBuf::from("/configured")));
        let dest = settings.destination_for(Path::new("/src"), None);
        assert_eq!(dest, PathBuf::from("/configured"));
    }

    #[test]
    fn falls_back_to_ready_folder() {
        let settings = transfer_settings(None);
        let dest = settings.destination_for(Path::new("/src"), None);
        assert_eq!(dest, Path::new("/src").join("ready"));
    }
}
