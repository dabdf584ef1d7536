use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.yaml";

/// Loads settings from a yaml file, then applies `APP__*` environment overrides
/// (e.g. `APP__TRANSFER__CONCURRENCY=4`). A missing file leaves the built-in defaults.
pub fn load_app_settings_from(config_path: &Path) -> Result<AppSettings> {
    dotenv::from_path(".env").ok();
    debug!("Loading settings from {}", config_path.display());

    let builder = config::Config::builder()
        .set_default("transfer.source_folder", "")?
        .set_default("transfer.destination_folder", "")?
        .set_default("transfer.concurrency", 16_i64)?
        .set_default("transfer.exiftool_path", "exiftool")?
        .set_default("logging.level", "info")?
        .add_source(config::File::from(config_path.to_path_buf()).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    AppSettings::try_from(raw_settings)
}
