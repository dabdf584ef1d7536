use app_state::{AppSettings, DEFAULT_SETTINGS_PATH, load_app_settings_from};
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use sidecar_transfer::{BatchReport, TransferOptions, transfer_directory};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Copy exported photos and videos, writing the metadata from their `.json` sidecars into
/// the copies.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Folder with media files and `<file>.json` sidecars. Defaults to `transfer.source_folder`.
    source: Option<PathBuf>,

    /// Output folder. Defaults to `transfer.destination_folder`, then `<source>/ready`.
    #[clap(long, short)]
    destination: Option<PathBuf>,

    /// Number of files processed at the same time.
    #[clap(long, short)]
    concurrency: Option<usize>,

    /// Settings file.
    #[clap(long, default_value = DEFAULT_SETTINGS_PATH)]
    config: PathBuf,

    /// Path to the exiftool executable.
    #[clap(long)]
    exiftool: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();

    // Settings pick the log level, so loading them is logged under a provisional subscriber.
    let settings = tracing::subscriber::with_default(log_subscriber("info"), || {
        load_app_settings_from(&args.config)
    })?;
    tracing::subscriber::set_global_default(log_subscriber(&settings.logging.level))?;

    let report = run(args, &settings).await?;

    if report.has_errors() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

async fn run(args: Args, settings: &AppSettings) -> Result<BatchReport> {
    let transfer = &settings.transfer;
    let source = args
        .source
        .or_else(|| transfer.source_folder.clone())
        .ok_or_else(|| eyre!("No source folder given and transfer.source_folder is not set"))?;
    let destination = transfer.destination_for(&source, args.destination.as_deref());

    let options = TransferOptions {
        concurrency: args.concurrency.unwrap_or(transfer.concurrency),
        exiftool_path: args
            .exiftool
            .unwrap_or_else(|| transfer.exiftool_path.clone()),
        cancel: CancellationToken::new(),
    };
    cancel_on_ctrl_c(options.cancel.clone());

    info!(
        "🚚 Transferring sidecar metadata from {} to {}",
        source.display(),
        destination.display()
    );
    Ok(transfer_directory(&source, &destination, &options).await?)
}

fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, finishing items in progress...");
            cancel.cancel();
        }
    });
}

fn log_subscriber(level: &str) -> FmtSubscriber<DefaultFields, Format, EnvFilter> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    FmtSubscriber::builder().with_env_filter(filter).finish()
}
