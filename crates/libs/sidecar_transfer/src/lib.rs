#![allow(clippy::missing_errors_doc)]

//! # Sidecar Transfer
//!
//! Puts the metadata from exported `.json` sidecar files (Google Takeout style) back into
//! the media files they belong to.
//!
//! For every `<name>.<ext>.json` in a source folder that has a `<name>.<ext>` next to it,
//! the media file is copied to a destination folder, the sidecar's title, description,
//! capture time and location are written into the copy with exiftool, and the copy's
//! modification time is set to the capture time.
//!
//! ## Entry Points
//!
//! - `transfer_directory`: starts exiftool, runs the batch, stops exiftool.
//! - `run_batch`: the same with a caller-provided [`TagEngine`].
//! - `process_entry`: a single directory entry.

mod copier;
mod error;
mod exiftool;
mod mapper;
mod orchestrator;
mod process_item;
mod sidecar;
mod structs;
mod tag_writer;
mod timestamps;

pub use copier::copy_media;
pub use error::{ErrorKind, Result, TransferError};
pub use exiftool::ExifTool;
pub use mapper::map_tags;
pub use orchestrator::{DEFAULT_CONCURRENCY, TransferOptions, run_batch, transfer_directory};
pub use process_item::{TransferContext, process_entry, process_item};
pub use sidecar::{parse_sidecar, read_sidecar};
pub use structs::*;
pub use tag_writer::{TagEngine, write_tags};
pub use timestamps::set_file_times;
