use crate::error::{Result, TransferError};
use crate::structs::TagSet;
use crate::tag_writer::TagEngine;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// A long-running `exiftool -stay_open` process.
///
/// Commands are written to its stdin as an argument file and answered on stdout up to a
/// `{readyN}` marker. The same marker is echoed to stderr so errors can be attributed to
/// the command that caused them. Only one command runs at a time.
pub struct ExifTool {
    executable: PathBuf,
    session: Mutex<Session>,
}

struct Session {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    stderr: BufReader<ChildStderr>,
    sequence: u64,
}

/// What exiftool printed for one command.
#[derive(Debug, Default)]
struct Response {
    stdout: String,
    stderr: String,
}

impl ExifTool {
    /// Starts exiftool. The process is killed if the handle is dropped without [`close`].
    ///
    /// # Errors
    ///
    /// `Io` if the executable can't be started.
    ///
    /// [`close`]: ExifTool::close
    pub async fn spawn(executable: &Path) -> Result<Self> {
        let io_error = |e| TransferError::io(executable, e);
        let mut child = Command::new(executable)
            .args(["-stay_open", "True", "-@", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(io_error)?;

        let stdin = child.stdin.take().ok_or_else(|| io_error(pipe_missing("stdin")))?;
        let stdout = child.stdout.take().ok_or_else(|| io_error(pipe_missing("stdout")))?;
        let stderr = child.stderr.take().ok_or_else(|| io_error(pipe_missing("stderr")))?;

        let exiftool = Self {
            executable: executable.to_path_buf(),
            session: Mutex::new(Session {
                child,
                stdin,
                stdout: BufReader::new(stdout),
                stderr: BufReader::new(stderr),
                sequence: 0,
            }),
        };

        let version = exiftool
            .execute(&["-ver".to_string()])
            .await
            .map_err(io_error)?;
        info!("📷 Started exiftool {}", version.stdout.trim());

        Ok(exiftool)
    }

    /// Asks exiftool to exit and waits for it, killing it if it doesn't stop in time.
    ///
    /// # Errors
    ///
    /// `Io` if the process can't be told to stop or waited on.
    pub async fn close(self) -> Result<()> {
        let mut session = self.session.into_inner();
        let io_error = |e| TransferError::io(&self.executable, e);

        session
            .stdin
            .write_all(b"-stay_open\nFalse\n")
            .await
            .map_err(io_error)?;
        session.stdin.flush().await.map_err(io_error)?;

        let waited = tokio::time::timeout(CLOSE_TIMEOUT, session.child.wait()).await;
        match waited {
            Ok(status) => {
                let status = status.map_err(io_error)?;
                debug!("exiftool exited with {}", status);
            }
            Err(_) => {
                warn!("exiftool did not exit in time, killing it");
                session.child.kill().await.map_err(io_error)?;
            }
        }
        Ok(())
    }

    async fn execute(&self, args: &[String]) -> io::Result<Response> {
        let mut session = self.session.lock().await;
        session.sequence += 1;
        let sequence = session.sequence;
        let marker = format!("{{ready{sequence}}}");

        let mut command = String::new();
        for arg in args {
            command.push_str(arg);
            command.push('\n');
        }
        command.push_str(&format!("-echo4\n{marker}\n-execute{sequence}\n"));

        session.stdin.write_all(command.as_bytes()).await?;
        session.stdin.flush().await?;

        let stdout = read_until_marker(&mut session.stdout, &marker).await?;
        let stderr = read_until_marker(&mut session.stderr, &marker).await?;
        Ok(Response { stdout, stderr })
    }
}

#[async_trait]
impl TagEngine for ExifTool {
    async fn write_tags(&self, file: &Path, tags: &TagSet) -> Result<()> {
        let response = self
            .execute(&write_arguments(file, tags))
            .await
            .map_err(|e| TransferError::TagWrite {
                path: file.to_path_buf(),
                detail: format!("exiftool is not responding: {e}"),
            })?;

        if let Some(detail) = write_failure(&response) {
            return Err(TransferError::TagWrite {
                path: file.to_path_buf(),
                detail,
            });
        }
        if !response.stderr.trim().is_empty() {
            warn!("exiftool on {}: {}", file.display(), response.stderr.trim());
        }
        Ok(())
    }
}

fn pipe_missing(name: &str) -> io::Error {
    io::Error::other(format!("exiftool {name} is not piped"))
}

async fn read_until_marker<R>(reader: &mut BufReader<R>, marker: &str) -> io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut output = String::new();
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "exiftool exited unexpectedly",
            ));
        }
        if let Some(rest) = line.trim_end().strip_suffix(marker) {
            output.push_str(rest);
            return Ok(output);
        }
        output.push_str(&line);
    }
}

/// Builds the argument list for writing `tags` into `file` in place.
fn write_arguments(file: &Path, tags: &TagSet) -> Vec<String> {
    let latitude_ref = if tags.gps_latitude < 0.0 { "S" } else { "N" };
    let longitude_ref = if tags.gps_longitude < 0.0 { "W" } else { "E" };
    let altitude_ref = if tags.gps_altitude < 0.0 { 1 } else { 0 };

    vec![
        "-overwrite_original".to_string(),
        "-charset".to_string(),
        "filename=utf8".to_string(),
        // Lets values contain newlines: they are sent as HTML entities and decoded on write.
        "-E".to_string(),
        format!("-Title={}", escape_value(&tags.title)),
        format!("-Description={}", escape_value(&tags.description)),
        format!("-DateTimeOriginal={}", tags.date_time_original),
        format!("-GPSLatitude={}", tags.gps_latitude),
        format!("-GPSLatitudeRef={latitude_ref}"),
        format!("-GPSLongitude={}", tags.gps_longitude),
        format!("-GPSLongitudeRef={longitude_ref}"),
        format!("-GPSAltitude={}", tags.gps_altitude),
        format!("-GPSAltitudeRef#={altitude_ref}"),
        file.to_string_lossy().into_owned(),
    ]
}

fn escape_value(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('\r', "&#xd;")
        .replace('\n', "&#xa;")
}

/// Returns the error detail if exiftool reports that the write didn't happen.
fn write_failure(response: &Response) -> Option<String> {
    let errors: Vec<&str> = response
        .stderr
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("Error"))
        .collect();
    if !errors.is_empty() {
        return Some(errors.join("; "));
    }
    if response.stdout.contains("weren't updated due to errors") {
        return Some(response.stdout.trim().to_string());
    }
    None
}
