//! Background media transfers: one curl GET per request on its own thread.
//!
//! Writes to `<name>.part` next to the destination and renames on success.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use super::{DownloadLocation, DownloadRequest, DownloadSink};

/// Finished transfer, returned by [`TransferQueue::wait`].
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub title: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Downloads `url` with a single GET into `dest`. Returns the number of bytes written.
///
/// Runs in the current thread. On any failure the partial file is removed.
pub fn fetch_to_file(
    url: &str,
    custom_headers: &HashMap<String, String>,
    dest: &Path,
    connect_timeout: Duration,
) -> Result<u64> {
    let part = part_path(dest);
    let result = fetch_into(url, custom_headers, &part, connect_timeout).and_then(|written| {
        fs::rename(&part, dest)
            .with_context(|| format!("rename {} to {}", part.display(), dest.display()))?;
        Ok(written)
    });
    if result.is_err() {
        let _ = fs::remove_file(&part);
    }
    result
}

fn fetch_into(
    url: &str,
    custom_headers: &HashMap<String, String>,
    part: &Path,
    connect_timeout: Duration,
) -> Result<u64> {
    let mut file =
        fs::File::create(part).with_context(|| format!("create {}", part.display()))?;
    let mut written: u64 = 0;
    let mut write_error: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(connect_timeout)?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;

    let mut list = curl::easy::List::new();
    for (k, v) in custom_headers {
        if k.eq_ignore_ascii_case("user-agent") {
            easy.useragent(v.trim())?;
        } else {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
    }
    easy.http_headers(list)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_error.take() {
        return Err(e).with_context(|| format!("write {}", part.display()));
    }
    performed.context("GET request failed")?;

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }

    file.flush()?;
    Ok(written)
}

/// Most numbered variants tried before giving up on a name.
const MAX_NAME_SUFFIX: u32 = 9999;

/// Claims a file name in `dir` that nothing else holds: `filename`, then
/// `<stem>-1.<ext>`, `<stem>-2.<ext>`... The claimed path is created empty.
pub(crate) fn reserve_destination(dir: &Path, filename: &str) -> Result<PathBuf> {
    let base = Path::new(filename);
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = base.extension().map(|e| e.to_string_lossy().into_owned());

    for n in 0..=MAX_NAME_SUFFIX {
        let name = match (n, &ext) {
            (0, _) => filename.to_string(),
            (n, Some(ext)) => format!("{}-{}.{}", stem, n, ext),
            (n, None) => format!("{}-{}", stem, n),
        };
        let candidate = dir.join(name);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("create {}", candidate.display()));
            }
        }
    }
    anyhow::bail!("no free file name for {} in {}", filename, dir.display())
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

/// [`DownloadSink`] that runs each transfer on a background thread and writes
/// into a public downloads directory.
pub struct TransferQueue {
    public_downloads: PathBuf,
    connect_timeout: Duration,
    handles: Mutex<Vec<JoinHandle<Result<TransferOutcome>>>>,
}

impl TransferQueue {
    pub fn new(public_downloads: PathBuf, connect_timeout: Duration) -> Self {
        Self {
            public_downloads,
            connect_timeout,
            handles: Mutex::new(Vec::new()),
        }
    }

    fn directory_for(&self, location: DownloadLocation) -> &Path {
        match location {
            DownloadLocation::PublicDownloads => &self.public_downloads,
        }
    }

    /// Number of transfers submitted and not yet collected by [`wait`](Self::wait).
    pub fn pending(&self) -> usize {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Blocks until every submitted transfer finishes. Results are in submission order.
    pub fn wait(&self) -> Vec<Result<TransferOutcome>> {
        let handles: Vec<_> = self
            .handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        handles
            .into_iter()
            .map(|h| {
                h.join()
                    .unwrap_or_else(|_| Err(anyhow::anyhow!("transfer thread panicked")))
            })
            .collect()
    }
}

impl DownloadSink for TransferQueue {
    fn submit(&self, request: DownloadRequest) -> Result<()> {
        let dir = self.directory_for(request.location).to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("create download dir: {}", dir.display()))?;
        let dest = reserve_destination(&dir, &request.filename)?;
        let connect_timeout = self.connect_timeout;
        let reserved = dest.clone();

        tracing::info!(
            title = %request.title,
            mime = %request.mime_type,
            path = %dest.display(),
            "{}",
            request.description
        );

        let handle = std::thread::Builder::new()
            .name("igdl-transfer".to_string())
            .spawn(move || {
                let result = fetch_to_file(&request.url, &request.headers, &dest, connect_timeout);
                match &result {
                    Ok(bytes) if request.notify_on_completion => {
                        tracing::info!(path = %dest.display(), bytes, "{}: download complete", request.title);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        let _ = fs::remove_file(&dest);
                        tracing::warn!(path = %dest.display(), error = %e, "{}: download failed", request.title);
                    }
                }
                result.map(|bytes| TransferOutcome {
                    title: request.title,
                    path: dest,
                    bytes,
                })
            })
            .map_err(|e| {
                let _ = fs::remove_file(&reserved);
                e
            })
            .context("spawn transfer thread")?;

        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
        Ok(())
    }
}
