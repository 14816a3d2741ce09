//! Download submission: the request handed off once a media URL is resolved.
//!
//! The session builds a [`DownloadRequest`] and passes it to a
//! [`DownloadSink`]. Sinks enqueue the transfer and return; progress and
//! completion are theirs to report.

mod transfer;

pub use transfer::{fetch_to_file, TransferOutcome, TransferQueue};

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

pub const VIDEO_MIME_TYPE: &str = "video/mp4";
pub const DOWNLOAD_TITLE: &str = "Instagram Video Download";
pub const DOWNLOAD_DESCRIPTION: &str = "Downloading Instagram video...";

/// Where a sink should place the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadLocation {
    /// The user's public downloads directory.
    PublicDownloads,
}

/// A transfer to enqueue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Direct media URL.
    pub url: String,
    /// Suggested file name (no directory part).
    pub filename: String,
    pub mime_type: String,
    pub location: DownloadLocation,
    pub title: String,
    pub description: String,
    /// Extra request headers (User-Agent override).
    pub headers: HashMap<String, String>,
    /// Report completion to the user.
    pub notify_on_completion: bool,
}

impl DownloadRequest {
    /// Request for a resolved video, named after `now`.
    pub fn for_video(url: &str, user_agent: &str, now: SystemTime) -> Self {
        let mut headers = HashMap::new();
        headers.insert("User-Agent".to_string(), user_agent.to_string());
        Self {
            url: url.to_string(),
            filename: video_filename(now),
            mime_type: VIDEO_MIME_TYPE.to_string(),
            location: DownloadLocation::PublicDownloads,
            title: DOWNLOAD_TITLE.to_string(),
            description: DOWNLOAD_DESCRIPTION.to_string(),
            headers,
            notify_on_completion: true,
        }
    }
}

/// `instagram_video_<unix millis>.mp4`. Times before the epoch clamp to 0.
pub fn video_filename(now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("instagram_video_{}.mp4", millis)
}

/// Download-submission collaborator.
pub trait DownloadSink: Send + Sync {
    /// Enqueue `request`. Returns once queued, not when the transfer ends.
    fn submit(&self, request: DownloadRequest) -> anyhow::Result<()>;
}
