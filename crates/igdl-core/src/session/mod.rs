//! One resolution + download session, as driven by a single screen.
//!
//! A [`Session`] owns the observable [`SessionStatus`]. Each
//! [`submit_download`](Session::submit_download) starts a new attempt:
//! `Loading`, then exactly one `Done`. Resolution runs on the blocking pool so
//! the caller's executor stays responsive.
//!
//! Overlapping attempts are not cancelled; all of them run to completion, but
//! only the most recently started attempt publishes its terminal status.

mod status;

pub use status::{SessionStatus, UiState};

use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use tokio::sync::watch;
use tokio::task::JoinError;

use crate::config::{IgdlConfig, DEFAULT_USER_AGENT};
use crate::download::{DownloadRequest, DownloadSink};
use crate::error::ResolveError;
use crate::resolver::{ResolvedMedia, Resolver};
use crate::validate::{validate, ValidationMode};

pub const INVALID_URL_MESSAGE: &str = "Please paste a valid url.";
pub const DOWNLOAD_STARTED_MESSAGE: &str = "Download started!, check your notification";
/// Fault text for an attempt whose future was dropped before it finished.
pub const CANCELLED_FAULT: &str = "download cancelled";
pub const RESOLVE_FAILED_MESSAGE: &str =
    "Failed to get download URL. Please check the Instagram URL and try again.";

/// Per-session knobs taken from config.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub validation: ValidationMode,
    /// User-Agent attached to submitted downloads.
    pub user_agent: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            validation: ValidationMode::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&IgdlConfig> for SessionOptions {
    fn from(cfg: &IgdlConfig) -> Self {
        Self {
            validation: cfg.validation,
            user_agent: cfg.download.user_agent.clone(),
        }
    }
}

pub struct Session {
    resolver: Arc<dyn Resolver>,
    downloads: Arc<dyn DownloadSink>,
    options: SessionOptions,
    status: watch::Sender<SessionStatus>,
    /// Id of the most recently started attempt.
    latest_attempt: Mutex<u64>,
}

impl Session {
    pub fn new(
        resolver: Arc<dyn Resolver>,
        downloads: Arc<dyn DownloadSink>,
        options: SessionOptions,
    ) -> Self {
        let (status, _) = watch::channel(SessionStatus::Idle);
        Self {
            resolver,
            downloads,
            options,
            status,
            latest_attempt: Mutex::new(0),
        }
    }

    /// Receiver that sees every published status (latest value wins).
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    pub fn ui_state(&self) -> UiState {
        self.status.borrow().ui_state()
    }

    /// Resolves `url` and submits the media to the download sink.
    /// Returns this attempt's terminal status, whether or not it was published.
    pub async fn submit_download(&self, url: &str) -> SessionStatus {
        let attempt = self.begin();
        let outcome = self.run_download(url.trim()).await;
        attempt.finish(outcome)
    }

    /// Resolves `url` for preview. Invalid input or any failure yields `None`.
    /// Does not touch the session status.
    pub async fn request_preview(&self, url: &str) -> Option<ResolvedMedia> {
        let url = url.trim();
        if !validate(url, self.options.validation) {
            tracing::debug!(source = %url, "preview rejected: invalid url");
            return None;
        }
        match self.resolve_off_thread(url).await {
            Ok(Ok(media)) => Some(media),
            Ok(Err(e)) => {
                tracing::warn!(source = %url, kind = ?e.kind(), error = %e, "preview resolution failed");
                None
            }
            Err(fault) => {
                tracing::error!(source = %url, error = %fault, "preview resolver task failed");
                None
            }
        }
    }

    async fn run_download(&self, url: &str) -> SessionStatus {
        if !validate(url, self.options.validation) {
            tracing::debug!(source = %url, "download rejected: invalid url");
            return SessionStatus::error(INVALID_URL_MESSAGE);
        }

        let media = match self.resolve_off_thread(url).await {
            Ok(Ok(media)) => media,
            Ok(Err(e)) => {
                tracing::warn!(source = %url, kind = ?e.kind(), error = %e, "download resolution failed");
                return SessionStatus::error(RESOLVE_FAILED_MESSAGE);
            }
            Err(fault) => return unknown_fault(&fault),
        };

        let request =
            DownloadRequest::for_video(&media.url, &self.options.user_agent, SystemTime::now());
        let filename = request.filename.clone();
        match self.downloads.submit(request) {
            Ok(()) => {
                tracing::info!(source = %url, file = %filename, "download submitted");
                SessionStatus::success(DOWNLOAD_STARTED_MESSAGE)
            }
            Err(e) => unknown_fault(&format!("{:#}", e)),
        }
    }

    async fn resolve_off_thread(
        &self,
        url: &str,
    ) -> Result<Result<ResolvedMedia, ResolveError>, JoinError> {
        let resolver = Arc::clone(&self.resolver);
        let url = url.to_string();
        tokio::task::spawn_blocking(move || resolver.resolve(&url)).await
    }

    fn begin(&self) -> Attempt<'_> {
        let mut latest = self
            .latest_attempt
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *latest += 1;
        self.status.send_replace(SessionStatus::Loading);
        Attempt {
            session: self,
            id: *latest,
            finished: false,
        }
    }

    /// Publishes `outcome` if `attempt` is still the latest one.
    fn publish(&self, attempt: u64, outcome: &SessionStatus) {
        let latest = self
            .latest_attempt
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *latest == attempt {
            self.status.send_replace(outcome.clone());
        } else {
            tracing::debug!(attempt, latest = *latest, "attempt superseded; status not published");
        }
    }
}

/// In-flight attempt. Dropping it unfinished (the caller dropped the
/// `submit_download` future) publishes a cancellation error, so the session
/// never stays in `Loading`.
struct Attempt<'a> {
    session: &'a Session,
    id: u64,
    finished: bool,
}

impl Attempt<'_> {
    fn finish(mut self, outcome: SessionStatus) -> SessionStatus {
        self.finished = true;
        self.session.publish(self.id, &outcome);
        outcome
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let outcome = unknown_fault(&CANCELLED_FAULT);
            self.session.publish(self.id, &outcome);
        }
    }
}

fn unknown_fault(fault: &dyn std::fmt::Display) -> SessionStatus {
    tracing::error!(error = %fault, "session fault");
    SessionStatus::error(format!("{}: unknown error", fault))
}
