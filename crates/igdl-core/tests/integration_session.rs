//! Integration test: session + HttpResolver + TransferQueue end to end.
//!
//! One local server plays the resolver endpoint and points at a second one
//! serving the media bytes; the file must land in the downloads directory.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::json_server::{self, Canned};
use igdl_core::config::ResolverConfig;
use igdl_core::download::TransferQueue;
use igdl_core::resolver::HttpResolver;
use igdl_core::session::{
    Session, SessionOptions, SessionStatus, DOWNLOAD_STARTED_MESSAGE, RESOLVE_FAILED_MESSAGE,
};
use igdl_core::validate::ValidationMode;
use tempfile::tempdir;

const REEL: &str = "https://www.instagram.com/reel/C1a2b3/";

fn resolver_for(base_url: &str) -> Arc<HttpResolver> {
    Arc::new(HttpResolver::new(
        ResolverConfig {
            base_url: base_url.to_string(),
            connect_timeout_secs: 5,
            read_timeout_secs: 5,
        },
        ValidationMode::Strict,
    ))
}

#[tokio::test]
async fn download_lands_in_public_downloads() {
    let body: Vec<u8> = (0u8..200).cycle().take(32 * 1024).collect();
    let media = json_server::start(Canned {
        status: 200,
        body: body.clone(),
        redirect_first: false,
        stall: None,
    });
    let media_url = format!("{}video.mp4", media.base_url);
    let api = json_server::start(Canned::json(
        200,
        &format!(r#"{{"data":{{"url":"{}"}}}}"#, media_url),
    ));

    let dir = tempdir().unwrap();
    let queue = Arc::new(TransferQueue::new(dir.path().to_path_buf(), Duration::from_secs(5)));
    let options = SessionOptions {
        user_agent: "Mozilla/5.0 (Android; Mobile)".into(),
        ..SessionOptions::default()
    };
    let session = Session::new(resolver_for(&api.base_url), queue.clone(), options);

    let done = session.submit_download(REEL).await;
    assert_eq!(done, SessionStatus::success(DOWNLOAD_STARTED_MESSAGE));

    let results = tokio::task::spawn_blocking(move || queue.wait()).await.unwrap();
    assert_eq!(results.len(), 1);
    let outcome = results.into_iter().next().unwrap().expect("transfer ok");
    assert_eq!(outcome.bytes, body.len() as u64);
    assert_eq!(outcome.path.parent(), Some(dir.path()));
    let name = outcome.path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("instagram_video_") && name.ends_with(".mp4"), "{name}");
    assert_eq!(std::fs::read(&outcome.path).unwrap(), body);

    let media_requests = media.requests();
    assert_eq!(media_requests.len(), 1);
    assert!(media_requests[0].contains("User-Agent: Mozilla/5.0 (Android; Mobile)"));
}

#[tokio::test]
async fn resolver_error_status_reports_failure() {
    let api = json_server::start(Canned::json(500, "{}"));
    let dir = tempdir().unwrap();
    let queue = Arc::new(TransferQueue::new(dir.path().to_path_buf(), Duration::from_secs(5)));
    let session = Session::new(
        resolver_for(&api.base_url),
        queue.clone(),
        SessionOptions::default(),
    );

    let done = session.submit_download(REEL).await;
    assert_eq!(done, SessionStatus::error(RESOLVE_FAILED_MESSAGE));
    assert_eq!(queue.pending(), 0);
}

#[tokio::test]
async fn preview_resolves_without_downloading() {
    let api = json_server::start(Canned::json(200, r#"{"hd":"https://x/hd.mp4"}"#));
    let dir = tempdir().unwrap();
    let queue = Arc::new(TransferQueue::new(dir.path().to_path_buf(), Duration::from_secs(5)));
    let session = Session::new(
        resolver_for(&api.base_url),
        queue.clone(),
        SessionOptions::default(),
    );

    let media = session.request_preview(REEL).await.expect("preview url");
    assert_eq!(media.url, "https://x/hd.mp4");
    assert_eq!(queue.pending(), 0);
    assert_eq!(session.status(), SessionStatus::Idle);
}

#[test]
fn same_name_submissions_get_distinct_files() {
    use igdl_core::download::{DownloadRequest, DownloadSink};
    use std::time::SystemTime;

    let body: Vec<u8> = (0u8..50).cycle().take(4096).collect();
    let media = json_server::start(Canned {
        status: 200,
        body: body.clone(),
        redirect_first: false,
        stall: None,
    });
    let media_url = format!("{}video.mp4", media.base_url);

    let dir = tempdir().unwrap();
    let earlier = dir.path().join("instagram_video_1.mp4");
    std::fs::write(&earlier, b"kept").unwrap();

    let queue = TransferQueue::new(dir.path().to_path_buf(), Duration::from_secs(5));
    let now = SystemTime::now();
    for _ in 0..2 {
        let mut req = DownloadRequest::for_video(&media_url, "UA", now);
        req.filename = "instagram_video_1.mp4".to_string();
        queue.submit(req).unwrap();
    }

    let mut paths: Vec<_> = queue
        .wait()
        .into_iter()
        .map(|r| r.expect("transfer ok").path)
        .collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            dir.path().join("instagram_video_1-1.mp4"),
            dir.path().join("instagram_video_1-2.mp4"),
        ]
    );
    for path in &paths {
        assert_eq!(std::fs::read(path).unwrap(), body);
    }
    assert_eq!(std::fs::read(&earlier).unwrap(), b"kept");
}
