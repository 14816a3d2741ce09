//! `igdl download <url>` – resolve, submit, and wait for the transfer.

use anyhow::Result;
use igdl_core::config::IgdlConfig;
use igdl_core::session::SessionStatus;

use super::build_session;

pub async fn run_download(cfg: &IgdlConfig, url: &str) -> Result<()> {
    let (session, queue) = build_session(cfg);

    let mut rx = session.subscribe();
    let observer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let status = rx.borrow_and_update().clone();
            render(&status);
        }
    });

    let done = session.submit_download(url).await;
    // Dropping the session closes the status channel and ends the observer.
    drop(session);
    if let Err(e) = observer.await {
        tracing::warn!(error = %e, "status observer task failed");
    }
    check_outcome(&done)?;

    let results = tokio::task::spawn_blocking(move || queue.wait()).await?;
    for result in results {
        let outcome = result?;
        println!("Saved {} ({} bytes)", outcome.path.display(), outcome.bytes);
    }
    Ok(())
}

/// The observer has already shown the message; only the exit status is left.
fn check_outcome(done: &SessionStatus) -> Result<()> {
    if done.is_error() {
        anyhow::bail!("download not started");
    }
    Ok(())
}

fn render(status: &SessionStatus) {
    match status {
        SessionStatus::Idle => {}
        SessionStatus::Loading => eprintln!("Resolving video URL..."),
        SessionStatus::Done { message, .. } => eprintln!("{message}"),
    }
}
