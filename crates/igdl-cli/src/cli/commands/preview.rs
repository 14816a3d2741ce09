//! `igdl preview <url>` – resolve and hand the video to the player.

use anyhow::Result;
use igdl_core::config::IgdlConfig;
use igdl_core::preview::{MediaRenderer, PlayerCommand};

use super::build_session;

pub async fn run_preview(cfg: &IgdlConfig, url: &str) -> Result<()> {
    let (session, _queue) = build_session(cfg);
    let Some(media) = session.request_preview(url).await else {
        anyhow::bail!("Failed to load preview");
    };
    PlayerCommand::new(cfg.preview.player.clone()).render(&media)
}
