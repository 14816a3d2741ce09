//! `igdl resolve <url>` – print the direct video URL.

use anyhow::{Context, Result};
use igdl_core::config::IgdlConfig;
use igdl_core::resolver::Resolver;

use super::http_resolver;

pub async fn run_resolve(cfg: &IgdlConfig, url: &str) -> Result<()> {
    let resolver = http_resolver(cfg);
    let source = url.to_string();
    let media = tokio::task::spawn_blocking(move || resolver.resolve(&source))
        .await?
        .with_context(|| format!("resolve {}", url))?;
    println!("{}", media.url);
    Ok(())
}
