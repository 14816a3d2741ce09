//! `igdl check <url>` – report whether the URL passes validation.

use anyhow::Result;
use igdl_core::config::IgdlConfig;
use igdl_core::session::INVALID_URL_MESSAGE;
use igdl_core::validate::validate;

pub fn run_check(cfg: &IgdlConfig, url: &str) -> Result<()> {
    if !validate(url.trim(), cfg.validation) {
        anyhow::bail!(INVALID_URL_MESSAGE);
    }
    println!("valid ({:?} validation)", cfg.validation);
    Ok(())
}
