//! CLI command handlers. Each command is in its own file.

mod check;
mod completions;
mod download;
mod preview;
mod resolve;

pub use check::run_check;
pub use completions::run_completions;
pub use download::run_download;
pub use preview::run_preview;
pub use resolve::run_resolve;

use igdl_core::config::IgdlConfig;
use igdl_core::download::TransferQueue;
use igdl_core::resolver::HttpResolver;
use igdl_core::session::{Session, SessionOptions};
use std::sync::Arc;
use std::time::Duration;

fn http_resolver(cfg: &IgdlConfig) -> HttpResolver {
    HttpResolver::new(cfg.resolver.clone(), cfg.validation)
}

/// Session wired to the HTTP resolver and a transfer queue under the downloads dir.
fn build_session(cfg: &IgdlConfig) -> (Session, Arc<TransferQueue>) {
    let queue = Arc::new(TransferQueue::new(
        cfg.download.resolve_dir(),
        Duration::from_secs(cfg.download.connect_timeout_secs),
    ));
    let session = Session::new(
        Arc::new(http_resolver(cfg)),
        queue.clone(),
        SessionOptions::from(cfg),
    );
    (session, queue)
}
