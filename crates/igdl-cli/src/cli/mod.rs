//! CLI for igdl: paste a post/reel URL, preview or download the video.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use igdl_core::config::{self, IgdlConfig};
use std::path::PathBuf;

use commands::{run_check, run_completions, run_download, run_preview, run_resolve};

/// Top-level CLI for igdl.
#[derive(Debug, Parser)]
#[command(name = "igdl")]
#[command(about = "igdl: download Instagram post and reel videos", long_about = None)]
pub struct Cli {
    /// Resolver endpoint base URL (overrides config.toml).
    #[arg(long, global = true, env = "IGDL_RESOLVER_URL", value_name = "URL")]
    pub resolver_url: Option<String>,

    /// Config file to use instead of ~/.config/igdl/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a post/reel URL and download the video.
    Download {
        /// Instagram post, reel or tv URL.
        url: String,
    },

    /// Resolve a post/reel URL and open the video in the configured player.
    Preview {
        /// Instagram post, reel or tv URL.
        url: String,
    },

    /// Print the direct video URL for a post/reel URL.
    Resolve {
        /// Instagram post, reel or tv URL.
        url: String,
    },

    /// Check whether a URL would be accepted.
    Check {
        /// URL to check.
        url: String,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

impl Cli {
    fn load_config(&self) -> Result<IgdlConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        if let Some(url) = &self.resolver_url {
            cfg.resolver.base_url = url.clone();
        }
        Ok(cfg)
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::Completions { shell } = &cli.command {
            return run_completions(*shell);
        }

        let cfg = cli.load_config()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match &cli.command {
            CliCommand::Download { url } => run_download(&cfg, url).await?,
            CliCommand::Preview { url } => run_preview(&cfg, url).await?,
            CliCommand::Resolve { url } => run_resolve(&cfg, url).await?,
            CliCommand::Check { url } => run_check(&cfg, url)?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
