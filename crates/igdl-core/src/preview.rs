//! Preview: hand a resolved media URL to something that can play it.

use anyhow::{Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};

use crate::resolver::ResolvedMedia;

/// Media-rendering collaborator. Receives the URL only; playback control is its own.
pub trait MediaRenderer: Send + Sync {
    fn render(&self, media: &ResolvedMedia) -> Result<()>;
}

/// Launches an external player (`argv` with the URL appended), or writes the
/// URL to stdout when no player is configured.
#[derive(Debug, Clone, Default)]
pub struct PlayerCommand {
    argv: Option<Vec<String>>,
}

impl PlayerCommand {
    pub fn new(argv: Option<Vec<String>>) -> Self {
        let argv = argv.filter(|a| !a.is_empty());
        Self { argv }
    }

    /// Command line that would be spawned for `media`, if a player is configured.
    pub fn command_line(&self, media: &ResolvedMedia) -> Option<Vec<String>> {
        self.argv.as_ref().map(|argv| {
            let mut line = argv.clone();
            line.push(media.url.clone());
            line
        })
    }
}

impl MediaRenderer for PlayerCommand {
    fn render(&self, media: &ResolvedMedia) -> Result<()> {
        let Some(line) = self.command_line(media) else {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", media.url)?;
            return Ok(());
        };
        let (program, args) = line
            .split_first()
            .context("player command is empty")?;
        tracing::debug!(player = %program, media = %media.url, "launching player");
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("launch player: {}", program))?;
        Ok(())
    }
}
