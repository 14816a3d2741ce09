//! Resolver interface for turning a post/reel page URL into a direct media URL.
//!
//! The session only depends on the [`Resolver`] trait; [`HttpResolver`] is the
//! implementation backed by the remote resolution endpoint.

mod http;
mod parse;

pub use http::{endpoint_url, HttpResolver};
pub use parse::parse_media_url;

use crate::error::ResolveError;

/// Direct media URL extracted from a resolver response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub url: String,
}

impl ResolvedMedia {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Turns a source page URL into a [`ResolvedMedia`], or fails explicitly.
///
/// Implementations may block; callers on an async runtime run them on the
/// blocking pool.
pub trait Resolver: Send + Sync {
    fn resolve(&self, source_url: &str) -> Result<ResolvedMedia, ResolveError>;
}
