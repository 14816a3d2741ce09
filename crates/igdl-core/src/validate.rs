//! Source URL validation.
//!
//! A source URL is accepted when it names the platform domain and one of the
//! content path markers. This is a substring check on the raw input, matching
//! what users paste from the share sheet (query strings and all).

use serde::{Deserialize, Serialize};

/// Domain token a source URL must contain.
pub const DOMAIN_TOKEN: &str = "instagram.com";

/// Path markers for posts, reels and legacy IGTV videos.
pub const POST_MARKER: &str = "/p/";
pub const REEL_MARKER: &str = "/reel/";
pub const TV_MARKER: &str = "/tv/";

/// How the domain token combines with the path markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Domain token required, plus any one marker.
    #[default]
    Strict,
    /// `(domain && /p/) || /reel/ || /tv/`: the domain only gates posts.
    /// Kept for parity with the first released client.
    AsObserved,
}

/// Returns true if `url` looks like a resolvable post/reel/tv URL under `mode`.
pub fn validate(url: &str, mode: ValidationMode) -> bool {
    let has_domain = url.contains(DOMAIN_TOKEN);
    let post = url.contains(POST_MARKER);
    let reel = url.contains(REEL_MARKER);
    let tv = url.contains(TV_MARKER);
    match mode {
        ValidationMode::Strict => has_domain && (post || reel || tv),
        ValidationMode::AsObserved => (has_domain && post) || reel || tv,
    }
}
