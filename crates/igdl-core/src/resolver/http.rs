//! Remote resolver over HTTP GET.
//!
//! Uses the curl crate (libcurl) to call `{base_url}exec?u=<encoded url>` and
//! hands the body to [`parse_media_url`](super::parse_media_url).

use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::validate::{validate, ValidationMode};

use super::{parse::parse_media_url, ResolvedMedia, Resolver};

/// Builds the resolver request URL for `source_url`.
///
/// The source URL is form-encoded into the single `u` query parameter;
/// `base_url` gets a trailing `/` if it lacks one.
pub fn endpoint_url(base_url: &str, source_url: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(source_url.as_bytes()).collect();
    let sep = if base_url.ends_with('/') { "" } else { "/" };
    format!("{}{}exec?u={}", base_url, sep, encoded)
}

/// [`Resolver`] backed by the remote resolution endpoint.
#[derive(Debug, Clone)]
pub struct HttpResolver {
    config: ResolverConfig,
    validation: ValidationMode,
}

impl HttpResolver {
    pub fn new(config: ResolverConfig, validation: ValidationMode) -> Self {
        Self { config, validation }
    }

    /// Performs the GET and returns the body as text.
    /// Runs in the current thread; call from `spawn_blocking` if used from async code.
    fn fetch(&self, request_url: &str) -> Result<String, ResolveError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(request_url)?;
        easy.get(true)?;
        // Apps Script endpoints answer with a 302 to the content host.
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.config.connect_timeout())?;
        // Read timeout: abort when the connection stalls below 1 byte/s.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.config.read_timeout())?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(ResolveError::Http(code));
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl Resolver for HttpResolver {
    fn resolve(&self, source_url: &str) -> Result<ResolvedMedia, ResolveError> {
        let source_url = source_url.trim();
        if !validate(source_url, self.validation) {
            return Err(ResolveError::InvalidInput(source_url.to_string()));
        }

        let request_url = endpoint_url(&self.config.base_url, source_url);
        tracing::debug!(source = %source_url, "resolving media URL");

        let body = self.fetch(&request_url).map_err(|e| {
            tracing::warn!(source = %source_url, error = %e, "resolver request failed");
            e
        })?;
        let url = parse_media_url(&body).map_err(|e| {
            tracing::warn!(source = %source_url, error = %e, body_len = body.len(), "resolver response rejected");
            e
        })?;

        tracing::info!(source = %source_url, media = %url, "resolved media URL");
        Ok(ResolvedMedia { url })
    }
}
