//! Shared HTTP client construction and document fetching.
//!
//! One client is built per run from [`HttpSettings`] and reused for pages,
//! redirect lists, navigation JSON and feeds.

use reqwest::{Client, ClientBuilder};
use tracing::debug;

use crate::config::HttpSettings;
use crate::user_agent;

use super::ResolveError;

/// Builds the HTTP client used by the resolver and the feed reader.
///
/// # Errors
///
/// Returns [`ResolveError::ClientBuild`] when client construction fails.
pub fn build_http_client(settings: &HttpSettings) -> Result<Client, ResolveError> {
    base_builder(settings)
        .build()
        .map_err(|error| ResolveError::ClientBuild {
            reason: error.to_string(),
        })
}

fn base_builder(settings: &HttpSettings) -> ClientBuilder {
    Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.read_timeout)
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
}

/// Fetches `url` and returns the response body as text.
///
/// # Errors
///
/// Returns [`ResolveError::Fetch`] on transport failure and
/// [`ResolveError::HttpStatus`] on a non-success status.
pub(crate) async fn fetch_text(client: &Client, url: &str) -> Result<String, ResolveError> {
    debug!(url, "Fetching document");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|error| ResolveError::fetch(url, error))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ResolveError::http_status(url, status.as_u16()));
    }

    response
        .text()
        .await
        .map_err(|error| ResolveError::fetch(url, error))
}
