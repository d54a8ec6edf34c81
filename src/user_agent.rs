//! Shared User-Agent string for portal HTTP requests.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/hollow/mtscrape";

/// Default User-Agent for page, redirect-list and feed requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("mtscrape/{version} (+{PROJECT_UA_URL})")
}
