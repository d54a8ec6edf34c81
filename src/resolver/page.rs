//! Anchor scraping of portal item pages.

use scraper::{Html, Selector};

use super::site::{self, QualityTier};

/// Returns the first anchor `href` in `html` that is a stream link for `tier`.
///
/// Anchors of other tiers are ignored, so the result does not depend on the
/// order in which tiers appear in the document.
///
/// # Errors
///
/// Returns a message if the anchor selector cannot be built.
pub(crate) fn select_stream_link(html: &str, tier: QualityTier) -> Result<Option<String>, String> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("a[href]").map_err(|e| format!("invalid anchor selector: {e:?}"))?;

    Ok(document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .find(|href| site::is_stream_candidate(href, tier))
        .map(str::to_string))
}
