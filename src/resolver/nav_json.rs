//! Navigation JSON view of portal items.
//!
//! The portal can describe an item as JSON (`view=navJson`), naming the asset
//! type and, for videos, the redirect-list URL of the stream.

use serde::Deserialize;

use super::site::{self, QualityTier};

const VIDEO_ASSET_TYPE: &str = "video";

/// The fields of the navigation document that resolution needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NavDocument {
    #[serde(default)]
    pub(crate) asset_type: Option<String>,
    #[serde(default)]
    pub(crate) asset_url: Option<String>,
}

/// What a navigation document says about the item.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum NavAsset {
    /// A video, with the redirect-list URL of its stream (if present).
    Video(Option<String>),
    /// Any other asset type (livestream, image gallery, ...).
    Other(String),
}

impl NavDocument {
    pub(crate) fn asset(self) -> NavAsset {
        match self.asset_type.as_deref() {
            Some(VIDEO_ASSET_TYPE) => NavAsset::Video(self.asset_url),
            Some(other) if !other.trim().is_empty() => NavAsset::Other(other.to_string()),
            _ => NavAsset::Other("unknown".to_string()),
        }
    }
}

/// Builds the navigation JSON URL for an item link.
#[must_use]
pub(crate) fn nav_json_url(link: &str, tier: QualityTier) -> String {
    site::append_query(
        link,
        &format!("bw={}&pp=wmp&view=navJson", tier.nav_bandwidth()),
    )
}
