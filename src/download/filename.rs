//! Destination path derivation for captured streams.
//!
//! The destination is a pure function of the output directory and the
//! stream URL's trailing path segment. Repeated runs therefore map the same
//! stream to the same file, which is what makes the exists-check a correct
//! de-duplication mechanism.

use std::path::{Component, Path, PathBuf};

use url::Url;

/// Returns the destination path for `url` inside `output_dir`.
///
/// Returns `None` when the URL has no usable trailing segment (for example
/// it ends in `/`, or the segment is `.`/`..`).
#[must_use]
pub fn output_path_for(output_dir: &Path, url: &str) -> Option<PathBuf> {
    let segment = last_path_segment(url)?;
    let name = sanitize_filename(&segment);
    if name.is_empty() || !is_safe_filename_segment(&name) {
        return None;
    }
    Some(output_dir.join(name))
}

fn last_path_segment(url: &str) -> Option<String> {
    if let Ok(parsed) = Url::parse(url)
        && let Some(mut segments) = parsed.path_segments()
    {
        return segments
            .next_back()
            .filter(|last| !last.is_empty())
            .map(str::to_string);
    }

    // Not a parseable absolute URL: drop query/fragment and split on '/'.
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|last| !last.is_empty())
        .map(str::to_string)
}

/// Replaces characters that are invalid on common filesystems.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
