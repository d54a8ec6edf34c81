//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Capture programmes from the ZDF Mediathek.
///
/// Mtscrape resolves stream URLs from redirect lists, item pages and
/// category feeds and dumps each stream to disk once, optionally
/// transcoding it afterwards.
#[derive(Parser, Debug)]
#[command(name = "mtscrape")]
#[command(author, version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Maximum age of category feed items in days [default: 5]
    #[arg(short = 'a', long = "age", value_name = "DAYS", value_parser = clap::value_parser!(u32).range(0..=3650))]
    pub age: Option<u32>,

    /// Transcode each captured file after download
    #[arg(short, long)]
    pub convert: bool,

    /// Directory to save captured streams to [default: .]
    #[arg(short = 'd', long = "dir", value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Prefer the low-quality stream variant
    #[arg(short, long)]
    pub fast: bool,

    /// Only fetch category items whose title matches this regex
    #[arg(short = 'm', long = "match", value_name = "PATTERN", default_value = "")]
    pub title_pattern: String,

    /// Increase output verbosity and show a spinner while jobs run (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Resolve everything but do not capture or create directories
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Resolve items and links through the portal's navigation JSON
    #[arg(long)]
    pub nav_json: bool,

    /// Program used to capture streams [default: mplayer]
    #[arg(long, value_name = "PROG")]
    pub capture_program: Option<String>,

    /// Program used to transcode captured files [default: ffmpeg2theora]
    #[arg(long, value_name = "PROG")]
    pub transcode_program: Option<String>,

    /// Base URL of the media portal
    #[arg(long = "portal-url", value_name = "URL")]
    pub portal_url: Option<String>,

    /// Redirect-list (.asx) URL to capture (repeatable)
    #[arg(short = 'A', long = "asx", value_name = "URL")]
    pub asx: Vec<String>,

    /// Category identifier whose recent items are captured (repeatable)
    #[arg(short = 'C', long = "category", value_name = "ID")]
    pub categories: Vec<String>,

    /// Item identifier to capture (repeatable)
    #[arg(short = 'I', long = "item", value_name = "ID")]
    pub items: Vec<String>,

    /// Item page link to capture (repeatable)
    #[arg(short = 'L', long = "link", value_name = "URL")]
    pub links: Vec<String>,
}
