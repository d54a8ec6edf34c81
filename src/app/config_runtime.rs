use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use mtscrape_core::{
    DEFAULT_MAX_AGE_DAYS, DownloadConfig, FileConfig, HttpSettings, PortalEndpoints, Sources,
    TitleFilter, ToolCommand,
};

use crate::cli::Args;

/// Builds the run configuration: command line over config file over defaults.
pub(crate) fn build_download_config(
    args: &Args,
    file_config: Option<&FileConfig>,
) -> Result<DownloadConfig> {
    let file_config = file_config.cloned().unwrap_or_default();

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| file_config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = DownloadConfig::new(output_dir);
    config.max_age_days = args
        .age
        .or(file_config.max_age_days)
        .unwrap_or(DEFAULT_MAX_AGE_DAYS);
    config.convert = args.convert || file_config.convert.unwrap_or(false);
    config.fast = args.fast || file_config.fast.unwrap_or(false);
    config.verbose = args.verbose > 0;
    config.dry_run = args.dry_run;
    config.nav_json = args.nav_json;
    config.title_filter = TitleFilter::new(&args.title_pattern)?;

    if let Some(program) = args
        .capture_program
        .as_deref()
        .or(file_config.capture_program.as_deref())
    {
        config.capture = override_tool(program, &config.capture)
            .context("Invalid capture program")?;
    }
    if let Some(program) = args
        .transcode_program
        .as_deref()
        .or(file_config.transcode_program.as_deref())
    {
        config.transcode = override_tool(program, &config.transcode)
            .context("Invalid transcode program")?;
    }

    if let Some(base_url) = args
        .portal_url
        .as_deref()
        .or(file_config.portal_base_url.as_deref())
    {
        url::Url::parse(base_url)
            .with_context(|| format!("Invalid portal URL '{base_url}'"))?;
        config.portal = PortalEndpoints::new(base_url);
    }

    config.http = resolve_http_settings(&file_config);
    Ok(config)
}

/// Replaces a tool's program. Extra words after the program replace its flags;
/// a bare program name keeps the existing flags.
fn override_tool(value: &str, current: &ToolCommand) -> Result<ToolCommand> {
    let mut words = value.split_whitespace();
    let Some(program) = words.next() else {
        bail!("program must not be empty");
    };
    let flags: Vec<&str> = words.collect();
    if flags.is_empty() {
        Ok(ToolCommand::new(program, current.flags.clone()))
    } else {
        Ok(ToolCommand::new(program, flags))
    }
}

fn resolve_http_settings(file_config: &FileConfig) -> HttpSettings {
    let mut settings = HttpSettings::default();
    if let Some(secs) = file_config.connect_timeout_secs {
        settings.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file_config.read_timeout_secs {
        settings.read_timeout = Duration::from_secs(secs);
    }
    settings
}

pub(crate) fn sources_from_args(args: &Args) -> Sources {
    Sources {
        asx: args.asx.clone(),
        categories: args.categories.clone(),
        items: args.items.clone(),
        links: args.links.clone(),
    }
}

pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["mtscrape"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults_without_file() {
        let config = build_download_config(&args(&[]), None).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.max_age_days, 5);
        assert!(!config.convert);
        assert!(!config.fast);
        assert_eq!(config.capture.program, "mplayer");
        assert_eq!(config.http, HttpSettings::default());
    }

    #[test]
    fn test_file_values_fill_unset_flags() {
        let file = FileConfig {
            output_dir: Some(PathBuf::from("/srv/tv")),
            max_age_days: Some(2),
            fast: Some(true),
            convert: Some(true),
            portal_base_url: Some("http://portal.test/m".to_string()),
            read_timeout_secs: Some(90),
            ..FileConfig::default()
        };

        let config = build_download_config(&args(&[]), Some(&file)).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/srv/tv"));
        assert_eq!(config.max_age_days, 2);
        assert!(config.fast);
        assert!(config.convert);
        assert_eq!(config.portal.base_url, "http://portal.test/m");
        assert_eq!(config.http.read_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_command_line_wins_over_file() {
        let file = FileConfig {
            output_dir: Some(PathBuf::from("/srv/tv")),
            max_age_days: Some(2),
            capture_program: Some("mpv".to_string()),
            ..FileConfig::default()
        };

        let config = build_download_config(
            &args(&["-d", "/tmp/out", "-a", "0", "--capture-program", "mplayer2"]),
            Some(&file),
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.max_age_days, 0);
        assert_eq!(config.capture.program, "mplayer2");
    }

    #[test]
    fn test_bare_program_keeps_default_flags() {
        let config =
            build_download_config(&args(&["--capture-program", "/opt/bin/mplayer"]), None)
                .unwrap();
        assert_eq!(config.capture.program, "/opt/bin/mplayer");
        assert_eq!(config.capture.flags, ToolCommand::default_capture().flags);
    }

    #[test]
    fn test_program_with_words_replaces_flags() {
        let config = build_download_config(
            &args(&["--transcode-program", "ffmpeg2theora --videoquality 7"]),
            None,
        )
        .unwrap();
        assert_eq!(config.transcode.program, "ffmpeg2theora");
        assert_eq!(config.transcode.flags, vec!["--videoquality", "7"]);
    }

    #[test]
    fn test_blank_program_is_rejected() {
        assert!(build_download_config(&args(&["--capture-program", "  "]), None).is_err());
    }

    #[test]
    fn test_invalid_title_pattern_is_rejected() {
        let err = build_download_config(&args(&["-m", "(unclosed"]), None).unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_invalid_portal_url_is_rejected() {
        assert!(build_download_config(&args(&["--portal-url", "not a url"]), None).is_err());
    }

    #[test]
    fn test_verbose_enables_liveness() {
        let config = build_download_config(&args(&["-v"]), None).unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn test_log_level_from_flags() {
        assert_eq!(resolve_default_log_level(&args(&[])), "info");
        assert_eq!(resolve_default_log_level(&args(&["-v"])), "debug");
        assert_eq!(resolve_default_log_level(&args(&["-vv"])), "trace");
        assert_eq!(resolve_default_log_level(&args(&["-q", "-v"])), "error");
    }

    #[test]
    fn test_sources_from_args() {
        let sources = sources_from_args(&args(&["-C", "208", "-L", "http://x/y"]));
        assert_eq!(sources.categories, vec!["208"]);
        assert_eq!(sources.links, vec!["http://x/y"]);
        assert!(sources.asx.is_empty());
    }
}
