//! Optional `key = value` config file supplying defaults for the command line.
//!
//! Path priority:
//! 1. `$XDG_CONFIG_HOME/mtscrape/config.toml`
//! 2. `$HOME/.config/mtscrape/config.toml`

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::ConfigError;

const MAX_AGE_DAYS_LIMIT: u64 = 3650;
const TIMEOUT_SECS_LIMIT: u64 = 3600;

/// Defaults loaded from the config file. `None` means "not set in the file".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub max_age_days: Option<u32>,
    pub fast: Option<bool>,
    pub convert: Option<bool>,
    pub capture_program: Option<String>,
    pub transcode_program: Option<String>,
    pub portal_base_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
}

/// Resolves the default config path, if a base directory is known.
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("mtscrape")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("mtscrape")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file from the default path if it exists.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file exists but cannot be read or parsed.
pub fn load_default_file_config() -> Result<Option<FileConfig>, ConfigError> {
    let Some(path) = resolve_default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "No config file found");
        return Ok(None);
    }
    load_file_config(&path).map(Some)
}

fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = parse_config_str(&raw)?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(cfg)
}

pub(crate) fn parse_config_str(raw: &str) -> Result<FileConfig, ConfigError> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            return Err(ConfigError::Syntax {
                line: line_no,
                reason: "expected key = value".to_string(),
            });
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: key.to_string(),
            line: line_no,
            reason,
        };

        match key {
            "output_dir" => {
                cfg.output_dir = Some(PathBuf::from(parse_string_literal(value).map_err(invalid)?));
            }
            "max_age_days" => {
                let days = parse_bounded_u64(value, MAX_AGE_DAYS_LIMIT).map_err(invalid)?;
                let days = u32::try_from(days).map_err(|_| invalid("out of range".to_string()))?;
                cfg.max_age_days = Some(days);
            }
            "fast" => cfg.fast = Some(parse_boolean(value).map_err(invalid)?),
            "convert" => cfg.convert = Some(parse_boolean(value).map_err(invalid)?),
            "capture_program" => {
                cfg.capture_program = Some(parse_non_empty_string(value).map_err(invalid)?);
            }
            "transcode_program" => {
                cfg.transcode_program = Some(parse_non_empty_string(value).map_err(invalid)?);
            }
            "portal_base_url" => {
                let url = parse_non_empty_string(value).map_err(invalid)?;
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(invalid("expected an http:// or https:// URL".to_string()));
                }
                cfg.portal_base_url = Some(url);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs =
                    Some(parse_timeout_secs(value).map_err(invalid)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_timeout_secs(value).map_err(invalid)?);
            }
            unknown => {
                return Err(ConfigError::Syntax {
                    line: line_no,
                    reason: format!("unknown configuration key '{unknown}'"),
                });
            }
        }
    }
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String, String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        return Err("expected double-quoted string".to_string());
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_non_empty_string(raw_value: &str) -> Result<String, String> {
    let value = parse_string_literal(raw_value)?;
    if value.trim().is_empty() {
        return Err("expected non-empty string".to_string());
    }
    Ok(value)
}

fn parse_bounded_u64(raw_value: &str, max: u64) -> Result<u64, String> {
    let token = raw_value.trim();
    if token.is_empty() {
        return Err("expected integer value".to_string());
    }
    let value = token.parse::<u64>().map_err(|e| e.to_string())?;
    if value > max {
        return Err(format!("expected range 0..={max}"));
    }
    Ok(value)
}

fn parse_timeout_secs(raw_value: &str) -> Result<u64, String> {
    let value = parse_bounded_u64(raw_value, TIMEOUT_SECS_LIMIT)?;
    if value == 0 {
        return Err(format!("expected range 1..={TIMEOUT_SECS_LIMIT}"));
    }
    Ok(value)
}

fn parse_boolean(raw_value: &str) -> Result<bool, String> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err("expected 'true' or 'false'".to_string()),
    }
}
