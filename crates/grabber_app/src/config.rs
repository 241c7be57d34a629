//! Settings file and the merge of file, environment and flags.
//!
//! Precedence, lowest first: built-in defaults, the RON file, then
//! `--phpsessid`/`PIXIV_PHPSESSID` and the remaining flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use grabber_engine::GrabberSettings;
use grabber_logging::grab_info;
use serde::Deserialize;

use crate::cli::Cli;

pub const DEFAULT_CONFIG_FILE: &str = "pixiv-grabber.ron";

/// On-disk settings. Every field is optional; absent ones keep the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub phpsessid: Option<String>,
    pub workers: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub archive: Option<bool>,
    pub api_timeout_secs: Option<u64>,
    pub profile_timeout_secs: Option<u64>,
    pub image_timeout_secs: Option<u64>,
    pub post_delay_ms: Option<u64>,
}

pub fn parse(text: &str) -> Result<FileConfig, ron::error::SpannedError> {
    ron::from_str(text)
}

/// Reads `explicit`, or `./pixiv-grabber.ron` if it exists.
///
/// An explicitly named file must exist; the default one may be absent.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<FileConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(FileConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read settings from {path:?}"));
        }
    };

    let config = parse(&text).with_context(|| format!("failed to parse settings in {path:?}"))?;
    grab_info!("Loaded settings from {:?}", path);
    Ok(config)
}

pub fn build_settings(file: FileConfig, cli: &Cli) -> GrabberSettings {
    let mut settings = GrabberSettings::default();

    if let Some(base_url) = file.base_url {
        settings.base_url = base_url;
    }
    if let Some(user_agent) = file.user_agent {
        settings.user_agent = user_agent;
    }
    if let Some(secs) = file.api_timeout_secs {
        settings.api_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.profile_timeout_secs {
        settings.profile_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.image_timeout_secs {
        settings.image_timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = file.post_delay_ms {
        settings.post_delay = Duration::from_millis(ms);
    }

    settings.session_id = cli
        .phpsessid
        .clone()
        .or(file.phpsessid)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    settings.workers = cli
        .workers
        .or(file.workers)
        .unwrap_or(settings.workers)
        .max(1);
    if let Some(output) = cli.output.clone().or(file.output_dir) {
        settings.output_dir = output;
    }
    settings.archive = !cli.no_archive && file.archive.unwrap_or(settings.archive);

    settings
}
