use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use grabber_core::Layout;
use grabber_logging::{LogDestination, DEFAULT_LOG_FILE};

/// Download a pixiv artwork, or every artwork of a user, into a zip archive.
#[derive(Debug, Parser)]
#[command(name = "pixiv-grabber", version, about, long_about = None)]
pub struct Cli {
    /// Artwork or user profile URL; prompted for when omitted
    pub url: Option<String>,

    /// Layout of a profile download; prompted for when omitted
    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Value of the PHPSESSID cookie, needed for restricted content
    #[arg(long, env = "PIXIV_PHPSESSID", hide_env_values = true)]
    pub phpsessid: Option<String>,

    /// Concurrent image downloads per post
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Directory that receives the downloaded folders and archives
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// RON settings file (default: ./pixiv-grabber.ron when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Leave the downloaded folder in place instead of zipping it
    #[arg(long)]
    pub no_archive: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    /// One folder per post
    Nested,
    /// All images directly in the profile folder
    Flat,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Nested => Layout::Nested,
            LayoutArg::Flat => Layout::Flat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    /// ./pixiv-grabber.log
    File,
    Both,
}

impl LogTarget {
    pub fn destination(self) -> LogDestination {
        match self {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE)),
            LogTarget::Both => LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}
