use std::fmt;
use std::io;
use std::path::PathBuf;

use grabber_core::{Degradation, DownloadOutcome, DownloadTask};

use crate::archive::ArchiveOutcome;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidHeader,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Creating or writing the destination file failed.
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidHeader => write!(f, "invalid header value"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Io => write!(f, "file error"),
        }
    }
}

impl From<FetchError> for Degradation {
    fn from(err: FetchError) -> Self {
        match err.kind {
            FailureKind::HttpStatus(code) => Degradation::HttpStatus(code),
            _ => Degradation::Transport(err.to_string()),
        }
    }
}

/// Profile URL without an extractable user id; the one resolver failure that
/// is surfaced instead of degraded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid user profile URL: {0}")]
    InvalidProfileUrl(String),
}

/// Conditions that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] FetchError),
    #[error("failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrabEvent {
    ProfileResolved {
        user_id: String,
        posts: usize,
    },
    PostStarted {
        index: usize,
        total: usize,
        url: String,
    },
    PostSkipped {
        url: String,
        reason: String,
    },
    BatchStarted {
        label: String,
        total: usize,
    },
    ImageFinished {
        task: DownloadTask,
        outcome: DownloadOutcome,
    },
    BatchFinished {
        succeeded: usize,
        failed: usize,
    },
    ArchiveFinished(ArchiveOutcome),
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: GrabEvent);
}

/// Totals for one single-post or profile run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub posts_total: usize,
    pub posts_skipped: usize,
    pub images_downloaded: usize,
    pub images_failed: usize,
    pub output: Option<PathBuf>,
    pub archive: Option<ArchiveOutcome>,
}
