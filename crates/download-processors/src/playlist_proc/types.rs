use crate::playlist_proc::traits::{BoxError, MediaResolverError, MediaStorageError};
use crate::TrackId;
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackDescriptor {
    pub id: TrackId,
    pub kind: i64,
    pub method: i64,
    pub flow_mark: i64,
}

impl TrackDescriptor {
    pub fn new(id: TrackId) -> Self {
        Self {
            id,
            kind: 0,
            method: 0,
            flow_mark: 0,
        }
    }

    /// Playlists use id `0` for placeholder entries that refer to no track.
    pub fn is_placeholder(&self) -> bool {
        *self.id == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub channel_name: String,
    pub tracks: Vec<TrackDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaLink {
    pub url: String,
    pub title: String,
    pub artist: String,
    pub extension: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TrackDownloadError {
    #[error("{0}")]
    Transport(BoxError),
    #[error("{0}")]
    Decode(String),
    #[error("{0}")]
    UpstreamUnavailable(String),
    #[error("media url {0:?} is too short to be a real stream")]
    Validation(String),
    #[error("{0}")]
    Filesystem(#[from] std::io::Error),
    #[error("download task failed: {0}")]
    Task(String),
    #[error("file {0:?} is already written by another track")]
    Conflict(PathBuf),
}

impl TrackDownloadError {
    pub fn kind(&self) -> &'static str {
        match self {
            TrackDownloadError::Transport(_) => "transport",
            TrackDownloadError::Decode(_) => "decode",
            TrackDownloadError::UpstreamUnavailable(_) => "unavailable",
            TrackDownloadError::Validation(_) => "validation",
            TrackDownloadError::Filesystem(_) => "filesystem",
            TrackDownloadError::Task(_) => "task",
            TrackDownloadError::Conflict(_) => "conflict",
        }
    }
}

impl From<MediaResolverError> for TrackDownloadError {
    fn from(error: MediaResolverError) -> Self {
        match error {
            MediaResolverError::Transport(error) => TrackDownloadError::Transport(error),
            MediaResolverError::Decode(reason) => TrackDownloadError::Decode(reason),
            MediaResolverError::Unavailable(reason) => {
                TrackDownloadError::UpstreamUnavailable(reason)
            }
        }
    }
}

impl From<MediaStorageError> for TrackDownloadError {
    fn from(error: MediaStorageError) -> Self {
        match error {
            MediaStorageError::Transport(error) => TrackDownloadError::Transport(error),
            MediaStorageError::Filesystem(error) => TrackDownloadError::Filesystem(error),
        }
    }
}

/// Per-track lifecycle:
/// `Pending -> Resolving -> {Skipped | ResolutionFailed} | Downloading -> {Succeeded | DownloadFailed}`.
#[derive(Debug)]
pub enum TrackDownloadStatus {
    Pending,
    Resolving,
    Downloading(MediaLink),
    Skipped,
    ResolutionFailed(TrackDownloadError),
    Succeeded {
        file_path: PathBuf,
        bytes_written: u64,
    },
    DownloadFailed(TrackDownloadError),
}

impl TrackDownloadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TrackDownloadStatus::Skipped
                | TrackDownloadStatus::ResolutionFailed(_)
                | TrackDownloadStatus::Succeeded { .. }
                | TrackDownloadStatus::DownloadFailed(_)
        )
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            TrackDownloadStatus::Pending => "pending",
            TrackDownloadStatus::Resolving => "resolving",
            TrackDownloadStatus::Downloading(_) => "downloading",
            TrackDownloadStatus::Skipped => "skipped",
            TrackDownloadStatus::ResolutionFailed(_) => "resolution_failed",
            TrackDownloadStatus::Succeeded { .. } => "succeeded",
            TrackDownloadStatus::DownloadFailed(_) => "download_failed",
        }
    }
}

#[derive(Debug)]
pub struct TrackOutcome {
    pub track_id: TrackId,
    pub status: TrackDownloadStatus,
}

impl TrackOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, TrackDownloadStatus::Succeeded { .. })
    }

    pub fn error(&self) -> Option<&TrackDownloadError> {
        match &self.status {
            TrackDownloadStatus::ResolutionFailed(error)
            | TrackDownloadStatus::DownloadFailed(error) => Some(error),
            _ => None,
        }
    }

    pub fn bytes_written(&self) -> Option<u64> {
        match &self.status {
            TrackDownloadStatus::Succeeded { bytes_written, .. } => Some(*bytes_written),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub channel_name: String,
    pub destination: PathBuf,
    pub outcomes: Vec<TrackOutcome>,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| !matches!(outcome.status, TrackDownloadStatus::Skipped))
            .count()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TrackOutcome> {
        self.outcomes.iter().filter(|o| o.error().is_some())
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} -> {}",
            self.channel_name,
            self.destination.display()
        )?;
        write!(
            f,
            "attempted: {}, succeeded: {}, failed: {}",
            self.attempted(),
            self.succeeded(),
            self.failed()
        )?;

        for outcome in self.failures() {
            if let Some(error) = outcome.error() {
                write!(
                    f,
                    "\n  track {} failed ({}): {}",
                    outcome.track_id,
                    error.kind(),
                    error
                )?;
            }
        }

        Ok(())
    }
}
