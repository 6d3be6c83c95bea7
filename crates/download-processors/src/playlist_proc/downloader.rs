use crate::playlist_proc::collector::ClaimedPaths;
use crate::playlist_proc::traits::{MediaResolver, MediaStorage};
use crate::playlist_proc::types::{
    MediaLink, TrackDescriptor, TrackDownloadError, TrackDownloadStatus, TrackOutcome,
};
use crate::utils::sanitize_path_component;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Shorter media links mean the upstream has metadata but no stream for the track.
pub const MIN_MEDIA_URL_LENGTH: usize = 10;

const DEFAULT_EXTENSION: &str = "flac";

const BYTES_IN_MEGABYTE: f64 = 1024.0 * 1024.0;

#[derive(Clone)]
pub struct TrackDownloader {
    media_resolver: Arc<dyn MediaResolver>,
    media_storage: Arc<dyn MediaStorage>,
}

impl TrackDownloader {
    pub fn new(media_resolver: Arc<dyn MediaResolver>, media_storage: Arc<dyn MediaStorage>) -> Self {
        Self {
            media_resolver,
            media_storage,
        }
    }

    /// Drives a single track to a terminal status. Never fails: every error
    /// is recorded in the returned outcome.
    #[instrument(skip(self, track, destination, claimed_paths), fields(track_id = %track.id))]
    pub(crate) async fn download(
        &self,
        track: &TrackDescriptor,
        destination: &Path,
        claimed_paths: &ClaimedPaths,
    ) -> TrackOutcome {
        let mut status = TrackDownloadStatus::Pending;

        while !status.is_terminal() {
            status = self
                .handle_next_step(track, destination, claimed_paths, status)
                .await;

            debug!(status = status.name(), "Track status changed");
        }

        TrackOutcome {
            track_id: track.id,
            status,
        }
    }

    async fn handle_next_step(
        &self,
        track: &TrackDescriptor,
        destination: &Path,
        claimed_paths: &ClaimedPaths,
        status: TrackDownloadStatus,
    ) -> TrackDownloadStatus {
        match status {
            TrackDownloadStatus::Pending if track.is_placeholder() => TrackDownloadStatus::Skipped,
            TrackDownloadStatus::Pending => TrackDownloadStatus::Resolving,
            TrackDownloadStatus::Resolving => match self.resolve_media(track).await {
                Ok(media) => TrackDownloadStatus::Downloading(media),
                Err(error) => {
                    warn!(
                        track_id = %track.id,
                        kind = error.kind(),
                        %error,
                        "Unable to resolve track media"
                    );
                    TrackDownloadStatus::ResolutionFailed(error)
                }
            },
            TrackDownloadStatus::Downloading(media) => {
                self.save_media(track, &media, destination, claimed_paths)
                    .await
            }
            terminal => terminal,
        }
    }

    async fn resolve_media(&self, track: &TrackDescriptor) -> Result<MediaLink, TrackDownloadError> {
        let media = self.media_resolver.resolve_media(&track.id).await?;

        if media.url.chars().count() < MIN_MEDIA_URL_LENGTH {
            return Err(TrackDownloadError::Validation(media.url));
        }

        Ok(media)
    }

    async fn save_media(
        &self,
        track: &TrackDescriptor,
        media: &MediaLink,
        destination: &Path,
        claimed_paths: &ClaimedPaths,
    ) -> TrackDownloadStatus {
        let file_path = destination.join(media_file_name(media));

        if !claimed_paths.claim(&file_path).await {
            let error = TrackDownloadError::Conflict(file_path);
            warn!(track_id = %track.id, kind = error.kind(), %error, "Unable to download track");
            return TrackDownloadStatus::DownloadFailed(error);
        }

        info!(
            track_id = %track.id,
            title = %media.title,
            artist = %media.artist,
            "Downloading track..."
        );

        match self.media_storage.save_media(&media.url, &file_path).await {
            Ok(bytes_written) => {
                info!(
                    track_id = %track.id,
                    title = %media.title,
                    size = %format!("{:.2} MB", bytes_written as f64 / BYTES_IN_MEGABYTE),
                    "Track downloaded"
                );

                TrackDownloadStatus::Succeeded {
                    file_path,
                    bytes_written,
                }
            }
            Err(error) => {
                let error = TrackDownloadError::from(error);
                warn!(track_id = %track.id, kind = error.kind(), %error, "Unable to download track");
                TrackDownloadStatus::DownloadFailed(error)
            }
        }
    }
}

/// `<title>-<artist>.<extension>`, safe to use as a single path component.
pub(crate) fn media_file_name(media: &MediaLink) -> String {
    let extension = media
        .extension
        .as_deref()
        .map(sanitize_path_component)
        .filter(|extension| !extension.is_empty())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    format!(
        "{}.{}",
        sanitize_path_component(&format!("{}-{}", media.title, media.artist)),
        extension
    )
}
