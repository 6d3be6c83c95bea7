use crate::playlist_proc::collector::{ClaimedPaths, OutcomeCollector};
use crate::playlist_proc::downloader::TrackDownloader;
use crate::playlist_proc::traits::{
    MediaResolver, MediaStorage, MediaStorageError, PlaylistProvider, PlaylistProviderError,
};
use crate::playlist_proc::types::{
    RunSummary, TrackDownloadError, TrackDownloadStatus, TrackOutcome,
};
use crate::utils::sanitize_path_component;
use crate::PlaylistId;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

pub const DEFAULT_DOWNLOAD_CONCURRENCY: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum PlaylistProcessingError {
    #[error(transparent)]
    PlaylistProviderError(#[from] PlaylistProviderError),
    #[error("Unable to create destination directory: {0}")]
    MediaStorageError(#[from] MediaStorageError),
}

pub struct PlaylistDownloadProcessor {
    playlist_provider: Arc<dyn PlaylistProvider>,
    media_storage: Arc<dyn MediaStorage>,
    track_downloader: TrackDownloader,
    download_slots: Arc<Semaphore>,
}

impl PlaylistDownloadProcessor {
    pub fn new(
        playlist_provider: Arc<dyn PlaylistProvider>,
        media_resolver: Arc<dyn MediaResolver>,
        media_storage: Arc<dyn MediaStorage>,
        download_concurrency: usize,
    ) -> Self {
        Self {
            playlist_provider,
            track_downloader: TrackDownloader::new(media_resolver, Arc::clone(&media_storage)),
            media_storage,
            download_slots: Arc::new(Semaphore::new(
                download_concurrency.clamp(1, Semaphore::MAX_PERMITS),
            )),
        }
    }

    /// Resolves the playlist and downloads all of its tracks concurrently.
    ///
    /// Only playlist resolution and destination directory creation fail the
    /// run. Track failures are recorded in the returned summary.
    pub async fn run(&self, playlist_id: &PlaylistId) -> Result<RunSummary, PlaylistProcessingError> {
        info!(%playlist_id, "Resolving playlist...");

        let playlist = self.playlist_provider.get_playlist(playlist_id).await?;

        let directory_name = destination_directory_name(&playlist.channel_name, playlist_id);
        let destination = Arc::new(self.media_storage.create_directory(&directory_name).await?);

        let mut seen_ids = HashSet::new();
        let tracks = playlist
            .tracks
            .into_iter()
            .filter(|track| !track.is_placeholder())
            .filter(|track| {
                let is_first = seen_ids.insert(track.id);
                if !is_first {
                    debug!(track_id = %track.id, "Skipping repeated playlist entry");
                }
                is_first
            })
            .collect::<Vec<_>>();

        info!(
            channel_name = %playlist.channel_name,
            destination = %destination.display(),
            tracks = tracks.len(),
            "Downloading tracks..."
        );

        let collector = OutcomeCollector::default();
        let claimed_paths = ClaimedPaths::default();
        let mut handles = Vec::with_capacity(tracks.len());

        for (position, track) in tracks.into_iter().enumerate() {
            let track_id = track.id;
            let downloader = self.track_downloader.clone();
            let download_slots = Arc::clone(&self.download_slots);
            let destination = Arc::clone(&destination);
            let collector = collector.clone();
            let claimed_paths = claimed_paths.clone();

            let handle = tokio::spawn(async move {
                let outcome = match download_slots.acquire_owned().await {
                    Ok(_permit) => {
                        downloader
                            .download(&track, &destination, &claimed_paths)
                            .await
                    }
                    Err(error) => TrackOutcome {
                        track_id: track.id,
                        status: TrackDownloadStatus::DownloadFailed(TrackDownloadError::Task(
                            error.to_string(),
                        )),
                    },
                };

                collector.push(position, outcome).await;
            });

            handles.push((position, track_id, handle));
        }

        for (position, track_id, handle) in handles {
            if let Err(error) = handle.await {
                error!(%track_id, ?error, "Track download task aborted");

                collector
                    .push(
                        position,
                        TrackOutcome {
                            track_id,
                            status: TrackDownloadStatus::DownloadFailed(TrackDownloadError::Task(
                                error.to_string(),
                            )),
                        },
                    )
                    .await;
            }
        }

        debug!("All track downloads finished");

        let summary = RunSummary {
            channel_name: playlist.channel_name,
            destination: PathBuf::from(destination.as_path()),
            outcomes: collector.take_ordered().await,
        };

        info!(
            attempted = summary.attempted(),
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "Download over"
        );

        Ok(summary)
    }
}

/// Sanitized channel name, or `playlist-<id>` when nothing usable remains.
pub(crate) fn destination_directory_name(channel_name: &str, playlist_id: &PlaylistId) -> String {
    match sanitize_path_component(channel_name) {
        name if name.is_empty() || name == "." || name == ".." => {
            format!("playlist-{}", sanitize_path_component(playlist_id))
        }
        name => name,
    }
}
