use crate::playlist_proc::types::{MediaLink, Playlist};
use crate::{PlaylistId, TrackId};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum PlaylistProviderError {
    #[error("Unable to fetch playlist: {0}")]
    Transport(BoxError),
    #[error("Malformed playlist response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait PlaylistProvider: Send + Sync {
    async fn get_playlist(&self, playlist_id: &PlaylistId)
        -> Result<Playlist, PlaylistProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaResolverError {
    #[error("Unable to fetch media link: {0}")]
    Transport(BoxError),
    #[error("Malformed media link response: {0}")]
    Decode(String),
    #[error("No lossless source: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait MediaResolver: Send + Sync {
    async fn resolve_media(&self, track_id: &TrackId) -> Result<MediaLink, MediaResolverError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaStorageError {
    #[error("Unable to fetch media stream: {0}")]
    Transport(BoxError),
    #[error(transparent)]
    Filesystem(#[from] std::io::Error),
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Creates (or reuses) the directory `name` and returns its path.
    async fn create_directory(&self, name: &str) -> Result<PathBuf, MediaStorageError>;

    /// Streams `media_url` into `file_path`, returning the number of bytes written.
    async fn save_media(&self, media_url: &str, file_path: &Path)
        -> Result<u64, MediaStorageError>;
}
