use crate::playlist_proc::traits::{
    MediaResolver, MediaResolverError, MediaStorage, MediaStorageError, PlaylistProvider,
    PlaylistProviderError,
};
use crate::playlist_proc::types::{MediaLink, Playlist, TrackDescriptor};
use crate::{PlaylistId, TrackId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) const MUSIC_DIRECTORY: &str = "/music";

pub(crate) fn media_link(id: u64) -> MediaLink {
    MediaLink {
        url: format!("http://file.example.com/data2/music/{}.flac", id),
        title: format!("Song{}", id),
        artist: format!("Artist{}", id),
        extension: Some("flac".into()),
    }
}

pub(crate) fn playlist(channel_name: &str, ids: &[u64]) -> Playlist {
    Playlist {
        channel_name: channel_name.into(),
        tracks: ids
            .iter()
            .map(|id| TrackDescriptor::new(TrackId(*id)))
            .collect(),
    }
}

pub(crate) struct PlaylistProviderMock {
    playlists: HashMap<PlaylistId, Playlist>,
}

impl PlaylistProviderMock {
    pub(crate) fn new(playlists: Vec<(&str, Playlist)>) -> Self {
        Self {
            playlists: playlists
                .into_iter()
                .map(|(id, playlist)| (PlaylistId::from(id), playlist))
                .collect(),
        }
    }
}

#[async_trait]
impl PlaylistProvider for PlaylistProviderMock {
    async fn get_playlist(
        &self,
        playlist_id: &PlaylistId,
    ) -> Result<Playlist, PlaylistProviderError> {
        self.playlists
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| PlaylistProviderError::Malformed("missing field `list`".into()))
    }
}

pub(crate) enum MediaResponse {
    Link(MediaLink),
    Unavailable,
    Malformed,
    Unreachable,
    Panic,
}

pub(crate) struct MediaResolverMock {
    responses: HashMap<TrackId, MediaResponse>,
    delay: Option<Duration>,
    requested: Mutex<Vec<TrackId>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MediaResolverMock {
    pub(crate) fn new(responses: Vec<(u64, MediaResponse)>) -> Self {
        Self {
            responses: responses
                .into_iter()
                .map(|(id, response)| (TrackId(id), response))
                .collect(),
            delay: None,
            requested: Mutex::new(vec![]),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_links(ids: &[u64]) -> Self {
        Self::new(
            ids.iter()
                .map(|id| (*id, MediaResponse::Link(media_link(*id))))
                .collect(),
        )
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn requested(&self) -> Vec<TrackId> {
        self.requested.lock().unwrap().clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaResolver for MediaResolverMock {
    async fn resolve_media(&self, track_id: &TrackId) -> Result<MediaLink, MediaResolverError> {
        self.requested.lock().unwrap().push(*track_id);

        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.responses.get(track_id) {
            Some(MediaResponse::Link(link)) => Ok(link.clone()),
            Some(MediaResponse::Unavailable) => Err(MediaResolverError::Unavailable(
                "upstream error code 22005".into(),
            )),
            Some(MediaResponse::Malformed) => Err(MediaResolverError::Decode(
                "expected value at line 1 column 1".into(),
            )),
            Some(MediaResponse::Unreachable) | None => Err(MediaResolverError::Transport(
                Box::new(Error::new(ErrorKind::ConnectionRefused, "connection refused")),
            )),
            Some(MediaResponse::Panic) => panic!("Resolver exploded for track {}", track_id),
        }
    }
}

#[derive(Default)]
pub(crate) struct MediaStorageMock {
    failing_urls: HashSet<String>,
    fail_directories: bool,
    directories: Mutex<Vec<String>>,
    saved_files: Mutex<Vec<(String, PathBuf)>>,
}

impl MediaStorageMock {
    pub(crate) fn failing_on(urls: &[&str]) -> Self {
        Self {
            failing_urls: urls.iter().map(|url| url.to_string()).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn read_only() -> Self {
        Self {
            fail_directories: true,
            ..Self::default()
        }
    }

    pub(crate) fn directories(&self) -> Vec<String> {
        self.directories.lock().unwrap().clone()
    }

    pub(crate) fn saved_files(&self) -> Vec<(String, PathBuf)> {
        let mut saved_files = self.saved_files.lock().unwrap().clone();
        saved_files.sort();
        saved_files
    }
}

#[async_trait]
impl MediaStorage for MediaStorageMock {
    async fn create_directory(&self, name: &str) -> Result<PathBuf, MediaStorageError> {
        if self.fail_directories {
            return Err(Error::new(ErrorKind::PermissionDenied, "read-only file system").into());
        }

        self.directories.lock().unwrap().push(name.to_string());

        Ok(Path::new(MUSIC_DIRECTORY).join(name))
    }

    async fn save_media(
        &self,
        media_url: &str,
        file_path: &Path,
    ) -> Result<u64, MediaStorageError> {
        if self.failing_urls.contains(media_url) {
            return Err(Error::new(ErrorKind::Other, "disk full").into());
        }

        self.saved_files
            .lock()
            .unwrap()
            .push((media_url.to_string(), file_path.to_path_buf()));

        Ok(media_url.len() as u64 * 1024)
    }
}
