use crate::fm::parser::{parse_playlist, parse_song_link, ParseError};
use crate::fm::types::{Playlist, SongLink};
use crate::{FetchError, Fetcher, SongId};
use tracing::debug;

pub const DEFAULT_PLAYLIST_ENDPOINT: &str = "http://fm.baidu.com/dev/api/";
pub const DEFAULT_MEDIA_LINK_ENDPOINT: &str = "http://music.baidu.com/data/music/fmlink";

const LOSSLESS_CODEC: &str = "flac";

#[derive(Debug, thiserror::Error)]
pub enum FmClientError {
    #[error(transparent)]
    FetchError(#[from] FetchError),
    #[error(transparent)]
    ParseError(#[from] ParseError),
}

pub struct FmClient {
    fetcher: Fetcher,
    playlist_endpoint: String,
    media_link_endpoint: String,
}

impl FmClient {
    pub fn create(fetcher: Fetcher, playlist_endpoint: &str, media_link_endpoint: &str) -> Self {
        Self {
            fetcher,
            playlist_endpoint: playlist_endpoint.to_string(),
            media_link_endpoint: media_link_endpoint.to_string(),
        }
    }

    pub async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist, FmClientError> {
        let raw = self
            .fetcher
            .fetch(
                &self.playlist_endpoint,
                &[("tn", "playlist"), ("format", "json"), ("id", playlist_id)],
            )
            .await?;

        debug!(playlist_id, size = raw.len(), "Playlist response received");

        Ok(parse_playlist(&raw)?)
    }

    pub async fn get_song_link(&self, song_id: &SongId) -> Result<SongLink, FmClientError> {
        let song_ids = song_id.to_string();

        let raw = self
            .fetcher
            .fetch(
                &self.media_link_endpoint,
                &[("songIds", song_ids.as_str()), ("type", LOSSLESS_CODEC)],
            )
            .await?;

        debug!(%song_id, size = raw.len(), "Song link response received");

        Ok(parse_song_link(&raw)?)
    }
}
