use async_trait::async_trait;
use download_processors::{
    MediaLink, MediaResolver, MediaResolverError, Playlist, PlaylistId, PlaylistProvider,
    PlaylistProviderError, TrackDescriptor, TrackId,
};
use fm_api::{FetchError, FmClient, FmClientError, ParseError, PlaylistEntry, SongId, SongLink};
use std::sync::Arc;
use tracing::warn;

/// Exposes [`FmClient`] to the download processor.
#[derive(Clone)]
pub(crate) struct FmService(pub(crate) Arc<FmClient>);

fn into_track_descriptor(entry: PlaylistEntry) -> TrackDescriptor {
    TrackDescriptor {
        id: TrackId::from(*entry.id),
        kind: entry.kind,
        method: entry.method,
        flow_mark: entry.flow_mark,
    }
}

fn into_media_link(song_link: SongLink) -> MediaLink {
    MediaLink {
        url: song_link.link,
        title: song_link.name,
        artist: song_link.artist,
        extension: song_link.format,
    }
}

#[async_trait]
impl PlaylistProvider for FmService {
    async fn get_playlist(
        &self,
        playlist_id: &PlaylistId,
    ) -> Result<Playlist, PlaylistProviderError> {
        let playlist = self
            .0
            .get_playlist(playlist_id)
            .await
            .map_err(|error| match error {
                FmClientError::FetchError(error) => PlaylistProviderError::Transport(Box::new(error)),
                FmClientError::ParseError(error) => {
                    PlaylistProviderError::Malformed(error.to_string())
                }
            })?;

        Ok(Playlist {
            channel_name: playlist.channel_name,
            tracks: playlist
                .entries
                .into_iter()
                .map(into_track_descriptor)
                .collect(),
        })
    }
}

#[async_trait]
impl MediaResolver for FmService {
    async fn resolve_media(&self, track_id: &TrackId) -> Result<MediaLink, MediaResolverError> {
        let song_link = self
            .0
            .get_song_link(&SongId::from(**track_id))
            .await
            .map_err(|error| match error {
                FmClientError::FetchError(error @ FetchError::Decode { .. }) => {
                    MediaResolverError::Decode(error.to_string())
                }
                FmClientError::FetchError(error) => MediaResolverError::Transport(Box::new(error)),
                FmClientError::ParseError(ParseError::Unavailable(reason)) => {
                    MediaResolverError::Unavailable(reason)
                }
                FmClientError::ParseError(error) => {
                    warn!(%track_id, %error, "Unexpected media link response");
                    MediaResolverError::Decode(error.to_string())
                }
            })?;

        Ok(into_media_link(song_link))
    }
}
