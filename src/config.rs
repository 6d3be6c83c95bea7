use download_processors::DEFAULT_DOWNLOAD_CONCURRENCY;
use serde::Deserialize;
use std::time::Duration;

const ENV_PREFIX: &str = "FM_DL_";

fn default_playlist_endpoint() -> String {
    fm_api::DEFAULT_PLAYLIST_ENDPOINT.to_string()
}

fn default_media_link_endpoint() -> String {
    fm_api::DEFAULT_MEDIA_LINK_ENDPOINT.to_string()
}

fn default_output_directory() -> String {
    ".".to_string()
}

fn default_download_concurrency() -> usize {
    DEFAULT_DOWNLOAD_CONCURRENCY
}

fn default_request_timeout() -> u64 {
    30u64
}

fn default_stream_idle_timeout() -> u64 {
    60u64
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Config {
    #[serde(default = "default_playlist_endpoint")]
    pub(crate) playlist_endpoint: String,
    #[serde(default = "default_media_link_endpoint")]
    pub(crate) media_link_endpoint: String,
    #[serde(default = "default_output_directory")]
    pub(crate) output_directory: String,
    #[serde(default = "default_download_concurrency")]
    pub(crate) download_concurrency: usize,
    /// Seconds.
    #[serde(default = "default_request_timeout")]
    pub(crate) request_timeout: u64,
    /// Seconds without a single received chunk before a media stream is abandoned.
    #[serde(default = "default_stream_idle_timeout")]
    pub(crate) stream_idle_timeout: u64,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    pub(crate) fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter(vars)
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub(crate) fn stream_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.stream_idle_timeout)
    }
}
