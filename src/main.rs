use crate::config::Config;
use crate::impls::FmService;
use crate::storage::OnDiskStorage;
use clap::Parser;
use download_processors::{PlaylistDownloadProcessor, PlaylistId};
use fm_api::{FetchError, Fetcher, FmClient};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod impls;
mod storage;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Downloads the lossless audio files of every track in an FM playlist.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Playlist identifier, e.g. public_tuijian_rege
    playlist_id: String,
}

pub(crate) fn create_processor(config: &Config) -> Result<PlaylistDownloadProcessor, FetchError> {
    let fetcher = Fetcher::create(config.request_timeout(), config.stream_idle_timeout())?;
    let fm_service = Arc::new(FmService(Arc::new(FmClient::create(
        fetcher.clone(),
        &config.playlist_endpoint,
        &config.media_link_endpoint,
    ))));
    let media_storage = OnDiskStorage::create(&config.output_directory, fetcher);

    Ok(PlaylistDownloadProcessor::new(
        fm_service.clone(),
        fm_service,
        Arc::new(media_storage),
        config.download_concurrency,
    ))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            error!(%error, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(version = VERSION, playlist_id = %args.playlist_id, "Starting download...");

    let processor = match create_processor(&config) {
        Ok(processor) => processor,
        Err(error) => {
            error!(%error, "Unable to initialize HTTP client");
            return ExitCode::FAILURE;
        }
    };

    match processor.run(&PlaylistId::from(args.playlist_id)).await {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!(%error, "Unable to download playlist");
            ExitCode::FAILURE
        }
    }
}
