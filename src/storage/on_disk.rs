use async_trait::async_trait;
use download_processors::{MediaStorage, MediaStorageError};
use fm_api::{FetchError, Fetcher, MediaStream};
use std::path::{Path, PathBuf};
use tokio::fs::{create_dir_all, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

pub(crate) struct OnDiskStorage {
    path: PathBuf,
    fetcher: Fetcher,
}

impl OnDiskStorage {
    pub(crate) fn create(path: impl Into<PathBuf>, fetcher: Fetcher) -> Self {
        Self {
            path: path.into(),
            fetcher,
        }
    }
}

fn transport_error(error: FetchError) -> MediaStorageError {
    MediaStorageError::Transport(Box::new(error))
}

async fn write_stream(
    stream: &mut MediaStream,
    file: &mut File,
) -> Result<u64, MediaStorageError> {
    let mut bytes_written = 0u64;

    while let Some(chunk) = stream.next_chunk().await.map_err(transport_error)? {
        file.write_all(&chunk).await?;
        bytes_written += chunk.len() as u64;
    }

    file.flush().await?;

    Ok(bytes_written)
}

#[async_trait]
impl MediaStorage for OnDiskStorage {
    async fn create_directory(&self, name: &str) -> Result<PathBuf, MediaStorageError> {
        let path = self.path.join(name);

        create_dir_all(&path).await?;

        Ok(path)
    }

    async fn save_media(
        &self,
        media_url: &str,
        file_path: &Path,
    ) -> Result<u64, MediaStorageError> {
        let mut stream = self
            .fetcher
            .open_stream(media_url)
            .await
            .map_err(transport_error)?;

        debug!(
            media_url,
            content_length = ?stream.content_length(),
            "Media stream opened"
        );

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(file_path)
            .await?;

        let result = write_stream(&mut stream, &mut file).await;

        if result.is_err() {
            drop(file);

            if let Err(error) = tokio::fs::remove_file(file_path).await {
                warn!(?error, ?file_path, "Unable to remove partially written file");
            }
        }

        result
    }
}
