use super::collector::ClaimedPaths;
use super::downloader::{media_file_name, TrackDownloader};
use super::mocks::{media_link, MediaResolverMock, MediaResponse, MediaStorageMock};
use super::types::{MediaLink, TrackDescriptor, TrackDownloadError, TrackDownloadStatus};
use crate::TrackId;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn create_downloader(
    resolver: &Arc<MediaResolverMock>,
    storage: &Arc<MediaStorageMock>,
) -> TrackDownloader {
    TrackDownloader::new(resolver.clone(), storage.clone())
}

#[tokio::test]
async fn should_download_resolved_track_into_destination() {
    let resolver = Arc::new(MediaResolverMock::with_links(&[101]));
    let storage = Arc::new(MediaStorageMock::default());

    let outcome = create_downloader(&resolver, &storage)
        .download(
            &TrackDescriptor::new(TrackId(101)),
            Path::new("/music/Chill"),
            &ClaimedPaths::default(),
        )
        .await;

    assert_eq!(TrackId(101), outcome.track_id);
    assert!(outcome.is_success());
    assert!(matches!(
        outcome.status,
        TrackDownloadStatus::Succeeded { ref file_path, .. }
            if file_path == &PathBuf::from("/music/Chill/Song101-Artist101.flac")
    ));
    assert_eq!(
        vec![(
            media_link(101).url,
            PathBuf::from("/music/Chill/Song101-Artist101.flac")
        )],
        storage.saved_files()
    );
}

#[tokio::test]
async fn should_skip_placeholder_without_resolving() {
    let resolver = Arc::new(MediaResolverMock::with_links(&[101]));
    let storage = Arc::new(MediaStorageMock::default());

    let outcome = create_downloader(&resolver, &storage)
        .download(
            &TrackDescriptor::new(TrackId(0)),
            Path::new("/music/Chill"),
            &ClaimedPaths::default(),
        )
        .await;

    assert!(matches!(outcome.status, TrackDownloadStatus::Skipped));
    assert!(outcome.error().is_none());
    assert!(resolver.requested().is_empty());
    assert!(storage.saved_files().is_empty());
}

#[tokio::test]
async fn should_record_unavailable_track_as_resolution_failure() {
    let resolver = Arc::new(MediaResolverMock::new(vec![(
        202,
        MediaResponse::Unavailable,
    )]));
    let storage = Arc::new(MediaStorageMock::default());

    let outcome = create_downloader(&resolver, &storage)
        .download(
            &TrackDescriptor::new(TrackId(202)),
            Path::new("/music/Chill"),
            &ClaimedPaths::default(),
        )
        .await;

    assert!(matches!(
        outcome.status,
        TrackDownloadStatus::ResolutionFailed(TrackDownloadError::UpstreamUnavailable(_))
    ));
    assert!(storage.saved_files().is_empty());
}

#[tokio::test]
async fn should_record_malformed_response_as_resolution_failure() {
    let resolver = Arc::new(MediaResolverMock::new(vec![(303, MediaResponse::Malformed)]));
    let storage = Arc::new(MediaStorageMock::default());

    let outcome = create_downloader(&resolver, &storage)
        .download(
            &TrackDescriptor::new(TrackId(303)),
            Path::new("/music/Chill"),
            &ClaimedPaths::default(),
        )
        .await;

    assert!(matches!(
        outcome.status,
        TrackDownloadStatus::ResolutionFailed(TrackDownloadError::Decode(_))
    ));
}

#[tokio::test]
async fn should_record_unreachable_upstream_as_resolution_failure() {
    let resolver = Arc::new(MediaResolverMock::new(vec![(
        404,
        MediaResponse::Unreachable,
    )]));
    let storage = Arc::new(MediaStorageMock::default());

    let outcome = create_downloader(&resolver, &storage)
        .download(
            &TrackDescriptor::new(TrackId(404)),
            Path::new("/music/Chill"),
            &ClaimedPaths::default(),
        )
        .await;

    assert!(matches!(
        outcome.status,
        TrackDownloadStatus::ResolutionFailed(TrackDownloadError::Transport(_))
    ));
}

#[tokio::test]
async fn should_reject_implausibly_short_media_url() {
    for url in ["", "http://", "123456789"] {
        let resolver = Arc::new(MediaResolverMock::new(vec![(
            505,
            MediaResponse::Link(MediaLink {
                url: url.to_string(),
                ..media_link(505)
            }),
        )]));
        let storage = Arc::new(MediaStorageMock::default());

        let outcome = create_downloader(&resolver, &storage)
            .download(
                &TrackDescriptor::new(TrackId(505)),
                Path::new("/music/Chill"),
                &ClaimedPaths::default(),
            )
            .await;

        assert!(
            matches!(
                outcome.status,
                TrackDownloadStatus::ResolutionFailed(TrackDownloadError::Validation(_))
            ),
            "url {:?} should be rejected",
            url
        );
        assert!(storage.saved_files().is_empty());
    }
}

#[tokio::test]
async fn should_accept_media_url_of_minimal_length() {
    let resolver = Arc::new(MediaResolverMock::new(vec![(
        606,
        MediaResponse::Link(MediaLink {
            url: "ftp://a.io".into(),
            ..media_link(606)
        }),
    )]));
    let storage = Arc::new(MediaStorageMock::default());

    let outcome = create_downloader(&resolver, &storage)
        .download(
            &TrackDescriptor::new(TrackId(606)),
            Path::new("/music/Chill"),
            &ClaimedPaths::default(),
        )
        .await;

    assert!(outcome.is_success());
}

#[tokio::test]
async fn should_record_storage_failure_as_download_failure() {
    let resolver = Arc::new(MediaResolverMock::with_links(&[101]));
    let storage = Arc::new(MediaStorageMock::failing_on(&[&media_link(101).url]));

    let outcome = create_downloader(&resolver, &storage)
        .download(
            &TrackDescriptor::new(TrackId(101)),
            Path::new("/music/Chill"),
            &ClaimedPaths::default(),
        )
        .await;

    assert!(matches!(
        outcome.status,
        TrackDownloadStatus::DownloadFailed(TrackDownloadError::Filesystem(_))
    ));
}

#[tokio::test]
async fn should_refuse_file_already_claimed_by_another_track() {
    let resolver = Arc::new(MediaResolverMock::with_links(&[101]));
    let storage = Arc::new(MediaStorageMock::default());
    let claimed_paths = ClaimedPaths::default();
    assert!(
        claimed_paths
            .claim(Path::new("/music/Chill/Song101-Artist101.flac"))
            .await
    );

    let outcome = create_downloader(&resolver, &storage)
        .download(
            &TrackDescriptor::new(TrackId(101)),
            Path::new("/music/Chill"),
            &claimed_paths,
        )
        .await;

    assert!(matches!(
        outcome.status,
        TrackDownloadStatus::DownloadFailed(TrackDownloadError::Conflict(ref path))
            if path == &PathBuf::from("/music/Chill/Song101-Artist101.flac")
    ));
    assert!(storage.saved_files().is_empty());
}

#[test]
fn should_build_file_name_from_title_and_artist() {
    assert_eq!("Song101-Artist101.flac", media_file_name(&media_link(101)));
}

#[test]
fn should_sanitize_file_name() {
    let media = MediaLink {
        url: "http://file.example.com/1.flac".into(),
        title: "Back/In: Black?".into(),
        artist: "AC/DC".into(),
        extension: Some("flac".into()),
    };

    assert_eq!("Back_In_ Black_-AC_DC.flac", media_file_name(&media));
}

#[test]
fn should_fall_back_to_lossless_extension() {
    let without_format = MediaLink {
        extension: None,
        ..media_link(1)
    };
    let with_blank_format = MediaLink {
        extension: Some(" ".into()),
        ..media_link(1)
    };
    let with_other_format = MediaLink {
        extension: Some("ape".into()),
        ..media_link(1)
    };

    assert_eq!("Song1-Artist1.flac", media_file_name(&without_format));
    assert_eq!("Song1-Artist1.flac", media_file_name(&with_blank_format));
    assert_eq!("Song1-Artist1.ape", media_file_name(&with_other_format));
}
