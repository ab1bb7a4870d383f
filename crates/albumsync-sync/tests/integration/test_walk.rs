//! Folder walk: titles, ordering, exclusion, access and run-level errors

use albumsync_core::domain::AlbumAccess;
use albumsync_sync::{SyncError, SyncOptions};

use crate::common::*;

#[tokio::test]
async fn test_trip_with_two_photos_creates_album_and_uploads_oldest_first() {
    let dir = tempfile::tempdir().unwrap();
    let trip = folder(dir.path(), "Trip");
    // written newest first so directory order cannot explain the result
    file_at(&trip, "b.jpg", b"bbb", at(2024, 1, 2));
    file_at(&trip, "a.jpg", b"aaa", at(2024, 1, 1));

    let service = FakeAlbumService::new();
    let summary = engine(
        &service,
        SyncOptions {
            include_extensions: vec!["jpg".into()],
            ..options()
        },
    )
    .run(&trip)
    .await
    .unwrap();

    assert_eq!(
        service.calls(),
        vec![
            Call::ListAlbums("tester".into()),
            Call::CreateAlbum {
                title: "Trip".into(),
                summary: "Trip".into(),
                access: AlbumAccess::Private,
            },
            Call::ListEntries("Trip".into()),
            Call::Upload {
                album: "Trip".into(),
                file_name: "a.jpg".into(),
                content_type: "image/jpeg".into(),
            },
            Call::Upload {
                album: "Trip".into(),
                file_name: "b.jpg".into(),
                content_type: "image/jpeg".into(),
            },
        ]
    );
    assert_eq!(summary.albums_created, 1);
    assert_eq!(summary.files_uploaded, 2);
    assert_eq!(summary.errors, 0);
    assert_eq!(service.uploaded_data("a.jpg").unwrap(), b"aaa");
}

#[tokio::test]
async fn test_empty_folder_makes_no_remote_calls() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Empty");
    file(&root, "notes.txt");

    let service = FakeAlbumService::new();
    let summary = engine(&service, options()).run(&root).await.unwrap();

    assert_eq!(service.calls(), vec![Call::ListAlbums("tester".into())]);
    assert!(summary.is_noop());
}

#[tokio::test]
async fn test_subfolders_are_ignored_unless_recursive() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");
    file(&folder(&root, "Day1"), "a.jpg");

    let service = FakeAlbumService::new();
    engine(&service, options()).run(&root).await.unwrap();

    assert!(service.created_albums().is_empty());
}

#[tokio::test]
async fn test_recursive_walk_is_pre_order_with_prefixed_titles() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");
    file(&root, "root.jpg");
    let day1 = folder(&root, "Day1");
    file(&day1, "d1.jpg");
    file(&folder(&day1, "Morning"), "m.jpg");
    let day2 = folder(&root, "Day2");
    file(&day2, "d2.jpg");

    let service = FakeAlbumService::new();
    let summary = engine(
        &service,
        SyncOptions {
            recursive: true,
            ..options()
        },
    )
    .run(&root)
    .await
    .unwrap();

    let titles: Vec<String> = service.created_albums().into_iter().map(|(t, _)| t).collect();
    assert_eq!(titles, vec!["Trip", "Day1", "Day1 - Morning", "Day2"]);
    assert_eq!(summary.albums_created, 4);
    assert_eq!(summary.files_uploaded, 4);
}

#[tokio::test]
async fn test_root_name_is_kept_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");
    file(&folder(&root, "Day1"), "a.jpg");

    let service = FakeAlbumService::new();
    engine(
        &service,
        SyncOptions {
            recursive: true,
            include_root_name: true,
            ..options()
        },
    )
    .run(&root)
    .await
    .unwrap();

    assert_eq!(
        service.created_albums(),
        vec![("Trip - Day1".to_string(), AlbumAccess::Private)]
    );
}

#[tokio::test]
async fn test_excluded_folder_prunes_its_subtree() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");
    let drafts = folder(&root, "_drafts");
    file(&drafts, "x.jpg");
    file(&folder(&drafts, "inner"), "y.jpg");

    let service = FakeAlbumService::new();
    let summary = engine(
        &service,
        SyncOptions {
            recursive: true,
            exclude_folder_prefixes: vec!["_".into()],
            ..options()
        },
    )
    .run(&root)
    .await
    .unwrap();

    assert!(service.changes().is_empty());
    assert_eq!(summary.folders_skipped, 1);
}

#[tokio::test]
async fn test_excluded_folder_deletes_its_existing_album() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");
    file(&root, ".nosync");
    file(&root, "a.jpg");

    let service = FakeAlbumService::new();
    service.with_album("Trip", AlbumAccess::Private);
    let summary = engine(
        &service,
        SyncOptions {
            exclude_folder_marker: Some(".nosync".into()),
            ..options()
        },
    )
    .run(&root)
    .await
    .unwrap();

    assert_eq!(service.changes(), vec![Call::DeleteAlbum("Trip".into())]);
    assert_eq!(summary.albums_deleted, 1);
    assert_eq!(summary.folders_skipped, 0);
}

#[tokio::test]
async fn test_excluded_folder_keeps_album_in_add_only_mode() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "_Trip");
    file(&root, "a.jpg");

    let service = FakeAlbumService::new();
    service.with_album("_Trip", AlbumAccess::Private);
    let summary = engine(
        &service,
        SyncOptions {
            exclude_folder_prefixes: vec!["_".into()],
            add_only: true,
            ..options()
        },
    )
    .run(&root)
    .await
    .unwrap();

    assert!(!service.has_deletes());
    assert_eq!(summary.folders_skipped, 1);
    assert_eq!(summary.albums_deleted, 0);
}

#[tokio::test]
async fn test_access_markers_override_and_children_inherit_resolved_access() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");
    file(&root, "r.jpg");
    let secret = folder(&root, "Secret");
    file(&secret, ".private");
    file(&secret, "s.jpg");
    file(&folder(&secret, "Deeper"), "d.jpg");
    file(&folder(&root, "Open"), "o.jpg");

    let service = FakeAlbumService::new();
    engine(
        &service,
        SyncOptions {
            recursive: true,
            default_access: AlbumAccess::Public,
            private_marker_file: Some(".private".into()),
            ..options()
        },
    )
    .run(&root)
    .await
    .unwrap();

    assert_eq!(
        service.created_albums(),
        vec![
            ("Trip".to_string(), AlbumAccess::Public),
            ("Secret".to_string(), AlbumAccess::Private),
            ("Secret - Deeper".to_string(), AlbumAccess::Private),
            ("Open".to_string(), AlbumAccess::Public),
        ]
    );
}

#[tokio::test]
async fn test_empty_folder_still_passes_its_access_down() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");
    file(&root, ".public");
    file(&folder(&root, "Day1"), "a.jpg");

    let service = FakeAlbumService::new();
    engine(
        &service,
        SyncOptions {
            recursive: true,
            public_marker_file: Some(".public".into()),
            ..options()
        },
    )
    .run(&root)
    .await
    .unwrap();

    assert_eq!(
        service.created_albums(),
        vec![("Day1".to_string(), AlbumAccess::Public)]
    );
}

#[tokio::test]
async fn test_private_folder_name_forces_private() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Family");
    file(&root, ".public");
    file(&root, "a.jpg");

    let service = FakeAlbumService::new();
    engine(
        &service,
        SyncOptions {
            default_access: AlbumAccess::Public,
            private_folder_names: vec!["Family".into()],
            public_marker_file: Some(".public".into()),
            ..options()
        },
    )
    .run(&root)
    .await
    .unwrap();

    assert_eq!(
        service.created_albums(),
        vec![("Family".to_string(), AlbumAccess::Private)]
    );
}

#[tokio::test]
async fn test_existing_album_with_other_access_is_updated() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");
    file(&root, "a.jpg");

    let service = FakeAlbumService::new();
    service.with_album("Trip", AlbumAccess::Private);
    let summary = engine(
        &service,
        SyncOptions {
            default_access: AlbumAccess::Public,
            ..options()
        },
    )
    .run(&root)
    .await
    .unwrap();

    assert_eq!(
        service.changes()[0],
        Call::UpdateAlbum {
            title: "Trip".into(),
            access: AlbumAccess::Public,
        }
    );
    assert_eq!(summary.albums_updated, 1);
    assert_eq!(summary.albums_created, 0);
}

#[tokio::test]
async fn test_existing_album_with_same_access_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");
    file(&root, "a.jpg");

    let service = FakeAlbumService::new();
    service.with_album("Trip", AlbumAccess::Private);
    let summary = engine(&service, options()).run(&root).await.unwrap();

    assert_eq!(summary.albums_updated, 0);
    assert_eq!(summary.albums_created, 0);
    assert_eq!(service.uploads(), vec!["a.jpg"]);
}

#[tokio::test]
async fn test_first_album_with_matching_title_wins() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");
    file(&root, "a.jpg");

    let service = FakeAlbumService::new();
    let first = service.with_album("Trip", AlbumAccess::Private);
    service.with_album("Trip", AlbumAccess::Private);
    service.with_entry(&first, "a.jpg", at(2025, 1, 1));

    let summary = engine(&service, options()).run(&root).await.unwrap();

    assert!(service.uploads().is_empty());
    assert_eq!(summary.files_skipped, 1);
}

#[tokio::test]
async fn test_authentication_failure_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");
    file(&root, "a.jpg");

    let service = FakeAlbumService::new();
    service.fail_listing(ListingFailure::Unauthorized);
    let result = engine(&service, options()).run(&root).await;

    assert!(matches!(result, Err(SyncError::Authentication(_))));
    assert_eq!(service.calls().len(), 1);
}

#[tokio::test]
async fn test_listing_failure_aborts_with_remote_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");

    let service = FakeAlbumService::new();
    service.fail_listing(ListingFailure::Network);
    let result = engine(&service, options()).run(&root).await;

    assert!(matches!(result, Err(SyncError::Remote(_))));
}

#[tokio::test]
async fn test_missing_root_is_reported_before_contacting_the_service() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let service = FakeAlbumService::new();
    let result = engine(&service, options()).run(&missing).await;

    assert!(matches!(result, Err(SyncError::RootNotFound(p)) if p == missing));
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn test_failed_album_removal_is_counted_as_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = folder(dir.path(), "Trip");
    file(&root, ".nosync");
    file(&root, "a.jpg");

    let service = FakeAlbumService::new();
    service.with_album("Trip", AlbumAccess::Private);
    service.fail_delete_album("Trip");
    let summary = engine(
        &service,
        SyncOptions {
            exclude_folder_marker: Some(".nosync".into()),
            ..options()
        },
    )
    .run(&root)
    .await
    .unwrap();

    assert_eq!(service.changes(), vec![Call::DeleteAlbum("Trip".into())]);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.albums_deleted, 0);
    assert_eq!(summary.folders_skipped, 0);
    assert!(service.uploads().is_empty());
}
