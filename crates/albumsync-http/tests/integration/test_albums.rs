//! Album listing, creation, update and deletion over HTTP

use wiremock::matchers::{bearer_token, body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use albumsync_core::domain::{AlbumAccess, AlbumId};
use albumsync_core::ports::{AlbumServiceError, IAlbumService};

use crate::common::{self, album_json, TOKEN};

#[tokio::test]
async fn test_list_albums_decodes_wrapper() {
    let (server, service) = common::setup_album_mock().await;

    Mock::given(method("GET"))
        .and(path("/accounts/jane/albums"))
        .and(bearer_token(TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "albums": [
                album_json("a1", "Trip", "public"),
                album_json("a2", "Family", "private")
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let albums = service.list_albums("jane").await.expect("list_albums failed");

    assert_eq!(albums.len(), 2);
    assert_eq!(albums[0].id.as_str(), "a1");
    assert_eq!(albums[0].title, "Trip");
    assert_eq!(albums[0].access, AlbumAccess::Public);
    assert_eq!(albums[1].access, AlbumAccess::Private);
}

#[tokio::test]
async fn test_create_album_posts_title_summary_access() {
    let (server, service) = common::setup_album_mock().await;

    Mock::given(method("POST"))
        .and(path("/accounts/jane/albums"))
        .and(body_json(serde_json::json!({
            "title": "Trip",
            "summary": "Trip",
            "access": "public"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(album_json("a9", "Trip", "public")))
        .expect(1)
        .mount(&server)
        .await;

    let album = service
        .create_album("jane", "Trip", "Trip", AlbumAccess::Public)
        .await
        .expect("create_album failed");

    assert_eq!(album.id.as_str(), "a9");
    assert_eq!(album.access, AlbumAccess::Public);
}

#[tokio::test]
async fn test_update_album_puts_full_album() {
    let (server, service) = common::setup_album_mock().await;

    Mock::given(method("PUT"))
        .and(path("/albums/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(album_json("a1", "Trip", "private")))
        .expect(1)
        .mount(&server)
        .await;

    let current: albumsync_core::domain::RemoteAlbum =
        serde_json::from_value(album_json("a1", "Trip", "public")).unwrap();
    let updated = service
        .update_album(&current.with_access(AlbumAccess::Private, chrono::Utc::now()))
        .await
        .expect("update_album failed");

    assert_eq!(updated.access, AlbumAccess::Private);

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["title"], "Trip");
    assert_eq!(sent["access"], "private");
}

#[tokio::test]
async fn test_delete_album() {
    let (server, service) = common::setup_album_mock().await;

    Mock::given(method("DELETE"))
        .and(path("/albums/a1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let id = AlbumId::new("a1".into()).unwrap();
    service.delete_album(&id).await.expect("delete_album failed");
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let (server, service) = common::setup_album_mock().await;

    Mock::given(method("GET"))
        .and(path("/accounts/jane/albums"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let err = service.list_albums("jane").await.unwrap_err();
    assert!(err.is_authentication());
    assert!(matches!(err, AlbumServiceError::Unauthorized(m) if m == "token expired"));
}

#[tokio::test]
async fn test_missing_album_maps_to_not_found() {
    let (server, service) = common::setup_album_mock().await;

    Mock::given(method("DELETE"))
        .and(path("/albums/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let id = AlbumId::new("gone".into()).unwrap();
    let err = service.delete_album(&id).await.unwrap_err();
    assert!(matches!(err, AlbumServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_server_error_maps_to_rejected() {
    let (server, service) = common::setup_album_mock().await;

    Mock::given(method("GET"))
        .and(path("/accounts/jane/albums"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = service.list_albums("jane").await.unwrap_err();
    assert!(!err.is_authentication());
    assert!(matches!(
        err,
        AlbumServiceError::Rejected { status: 500, ref message } if message == "boom"
    ));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let (server, service) = common::setup_album_mock().await;

    Mock::given(method("GET"))
        .and(path("/accounts/jane/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = service.list_albums("jane").await.unwrap_err();
    assert!(matches!(err, AlbumServiceError::InvalidResponse(_)));
}
