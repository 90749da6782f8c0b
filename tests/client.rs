use std::collections::HashMap;
use std::time::Duration;

use mockito::Matcher;
use unsplash::{
    Client, Cursor, ImageUrlCache, Photo, RequestError, RequestOptions, SearchResponse,
    UnsplashConfig,
};
use url::Url;

const ACCESS_KEY: &str = "test-access-key";
const PHOTO_JSON: &str = include_str!("fixtures/photo.json");

fn client_for(server: &mockito::Server) -> Client {
    let config = UnsplashConfig::new(ACCESS_KEY, "test-secret")
        .with_api_url(Url::parse(&server.url()).unwrap());
    Client::with_cache(config, ImageUrlCache::new()).unwrap()
}

#[tokio::test]
async fn random_photo_sends_default_headers_and_decodes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/photos/random")
        .match_header("Accept-Version", "v1")
        .match_header("Authorization", "Client-ID test-access-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PHOTO_JSON)
        .create_async()
        .await;

    let photo = client_for(&server).random_photo().await.unwrap();

    assert_eq!(photo.id(), "Dwu85P9SOIk");
    assert_eq!(photo.user().username(), "exampleuser");
    mock.assert_async().await;
}

#[tokio::test]
async fn caller_headers_override_the_defaults() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/photos/random")
        .match_header("Authorization", "XXX")
        .match_header("Accept-Version", "v1")
        .with_status(200)
        .with_body(PHOTO_JSON)
        .create_async()
        .await;

    let options = RequestOptions::new("/photos/random")
        .headers(HashMap::from([("Authorization".to_owned(), "XXX".to_owned())]));
    let photo: Photo = client_for(&server).send(options).await.unwrap();

    assert_eq!(photo.id(), "Dwu85P9SOIk");
    mock.assert_async().await;
}

#[tokio::test]
async fn search_photos_carries_query_and_pagination() {
    let mut server = mockito::Server::new_async().await;
    let body = format!(
        r#"{{"total": 133, "total_pages": 7, "results": [{PHOTO_JSON}]}}"#
    );
    let mock = server
        .mock("GET", "/search/photos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "forest".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("per_page".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let response: SearchResponse = client_for(&server)
        .search_photos("forest", Cursor::new(2, 10))
        .await
        .unwrap();

    assert_eq!(response.total, 133);
    assert_eq!(response.total_pages, 7);
    assert_eq!(response.results.len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn collection_photos_carries_pagination_params() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/collections/317099/photos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), "317099".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("per_page".into(), "30".into()),
        ]))
        .with_status(200)
        .with_body(format!("[{PHOTO_JSON}]"))
        .create_async()
        .await;

    let photos = client_for(&server)
        .collection_photos(UnsplashConfig::EDITORIAL_COLLECTION_ID, Cursor::new(1, 30))
        .await
        .unwrap();

    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].id(), "Dwu85P9SOIk");
    mock.assert_async().await;
}

#[tokio::test]
async fn failure_range_status_surfaces_as_http_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/photos/random")
        .with_status(404)
        .with_body(r#"{"errors": ["Photo not found"]}"#)
        .create_async()
        .await;

    let error = client_for(&server).random_photo().await.unwrap_err();

    assert!(matches!(error, RequestError::Http(status) if status.as_u16() == 404));
}

#[tokio::test]
async fn server_errors_fall_outside_both_ranges() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/photos/random")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let error = client_for(&server).random_photo().await.unwrap_err();

    assert!(matches!(error, RequestError::InvalidUrl));
}

#[tokio::test]
async fn unreachable_server_maps_to_not_connected() {
    // Bind then drop a listener so the port is guaranteed closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let config = UnsplashConfig::new(ACCESS_KEY, "test-secret")
        .with_api_url(Url::parse(&format!("http://{address}/")).unwrap());
    let client = Client::with_cache(config, ImageUrlCache::new()).unwrap();

    let error = client.random_photo().await.unwrap_err();

    assert!(matches!(error, RequestError::NotConnectedToInternet));
}

#[tokio::test]
async fn track_download_fires_the_beacon_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/photos/Dwu85P9SOIk/download")
        .match_query(Matcher::UrlEncoded(
            "client_id".into(),
            ACCESS_KEY.into(),
        ))
        .expect(1)
        .with_status(200)
        .create_async()
        .await;

    let photo: Photo = serde_json::from_str(
        &PHOTO_JSON.replace(
            "https://api.unsplash.com/photos/Dwu85P9SOIk/download",
            &format!("{}/photos/Dwu85P9SOIk/download", server.url()),
        ),
    )
    .unwrap();

    client_for(&server).track_download(&photo);

    for _ in 0..100 {
        if mock.matched_async().await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn track_download_without_the_link_is_a_no_op() {
    let server = mockito::Server::new_async().await;
    let photo: Photo = serde_json::from_str(
        &PHOTO_JSON.replace("\"download_location\"", "\"download_elsewhere\""),
    )
    .unwrap();

    // Nothing to assert beyond "does not panic and sends nothing"; the
    // server would fail the unmatched-request check if a request arrived.
    client_for(&server).track_download(&photo);
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn invalid_access_key_is_rejected_at_construction() {
    let config = UnsplashConfig::new("bad\nkey", "secret");
    let error = Client::with_cache(config, ImageUrlCache::new()).unwrap_err();

    assert!(matches!(error, RequestError::InvalidAccessKey));
}
