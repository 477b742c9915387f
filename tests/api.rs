use spotlite::{
    auth::Session,
    http::{ApiService, error::ApiError},
};
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

async fn service(server: &MockServer) -> ApiService {
    let base = Url::parse(&format!("{}/v1/", server.uri())).unwrap();
    let api = ApiService::new(base).unwrap();
    api.set_session(&Session {
        access_token: "tok".to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
    });
    api
}

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "u1",
            "display_name": "Ada",
            "images": [{ "url": "https://i/avatar.png" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = service(&server).await.fetch_user_profile().await.unwrap();
    assert_eq!(profile.id, "u1");
    assert_eq!(profile.display_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn featured_playlists_keep_the_listing_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/browse/featured-playlists"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Monday picks",
            "playlists": { "items": [{ "id": "p1", "name": "One" }, null] }
        })))
        .mount(&server)
        .await;

    let listing = service(&server).await.fetch_featured_playlists().await.unwrap();
    assert_eq!(listing.message.as_deref(), Some("Monday picks"));
    assert_eq!(listing.playlists.items.len(), 2);
    assert!(listing.playlists.items[1].is_none());
}

#[tokio::test]
async fn playlist_is_fetched_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/playlists/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "abc",
            "name": "Mix",
            "tracks": {
                "items": [{
                    "track": {
                        "id": "t1",
                        "name": "Song",
                        "artists": [{ "name": "Band" }],
                        "album": { "name": "Album", "images": [] },
                        "duration_ms": 125000,
                        "preview_url": "https://p/t1.mp3"
                    }
                }]
            }
        })))
        .mount(&server)
        .await;

    let playlist = service(&server).await.fetch_playlist("abc").await.unwrap();
    assert_eq!(playlist.name, "Mix");
    assert_eq!(playlist.tracks.items.len(), 1);
}

#[tokio::test]
async fn rejected_token_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/playlists"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = service(&server).await.fetch_user_playlists().await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn other_failures_keep_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    match service(&server).await.fetch_user_profile().await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "busy");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn fetching_without_a_session_fails_locally() {
    let server = MockServer::start().await;
    let api = service(&server).await;
    api.clear_session();

    assert!(matches!(api.fetch_user_profile().await, Err(ApiError::NoSession)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
