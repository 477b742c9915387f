use std::{sync::Arc, time::Duration};

use flume::Receiver;
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
use spotlite::{
    audio::{system::AudioSystem, traits::PlaybackControl},
    auth::Session,
    config::Config,
    event::events::Event,
    http::ApiService,
    storage::{LOADED_TRACKS, Storage},
    ui::{
        context::AppContext,
        router::{Router, Section},
        state::AppState,
    },
};
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

struct SilentBackend;

impl PlaybackControl for SilentBackend {
    fn load(&self, _url: &str) {}
    fn play(&self) {}
    fn pause(&self) {}
    fn stop(&self) {}
    fn seek(&self, _position: Duration) {}
    fn set_volume(&self, _volume: f32) {}
    fn position(&self) -> Duration {
        Duration::ZERO
    }
    fn is_finished(&self) -> bool {
        false
    }
}

struct Harness {
    _dir: TempDir,
    server: MockServer,
    ctx: AppContext,
    rx: Receiver<Event>,
    state: AppState,
}

impl Harness {
    async fn new() -> Self {
        let server = MockServer::start().await;
        mount_fixtures(&server).await;

        let dir = tempfile::tempdir().unwrap();
        let api_base = format!("{}/v1/", server.uri());
        let data_dir = dir.path().to_string_lossy().into_owned();
        let config = Config::from_lookup(|key| match key {
            "SPOTIFY_API_BASE" => Some(api_base.clone()),
            "SPOTLITE_DATA_DIR" => Some(data_dir.clone()),
            _ => None,
        })
        .unwrap();

        let (tx, rx) = flume::unbounded();
        let storage = Arc::new(Storage::open(dir.path()).unwrap());
        let api = Arc::new(ApiService::new(config.api_base.clone()).unwrap());
        api.set_session(&Session {
            access_token: "tok".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
        });
        let audio_system = AudioSystem::new(
            Arc::new(SilentBackend),
            tx.clone(),
            storage.clone(),
            config.audio.clone(),
        );

        Self {
            _dir: dir,
            server,
            ctx: AppContext {
                api,
                storage,
                audio_system,
                event_tx: tx,
                config: Arc::new(config),
            },
            rx,
            state: AppState::default(),
        }
    }

    /// Feeds bus events to the router until the playlist `id` has loaded.
    async fn settle_playlist(&self, router: &mut Router, id: &str) {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), self.rx.recv_async())
                .await
                .expect("playlist never arrived")
                .unwrap();
            let done = matches!(&event, Event::PlaylistFetched(p) if p.id == id);
            router.on_event(&event, &self.ctx).await;
            if done {
                return;
            }
        }
    }

    fn draw(&self, router: &mut Router) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                router.render(f, area, &self.state, &self.ctx);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }
}

async fn mount_fixtures(server: &MockServer) {
    let listing = serde_json::json!({
        "message": "Picks",
        "playlists": { "items": [{ "id": "abc", "name": "Mix" }] }
    });
    Mock::given(method("GET"))
        .and(path("/v1/browse/featured-playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing.clone()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/browse/categories/toplists/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(server)
        .await;

    let track = |id: &str, preview: Option<&str>| {
        serde_json::json!({
            "track": {
                "id": id,
                "name": format!("Song {id}"),
                "artists": [{ "name": "Band" }],
                "album": { "name": "Album", "images": [] },
                "duration_ms": 125000,
                "preview_url": preview
            }
        })
    };
    Mock::given(method("GET"))
        .and(path("/v1/playlists/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "abc",
            "name": "Mix",
            "description": "Fresh <b>picks</b>",
            "tracks": {
                "items": [
                    track("t1", Some("https://p/t1.mp3")),
                    track("t2", None),
                    track("t3", Some("https://p/t3.mp3"))
                ]
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn back_navigation_renders_like_direct_navigation() {
    let harness = Harness::new().await;

    let mut direct = Router::new();
    direct.navigate_to(Section::playlist("abc"), &harness.ctx).await;
    harness.settle_playlist(&mut direct, "abc").await;
    let expected = harness.draw(&mut direct);
    direct.reset();

    let mut router = Router::new();
    router.navigate_to(Section::playlist("abc"), &harness.ctx).await;
    harness.settle_playlist(&mut router, "abc").await;
    router.navigate_to(Section::Dashboard, &harness.ctx).await;
    assert_eq!(router.active_section(), Some(Section::Dashboard));

    assert!(router.back(&harness.ctx).await);
    assert_eq!(router.active_section(), Some(Section::playlist("abc")));
    harness.settle_playlist(&mut router, "abc").await;

    assert_eq!(harness.draw(&mut router), expected);
    assert_eq!(router.content().handler_count(), 1);
}

#[tokio::test]
async fn exactly_one_scroll_handler_across_renders() {
    let harness = Harness::new().await;
    let mut router = Router::new();

    for section in [
        Section::Dashboard,
        Section::playlist("abc"),
        Section::Dashboard,
        Section::playlist("abc"),
    ] {
        router.navigate_to(section, &harness.ctx).await;
        assert_eq!(router.content().handler_count(), 1);
    }
    harness.settle_playlist(&mut router, "abc").await;
    assert_eq!(router.content().handler_count(), 1);

    router.back(&harness.ctx).await;
    router.forward(&harness.ctx).await;
    assert_eq!(router.content().handler_count(), 1);
    assert_eq!(router.history().len(), 4);
}

#[tokio::test]
async fn loaded_playlist_is_persisted_for_prev_next() {
    let harness = Harness::new().await;
    let mut router = Router::new();

    router.navigate_to(Section::playlist("abc"), &harness.ctx).await;
    harness.settle_playlist(&mut router, "abc").await;

    let stored: serde_json::Value = harness.ctx.storage.get_json(LOADED_TRACKS).unwrap().unwrap();
    let ids: Vec<&str> = stored
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["t1", "t3"]);
    assert!(!harness.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn scrolling_fades_the_playlist_cover() {
    let harness = Harness::new().await;
    let mut router = Router::new();

    router.navigate_to(Section::playlist("abc"), &harness.ctx).await;
    harness.settle_playlist(&mut router, "abc").await;
    assert_eq!(router.scroll_effect().cover_opacity, 100);
    assert!(!router.scroll_effect().sticky_header);

    router.scroll(100);
    let effect = router.scroll_effect();
    assert!(effect.scroll_top > 0);
    assert!(effect.cover_opacity < 100);

    router.navigate_to(Section::Dashboard, &harness.ctx).await;
    assert_eq!(router.scroll_effect().scroll_top, 0);
}
