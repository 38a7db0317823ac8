//! End-to-end tests over the service façade: stubbed catalog transport, real
//! rate-based audio backends.

use async_trait::async_trait;
use bridge_audio::RateBackendFactory;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_runtime::config::CoreConfig;
use core_runtime::events::{CatalogEvent, CoreEvent, SearchSource};
use core_service::PreviewService;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Stub transport answering every request with a fixed status and body.
struct StubHttp {
    status: u16,
    body: &'static str,
}

#[async_trait]
impl HttpClient for StubHttp {
    async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
        if self.status == 0 {
            return Err(BridgeError::OperationFailed("no route to host".to_string()));
        }
        Ok(HttpResponse {
            status: self.status,
            headers: Default::default(),
            body: Bytes::from(self.body),
        })
    }
}

const CATALOG_BODY: &str = r#"{
    "data": [
        {
            "id": 3135556,
            "title": "Harder, Better, Faster, Stronger",
            "preview": "https://cdn-preview-d.example.com/3135556.mp3",
            "artist": { "name": "Daft Punk" }
        }
    ]
}"#;

fn service(status: u16, body: &'static str) -> PreviewService {
    let config = CoreConfig::builder()
        .http_client(Arc::new(StubHttp { status, body }))
        .backend_factory(Arc::new(RateBackendFactory::new()))
        .build()
        .unwrap();
    PreviewService::new(config)
}

/// Wait until the watched status reaches the wanted playing flag.
async fn wait_playing(service: &PreviewService, want: bool) {
    let mut rx = service.subscribe_status();
    timeout(Duration::from_secs(1), async {
        loop {
            if rx.borrow().is_playing == want {
                return;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .unwrap_or_else(|_| panic!("status never settled at is_playing = {want}"));
}

#[tokio::test]
async fn search_then_play_produces_sound() {
    let service = service(200, CATALOG_BODY);

    let tracks = service.search("daft punk").await;
    assert_eq!(tracks.len(), 1);

    service.play(tracks[0].clone()).await;
    wait_playing(&service, true).await;

    assert_eq!(service.current_track().await.unwrap().id, "3135556");
}

#[tokio::test]
async fn offline_search_still_plays_from_the_fallback() {
    let service = service(0, "");
    let mut events = service.events();

    let tracks = service.search("queen").await;
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "Bohemian Rhapsody");

    // The degraded source is visible on the bus.
    let mut saw_fallback = false;
    while let Ok(event) = events.try_recv() {
        if let CoreEvent::Catalog(CatalogEvent::SearchCompleted { source, .. }) = event {
            saw_fallback = source == SearchSource::Fallback;
        }
    }
    assert!(saw_fallback);

    service.play(tracks[0].clone()).await;
    wait_playing(&service, true).await;
}

#[tokio::test]
async fn full_session_flow() {
    let service = service(200, CATALOG_BODY);

    let tracks = service.search("daft punk").await;
    service.play(tracks[0].clone()).await;
    wait_playing(&service, true).await;

    service.volume_up().await;
    service.volume_up().await;
    assert_eq!(service.status().volume, 7);

    service.pause().await;
    assert!(!service.status().is_playing);

    service.resume().await;
    assert!(service.status().is_playing);

    service.volume_down().await;
    assert_eq!(service.status().volume, 6);
    assert!(service.status().is_playing);
}
