//! Buffered, asynchronously-prepared audio engine body.
//!
//! Mirrors the media-player family of native engines: `load` starts an
//! unbounded, network-dependent preparation step, and only a `Ready` event
//! tells the consumer the engine can produce sound. The state machine is
//!
//! ```text
//! Idle -> Preparing -> Ready -> Playing <-> Paused
//!              |
//!              +-> Failed (terminal for this instance)
//! ```
//!
//! A stopped or failed instance refuses further work; the consumer is
//! expected to construct a replacement.

use async_trait::async_trait;
use bridge_traits::audio::{
    AudioBackend, AudioBackendFactory, BackendError, BackendEvent, BackendEventKind, BackendId,
    BackendResult, Track,
};
use bridge_traits::http::{HttpClient, HttpRequest};
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Engine lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Preparing,
    Ready,
    Playing,
    Paused,
    Released,
    Failed,
}

impl Phase {
    fn is_terminal(self) -> bool {
        matches!(self, Phase::Released | Phase::Failed)
    }
}

struct EngineState {
    phase: Phase,
    level: f32,
    /// Fully buffered preview asset, populated by the prepare task.
    asset: Option<Bytes>,
}

struct Inner {
    id: BackendId,
    http: Arc<dyn HttpClient>,
    events: mpsc::UnboundedSender<BackendEvent>,
    state: Mutex<EngineState>,
}

impl Inner {
    fn emit(&self, kind: BackendEventKind) {
        // The consumer may already be gone during teardown.
        self.events.send(BackendEvent::new(self.id, kind)).ok();
    }
}

/// Buffered-prepare `AudioBackend` body.
///
/// The preview asset is fetched in full over the host's `HttpClient` before
/// the engine reports readiness. Preparation runs on a spawned task; `load`
/// returns as soon as the fetch is underway.
pub struct BufferedAudioBackend {
    inner: Arc<Inner>,
}

impl BufferedAudioBackend {
    /// Construct an idle engine wired to the given event channel.
    pub fn new(http: Arc<dyn HttpClient>, events: mpsc::UnboundedSender<BackendEvent>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: BackendId::new(),
                http,
                events,
                state: Mutex::new(EngineState {
                    phase: Phase::Idle,
                    level: 1.0,
                    asset: None,
                }),
            }),
        }
    }

    fn validate_source(url: &str) -> BackendResult<()> {
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(())
        } else {
            Err(BackendError::InvalidSource(format!(
                "unsupported asset URL: {:?}",
                url
            )))
        }
    }
}

#[async_trait]
impl AudioBackend for BufferedAudioBackend {
    fn id(&self) -> BackendId {
        self.inner.id
    }

    async fn load(&self, track: &Track) -> BackendResult<()> {
        {
            let mut state = self.inner.state.lock();
            if state.phase != Phase::Idle {
                return Err(BackendError::Unavailable(format!(
                    "load is single-use; engine is {:?}",
                    state.phase
                )));
            }
            if let Err(err) = Self::validate_source(&track.preview_url) {
                state.phase = Phase::Failed;
                return Err(err);
            }
            state.phase = Phase::Preparing;
        }

        debug!(
            backend = %self.inner.id,
            track_id = %track.id,
            url = %track.preview_url,
            "Preparing preview asset"
        );

        let inner = Arc::clone(&self.inner);
        let url = track.preview_url.clone();
        tokio::spawn(async move {
            let outcome = inner.http.execute(HttpRequest::get(&url)).await;

            let mut state = inner.state.lock();
            // A stop() while the fetch was in flight supersedes the result.
            if state.phase != Phase::Preparing {
                debug!(backend = %inner.id, "Discarding prepare result for superseded engine");
                return;
            }

            match outcome {
                Ok(response) if response.is_success() && !response.body.is_empty() => {
                    state.asset = Some(response.body);
                    state.phase = Phase::Ready;
                    drop(state);
                    inner.emit(BackendEventKind::Ready);
                }
                Ok(response) => {
                    let reason = format!("asset fetch returned HTTP {}", response.status);
                    warn!(backend = %inner.id, reason = %reason, "Prepare failed");
                    state.phase = Phase::Failed;
                    drop(state);
                    inner.emit(BackendEventKind::Failed { reason });
                }
                Err(err) => {
                    let reason = format!("asset fetch failed: {}", err);
                    warn!(backend = %inner.id, reason = %reason, "Prepare failed");
                    state.phase = Phase::Failed;
                    drop(state);
                    inner.emit(BackendEventKind::Failed { reason });
                }
            }
        });

        Ok(())
    }

    async fn start(&self) -> BackendResult<()> {
        let mut state = self.inner.state.lock();
        match state.phase {
            Phase::Ready | Phase::Paused => {
                state.phase = Phase::Playing;
                Ok(())
            }
            Phase::Playing => Ok(()),
            Phase::Preparing => Err(BackendError::Unavailable(
                "asset still preparing".to_string(),
            )),
            Phase::Idle => Err(BackendError::Unavailable("no asset loaded".to_string())),
            phase => Err(BackendError::Unavailable(format!("engine is {:?}", phase))),
        }
    }

    async fn pause(&self) -> BackendResult<()> {
        let mut state = self.inner.state.lock();
        if state.phase.is_terminal() {
            return Err(BackendError::Unavailable(format!(
                "engine is {:?}",
                state.phase
            )));
        }
        if state.phase == Phase::Playing {
            state.phase = Phase::Paused;
        }
        Ok(())
    }

    async fn stop(&self) -> BackendResult<()> {
        let mut state = self.inner.state.lock();
        state.phase = Phase::Released;
        state.asset = None;
        Ok(())
    }

    async fn set_level(&self, level: f32) -> BackendResult<()> {
        let mut state = self.inner.state.lock();
        if state.phase.is_terminal() {
            return Err(BackendError::Unavailable(format!(
                "engine is {:?}",
                state.phase
            )));
        }
        state.level = level.clamp(0.0, 1.0);
        Ok(())
    }

    fn is_producing_sound(&self) -> bool {
        self.inner.state.lock().phase == Phase::Playing
    }
}

/// Factory producing [`BufferedAudioBackend`] instances.
pub struct BufferedBackendFactory {
    http: Arc<dyn HttpClient>,
}

impl BufferedBackendFactory {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }
}

impl AudioBackendFactory for BufferedBackendFactory {
    fn create(&self, events: mpsc::UnboundedSender<BackendEvent>) -> Arc<dyn AudioBackend> {
        Arc::new(BufferedAudioBackend::new(Arc::clone(&self.http), events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result};
    use bridge_traits::http::HttpResponse;
    use std::collections::HashMap;
    use tokio::sync::oneshot;

    /// HttpClient stub: optionally waits on a gate, then returns the
    /// configured status/body or a transport error.
    struct StubHttp {
        status: u16,
        body: &'static [u8],
        transport_error: Option<&'static str>,
        gate: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
    }

    impl StubHttp {
        fn ok(body: &'static [u8]) -> Self {
            Self {
                status: 200,
                body,
                transport_error: None,
                gate: tokio::sync::Mutex::new(None),
            }
        }

        fn status(status: u16) -> Self {
            Self {
                status,
                body: b"",
                transport_error: None,
                gate: tokio::sync::Mutex::new(None),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                status: 0,
                body: b"",
                transport_error: Some(message),
                gate: tokio::sync::Mutex::new(None),
            }
        }

        fn gated(body: &'static [u8]) -> (Self, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            let stub = Self {
                status: 200,
                body,
                transport_error: None,
                gate: tokio::sync::Mutex::new(Some(rx)),
            };
            (stub, tx)
        }
    }

    #[async_trait]
    impl HttpClient for StubHttp {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse> {
            if let Some(gate) = self.gate.lock().await.take() {
                gate.await.ok();
            }
            if let Some(message) = self.transport_error {
                return Err(BridgeError::OperationFailed(message.to_string()));
            }
            Ok(HttpResponse {
                status: self.status,
                headers: HashMap::new(),
                body: Bytes::from_static(self.body),
            })
        }
    }

    fn track() -> Track {
        Track::new("1", "Imagine", "John Lennon", "https://cdn.example.com/1.mp3")
    }

    fn backend_with(
        http: StubHttp,
    ) -> (
        BufferedAudioBackend,
        mpsc::UnboundedReceiver<BackendEvent>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (BufferedAudioBackend::new(Arc::new(http), tx), rx)
    }

    #[tokio::test]
    async fn load_emits_ready_once_asset_is_buffered() {
        let (backend, mut events) = backend_with(StubHttp::ok(b"mp3-bytes"));

        backend.load(&track()).await.unwrap();
        assert!(!backend.is_producing_sound());

        let event = events.recv().await.unwrap();
        assert_eq!(event.backend, backend.id());
        assert_eq!(event.kind, BackendEventKind::Ready);

        backend.start().await.unwrap();
        assert!(backend.is_producing_sound());
    }

    #[tokio::test]
    async fn invalid_source_fails_synchronously() {
        let (backend, mut events) = backend_with(StubHttp::ok(b""));

        let err = backend
            .load(&Track::new("1", "t", "a", "not-a-url"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::InvalidSource(_)));
        assert!(!backend.is_producing_sound());

        // The instance is poisoned; no event was emitted for the sync failure.
        assert!(events.try_recv().is_err());
        assert!(matches!(
            backend.start().await.unwrap_err(),
            BackendError::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn transport_failure_settles_failed_and_is_terminal() {
        let (backend, mut events) = backend_with(StubHttp::failing("connection refused"));

        backend.load(&track()).await.unwrap();

        let event = events.recv().await.unwrap();
        assert!(matches!(event.kind, BackendEventKind::Failed { .. }));
        assert!(!backend.is_producing_sound());

        assert!(backend.start().await.is_err());
        assert!(backend.pause().await.is_err());
        assert!(backend.set_level(0.5).await.is_err());
    }

    #[tokio::test]
    async fn http_error_status_settles_failed() {
        let (backend, mut events) = backend_with(StubHttp::status(404));

        backend.load(&track()).await.unwrap();

        match events.recv().await.unwrap().kind {
            BackendEventKind::Failed { reason } => assert!(reason.contains("404")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn pause_and_start_toggle_sound_production() {
        let (backend, mut events) = backend_with(StubHttp::ok(b"mp3-bytes"));

        backend.load(&track()).await.unwrap();
        events.recv().await.unwrap();
        backend.start().await.unwrap();

        backend.pause().await.unwrap();
        assert!(!backend.is_producing_sound());

        backend.start().await.unwrap();
        assert!(backend.is_producing_sound());
    }

    #[tokio::test]
    async fn start_before_ready_is_refused() {
        let (stub, _gate) = StubHttp::gated(b"mp3-bytes");
        let (backend, _events) = backend_with(stub);

        backend.load(&track()).await.unwrap();
        assert!(matches!(
            backend.start().await.unwrap_err(),
            BackendError::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn stop_discards_an_in_flight_prepare() {
        let (stub, gate) = StubHttp::gated(b"mp3-bytes");
        let (backend, mut events) = backend_with(stub);

        backend.load(&track()).await.unwrap();
        backend.stop().await.unwrap();

        // Release the fetch after teardown; its result must be discarded.
        gate.send(()).ok();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert!(events.try_recv().is_err());
        assert!(!backend.is_producing_sound());
    }

    #[tokio::test]
    async fn load_is_single_use() {
        let (backend, mut events) = backend_with(StubHttp::ok(b"mp3-bytes"));

        backend.load(&track()).await.unwrap();
        events.recv().await.unwrap();

        assert!(matches!(
            backend.load(&track()).await.unwrap_err(),
            BackendError::Unavailable(_)
        ));
    }
}
