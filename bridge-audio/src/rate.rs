//! Rate-based audio engine body.
//!
//! Mirrors the player-object family of native engines where there is no
//! observable preparing phase: an asset is attached, and "playing" means the
//! playback rate is non-zero. The state machine collapses to
//!
//! ```text
//! Idle -> Loaded -> Playing <-> Paused
//! ```
//!
//! `load` settles immediately and emits `Ready` right away, so the consumer's
//! uniform ready-then-start path behaves synchronously against this body.
//! The underlying asset fetch happens inside the native engine and is not
//! observable here.

use async_trait::async_trait;
use bridge_traits::audio::{
    AudioBackend, AudioBackendFactory, BackendError, BackendEvent, BackendEventKind, BackendId,
    BackendResult, Track,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

struct RateState {
    /// Attached asset URL, `None` until `load`.
    asset_url: Option<String>,
    /// Current playback rate; sound is audible iff non-zero.
    rate: f32,
    level: f32,
    released: bool,
}

/// Rate-based `AudioBackend` body.
pub struct RateAudioBackend {
    id: BackendId,
    events: mpsc::UnboundedSender<BackendEvent>,
    state: Mutex<RateState>,
}

impl RateAudioBackend {
    /// Construct an idle engine wired to the given event channel.
    pub fn new(events: mpsc::UnboundedSender<BackendEvent>) -> Self {
        Self {
            id: BackendId::new(),
            events,
            state: Mutex::new(RateState {
                asset_url: None,
                rate: 0.0,
                level: 1.0,
                released: false,
            }),
        }
    }

    fn emit(&self, kind: BackendEventKind) {
        self.events.send(BackendEvent::new(self.id, kind)).ok();
    }

    fn guard_released(state: &RateState) -> BackendResult<()> {
        if state.released {
            Err(BackendError::Unavailable("engine released".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AudioBackend for RateAudioBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    async fn load(&self, track: &Track) -> BackendResult<()> {
        {
            let mut state = self.state.lock();
            Self::guard_released(&state)?;
            if state.asset_url.is_some() {
                return Err(BackendError::Unavailable(
                    "load is single-use; asset already attached".to_string(),
                ));
            }
            let url = &track.preview_url;
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(BackendError::InvalidSource(format!(
                    "unsupported asset URL: {:?}",
                    url
                )));
            }
            state.asset_url = Some(url.clone());
        }

        debug!(
            backend = %self.id,
            track_id = %track.id,
            "Attached preview asset"
        );

        // No observable preparing phase: prepared and loaded coincide.
        self.emit(BackendEventKind::Ready);
        Ok(())
    }

    async fn start(&self) -> BackendResult<()> {
        let mut state = self.state.lock();
        Self::guard_released(&state)?;
        if state.asset_url.is_none() {
            return Err(BackendError::Unavailable("no asset attached".to_string()));
        }
        state.rate = 1.0;
        Ok(())
    }

    async fn pause(&self) -> BackendResult<()> {
        let mut state = self.state.lock();
        Self::guard_released(&state)?;
        state.rate = 0.0;
        Ok(())
    }

    async fn stop(&self) -> BackendResult<()> {
        let mut state = self.state.lock();
        state.released = true;
        state.rate = 0.0;
        state.asset_url = None;
        Ok(())
    }

    async fn set_level(&self, level: f32) -> BackendResult<()> {
        let mut state = self.state.lock();
        Self::guard_released(&state)?;
        state.level = level.clamp(0.0, 1.0);
        Ok(())
    }

    fn is_producing_sound(&self) -> bool {
        let state = self.state.lock();
        !state.released && state.rate != 0.0
    }
}

/// Factory producing [`RateAudioBackend`] instances.
#[derive(Default)]
pub struct RateBackendFactory;

impl RateBackendFactory {
    pub fn new() -> Self {
        Self
    }
}

impl AudioBackendFactory for RateBackendFactory {
    fn create(&self, events: mpsc::UnboundedSender<BackendEvent>) -> Arc<dyn AudioBackend> {
        Arc::new(RateAudioBackend::new(events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track::new("7", "Respect", "Aretha Franklin", "https://cdn.example.com/7.mp3")
    }

    fn backend() -> (RateAudioBackend, mpsc::UnboundedReceiver<BackendEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (RateAudioBackend::new(tx), rx)
    }

    #[tokio::test]
    async fn ready_settles_during_load() {
        let (backend, mut events) = backend();

        backend.load(&track()).await.unwrap();

        let event = events.try_recv().unwrap();
        assert_eq!(event.backend, backend.id());
        assert_eq!(event.kind, BackendEventKind::Ready);
    }

    #[tokio::test]
    async fn playing_is_a_non_zero_rate() {
        let (backend, _events) = backend();

        backend.load(&track()).await.unwrap();
        assert!(!backend.is_producing_sound());

        backend.start().await.unwrap();
        assert!(backend.is_producing_sound());

        backend.pause().await.unwrap();
        assert!(!backend.is_producing_sound());

        backend.start().await.unwrap();
        assert!(backend.is_producing_sound());
    }

    #[tokio::test]
    async fn start_without_asset_is_refused() {
        let (backend, _events) = backend();
        assert!(matches!(
            backend.start().await.unwrap_err(),
            BackendError::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn invalid_source_is_rejected_without_an_event() {
        let (backend, mut events) = backend();

        let err = backend
            .load(&Track::new("7", "t", "a", "file:///tmp/x.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::InvalidSource(_)));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn stop_silences_and_releases() {
        let (backend, _events) = backend();

        backend.load(&track()).await.unwrap();
        backend.start().await.unwrap();
        backend.stop().await.unwrap();

        assert!(!backend.is_producing_sound());
        assert!(backend.start().await.is_err());
        assert!(backend.set_level(0.3).await.is_err());
    }
}
