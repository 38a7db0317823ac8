//! Playback controller
//!
//! Serializes every state mutation behind one async mutex: the public
//! operations and the backend event pump both re-enter through it, so the
//! session state is only ever touched by one path at a time.
//!
//! ## Backend lifecycle
//!
//! Backends are single-use. `play` tears down whatever instance is active,
//! creates a fresh one through the factory, and registers its `BackendId` as
//! the active generation. Asynchronous backend signals (`Ready`, `Finished`,
//! `Failed`) arrive on an unbounded channel; a spawned pump task applies
//! them under the session mutex, discarding any event whose `BackendId` is
//! not the active generation. That identity check is the only defense needed
//! against late completions from a superseded track.
//!
//! ## Error absorption
//!
//! No backend fault escapes to the caller. Every failure settles as
//! `is_playing = false`, a `tracing` diagnostic, and a `PlayerEvent::Error`
//! on the bus; the controller stays usable and the next `play` starts clean.

use bridge_traits::audio::{
    AudioBackend, AudioBackendFactory, BackendEvent, BackendEventKind, BackendId, Track,
};
use core_runtime::config::MAX_VOLUME;
use core_runtime::events::{CoreEvent, EventBus, PlayerEvent};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::status::PlayerStatus;

/// The active backend generation.
struct ActiveBackend {
    id: BackendId,
    backend: Arc<dyn AudioBackend>,
}

/// Mutable session state, guarded by the controller's mutex.
struct Session {
    current_track: Option<Track>,
    is_playing: bool,
    volume: u8,
    active: Option<ActiveBackend>,
    status_tx: watch::Sender<PlayerStatus>,
    bus: EventBus,
}

impl Session {
    fn publish_status(&self) {
        self.status_tx.send_replace(PlayerStatus {
            is_playing: self.is_playing,
            volume: self.volume,
        });
    }

    fn emit(&self, event: PlayerEvent) {
        self.bus.emit(CoreEvent::Player(event)).ok();
    }

    fn current_track_id(&self) -> Option<String> {
        self.current_track.as_ref().map(|t| t.id.clone())
    }

    /// Scaled output level for the current volume step.
    fn level(&self) -> f32 {
        self.volume as f32 / MAX_VOLUME as f32
    }

    async fn apply_event(&mut self, event: BackendEvent) {
        let backend = match &self.active {
            Some(active) if active.id == event.backend => Arc::clone(&active.backend),
            _ => {
                debug!(
                    backend = %event.backend,
                    kind = ?event.kind,
                    "Discarding event from a superseded backend"
                );
                return;
            }
        };

        match event.kind {
            BackendEventKind::Ready => {
                if let Err(e) = backend.set_level(self.level()).await {
                    warn!(error = %e, "Backend refused volume level");
                }
                match backend.start().await {
                    Ok(()) => {
                        self.is_playing = true;
                        self.publish_status();
                        let (track_id, title) = self
                            .current_track
                            .as_ref()
                            .map(|t| (t.id.clone(), t.title.clone()))
                            .unwrap_or_default();
                        self.emit(PlayerEvent::Started { track_id, title });
                    }
                    Err(e) => {
                        warn!(error = %e, "Backend refused start after readiness");
                        self.is_playing = false;
                        self.publish_status();
                        self.emit(PlayerEvent::Error {
                            track_id: self.current_track_id(),
                            message: e.to_string(),
                        });
                    }
                }
            }
            BackendEventKind::Finished => {
                // The backend stays attached; resume replays the preview.
                self.is_playing = false;
                self.publish_status();
                if let Some(track_id) = self.current_track_id() {
                    self.emit(PlayerEvent::Completed { track_id });
                }
            }
            BackendEventKind::Failed { reason } => {
                warn!(backend = %event.backend, reason, "Backend failed");
                self.active = None;
                self.is_playing = false;
                self.publish_status();
                self.emit(PlayerEvent::Error {
                    track_id: self.current_track_id(),
                    message: reason,
                });
            }
        }
    }
}

/// Serialized playback controller over a single active audio backend.
///
/// Must be constructed inside a tokio runtime; construction spawns the
/// backend event pump.
///
/// # Example
///
/// ```ignore
/// let controller = PlayerController::new(factory, bus, 5);
/// controller.play(track).await;
/// let status = controller.status();
/// ```
pub struct PlayerController {
    session: Arc<Mutex<Session>>,
    factory: Arc<dyn AudioBackendFactory>,
    events_tx: mpsc::UnboundedSender<BackendEvent>,
    status_rx: watch::Receiver<PlayerStatus>,
    pump: JoinHandle<()>,
}

impl PlayerController {
    /// Create a controller wired to a backend factory and event bus.
    ///
    /// `initial_volume` is clamped to `[0, 10]`.
    pub fn new(factory: Arc<dyn AudioBackendFactory>, bus: EventBus, initial_volume: u8) -> Self {
        let volume = initial_volume.min(MAX_VOLUME);
        let (status_tx, status_rx) = watch::channel(PlayerStatus {
            is_playing: false,
            volume,
        });
        let session = Arc::new(Mutex::new(Session {
            current_track: None,
            is_playing: false,
            volume,
            active: None,
            status_tx,
            bus,
        }));

        let (events_tx, mut events_rx) = mpsc::unbounded_channel::<BackendEvent>();
        let pump_session = Arc::clone(&session);
        let pump = tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                let mut session = pump_session.lock().await;
                session.apply_event(event).await;
            }
        });

        Self {
            session,
            factory,
            events_tx,
            status_rx,
            pump,
        }
    }

    /// Start playing a track's preview, replacing whatever was active.
    ///
    /// Returns once the session state is settled; actual sound begins when
    /// the fresh backend reports readiness. Load failures are absorbed and
    /// the attempted track remains the current one.
    pub async fn play(&self, track: Track) {
        let mut session = self.session.lock().await;

        if let Some(active) = session.active.take() {
            if let Err(e) = active.backend.stop().await {
                warn!(backend = %active.id, error = %e, "Error stopping previous backend");
            }
        }
        session.is_playing = false;

        let backend = self.factory.create(self.events_tx.clone());
        let id = backend.id();
        debug!(backend = %id, track_id = %track.id, "Loading preview");

        match backend.load(&track).await {
            Ok(()) => {
                session.active = Some(ActiveBackend { id, backend });
            }
            Err(e) => {
                warn!(track_id = %track.id, error = %e, "Failed to initiate preview load");
                session.emit(PlayerEvent::Error {
                    track_id: Some(track.id.clone()),
                    message: e.to_string(),
                });
            }
        }

        session.current_track = Some(track);
        session.publish_status();
    }

    /// Resume a paused (or completed) preview. No-op while playing or when
    /// nothing is loaded.
    pub async fn resume(&self) {
        let mut session = self.session.lock().await;
        if session.is_playing {
            return;
        }
        let backend = match &session.active {
            Some(active) => Arc::clone(&active.backend),
            None => return,
        };

        match backend.start().await {
            Ok(()) => {
                session.is_playing = true;
                session.publish_status();
                if let Some(track_id) = session.current_track_id() {
                    session.emit(PlayerEvent::Resumed { track_id });
                }
            }
            Err(e) => {
                warn!(error = %e, "Backend refused resume");
                session.emit(PlayerEvent::Error {
                    track_id: session.current_track_id(),
                    message: e.to_string(),
                });
            }
        }
    }

    /// Pause the playing preview. No-op when nothing is playing.
    pub async fn pause(&self) {
        let mut session = self.session.lock().await;
        if !session.is_playing {
            return;
        }
        let backend = match &session.active {
            Some(active) => Arc::clone(&active.backend),
            None => return,
        };

        if let Err(e) = backend.pause().await {
            warn!(error = %e, "Backend refused pause");
        }
        // State settles paused even when the engine complained.
        session.is_playing = false;
        session.publish_status();
        if let Some(track_id) = session.current_track_id() {
            session.emit(PlayerEvent::Paused { track_id });
        }
    }

    /// Step the volume up one notch.
    pub async fn volume_up(&self) {
        self.step_volume(1).await;
    }

    /// Step the volume down one notch.
    pub async fn volume_down(&self) {
        self.step_volume(-1).await;
    }

    async fn step_volume(&self, delta: i8) {
        let mut session = self.session.lock().await;
        let next = (session.volume as i8 + delta).clamp(0, MAX_VOLUME as i8) as u8;
        if next == session.volume {
            return;
        }
        session.volume = next;

        if let Some(active) = &session.active {
            let backend = Arc::clone(&active.backend);
            if let Err(e) = backend.set_level(session.level()).await {
                warn!(error = %e, "Backend refused volume level");
            }
        }

        session.publish_status();
        session.emit(PlayerEvent::VolumeChanged { volume: next });
    }

    /// Current status snapshot. Never blocks, never fails.
    pub fn status(&self) -> PlayerStatus {
        *self.status_rx.borrow()
    }

    /// Watch receiver for status changes; presentation layers re-render on
    /// every update.
    pub fn subscribe(&self) -> watch::Receiver<PlayerStatus> {
        self.status_rx.clone()
    }

    /// The track the controller last attempted to play.
    pub async fn current_track(&self) -> Option<Track> {
        self.session.lock().await.current_track.clone()
    }
}

impl Drop for PlayerController {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
