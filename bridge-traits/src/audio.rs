//! Audio backend bridge traits and supporting types.
//!
//! These abstractions let the playback controller drive platform audio
//! engines through one capability contract. Two engine families are expected
//! to implement it:
//!
//! - **Buffered engines** prepare the asset asynchronously before any sound
//!   can be produced (`Idle -> Preparing -> Ready -> Playing <-> Paused`,
//!   with `Failed` terminal for the instance).
//! - **Rate-based engines** collapse "prepared" and "playing" into a single
//!   step: loading settles immediately and playing is simply a non-zero rate
//!   (`Idle -> Loaded -> Playing <-> Paused`).
//!
//! Native "became ready / finished / errored" callbacks are modeled as an
//! explicit [`BackendEvent`] stream. Every event carries the [`BackendId`] of
//! the instance that produced it so the consumer can discard completions from
//! a backend that has already been superseded.

use crate::error::BridgeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// A single catalog entry with a short-lived preview asset.
///
/// Tracks are immutable values produced by the search gateway. Identity is
/// the opaque `id`; two tracks with the same `id` describe the same track
/// even if other fields differ between result sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Opaque catalog key, unique within a result set.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display artist string.
    pub artist: String,
    /// URL of the short preview asset. May expire.
    pub preview_url: String,
}

impl Track {
    /// Construct a track value.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        preview_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            preview_url: preview_url.into(),
        }
    }

    /// Returns `true` when both values name the same catalog entry.
    pub fn same_track(&self, other: &Track) -> bool {
        self.id == other.id
    }
}

/// Unique identity of one backend instance.
///
/// A fresh id is minted for every backend the controller constructs. Events
/// from an instance that is no longer the active one are stale and must be
/// ignored by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackendId(Uuid);

impl BackendId {
    /// Generate a new backend identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identity from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BackendId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Asynchronous notification from a backend instance.
///
/// This is the explicit replacement for platform callback interfaces
/// (prepared/completion/error listeners). Events are delivered on the
/// channel handed to the backend at construction time and consumed on the
/// controller's serialized state-update path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEvent {
    /// Instance that produced the event.
    pub backend: BackendId,
    /// What happened.
    pub kind: BackendEventKind,
}

impl BackendEvent {
    /// Convenience constructor.
    pub fn new(backend: BackendId, kind: BackendEventKind) -> Self {
        Self { backend, kind }
    }
}

/// The kinds of notification a backend can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEventKind {
    /// Asset preparation succeeded; the engine can now produce sound.
    /// Rate-based engines emit this during `load`.
    Ready,
    /// The asset played to its natural end.
    Finished,
    /// The instance failed (invalid source, prepare failure, or an engine
    /// fault). The backend has settled `is_producing_sound() == false`.
    Failed {
        /// Human-readable reason, for diagnostics only.
        reason: String,
    },
}

/// Errors surfaced by backend operations.
///
/// These never escape to the presentation layer: the controller absorbs them
/// into its best-effort status. They exist so backend bodies can report what
/// went wrong without leaving the session in an ambiguous state.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The asset source is not something this engine can load.
    #[error("Invalid asset source: {0}")]
    InvalidSource(String),

    /// Asset preparation failed (network fetch, container probe, ...).
    #[error("Asset preparation failed: {0}")]
    PrepareFailed(String),

    /// The instance cannot service the call in its current state
    /// (still preparing, already released, or terminally failed).
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The underlying engine reported a fault during playback.
    #[error("Audio engine fault: {0}")]
    EngineFault(String),
}

impl From<BackendError> for BridgeError {
    fn from(error: BackendError) -> Self {
        BridgeError::OperationFailed(error.to_string())
    }
}

/// Convenience result type alias for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Capability contract for platform audio engines.
///
/// Implementations own the native playback resources for exactly one asset.
/// The consumer constructs a fresh instance per track and never reuses one
/// after it failed or was stopped.
///
/// `load` must not block on asset preparation; completion is signaled with
/// [`BackendEventKind::Ready`] (or `Failed`) on the event channel, because
/// preparation time is unbounded and network-dependent.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Identity of this instance, used to match events against the active
    /// generation.
    fn id(&self) -> BackendId;

    /// Begin asynchronous preparation of the track's preview asset.
    async fn load(&self, track: &Track) -> BackendResult<()>;

    /// Begin or resume audio output. Only meaningful once prepared on
    /// buffered engines; immediate on rate-based engines.
    async fn start(&self) -> BackendResult<()>;

    /// Halt audio output without releasing resources, so `start` can resume
    /// from the paused position (best-effort).
    async fn pause(&self) -> BackendResult<()>;

    /// Halt output and release the instance's resources. The instance is
    /// unusable afterwards.
    async fn stop(&self) -> BackendResult<()>;

    /// Set output gain. `level` is normalized to `0.0..=1.0`.
    async fn set_level(&self, level: f32) -> BackendResult<()>;

    /// Whether audio is currently audible.
    fn is_producing_sound(&self) -> bool;
}

/// Factory for backend instances.
///
/// The controller replaces its backend wholesale on every new play request;
/// the factory is the seam through which a host picks the engine family for
/// its platform. The provided sender is where the new instance must deliver
/// its [`BackendEvent`]s.
pub trait AudioBackendFactory: Send + Sync {
    /// Construct a fresh backend wired to the given event channel.
    fn create(&self, events: mpsc::UnboundedSender<BackendEvent>)
        -> std::sync::Arc<dyn AudioBackend>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_id_is_unique() {
        let a = BackendId::new();
        let b = BackendId::new();
        assert_ne!(a, b);
        assert_eq!(a, BackendId::from_uuid(*a.as_uuid()));
    }

    #[test]
    fn track_identity_is_the_id() {
        let a = Track::new("42", "Yesterday", "The Beatles", "https://cdn/a.mp3");
        let b = Track::new("42", "Yesterday (Remaster)", "The Beatles", "https://cdn/b.mp3");
        let c = Track::new("7", "Yesterday", "The Beatles", "https://cdn/a.mp3");

        assert!(a.same_track(&b));
        assert!(!a.same_track(&c));
    }

    #[test]
    fn track_round_trips_through_json() {
        let track = Track::new("1", "Imagine", "John Lennon", "https://cdn/1.mp3");
        let json = serde_json::to_string(&track).unwrap();
        let back: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(track, back);
    }

    #[test]
    fn backend_error_converts_to_bridge_error() {
        let err = BackendError::PrepareFailed("timeout".into());
        let bridge: BridgeError = err.into();
        assert!(matches!(bridge, BridgeError::OperationFailed(_)));
    }
}
