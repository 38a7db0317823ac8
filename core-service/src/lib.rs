//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP client, audio
//! backend factory) into the shared preview-player core and exposes the
//! inbound surface hosts call: search, play, resume, pause, volume steps,
//! status. Desktop apps typically enable the `desktop-shims` feature, which
//! pulls in `bridge-desktop` and `bridge-audio` for ready-made defaults.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::audio::Track;
use core_catalog::CatalogService;
use core_player::{PlayerController, PlayerStatus};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus};
use tokio::sync::{broadcast, watch};
use tracing::info;

/// Primary façade exposed to host applications.
///
/// Bundles the catalog service and playback controller over one shared event
/// bus. Every playback method is infallible by contract: faults are absorbed
/// into status and reported on the bus.
///
/// Must be constructed inside a tokio runtime.
///
/// # Example
///
/// ```ignore
/// use core_runtime::config::CoreConfig;
/// use core_service::PreviewService;
///
/// let config = CoreConfig::builder()
///     .http_client(http)
///     .backend_factory(factory)
///     .build()?;
/// let service = PreviewService::new(config);
///
/// let tracks = service.search("daft punk").await;
/// service.play(tracks[0].clone()).await;
/// ```
pub struct PreviewService {
    catalog: CatalogService,
    player: PlayerController,
    bus: EventBus,
}

impl PreviewService {
    /// Wire the core subsystems from a validated configuration.
    pub fn new(config: CoreConfig) -> Self {
        let bus = EventBus::new(config.event_capacity);
        let catalog = CatalogService::new(
            Arc::clone(&config.http_client),
            config.catalog_base_url.clone(),
            bus.clone(),
        );
        let player = PlayerController::new(
            Arc::clone(&config.backend_factory),
            bus.clone(),
            config.initial_volume,
        );
        info!(
            catalog = %config.catalog_base_url,
            volume = config.initial_volume,
            "Preview core assembled"
        );
        Self {
            catalog,
            player,
            bus,
        }
    }

    /// Search the catalog. Always answers with a playable, ordered list.
    pub async fn search(&self, query: &str) -> Vec<Track> {
        self.catalog.search_songs(query).await
    }

    /// Start playing a track's preview, replacing any current playback.
    pub async fn play(&self, track: Track) {
        self.player.play(track).await;
    }

    /// Resume the paused preview.
    pub async fn resume(&self) {
        self.player.resume().await;
    }

    /// Pause the playing preview.
    pub async fn pause(&self) {
        self.player.pause().await;
    }

    /// Step the volume up one notch (clamped at 10).
    pub async fn volume_up(&self) {
        self.player.volume_up().await;
    }

    /// Step the volume down one notch (clamped at 0).
    pub async fn volume_down(&self) {
        self.player.volume_down().await;
    }

    /// Non-blocking playback status snapshot.
    pub fn status(&self) -> PlayerStatus {
        self.player.status()
    }

    /// Watch receiver that updates on every status change.
    pub fn subscribe_status(&self) -> watch::Receiver<PlayerStatus> {
        self.player.subscribe()
    }

    /// The track most recently handed to `play`.
    pub async fn current_track(&self) -> Option<Track> {
        self.player.current_track().await
    }

    /// Subscribe to the core event stream (player and catalog domains).
    pub fn events(&self) -> broadcast::Receiver<CoreEvent> {
        self.bus.subscribe()
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Uses the reqwest-backed HTTP bridge and the buffered audio engine family.
///
/// ```ignore
/// let service = core_service::bootstrap_desktop(None)?;
/// let tracks = service.search("queen").await;
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(catalog_base_url: Option<String>) -> Result<PreviewService> {
    let http: Arc<dyn bridge_traits::http::HttpClient> =
        Arc::new(bridge_desktop::ReqwestHttpClient::new());
    let factory = Arc::new(bridge_audio::BufferedBackendFactory::new(Arc::clone(&http)));

    let mut builder = CoreConfig::builder()
        .http_client(http)
        .backend_factory(factory);
    if let Some(url) = catalog_base_url {
        builder = builder.catalog_base_url(url);
    }

    Ok(PreviewService::new(builder.build()?))
}
