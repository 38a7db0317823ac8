//! # Core Configuration Module
//!
//! Provides configuration management for the preview-player core.
//!
//! ## Overview
//!
//! The core is assembled from host-supplied capabilities: an HTTP client for
//! catalog lookups and asset fetches, and an audio backend factory producing
//! the platform's engine body. [`CoreConfig`] gathers those capabilities plus
//! the tunable settings (catalog endpoint, event-bus capacity, initial
//! volume) and validates the whole bundle before any subsystem starts.
//!
//! Missing capabilities fail fast at build time with
//! [`Error::CapabilityMissing`] rather than surfacing as runtime panics deep
//! inside a playback path.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .http_client(Arc::new(my_http_client))
//!     .backend_factory(Arc::new(my_factory))
//!     .initial_volume(7)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::audio::AudioBackendFactory;
use bridge_traits::http::HttpClient;
use std::fmt;
use std::sync::Arc;

/// Default catalog endpoint (Deezer-compatible search API).
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.deezer.com";

/// Default event-bus buffer capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = crate::events::DEFAULT_EVENT_BUFFER_SIZE;

/// Default playback volume on the 0..=10 scale.
pub const DEFAULT_INITIAL_VOLUME: u8 = 5;

/// Maximum playback volume on the 0..=10 scale.
pub const MAX_VOLUME: u8 = 10;

/// Core configuration bundle.
///
/// Holds the host capabilities and settings shared by the catalog and player
/// subsystems. Construct through [`CoreConfig::builder`].
#[derive(Clone)]
pub struct CoreConfig {
    /// HTTP client capability supplied by the host bridge.
    pub http_client: Arc<dyn HttpClient>,
    /// Factory producing a fresh audio engine instance per track.
    pub backend_factory: Arc<dyn AudioBackendFactory>,
    /// Base URL of the track catalog service.
    pub catalog_base_url: String,
    /// Buffer capacity of the core event bus.
    pub event_capacity: usize,
    /// Starting volume, clamped to `0..=10`.
    pub initial_volume: u8,
}

impl fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreConfig")
            .field("http_client", &"Arc<dyn HttpClient>")
            .field("backend_factory", &"Arc<dyn AudioBackendFactory>")
            .field("catalog_base_url", &self.catalog_base_url)
            .field("event_capacity", &self.event_capacity)
            .field("initial_volume", &self.initial_volume)
            .finish()
    }
}

impl CoreConfig {
    /// Start building a configuration.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validate settings that have a constrained domain.
    pub fn validate(&self) -> Result<()> {
        if self.catalog_base_url.is_empty() {
            return Err(Error::Config("catalog_base_url must not be empty".to_string()));
        }
        if !(self.catalog_base_url.starts_with("http://")
            || self.catalog_base_url.starts_with("https://"))
        {
            return Err(Error::Config(format!(
                "catalog_base_url must be an http(s) URL, got {:?}",
                self.catalog_base_url
            )));
        }
        if self.event_capacity == 0 {
            return Err(Error::Config("event_capacity must be non-zero".to_string()));
        }
        if self.initial_volume > MAX_VOLUME {
            return Err(Error::Config(format!(
                "initial_volume must be within 0..={}, got {}",
                MAX_VOLUME, self.initial_volume
            )));
        }
        Ok(())
    }
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    backend_factory: Option<Arc<dyn AudioBackendFactory>>,
    catalog_base_url: Option<String>,
    event_capacity: Option<usize>,
    initial_volume: Option<u8>,
}

impl CoreConfigBuilder {
    /// Supply the HTTP client capability.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Supply the audio backend factory capability.
    pub fn backend_factory(mut self, factory: Arc<dyn AudioBackendFactory>) -> Self {
        self.backend_factory = Some(factory);
        self
    }

    /// Override the catalog endpoint.
    pub fn catalog_base_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_base_url = Some(url.into());
        self
    }

    /// Override the event-bus buffer capacity.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Set the starting volume on the 0..=10 scale.
    pub fn initial_volume(mut self, volume: u8) -> Self {
        self.initial_volume = Some(volume);
        self
    }

    /// Finish the build, failing fast if a required capability is absent.
    pub fn build(self) -> Result<CoreConfig> {
        let http_client = self.http_client.ok_or_else(|| Error::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: "supply one with CoreConfigBuilder::http_client (e.g. \
                      bridge_desktop::ReqwestHttpClient on desktop hosts)"
                .to_string(),
        })?;
        let backend_factory = self.backend_factory.ok_or_else(|| Error::CapabilityMissing {
            capability: "AudioBackendFactory".to_string(),
            message: "supply one with CoreConfigBuilder::backend_factory (e.g. \
                      bridge_audio::BufferedBackendFactory or RateBackendFactory)"
                .to_string(),
        })?;

        let config = CoreConfig {
            http_client,
            backend_factory,
            catalog_base_url: self
                .catalog_base_url
                .unwrap_or_else(|| DEFAULT_CATALOG_BASE_URL.to_string()),
            event_capacity: self.event_capacity.unwrap_or(DEFAULT_EVENT_CAPACITY),
            initial_volume: self.initial_volume.unwrap_or(DEFAULT_INITIAL_VOLUME),
        };
        config.validate()?;
        Ok(config)
    }
}
