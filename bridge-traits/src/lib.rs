//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the preview-player core and
//! platform-specific implementations. Each trait represents a capability that
//! the core requires but that must be implemented differently per platform.
//!
//! ## Traits
//!
//! ### Audio
//! - [`AudioBackend`](audio::AudioBackend) - Load-by-URL, start/pause/stop,
//!   gain control, and "is producing sound" observation over a native engine
//! - [`AudioBackendFactory`](audio::AudioBackendFactory) - Per-track backend
//!   construction wired to an event channel
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with retry and TLS
//!
//! ## Engine families
//!
//! Two unrelated engine families implement [`AudioBackend`](audio::AudioBackend):
//!
//! | Family    | Preparation                  | "Playing" signal      |
//! |-----------|------------------------------|-----------------------|
//! | Buffered  | async prepare, `Ready` event | explicit engine state |
//! | Rate      | collapses into `load`        | rate != 0             |
//!
//! The consumer depends only on the capability set and the
//! [`BackendEvent`](audio::BackendEvent) channel, never on a concrete family.
//!
//! ## Error Handling
//!
//! Bridge traits use [`BridgeError`](error::BridgeError) for host-facing
//! failures; backend bodies additionally report
//! [`BackendError`](audio::BackendError), which the playback controller
//! absorbs into its best-effort status rather than propagating.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks. Implementations must ensure thread safety.

pub mod audio;
pub mod error;
pub mod http;

pub use error::BridgeError;

// Re-export commonly used types
pub use audio::{
    AudioBackend, AudioBackendFactory, BackendError, BackendEvent, BackendEventKind, BackendId,
    BackendResult, Track,
};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
