//! # Audio Backend Bodies
//!
//! Concrete implementations of the [`AudioBackend`](bridge_traits::AudioBackend)
//! capability contract, one per engine family:
//!
//! - [`BufferedAudioBackend`] - buffered, asynchronously-prepared engine.
//!   `load` kicks off an asset fetch over the host's `HttpClient`; readiness
//!   is signaled with a `Ready` event once the whole preview asset is
//!   buffered. A failed instance is terminal.
//! - [`RateAudioBackend`] - rate-based engine. Loading settles immediately
//!   and "playing" is nothing more than a non-zero playback rate, so
//!   `load` + `start` behave synchronously from the consumer's point of view.
//!
//! Both bodies are single-use: the playback controller constructs a fresh
//! instance per track through an
//! [`AudioBackendFactory`](bridge_traits::AudioBackendFactory) and never
//! reuses one after `stop` or a failure.
//!
//! ## Event discipline
//!
//! Bodies never call back into the consumer. Everything asynchronous
//! (prepared, finished, errored) is delivered as a
//! [`BackendEvent`](bridge_traits::BackendEvent) tagged with the instance's
//! [`BackendId`](bridge_traits::BackendId), so a late completion from a
//! superseded instance can be discarded by identity.

mod buffered;
mod rate;

pub use buffered::{BufferedAudioBackend, BufferedBackendFactory};
pub use rate::{RateAudioBackend, RateBackendFactory};
