//! # Core Player Module
//!
//! The playback controller: one active audio backend at a time, serialized
//! state mutations, and a non-blocking status snapshot.
//!
//! ## Overview
//!
//! [`PlayerController`] owns the session state (current track, playing flag,
//! volume step) behind a single async mutex. Backend signals arrive as
//! [`BackendEvent`](bridge_traits::BackendEvent)s on an internal channel and
//! are applied under the same mutex, with stale events from superseded
//! backends discarded by identity. Backend faults are absorbed into
//! `is_playing = false` and reported through `tracing` plus
//! [`PlayerEvent`](core_runtime::events::PlayerEvent)s; nothing playback-
//! related ever returns an error to the presentation layer.

pub mod controller;
pub mod status;

pub use controller::PlayerController;
pub use status::PlayerStatus;
