//! # Core Catalog Module
//!
//! Track search against a Deezer-compatible catalog API, with a seeded
//! fallback catalog so search never fails from the caller's point of view.
//!
//! ## Overview
//!
//! [`CatalogService`] is the single entry point. It issues the remote search
//! over the host-supplied `HttpClient`, maps rows to playable
//! [`Track`](bridge_traits::Track) values (rows without a preview asset are
//! dropped), and substitutes the built-in fallback list whenever the remote
//! path errors, times out, or answers with nothing playable. Search
//! lifecycle is published on the core event bus.

pub mod error;
pub mod fallback;
pub mod service;
pub mod types;

pub use error::{CatalogError, Result};
pub use service::CatalogService;
