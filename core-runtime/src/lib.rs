//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the preview-player core:
//! - Logging and tracing infrastructure
//! - Configuration management with fail-fast capability validation
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the catalog and player
//! subsystems depend on. It establishes the logging conventions, the
//! capability-injection pattern for host bridges, and the event broadcasting
//! mechanism used throughout the system.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{Error, Result};
pub use events::{CatalogEvent, CoreEvent, EventBus, EventStream, PlayerEvent, SearchSource};
