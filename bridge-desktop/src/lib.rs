//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the networking
//! bridge using desktop-appropriate libraries:
//! - `HttpClient` using `reqwest`
//!
//! The audio backend bodies live in `bridge-audio`; they are host-agnostic
//! and only need an `HttpClient` to fetch preview assets.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use bridge_traits::HttpClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new();
//!
//!     // Use in core configuration
//! }
//! ```

mod http;

pub use http::ReqwestHttpClient;
