//! Error types for the catalog crate

use thiserror::Error;

/// Catalog lookup errors
///
/// These never escape [`CatalogService::search_songs`](crate::CatalogService::search_songs);
/// they exist so the remote path can report precisely why the fallback
/// catalog was substituted.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog API request returned a non-success status
    #[error("Catalog API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse the API response body
    #[error("Failed to parse catalog response: {0}")]
    ParseError(String),

    /// Bridge-level transport failure
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
