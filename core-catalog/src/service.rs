//! Catalog search service
//!
//! Fronts a Deezer-compatible search API with a never-failing facade: any
//! transport fault, bad status, parse failure, or empty answer degrades to
//! the seeded fallback catalog instead of an error. Callers always get an
//! ordered, playable track list.

use bridge_traits::audio::Track;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_runtime::events::{CatalogEvent, CoreEvent, EventBus, SearchSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{CatalogError, Result};
use crate::fallback;
use crate::types::SearchResponse;

/// Request timeout for catalog lookups; past this the fallback answers.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Catalog search service
///
/// # Example
///
/// ```ignore
/// use core_catalog::CatalogService;
///
/// let catalog = CatalogService::new(http_client, base_url, event_bus);
/// let tracks = catalog.search_songs("queen").await;
/// assert!(!tracks.is_empty());
/// ```
pub struct CatalogService {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Base URL of the Deezer-compatible API
    base_url: String,

    /// Bus for search lifecycle events
    event_bus: EventBus,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: String, event_bus: EventBus) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            event_bus,
        }
    }

    /// Search for tracks matching a free-text query.
    ///
    /// Results keep the API's ranking order; rows without a preview asset
    /// are dropped since the core exists to play previews. This method never
    /// fails: when the remote catalog cannot produce a playable list the
    /// seeded fallback is substituted.
    #[instrument(skip(self))]
    pub async fn search_songs(&self, query: &str) -> Vec<Track> {
        self.emit(CatalogEvent::SearchStarted {
            query: query.to_string(),
        });

        let (tracks, source) = match self.remote_search(query).await {
            Ok(tracks) if !tracks.is_empty() => (tracks, SearchSource::Remote),
            Ok(_) => {
                debug!(query, "Remote catalog returned nothing playable, using fallback");
                (fallback::select(query), SearchSource::Fallback)
            }
            Err(e) => {
                warn!(query, error = %e, "Catalog lookup failed, using fallback");
                (fallback::select(query), SearchSource::Fallback)
            }
        };

        self.emit(CatalogEvent::SearchCompleted {
            query: query.to_string(),
            count: tracks.len(),
            source,
        });

        tracks
    }

    /// Query the remote catalog.
    async fn remote_search(&self, query: &str) -> Result<Vec<Track>> {
        let url = format!(
            "{}/search?q={}",
            self.base_url,
            urlencoding::encode(query)
        );

        let request = HttpRequest::get(&url)
            .header("Accept", "application/json")
            .timeout(SEARCH_TIMEOUT);

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(CatalogError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        let parsed: SearchResponse = response
            .json()
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let tracks: Vec<Track> = parsed
            .data
            .into_iter()
            .filter(|row| !row.preview.is_empty())
            .map(|row| Track::new(row.id.to_string(), row.title, row.artist.name, row.preview))
            .collect();

        debug!(query, count = tracks.len(), "Remote catalog answered");
        Ok(tracks)
    }

    fn emit(&self, event: CatalogEvent) {
        // A bus with no subscribers refuses the send; that is fine here.
        self.event_bus.emit(CoreEvent::Catalog(event)).ok();
    }
}
