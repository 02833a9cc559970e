use std::sync::Arc;

use bytes::Bytes;
use log::warn;

use crate::error::KartografError;
use crate::platform::{HttpRequest, HttpService};
use crate::state::MapViewState;

/// Style of the marker overlay drawn by the static map service.
const MARKER_STYLE: &str = "pm2dom";

/// Loads map images for a [`MapViewState`] from the static map service.
pub struct StaticMapClient {
    endpoint: String,
    http: Arc<dyn HttpService>,
}

impl StaticMapClient {
    /// Creates a new client for the service at `endpoint`.
    pub fn new(endpoint: impl Into<String>, http: Arc<dyn HttpService>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }

    /// Request for the image showing the state.
    pub fn build_request(&self, state: &MapViewState) -> HttpRequest {
        let mut request = HttpRequest::new(&self.endpoint)
            .with_param("ll", state.center().to_string())
            .with_param("l", state.layout().wire_code())
            .with_param("z", state.zoom().to_string());

        if let Some(marker) = state.marker() {
            request = request.with_param("pt", format!("{},{MARKER_STYLE}", marker.position));
        }

        request
    }

    /// Loads the encoded image for the state. Single attempt, no retry.
    pub async fn fetch_map_image(&self, state: &MapViewState) -> Result<Bytes, KartografError> {
        let request = self.build_request(state);
        self.fetch(&request).await
    }

    pub(crate) async fn fetch(&self, request: &HttpRequest) -> Result<Bytes, KartografError> {
        match self.http.get(request).await {
            Ok(bytes) => Ok(bytes),
            Err(KartografError::FetchFailed(status)) => {
                warn!("Map image request {request} failed with status {status}");
                Err(KartografError::FetchFailed(status))
            }
            Err(err) => {
                warn!("Map image request {request} failed: {err}");
                Err(err)
            }
        }
    }
}
