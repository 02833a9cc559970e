//! Access to the network in a generic way, so that the core never depends on a concrete HTTP
//! client. See [`HttpService`].

use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::KartografError;

mod native;

pub use native::NativeHttpService;

/// A GET request: endpoint url and ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    endpoint: String,
    params: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a request to the endpoint without parameters.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: Vec::new(),
        }
    }

    /// Appends a query parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Endpoint url without the query string.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query parameters in the order they were added.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Value of the first parameter with the given name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl Display for HttpRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.endpoint)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            let separator = if i == 0 { '?' } else { '&' };
            // Api keys must not end up in logs.
            let value = if key == "apikey" { "***" } else { value };
            write!(f, "{separator}{key}={value}")?;
        }

        Ok(())
    }
}

/// Service performing HTTP requests on behalf of the core.
///
/// Implementations must return the body of the response for success statuses only. Anything else
/// is an error: [`KartografError::FetchFailed`] for non-success statuses and [`KartografError::IO`]
/// for transport failures.
#[async_trait]
pub trait HttpService: Send + Sync {
    /// Performs a GET request and returns the raw body.
    async fn get(&self, request: &HttpRequest) -> Result<Bytes, KartografError>;
}

/// Performs a GET request through the service and decodes the JSON body.
pub async fn fetch_json<T: DeserializeOwned>(
    service: &dyn HttpService,
    request: &HttpRequest,
) -> Result<T, KartografError> {
    let body = service.get(request).await?;
    Ok(serde_json::from_slice(&body)?)
}
