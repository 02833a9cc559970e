use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info};

use crate::error::KartografError;
use crate::platform::{HttpRequest, HttpService};

const USER_AGENT: &str = concat!("kartograf/", env!("CARGO_PKG_VERSION"));

/// [`HttpService`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct NativeHttpService {
    http_client: reqwest::Client,
}

impl NativeHttpService {
    /// Creates a new service with its own connection pool.
    pub fn new() -> Result<Self, KartografError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http_client })
    }

    /// Creates a service reusing an existing client.
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl HttpService for NativeHttpService {
    async fn get(&self, request: &HttpRequest) -> Result<Bytes, KartografError> {
        debug!("Loading {request}");
        let response = self
            .http_client
            .get(request.endpoint())
            .query(request.params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            info!(
                "Failed to load {request}: {status}, {:?}",
                response.text().await
            );
            return Err(KartografError::FetchFailed(status.as_u16()));
        }

        Ok(response.bytes().await?)
    }
}
