//! The request executor the facade talks through.
//! `BeaconNodeHttp` is the production implementation, tests swap in `MockTransport`.
use async_trait::async_trait;
use bytes::Bytes;
use mockall::automock;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::{ApiError, ServerErrorBody};
use super::request::{ApiRequest, Method};
use crate::env::ENV_CONFIG;

/// A successful (2xx) response, body still undecoded.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub body: Bytes,
}

impl ApiResponse {
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self { body: body.into() }
    }
}

/// Executes a single request against a beacon node.
///
/// Implementations must be safe to share between concurrent callers. A 404 is reported as
/// `ApiError::NotFound`, an indexed error body as `ApiError::BatchValidation`, so the facade
/// can tell them apart from generic failures.
#[automock]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

#[derive(Clone, Debug)]
pub struct BeaconNodeHttp {
    client: reqwest::Client,
    beacon_url: String,
}

impl BeaconNodeHttp {
    /// Builds a client from `BEACON_URL` and `BEACON_REQUEST_TIMEOUT_SECS`.
    pub fn new() -> Result<Self, ApiError> {
        let beacon_url = ENV_CONFIG
            .beacon_url
            .as_ref()
            .ok_or(ApiError::MissingBeaconUrl)?;
        Self::with_url(beacon_url, ENV_CONFIG.request_timeout)
    }

    pub fn with_url(beacon_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            beacon_url: beacon_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn beacon_url(&self) -> &str {
        &self.beacon_url
    }
}

#[async_trait]
impl Transport for BeaconNodeHttp {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.beacon_url, request.path);
        debug!(method = %request.method, path = %request.path, "sending beacon api request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query.iter().collect::<Vec<_>>());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            warn!(method = %request.method, path = %request.path, %err, "beacon api request failed");
            ApiError::from(err)
        })?;

        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(ApiResponse { body });
        }

        if status == StatusCode::NOT_FOUND {
            debug!(path = %request.path, "beacon api resource not found");
            return Err(ApiError::NotFound);
        }

        let error = serde_json::from_slice::<ServerErrorBody>(&body)
            .map(ApiError::from)
            .unwrap_or(ApiError::Status(status.as_u16()));
        warn!(method = %request.method, path = %request.path, %status, %error, "beacon node rejected request");
        Err(error)
    }
}
