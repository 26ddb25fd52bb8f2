//! HTTP client for the measurement and persistence backend


use crate::{
    error::{describe_transport_error, AppError, Result},
    models::{HealthStatus, ResultRecord, StoredResult},
};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// Client identifier sent with every request and persisted result
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Boundary contract to the remote measurement and persistence service.
///
/// The runner consumes ping/download/upload/submit; the history view
/// consumes list/get/delete.
#[async_trait]
pub trait ResultTransport: Send + Sync {
    /// Round-trip probe. Latency is the caller's own wall-clock
    /// measurement around this call, not a value the service returns.
    async fn ping(&self) -> Result<()>;

    /// Request a download payload of `size_mb` MiB and drain it,
    /// returning the number of bytes received.
    async fn download_payload(&self, size_mb: f64) -> Result<u64>;

    /// Send an upload payload; the acknowledgement body is discarded.
    async fn upload_payload(&self, body: Vec<u8>) -> Result<()>;

    /// Persist a result record, returning the stored form with its
    /// server-assigned id and timestamp.
    async fn submit_result(&self, record: &ResultRecord) -> Result<StoredResult>;

    /// List stored results, newest first.
    async fn list_results(&self, skip: u32, limit: u32) -> Result<Vec<StoredResult>>;

    /// Fetch a single stored result by id.
    async fn get_result(&self, id: &str) -> Result<StoredResult>;

    /// Delete a single stored result by id.
    async fn delete_result(&self, id: &str) -> Result<()>;

    /// Backend liveness probe.
    async fn health(&self) -> Result<HealthStatus>;
}

/// Backend HTTP client over an explicitly constructed reqwest client
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client for the given backend base URL
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::config(format!("Invalid backend base URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Resolve an API path against the base URL
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::parse(format!("Invalid endpoint path '{}': {}", path, e)))
    }

    /// Map a transport error on the persistence surface
    fn persistence_error(error: reqwest::Error) -> AppError {
        if error.is_timeout() {
            AppError::timeout(error.to_string())
        } else {
            AppError::persistence_failed(describe_transport_error(&error))
        }
    }
}

#[async_trait]
impl ResultTransport for ApiClient {
    async fn ping(&self) -> Result<()> {
        let response = self.client.get(self.endpoint("/api/test/ping")?).send().await?;
        response.error_for_status()?;
        Ok(())
    }

    async fn download_payload(&self, size_mb: f64) -> Result<u64> {
        let response = self
            .client
            .post(self.endpoint("/api/test/download")?)
            .query(&[("size_mb", size_mb)])
            .send()
            .await?
            .error_for_status()?;

        // Drain the body chunk by chunk; the transfer is only complete
        // once the final chunk has arrived.
        let mut stream = response.bytes_stream();
        let mut received: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            received += chunk.len() as u64;
        }

        Ok(received)
    }

    async fn upload_payload(&self, body: Vec<u8>) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint("/api/test/upload")?)
            .header("Content-Type", "application/octet-stream")
            .body(body)
            .send()
            .await?;
        response.error_for_status()?;
        Ok(())
    }

    async fn submit_result(&self, record: &ResultRecord) -> Result<StoredResult> {
        let response = self
            .client
            .post(self.endpoint("/api/results/")?)
            .json(record)
            .send()
            .await
            .map_err(Self::persistence_error)?;

        let response = response.error_for_status().map_err(Self::persistence_error)?;

        response
            .json::<StoredResult>()
            .await
            .map_err(|e| AppError::persistence_failed(format!("Malformed stored result: {}", e)))
    }

    async fn list_results(&self, skip: u32, limit: u32) -> Result<Vec<StoredResult>> {
        let response = self
            .client
            .get(self.endpoint("/api/results/")?)
            .query(&[("skip", skip), ("limit", limit)])
            .send()
            .await
            .map_err(Self::persistence_error)?
            .error_for_status()
            .map_err(Self::persistence_error)?;

        response
            .json::<Vec<StoredResult>>()
            .await
            .map_err(|e| AppError::persistence_failed(format!("Malformed result list: {}", e)))
    }

    async fn get_result(&self, id: &str) -> Result<StoredResult> {
        let response = self
            .client
            .get(self.endpoint(&format!("/api/results/{}", id))?)
            .send()
            .await
            .map_err(Self::persistence_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::not_found(id));
        }

        let response = response.error_for_status().map_err(Self::persistence_error)?;

        response
            .json::<StoredResult>()
            .await
            .map_err(|e| AppError::persistence_failed(format!("Malformed stored result: {}", e)))
    }

    async fn delete_result(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/api/results/{}", id))?)
            .send()
            .await
            .map_err(Self::persistence_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::not_found(id));
        }

        response.error_for_status().map_err(Self::persistence_error)?;
        Ok(())
    }

    async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .client
            .get(self.endpoint("/api/health")?)
            .send()
            .await?
            .error_for_status()?;

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| AppError::parse(format!("Malformed health response: {}", e)))
    }
}
