//! HTTP client for the recommendation backend
//!
//! One reqwest client speaks the whole REST contract: chat turns, catalog
//! lookups, and the evaluation job endpoints. Session and poller code is
//! written against the `ChatBackend` and `EvalBackend` traits rather than
//! this concrete type.

use crate::config::BackendConfig;
use crate::error::{Result, ShopchatError};
use crate::api::types::{
    CatalogMeta, ChatRequest, ChatResponse, EvalMode, EvalRunResponse, EvalStatusResponse,
    Product, ProductsResponse,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Chat side of the backend contract
///
/// The session state machine dispatches turns through this seam so tests
/// can script replies without a server.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one chat turn and wait for the reply
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

/// Evaluation side of the backend contract
#[async_trait]
pub trait EvalBackend: Send + Sync {
    /// Submit an evaluation job; returns the job identifier
    async fn run_eval(&self, mode: EvalMode) -> Result<String>;

    /// Query the status of a submitted job
    async fn eval_status(&self, job_id: &str) -> Result<EvalStatusResponse>;

    /// Fetch the latest evaluation summary
    async fn eval_summary(&self) -> Result<serde_json::Value>;

    /// Fetch the evaluation run history
    async fn eval_history(&self) -> Result<serde_json::Value>;
}

/// HTTP client for the recommendation backend
///
/// # Examples
///
/// ```no_run
/// use shopchat::config::BackendConfig;
/// use shopchat::api::BackendClient;
///
/// # async fn example() -> shopchat::error::Result<()> {
/// let client = BackendClient::new(&BackendConfig::default())?;
/// let meta = client.meta().await?;
/// println!("{} brands in catalog", meta.brands.len());
/// # Ok(())
/// # }
/// ```
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// # Arguments
    ///
    /// * `config` - Backend connection settings
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        url::Url::parse(&config.base_url).map_err(|e| {
            ShopchatError::Config(format!("invalid base URL '{}': {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("shopchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ShopchatError::Http)?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::info!("Initialized backend client: base_url={}", base_url);

        Ok(Self { client, base_url })
    }

    /// The base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Decode a response, mapping non-2xx statuses to a backend error
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ShopchatError::Backend {
                status: status.as_u16(),
                message,
            }
            .into());
        }
        Ok(response.json().await.map_err(ShopchatError::Http)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send().await.map_err(ShopchatError::Http)?;
        Self::decode(response).await
    }

    /// Backend liveness check (`GET /health`)
    pub async fn health(&self) -> Result<serde_json::Value> {
        self.get_json(format!("{}/health", self.base_url)).await
    }

    /// Catalog metadata for the filter panel (`GET /meta`)
    pub async fn meta(&self) -> Result<CatalogMeta> {
        self.get_json(format!("{}/meta", self.base_url)).await
    }

    /// Product detail lookup (`GET /products/{id}`)
    pub async fn product(&self, id: &str) -> Result<Product> {
        self.get_json(format!("{}/products/{}", self.base_url, id))
            .await
    }

    /// Similar-product lookup (`GET /similar/{id}?top_k=`)
    pub async fn similar(&self, id: &str, top_k: u32) -> Result<Vec<Product>> {
        let response: ProductsResponse = self
            .get_json(format!(
                "{}/similar/{}?top_k={}",
                self.base_url, id, top_k
            ))
            .await?;
        Ok(response.products)
    }
}

#[async_trait]
impl ChatBackend for BackendClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat", self.base_url);
        tracing::debug!(
            "POST {} ({} messages, image={}, filters={})",
            url,
            request.messages.len(),
            request.image_base64.is_some(),
            request.filters.is_some()
        );
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(ShopchatError::Http)?;
        Self::decode(response).await
    }
}

#[async_trait]
impl EvalBackend for BackendClient {
    async fn run_eval(&self, mode: EvalMode) -> Result<String> {
        let url = format!("{}/api/eval/run", self.base_url);
        tracing::debug!("POST {} (mode={})", url, mode);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "mode": mode.as_str() }))
            .send()
            .await
            .map_err(ShopchatError::Http)?;
        let run: EvalRunResponse = Self::decode(response).await?;
        Ok(run.job_id)
    }

    async fn eval_status(&self, job_id: &str) -> Result<EvalStatusResponse> {
        self.get_json(format!("{}/api/eval/status/{}", self.base_url, job_id))
            .await
    }

    async fn eval_summary(&self) -> Result<serde_json::Value> {
        self.get_json(format!("{}/api/eval/summary", self.base_url))
            .await
    }

    async fn eval_history(&self) -> Result<serde_json::Value> {
        self.get_json(format!("{}/api/eval/history", self.base_url))
            .await
    }
}
