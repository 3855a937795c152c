//! Thin HTTP client for the Apiframe endpoints.
//!
//! Every method validates its request locally, issues exactly one HTTP call and
//! returns the decoded JSON body untouched. Failures come back as `AppError`;
//! nothing is swallowed.
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::task::requests::*;
use crate::utils::response_ops::first_error_message;

#[derive(Clone)]
pub struct ApiframeClient {
    client: Client,
    config: Config,
}

impl ApiframeClient {
    /// Client against the default base URL. Fails if `api_key` is empty.
    pub fn new(api_key: impl Into<String>, verbose: bool) -> AppResult<Self> {
        Ok(Self::with_config(Config::new(api_key)?.with_verbose(verbose)))
    }

    pub fn with_config(config: Config) -> Self {
        ApiframeClient { client: Client::new(), config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate four images from a text prompt (`/imagine` on Discord).
    pub async fn imagine(&self, request: ImagineRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    /// Upscale one of the four images of an imagine grid.
    pub async fn upscale_1x(&self, request: Upscale1xRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    /// Subtle or creative upscale of an image produced by `upscale_1x`.
    pub async fn upscale_alt(&self, request: UpscaleAltRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    pub async fn upscale_highres(&self, request: UpscaleHighresRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    /// New grid from a previous imagine task.
    pub async fn reroll(&self, request: RerollRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    pub async fn variations(&self, request: VariationsRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    pub async fn inpaint(&self, request: InpaintRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    pub async fn outpaint(&self, request: OutpaintRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    pub async fn pan(&self, request: PanRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    /// Four example prompts written from an image.
    pub async fn describe(&self, request: DescribeRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    pub async fn blend(&self, request: BlendRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    /// Seed of a generated image.
    pub async fn seed(&self, request: SeedRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    pub async fn faceswap(&self, request: FaceswapRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    /// Current status and result of a task.
    pub async fn fetch(&self, request: FetchRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    pub async fn fetch_many(&self, request: FetchManyRequest) -> AppResult<Value> {
        self.submit(&request).await
    }

    /// Account details: credits remaining, plan, usage totals.
    pub async fn account(&self) -> AppResult<Value> {
        let url = self.url("account");
        tracing::info!("Fetching account details from {}", url);
        let response = self.authorized(self.client.get(&url)).send().await.map_err(|e| {
            tracing::error!(endpoint = "account", "Request failed: {}", e);
            AppError::Http(e)
        })?;
        self.decode("account", response).await
    }

    /// Validate `request` and post it to its endpoint.
    pub async fn submit<R: TaskRequest>(&self, request: &R) -> AppResult<Value> {
        if let Err(e) = request.validate() {
            tracing::warn!(endpoint = R::PATH, "Rejected before sending: {}", e);
            return Err(e);
        }

        let url = self.url(R::PATH);
        tracing::info!("Sending task to Apiframe at URL: {}", url);
        if tracing::enabled!(tracing::Level::DEBUG) {
            let payload = redact_for_log(serde_json::to_value(request)?);
            tracing::debug!(endpoint = R::PATH, "Request payload: {}", payload);
        }

        let response = self
            .authorized(self.client.post(&url))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(endpoint = R::PATH, "Request failed: {}", e);
                AppError::Http(e)
            })?;
        self.decode(R::PATH, response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url(), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(AUTHORIZATION, self.config.api_key())
            .header(CONTENT_TYPE, "application/json")
    }

    async fn decode(&self, endpoint: &'static str, response: Response) -> AppResult<Value> {
        let status = response.status();
        let body = response.text().await.map_err(AppError::Http)?;

        if status.is_success() {
            let json: Value = if body.trim().is_empty() {
                json!({})
            } else {
                serde_json::from_str(&body).map_err(|e| {
                    tracing::error!(endpoint, "Response is not valid JSON: {}", e);
                    AppError::Json(e)
                })?
            };
            if self.config.verbose() {
                tracing::info!(endpoint, response = %json, "Apiframe response");
            }
            Ok(json)
        } else {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| first_error_message(&v).map(str::to_string))
                .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            tracing::error!(endpoint, status = status.as_u16(), "{}", message);
            Err(AppError::Api { status: status.as_u16(), message })
        }
    }
}

const MASK_LOG_CHARS: usize = 16;

/// Payload copy safe for logs: `webhook_secret` hidden, `mask` cut short.
fn redact_for_log(mut payload: Value) -> Value {
    if let Some(obj) = payload.as_object_mut() {
        if let Some(secret) = obj.get_mut("webhook_secret") {
            *secret = Value::String("****".to_string());
        }
        if let Some(Value::String(mask)) = obj.get_mut("mask") {
            let len = mask.len();
            if len > MASK_LOG_CHARS {
                let head: String = mask.chars().take(MASK_LOG_CHARS).collect();
                *mask = format!("{}...({} bytes)", head, len);
            }
        }
    }
    payload
}
