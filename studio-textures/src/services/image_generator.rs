//! Texture image generation client
//!
//! The image service is opaque: it takes a short entity description and
//! answers with an image URL (or nothing). Failures never block texture
//! creation; the synthesizer logs them and stores the texture without an image.

use crate::models::{BilingualName, PriceTier};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Image service errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Image request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub entity_type: String,
    pub name: BilingualName,
    pub price_tier: PriceTier,
    pub finish: String,
}

impl ImageRequest {
    pub fn texture(name: BilingualName, price_tier: PriceTier, finish: impl Into<String>) -> Self {
        Self {
            entity_type: "texture".to_string(),
            name,
            price_tier,
            finish: finish.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    image_url: Option<String>,
}

/// External image service
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Image URL for the entity, `None` when the service produced nothing
    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<String>, ImageError>;
}

/// Generator used when no image endpoint is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledImageGenerator;

#[async_trait]
impl ImageGenerator for DisabledImageGenerator {
    async fn generate_image(&self, _request: &ImageRequest) -> Result<Option<String>, ImageError> {
        Ok(None)
    }
}

/// HTTP image service client
pub struct HttpImageGenerator {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpImageGenerator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ImageError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImageError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<String>, ImageError> {
        debug!(name = %request.name.en, finish = %request.finish, "Requesting texture image");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ImageError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ImageError::ApiError(status.as_u16(), error_text));
        }

        let body: ImageResponse = response
            .json()
            .await
            .map_err(|e| ImageError::ParseError(e.to_string()))?;

        Ok(body.image_url.filter(|url| !url.trim().is_empty()))
    }
}
