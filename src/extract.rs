use async_trait::async_trait;
use lastseen_match::DetectedFace;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("extractor request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("extractor returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Turns raw image bytes into zero or more detected faces with descriptors.
/// One deployment uses one extractor, so descriptor dimensionality is fixed
/// across calls. Zero faces is a valid result, not an error.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, image: &[u8]) -> Result<Vec<DetectedFace>, ExtractError>;
}

#[derive(Deserialize)]
struct ExtractResponse {
    faces: Vec<DetectedFace>,
}

/// Client for the extraction microservice: posts the image bytes, decodes
/// the JSON face list.
pub struct RemoteExtractor {
    client: reqwest::Client,
    url: String,
}

impl RemoteExtractor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Extractor for RemoteExtractor {
    async fn extract(&self, image: &[u8]) -> Result<Vec<DetectedFace>, ExtractError> {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ExtractError::Status(response.status()));
        }
        let decoded: ExtractResponse = response.json().await?;
        Ok(decoded.faces)
    }
}
