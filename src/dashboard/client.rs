//! HTTP client for the estimator API
//!
//! The interactive dashboard is a plain API consumer: it talks to the same
//! two endpoints any other frontend would use.

use anyhow::Result;
use reqwest::{multipart, Client};
use std::path::Path;

use crate::models::{CostEstimate, EstimateCostRequest, Inventory, MoveParameters};

/// HTTP client wrapper for the analyze and estimate endpoints
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `base_url` - Server root (e.g., "http://localhost:8000")
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Upload a local video file for inventory extraction
    pub async fn analyze_video_file(
        &self,
        path: &Path,
        home_type: &str,
        room_count: u32,
    ) -> Result<Inventory> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow::anyhow!("Cannot read video {}: {}", path.display(), e))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("walkthrough.mp4")
            .to_string();

        let form = multipart::Form::new()
            .part("video_file", multipart::Part::bytes(bytes).file_name(file_name))
            .text("home_type", home_type.to_string())
            .text("room_count", room_count.to_string());
        self.post_analyze(form).await
    }

    /// Submit a video URL for inventory extraction
    pub async fn analyze_video_url(
        &self,
        url: &str,
        home_type: &str,
        room_count: u32,
    ) -> Result<Inventory> {
        let form = multipart::Form::new()
            .text("youtube_url", url.to_string())
            .text("home_type", home_type.to_string())
            .text("room_count", room_count.to_string());
        self.post_analyze(form).await
    }

    /// Request a cost estimate for an extracted inventory
    pub async fn estimate_cost(
        &self,
        inventory: &Inventory,
        params: &MoveParameters,
    ) -> Result<CostEstimate> {
        let request = EstimateCostRequest {
            inventory: inventory.clone(),
            params: params.clone(),
        };
        let response = self
            .client
            .post(format!("{}/api/v1/estimate-cost", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to reach estimator API: {}", e))?;
        Self::parse_response(response).await
    }

    async fn post_analyze(&self, form: multipart::Form) -> Result<Inventory> {
        let response = self
            .client
            .post(format!("{}/api/v1/analyze-video", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to reach estimator API: {}", e))?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read API response: {}", e))?;

        if !status.is_success() {
            anyhow::bail!("API error (HTTP {}): {}", status, error_detail(&text));
        }

        serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("Unexpected API response: {}", e))
    }
}

/// Pull the message out of the server's error envelope, falling back to the
/// raw body when it is not the expected JSON shape.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/".to_string());
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_error_detail_reads_error_envelope() {
        let body = r#"{"error":{"message":"either video_file or youtube_url must be provided","type":"invalid_request"}}"#;
        assert_eq!(
            error_detail(body),
            "either video_file or youtube_url must be provided"
        );
    }

    #[test]
    fn test_error_detail_falls_back_to_raw_body() {
        assert_eq!(error_detail("bad gateway\n"), "bad gateway");
    }
}
