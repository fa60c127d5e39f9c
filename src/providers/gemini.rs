use crate::{
    config::GeminiConfig,
    error::AppError,
    models::gemini::{
        FileMetadata, FileState, GenerateContentRequest, GenerateContentResponse,
        UploadFileResponse,
    },
};
use reqwest::Client;
use std::time::Duration;

/// Call Gemini Generate Content API
/// Note: Model name is part of the URL path
pub async fn generate_content(
    client: &Client,
    config: &GeminiConfig,
    request: &GenerateContentRequest,
) -> Result<GenerateContentResponse, AppError> {
    // Gemini API format: /v1beta/models/{model}:generateContent
    let url = format!("{}/models/{}:generateContent", config.base_url, config.model);

    let response = client
        .post(&url)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(config.timeout_seconds))
        .query(&[("key", &config.api_key)])
        .json(request)
        .send()
        .await?;

    let response = check_status(response).await?;
    let body: GenerateContentResponse = response.json().await?;

    if let Some(usage) = &body.usage_metadata {
        tracing::debug!(
            prompt_tokens = usage.prompt_token_count,
            candidate_tokens = usage.candidates_token_count,
            "generateContent completed"
        );
    }

    Ok(body)
}

/// Upload a video to the Files API using the resumable upload protocol.
///
/// Two round trips: a start command that opens an upload session, then a
/// single upload+finalize request against the session URL. Returns the
/// created file's metadata, usually still in the PROCESSING state.
pub async fn upload_file(
    client: &Client,
    config: &GeminiConfig,
    data: Vec<u8>,
    mime_type: &str,
    display_name: &str,
) -> Result<FileMetadata, AppError> {
    let start_url = format!("{}/files", config.upload_base_url);

    let start_response = client
        .post(&start_url)
        .header("X-Goog-Upload-Protocol", "resumable")
        .header("X-Goog-Upload-Command", "start")
        .header("X-Goog-Upload-Header-Content-Length", data.len().to_string())
        .header("X-Goog-Upload-Header-Content-Type", mime_type)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(config.timeout_seconds))
        .query(&[("key", &config.api_key)])
        .json(&serde_json::json!({ "file": { "display_name": display_name } }))
        .send()
        .await?;

    let start_response = check_status(start_response).await?;

    // The session URL comes back as a response header, not a body field
    let upload_url = start_response
        .headers()
        .get("x-goog-upload-url")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::Extraction("upload session did not return an upload URL".to_string())
        })?;

    tracing::debug!(bytes = data.len(), mime_type, "upload session opened");

    let finalize_response = client
        .post(&upload_url)
        .header("X-Goog-Upload-Offset", "0")
        .header("X-Goog-Upload-Command", "upload, finalize")
        .timeout(Duration::from_secs(config.timeout_seconds))
        .body(data)
        .send()
        .await?;

    let finalize_response = check_status(finalize_response).await?;
    let uploaded: UploadFileResponse = finalize_response.json().await?;

    tracing::info!(file = %uploaded.file.name, state = ?uploaded.file.state, "video uploaded");

    Ok(uploaded.file)
}

/// Fetch current metadata for a Files API asset by resource name
/// (e.g. "files/abc-123").
pub async fn get_file(
    client: &Client,
    config: &GeminiConfig,
    name: &str,
) -> Result<FileMetadata, AppError> {
    let url = format!("{}/{}", config.base_url, name);

    let response = client
        .get(&url)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .query(&[("key", &config.api_key)])
        .send()
        .await?;

    let response = check_status(response).await?;
    Ok(response.json::<FileMetadata>().await?)
}

/// Poll an uploaded file until it leaves PROCESSING.
///
/// Returns the ACTIVE metadata. Processing failure and deadline expiry
/// both abort the extraction; dropping the future cancels the wait.
pub async fn wait_for_active(
    client: &Client,
    config: &GeminiConfig,
    mut file: FileMetadata,
) -> Result<FileMetadata, AppError> {
    let interval = Duration::from_secs(config.poll_interval_seconds);
    let deadline =
        tokio::time::Instant::now() + Duration::from_secs(config.poll_timeout_seconds);

    loop {
        match file.state {
            FileState::Active => return Ok(file),
            FileState::Failed => {
                return Err(AppError::Extraction(format!(
                    "file processing failed: {}",
                    file.name
                )));
            }
            FileState::Processing | FileState::StateUnspecified => {
                if tokio::time::Instant::now() >= deadline {
                    return Err(AppError::Extraction(format!(
                        "timed out after {}s waiting for {} to finish processing",
                        config.poll_timeout_seconds, file.name
                    )));
                }
                tracing::debug!(file = %file.name, "waiting for file processing");
                tokio::time::sleep(interval).await;
                file = get_file(client, config, &file.name).await?;
            }
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(AppError::Upstream {
            status,
            message: error_text,
        });
    }
    Ok(response)
}
