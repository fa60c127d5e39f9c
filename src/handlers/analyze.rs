use crate::{
    error::AppError,
    extractor::VideoSource,
    metrics,
    models::Inventory,
    service::MovingCostService,
};
use axum::{
    extract::{Multipart, State},
    Json,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MovingCostService>,
}

/// Handle /api/v1/analyze-video endpoint
///
/// Accepts a multipart form with either an uploaded `video_file` or a
/// `youtube_url`, plus optional `home_type` and `room_count` fields, and
/// returns the extracted inventory.
pub async fn handle_analyze_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Inventory>, AppError> {
    let start = Instant::now();

    let mut video_bytes: Option<Vec<u8>> = None;
    let mut video_filename: Option<String> = None;
    let mut youtube_url: Option<String> = None;
    let mut home_type = "apartment".to_string();
    let mut room_count: u32 = 3;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("invalid multipart payload: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "video_file" => {
                video_filename = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::InvalidRequest(format!("failed to read video_file: {e}"))
                })?;
                if !bytes.is_empty() {
                    video_bytes = Some(bytes.to_vec());
                }
            }
            "youtube_url" => {
                let value = read_text_field(field, "youtube_url").await?;
                if !value.trim().is_empty() {
                    youtube_url = Some(value.trim().to_string());
                }
            }
            "home_type" => {
                let value = read_text_field(field, "home_type").await?;
                if !value.trim().is_empty() {
                    home_type = value.trim().to_string();
                }
            }
            "room_count" => {
                let value = read_text_field(field, "room_count").await?;
                room_count = value.trim().parse().map_err(|_| {
                    AppError::InvalidRequest("room_count must be a positive integer".to_string())
                })?;
            }
            // Unknown fields are ignored so clients can evolve independently.
            _ => {}
        }
    }

    metrics::record_request("analyze_video");

    // A URL reference wins when both inputs are supplied.
    let inventory = if let Some(url) = youtube_url {
        tracing::info!(
            home_type = %home_type,
            room_count,
            source = "url",
            "Handling video analysis request"
        );
        state
            .service
            .analyze_video(&VideoSource::Url(url), &home_type, room_count)
            .await?
    } else if let Some(bytes) = video_bytes {
        tracing::info!(
            home_type = %home_type,
            room_count,
            source = "upload",
            size_bytes = bytes.len(),
            "Handling video analysis request"
        );
        let temp = stage_upload(&bytes, video_filename.as_deref()).await?;
        // The temp file is removed when `temp` drops, after extraction.
        state
            .service
            .analyze_video(
                &VideoSource::File(temp.path().to_path_buf()),
                &home_type,
                room_count,
            )
            .await?
    } else {
        return Err(AppError::InvalidRequest(
            "either video_file or youtube_url must be provided".to_string(),
        ));
    };

    tracing::info!(
        items = inventory.items.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Video analysis complete"
    );

    Ok(Json(inventory))
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("failed to read {name}: {e}")))
}

/// Write uploaded bytes to a named temp file, keeping the original extension
/// so the video MIME type can be inferred from the path.
async fn stage_upload(
    bytes: &[u8],
    filename: Option<&str>,
) -> Result<tempfile::NamedTempFile, AppError> {
    let mut builder = tempfile::Builder::new();
    let suffix = filename.and_then(temp_suffix);
    if let Some(suffix) = &suffix {
        builder.suffix(suffix);
    }
    let temp = builder
        .tempfile()
        .map_err(|e| AppError::Extraction(format!("cannot stage uploaded video: {e}")))?;
    tokio::fs::write(temp.path(), bytes)
        .await
        .map_err(|e| AppError::Extraction(format!("cannot stage uploaded video: {e}")))?;
    Ok(temp)
}

fn temp_suffix(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
}
