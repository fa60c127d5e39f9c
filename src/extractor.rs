//! Stage 1: walkthrough video to itemized inventory
//!
//! One generation round trip with the video attached. How the video
//! travels depends on where it lives: remote URLs go by reference,
//! small local files ride inline as base64, and large local files are
//! uploaded to the Files API first and referenced once processed.

use std::path::{Path, PathBuf};
use std::time::Instant;

use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;

use crate::config::GeminiConfig;
use crate::error::AppError;
use crate::metrics;
use crate::models::gemini::{Content, FileData, GenerateContentRequest, InlineData, Part};
use crate::models::inventory::Inventory;
use crate::parser;
use crate::prompts;
use crate::providers::gemini;

/// Where the walkthrough video lives
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// Remote reference (YouTube or any URI the inference service accepts)
    Url(String),
    /// Local file; transport depends on its size
    File(PathBuf),
}

/// MIME type for a local video, from the file extension
fn video_mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("avi") => "video/x-msvideo",
        Some(ext) if ext.eq_ignore_ascii_case("mov") => "video/quicktime",
        Some(ext) if ext.eq_ignore_ascii_case("webm") => "video/webm",
        _ => "video/mp4",
    }
}

/// Stage 1 engine: attach the video, ask for the inventory, parse it.
#[derive(Clone)]
pub struct InventoryExtractor {
    client: Client,
    gemini: GeminiConfig,
}

impl InventoryExtractor {
    pub fn new(client: Client, gemini: GeminiConfig) -> Self {
        Self { client, gemini }
    }

    /// Extract an itemized inventory from the walkthrough video.
    ///
    /// The home context steers the model's counting; it does not change
    /// the transport or the expected reply shape.
    pub async fn extract(
        &self,
        video: &VideoSource,
        home_type: &str,
        room_count: u32,
    ) -> Result<Inventory, AppError> {
        let start = Instant::now();

        let video_part = self.video_part(video).await?;
        let prompt = prompts::build_inventory_prompt(home_type, room_count);

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![video_part, Part::Text { text: prompt }],
            }],
        };

        let response = gemini::generate_content(&self.client, &self.gemini, &request).await?;
        let text = response
            .text()
            .ok_or_else(|| AppError::Parse("model reply contained no text".to_string()))?;

        let inventory: Inventory = parser::parse_reply(&text)?;
        inventory.validate()?;

        metrics::record_stage_duration("extract", start.elapsed());
        tracing::info!(
            items = inventory.items.len(),
            volume = inventory.total_volume_cubic_feet,
            special = inventory.needs_special_handling.len(),
            "inventory extracted"
        );

        Ok(inventory)
    }

    /// Build the content part carrying the video, choosing the transport.
    async fn video_part(&self, video: &VideoSource) -> Result<Part, AppError> {
        match video {
            VideoSource::Url(url) => Ok(Part::FileData {
                file_data: FileData {
                    file_uri: url.clone(),
                    mime_type: None,
                },
            }),
            VideoSource::File(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    AppError::Extraction(format!("cannot read video {}: {}", path.display(), e))
                })?;
                let mime_type = video_mime_type(path);

                if (data.len() as u64) < self.gemini.inline_limit_bytes {
                    Ok(Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: general_purpose::STANDARD.encode(&data),
                        },
                    })
                } else {
                    self.uploaded_part(path, data, mime_type).await
                }
            }
        }
    }

    /// Upload a large video and wait until it is ready to reference.
    async fn uploaded_part(
        &self,
        path: &Path,
        data: Vec<u8>,
        mime_type: &str,
    ) -> Result<Part, AppError> {
        let display_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("walkthrough")
            .to_string();

        let file =
            gemini::upload_file(&self.client, &self.gemini, data, mime_type, &display_name)
                .await?;
        let file = gemini::wait_for_active(&self.client, &self.gemini, file).await?;

        let uri = file
            .uri
            .clone()
            .ok_or_else(|| AppError::Extraction(format!("file {} has no reference URI", file.name)))?;

        Ok(Part::FileData {
            file_data: FileData {
                file_uri: uri,
                mime_type: file.mime_type.clone(),
            },
        })
    }
}
