/// Integration tests for video inventory extraction against a mocked
/// inference backend
use httpmock::prelude::*;
use serde_json::json;
use std::io::Write;

use movecost::{
    config::GeminiConfig,
    error::AppError,
    extractor::{InventoryExtractor, VideoSource},
};

const FENCED_INVENTORY: &str = "```json\n{\n  \"items\": [\n    {\"name\": \"sofa\", \"quantity\": 1, \"size\": \"large\", \"category\": \"furniture\"},\n    {\"name\": \"bookshelf\", \"quantity\": 2, \"size\": \"medium\", \"category\": \"furniture\"}\n  ],\n  \"total_volume_cubic_feet\": 650,\n  \"needs_special_handling\": [\"piano\"]\n}\n```";

fn mock_gemini_config(server: &MockServer) -> GeminiConfig {
    GeminiConfig {
        api_key: "test-key".to_string(),
        base_url: format!("{}/v1beta", server.base_url()),
        upload_base_url: format!("{}/upload/v1beta", server.base_url()),
        poll_interval_seconds: 0,
        poll_timeout_seconds: 5,
        ..GeminiConfig::default()
    }
}

fn model_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 1200,
            "candidatesTokenCount": 80,
            "totalTokenCount": 1280
        }
    })
}

fn temp_video(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".mp4")
        .tempfile()
        .unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_extract_inventory_from_video_url() {
    let server = MockServer::start_async().await;
    let generate = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent")
                .query_param("key", "test-key");
            then.status(200).json_body(model_reply(FENCED_INVENTORY));
        })
        .await;

    let extractor =
        InventoryExtractor::new(reqwest::Client::new(), mock_gemini_config(&server));
    let inventory = extractor
        .extract(
            &VideoSource::Url("https://youtu.be/demo".to_string()),
            "apartment",
            3,
        )
        .await
        .unwrap();

    generate.assert_async().await;
    assert_eq!(inventory.items.len(), 2);
    assert_eq!(inventory.items[0].name, "sofa");
    assert_eq!(inventory.total_volume_cubic_feet, 650.0);
    assert_eq!(inventory.needs_special_handling, vec!["piano"]);
}

#[tokio::test]
async fn test_small_file_goes_inline_not_through_files_api() {
    let server = MockServer::start_async().await;
    let generate = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent");
            then.status(200).json_body(model_reply(FENCED_INVENTORY));
        })
        .await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST).path("/upload/v1beta/files");
            then.status(500);
        })
        .await;

    let video = temp_video(b"tiny test clip");
    let extractor =
        InventoryExtractor::new(reqwest::Client::new(), mock_gemini_config(&server));
    let inventory = extractor
        .extract(
            &VideoSource::File(video.path().to_path_buf()),
            "apartment",
            2,
        )
        .await
        .unwrap();

    generate.assert_async().await;
    assert_eq!(upload.hits_async().await, 0);
    assert_eq!(inventory.items.len(), 2);
}

#[tokio::test]
async fn test_large_file_uses_resumable_upload_and_polling() {
    let server = MockServer::start_async().await;

    let start = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/upload/v1beta/files")
                .header("x-goog-upload-protocol", "resumable")
                .header("x-goog-upload-command", "start");
            then.status(200)
                .header("x-goog-upload-url", server.url("/upload-session"))
                .json_body(json!({}));
        })
        .await;
    let finalize = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/upload-session")
                .header("x-goog-upload-command", "upload, finalize");
            then.status(200).json_body(json!({
                "file": {
                    "name": "files/vid-1",
                    "mimeType": "video/mp4",
                    "sizeBytes": "64",
                    "state": "PROCESSING"
                }
            }));
        })
        .await;
    let poll = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1beta/files/vid-1");
            then.status(200).json_body(json!({
                "name": "files/vid-1",
                "mimeType": "video/mp4",
                "sizeBytes": "64",
                "state": "ACTIVE",
                "uri": "https://generativelanguage.googleapis.com/v1beta/files/vid-1"
            }));
        })
        .await;
    let generate = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent");
            then.status(200).json_body(model_reply(FENCED_INVENTORY));
        })
        .await;

    // Force the Files API path with a limit below the file size.
    let config = GeminiConfig {
        inline_limit_bytes: 8,
        ..mock_gemini_config(&server)
    };
    let video = temp_video(&[0u8; 64]);
    let extractor = InventoryExtractor::new(reqwest::Client::new(), config);
    let inventory = extractor
        .extract(&VideoSource::File(video.path().to_path_buf()), "house", 5)
        .await
        .unwrap();

    start.assert_async().await;
    finalize.assert_async().await;
    poll.assert_async().await;
    generate.assert_async().await;
    assert_eq!(inventory.items.len(), 2);
}

#[tokio::test]
async fn test_failed_file_processing_aborts_extraction() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/upload/v1beta/files");
            then.status(200)
                .header("x-goog-upload-url", server.url("/upload-session"))
                .json_body(json!({}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/upload-session");
            then.status(200).json_body(json!({
                "file": {"name": "files/vid-2", "state": "PROCESSING"}
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1beta/files/vid-2");
            then.status(200)
                .json_body(json!({"name": "files/vid-2", "state": "FAILED"}));
        })
        .await;

    let config = GeminiConfig {
        inline_limit_bytes: 8,
        ..mock_gemini_config(&server)
    };
    let video = temp_video(&[0u8; 64]);
    let extractor = InventoryExtractor::new(reqwest::Client::new(), config);
    let err = extractor
        .extract(&VideoSource::File(video.path().to_path_buf()), "house", 4)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Extraction(_)));
    assert!(err.to_string().contains("processing failed"));
}

#[tokio::test]
async fn test_non_json_reply_is_a_parse_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent");
            then.status(200)
                .json_body(model_reply("The home contains a sofa and two shelves."));
        })
        .await;

    let extractor =
        InventoryExtractor::new(reqwest::Client::new(), mock_gemini_config(&server));
    let err = extractor
        .extract(
            &VideoSource::Url("https://youtu.be/demo".to_string()),
            "apartment",
            3,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Parse(_)));
}

#[tokio::test]
async fn test_zero_quantity_item_is_a_schema_error() {
    let server = MockServer::start_async().await;
    let reply = json!({
        "items": [{"name": "ghost chair", "quantity": 0, "size": "small", "category": "furniture"}],
        "total_volume_cubic_feet": 100,
        "needs_special_handling": []
    });
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent");
            then.status(200).json_body(model_reply(&reply.to_string()));
        })
        .await;

    let extractor =
        InventoryExtractor::new(reqwest::Client::new(), mock_gemini_config(&server));
    let err = extractor
        .extract(
            &VideoSource::Url("https://youtu.be/demo".to_string()),
            "apartment",
            3,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Schema(_)));
    assert!(err.to_string().contains("ghost chair"));
}

#[tokio::test]
async fn test_upstream_error_status_is_preserved() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent");
            then.status(429)
                .json_body(json!({"error": {"message": "quota exceeded"}}));
        })
        .await;

    let extractor =
        InventoryExtractor::new(reqwest::Client::new(), mock_gemini_config(&server));
    let err = extractor
        .extract(
            &VideoSource::Url("https://youtu.be/demo".to_string()),
            "apartment",
            3,
        )
        .await
        .unwrap_err();

    match err {
        AppError::Upstream { status, message } => {
            assert_eq!(status.as_u16(), 429);
            assert!(message.contains("quota exceeded"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}
