/// Integration tests for the HTTP API surface
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use httpmock::prelude::*;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use movecost::{
    config::Config, handlers::AppState, server::create_router, service::MovingCostService,
};

/// Address with nothing listening, for tests that never reach upstream
const DEAD_UPSTREAM: &str = "http://127.0.0.1:9";

fn router_for(upstream_base: &str) -> axum::Router {
    let mut config = Config::default();
    config.gemini.api_key = "test-key".to_string();
    config.gemini.base_url = format!("{upstream_base}/v1beta");
    config.gemini.upload_base_url = format!("{upstream_base}/upload/v1beta");

    let state = AppState {
        service: Arc::new(MovingCostService::new(&config).unwrap()),
    };
    let handle = Arc::new(PrometheusBuilder::new().build_recorder().handle());
    create_router(state, handle, config.server.max_upload_bytes)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_request(fields: &[(&str, &str)]) -> Request<Body> {
    let boundary = "test-boundary-4e1f0a92";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method("POST")
        .uri("/api/v1/analyze-video")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn estimate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/estimate-cost")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn model_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

fn sample_estimate_body() -> Value {
    json!({
        "items": [
            {"name": "sofa", "quantity": 1, "size": "large", "category": "furniture"}
        ],
        "total_volume_cubic_feet": 800.0,
        "needs_special_handling": ["piano"],
        "distance_km": 45.0,
        "origin_floor": 3,
        "destination_floor": 2,
        "has_elevator_origin": false,
        "has_elevator_destination": true
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = router_for(DEAD_UPSTREAM)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "moving-cost-estimator");
}

#[tokio::test]
async fn test_service_info_lists_endpoints() {
    let response = router_for(DEAD_UPSTREAM)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Moving Cost Estimator API");
    assert!(body["endpoints"]
        .as_object()
        .unwrap()
        .contains_key("POST /api/v1/analyze-video"));
    assert!(body["endpoints"]
        .as_object()
        .unwrap()
        .contains_key("POST /api/v1/estimate-cost"));
}

#[tokio::test]
async fn test_metrics_endpoint_renders_prometheus_text() {
    let response = router_for(DEAD_UPSTREAM)
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(content_type, "text/plain; version=0.0.4");
}

#[tokio::test]
async fn test_analyze_requires_a_video_input() {
    let response = router_for(DEAD_UPSTREAM)
        .oneshot(multipart_request(&[
            ("home_type", "apartment"),
            ("room_count", "3"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "invalid_request");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("video_file or youtube_url"));
}

#[tokio::test]
async fn test_analyze_rejects_unparseable_room_count() {
    let response = router_for(DEAD_UPSTREAM)
        .oneshot(multipart_request(&[
            ("youtube_url", "https://youtu.be/demo"),
            ("room_count", "several"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "invalid_request");
}

#[tokio::test]
async fn test_analyze_url_returns_inventory() {
    let server = MockServer::start_async().await;
    let generate = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent");
            then.status(200).json_body(model_reply(
                &json!({
                    "items": [
                        {"name": "sofa", "quantity": 1, "size": "large", "category": "furniture"},
                        {"name": "moving box", "quantity": 10, "size": "small", "category": "box"}
                    ],
                    "total_volume_cubic_feet": 420,
                    "needs_special_handling": []
                })
                .to_string(),
            ));
        })
        .await;

    let response = router_for(&server.base_url())
        .oneshot(multipart_request(&[
            ("youtube_url", "https://youtu.be/demo"),
            ("home_type", "house"),
            ("room_count", "4"),
            // Unknown fields are tolerated
            ("client_version", "1.2.3"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    generate.assert_async().await;
    let body = body_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_volume_cubic_feet"], 420.0);
}

#[tokio::test]
async fn test_analyze_maps_upstream_failure_to_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent");
            then.status(503)
                .json_body(json!({"error": {"message": "overloaded"}}));
        })
        .await;

    let response = router_for(&server.base_url())
        .oneshot(multipart_request(&[(
            "youtube_url",
            "https://youtu.be/demo",
        )]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "upstream_error");
}

#[tokio::test]
async fn test_estimate_returns_priced_breakdown() {
    let server = MockServer::start_async().await;
    let staffing = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent");
            then.status(200).json_body(model_reply(
                &json!({
                    "recommended_movers": 3,
                    "truck_type": "medium",
                    "complexity_hours_add": 1.5,
                    "special_notes": "Piano requires careful handling"
                })
                .to_string(),
            ));
        })
        .await;

    let response = router_for(&server.base_url())
        .oneshot(estimate_request(sample_estimate_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    staffing.assert_async().await;
    let body = body_json(response).await;
    assert_eq!(body["total_cost"], 1407.0);
    assert_eq!(body["cost_range"][0], 1266.3);
    assert_eq!(body["cost_range"][1], 1547.7);
    assert_eq!(body["movers_needed"], 3);
    assert_eq!(body["truck_type"], "medium");
    assert_eq!(body["estimated_hours"], 9.5);
    assert_eq!(body["breakdown"]["labor"], 997.5);
    assert_eq!(body["breakdown"]["stairs_fee"], 50.0);
    assert_eq!(body["special_notes"], "Piano requires careful handling");
}

#[tokio::test]
async fn test_estimate_survives_model_outage() {
    // Staffing falls back to the volume rules when nothing answers
    let body = json!({
        "items": [
            {"name": "bed", "quantity": 1, "size": "large", "category": "furniture"}
        ],
        "total_volume_cubic_feet": 300.0,
        "needs_special_handling": [],
        "distance_km": 10.0,
        "origin_floor": 1,
        "destination_floor": 1
    });

    let response = router_for(DEAD_UPSTREAM)
        .oneshot(estimate_request(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["movers_needed"], 2);
    assert_eq!(body["truck_type"], "small");
    assert_eq!(body["total_cost"], 548.25);
}

#[tokio::test]
async fn test_estimate_missing_required_field_is_unprocessable() {
    let mut body = sample_estimate_body();
    body.as_object_mut().unwrap().remove("distance_km");

    let response = router_for(DEAD_UPSTREAM)
        .oneshot(estimate_request(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_estimate_rejects_non_positive_distance() {
    let mut body = sample_estimate_body();
    body["distance_km"] = json!(-5.0);

    let response = router_for(DEAD_UPSTREAM)
        .oneshot(estimate_request(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "cost_estimation_error");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("distance_km"));
}
