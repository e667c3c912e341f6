//! Integration tests for media settings and dashboard stats.

use std::path::PathBuf;

use kaushalya_client::{fetch_dashboard_stats, ApiClient, MediaController, SyncError};
use kaushalya_core::{MediaUpload, ValidationError};
use serde_json::json;
use wiremock::matchers::{header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::with_base_url(base_url, 30).expect("client construction should not fail")
}

fn write_temp(name: &str, bytes: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kaushalya-media-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join(name);
    std::fs::write(&file, bytes).unwrap();
    file
}

#[tokio::test]
async fn load_reads_latest_media() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "imageUrl": "/uploads/banner.png", "videoUrl": "/uploads/promo.mp4" }
        })))
        .mount(&server)
        .await;

    let mut media = MediaController::new(test_client(&server.uri()));
    let current = media.load().await.unwrap().cloned().unwrap();
    assert_eq!(current.image_url.as_deref(), Some("/uploads/banner.png"));
    assert_eq!(current.video_url.as_deref(), Some("/uploads/promo.mp4"));
}

#[tokio::test]
async fn load_without_saved_media_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let mut media = MediaController::new(test_client(&server.uri()));
    assert!(media.load().await.unwrap().is_none());
}

#[tokio::test]
async fn upload_sends_multipart_then_reloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/media/upload"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "Media saved" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "imageUrl": "/uploads/banner.png" }
        })))
        .mount(&server)
        .await;

    let image = write_temp("banner.png", b"\x89PNG fake");
    let mut media = MediaController::new(test_client(&server.uri()));
    let outcome = media
        .upload(&MediaUpload {
            image: Some(image),
            video: None,
        })
        .await
        .expect("upload should succeed");

    assert_eq!(outcome.message.as_deref(), Some("Media saved"));
    assert!(outcome.refreshed);
    assert_eq!(
        media.current().and_then(|m| m.image_url.as_deref()),
        Some("/uploads/banner.png")
    );

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("upload request recorded");
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"image\""));
    assert!(body.contains("filename=\"banner.png\""));
}

#[tokio::test]
async fn wrong_file_type_is_rejected_before_upload() {
    let server = MockServer::start().await;
    let mut media = MediaController::new(test_client(&server.uri()));
    let err = media
        .upload(&MediaUpload {
            image: None,
            video: Some(PathBuf::from("banner.png")),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::Validation(ValidationError::UnsupportedMedia { expected: "video", .. })
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn stats_decode_dashboard_aggregate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "totalRevenue": 152_340.5,
                "totalOrders": 87,
                "totalCustomers": 41,
                "topStates": [{ "state": "Rajasthan", "orderCount": 30 }],
                "recentOrders": [{ "orderId": "ORD-087", "total": 1100 }]
            }
        })))
        .mount(&server)
        .await;

    let stats = fetch_dashboard_stats(&test_client(&server.uri()))
        .await
        .unwrap();
    assert_eq!(stats.total_orders, 87);
    assert_eq!(stats.top_states[0].state, "Rajasthan");
    assert_eq!(stats.recent_orders[0].order_id, "ORD-087");
    assert_eq!(stats.total_revenue.to_string(), "152340.50");
}
