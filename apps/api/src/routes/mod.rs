pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::assistant::handlers::handle_chat;
use crate::matching::handlers::handle_recommend;
use crate::resume::handlers::handle_upload_resume;
use crate::resume::MAX_UPLOAD_BYTES;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/recommend", post(handle_recommend))
        .route("/api/v1/chat", post(handle_chat))
        .route("/api/v1/resume/upload", post(handle_upload_resume))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::assistant::prompts::{EMPTY_MESSAGE_REPLY, UNAVAILABLE_REPLY};
    use crate::assistant::session::SessionStore;
    use crate::catalog::CatalogIndex;
    use crate::llm_client::TextGeneration;
    use crate::matching::scorer::CandidateScorer;

    fn test_state() -> AppState {
        AppState {
            catalog: Arc::new(CatalogIndex::sample().unwrap()),
            scorer: CandidateScorer::default(),
            generation: TextGeneration::Disabled,
            sessions: Arc::new(SessionStore::new(Duration::from_secs(60))),
        }
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        post_raw(uri, Some("application/json"), body.to_string()).await
    }

    async fn post_raw(
        uri: &str,
        content_type: Option<&str>,
        body: String,
    ) -> (StatusCode, Value) {
        let mut request = Request::post(uri);
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        let response = build_router(test_state())
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = build_router(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["status"], "ok");
    }

    #[tokio::test]
    async fn test_recommend_returns_ranked_results() {
        let (status, body) = post_json(
            "/api/v1/recommend",
            json!({
                "education": "B.Tech CS",
                "skills": "python;excel",
                "interests": "Data",
                "resume_text": "",
                "lat": 28.6139,
                "lon": 77.2090
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 5);

        let top = &recs[0];
        assert_eq!(top["id"], "3");
        assert_eq!(top["org"], "AgriTech");
        assert_eq!(top["location"], "Patna, Bihar");
        assert_eq!(top["matched_skills"], json!(["excel", "python"]));
        assert_eq!(top["accommodation"], 2000);
        assert_eq!(top["sector"], "data");
        assert!(recs.iter().all(|r| {
            let sector = r["sector"].as_str().unwrap();
            sector == sector.to_lowercase()
        }));
        assert!(top["distance_km"].is_i64());
        assert!(top["explanation"]
            .as_str()
            .unwrap()
            .starts_with("This internship at AgriTech"));

        let scores: Vec<f64> = recs.iter().map(|r| r["score"].as_f64().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_recommend_tolerates_garbage_location() {
        let (status, body) = post_json(
            "/api/v1/recommend",
            json!({"skills": "", "lat": "somewhere", "lon": null}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 5);
        assert!(recs.iter().all(|r| r["distance_km"].is_null()));
        assert!(recs
            .iter()
            .all(|r| !r["explanation"].as_str().unwrap().is_empty()));
    }

    #[tokio::test]
    async fn test_recommend_empty_body_object() {
        let (status, body) = post_json("/api/v1/recommend", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_recommend_null_text_fields_are_empty() {
        let (status, body) = post_json(
            "/api/v1/recommend",
            json!({
                "education": null,
                "skills": null,
                "interests": null,
                "resume_text": null,
                "lat": null,
                "lon": null
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 5);
        assert!(recs
            .iter()
            .all(|r| r["matched_skills"].as_array().unwrap().is_empty()));
    }

    #[tokio::test]
    async fn test_recommend_normalizes_mistyped_fields() {
        let (status, body) = post_json(
            "/api/v1/recommend",
            json!({"education": 12, "skills": ["Python", "Excel"], "interests": false}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs[0]["id"], "3");
        assert_eq!(recs[0]["matched_skills"], json!(["excel", "python"]));

        let (status, body) = post_json("/api/v1/recommend", json!({"skills": 5})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_recommend_malformed_json_uses_error_envelope() {
        let (status, body) = post_raw(
            "/api/v1/recommend",
            Some("application/json"),
            "{\"skills\": ".to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_BODY");
        assert!(!body["error"]["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recommend_missing_content_type_uses_error_envelope() {
        let (status, body) =
            post_raw("/api/v1/recommend", None, json!({"skills": "python"}).to_string()).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_chat_non_object_body_uses_error_envelope() {
        let (status, body) = post_raw(
            "/api/v1/chat",
            Some("application/json"),
            "\"hello\"".to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_chat_null_message_asks_for_one() {
        let (status, body) = post_json(
            "/api/v1/chat",
            json!({"message": null, "session_id": null}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], EMPTY_MESSAGE_REPLY);
        assert!(!body["session_id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_without_generation() {
        let (status, body) = post_json("/api/v1/chat", json!({"message": "hello"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], UNAVAILABLE_REPLY);
        assert!(!body["session_id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_keeps_client_session_id() {
        let (_, body) = post_json(
            "/api/v1/chat",
            json!({"message": "hello", "session_id": "abc"}),
        )
        .await;
        assert_eq!(body["session_id"], "abc");
    }

    #[tokio::test]
    async fn test_upload_without_resume_field_is_rejected() {
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
        );
        let response = build_router(test_state())
            .oneshot(
                Request::post("/api/v1/resume/upload")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_unreadable_pdf_returns_empty_text() {
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"cv.pdf\"\r\nContent-Type: application/pdf\r\n\r\nnot really a pdf\r\n--{boundary}--\r\n"
        );
        let response = build_router(test_state())
            .oneshot(
                Request::post("/api/v1/resume/upload")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["text"], "");
    }
}
