pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::content::handlers;
use crate::state::AppState;

/// Style guide PDFs can be far larger than axum's default body limit.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/content-types",
            get(handlers::handle_list_content_types),
        )
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            delete(handlers::handle_delete_session),
        )
        // Style guide
        .route(
            "/api/v1/sessions/:id/style-guide",
            get(handlers::handle_get_style_guide)
                .post(handlers::handle_upload_style_guide)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Content
        .route(
            "/api/v1/sessions/:id/analyze",
            post(handlers::handle_analyze),
        )
        .route(
            "/api/v1/sessions/:id/generate",
            post(handlers::handle_generate),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::content::service::GENERATION_FAILED_MESSAGE;
    use crate::llm_client::mock::MockCompletionClient;
    use crate::llm_client::CompletionClient;
    use crate::state::SessionStore;
    use crate::style_guide::fixtures::pdf_with_pages;

    const BOUNDARY: &str = "scribe-test-boundary";

    fn test_app(llm: Option<MockCompletionClient>) -> Router {
        let default_llm = llm.map(|m| Arc::new(m) as Arc<dyn CompletionClient>);
        build_router(AppState {
            sessions: SessionStore::new(),
            default_llm,
        })
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload_request(uri: &str, field: &str, content: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"guide.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn open_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/sessions", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["session_id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(None);
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_content_types_lists_fixed_selection() {
        let app = test_app(None);
        let response = app
            .oneshot(
                Request::get("/api/v1/content-types")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!([
                "Email",
                "Customer Correspondence",
                "Technical Documentation",
                "Marketing Copy",
                "General Business"
            ])
        );
    }

    #[tokio::test]
    async fn test_create_session_without_any_credential_is_rejected() {
        let app = test_app(None);
        let response = app
            .oneshot(json_request("POST", "/api/v1/sessions", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "VALIDATION_ERROR"
        );
    }

    #[tokio::test]
    async fn test_new_session_reports_no_style_guide() {
        let app = test_app(Some(MockCompletionClient::replying("ok")));
        let id = open_session(&app).await;

        let response = app
            .oneshot(
                Request::get(format!("/api/v1/sessions/{id}/style-guide"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["loaded"], false);
        assert_eq!(body["sections"], json!({}));
    }

    #[tokio::test]
    async fn test_analyze_returns_structured_result() {
        let app = test_app(Some(MockCompletionClient::replying(
            r#"Here you go: {"overall_assessment":"Solid","style_evaluation":"Crisp","suggestions":["Add a sign-off"]}"#,
        )));
        let id = open_session(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/sessions/{id}/analyze"),
                json!({"text": "Hi team, the release is Friday.", "content_type": "Email"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["overall_assessment"], "Solid");
        assert_eq!(body["style_evaluation"], "Crisp");
        assert_eq!(body["suggestions"], json!(["Add a sign-off"]));
    }

    #[tokio::test]
    async fn test_analyze_remote_failure_is_still_200() {
        let app = test_app(Some(MockCompletionClient::failing(429, "rate_limit_error")));
        let id = open_session(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/sessions/{id}/analyze"),
                json!({"text": "text", "content_type": "Technical Documentation"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["overall_assessment"]
            .as_str()
            .unwrap()
            .contains("rate_limit_error"));
    }

    #[tokio::test]
    async fn test_generate_remote_failure_returns_fixed_message() {
        let app = test_app(Some(MockCompletionClient::failing(500, "boom")));
        let id = open_session(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/sessions/{id}/generate"),
                json!({"prompt": "Write a promo", "content_type": "Marketing Copy"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["content"],
            GENERATION_FAILED_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_unknown_content_type_is_rejected() {
        let app = test_app(Some(MockCompletionClient::replying("ok")));
        let id = open_session(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/sessions/{id}/generate"),
                json!({"prompt": "x", "content_type": "Poetry"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = test_app(Some(MockCompletionClient::replying("ok")));
        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/sessions/{}/analyze", uuid::Uuid::new_v4()),
                json!({"text": "x", "content_type": "Email"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_of_pdf_replaces_style_guide() {
        let mock = MockCompletionClient::replying("done");
        let app = test_app(Some(mock));
        let id = open_session(&app).await;
        let pdf = pdf_with_pages(&["VOICE", "Friendly and direct"]);

        let response = app
            .clone()
            .oneshot(upload_request(
                &format!("/api/v1/sessions/{id}/style-guide"),
                "file",
                &pdf,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["loaded"], true);
        assert!(body["sections"]["VOICE"]
            .as_str()
            .unwrap()
            .contains("Friendly and direct"));

        let response = app
            .oneshot(
                Request::get(format!("/api/v1/sessions/{id}/style-guide"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["loaded"], true);
        assert!(body["sections"]["General"].is_string());
    }

    #[tokio::test]
    async fn test_upload_of_non_pdf_is_unprocessable() {
        let app = test_app(Some(MockCompletionClient::replying("ok")));
        let id = open_session(&app).await;

        let response = app
            .oneshot(upload_request(
                &format!("/api/v1/sessions/{id}/style-guide"),
                "file",
                b"plain text pretending to be a PDF",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "EXTRACTION_ERROR"
        );
    }

    #[tokio::test]
    async fn test_upload_without_file_field_is_bad_request() {
        let app = test_app(Some(MockCompletionClient::replying("ok")));
        let id = open_session(&app).await;

        let response = app
            .oneshot(upload_request(
                &format!("/api/v1/sessions/{id}/style-guide"),
                "attachment",
                b"whatever",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_deleted_session_is_gone() {
        let app = test_app(Some(MockCompletionClient::replying("ok")));
        let id = open_session(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/api/v1/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(
                Request::get(format!("/api/v1/sessions/{id}/style-guide"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
