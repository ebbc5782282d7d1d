//! Axum route handlers for the Content API, the entry points the UI layer calls.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::models::{AnalysisResult, ContentType};
use crate::content::service::ContentService;
use crate::errors::AppError;
use crate::llm_client::{CompletionClient, LlmClient};
use crate::state::{session_not_found, AppState};
use crate::style_guide::StyleGuide;

/// Multipart field carrying the PDF upload.
const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Anthropic key for this session only; falls back to the server default.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct StyleGuideResponse {
    pub loaded: bool,
    pub sections: StyleGuide,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub content_type: ContentType,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub content_type: ContentType,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/content-types
pub async fn handle_list_content_types() -> Json<Vec<&'static str>> {
    Json(ContentType::ALL.iter().map(ContentType::as_str).collect())
}

/// POST /api/v1/sessions
///
/// Opens a session with an empty style guide. The credential is held in memory only.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let llm: Arc<dyn CompletionClient> = match request.api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => Arc::new(LlmClient::new(key).map_err(|e| AppError::Llm(e.to_string()))?),
        None => state.default_llm.clone().ok_or_else(|| {
            AppError::Validation(
                "api_key is required: no default Anthropic credential is configured".to_string(),
            )
        })?,
    };

    let (session_id, created_at) = state.sessions.create(ContentService::new(llm)).await;

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            created_at,
        }),
    ))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// GET /api/v1/sessions/:id/style-guide
pub async fn handle_get_style_guide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StyleGuideResponse>, AppError> {
    let entry = state
        .sessions
        .snapshot(&id)
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(StyleGuideResponse {
        loaded: entry.session.has_style_guide(),
        sections: entry.session.style_guide().clone(),
    }))
}

/// POST /api/v1/sessions/:id/style-guide
///
/// Accepts a multipart PDF upload and replaces the session's style guide with it.
/// Extraction runs on the blocking pool, outside the session lock.
pub async fn handle_upload_style_guide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<StyleGuideResponse>, AppError> {
    let mut document = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            document = Some(bytes);
            break;
        }
    }
    let document = document.ok_or_else(|| {
        AppError::Validation(format!("Missing multipart field '{UPLOAD_FIELD}'"))
    })?;

    let style_guide = state.sessions.load_style_guide(&id, document).await?;

    Ok(Json(StyleGuideResponse {
        loaded: !style_guide.is_empty(),
        sections: style_guide,
    }))
}

/// POST /api/v1/sessions/:id/analyze
///
/// Always answers with an AnalysisResult; model failures come back as fallback text.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let entry = state
        .sessions
        .snapshot(&id)
        .await
        .ok_or_else(|| session_not_found(id))?;

    let result = entry
        .service
        .analyze(&entry.session, &request.text, request.content_type)
        .await;

    Ok(Json(result))
}

/// POST /api/v1/sessions/:id/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let entry = state
        .sessions
        .snapshot(&id)
        .await
        .ok_or_else(|| session_not_found(id))?;

    let content = entry
        .service
        .generate(&entry.session, &request.prompt, request.content_type)
        .await;

    Ok(Json(GenerateResponse { content }))
}
