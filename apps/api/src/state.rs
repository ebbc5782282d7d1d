use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::content::service::ContentService;
use crate::content::session::ContentSession;
use crate::errors::AppError;
use crate::llm_client::CompletionClient;
use crate::style_guide::{ExtractionError, StyleGuide};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Client built from `ANTHROPIC_API_KEY`, used by sessions created without their own key.
    pub default_llm: Option<Arc<dyn CompletionClient>>,
}

/// A live session: its style-guide slot and the service bound to its credential.
#[derive(Clone)]
pub struct SessionEntry {
    pub session: ContentSession,
    pub service: ContentService,
}

/// In-memory registry of sessions. Nothing here outlives the process.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new session with an empty style guide.
    pub async fn create(&self, service: ContentService) -> (Uuid, DateTime<Utc>) {
        let id = Uuid::new_v4();
        let session = ContentSession::new();
        let created_at = session.created_at();
        let mut w = self.sessions.write().await;
        w.insert(id, SessionEntry { session, service });
        info!("Session {id} opened ({} active)", w.len());
        (id, created_at)
    }

    /// Ends a session, dropping its style guide. Returns false if it did not exist.
    pub async fn remove(&self, id: &Uuid) -> bool {
        let mut w = self.sessions.write().await;
        let removed = w.remove(id).is_some();
        if removed {
            info!("Session {id} closed ({} active)", w.len());
        }
        removed
    }

    /// Copy of the session, so callers can await without holding the lock.
    pub async fn snapshot(&self, id: &Uuid) -> Option<SessionEntry> {
        let r = self.sessions.read().await;
        r.get(id).cloned()
    }

    /// Runs `f` against the live session under the write lock.
    pub async fn update<F, R>(&self, id: &Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&ContentService, &mut ContentSession) -> R,
    {
        let mut w = self.sessions.write().await;
        w.get_mut(id)
            .map(|entry| f(&entry.service, &mut entry.session))
    }

    /// Loads a PDF style guide into a session.
    ///
    /// Extraction runs on the blocking pool against a copy of the session, with no lock
    /// held; the write lock is only taken to swap the finished guide in.
    pub async fn load_style_guide(
        &self,
        id: &Uuid,
        document: Bytes,
    ) -> Result<StyleGuide, AppError> {
        self.rebuild_style_guide(id, move |service, session| {
            service
                .load_style_guide(session, &document)
                .map(StyleGuide::clone)
        })
        .await
    }

    async fn rebuild_style_guide<F>(&self, id: &Uuid, build: F) -> Result<StyleGuide, AppError>
    where
        F: FnOnce(&ContentService, &mut ContentSession) -> Result<StyleGuide, ExtractionError>
            + Send
            + 'static,
    {
        let SessionEntry {
            service,
            mut session,
        } = self.snapshot(id).await.ok_or_else(|| session_not_found(*id))?;

        let style_guide = tokio::task::spawn_blocking(move || build(&service, &mut session))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!(
                    "spawn_blocking failed in style guide load: {e}"
                ))
            })??;

        self.update(id, |_, session| {
            session.replace_style_guide(style_guide.clone());
        })
        .await
        .ok_or_else(|| session_not_found(*id))?;

        Ok(style_guide)
    }
}

pub fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
