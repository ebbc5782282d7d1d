//! Content service: orchestrates prompt building, the completion call and normalization.
//!
//! Flow: style guide (from the session) → build prompt → LLM complete →
//!       clean_text (generation) / extract_json (analysis) → result.
//!
//! `analyze` and `generate` never fail: a failed completion call is downgraded to a
//! fixed result here, and an unparseable reply is downgraded inside `extract_json`.
//! Only `load_style_guide` can fail, since having no guide is a safe default.

use std::sync::Arc;

use tracing::{error, info};

use crate::content::models::{AnalysisResult, ContentType};
use crate::content::normalizer::{clean_text, extract_json};
use crate::content::prompts::{build_analysis_prompt, build_generation_prompt};
use crate::content::session::ContentSession;
use crate::llm_client::{CompletionClient, CompletionRequest};
use crate::style_guide::{extract_text, sectionize, ExtractionError, StyleGuide};

/// Output budget for both analysis and generation calls.
const MAX_OUTPUT_TOKENS: u32 = 1500;
/// Analysis should be repeatable.
const ANALYSIS_TEMPERATURE: f32 = 0.0;
const GENERATION_TEMPERATURE: f32 = 0.7;

/// Returned by `generate` when the completion call fails.
pub const GENERATION_FAILED_MESSAGE: &str = "Content generation failed. Please try again.";

#[derive(Clone)]
pub struct ContentService {
    llm: Arc<dyn CompletionClient>,
}

impl ContentService {
    pub fn new(llm: Arc<dyn CompletionClient>) -> Self {
        Self { llm }
    }

    /// Extracts and sectionizes a PDF style guide, replacing the session's current one.
    ///
    /// On error the session keeps whatever guide it had before.
    pub fn load_style_guide<'s>(
        &self,
        session: &'s mut ContentSession,
        document: &[u8],
    ) -> Result<&'s StyleGuide, ExtractionError> {
        let text = extract_text(document)?;
        Ok(self.install_style_text(session, &text))
    }

    pub(crate) fn install_style_text<'s>(
        &self,
        session: &'s mut ContentSession,
        text: &str,
    ) -> &'s StyleGuide {
        let style_guide = sectionize(text);
        info!(
            "Style guide loaded: {} sections ({} chars)",
            style_guide.len(),
            text.chars().count()
        );
        session.replace_style_guide(style_guide)
    }

    /// Analyzes `text` against the session's style guide.
    pub async fn analyze(
        &self,
        session: &ContentSession,
        text: &str,
        content_type: ContentType,
    ) -> AnalysisResult {
        let prompt = build_analysis_prompt(text, content_type, session.style_guide());
        let request = CompletionRequest {
            prompt,
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: ANALYSIS_TEMPERATURE,
        };

        let payload = match self.llm.complete(request).await {
            Ok(payload) => payload,
            Err(e) => {
                error!("Analysis LLM call failed: {e}");
                return AnalysisResult::remote_failure(&e.to_string());
            }
        };

        info!("Analysis ({content_type}) reply received");
        extract_json(&payload.to_text(), text).into_analysis()
    }

    /// Generates new content of `content_type` from a free-text prompt.
    pub async fn generate(
        &self,
        session: &ContentSession,
        prompt: &str,
        content_type: ContentType,
    ) -> String {
        let prompt = build_generation_prompt(prompt, content_type, session.style_guide());
        let request = CompletionRequest {
            prompt,
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: GENERATION_TEMPERATURE,
        };

        match self.llm.complete(request).await {
            Ok(payload) => {
                let content = clean_text(&payload);
                info!(
                    "Generated {content_type} content ({} chars)",
                    content.chars().count()
                );
                content
            }
            Err(e) => {
                error!("Generation LLM call failed: {e}");
                GENERATION_FAILED_MESSAGE.to_string()
            }
        }
    }
}
