//! Response normalization: turns free-form model output into usable results.
//!
//! `clean_text` is for generation output. `extract_json` is for analysis output and
//! walks three tiers: direct parse, outermost-brace span, fixed fallback.
//!
//! The tier-2 pattern is greedy: it spans from the first `{` to the last `}` in the
//! response. A stray `}` after the real object makes that span unparseable and the
//! call lands on the fallback. This matches how the service has always behaved.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::content::models::AnalysisResult;
use crate::llm_client::{CompletionPayload, TEXT_BLOCK_CLOSE, TEXT_BLOCK_OPEN};

static OUTERMOST_BRACES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[\s\S]*\}").expect("brace pattern is valid"));

/// Which tier produced the analysis object.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonExtraction {
    /// The whole response parsed as a JSON object.
    Direct(Map<String, Value>),
    /// An object was recovered from the outermost brace span.
    Embedded(Map<String, Value>),
    /// Nothing parseable; the fixed formatting-issues result.
    Fallback(AnalysisResult),
}

impl JsonExtraction {
    pub fn into_analysis(self) -> AnalysisResult {
        match self {
            JsonExtraction::Direct(object) | JsonExtraction::Embedded(object) => {
                AnalysisResult::from_object(&object)
            }
            JsonExtraction::Fallback(result) => result,
        }
    }
}

/// Cleans a generation payload into plain readable text. Never fails.
pub fn clean_text(payload: &CompletionPayload) -> String {
    match payload {
        CompletionPayload::RawString(s) => clean_str(s),
        CompletionPayload::Structured(_) => clean_str(&payload.to_text()),
    }
}

/// Strips text-block markers, expands `\n`/`\r` escapes, and trims quotes and whitespace.
pub fn clean_str(raw: &str) -> String {
    raw.replace(TEXT_BLOCK_OPEN, "")
        .replace(TEXT_BLOCK_CLOSE, "")
        .replace("\\n", "\n")
        .replace("\\r", "\r")
        .trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace())
        .to_string()
}

/// Recovers a JSON object from a raw analysis response.
///
/// `original_content` is the text the user asked to analyze; the fallback previews it.
pub fn extract_json(raw: &str, original_content: &str) -> JsonExtraction {
    if let Ok(object) = serde_json::from_str::<Map<String, Value>>(raw) {
        debug!("Analysis response parsed directly");
        return JsonExtraction::Direct(object);
    }

    if let Some(span) = OUTERMOST_BRACES_RE.find(raw) {
        if let Ok(object) = serde_json::from_str::<Map<String, Value>>(span.as_str()) {
            debug!("Analysis response recovered from embedded JSON span");
            return JsonExtraction::Embedded(object);
        }
    }

    warn!(
        "Analysis response had no parseable JSON object ({} chars); using fallback",
        raw.chars().count()
    );
    JsonExtraction::Fallback(AnalysisResult::formatting_fallback(original_content))
}
