// All LLM prompt templates for the Content module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::content::models::ContentType;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_REMINDER};
use crate::style_guide::StyleGuide;

/// Shown to the model in place of style guidelines when none is loaded.
pub const NO_STYLE_GUIDE: &str = "No style guide loaded.";

/// Characters of each section body quoted in the style context.
const SECTION_PREVIEW_CHARS: usize = 300;

/// Analysis prompt template.
/// Replace: {content_type}, {text}, {style_guide_context}, {json_only_reminder}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this {content_type} content and respond with ONLY a JSON object in the following structure:
{
    "overall_assessment": "A detailed evaluation of the overall content quality and effectiveness",
    "style_evaluation": "An analysis of the writing style, tone, and clarity",
    "suggestions": ["Specific suggestion 1", "Specific suggestion 2", "Specific suggestion 3"]
}

Content to analyze:
{text}

Style Guidelines:
{style_guide_context}

{json_only_reminder}"#;

/// Generation prompt template.
/// Replace: {content_type}, {style_guide_context}, {prompt}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"Generate {content_type} content following these guidelines:

{style_guide_context}

Requirements:
- Professional and clear writing style
- Proper formatting for {content_type}
- Direct and concise communication

Content prompt:
{prompt}"#;

/// Renders the style guide as one `name: preview...` line per section.
///
/// The ellipsis is appended whether or not the body was cut.
pub fn style_guide_context(style_guide: &StyleGuide) -> String {
    if style_guide.is_empty() {
        return NO_STYLE_GUIDE.to_string();
    }

    style_guide
        .iter()
        .map(|(name, body)| {
            let preview: String = body.chars().take(SECTION_PREVIEW_CHARS).collect();
            format!("{name}: {preview}...")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_analysis_prompt(
    text: &str,
    content_type: ContentType,
    style_guide: &StyleGuide,
) -> String {
    let context = style_guide_context(style_guide);
    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("content_type", content_type.as_str()),
            ("text", text),
            ("style_guide_context", &context),
            ("json_only_reminder", JSON_ONLY_REMINDER),
        ],
    )
}

pub fn build_generation_prompt(
    prompt: &str,
    content_type: ContentType,
    style_guide: &StyleGuide,
) -> String {
    let context = style_guide_context(style_guide);
    fill_template(
        GENERATION_PROMPT_TEMPLATE,
        &[
            ("content_type", content_type.as_str()),
            ("style_guide_context", &context),
            ("prompt", prompt),
        ],
    )
}
