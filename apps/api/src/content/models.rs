use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Business document category. Only changes prompt phrasing, never control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Email,
    #[serde(rename = "Customer Correspondence")]
    CustomerCorrespondence,
    #[serde(rename = "Technical Documentation")]
    TechnicalDocumentation,
    #[serde(rename = "Marketing Copy")]
    MarketingCopy,
    #[serde(rename = "General Business")]
    GeneralBusiness,
}

impl ContentType {
    /// The fixed selection list offered to users, in display order.
    pub const ALL: [ContentType; 5] = [
        ContentType::Email,
        ContentType::CustomerCorrespondence,
        ContentType::TechnicalDocumentation,
        ContentType::MarketingCopy,
        ContentType::GeneralBusiness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Email => "Email",
            ContentType::CustomerCorrespondence => "Customer Correspondence",
            ContentType::TechnicalDocumentation => "Technical Documentation",
            ContentType::MarketingCopy => "Marketing Copy",
            ContentType::GeneralBusiness => "General Business",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured feedback for one analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_assessment: String,
    pub style_evaluation: String,
    pub suggestions: Vec<String>,
}

impl AnalysisResult {
    /// Maps a model-produced JSON object onto the result shape.
    ///
    /// Fields are not validated: a missing field becomes empty, a non-string value is
    /// rendered as JSON text, and a bare string in `suggestions` becomes a single item.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            overall_assessment: text_field(object.get("overall_assessment")),
            style_evaluation: text_field(object.get("style_evaluation")),
            suggestions: list_field(object.get("suggestions")),
        }
    }

    /// Result used when the model replied but no JSON object could be recovered.
    pub fn formatting_fallback(original_content: &str) -> Self {
        let preview: String = original_content.chars().take(100).collect();
        Self {
            overall_assessment: "Analysis completed with formatting issues.".to_string(),
            style_evaluation: format!("Content analyzed: {preview}..."),
            suggestions: vec![
                "Consider reviewing the content for clarity".to_string(),
                "Ensure all key points are clearly communicated".to_string(),
                "Review formatting and structure".to_string(),
            ],
        }
    }

    /// Result used when the completion call itself failed.
    pub fn remote_failure(error: &str) -> Self {
        Self {
            overall_assessment: format!("Analysis error: {error}"),
            style_evaluation: "Unable to complete style evaluation".to_string(),
            suggestions: vec![
                "Please try again in a moment".to_string(),
                "Consider breaking content into smaller sections".to_string(),
            ],
        }
    }
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn list_field(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(|v| text_field(Some(v))).collect(),
        Some(other) => vec![text_field(Some(other))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_content_type_serde_uses_display_names() {
        let json = serde_json::to_string(&ContentType::CustomerCorrespondence).unwrap();
        assert_eq!(json, r#""Customer Correspondence""#);
        let parsed: ContentType = serde_json::from_str(r#""Marketing Copy""#).unwrap();
        assert_eq!(parsed, ContentType::MarketingCopy);
    }

    #[test]
    fn test_content_type_rejects_unknown_names() {
        let parsed: Result<ContentType, _> = serde_json::from_str(r#""Poetry""#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_content_type_display_matches_serde() {
        for ct in ContentType::ALL {
            let json = serde_json::to_string(&ct).unwrap();
            assert_eq!(json, format!("\"{ct}\""));
        }
    }

    #[test]
    fn test_from_object_maps_all_fields() {
        let result = AnalysisResult::from_object(&object(json!({
            "overall_assessment": "Strong draft",
            "style_evaluation": "Friendly tone",
            "suggestions": ["Shorten intro", "Add CTA"]
        })));
        assert_eq!(result.overall_assessment, "Strong draft");
        assert_eq!(result.style_evaluation, "Friendly tone");
        assert_eq!(result.suggestions, vec!["Shorten intro", "Add CTA"]);
    }

    #[test]
    fn test_from_object_tolerates_missing_and_odd_fields() {
        let result = AnalysisResult::from_object(&object(json!({
            "overall_assessment": 7,
            "suggestions": "only one"
        })));
        assert_eq!(result.overall_assessment, "7");
        assert_eq!(result.style_evaluation, "");
        assert_eq!(result.suggestions, vec!["only one"]);
    }

    #[test]
    fn test_formatting_fallback_previews_first_100_chars() {
        let content = "x".repeat(150);
        let result = AnalysisResult::formatting_fallback(&content);
        assert_eq!(
            result.style_evaluation,
            format!("Content analyzed: {}...", "x".repeat(100))
        );
        assert_eq!(result.suggestions.len(), 3);
    }

    #[test]
    fn test_remote_failure_embeds_error() {
        let result = AnalysisResult::remote_failure("rate limited");
        assert_eq!(result.overall_assessment, "Analysis error: rate limited");
        assert_eq!(result.suggestions.len(), 2);
    }
}
