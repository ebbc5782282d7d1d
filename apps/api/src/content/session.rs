use chrono::{DateTime, Utc};

use crate::style_guide::StyleGuide;

/// One user's working context: the style guide slot read by analysis and generation.
///
/// The slot starts empty and is replaced wholesale on every load. Sessions never share
/// a slot; each one is handed to the content service explicitly.
#[derive(Debug, Clone)]
pub struct ContentSession {
    style_guide: StyleGuide,
    created_at: DateTime<Utc>,
}

impl ContentSession {
    pub fn new() -> Self {
        Self {
            style_guide: StyleGuide::new(),
            created_at: Utc::now(),
        }
    }

    pub fn style_guide(&self) -> &StyleGuide {
        &self.style_guide
    }

    /// Whether a guide has been loaded in this session.
    pub fn has_style_guide(&self) -> bool {
        !self.style_guide.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn replace_style_guide(&mut self, style_guide: StyleGuide) -> &StyleGuide {
        self.style_guide = style_guide;
        &self.style_guide
    }
}

impl Default for ContentSession {
    fn default() -> Self {
        Self::new()
    }
}
