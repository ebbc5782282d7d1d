//! Style guide sectionizer: splits extracted document text into named sections.
//!
//! A line is a header when it has at least one cased letter and nothing lowercase
//! ("TONE OF VOICE", "RULE 2"), or when its trimmed text ends with a colon
//! ("Formatting:"). Everything before the first header lands in "General".

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Section that collects text preceding the first detected header.
pub const DEFAULT_SECTION: &str = "General";

/// Named sections of a style guide, in order of first appearance.
///
/// Names are unique: inserting an existing name replaces its body but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleGuide {
    sections: Vec<(String, String)>,
}

impl StyleGuide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, body)| body.as_str())
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[cfg(test)]
    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) {
        let name = name.into();
        let body = body.into();
        match self.sections.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = body,
            None => self.sections.push((name, body)),
        }
    }

    /// `(name, body)` pairs in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections
            .iter()
            .map(|(name, body)| (name.as_str(), body.as_str()))
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for StyleGuide {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (name, body) in &self.sections {
            map.serialize_entry(name, body)?;
        }
        map.end()
    }
}

/// Splits `text` into sections keyed by the most recent header line.
///
/// Header lines are dropped; every other line is kept verbatim. A header whose name was
/// already seen restarts that section's body.
pub fn sectionize(text: &str) -> StyleGuide {
    let mut sections: Vec<(&str, Vec<&str>)> = vec![(DEFAULT_SECTION, Vec::new())];
    let mut current = 0;

    for line in text.split('\n') {
        if !is_header(line) {
            sections[current].1.push(line);
            continue;
        }

        let name = header_name(line);
        current = match sections.iter().position(|(n, _)| *n == name) {
            Some(idx) => {
                sections[idx].1.clear();
                idx
            }
            None => {
                sections.push((name, Vec::new()));
                sections.len() - 1
            }
        };
    }

    StyleGuide {
        sections: sections
            .into_iter()
            .map(|(name, lines)| (name.to_string(), lines.join("\n")))
            .collect(),
    }
}

fn is_header(line: &str) -> bool {
    is_all_caps(line) || line.trim().ends_with(':')
}

/// True if the line has a cased letter and no lowercase one. Digits, punctuation and
/// uncased scripts neither qualify nor disqualify.
fn is_all_caps(line: &str) -> bool {
    let mut cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

fn header_name(line: &str) -> &str {
    line.trim().trim_end_matches(':')
}
