//! Running log of everything recognized and translated in this session

use crate::collaborator::RecognitionResult;

/// Raw and translated text, one line per resolved region in arrival order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    raw: String,
    translated: String,
}

impl Transcript {
    pub fn push(&mut self, result: &RecognitionResult) {
        self.raw.push_str(&result.recognized_text);
        self.raw.push('\n');
        self.translated.push_str(&result.translated_text);
        self.translated.push('\n');
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn translated(&self) -> &str {
        &self.translated
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.translated.is_empty()
    }

    pub fn clear(&mut self) {
        self.raw.clear();
        self.translated.clear();
    }
}
