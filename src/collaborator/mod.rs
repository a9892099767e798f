//! The outward seam: submitting a region for recognition and translation
//!
//! The core only ever calls [`RegionSubmitter::submit`]. Retries and
//! timeouts belong to implementations or callers, never to the core.

pub mod http;

use std::future::Future;

use crate::domain::Region;

pub use http::HttpSubmitter;

/// Joins the recognized and translated halves in a region's stored text
pub const TEXT_SEPARATOR: &str = "\n";

/// What the collaborator returns for one region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognitionResult {
    pub recognized_text: String,
    pub translated_text: String,
}

impl RecognitionResult {
    pub fn new(recognized_text: impl Into<String>, translated_text: impl Into<String>) -> Self {
        Self {
            recognized_text: recognized_text.into(),
            translated_text: translated_text.into(),
        }
    }

    /// Text stored on the region: recognized, separator, translated
    pub fn joined(&self) -> String {
        format!(
            "{}{}{}",
            self.recognized_text, TEXT_SEPARATOR, self.translated_text
        )
    }
}

/// Anything that can turn an image region into recognized/translated text
pub trait RegionSubmitter {
    fn submit(
        &self,
        image_source: &str,
        region: Region,
    ) -> impl Future<Output = anyhow::Result<RecognitionResult>>;
}
