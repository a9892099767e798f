//! Handle for one displayed page image

use super::geometry::{BoundingBox, Size};

/// A displayed image: its source identifier plus cached layout
///
/// The bounding box is refreshed on layout changes (resize, scroll) rather
/// than queried on every render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageHandle {
    pub source: String,
    pub bounds: BoundingBox,
    pub natural: Size,
}

impl ImageHandle {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }
}
