//! Render models for stored region overlays

use crate::domain::{RegionStatus, ScreenRect};

/// One stored region as it should be drawn over its image
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox<'a> {
    pub region_index: usize,
    /// Relative to the image element
    pub rect: ScreenRect,
    pub text: &'a str,
    pub status: &'a RegionStatus,
    /// Whether this region's detail popup is open
    pub active: bool,
}

impl OverlayBox<'_> {
    /// Failed regions carry an error marker instead of text
    pub fn has_error(&self) -> bool {
        matches!(self.status, RegionStatus::Failed(_))
    }
}
