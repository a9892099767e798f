//! Shared constants for drawing region overlays

/// Region overlay styling, in image pixels at scale 1.0
pub mod overlay {
    /// Outline stroke thickness
    pub const THICKNESS: f32 = 3.0;
    /// Dark border drawn under the outline
    pub const BORDER_THICKNESS: f32 = 5.0;
    /// Alpha of the translucent fill inside each region
    pub const FILL_ALPHA: u8 = 60;
    /// Alpha of the dark border
    pub const BORDER_ALPHA: u8 = 220;
    /// Outline color for regions whose recognition failed
    pub const FAILED_RGB: [u8; 3] = [220, 38, 38];
}

/// Stroke scale so outlines stay visible on very large pages
#[inline]
pub fn stroke_scale(width: u32, height: u32) -> f32 {
    (width.min(height) as f32 / 1000.0).max(1.0)
}
