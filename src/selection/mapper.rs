//! Screen space <-> image space transforms
//!
//! Every region that is submitted or drawn goes through one mapper so that
//! overlays and submissions agree pixel for pixel, whatever the current
//! rendered size of the page.

use crate::domain::{BoundingBox, Point, Region, ScreenRect, Size};

/// Pure transform built from a rendered bounding box and a natural size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordinateMapper {
    bounds: BoundingBox,
    natural: Size,
}

impl CoordinateMapper {
    pub fn new(bounds: BoundingBox, natural: Size) -> Self {
        Self { bounds, natural }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn natural(&self) -> Size {
        self.natural
    }

    /// False until the image has a rendered area and a known natural size
    pub fn is_ready(&self) -> bool {
        self.bounds.is_laid_out() && !self.natural.is_empty()
    }

    /// Map a viewport point to the image-space pixel under it
    ///
    /// The point is clamped to the rendered box first, so a pointer that has
    /// left the image while dragging maps onto the nearest edge.
    pub fn to_image_space(&self, screen_x: f32, screen_y: f32) -> Point {
        if !self.bounds.is_laid_out() {
            return Point::default();
        }

        let rel_x = (screen_x - self.bounds.left).clamp(0.0, self.bounds.width);
        let rel_y = (screen_y - self.bounds.top).clamp(0.0, self.bounds.height);

        let scale_x = self.natural.width as f32 / self.bounds.width;
        let scale_y = self.natural.height as f32 / self.bounds.height;

        Point {
            x: (rel_x * scale_x).round() as u32,
            y: (rel_y * scale_y).round() as u32,
        }
    }

    /// Map an image-space region to a rectangle relative to the image element
    ///
    /// No clamping or rounding; overlays may sit on sub-pixel positions.
    pub fn to_screen_space(&self, region: Region) -> ScreenRect {
        if !self.is_ready() {
            return ScreenRect::default();
        }

        let scale_x = self.bounds.width / self.natural.width as f32;
        let scale_y = self.bounds.height / self.natural.height as f32;

        ScreenRect {
            left: region.x as f32 * scale_x,
            top: region.y as f32 * scale_y,
            width: region.width as f32 * scale_x,
            height: region.height as f32 * scale_y,
        }
    }

    /// Like [`Self::to_screen_space`] but offset into viewport coordinates
    pub fn to_viewport(&self, region: Region) -> ScreenRect {
        self.to_screen_space(region)
            .translate(self.bounds.left, self.bounds.top)
    }
}
