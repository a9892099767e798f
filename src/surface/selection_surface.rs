//! Per-image selection surface
//!
//! Owns the image handle with its cached layout, and the drag tracker for
//! that image. Stored regions live in the session's store and are passed
//! in when overlays are built.

use crate::domain::{AnnotatedRegion, BoundingBox, ImageHandle, ScreenRect, SelectionState, Size};
use crate::selection::{CoordinateMapper, DragEvent, DragTracker, PointerCapture};

use super::overlay::OverlayBox;

#[derive(Debug)]
pub struct SelectionSurface {
    handle: ImageHandle,
    tracker: DragTracker,
}

impl SelectionSurface {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            handle: ImageHandle::new(source),
            tracker: DragTracker::new(),
        }
    }

    pub fn handle(&self) -> &ImageHandle {
        &self.handle
    }

    pub fn source(&self) -> &str {
        &self.handle.source
    }

    /// Refresh the cached bounding box after a resize or scroll
    pub fn update_layout(&mut self, bounds: BoundingBox) {
        self.handle.bounds = bounds;
    }

    /// Record the image's natural resolution once it has loaded
    pub fn set_natural_size(&mut self, natural: Size) {
        self.handle.natural = natural;
    }

    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.handle.bounds, self.handle.natural)
    }

    pub fn is_dragging(&self) -> bool {
        self.tracker.is_dragging()
    }

    pub fn selection_state(&self) -> SelectionState {
        self.tracker.state()
    }

    pub fn pointer_down(&mut self, screen_x: f32, screen_y: f32, capture: PointerCapture) -> DragEvent {
        let mapper = self.mapper();
        self.tracker.pointer_down(&mapper, screen_x, screen_y, capture)
    }

    pub fn pointer_move(&mut self, screen_x: f32, screen_y: f32) -> DragEvent {
        let mapper = self.mapper();
        self.tracker.pointer_move(&mapper, screen_x, screen_y)
    }

    pub fn pointer_up(&mut self) -> DragEvent {
        self.tracker.pointer_up()
    }

    pub fn cancel_drag(&mut self) -> DragEvent {
        self.tracker.cancel()
    }

    /// Live drag rectangle relative to the image element; never stored
    pub fn preview(&self) -> Option<ScreenRect> {
        let region = self.tracker.current_region()?;
        Some(self.mapper().to_screen_space(region))
    }

    /// Overlay boxes for this image's stored regions, in insertion order
    pub fn overlays<'a>(
        &self,
        regions: &'a [AnnotatedRegion],
        active_region: Option<usize>,
    ) -> Vec<OverlayBox<'a>> {
        let mapper = self.mapper();
        regions
            .iter()
            .enumerate()
            .map(|(region_index, stored)| OverlayBox {
                region_index,
                rect: mapper.to_screen_space(stored.region),
                text: &stored.text,
                status: &stored.status,
                active: active_region == Some(region_index),
            })
            .collect()
    }

    /// Top-most stored region under a viewport point
    ///
    /// Later regions are drawn above earlier ones, so they win.
    pub fn hit_test(&self, regions: &[AnnotatedRegion], screen_x: f32, screen_y: f32) -> Option<usize> {
        let mapper = self.mapper();
        if !mapper.is_ready() {
            return None;
        }
        regions
            .iter()
            .rposition(|stored| mapper.to_viewport(stored.region).contains_point(screen_x, screen_y))
    }

    /// Viewport rectangle of a stored region, used to anchor its popup
    pub fn region_in_viewport(&self, stored: &AnnotatedRegion) -> ScreenRect {
        self.mapper().to_viewport(stored.region)
    }
}
