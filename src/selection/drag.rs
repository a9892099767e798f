//! Drag gesture state machine: Idle -> Dragging -> Idle
//!
//! Pointer positions arrive in viewport coordinates and are converted to
//! image space on arrival, so a layout change mid-drag cannot skew the
//! committed rectangle.

use crate::domain::{Point, Region, SelectionState};

use super::capture::PointerCapture;
use super::mapper::CoordinateMapper;

/// Both sides of a committed region must be strictly larger than this,
/// in image-space pixels.
pub const MIN_REGION_SIZE: u32 = 5;

/// What a pointer event did to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    /// The event did not apply in the current state
    Ignored,
    Started(Point),
    Moved(Point),
    /// Released with a region large enough to keep
    Committed(Region),
    /// Released below the size threshold (accidental click)
    Discarded,
    /// Selection mode switched off mid-drag
    Cancelled,
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Dragging {
        origin: Point,
        current: Point,
        _capture: PointerCapture,
    },
}

/// Turns pointer down/move/up into committed image-space regions
#[derive(Debug, Default)]
pub struct DragTracker {
    phase: Phase,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Snapshot of the transient selection state
    pub fn state(&self) -> SelectionState {
        match &self.phase {
            Phase::Idle => SelectionState::default(),
            Phase::Dragging {
                origin, current, ..
            } => SelectionState {
                drag_origin: Some(*origin),
                drag_current: Some(*current),
                is_dragging: true,
            },
        }
    }

    /// Normalized rectangle of the drag in progress, regardless of size
    pub fn current_region(&self) -> Option<Region> {
        self.state().normalized()
    }

    /// Start a drag; the capture routes global moves here until it ends
    pub fn pointer_down(
        &mut self,
        mapper: &CoordinateMapper,
        screen_x: f32,
        screen_y: f32,
        capture: PointerCapture,
    ) -> DragEvent {
        if self.is_dragging() {
            log::debug!("Ignoring pointer down during an active drag");
            return DragEvent::Ignored;
        }

        let origin = mapper.to_image_space(screen_x, screen_y);
        log::debug!("Drag started at image ({}, {})", origin.x, origin.y);
        self.phase = Phase::Dragging {
            origin,
            current: origin,
            _capture: capture,
        };
        DragEvent::Started(origin)
    }

    pub fn pointer_move(
        &mut self,
        mapper: &CoordinateMapper,
        screen_x: f32,
        screen_y: f32,
    ) -> DragEvent {
        match &mut self.phase {
            Phase::Idle => DragEvent::Ignored,
            Phase::Dragging { current, .. } => {
                *current = mapper.to_image_space(screen_x, screen_y);
                DragEvent::Moved(*current)
            }
        }
    }

    /// Finish the drag, committing it only if both sides exceed
    /// [`MIN_REGION_SIZE`]
    pub fn pointer_up(&mut self) -> DragEvent {
        let Phase::Dragging {
            origin, current, ..
        } = std::mem::take(&mut self.phase)
        else {
            return DragEvent::Ignored;
        };

        let region = Region::from_corners(origin, current);
        if region.exceeds(MIN_REGION_SIZE) {
            log::debug!("Drag committed: {region:?}");
            DragEvent::Committed(region)
        } else {
            log::debug!(
                "Drag discarded: {}x{} is below the selection threshold",
                region.width,
                region.height
            );
            DragEvent::Discarded
        }
    }

    /// Drop any drag in progress without committing it
    pub fn cancel(&mut self) -> DragEvent {
        match std::mem::take(&mut self.phase) {
            Phase::Idle => DragEvent::Ignored,
            Phase::Dragging { .. } => {
                log::debug!("Drag cancelled");
                DragEvent::Cancelled
            }
        }
    }
}
