//! Selection types for region dragging and detail popups

use super::geometry::{Point, Region};

/// Transient drag state of one image
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    pub drag_origin: Option<Point>,
    pub drag_current: Option<Point>,
    pub is_dragging: bool,
}

impl SelectionState {
    /// Normalized rectangle between origin and current point, if dragging
    pub fn normalized(&self) -> Option<Region> {
        match (self.drag_origin, self.drag_current) {
            (Some(origin), Some(current)) => Some(Region::from_corners(origin, current)),
            _ => None,
        }
    }
}

/// The region whose detail popup is open; only one at a time across all images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveDetail {
    pub image_index: usize,
    pub region_index: usize,
}

impl ActiveDetail {
    pub fn new(image_index: usize, region_index: usize) -> Self {
        Self {
            image_index,
            region_index,
        }
    }

    /// Toggle rule for an overlay click: clicking the open one closes it,
    /// clicking any other one switches to it.
    pub fn toggle(current: Option<ActiveDetail>, clicked: ActiveDetail) -> Option<ActiveDetail> {
        if current == Some(clicked) {
            None
        } else {
            Some(clicked)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_closes_and_switches() {
        let a = ActiveDetail::new(0, 1);
        let b = ActiveDetail::new(1, 1);
        assert_eq!(ActiveDetail::toggle(None, a), Some(a));
        assert_eq!(ActiveDetail::toggle(Some(a), a), None);
        assert_eq!(ActiveDetail::toggle(Some(a), b), Some(b));
    }

    #[test]
    fn test_normalized_requires_both_points() {
        let state = SelectionState {
            drag_origin: Some(Point::new(5, 5)),
            drag_current: None,
            is_dragging: true,
        };
        assert_eq!(state.normalized(), None);
    }
}
