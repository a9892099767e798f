//! Detail popup placement
//!
//! The popup sits to the right of its region box unless that would run past
//! the viewport, in which case it flips to the left. Either way the final
//! position is clamped so the popup stays on screen.

use crate::domain::{RegionStatus, ScreenRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupSide {
    Right,
    Left,
}

/// Where to draw a popup, in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupPlacement {
    pub side: PopupSide,
    pub left: f32,
    pub top: f32,
}

/// Popup dimensions and spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupStyle {
    pub width: f32,
    pub height: f32,
    pub gap: f32,
}

impl Default for PopupStyle {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 160.0,
            gap: 8.0,
        }
    }
}

/// Visible detail popup for the active region
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPopup<'a> {
    pub image_index: usize,
    pub region_index: usize,
    pub text: &'a str,
    pub status: &'a RegionStatus,
    pub placement: PopupPlacement,
}

/// Place a popup next to `anchor` (viewport coordinates) inside a viewport
/// of `viewport_width` x `viewport_height`
pub fn place_popup(
    anchor: ScreenRect,
    style: PopupStyle,
    viewport_width: f32,
    viewport_height: f32,
) -> PopupPlacement {
    let right_edge = anchor.right() + style.gap + style.width;
    let (side, left) = if right_edge <= viewport_width {
        (PopupSide::Right, anchor.right() + style.gap)
    } else {
        (PopupSide::Left, anchor.left - style.gap - style.width)
    };

    PopupPlacement {
        side,
        left: clamp_span(left, style.width, viewport_width),
        top: clamp_span(anchor.top, style.height, viewport_height),
    }
}

/// Clamp `start` so `[start, start + len]` fits in `[0, limit]` where possible
fn clamp_span(start: f32, len: f32, limit: f32) -> f32 {
    start.min(limit - len).max(0.0)
}
